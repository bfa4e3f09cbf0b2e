//! Shared reply source: the serialized gateway to operator input.
//!
//! Replies are composed from a single serial input channel (the operator's
//! console) that cannot be used by more than one session at a time. Instead of
//! a mutex around stdin, a dedicated arbiter thread owns the input; sessions
//! submit requests over an mpsc channel and await the composed reply on a
//! oneshot. Channel FIFO order gives strict one-at-a-time servicing in arrival
//! order, so no two sessions ever observe interleaved prompts.
//!
//! ```text
//! Session 1 ─┐
//! Session 2 ─┼─► mpsc::Sender<ReplyRequest> ─► Arbiter Thread ─► OperatorInput
//! Session N ─┘                                      (blocking)
//! ```
//!
//! The arbiter runs on a plain OS thread because operator input is blocking
//! I/O with no timeout; a slow operator stalls all waiting sessions, never the
//! runtime.

use std::io;

use tokio::sync::{mpsc, oneshot};

use crate::error::{PromptwireError, Result};
use crate::message::Message;

/// Capacity of the request channel. Requests beyond this wait in the sender.
const REQUEST_CHANNEL_CAPACITY: usize = 32;

/// A serial, blocking source of operator-typed lines.
///
/// The core treats this purely as a narrow collaborator: prompts go out,
/// lines come back, EOF is an `UnexpectedEof` error. Implementations need no
/// buffering guarantees across calls.
pub trait OperatorInput: Send {
    /// Show a prompt to the operator. Not terminated with a newline.
    fn prompt(&mut self, text: &str) -> io::Result<()>;

    /// Read one line, without the trailing newline. Blocks until available.
    fn read_line(&mut self) -> io::Result<String>;
}

/// One session's request for a reply.
struct ReplyRequest {
    session_id: u64,
    resp: oneshot::Sender<Result<Message>>,
}

/// Handle for requesting replies from the arbiter.
///
/// Cheaply cloneable; one per session.
#[derive(Clone)]
pub struct ReplyHandle {
    tx: mpsc::Sender<ReplyRequest>,
}

impl ReplyHandle {
    /// Compose the next outgoing message for `session_id`.
    ///
    /// Blocks (suspends) until every earlier request has been served and the
    /// operator has supplied a valid number and a non-empty text.
    ///
    /// # Errors
    ///
    /// Returns [`PromptwireError::ReplySourceClosed`] if the arbiter has shut
    /// down, or an I/O error if the operator input channel failed.
    pub async fn next_reply(&self, session_id: u64) -> Result<Message> {
        let (resp, rx) = oneshot::channel();
        self.tx
            .send(ReplyRequest { session_id, resp })
            .await
            .map_err(|_| PromptwireError::ReplySourceClosed)?;
        rx.await.map_err(|_| PromptwireError::ReplySourceClosed)?
    }
}

/// Spawn the reply arbiter and return a handle for requesting replies.
///
/// The arbiter thread exits when every [`ReplyHandle`] has been dropped.
pub fn spawn_reply_source<I>(input: I) -> (ReplyHandle, std::thread::JoinHandle<()>)
where
    I: OperatorInput + 'static,
{
    let (tx, rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);
    let thread = std::thread::spawn(move || arbiter_loop(rx, input));
    (ReplyHandle { tx }, thread)
}

/// Serve reply requests strictly one at a time, in arrival order.
fn arbiter_loop<I: OperatorInput>(mut rx: mpsc::Receiver<ReplyRequest>, mut input: I) {
    while let Some(req) = rx.blocking_recv() {
        let tag = format!("session {}: ", req.session_id);
        let reply = compose_message(&mut input, &tag);
        // Requester may have gone away (connection died while waiting).
        let _ = req.resp.send(reply);
    }
}

/// Compose one message from operator input: a valid integer, then a
/// non-empty text line.
///
/// Invalid integers are discarded up to the line boundary and re-prompted;
/// empty text lines are re-prompted. `tag` prefixes each prompt so the
/// operator knows who the reply is for.
///
/// Also used by the interactive client, with an empty tag.
pub fn compose_message(input: &mut dyn OperatorInput, tag: &str) -> Result<Message> {
    input.prompt(&format!("{}enter a number: ", tag))?;
    let num = loop {
        let line = input.read_line()?;
        match line.trim().parse::<i32>() {
            Ok(n) => break n,
            Err(_) => input.prompt(&format!("{}invalid number, try again: ", tag))?,
        }
    };

    let text = loop {
        input.prompt(&format!("{}enter a text: ", tag))?;
        let line = input.read_line()?;
        if !line.is_empty() {
            break line;
        }
    };

    Ok(Message::new(text, num))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted operator: pops pre-seeded lines, records every prompt.
    struct Scripted {
        lines: VecDeque<String>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl Scripted {
        fn new(lines: &[&str]) -> (Self, Arc<Mutex<Vec<String>>>) {
            let prompts = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    lines: lines.iter().map(|s| s.to_string()).collect(),
                    prompts: prompts.clone(),
                },
                prompts,
            )
        }
    }

    impl OperatorInput for Scripted {
        fn prompt(&mut self, text: &str) -> io::Result<()> {
            self.prompts.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn read_line(&mut self) -> io::Result<String> {
            self.lines.pop_front().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "operator input closed")
            })
        }
    }

    #[test]
    fn test_compose_valid_first_try() {
        let (mut input, _) = Scripted::new(&["42", "hello"]);
        let msg = compose_message(&mut input, "session 1: ").unwrap();
        assert_eq!(msg, Message::new("hello", 42));
    }

    #[test]
    fn test_compose_retries_invalid_integer() {
        let (mut input, prompts) = Scripted::new(&["abc", "4x", "-5", "text"]);
        let msg = compose_message(&mut input, "").unwrap();
        assert_eq!(msg, Message::new("text", -5));

        let prompts = prompts.lock().unwrap();
        assert_eq!(
            prompts
                .iter()
                .filter(|p| p.contains("invalid number"))
                .count(),
            2
        );
    }

    #[test]
    fn test_compose_retries_empty_text() {
        let (mut input, prompts) = Scripted::new(&["7", "", "", "world"]);
        let msg = compose_message(&mut input, "").unwrap();
        assert_eq!(msg, Message::new("world", 7));

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.iter().filter(|p| p.contains("text")).count(), 3);
    }

    #[test]
    fn test_compose_propagates_eof() {
        let (mut input, _) = Scripted::new(&[]);
        let result = compose_message(&mut input, "");
        assert!(matches!(result, Err(PromptwireError::Io(_))));
    }

    #[test]
    fn test_every_prompt_carries_session_tag() {
        // Includes an invalid integer so the retry prompt is exercised too:
        // the operator must always see which session is being prompted.
        let (mut input, prompts) = Scripted::new(&["oops", "1", "x"]);
        compose_message(&mut input, "session 9: ").unwrap();

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().all(|p| p.starts_with("session 9: ")));
        assert!(prompts.iter().any(|p| p.contains("invalid number")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_arbiter_serves_requests_in_order() {
        let (input, prompts) = Scripted::new(&["1", "one", "2", "two", "3", "three"]);
        let (handle, thread) = spawn_reply_source(input);

        // Sequential requests from different "sessions".
        let m1 = handle.next_reply(10).await.unwrap();
        let m2 = handle.next_reply(20).await.unwrap();
        let m3 = handle.next_reply(30).await.unwrap();
        assert_eq!(m1, Message::new("one", 1));
        assert_eq!(m2, Message::new("two", 2));
        assert_eq!(m3, Message::new("three", 3));

        // Each session's prompt pair is contiguous.
        let prompts = prompts.lock().unwrap();
        let tags: Vec<&str> = prompts
            .iter()
            .map(|p| p.split(':').next().unwrap())
            .collect();
        assert_eq!(
            tags,
            vec![
                "session 10",
                "session 10",
                "session 20",
                "session 20",
                "session 30",
                "session 30"
            ]
        );
        drop(prompts);

        drop(handle);
        thread.join().unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_input_failure_is_returned_to_requester() {
        // Input EOF mid-request surfaces as an error to that session only;
        // the arbiter keeps serving until the last handle is dropped.
        let (input, _) = Scripted::new(&[]);
        let (handle, thread) = spawn_reply_source(input);

        let result = handle.next_reply(1).await;
        assert!(matches!(result, Err(PromptwireError::Io(_))));

        drop(handle);
        thread.join().unwrap();
    }
}
