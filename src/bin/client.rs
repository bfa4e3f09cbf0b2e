//! promptwire interactive client binary.
//!
//! Connects to a server, composes messages from the console with the same
//! validation rules as the server operator, and prints each reply.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use promptwire::console::ConsoleInput;
use promptwire::reply::{compose_message, OperatorInput};
use promptwire::Client;

/// Interactive request/reply client.
#[derive(Parser)]
#[command(name = "promptwire-client")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let mut client = Client::connect(&args.addr).await?;
    let mut console = ConsoleInput::new();
    console.prompt(&format!("connected to {}\n", args.addr))?;

    loop {
        let msg = compose_message(&mut console, "")?;

        match client.exchange(&msg).await? {
            Some(reply) => {
                console.prompt(&format!(
                    "reply from server:\n  num: {}\n  text: {}\n",
                    reply.num, reply.text
                ))?;
            }
            None => {
                console.prompt("server closed the connection\n")?;
                return Ok(());
            }
        }
    }
}

fn setup_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
