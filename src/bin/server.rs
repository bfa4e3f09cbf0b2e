//! promptwire server binary.
//!
//! Listens for client connections and composes every reply from operator
//! input on the console.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use promptwire::console::ConsoleInput;
use promptwire::reply::spawn_reply_source;
use promptwire::server::{Server, ServerConfig, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_SESSIONS};

/// Request/reply server with operator-composed replies.
#[derive(Parser)]
#[command(name = "promptwire-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on.
    #[arg(short, long, default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,

    /// Maximum concurrently active sessions.
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    max_sessions: usize,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let config = ServerConfig {
        listen_addr: args.listen,
        max_sessions: args.max_sessions,
        ..ServerConfig::default()
    };

    let (reply, _arbiter) = spawn_reply_source(ConsoleInput::new());

    // A bind failure is fatal: report and exit non-zero via anyhow.
    let server = Server::bind(config, reply).await?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %server.local_addr()?,
        "starting promptwire server"
    );

    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(());
        }
    });

    server.run().await?;
    Ok(())
}

fn setup_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr; stdout belongs to the operator prompts.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
