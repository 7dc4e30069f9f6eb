//! IOChat terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Connect and pick a name interactively
//! iochat --server 127.0.0.1:5000
//!
//! # Log in immediately
//! iochat --server 127.0.0.1:5000 --name alice
//! ```

use clap::Parser;
use iochat_cli::Runtime;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// IOChat terminal client
#[derive(Parser, Debug)]
#[command(name = "iochat")]
#[command(about = "Single-room chat client for IOChat servers")]
#[command(version)]
struct Args {
    /// Server address to connect to
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    server: String,

    /// Display name to log in with on startup
    ///
    /// If not provided, the first line read from stdin is used.
    #[arg(short, long)]
    name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Transcript owns stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut runtime = Runtime::connect(&args.server, std::io::stdout()).await?;
    runtime.run(args.name).await?;

    Ok(())
}
