use std::process;

use clap::Parser;
use git_shortcuts::{Cli, ExecutionFailure};

fn main() {
    // Initialize tracing subscriber with RUST_LOG environment variable support
    // Default to "warn" level if RUST_LOG is not set
    // Write to stderr so logs don't interfere with links and completions on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("{}", diagnostic(&e));
        process::exit(exit_code(&e));
    }
}

/// Renders the error and its causes on a single line.
fn diagnostic(e: &anyhow::Error) -> String {
    format!("Error: {e:#}")
}

/// A failed shell command exits with that command's status.
fn exit_code(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<ExecutionFailure>()
        .and_then(|failure| failure.code)
        .unwrap_or(1)
}
