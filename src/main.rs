//! CLI entry point for the fetchpipe binary.
//!
//! Reads one JSON request document from stdin, performs the fetch, and writes
//! exactly one JSON result document to stdout. Stdout carries only the
//! document; all logging goes to stderr. Exits non-zero on any failure.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use fetchpipe_core::ErrorDocument;
use tracing::debug;

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut input = String::new();
    if let Err(error) = io::stdin().read_to_string(&mut input) {
        return fail(&format!("failed to read request from stdin: {error}"));
    }

    match fetchpipe_core::serve(&input).await {
        Ok(document) => {
            let mut stdout = io::stdout().lock();
            if writeln!(stdout, "{document}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(error) => fail(&error.to_string()),
    }
}

/// Writes the error document to stdout and reports failure to the shell.
fn fail(message: &str) -> ExitCode {
    debug!(message, "request failed");

    let document = ErrorDocument::new(message);
    let mut stdout = io::stdout().lock();

    match serde_json::to_string(&document) {
        Ok(encoded) => {
            let _ = writeln!(stdout, "{encoded}");
        }
        Err(error) => {
            eprintln!("{error}");
        }
    }

    ExitCode::FAILURE
}
