//! CLI argument definitions using clap derive macros.

use clap::Parser;

/// Fetch one HTTP resource described by a JSON request document on stdin.
///
/// Fetchpipe reads a single JSON object from stdin, performs the fetch
/// (optionally following redirects and streaming the body to a TCP sink),
/// and writes a single JSON result document to stdout. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "fetchpipe")]
#[command(author, version, about)]
pub struct Args {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error logs
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Default tracing filter derived from the verbosity flags.
    ///
    /// Priority: quiet flag > verbose flag > default (info).
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
