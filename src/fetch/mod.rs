//! Redirect-aware HTTP download engine.
//!
//! This module is the core of the crate: it issues the request(s) for one
//! download, walks the redirect chain with cycle and hop-budget detection,
//! and hands the terminal response body to a caller-supplied consumer.
//!
//! # Features
//!
//! - Explicit redirect handling (the transport never auto-follows)
//! - Visited-set cycle detection over exact resolved URL strings
//! - One absolute deadline shared by every hop in the chain
//! - Optional per-download TLS verification bypass, never process-wide
//! - Structured error taxonomy with full context

mod client;
mod engine;
mod error;
mod walker;

pub use client::{FetchMethod, HttpClient};
pub use engine::{FetchEngine, FetchOptions, FetchOutcome, TerminalResponse};
pub use error::{ConsumerFailure, FetchError};
