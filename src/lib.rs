//! Fetchpipe Core Library
//!
//! This library implements a one-shot, redirect-aware HTTP fetcher. A JSON
//! request document describes a single fetch (URL, timeout, redirect policy,
//! TLS policy, optional TCP output sink); the engine walks the redirect chain
//! itself, with cycle and hop-budget detection, and hands the terminal
//! response body to a caller-supplied consumer.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - HTTP transport, redirect chain walker, and download engine
//! - [`protocol`] - JSON request/response documents and duration codec
//! - [`sink`] - TCP byte sink for streaming response bodies
//! - [`service`] - stdin/stdout request dispatch tying the above together

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fetch;
pub mod protocol;
pub mod service;
pub mod sink;

// Re-export commonly used types
pub use fetch::{
    ConsumerFailure, FetchEngine, FetchError, FetchMethod, FetchOptions, FetchOutcome,
    HttpClient, TerminalResponse,
};
pub use protocol::{
    DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT, ErrorDocument, FetchRequest, GetRequest,
    HeadDocument, HeadRequest, SuccessDocument, ValidationError, WireDuration,
};
pub use service::{ServiceError, serve};
pub use sink::{SinkError, TcpSink};
