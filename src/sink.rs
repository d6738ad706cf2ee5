//! TCP byte sink for streaming response bodies.
//!
//! The sink receives the body verbatim, with no framing. It is a
//! single-owner, single-consumer resource: `shutdown` consumes the sink, so
//! it can only ever be closed once.

use futures_util::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

/// Errors from connecting to, writing to, or closing the sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The TCP connection could not be established.
    #[error("failed to connect to output {address}: {source}")]
    Connect {
        /// The `host:port` address that refused.
        address: String,
        /// The underlying dial error.
        #[source]
        source: std::io::Error,
    },

    /// The response body could not be read from the server.
    #[error("failed to read response body: {source}")]
    Read {
        /// The underlying body error.
        #[source]
        source: reqwest::Error,
    },

    /// Writing body bytes to the connection failed.
    #[error("failed to write to output: {source}")]
    Write {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Closing the connection failed.
    #[error("failed to close output: {source}")]
    Close {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Write-only TCP destination for a downloaded body.
#[derive(Debug)]
pub struct TcpSink {
    stream: TcpStream,
}

impl TcpSink {
    /// Connects to a `host:port` address.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Connect`] when the dial fails.
    pub async fn connect(address: &str) -> Result<Self, SinkError> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|source| SinkError::Connect {
                address: address.to_string(),
                source,
            })?;

        debug!(address, "connected to output sink");
        Ok(Self { stream })
    }

    /// Forwards the response body to the connection until EOF.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Read`] when the body stream fails and
    /// [`SinkError::Write`] when the connection rejects bytes.
    pub async fn stream_body(&mut self, response: reqwest::Response) -> Result<u64, SinkError> {
        let mut body = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|source| SinkError::Read { source })?;
            self.stream
                .write_all(&chunk)
                .await
                .map_err(|source| SinkError::Write { source })?;
            written += chunk.len() as u64;
        }

        debug!(bytes = written, "body forwarded to sink");
        Ok(written)
    }

    /// Flushes and closes the connection. Consumes the sink, so close happens
    /// exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Close`] when the shutdown fails.
    pub async fn shutdown(mut self) -> Result<(), SinkError> {
        self.stream
            .shutdown()
            .await
            .map_err(|source| SinkError::Close { source })
    }
}
