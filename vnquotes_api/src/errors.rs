//! Error types for the exchange client.

/// Errors that can occur when talking to an upstream exchange.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The exchange answered with a non-success status. `body` holds a snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// Network-level failure: DNS, connect, timeout, reset, or body read.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The response body could not be decoded (e.g. invalid JSON).
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The request could not be constructed (bad base URL or path).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Returns the upstream HTTP status when the error is a status failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
