//! Error types for the library layer.

use std::time::Duration;

/// Errors produced while fetching and comparing snapshots. Any of these aborts
/// the whole comparison; there is no partial result.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// An error from the exchange client (status, transport or JSON decoding).
    #[error("API error: {0}")]
    Api(#[from] vnquotes_api::Error),
    /// The JSON body parsed but matched none of the known envelope shapes.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The comparison did not finish within the configured deadline.
    #[error("Comparison timed out after {0:?}")]
    Timeout(Duration),
    /// User-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
