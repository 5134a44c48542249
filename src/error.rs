//! Error types for card composition

use thiserror::Error;

/// Result type alias for composer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing or rendering a card
#[derive(Error, Debug)]
pub enum Error {
    /// Canvas or color handle could not be allocated (includes malformed
    /// color triples)
    #[error("Resource allocation failed: {0}")]
    ResourceAllocation(String),

    /// Font file missing, unreadable or not a TrueType font
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// Raster could not be encoded as PNG
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// Encoded bytes could not be written to the output sink
    #[error("Failed to write image: {0}")]
    Output(#[from] std::io::Error),

    /// Invalid configuration file
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::Encode(err.to_string())
    }
}
