//! Error types for huffpress

use thiserror::Error;

/// Result type alias for huffpress operations
pub type Result<T> = std::result::Result<T, HuffError>;

/// huffpress error types
#[derive(Error, Debug)]
pub enum HuffError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream does not start with the expected magic number
    #[error("Bad magic number: expected {expected:#010x}, got {actual:#010x}")]
    BadMagic { expected: u32, actual: u32 },

    /// Stream ended before the header, tree or end-of-stream code was complete
    #[error("Truncated stream: {0}")]
    Truncated(String),

    /// Invalid data format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Input did not match the frequencies counted on the first pass
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HuffError {
    /// Check if the error means the compressed stream itself is unusable
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            HuffError::BadMagic { .. } | HuffError::Truncated(_) | HuffError::InvalidFormat(_)
        )
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, HuffError::Io(_))
    }
}
