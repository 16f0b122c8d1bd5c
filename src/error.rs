//! Error types for the Split Bot gateway

use thiserror::Error;

use crate::pipeline::{NormalizationError, ResponseError};

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Split Bot gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat transport error (file lookup, reply delivery, webhook setup)
    #[error("channel error: {0}")]
    Channel(String),

    /// Conversational agent error
    #[error("agent error: {0}")]
    Agent(String),

    /// OCR provider setup error
    #[error("ocr error: {0}")]
    Ocr(String),

    /// Inbound event could not be turned into a canonical message
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Reply text could not be produced
    #[error(transparent)]
    Response(#[from] ResponseError),
}
