//! Text extraction from images
//!
//! Every OCR provider implements [`TextExtractor`]. An implementation makes
//! exactly one outbound call per [`TextExtractor::extract`] and folds every
//! failure mode into an [`ExtractionFailure`] instead of an error, so callers
//! can degrade without caring which provider is configured.

mod mistral;

pub use mistral::MistralOcr;

use async_trait::async_trait;
use thiserror::Error;

/// Why an extraction produced no text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// Provider answered successfully but not with exactly one page
    #[error("expected exactly 1 page, got {0}")]
    UnexpectedPageCount(usize),

    /// Provider rejected the request; carries the first validation message
    #[error("validation error: {0}")]
    Validation(String),

    /// Any other non-success answer from the provider
    #[error("provider error {status}: {body}")]
    ProviderError { status: u16, body: String },

    /// The call itself could not complete (connect, timeout, body read)
    #[error("transport error: {0}")]
    TransportError(String),
}

/// Result of a single extraction attempt
pub type ExtractionOutcome = std::result::Result<String, ExtractionFailure>;

/// An OCR capability: image URL in, text out
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from the image at `image_url`
    ///
    /// `correlation_id` is forwarded to the provider for tracing and is not
    /// interpreted. The URL must be fetchable by the provider without further
    /// authentication.
    async fn extract(&self, correlation_id: &str, image_url: &str) -> ExtractionOutcome;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
