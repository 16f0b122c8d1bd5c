//! Inbound event normalization
//!
//! Turns a raw update into a [`CanonicalMessage`], running OCR on the attached
//! photo or document when there is one. OCR failure never aborts an event: the
//! extracted text falls back to [`OCR_FAILED_TEXT`] so the user still gets a
//! reply, and an attachment with no readable text gets [`NO_TEXT_FOUND_TEXT`].
//! Failing to resolve the attachment URL is fatal for the event.

use std::sync::Arc;

use thiserror::Error;

use super::event::{InboundMessage, RawInboundEvent};
use super::message::{AttachmentExtraction, CanonicalMessage, Sender};
use super::resolver::pick_best_photo;
use crate::channels::Transport;
use crate::ocr::TextExtractor;

/// Extracted text used when OCR fails
pub const OCR_FAILED_TEXT: &str = "OCR extraction failed";

/// Extracted text used when OCR succeeds but reads nothing
pub const NO_TEXT_FOUND_TEXT: &str = "No text found";

/// Errors that abort normalization of an event
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// Payload is not a valid update
    #[error("malformed inbound event: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The attachment could not be turned into a fetchable URL
    #[error("could not resolve URL for file {file_id}: {source}")]
    FileUrl {
        file_id: String,
        #[source]
        source: Box<crate::Error>,
    },
}

/// Outcome of normalizing one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Nothing to answer; no reply must be sent
    Ignored,
    /// A message to answer in `chat_id`
    Message {
        message: CanonicalMessage,
        chat_id: i64,
    },
}

/// Which attachment form an event carried
#[derive(Debug, Clone, Copy)]
enum AttachmentKind {
    Photo,
    Document,
}

impl AttachmentKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Document => "document",
        }
    }
}

/// Builds canonical messages from raw events
pub struct Normalizer {
    transport: Arc<dyn Transport>,
    extractor: Arc<dyn TextExtractor>,
}

impl Normalizer {
    /// Create a normalizer over a transport and an OCR provider
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            transport,
            extractor,
        }
    }

    /// Normalize one inbound event
    ///
    /// # Errors
    ///
    /// Returns [`NormalizationError::FileUrl`] if the attachment URL cannot be resolved
    pub async fn normalize(
        &self,
        event: RawInboundEvent,
        correlation_id: &str,
    ) -> Result<Normalized, NormalizationError> {
        let Some(inbound) = event.message.filter(InboundMessage::has_body) else {
            tracing::debug!(correlation_id, update_id = event.update_id, "update has no message body");
            return Ok(Normalized::Ignored);
        };

        let chat_id = inbound.chat.id;
        let mut message = CanonicalMessage {
            text: inbound.text.clone().unwrap_or_default(),
            attachment: None,
            sender: inbound.from.as_ref().map(Sender::from),
        };

        // A photo wins over a document if both are present
        let source = inbound
            .photo
            .as_deref()
            .and_then(pick_best_photo)
            .map(|p| (AttachmentKind::Photo, p.file_id.clone()))
            .or_else(|| {
                inbound
                    .document
                    .as_ref()
                    .map(|d| (AttachmentKind::Document, d.file_id.clone()))
            });

        if let Some((kind, file_id)) = source {
            message.attachment = Some(self.extract(correlation_id, kind, file_id).await?);

            if let Some(caption) = inbound.caption.filter(|c| !c.is_empty()) {
                message.text = caption;
            }
        }

        Ok(Normalized::Message { message, chat_id })
    }

    async fn extract(
        &self,
        correlation_id: &str,
        kind: AttachmentKind,
        file_id: String,
    ) -> Result<AttachmentExtraction, NormalizationError> {
        let url = self
            .transport
            .resolve_file_url(correlation_id, &file_id)
            .await
            .map_err(|e| NormalizationError::FileUrl {
                file_id: file_id.clone(),
                source: Box::new(e),
            })?;

        let extracted_text = match self.extractor.extract(correlation_id, &url).await {
            Ok(text) if text.trim().is_empty() => {
                tracing::info!(
                    correlation_id,
                    attachment = kind.as_str(),
                    file_id = %file_id,
                    "attachment has no readable text"
                );
                NO_TEXT_FOUND_TEXT.to_string()
            }
            Ok(text) => {
                tracing::info!(
                    correlation_id,
                    attachment = kind.as_str(),
                    file_id = %file_id,
                    chars = text.chars().count(),
                    "attachment text extracted"
                );
                text
            }
            Err(failure) => {
                tracing::warn!(
                    correlation_id,
                    attachment = kind.as_str(),
                    file_id = %file_id,
                    provider = self.extractor.name(),
                    error = %failure,
                    "OCR failed, replying with fallback text"
                );
                OCR_FAILED_TEXT.to_string()
            }
        };

        Ok(AttachmentExtraction {
            file_id,
            url,
            extracted_text,
        })
    }
}
