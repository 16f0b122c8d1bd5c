//! Message pipeline: normalize, extract, respond, deliver
//!
//! ```text
//! raw update ─▶ Normalizer ─▶ CanonicalMessage ─▶ ResponseProducer ─▶ Transport
//!                  │    ▲
//!                  ▼    │
//!          Transport (file URL) + TextExtractor (OCR)
//! ```
//!
//! Each event is handled on its own task with no state shared between events.

pub mod event;
pub mod message;
mod normalize;
mod resolver;
mod respond;

use std::sync::Arc;

pub use event::{DocumentRef, InboundMessage, PhotoVariant, RawInboundEvent};
pub use message::{AttachmentExtraction, CanonicalMessage, Sender};
pub use normalize::{
    NO_TEXT_FOUND_TEXT, NormalizationError, Normalized, Normalizer, OCR_FAILED_TEXT,
};
pub use resolver::pick_best_photo;
pub use respond::{ResponseError, ResponseProducer};

use crate::Result;
use crate::agent::Conversational;
use crate::channels::Transport;
use crate::ocr::TextExtractor;

/// What happened to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No reply was attempted
    Ignored,
    /// A reply was delivered to `chat_id`
    Replied { chat_id: i64 },
}

/// End-to-end handling of one inbound event
pub struct Pipeline {
    normalizer: Normalizer,
    producer: ResponseProducer,
    transport: Arc<dyn Transport>,
}

impl Pipeline {
    /// Wire a pipeline from its collaborators
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        extractor: Arc<dyn TextExtractor>,
        agent: Option<Arc<dyn Conversational>>,
    ) -> Self {
        Self {
            normalizer: Normalizer::new(Arc::clone(&transport), extractor),
            producer: ResponseProducer::new(agent),
            transport,
        }
    }

    /// Normalize, answer and deliver one event
    ///
    /// # Errors
    ///
    /// Returns error if normalization, reply production or delivery fails. An
    /// error means no part of the reply reached the chat: a transport that has
    /// delivered part of a multi-message reply reports success
    pub async fn process(&self, correlation_id: &str, event: RawInboundEvent) -> Result<Delivery> {
        let (message, chat_id) = match self.normalizer.normalize(event, correlation_id).await? {
            Normalized::Ignored => return Ok(Delivery::Ignored),
            Normalized::Message { message, chat_id } => (message, chat_id),
        };

        tracing::info!(
            correlation_id,
            chat_id,
            sender = message.sender.as_ref().map_or("unknown", |s| s.display_name.as_str()),
            has_attachment = message.attachment.is_some(),
            "message normalized"
        );

        let reply = self.producer.respond(correlation_id, &message).await?;

        self.transport
            .send_reply(correlation_id, chat_id, &reply)
            .await?;

        tracing::info!(correlation_id, chat_id, transport = self.transport.name(), "reply delivered");
        Ok(Delivery::Replied { chat_id })
    }
}
