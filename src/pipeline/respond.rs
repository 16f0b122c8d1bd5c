//! Reply production

use std::sync::Arc;

use thiserror::Error;

use super::message::CanonicalMessage;
use crate::agent::Conversational;

/// Errors that prevent a reply from being produced
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The conversational agent failed
    #[error("conversational agent failed: {0}")]
    Agent(#[source] Box<crate::Error>),
}

/// Chooses the reply text for a canonical message
#[derive(Default)]
pub struct ResponseProducer {
    agent: Option<Arc<dyn Conversational>>,
}

impl ResponseProducer {
    /// Create a producer, optionally routing plain text through an agent
    #[must_use]
    pub fn new(agent: Option<Arc<dyn Conversational>>) -> Self {
        Self { agent }
    }

    /// Produce the reply text
    ///
    /// Extracted attachment text is returned verbatim, fallback text included.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::Agent`] if the conversational agent fails
    pub async fn respond(
        &self,
        correlation_id: &str,
        message: &CanonicalMessage,
    ) -> Result<String, ResponseError> {
        if let Some(extraction) = &message.attachment {
            return Ok(extraction.extracted_text.clone());
        }

        let Some(agent) = &self.agent else {
            return Ok(message.text.clone());
        };

        tracing::debug!(correlation_id, agent = agent.name(), "routing text through agent");
        agent
            .reply(correlation_id, &message.text)
            .await
            .map_err(|e| ResponseError::Agent(Box::new(e)))
    }
}
