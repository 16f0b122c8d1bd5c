//! Conversational agent capability
//!
//! Plain-text messages can be routed through an LLM before replying. The
//! capability is optional; when absent the text is echoed back unchanged.

mod openai;

pub use openai::OpenAiChat;

use async_trait::async_trait;

use crate::Result;

/// Free text in, free text out
#[async_trait]
pub trait Conversational: Send + Sync {
    /// Produce a reply for `text`
    ///
    /// # Errors
    ///
    /// Returns error if the downstream model call fails
    async fn reply(&self, correlation_id: &str, text: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
