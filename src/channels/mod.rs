//! Chat platform transport
//!
//! The pipeline only needs two things from a chat platform: turning a file id
//! into a URL the OCR provider can fetch, and delivering the final reply.

pub mod telegram;

pub use telegram::TelegramChannel;

use async_trait::async_trait;

use crate::Result;

/// Transport adapter for a chat platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Resolve a platform file id to a URL fetchable without further auth
    ///
    /// # Errors
    ///
    /// Returns error if the platform cannot resolve the file
    async fn resolve_file_url(&self, correlation_id: &str, file_id: &str) -> Result<String>;

    /// Deliver reply text to a chat
    ///
    /// Delivery is all-or-nothing on the error path: an implementation that
    /// splits the text must not return an error once any part was delivered.
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects the message and nothing was delivered
    async fn send_reply(&self, correlation_id: &str, chat_id: i64, text: &str) -> Result<()>;

    /// Transport name for logging
    fn name(&self) -> &'static str;
}
