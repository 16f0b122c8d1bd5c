//! Telegram channel adapter
//!
//! Receives updates through the webhook served by [`crate::api`] and talks to
//! the Bot API for file lookups, replies and webhook registration.

mod api;
pub mod chunking;
pub(crate) mod types;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::Transport;
use crate::config::TelegramConfig;
use crate::{Error, Result};

/// Telegram channel adapter
pub struct TelegramChannel {
    token: SecretString,
    client: Client,
    api_base: String,
}

impl std::fmt::Debug for TelegramChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramChannel")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl TelegramChannel {
    /// Create a new Telegram channel adapter
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(token: &SecretString, config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Channel(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            token: SecretString::from(token.expose_secret().to_string()),
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Bot API method URL
    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token.expose_secret())
    }

    /// Download URL for a file path returned by `getFile`
    ///
    /// The URL embeds the bot token, so the OCR provider can fetch it directly.
    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{file_path}",
            self.api_base,
            self.token.expose_secret()
        )
    }
}

#[async_trait]
impl Transport for TelegramChannel {
    async fn resolve_file_url(&self, correlation_id: &str, file_id: &str) -> Result<String> {
        let file_path = self.get_file(correlation_id, file_id).await?;
        Ok(self.file_url(&file_path))
    }

    async fn send_reply(&self, correlation_id: &str, chat_id: i64, text: &str) -> Result<()> {
        let chunks = chunking::chunk_text(text, 0);

        // An error means nothing reached the chat; once the first chunk is
        // delivered the reply counts as delivered even if a later chunk fails
        let (first, rest) = chunks.split_first().ok_or_else(|| {
            Error::Channel("refusing to send an empty message".to_string())
        })?;
        self.send_message(correlation_id, chat_id, first).await?;

        for (index, chunk) in rest.iter().enumerate() {
            if let Err(e) = self.send_message(correlation_id, chat_id, chunk).await {
                tracing::warn!(
                    correlation_id,
                    chat_id,
                    delivered = index + 1,
                    total = chunks.len(),
                    error = %e,
                    "Telegram reply truncated"
                );
                return Ok(());
            }
        }

        tracing::debug!(correlation_id, chat_id, chunks = chunks.len(), "Telegram reply sent");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
