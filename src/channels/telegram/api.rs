//! Raw Telegram Bot API calls
//!
//! Request URLs carry the bot token, so transport errors are stripped of their
//! URL before they are formatted into an [`Error`].

use serde::de::DeserializeOwned;

use super::types::{
    GetFileRequest, SendMessageRequest, SetWebhookRequest, TelegramFile, TelegramResponse,
};
use crate::{Error, Result};

impl super::TelegramChannel {
    /// Send a plain-text message to a chat
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn send_message(&self, correlation_id: &str, chat_id: i64, text: &str) -> Result<()> {
        let request = SendMessageRequest { chat_id, text };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .header("X-Request-ID", correlation_id)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("Telegram sendMessage error: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Channel(format!(
                "Telegram sendMessage error: {status} - {body}"
            )));
        }

        Ok(())
    }

    /// Look up the server-side path of a file
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Telegram has no path for the file
    pub async fn get_file(&self, correlation_id: &str, file_id: &str) -> Result<String> {
        let request = GetFileRequest { file_id };

        let file: TelegramFile = self
            .call("getFile", correlation_id, &request)
            .await?;

        file.file_path.ok_or_else(|| {
            Error::Channel(format!("Telegram getFile returned no file_path for {file_id}"))
        })
    }

    /// Set webhook URL for receiving updates
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<()> {
        let request = SetWebhookRequest {
            url,
            allowed_updates: &["message"],
            secret_token,
        };

        let accepted: bool = self.call("setWebhook", "setup", &request).await?;
        if !accepted {
            return Err(Error::Channel("Telegram setWebhook was not accepted".to_string()));
        }

        tracing::info!(url, "Telegram webhook set");
        Ok(())
    }

    /// Delete webhook
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails
    pub async fn delete_webhook(&self) -> Result<()> {
        let _: bool = self
            .call("deleteWebhook", "setup", &serde_json::json!({}))
            .await?;

        tracing::info!("Telegram webhook deleted");
        Ok(())
    }

    /// POST a Bot API method and unwrap the `{ok, result, description}` envelope
    async fn call<B, T>(&self, method: &str, correlation_id: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .header("X-Request-ID", correlation_id)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Channel(format!("Telegram {method} error: {}", e.without_url())))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            Error::Channel(format!(
                "Telegram {method} response read error: {}",
                e.without_url()
            ))
        })?;

        let parsed: TelegramResponse<T> = serde_json::from_str(&text).map_err(|e| {
            Error::Channel(format!("Telegram {method} parse error ({status}): {e}"))
        })?;

        match parsed.result {
            Some(result) if parsed.ok => Ok(result),
            _ => Err(Error::Channel(format!(
                "Telegram {method} error ({status}): {}",
                parsed.description.unwrap_or_default()
            ))),
        }
    }
}
