//! OpenAI-compatible chat completions client (OpenRouter, OpenAI, ...)

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::Conversational;
use crate::config::AgentConfig;
use crate::{Error, Result};

/// Chat completions client
pub struct OpenAiChat {
    client: Client,
    base_url: String,
    token: SecretString,
    model: String,
    temperature: f32,
    system_prompt: Option<String>,
}

impl std::fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiChat {
    /// Create a client from agent configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL or token is missing, or the HTTP client cannot be built
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| Error::Config("AI_BASE_URL is not set".to_string()))?;
        let token = config
            .token
            .as_ref()
            .ok_or_else(|| Error::Config("AI_TOKEN is not set".to_string()))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Agent(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: SecretString::from(token.expose_secret().to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
        })
    }

    fn messages<'a>(&'a self, text: &'a str) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(2);
        if let Some(prompt) = self.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: text,
        });
        messages
    }
}

#[async_trait]
impl Conversational for OpenAiChat {
    async fn reply(&self, correlation_id: &str, text: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: self.messages(text),
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.token.expose_secret())
            .header("X-Request-ID", correlation_id)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Agent(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Agent(format!("API error: {status} - {body}")));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Agent(format!("failed to parse response: {e}")))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::Agent("empty completion".to_string()))?;

        tracing::debug!(correlation_id, model = %self.model, "agent replied");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openai-compatible"
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
