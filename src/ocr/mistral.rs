//! Mistral OCR provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{ExtractionFailure, ExtractionOutcome, TextExtractor};
use crate::config::OcrConfig;
use crate::{Error, Result};

/// Mistral OCR client
pub struct MistralOcr {
    client: Client,
    api_key: SecretString,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for MistralOcr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralOcr")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct OcrRequest<'a> {
    model: &'a str,
    document: OcrDocument<'a>,
    include_image_base64: bool,
}

#[derive(Serialize)]
struct OcrDocument<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    image_url: &'a str,
}

#[derive(Deserialize)]
struct OcrResponse {
    pages: Vec<OcrPage>,
}

#[derive(Deserialize)]
struct OcrPage {
    #[serde(default)]
    markdown: String,
}

#[derive(Deserialize)]
struct ValidationErrorBody {
    #[serde(default)]
    detail: Vec<ValidationDetail>,
}

/// One `{loc, msg, type}` entry; only the message is surfaced
#[derive(Deserialize)]
struct ValidationDetail {
    #[serde(default)]
    msg: Option<String>,
}

impl MistralOcr {
    /// Create a new Mistral OCR client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built
    pub fn new(api_key: &SecretString, config: &OcrConfig) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("MISTRAL_API_KEY is empty".to_string()));
        }

        Ok(Self {
            client: build_client(config.timeout)?,
            api_key: SecretString::from(api_key.expose_secret().to_string()),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    /// Point the client at a different OCR endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Rebuild the HTTP client with a different request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Ocr(format!("failed to build HTTP client: {e}")))
}

#[async_trait]
impl TextExtractor for MistralOcr {
    async fn extract(&self, correlation_id: &str, image_url: &str) -> ExtractionOutcome {
        let request = OcrRequest {
            model: &self.model,
            document: OcrDocument {
                kind: "image_url",
                image_url,
            },
            include_image_base64: false,
        };

        tracing::debug!(correlation_id, model = %self.model, "sending OCR request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .header("X-Request-ID", correlation_id)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractionFailure::TransportError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionFailure::TransportError(e.to_string()))?;

        interpret_response(status, &body, image_url)
    }

    fn name(&self) -> &'static str {
        "mistral"
    }
}

/// Longest provider error body kept in an [`ExtractionFailure`]
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Map a provider answer onto an extraction outcome
///
/// Provider text that ends up in a failure has `image_url` masked, since file
/// URLs can embed transport credentials.
fn interpret_response(status: StatusCode, body: &str, image_url: &str) -> ExtractionOutcome {
    if status.is_success() {
        let parsed: OcrResponse =
            serde_json::from_str(body).map_err(|_| ExtractionFailure::ProviderError {
                status: status.as_u16(),
                body: redact(body, image_url),
            })?;

        return match <[OcrPage; 1]>::try_from(parsed.pages) {
            Ok([page]) => Ok(page.markdown),
            Err(pages) => Err(ExtractionFailure::UnexpectedPageCount(pages.len())),
        };
    }

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Ok(validation) = serde_json::from_str::<ValidationErrorBody>(body) {
            let msg = validation
                .detail
                .into_iter()
                .next()
                .and_then(|d| d.msg)
                .unwrap_or_else(|| "unknown".to_string());
            return Err(ExtractionFailure::Validation(redact(&msg, image_url)));
        }
    }

    Err(ExtractionFailure::ProviderError {
        status: status.as_u16(),
        body: redact(body, image_url),
    })
}

fn redact(text: &str, image_url: &str) -> String {
    let masked = if image_url.is_empty() {
        text.to_string()
    } else {
        text.replace(image_url, "<image_url>")
    };

    match masked.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &masked[..cut]),
        None => masked,
    }
}
