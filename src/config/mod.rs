//! Configuration management for the Split Bot gateway
//!
//! Every setting resolves as environment variable > TOML file > default.

pub mod file;

use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use self::file::SplitbotConfigFile;
use crate::{Error, Result};

/// Default OCR model
pub const DEFAULT_OCR_MODEL: &str = "mistral-ocr-latest";

/// Default OCR endpoint
pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.mistral.ai/v1/ocr";

/// Default conversational model (routed through an OpenAI-compatible API)
pub const DEFAULT_AGENT_MODEL: &str = "x-ai/grok-4-fast";

/// Default Telegram Bot API base
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Path the Telegram webhook is served on
pub const TELEGRAM_WEBHOOK_PATH: &str = "/telegram/webhook";

/// Gateway configuration
#[derive(Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub ocr: OcrConfig,
    pub agent: AgentConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Telegram transport configuration
#[derive(Debug)]
pub struct TelegramConfig {
    /// Bot token (from `TELEGRAM_BOT_TOKEN`)
    pub bot_token: Option<SecretString>,

    /// Expected `X-Telegram-Bot-Api-Secret-Token` header value
    pub webhook_secret: Option<SecretString>,

    /// Public base URL; when set the webhook is registered on startup
    pub backend_url: Option<String>,

    /// Bot API base URL
    pub api_base: String,

    /// Request timeout for Bot API calls
    pub timeout: Duration,
}

/// OCR provider configuration
#[derive(Debug)]
pub struct OcrConfig {
    /// Mistral API key (from `MISTRAL_API_KEY`)
    pub api_key: Option<SecretString>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_OCR_MODEL.to_string(),
            endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Conversational agent configuration
#[derive(Debug)]
pub struct AgentConfig {
    /// Explicit on/off switch; the agent also needs a base URL and token
    pub enabled: bool,
    /// OpenAI-compatible API base (e.g. `https://openrouter.ai/api/v1`)
    pub base_url: Option<String>,
    pub token: Option<SecretString>,
    pub model: String,
    pub temperature: f32,
    pub system_prompt: Option<String>,
    pub timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            token: None,
            model: DEFAULT_AGENT_MODEL.to_string(),
            temperature: 0.7,
            system_prompt: None,
            timeout: Duration::from_secs(60),
        }
    }
}

impl AgentConfig {
    /// Whether replies to plain text should go through the agent
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.enabled && self.base_url.is_some() && self.token.is_some()
    }
}

impl TelegramConfig {
    /// Public webhook URL derived from `backend_url`, if one is configured
    ///
    /// Any path on the backend URL is kept as a prefix.
    ///
    /// # Errors
    ///
    /// Returns error if `backend_url` is not an absolute http(s) URL
    pub fn webhook_url(&self) -> Result<Option<Url>> {
        self.backend_url.as_deref().map(webhook_url_for).transpose()
    }
}

/// Append [`TELEGRAM_WEBHOOK_PATH`] to a public base URL
///
/// # Errors
///
/// Returns error if `base` is not an absolute http(s) URL
pub fn webhook_url_for(base: &str) -> Result<Url> {
    let mut url =
        Url::parse(base).map_err(|e| Error::Config(format!("invalid BACKEND_URL {base:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!("BACKEND_URL must be http(s), got {base:?}")));
    }

    url.path_segments_mut()
        .map_err(|()| Error::Config(format!("BACKEND_URL cannot be a base: {base:?}")))?
        .pop_if_empty()
        .extend(TELEGRAM_WEBHOOK_PATH.split('/').filter(|s| !s.is_empty()));

    Ok(url)
}

impl Config {
    /// Load configuration from the process environment and the TOML file
    ///
    /// A `.env` file in the working directory is applied first if present.
    ///
    /// # Errors
    ///
    /// Returns error if a present `.env` file cannot be read
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("could not load .env: {e}"))),
        }

        let fc = file::load_config_file(config_path);
        Ok(Self::from_sources(|key| std::env::var(key).ok(), fc))
    }

    /// Resolve configuration from an environment lookup and a parsed file
    #[must_use]
    pub fn from_sources<F>(env: F, fc: SplitbotConfigFile) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_secs = |key: &str| env(key).and_then(|s| s.parse::<u64>().ok());

        let server = ServerConfig {
            host: env("SPLITBOT_HOST")
                .or(fc.server.host)
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env("PORT")
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(8080),
        };

        let telegram = TelegramConfig {
            bot_token: env("TELEGRAM_BOT_TOKEN")
                .or(fc.api_keys.telegram)
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            webhook_secret: env("TELEGRAM_WEBHOOK_SECRET")
                .or(fc.telegram.webhook_secret)
                .filter(|s| !s.is_empty())
                .map(SecretString::from),
            backend_url: env("BACKEND_URL")
                .or(fc.telegram.backend_url)
                .filter(|s| !s.is_empty()),
            api_base: env("TELEGRAM_API_BASE")
                .or(fc.telegram.api_base)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string()),
            timeout: Duration::from_secs(
                env_secs("TELEGRAM_TIMEOUT_SECS")
                    .or(fc.telegram.timeout_secs)
                    .unwrap_or(30),
            ),
        };

        let ocr_defaults = OcrConfig::default();
        let ocr = OcrConfig {
            api_key: env("MISTRAL_API_KEY")
                .or(fc.api_keys.mistral)
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
            model: env("SPLITBOT_OCR_MODEL")
                .or(fc.ocr.model)
                .unwrap_or(ocr_defaults.model),
            endpoint: env("SPLITBOT_OCR_URL")
                .or(fc.ocr.endpoint)
                .unwrap_or(ocr_defaults.endpoint),
            timeout: env_secs("SPLITBOT_OCR_TIMEOUT_SECS")
                .or(fc.ocr.timeout_secs)
                .map_or(ocr_defaults.timeout, Duration::from_secs),
        };

        let agent_defaults = AgentConfig::default();
        let agent = AgentConfig {
            enabled: env("SPLITBOT_AGENT_ENABLED")
                .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
                .or(fc.agent.enabled)
                .unwrap_or(agent_defaults.enabled),
            base_url: env("AI_BASE_URL")
                .or_else(|| env("OPENAI_BASE_URL"))
                .or(fc.agent.base_url)
                .filter(|s| !s.is_empty()),
            token: env("AI_TOKEN")
                .or_else(|| env("OPENAI_TOKEN"))
                .or(fc.api_keys.ai)
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            model: env("SPLITBOT_AGENT_MODEL")
                .or(fc.agent.model)
                .unwrap_or(agent_defaults.model),
            temperature: fc.agent.temperature.unwrap_or(agent_defaults.temperature),
            system_prompt: env("SPLITBOT_AGENT_SYSTEM_PROMPT")
                .or(fc.agent.system_prompt)
                .filter(|s| !s.is_empty()),
            timeout: env_secs("SPLITBOT_AGENT_TIMEOUT_SECS")
                .or(fc.agent.timeout_secs)
                .map_or(agent_defaults.timeout, Duration::from_secs),
        };

        Self {
            server,
            telegram,
            ocr,
            agent,
        }
    }

    /// Telegram bot token, required to serve
    ///
    /// # Errors
    ///
    /// Returns error if `TELEGRAM_BOT_TOKEN` is not set
    pub fn telegram_token(&self) -> Result<&SecretString> {
        self.telegram
            .bot_token
            .as_ref()
            .ok_or_else(|| Error::Config("TELEGRAM_BOT_TOKEN is not set".to_string()))
    }

    /// Mistral API key, required to serve
    ///
    /// # Errors
    ///
    /// Returns error if `MISTRAL_API_KEY` is not set
    pub fn ocr_api_key(&self) -> Result<&SecretString> {
        self.ocr
            .api_key
            .as_ref()
            .ok_or_else(|| Error::Config("MISTRAL_API_KEY is not set".to_string()))
    }
}
