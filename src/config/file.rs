//! TOML configuration file loading
//!
//! Supports `~/.config/splitbot/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct SplitbotConfigFile {
    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Telegram transport configuration
    #[serde(default)]
    pub telegram: TelegramFileConfig,

    /// OCR provider configuration
    #[serde(default)]
    pub ocr: OcrFileConfig,

    /// Conversational agent configuration
    #[serde(default)]
    pub agent: AgentFileConfig,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub telegram: Option<String>,
    pub mistral: Option<String>,
    pub ai: Option<String>,
}

/// Server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Telegram configuration
#[derive(Debug, Default, Deserialize)]
pub struct TelegramFileConfig {
    /// Public base URL the webhook is registered under
    pub backend_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// OCR configuration
#[derive(Debug, Default, Deserialize)]
pub struct OcrFileConfig {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Conversational agent configuration
#[derive(Debug, Default, Deserialize)]
pub struct AgentFileConfig {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Load the TOML config file from `path`, or the standard path when `None`
///
/// Returns `SplitbotConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file(path: Option<&Path>) -> SplitbotConfigFile {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_file_path) else {
        return SplitbotConfigFile::default();
    };

    if !path.exists() {
        return SplitbotConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                SplitbotConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            SplitbotConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/splitbot/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("splitbot").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let config: SplitbotConfigFile = toml::from_str(
            r#"
            [server]
            port = 9000

            [agent]
            enabled = false
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, Some(9000));
        assert!(config.server.host.is_none());
        assert_eq!(config.agent.enabled, Some(false));
        assert_eq!(config.agent.model.as_deref(), Some("gpt-4o-mini"));
        assert!(config.api_keys.mistral.is_none());
    }

    #[test]
    fn missing_file_is_default() {
        let config = load_config_file(Some(Path::new("/nonexistent/splitbot.toml")));
        assert!(config.server.port.is_none());
    }

    #[test]
    fn unparsable_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        let config = load_config_file(Some(&path));
        assert!(config.server.port.is_none());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("splitbot.toml");
        std::fs::write(&path, "[ocr]\nmodel = \"mistral-ocr-2505\"\n").unwrap();

        let config = load_config_file(Some(&path));
        assert_eq!(config.ocr.model.as_deref(), Some("mistral-ocr-2505"));
    }
}
