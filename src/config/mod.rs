//! Configuration management.
//!
//! Configuration is read from `~/.config/battlecard/config.toml` at
//! startup. If the file doesn't exist, a default configuration with
//! comments is created. Credentials can also come from the environment:
//! `ANTHROPIC_API_KEY` for extraction and `BROWSERLESS_TOKEN` for the
//! rendering fallback.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;

use crate::fetcher::{DEFAULT_READER_ENDPOINT, DEFAULT_RENDER_ENDPOINT};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub renderer: RendererConfig,
    pub extraction: ExtractionConfig,
    pub company: CompanyProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Endpoint of the plain-text reader service.
    pub reader_endpoint: String,
    /// Reader request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            reader_endpoint: DEFAULT_READER_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Endpoint of the JavaScript-rendering content service.
    pub endpoint: String,
    /// Service credential. Without one the rendering fallback is skipped.
    pub token: Option<String>,
    /// How long the service waits for dynamic content, in milliseconds.
    pub wait_for_ms: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RENDER_ENDPOINT.to_string(),
            token: None,
            wait_for_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
        }
    }
}

/// The user's own company, fed into SWOT and talking-points prompts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    pub name: Option<String>,
    pub description: Option<String>,
    pub strengths: Option<String>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with
    /// comments. Missing fields in the config file use default values.
    /// Environment credentials override file values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
                path: config_path.clone(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: config_path,
                source: e,
            })?
        } else {
            Self::create_default_config(&config_path)?;
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Get the default config file path: `~/.config/battlecard/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("battlecard").join("config.toml"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            if !key.is_empty() {
                self.extraction.api_key = Some(key);
            }
        }
        if let Ok(token) = std::env::var("BROWSERLESS_TOKEN") {
            if !token.is_empty() {
                self.renderer.token = Some(token);
            }
        }
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Battlecard Configuration
#
# Credentials can also be supplied through the environment:
#   ANTHROPIC_API_KEY  - extraction API key
#   BROWSERLESS_TOKEN  - rendering-fallback credential

[fetcher]
# Plain-text reader service used as the primary content source
reader_endpoint = "https://r.jina.ai/"

# Reader request timeout in seconds
timeout_secs = 10

[renderer]
# JavaScript-rendering service used when the reader result has no
# usable pricing data
endpoint = "https://chrome.browserless.io/content"

# Service credential; leave unset to disable the rendering fallback
# token = "..."

# How long the service waits for dynamic content (milliseconds)
wait_for_ms = 3000

[extraction]
# api_key = "..."
model = "claude-sonnet-4-20250514"
max_tokens = 4096

[company]
# Your own company, used to direct SWOT and talking-points generation
# name = "Acme"
# description = "Project tracking for hardware teams"
# strengths = "On-prem deployment, SSO on every plan"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.fetcher.reader_endpoint, DEFAULT_READER_ENDPOINT);
        assert_eq!(config.renderer.wait_for_ms, 3000);
        assert_eq!(config.extraction.max_tokens, 4096);
        assert!(config.renderer.token.is_none());
        assert!(config.company.name.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[renderer]
token = "secret"
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.renderer.token.as_deref(), Some("secret"));
        // Default values elsewhere
        assert_eq!(config.renderer.endpoint, DEFAULT_RENDER_ENDPOINT);
        assert_eq!(config.fetcher.timeout_secs, 10);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.fetcher.reader_endpoint, DEFAULT_READER_ENDPOINT);
    }
}
