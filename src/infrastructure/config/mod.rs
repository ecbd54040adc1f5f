//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
    pub extensions: ExtensionsConfig,
    pub image: ImageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    /// Name the bot posts under
    pub name: String,
    /// Leading character that marks a command
    pub sigil: char,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// SQLite database path
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct UploadConfig {
    /// Multipart upload endpoint of the file service
    pub url: String,
    pub timeout_seconds: u64,
}

/// Which built-in extensions load at startup
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionsConfig {
    pub fun: bool,
    pub image: bool,
    pub chicken: bool,
}

/// Defaults prefilled into the image parameter form
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f64,
    pub negative_prompt: String,
    pub batch_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "Bot".to_string(),
                sigil: '!',
            },
            storage: StorageConfig {
                path: PathBuf::from("lanchat.db"),
            },
            upload: UploadConfig {
                url: "http://localhost:6970/upload-file".to_string(),
                timeout_seconds: 30,
            },
            extensions: ExtensionsConfig {
                fun: true,
                image: true,
                chicken: true,
            },
            image: ImageConfig::default(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            steps: 35,
            cfg_scale: 7.0,
            negative_prompt: String::new(),
            batch_size: 1,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(url) = std::env::var("UPLOAD_URL") {
            config.upload.url = url;
        }

        if let Ok(path) = std::env::var("LANCHAT_DB") {
            config.storage.path = PathBuf::from(path);
        }

        if let Ok(name) = std::env::var("BOT_NAME") {
            config.bot.name = name;
        }

        if let Ok(sigil) = std::env::var("BOT_SIGIL") {
            let mut chars = sigil.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => config.bot.sigil = c,
                _ => tracing::warn!(
                    "BOT_SIGIL must be a single character, keeping '{}'",
                    config.bot.sigil
                ),
            }
        }

        config
    }

    /// Render this configuration as YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
