use crate::models::types::{ActionKind, BotConfig};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug)]
pub struct ConfigManager {
    pub bot: BotConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Load `config_path`, writing the defaults there if it does not exist.
    pub fn new(config_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut manager = Self {
            bot: BotConfig::default(),
            config_path: config_path.as_ref().to_path_buf(),
        };

        manager.load_config()?;
        Ok(manager)
    }

    pub fn load_config(&mut self) -> Result<(), ConfigError> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            let config: BotConfig = serde_json::from_str(&content)?;
            validate(&config)?;
            self.bot = config;
        } else {
            self.save_config()?;
        }

        Ok(())
    }

    pub fn save_config(&self) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self.bot)?;
        fs::write(&self.config_path, content)?;
        Ok(())
    }

    pub fn is_self_exempt(&self, kind: ActionKind) -> bool {
        self.bot.is_self_exempt(kind)
    }
}

fn validate(config: &BotConfig) -> Result<(), ConfigError> {
    if config.prefix.trim().is_empty() {
        return Err(ConfigError::Invalid("prefix must not be empty".to_string()));
    }
    if config.ban_delete_message_days > 7 {
        return Err(ConfigError::Invalid(
            "ban_delete_message_days must be between 0 and 7".to_string(),
        ));
    }
    if config.log_level.parse::<log::LevelFilter>().is_err() {
        return Err(ConfigError::Invalid(format!(
            "unknown log level '{}'",
            config.log_level
        )));
    }
    Ok(())
}
