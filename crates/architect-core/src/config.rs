use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dialogue::DEFAULT_REPLY_DELAY;

pub const DEFAULT_CHAT_URL: &str = "http://localhost:3000/api/chat";
pub const DEFAULT_INTAKE_URL: &str = "https://api.web3forms.com/submit";
/// Placeholder until a real Web3Forms access key is configured.
pub const PLACEHOLDER_ACCESS_KEY: &str = "YOUR_WEB3FORMS_ACCESS_KEY";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intake_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_delay_ms: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config file {:?}: {}", path, e))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn chat_url(&self) -> &str {
        self.chat_url.as_deref().unwrap_or(DEFAULT_CHAT_URL)
    }

    pub fn intake_url(&self) -> &str {
        self.intake_url.as_deref().unwrap_or(DEFAULT_INTAKE_URL)
    }

    pub fn access_key(&self) -> &str {
        self.access_key.as_deref().unwrap_or(PLACEHOLDER_ACCESS_KEY)
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REPLY_DELAY)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("architect").join("config.json"))
    }
}
