//! Configuration management for Vault7 tools

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Global Vault7 configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Override for the vault root directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Password gating access to the vault as a whole
    #[serde(default = "default_master_password")]
    pub master_password: String,

    /// Key required to reveal or edit obscured values
    #[serde(default = "default_decryption_key")]
    pub decryption_key: String,
}

fn default_master_password() -> String {
    "ilovetohatethat".to_string()
}

fn default_decryption_key() -> String {
    "turndownforwhat".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            master_password: default_master_password(),
            decryption_key: default_decryption_key(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &self.data_dir)
            .field("master_password", &"<redacted>")
            .field("decryption_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
