//! Standard paths used by Vault7 tools

use std::path::PathBuf;

use crate::Config;

/// Standard Vault7 paths
pub struct Paths {
    /// Data directory (~/.local/share/vault7)
    pub data: PathBuf,
    /// Config directory (~/.config/vault7)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("vault7");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("vault7");

        Self { data, config }
    }

    /// Path of the JSON configuration file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Root directory holding the category subdirectories.
    ///
    /// An explicit `data_dir` in the config wins over the platform default.
    pub fn vault_root(&self, config: &Config) -> PathBuf {
        config
            .data_dir
            .clone()
            .unwrap_or_else(|| self.data.join("vault_data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_location() {
        let paths = Paths::new();
        assert!(paths.config_file().ends_with("vault7/config.json"));
    }

    #[test]
    fn test_vault_root_override() {
        let paths = Paths::new();

        let config = Config::default();
        assert_eq!(paths.vault_root(&config), paths.data.join("vault_data"));

        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/elsewhere")),
            ..Config::default()
        };
        assert_eq!(paths.vault_root(&config), PathBuf::from("/tmp/elsewhere"));
    }
}
