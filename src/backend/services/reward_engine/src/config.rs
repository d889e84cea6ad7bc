use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::utils::ConfigError;

/// Configuration for the reward engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Module account escrowing program funds
    pub module_account: String,
    /// Page size used when a query does not ask for one
    pub default_page_limit: usize,
    /// Largest page size a query may ask for
    pub max_page_limit: usize,
    /// Default minimum rollover amount, as a percentage of the total pool
    pub minimum_rollover_percent: u8,
    /// Epoch identifier whose end runs cleanup. Cleanup runs every block when unset.
    pub cleanup_epoch_identifier: Option<String>,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            module_account: "reward".to_string(),
            default_page_limit: 100,
            max_page_limit: 1_000,
            minimum_rollover_percent: 10,
            cleanup_epoch_identifier: None,
        }
    }
}

impl RewardConfig {
    /// Load configuration from file, writing the defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let config_str = fs::read_to_string(path)?;
        Self::from_toml_str(&config_str)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml)?;

        Ok(())
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<RewardConfig>(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.module_account.trim().is_empty() {
            return Err(ConfigError::Invalid("module account cannot be blank".to_string()));
        }
        if self.default_page_limit == 0 || self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::Invalid(format!(
                "default page limit {} must be between 1 and max page limit {}",
                self.default_page_limit, self.max_page_limit
            )));
        }
        if self.minimum_rollover_percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "minimum rollover percent {} cannot exceed 100",
                self.minimum_rollover_percent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = RewardConfig::from_toml_str("default_page_limit = 25\n").unwrap();
        assert_eq!(config.default_page_limit, 25);
        assert_eq!(config.module_account, "reward");
        assert_eq!(config.minimum_rollover_percent, 10);
        assert_eq!(config.cleanup_epoch_identifier, None);
    }

    #[test]
    fn test_rejects_invalid_limits() {
        assert!(RewardConfig::from_toml_str("default_page_limit = 0\n").is_err());
        assert!(RewardConfig::from_toml_str("minimum_rollover_percent = 101\n").is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("reward-engine-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = RewardConfig::default();
        config.cleanup_epoch_identifier = Some("day".to_string());
        config.save(&path).unwrap();

        assert_eq!(RewardConfig::load(&path).unwrap(), config);
        fs::remove_dir_all(&dir).unwrap();
    }
}
