//! Configuration module for pxkit-cli.
//!
//! Loads the TOML file and applies command line overrides.

pub mod file;

use crate::config::file::FileConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub public_key: Option<String>,
    pub private_key: Option<String>,
}

pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Read the file, apply overrides and validate.
    pub fn load(&self) -> Result<FileConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content)
    }

    fn load_str(&self, config_content: &str) -> Result<FileConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(config_content)?;

        if let Some(public_key) = &self.overrides.public_key {
            file_config.gateway.public_key = Some(public_key.clone());
        }
        if let Some(private_key) = &self.overrides.private_key {
            file_config.gateway.private_key = Some(private_key.clone());
        }

        self.validate(&file_config)?;
        Ok(file_config)
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if !config.gateway.has_credentials() {
            return Err(ConfigError::ValidationError(
                "gateway needs a public_key or a private_key".to_string(),
            ));
        }
        for (name, endpoint) in [
            ("get_customer", &config.merchant.get_customer),
            ("create_payment", &config.merchant.create_payment),
            ("get_discount", &config.merchant.get_discount),
        ] {
            let Some(endpoint) = endpoint else {
                continue;
            };
            if let Err(e) = endpoint.url() {
                return Err(ConfigError::ValidationError(format!(
                    "merchant endpoint {name} is not a valid URL: {e}"
                )));
            }
        }
        if config
            .tracking
            .as_ref()
            .is_some_and(|tracking| tracking.package_name.is_empty())
        {
            return Err(ConfigError::ValidationError(
                "tracking.package_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
