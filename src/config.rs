use std::{fs, path::Path};

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "api.nature.global";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("couldn't open configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0} must not be empty")]
    Empty(&'static str),
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct NatureRemoConfig {
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct PromHttpConfig {
    pub listen_address: String,
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Config {
    pub nature_remo: NatureRemoConfig,

    pub promhttp: PromHttpConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Config::parse(&config_str)
    }

    pub fn parse(config_str: &str) -> Result<Config, ConfigError> {
        let mut config: Config = serde_yaml::from_str(config_str)?;

        if config.nature_remo.base_url.trim().is_empty() {
            config.nature_remo.base_url = default_base_url();
        }

        if config.nature_remo.api_key.is_empty() {
            return Err(ConfigError::Empty("nature_remo.api_key"));
        }

        if config.promhttp.listen_address.is_empty() {
            return Err(ConfigError::Empty("promhttp.listen_address"));
        }

        Ok(config)
    }
}
