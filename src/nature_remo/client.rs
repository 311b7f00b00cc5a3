use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::config::NatureRemoConfig;
use crate::nature_remo::{Device, FetchError};

const DEVICES_PATH: &str = "/1/devices";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce the current device list.
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn fetch_devices(&self) -> Result<Vec<Device>, FetchError>;
}

/// Client for the Nature Remo cloud API.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: reqwest::Client,
    api_key: String,
    origin: String,
}

impl DeviceClient {
    /// `origin` is scheme plus authority, e.g. `https://api.nature.global`.
    pub fn new(api_key: impl Into<String>, origin: impl Into<String>) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            origin: origin.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn from_config(config: &NatureRemoConfig) -> reqwest::Result<Self> {
        Self::new(&config.api_key, format!("https://{}", config.base_url))
    }

    pub fn devices_url(&self) -> String {
        format!("{}{DEVICES_PATH}", self.origin)
    }
}

#[async_trait]
impl DeviceSource for DeviceClient {
    async fn fetch_devices(&self) -> Result<Vec<Device>, FetchError> {
        let url = self.devices_url();
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}
