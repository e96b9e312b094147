/*
[INPUT]:  YAML configuration file, command-line overrides
[OUTPUT]: Parsed CLI configuration and adapter configs derived from it
[POS]:    Configuration layer - remote host connection settings
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use warden_adapter::{BackendConfig, ClientConfig};

/// Connection settings for the remote container host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Root URL of the remote host (e.g., "http://10.0.0.5:7777")
    pub base_url: String,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Grace time reported when a container cannot provide its own
    #[serde(default = "default_grace_time_secs")]
    pub grace_time_secs: u64,
    /// Treat destroying an unknown handle as success
    #[serde(default)]
    pub destroy_missing_ok: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_grace_time_secs() -> u64 {
    300
}

impl CliConfig {
    /// Config with defaults for everything but the URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            grace_time_secs: default_grace_time_secs(),
            destroy_missing_ok: false,
        }
    }

    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the effective config from an optional file and an optional `--url`
    pub fn resolve(path: Option<&Path>, url: Option<&str>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let path_str = path.to_str().context("config path must be valid utf-8")?;
                Self::from_file(path_str).context("load config")?
            }
            None => {
                let Some(url) = url else {
                    bail!("either --config or --url must be provided");
                };
                Self::with_base_url(url)
            }
        };

        if let Some(url) = url {
            config.base_url = url.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            bail!("timeouts must be greater than zero");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            grace_time: Duration::from_secs(self.grace_time_secs),
            destroy_missing_ok: self.destroy_missing_ok,
        }
    }
}
