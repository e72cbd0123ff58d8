use std::net::SocketAddr;

use serde::Deserialize;

use metrix_core::error::{MetrixError, Result};
use metrix_core::RegistryConfig;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetrixConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub registry: RegistryConfig,
}

impl MetrixConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetrixError::UnsupportedVersion);
        }

        self.gateway.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_max_batch_items")]
    pub max_batch_items: usize,

    /// Enables `DELETE /v1/metrics`.
    #[serde(default)]
    pub allow_reset: bool,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_batch_items: default_max_batch_items(),
            allow_reset: false,
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(1..=100_000).contains(&self.max_batch_items) {
            return Err(MetrixError::BadConfig(
                "gateway.max_batch_items must be between 1 and 100000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            MetrixError::BadConfig(format!(
                "gateway.listen must be a valid SocketAddr: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_max_batch_items() -> usize {
    1000
}
