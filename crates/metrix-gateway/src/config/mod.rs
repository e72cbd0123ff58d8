//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use metrix_core::error::{MetrixError, Result};

pub use schema::{GatewaySection, MetrixConfig};

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "METRIX_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "metrix.yaml";

pub fn load_from_file(path: &str) -> Result<MetrixConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetrixError::BadConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<MetrixConfig> {
    let cfg: MetrixConfig = serde_yaml::from_str(s)
        .map_err(|e| MetrixError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Path from `METRIX_CONFIG`, falling back to `metrix.yaml`.
pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}
