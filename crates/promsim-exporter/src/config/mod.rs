//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use promsim_core::error::{PromError, Result};

pub use schema::{EndpointSpec, ExporterConfig, ExporterSection, WorkloadSection};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PROMSIM_CONFIG";
/// Config file used when the variable is unset.
pub const DEFAULT_CONFIG_PATH: &str = "promsim.yaml";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| PromError::Internal(format!("read config {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| PromError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config path from the environment and load it. A missing
/// default file falls back to built-in defaults; an explicitly named file
/// must exist.
pub fn load_from_env() -> Result<ExporterConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => load_from_file(path),
        Err(_) if !Path::new(DEFAULT_CONFIG_PATH).exists() => {
            tracing::info!(path = DEFAULT_CONFIG_PATH, "config file not found, using defaults");
            let cfg = ExporterConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(_) => load_from_file(DEFAULT_CONFIG_PATH),
    }
}
