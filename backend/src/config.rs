//! Runtime configuration loaded from the environment.
//!
//! `main` loads a `.env` file (if present) through `dotenvy` before calling
//! [`Config::from_env`]; CLI flags override what is read here.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default directory of the upload-record store (relative to current dir)
pub const DEFAULT_REPORT_DIR: &str = ".clinqa/reports";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default upload size limit (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Backend configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Directory where upload records are stored
    pub report_dir: PathBuf,
    /// Maximum accepted request body for uploads
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Read `CLINQA_PORT`, `CLINQA_REPORT_DIR` and `CLINQA_MAX_UPLOAD_BYTES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("CLINQA_PORT") {
            config.port = parse_var("CLINQA_PORT", &port)?;
        }
        if let Some(dir) = lookup("CLINQA_REPORT_DIR") {
            if !dir.trim().is_empty() {
                config.report_dir = PathBuf::from(dir);
            }
        }
        if let Some(limit) = lookup("CLINQA_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_var("CLINQA_MAX_UPLOAD_BYTES", &limit)?;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}
