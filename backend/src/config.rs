//! Server configuration, read from `CATALOG_*` environment variables.

use common::url::UrlContext;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_host: String,
    pub bind_port: u16,
    pub database: PathBuf,
    pub storage_dir: PathBuf,
    /// Default URL options for absolute download links. `None` when no host
    /// is configured; links then stay relative.
    pub url_context: Option<UrlContext>,
    pub seed: bool,
    pub upload_limit_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source; `from_env` passes
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url_context = match var("CATALOG_URL_HOST") {
            Some(host) => Some(UrlContext::new(
                var("CATALOG_URL_PROTOCOL").unwrap_or_else(|| "http".to_string()),
                host,
                parse_opt("CATALOG_URL_PORT", var("CATALOG_URL_PORT"))?,
            )),
            None => None,
        };

        let upload_limit_mb: usize = parse_opt("CATALOG_UPLOAD_LIMIT_MB", var("CATALOG_UPLOAD_LIMIT_MB"))?.unwrap_or(512);
        let upload_limit_bytes = upload_limit_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| ConfigError::Invalid {
                name: "CATALOG_UPLOAD_LIMIT_MB",
                value: upload_limit_mb.to_string(),
            })?;

        Ok(Self {
            bind_host: var("CATALOG_BIND_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            bind_port: parse_opt("CATALOG_BIND_PORT", var("CATALOG_BIND_PORT"))?.unwrap_or(8080),
            database: var("CATALOG_DATABASE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("catalog.sqlite")),
            storage_dir: var("CATALOG_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("storage")),
            url_context,
            seed: var("CATALOG_SEED")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            upload_limit_bytes,
        })
    }
}

fn parse_opt<T: FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { name, value: v.clone() })
        })
        .transpose()
}
