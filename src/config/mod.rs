mod file_config;

pub use file_config::FileConfig;

use anyhow::{anyhow, Result};

use crate::catalog::EmbargoPolicy;

/// CLI arguments that take part in config resolution. Mirrors the
/// fields a TOML config file may override.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub registry_url: Option<String>,
    pub playlist_url: Option<String>,
    pub embargo_days: i64,
    pub embargo_bypass: bool,
    pub fetch_timeout_sec: u64,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub registry_url: String,
    pub playlist_url: String,
    pub embargo: EmbargoPolicy,
    pub fetch_timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let registry_url = file
            .registry_url
            .or_else(|| cli.registry_url.clone())
            .ok_or_else(|| {
                anyhow!("registry_url must be specified via --registry-url or in config file")
            })?;
        let playlist_url = file
            .playlist_url
            .or_else(|| cli.playlist_url.clone())
            .ok_or_else(|| {
                anyhow!("playlist_url must be specified via --playlist-url or in config file")
            })?;

        let embargo = EmbargoPolicy {
            days: file.embargo_days.unwrap_or(cli.embargo_days),
            bypass: file.embargo_bypass.unwrap_or(cli.embargo_bypass),
        };
        let fetch_timeout_sec = file.fetch_timeout_sec.unwrap_or(cli.fetch_timeout_sec);

        Ok(AppConfig {
            registry_url,
            playlist_url,
            embargo,
            fetch_timeout_sec,
        })
    }
}
