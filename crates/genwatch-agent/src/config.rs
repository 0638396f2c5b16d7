//! Agent configuration.

use anyhow::{Context, Result};
use genwatch_adapter_http::auth::DEFAULT_PASSWORD;
use genwatch_adapter_http::TransportConfig;

/// Agent configuration.
///
/// The controller host is the only required setting. The poll interval is
/// fixed and not configurable.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Controller connection
    pub device: TransportConfig,
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GENWATCH_HOST`: controller host or `host:port` (required)
    /// - `GENWATCH_PASSWORD`: password of the `admin` account (default `cummins`)
    ///
    /// # Errors
    ///
    /// Returns error if `GENWATCH_HOST` is missing or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns error if `GENWATCH_HOST` is missing or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("GENWATCH_HOST")
            .filter(|host| !host.trim().is_empty())
            .context("GENWATCH_HOST is required")?;

        let password = lookup("GENWATCH_PASSWORD").unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

        Ok(Self {
            device: TransportConfig {
                host: host.trim().to_string(),
                password,
                timeout: None,
            },
        })
    }
}
