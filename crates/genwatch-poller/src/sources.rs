//! What each coordinator fetches and how it decodes it.

use async_trait::async_trait;
use genwatch_adapter_http::{Transport, TransportError};
use genwatch_core::settings::{
    parse_exercise_page, parse_loads_data, parse_loads_page, EXERCISE_PATH, LOADS_DATA_PATH,
    LOADS_PATH,
};
use genwatch_core::{parse_status, ParseError, Snapshot};

/// Status feed path.
pub const STATUS_PATH: &str = "/index_data.html";

/// A set of endpoints that together produce one snapshot.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Coordinator name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Fetch and decode every required endpoint, in order.
    ///
    /// # Errors
    ///
    /// Returns error if any endpoint fails at the network level, answers with
    /// a status other than 200, or cannot be decoded.
    async fn fetch(&self, transport: &dyn Transport) -> Result<Snapshot, SourceError>;
}

/// Telemetry from `/index_data.html`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusSource;

#[async_trait]
impl SnapshotSource for StatusSource {
    fn name(&self) -> &'static str {
        "status"
    }

    async fn fetch(&self, transport: &dyn Transport) -> Result<Snapshot, SourceError> {
        let body = get_page(transport, STATUS_PATH).await?;
        parse_status(&body).map_err(|source| SourceError::Parse {
            path: STATUS_PATH,
            source,
        })
    }
}

/// Load management and exercise schedule from the settings pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsSource;

#[async_trait]
impl SnapshotSource for SettingsSource {
    fn name(&self) -> &'static str {
        "settings"
    }

    async fn fetch(&self, transport: &dyn Transport) -> Result<Snapshot, SourceError> {
        let mut snapshot = parse_loads_page(&get_page(transport, LOADS_PATH).await?);
        snapshot.merge(parse_loads_data(&get_page(transport, LOADS_DATA_PATH).await?));
        snapshot.merge(parse_exercise_page(&get_page(transport, EXERCISE_PATH).await?));
        Ok(snapshot)
    }
}

/// GET a page and insist on 200.
async fn get_page(transport: &dyn Transport, path: &'static str) -> Result<String, SourceError> {
    let response = transport
        .fetch(path, None)
        .await
        .map_err(|source| SourceError::Transport { path, source })?;

    if !response.is_ok() {
        return Err(SourceError::Status {
            path,
            status: response.status_code,
        });
    }

    Ok(response.body)
}

/// Errors that can occur while fetching a source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Network-level failure
    #[error("{path}: {source}")]
    Transport {
        /// Endpoint path
        path: &'static str,
        /// Transport failure
        source: TransportError,
    },
    /// Non-200 answer
    #[error("{path}: HTTP status {status}")]
    Status {
        /// Endpoint path
        path: &'static str,
        /// Status code returned
        status: u16,
    },
    /// Undecodable body
    #[error("{path}: {source}")]
    Parse {
        /// Endpoint path
        path: &'static str,
        /// Parser failure
        source: ParseError,
    },
}
