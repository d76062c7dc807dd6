//! CLI command implementations.

pub mod login;
pub mod note;
pub mod push_state;
pub mod retry;
pub mod scan;
pub mod show;

use anyhow::{Context, Result};
use async_trait::async_trait;
use leadsync_client::{
    HttpTransport, JsonFileStore, MockTransport, Request, Response, StoredCredentials, SyncEngine,
    Transport, TransportError,
};
use leadsync_types::AccessCode;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;

/// Subdirectory of the data dir holding the key-value store.
pub const STORE_DIR: &str = "store";

/// Transport chosen at startup.
pub enum CliTransport {
    /// Real HTTPS transport.
    Http(HttpTransport),
    /// Answers every request with `200 {}` (for testing/demo).
    Mock(MockTransport),
}

#[async_trait]
impl Transport for CliTransport {
    async fn send(&self, request: Request, timeout: Duration) -> Result<Response, TransportError> {
        match self {
            CliTransport::Http(t) => t.send(request, timeout).await,
            CliTransport::Mock(t) => t.send(request, timeout).await,
        }
    }
}

/// Engine as wired by the CLI.
pub type Engine = SyncEngine<JsonFileStore, CliTransport, StoredCredentials<JsonFileStore>>;

/// Open the store under `data_dir`.
pub async fn open_store(data_dir: &Path) -> Result<JsonFileStore> {
    JsonFileStore::open(data_dir.join(STORE_DIR))
        .await
        .context("Failed to open local store")
}

/// Build an engine over the local store.
pub async fn open_engine(data_dir: &Path, config: &Config, use_mock: bool) -> Result<Engine> {
    let store = open_store(data_dir).await?;

    let transport = if use_mock {
        tracing::debug!("Using mock transport");
        CliTransport::Mock(MockTransport::always_ok())
    } else {
        tracing::debug!(base_url = %config.remote.base_url, "Using HTTP transport");
        let http = HttpTransport::new(&config.remote.base_url)
            .context("Failed to create HTTP transport")?;
        CliTransport::Http(http)
    };

    Ok(SyncEngine::new(
        config.engine_config(),
        store.clone(),
        transport,
        StoredCredentials::new(store),
    ))
}

/// Parse an access code argument.
pub fn parse_code(raw: &str) -> Result<AccessCode> {
    AccessCode::new(raw).context("Invalid access code")
}
