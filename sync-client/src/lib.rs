//! # sync-client
//!
//! Offline-first capture queue for lead retrieval devices.
//!
//! Badge captures and notes are written to a local key-value store first
//! and promoted once the remote service acknowledges them. Nothing is lost
//! when the network is down and nothing is submitted twice.
//!
//! ## Features
//!
//! - **Durable Queue**: every capture is stored as `pending` before any request is made
//! - **Exactly-Once Capture**: at most one pending and one synced record per access code
//! - **Signed Requests**: SHA-1 request signatures via sync-core
//! - **Pluggable I/O**: storage, transport and credentials are traits (memory, file, HTTP, mock)
//!
//! ## Example
//!
//! ```ignore
//! use leadsync_client::{EngineConfig, HttpTransport, MemoryStore, StoredCredentials, SyncEngine};
//!
//! let store = MemoryStore::new();
//! let transport = HttpTransport::new("https://us.pycon.org")?;
//! let credentials = StoredCredentials::new(store.clone());
//! let engine = SyncEngine::new(EngineConfig::default(), store, transport, credentials);
//!
//! let code = AccessCode::new("A1")?;
//! engine.submit_scan(&code, ScanData::parse("A1:xyz:VALIDATOR1")?).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod locks;
pub mod patch;
pub mod store;
pub mod transport;

pub use api::ApiClient;
pub use config::EngineConfig;
pub use credentials::{CredentialProvider, Credentials, StaticCredentials, StoredCredentials};
pub use engine::{ScanOutcome, SyncEngine};
pub use error::{StoreError, SyncError};
pub use locks::{KeyedLockGuard, KeyedLocks};
pub use patch::PatchChannel;
pub use store::{JsonFileStore, KvStore, MemoryStore, SyncStore};
pub use transport::{
    HttpTransport, MockTransport, Request, Response, Transport, TransportError,
};
