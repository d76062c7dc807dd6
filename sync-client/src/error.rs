//! Error types for sync-client.

use leadsync_types::{AccessCode, RecordError};
use thiserror::Error;

use crate::transport::TransportError;

/// Errors from the key-value layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes are not valid JSON.
    #[error("invalid stored value: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Stored JSON does not match the record shape.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// Injected or backend-specific failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors from the capture queue.
///
/// None of these leave local state partially written: a failed sync keeps
/// the pending record exactly as it was.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The code already has a synced capture; nothing was sent.
    #[error("already synced: {0}")]
    AlreadySynced(AccessCode),

    /// Sync was requested for a code with no local pending record.
    #[error("no pending record for {0}")]
    MissingPendingRecord(AccessCode),

    /// Network failure, timeout, or non-2xx response.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// API key or shared secret not available; the request was not sent.
    #[error("credentials missing")]
    AuthMissing,

    /// Local storage failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Record could not be built or encoded.
    #[error("record error: {0}")]
    Record(#[from] RecordError),
}

impl SyncError {
    /// Whether the work is safely queued and re-invoking later may succeed.
    ///
    /// Local storage and record failures are not: the pending record may
    /// never have been written.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Transport(_) | SyncError::AuthMissing)
    }
}
