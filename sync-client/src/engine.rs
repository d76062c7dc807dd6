//! SyncEngine - the capture queue.
//!
//! This module provides [`SyncEngine`], which moves each locally created
//! record from `pending` to `synced` once the remote acknowledges it.
//!
//! # Architecture
//!
//! ```text
//! capture → SyncStore (pending) → ApiClient → Transport → remote
//!                ↑                                 │
//!                └──── synced write, pending delete ┘
//! ```
//!
//! # Guarantees
//!
//! - A record is durable locally before any request is made.
//! - At most one pending and one synced capture exist per access code;
//!   a synced capture closes the code for good.
//! - On promotion the synced record is written before the pending one is
//!   deleted, so an interruption leaves the capture visible as synced.
//! - A failed or timed-out request leaves the pending record untouched.
//!   The engine never retries on its own; callers re-invoke.
//!
//! Every operation on a code runs under that code's lock from
//! [`KeyedLocks`], so concurrent submissions collapse into one capture.

use chrono::Utc;
use leadsync_core::{decide_capture, CaptureDecision, Endpoint};
use leadsync_types::{AccessCode, NoteRecord, ScanData, ScanRecord, ScanStatus};
use serde_json::Map;

use crate::api::ApiClient;
use crate::config::EngineConfig;
use crate::credentials::CredentialProvider;
use crate::error::SyncError;
use crate::locks::KeyedLocks;
use crate::patch::PatchChannel;
use crate::store::{KvStore, SyncStore};
use crate::transport::Transport;

/// Result of a capture attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The remote acknowledged the capture; this is the synced record.
    Captured(ScanRecord),
    /// The code was already closed. Nothing was sent.
    AlreadyCaptured,
}

/// The offline-first capture queue.
///
/// Holds no durable state of its own: everything lives in the store.
pub struct SyncEngine<S: KvStore, T: Transport, C: CredentialProvider> {
    store: SyncStore<S>,
    api: ApiClient<T, C>,
    locks: KeyedLocks,
}

impl<S: KvStore, T: Transport, C: CredentialProvider> SyncEngine<S, T, C> {
    /// Create a new engine.
    pub fn new(config: EngineConfig, store: S, transport: T, credentials: C) -> Self {
        Self {
            store: SyncStore::new(store),
            api: ApiClient::new(config, transport, credentials),
            locks: KeyedLocks::new(),
        }
    }

    /// The record store.
    pub fn store(&self) -> &SyncStore<S> {
        &self.store
    }

    /// Get a reference to the underlying transport (for testing).
    pub fn transport(&self) -> &T {
        self.api.transport()
    }

    /// A patch channel sharing this engine's transport and credentials.
    pub fn patch_channel(&self) -> PatchChannel<T, C>
    where
        T: 'static,
        C: 'static,
    {
        PatchChannel::new(self.api.clone())
    }

    // --- Capture flow ---

    /// Record a badge capture and try to sync it.
    ///
    /// - synced record exists: no-op, [`ScanOutcome::AlreadyCaptured`]
    /// - pending record exists: retry its sync; `scan_data` is ignored
    /// - neither: write a new pending record, then sync it
    ///
    /// On a transport failure the error is returned and the pending record
    /// stays in place for the next call.
    pub async fn submit_scan(
        &self,
        code: &AccessCode,
        scan_data: ScanData,
    ) -> Result<ScanOutcome, SyncError> {
        let _guard = self.locks.lock(code).await;

        let has_synced = self.store.get_synced_scan(code).await?.is_some();
        let has_pending = self.store.get_pending_scan(code).await?.is_some();

        match decide_capture(has_pending, has_synced) {
            CaptureDecision::AlreadyCaptured { stale_pending } => {
                tracing::info!(access_code = %code, "Already captured");
                if stale_pending {
                    // promotion was interrupted after the synced write
                    match self.store.delete_pending_scan(code).await {
                        Ok(()) => tracing::debug!(access_code = %code, "Dropped leftover pending scan"),
                        Err(e) => tracing::warn!(access_code = %code, "Failed to drop leftover pending scan: {}", e),
                    }
                }
                Ok(ScanOutcome::AlreadyCaptured)
            }
            CaptureDecision::Retry => {
                tracing::debug!(access_code = %code, "Pending scan exists, retrying sync");
                self.resolve_scan_locked(code).await.map(ScanOutcome::Captured)
            }
            CaptureDecision::Create => {
                let record = ScanRecord::new(code.clone(), scan_data, Utc::now());
                if let Err(e) = self.store.put_pending_scan(code, &record).await {
                    tracing::error!(access_code = %code, "Scan failed, could not persist: {}", e);
                    return Err(e.into());
                }
                tracing::info!(access_code = %code, "Scanned");
                self.resolve_scan_locked(code).await.map(ScanOutcome::Captured)
            }
        }
    }

    /// Try to promote the pending capture for `code`.
    ///
    /// Fails with [`SyncError::AlreadySynced`] if the code is closed and
    /// [`SyncError::MissingPendingRecord`] if nothing was captured.
    pub async fn resolve_pending_scan(&self, code: &AccessCode) -> Result<ScanRecord, SyncError> {
        let _guard = self.locks.lock(code).await;

        if self.store.get_synced_scan(code).await?.is_some() {
            tracing::info!(access_code = %code, "Already captured");
            return Err(SyncError::AlreadySynced(code.clone()));
        }
        self.resolve_scan_locked(code).await
    }

    async fn resolve_scan_locked(&self, code: &AccessCode) -> Result<ScanRecord, SyncError> {
        let pending = match self.store.get_pending_scan(code).await? {
            Some(pending) => pending,
            None => {
                tracing::warn!(access_code = %code, "Unable to sync missing scan");
                return Err(SyncError::MissingPendingRecord(code.clone()));
            }
        };

        if pending.scan_data.embedded_code() != code.as_str() {
            tracing::warn!(
                access_code = %code,
                embedded = pending.scan_data.embedded_code(),
                "Badge payload names a different access code"
            );
        }

        let endpoint = Endpoint::Capture {
            access_code: code,
            validator: pending.scan_data.validator(),
        };
        let response = match self.api.send(endpoint, None).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(access_code = %code, "Unable to capture lead: {}", e);
                return Err(e);
            }
        };

        let payload = response.json_object().unwrap_or_else(|| {
            tracing::warn!(access_code = %code, "Capture response is not a JSON object");
            Map::new()
        });
        let synced = pending.promote(payload);

        // synced first: a crash after this line still reads as captured
        self.store.put_synced_scan(code, &synced).await?;
        if let Err(e) = self.store.delete_pending_scan(code).await {
            tracing::warn!(access_code = %code, "Captured, but pending scan not removed: {}", e);
        }

        tracing::info!(access_code = %code, "Captured lead");
        Ok(synced)
    }

    // --- Note flow ---

    /// Attach a note to `code` and try to sync it.
    ///
    /// The display note is overwritten first and is not rolled back if the
    /// sync fails. Any scan record for the code is flagged as having a
    /// note; that flag is best effort and its failure is only logged.
    pub async fn submit_note(&self, code: &AccessCode, note: &str) -> Result<(), SyncError> {
        let _guard = self.locks.lock(code).await;

        let record = NoteRecord::new(code.clone(), note);
        self.store.put_note(code, &record).await?;
        self.store.put_pending_note(code, &record).await?;

        self.flag_has_note(code).await;

        self.resolve_note_locked(code).await
    }

    /// Try to submit the pending note for `code`.
    pub async fn resolve_pending_note(&self, code: &AccessCode) -> Result<(), SyncError> {
        let _guard = self.locks.lock(code).await;
        self.resolve_note_locked(code).await
    }

    async fn resolve_note_locked(&self, code: &AccessCode) -> Result<(), SyncError> {
        let pending = match self.store.get_pending_note(code).await? {
            Some(pending) => pending,
            None => {
                tracing::warn!(access_code = %code, "Unable to sync note for missing pending note");
                return Err(SyncError::MissingPendingRecord(code.clone()));
            }
        };

        let body = pending.to_body()?;
        if let Err(e) = self
            .api
            .send(Endpoint::Note { access_code: code }, Some(body))
            .await
        {
            tracing::warn!(access_code = %code, "Unable to sync note: {}", e);
            return Err(e);
        }

        self.store.delete_pending_note(code).await?;
        tracing::info!(access_code = %code, "Note synced");
        Ok(())
    }

    async fn flag_has_note(&self, code: &AccessCode) {
        match self.store.get_synced_scan(code).await {
            Ok(Some(mut synced)) if !synced.has_note => {
                synced.has_note = true;
                if let Err(e) = self.store.put_synced_scan(code, &synced).await {
                    tracing::warn!(access_code = %code, "Failed to flag synced scan: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(access_code = %code, "Failed to read synced scan: {}", e),
        }

        match self.store.get_pending_scan(code).await {
            Ok(Some(mut pending)) if !pending.has_note => {
                pending.has_note = true;
                if let Err(e) = self.store.put_pending_scan(code, &pending).await {
                    tracing::warn!(access_code = %code, "Failed to flag pending scan: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(access_code = %code, "Failed to read pending scan: {}", e),
        }
    }

    // --- Read side ---

    /// The synced capture if present, else the pending one.
    pub async fn fetch_scan(&self, code: &AccessCode) -> Result<Option<ScanRecord>, SyncError> {
        Ok(self.store.get_scan(code).await?)
    }

    /// The display note.
    pub async fn get_note(&self, code: &AccessCode) -> Result<Option<NoteRecord>, SyncError> {
        Ok(self.store.get_note(code).await?)
    }

    /// Where the capture for `code` stands.
    pub async fn scan_status(&self, code: &AccessCode) -> Result<ScanStatus, SyncError> {
        Ok(self.store.scan_status(code).await?)
    }
}
