//! Records persisted by the capture queue.
//!
//! Field names are camelCase on disk. Records without an `accessCode` (the
//! flat layout of older clients) do not load and surface as
//! [`RecordError::Deserialization`].

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AccessCode, RecordError, ScanData};

/// One badge capture.
///
/// Lives under `pending-scan-<code>` until the remote acknowledges it, then
/// under `synced-scan-<code>` for good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    /// Attendee the badge belongs to.
    pub access_code: AccessCode,
    /// Raw badge payload.
    pub scan_data: ScanData,
    /// When the badge was captured. Never changes after creation.
    pub scanned_at: DateTime<Utc>,
    /// Set once a note has been attached to this attendee.
    #[serde(default)]
    pub has_note: bool,
    /// Capture data returned by the remote. Present only once synced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_payload: Option<Map<String, Value>>,
}

impl ScanRecord {
    /// Create a fresh, unsynced capture.
    pub fn new(access_code: AccessCode, scan_data: ScanData, scanned_at: DateTime<Utc>) -> Self {
        Self {
            access_code,
            scan_data,
            scanned_at,
            has_note: false,
            sync_payload: None,
        }
    }

    /// Merge the remote capture response into this record.
    ///
    /// Local fields are kept as they are; the remote data is carried
    /// alongside as the sync payload.
    pub fn promote(mut self, remote: Map<String, Value>) -> Self {
        self.sync_payload = Some(remote);
        self
    }

    /// Whether the remote has acknowledged this capture.
    pub fn is_synced(&self) -> bool {
        self.sync_payload.is_some()
    }

    /// Encode as a JSON value for the key-value store.
    pub fn to_value(&self) -> Result<Value, RecordError> {
        to_value(self)
    }

    /// Decode from a JSON value read from the key-value store.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        from_value(value)
    }
}

/// Free-text annotation attached to an attendee.
///
/// The same shape is stored as the display note, stored as the pending note,
/// and sent as the body of the note request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Attendee the note is about.
    pub access_code: AccessCode,
    /// Note text.
    pub note: String,
}

impl NoteRecord {
    /// Create a note record.
    pub fn new(access_code: AccessCode, note: &str) -> Self {
        Self {
            access_code,
            note: note.to_string(),
        }
    }

    /// Encode as a JSON value for the key-value store.
    pub fn to_value(&self) -> Result<Value, RecordError> {
        to_value(self)
    }

    /// Decode from a JSON value read from the key-value store.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        from_value(value)
    }

    /// Serialize as the JSON request body.
    pub fn to_body(&self) -> Result<String, RecordError> {
        serde_json::to_string(self).map_err(RecordError::Serialization)
    }
}

/// Where a capture stands for one access code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// No capture recorded.
    NotCaptured,
    /// Captured locally, waiting for the remote.
    Pending,
    /// Acknowledged by the remote; closed to new captures.
    Synced,
}

impl ScanStatus {
    /// Derive the status from which slots are occupied.
    ///
    /// A synced record dominates a leftover pending one.
    pub fn from_slots(has_pending: bool, has_synced: bool) -> Self {
        match (has_pending, has_synced) {
            (_, true) => Self::Synced,
            (true, false) => Self::Pending,
            (false, false) => Self::NotCaptured,
        }
    }
}

fn to_value<T: Serialize>(record: &T) -> Result<Value, RecordError> {
    serde_json::to_value(record).map_err(RecordError::Serialization)
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, RecordError> {
    serde_json::from_value(value).map_err(RecordError::Deserialization)
}
