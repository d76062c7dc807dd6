//! Error types for leadsync records.

use thiserror::Error;

/// Errors that can occur while building or decoding records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Access code is empty or contains only whitespace.
    #[error("invalid access code: {0:?}")]
    InvalidAccessCode(String),

    /// Scan payload has no usable validator segment.
    #[error("malformed scan data: {0}")]
    MalformedScanData(String),

    /// JSON encoding failed.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON decoding failed.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}
