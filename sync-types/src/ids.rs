//! Identity types for captured badges.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::RecordError;

/// The business identifier for an attendee badge.
///
/// Used as the join key across scan and note records. Validated to be
/// non-empty once at the boundary so the rest of the system can rely on it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessCode(String);

impl AccessCode {
    /// Create an access code, trimming surrounding whitespace.
    pub fn new(code: &str) -> Result<Self, RecordError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(RecordError::InvalidAccessCode(code.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessCode({})", self.0)
    }
}

impl AsRef<str> for AccessCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for AccessCode {
    type Error = RecordError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for AccessCode {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<AccessCode> for String {
    fn from(code: AccessCode) -> Self {
        code.0
    }
}

/// The raw colon-delimited payload read off a badge.
///
/// ```text
/// <access code>:<...>:<validator>
/// ```
///
/// The first segment names the attendee, the last segment is the validator
/// token that authorizes the capture against the remote service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScanData(String);

impl ScanData {
    /// Wrap a raw badge payload, rejecting payloads without a validator.
    pub fn parse(raw: &str) -> Result<Self, RecordError> {
        let data = Self(raw.to_string());
        if data.validator().is_empty() {
            return Err(RecordError::MalformedScanData(format!(
                "no validator in {:?}",
                raw
            )));
        }
        Ok(data)
    }

    /// First segment, the access code as printed on the badge.
    pub fn embedded_code(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }

    /// Last segment, the badge validator token.
    pub fn validator(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or_default()
    }

    /// The raw payload.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ScanData {
    type Error = RecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ScanData> for String {
    fn from(data: ScanData) -> Self {
        data.0
    }
}

impl fmt::Debug for ScanData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanData")
            .field("embedded_code", &self.embedded_code())
            .field("validator", &"[REDACTED]")
            .finish()
    }
}
