//! Storage key scheme.
//!
//! Every record lives under a string key derived from its access code:
//!
//! ```text
//! pending-scan-<code>   capture not yet acknowledged by the remote
//! synced-scan-<code>    capture acknowledged (terminal)
//! pending-note-<code>   note not yet acknowledged by the remote
//! note-<code>           display copy of the latest note
//! ```

use std::fmt;

use crate::AccessCode;

/// Store entry holding the API key, owned by the login flow.
pub const CREDENTIAL_KEY: &str = "key";

/// Store entry holding the shared secret, owned by the login flow.
pub const CREDENTIAL_SECRET: &str = "secret";

/// A typed storage slot for one access code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Capture waiting for the remote.
    PendingScan(AccessCode),
    /// Capture the remote has acknowledged.
    SyncedScan(AccessCode),
    /// Note waiting for the remote.
    PendingNote(AccessCode),
    /// Display copy of the latest note.
    Note(AccessCode),
}

impl StorageKey {
    fn prefix(&self) -> &'static str {
        match self {
            Self::PendingScan(_) => "pending-scan-",
            Self::SyncedScan(_) => "synced-scan-",
            Self::PendingNote(_) => "pending-note-",
            Self::Note(_) => "note-",
        }
    }

    /// The access code this slot belongs to.
    pub fn access_code(&self) -> &AccessCode {
        match self {
            Self::PendingScan(code)
            | Self::SyncedScan(code)
            | Self::PendingNote(code)
            | Self::Note(code) => code,
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix(), self.access_code())
    }
}
