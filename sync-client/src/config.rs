//! Configuration for the capture queue.

use std::time::Duration;

/// Default API prefix on the lead retrieval host.
pub const DEFAULT_API_PREFIX: &str = "/2023/api/v1";

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for [`SyncEngine`](crate::SyncEngine) and
/// [`PatchChannel`](crate::PatchChannel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path prefix prepended to every endpoint. Part of the signed path.
    pub api_prefix: String,
    /// Deadline for a single request. A timeout counts as a transport failure.
    pub request_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Set the API prefix.
    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
