//! Best-effort state push.

use leadsync_core::Endpoint;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::credentials::CredentialProvider;
use crate::transport::Transport;

/// Mirrors device-local UI state to the remote as a signed PATCH.
///
/// Pushes run detached. A failure is logged and dropped; it never reaches
/// the caller and never touches the capture queue.
pub struct PatchChannel<T: Transport, C: CredentialProvider> {
    api: ApiClient<T, C>,
}

impl<T: Transport, C: CredentialProvider> Clone for PatchChannel<T, C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
        }
    }
}

impl<T: Transport, C: CredentialProvider> PatchChannel<T, C> {
    /// Create a channel over an existing API client.
    pub fn new(api: ApiClient<T, C>) -> Self {
        Self { api }
    }
}

impl<T, C> PatchChannel<T, C>
where
    T: Transport + 'static,
    C: CredentialProvider + 'static,
{
    /// Push `payload` in the background.
    ///
    /// The returned handle only tells whether the task finished; dropping it
    /// does not cancel the push.
    pub fn push_state(&self, payload: &Value) -> JoinHandle<()> {
        let api = self.api.clone();
        let body = payload.to_string();

        tokio::spawn(async move {
            match api.send(Endpoint::MobileState, Some(body)).await {
                Ok(response) => tracing::debug!(status = response.status, "Mobile state pushed"),
                Err(e) => tracing::warn!("Unable to persist mobile state: {}", e),
            }
        })
    }
}
