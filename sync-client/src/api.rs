//! Signed requests to the lead retrieval API.

use std::sync::Arc;

use leadsync_core::{sign, Endpoint};

use crate::config::EngineConfig;
use crate::credentials::{CredentialProvider, Credentials};
use crate::error::SyncError;
use crate::transport::{Request, Response, Transport, TransportError};

/// Signs and sends requests, enforcing the configured deadline.
///
/// Shared by the engine and the patch channel. Cloning is cheap.
pub struct ApiClient<T: Transport, C: CredentialProvider> {
    transport: Arc<T>,
    credentials: Arc<C>,
    config: EngineConfig,
}

impl<T: Transport, C: CredentialProvider> Clone for ApiClient<T, C> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            credentials: Arc::clone(&self.credentials),
            config: self.config.clone(),
        }
    }
}

impl<T: Transport, C: CredentialProvider> ApiClient<T, C> {
    /// Create a client.
    pub fn new(config: EngineConfig, transport: T, credentials: C) -> Self {
        Self {
            transport: Arc::new(transport),
            credentials: Arc::new(credentials),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get a reference to the underlying transport (for testing).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sign and send a request to `endpoint`.
    ///
    /// Fails with [`SyncError::AuthMissing`] before anything is sent if no
    /// complete credentials are available. A non-2xx status and an elapsed
    /// deadline are both transport failures.
    pub async fn send(&self, endpoint: Endpoint<'_>, body: Option<String>) -> Result<Response, SyncError> {
        let credentials = self
            .credentials
            .credentials()
            .await?
            .filter(Credentials::is_complete)
            .ok_or(SyncError::AuthMissing)?;

        let method = endpoint.method();
        let path = endpoint.path(&self.config.api_prefix);
        let auth = sign(
            method,
            &path,
            body.as_deref().unwrap_or(""),
            credentials.secret(),
            &credentials.api_key,
        );

        let mut request = Request::new(method, path);
        for (name, value) in auth.pairs() {
            request = request.with_header(name, value);
        }
        if let Some(body) = body {
            request = request
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        let timeout = self.config.request_timeout;
        let response = tokio::time::timeout(timeout, self.transport.send(request, timeout))
            .await
            .map_err(|_| TransportError::Timeout)??;

        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                body: response.text(),
            }
            .into());
        }

        Ok(response)
    }
}
