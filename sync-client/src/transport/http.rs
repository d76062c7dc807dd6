//! HTTP transport backed by reqwest.

use super::{Request, Response, Transport, TransportError};
use async_trait::async_trait;
use leadsync_core::Method;
use std::time::Duration;

/// Transport that talks to the lead retrieval host over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given host, e.g. `https://us.pycon.org`.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The host requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request, timeout: Duration) -> Result<Response, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::ReceiveFailed(e.to_string())
            }
        })?;

        Ok(Response::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let transport = HttpTransport::new("https://us.pycon.org/").unwrap();
        assert_eq!(transport.base_url(), "https://us.pycon.org");
    }

    #[tokio::test]
    async fn unreachable_host_is_connection_failure() {
        // Port 9 on localhost (discard) is closed in test environments
        let transport = HttpTransport::new("http://127.0.0.1:9").unwrap();
        let result = transport
            .send(Request::new(Method::Get, "/"), Duration::from_secs(2))
            .await;
        assert!(matches!(
            result,
            Err(TransportError::ConnectionFailed(_)) | Err(TransportError::Timeout)
        ));
    }
}
