//! Transport abstraction for leadsync.
//!
//! This module provides a pluggable transport layer that abstracts the
//! underlying HTTP client (reqwest, mock for testing).
//!
//! # Design
//!
//! The transport is request/response oriented and stateless:
//! - `send()` performs one request and returns the raw response
//! - the caller supplies the deadline
//! - any status code is returned as a [`Response`]; the caller decides
//!   what counts as success
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.queue_response(Response::ok_json(&json!({"data": {}})));
//! let response = transport.send(request, Duration::from_secs(2)).await?;
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use leadsync_core::Method;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be delivered.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Deadline elapsed before a response arrived.
    #[error("request timeout")]
    Timeout,

    /// Remote answered with a non-2xx status.
    #[error("remote returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// Response body could not be read.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// A request to the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Base-relative path including query string.
    pub path: String,
    /// Optional body.
    pub body: Option<String>,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Create a request with no body and no headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// Attach a body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response from the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response carrying the given JSON.
    pub fn ok_json(value: &Value) -> Self {
        Self::new(200, value.to_string())
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as a JSON object, if it is one.
    pub fn json_object(&self) -> Option<Map<String, Value>> {
        match serde_json::from_slice(&self.body) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// The body decoded as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport trait for performing requests against the remote service.
///
/// Implementations handle the underlying HTTP mechanism. They must not
/// retry on their own; retries are driven by re-invoking the queue.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request, giving up after `timeout`.
    async fn send(&self, request: Request, timeout: Duration) -> Result<Response, TransportError>;
}
