//! Mock transport for testing.
//!
//! Allows queueing responses and capturing sent requests for verification.

use super::{Request, Response, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Mock transport for testing.
///
/// Allows queueing responses and capturing sent requests for verification.
/// Clones share state, so a test can keep a handle after moving one into
/// the engine.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    sent_requests: Vec<Request>,
    response_queue: VecDeque<Response>,
    default_response: Option<Response>,
    fail_next_send: Option<String>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Create a new mock transport with no responses queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers every request with `200 {}`.
    pub fn always_ok() -> Self {
        let transport = Self::new();
        transport.set_default_response(Response::new(200, "{}"));
        transport
    }

    fn inner(&self) -> MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a response to be returned by the next `send()` call.
    pub fn queue_response(&self, response: Response) {
        self.inner().response_queue.push_back(response);
    }

    /// Response returned once the queue is empty.
    pub fn set_default_response(&self, response: Response) {
        self.inner().default_response = Some(response);
    }

    /// Delay every `send()` by this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.inner().delay = Some(delay);
    }

    /// Get all requests that were sent.
    pub fn sent_requests(&self) -> Vec<Request> {
        self.inner().sent_requests.clone()
    }

    /// Get the last request that was sent.
    pub fn last_sent(&self) -> Option<Request> {
        self.inner().sent_requests.last().cloned()
    }

    /// Cause the next send() to fail with the given error.
    pub fn fail_next_send(&self, error: &str) {
        self.inner().fail_next_send = Some(error.to_string());
    }

    /// Clear all state (requests, queue, failures, delay).
    pub fn reset(&self) {
        *self.inner() = MockTransportInner::default();
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request, timeout: Duration) -> Result<Response, TransportError> {
        let (result, delay) = {
            let mut inner = self.inner();
            inner.sent_requests.push(request);

            // Check for forced failure
            let result = match inner.fail_next_send.take() {
                Some(error) => Err(TransportError::ConnectionFailed(error)),
                None => inner
                    .response_queue
                    .pop_front()
                    .or_else(|| inner.default_response.clone())
                    .ok_or_else(|| TransportError::ConnectionFailed("no response queued".into())),
            };
            (result, inner.delay)
        };

        if let Some(delay) = delay {
            if delay > timeout {
                tokio::time::sleep(timeout).await;
                return Err(TransportError::Timeout);
            }
            tokio::time::sleep(delay).await;
        }

        result
    }
}
