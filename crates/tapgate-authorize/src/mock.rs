//! Scripted authorization transport for testing and development.

use crate::transport::{AuthorizationTransport, TransportError};
use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tapgate_core::CardReading;

#[derive(Debug, Default)]
struct MockInner {
    responses: Mutex<VecDeque<Result<String, String>>>,
    attempts: AtomicUsize,
    requests: Mutex<Vec<CardReading>>,
}

/// Scripted authorization transport.
///
/// Responses are consumed in FIFO order; every `submit` counts as one
/// attempt whether it succeeds or not. Cloneable, so a test can keep a
/// handle while the client owns another.
///
/// # Examples
///
/// ```
/// use tapgate_authorize::mock::MockAuthorizationTransport;
///
/// let transport = MockAuthorizationTransport::online();
/// transport.enqueue_body(r#"{"estadoLED":"verde"}"#);
/// assert_eq!(transport.attempts(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockAuthorizationTransport {
    connected: bool,
    inner: Arc<MockInner>,
}

impl MockAuthorizationTransport {
    /// A transport that reports connectivity.
    pub fn online() -> Self {
        Self {
            connected: true,
            inner: Arc::default(),
        }
    }

    /// A transport that reports no connectivity.
    pub fn offline() -> Self {
        Self {
            connected: false,
            inner: Arc::default(),
        }
    }

    /// Script the next response body.
    pub fn enqueue_body(&self, body: impl Into<String>) {
        self.lock_responses().push_back(Ok(body.into()));
    }

    /// Script the next submission to fail outright.
    pub fn enqueue_error(&self, message: impl Into<String>) {
        self.lock_responses().push_back(Err(message.into()));
    }

    /// Number of submissions attempted so far.
    pub fn attempts(&self) -> usize {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    /// Every reading submitted so far, in order.
    pub fn submitted_readings(&self) -> Vec<CardReading> {
        self.inner
            .requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        self.inner
            .responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl AuthorizationTransport for MockAuthorizationTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn submit(&self, reading: &CardReading) -> Result<String, TransportError> {
        self.inner.attempts.fetch_add(1, Ordering::SeqCst);
        self.inner
            .requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(reading.clone());

        match self.lock_responses().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(TransportError::Other(message)),
            None => Err(TransportError::Other("no scripted response".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapgate_core::{CardUid, ProgrammedToken};

    fn reading() -> CardReading {
        CardReading::new(
            CardUid::new(vec![0x01, 0x02, 0x03, 0x04]).unwrap(),
            ProgrammedToken::new("X"),
        )
    }

    #[tokio::test]
    async fn test_responses_consumed_in_order() {
        let transport = MockAuthorizationTransport::online();
        transport.enqueue_body("first");
        transport.enqueue_error("second fails");

        assert_eq!(transport.submit(&reading()).await.unwrap(), "first");
        assert!(transport.submit(&reading()).await.is_err());
        assert!(transport.submit(&reading()).await.is_err());
        assert_eq!(transport.attempts(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let transport = MockAuthorizationTransport::online();
        let observer = transport.clone();

        transport.enqueue_body("{}");
        transport.submit(&reading()).await.unwrap();

        assert_eq!(observer.attempts(), 1);
        assert_eq!(observer.submitted_readings().len(), 1);
    }
}
