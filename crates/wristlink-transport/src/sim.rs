//! Scripted links for headless tests.
//!
//! [`FlakyLink`] records every send attempt and fails the attempts you tell
//! it to, so tests can assert that a failed tick never suppresses the next
//! one. [`UnsupportedLink`] models a host without paired-device
//! connectivity at all.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use wristlink_types::WristError;

use crate::link::TransportLink;

// ────────────────────────────────────────────────────────────────────────────
// FlakyLink
// ────────────────────────────────────────────────────────────────────────────

/// A link that fails `send` on a chosen set of attempt indices (0-based) and
/// records every attempted payload, delivered or not.
pub struct FlakyLink {
    fail_on: HashSet<usize>,
    attempts: Mutex<Vec<Value>>,
    next_attempt: AtomicUsize,
    delivered: broadcast::Sender<Value>,
    activated: AtomicBool,
}

impl FlakyLink {
    /// A link whose sends all succeed.
    pub fn reliable() -> Self {
        Self::failing_on([])
    }

    /// A link that fails the send attempts at the given 0-based indices.
    pub fn failing_on(indices: impl IntoIterator<Item = usize>) -> Self {
        let (delivered, _) = broadcast::channel(64);
        Self {
            fail_on: indices.into_iter().collect(),
            attempts: Mutex::new(Vec::new()),
            next_attempt: AtomicUsize::new(0),
            delivered,
            activated: AtomicBool::new(false),
        }
    }

    /// Every payload handed to `send`, in attempt order, including ones that
    /// were failed.
    pub fn attempts(&self) -> Vec<Value> {
        self.attempts.lock().expect("attempts lock").clone()
    }

    /// Number of send attempts made so far.
    pub fn attempt_count(&self) -> usize {
        self.next_attempt.load(Ordering::SeqCst)
    }

    /// Whether `activate` has been called.
    pub fn is_activated(&self) -> bool {
        self.activated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportLink for FlakyLink {
    fn is_supported(&self) -> bool {
        true
    }

    async fn activate(&self) -> Result<(), WristError> {
        self.activated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send(&self, payload: Value) -> Result<(), WristError> {
        let index = self.next_attempt.fetch_add(1, Ordering::SeqCst);
        self.attempts
            .lock()
            .expect("attempts lock")
            .push(payload.clone());

        if self.fail_on.contains(&index) {
            return Err(WristError::SendFailed(format!(
                "scripted failure at attempt {index}"
            )));
        }
        // Delivery with no subscriber is fine here; the recorder already has
        // the payload.
        let _ = self.delivered.send(payload);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.delivered.subscribe()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// UnsupportedLink
// ────────────────────────────────────────────────────────────────────────────

/// A host with no paired-device connectivity. Every operation fails.
#[derive(Default)]
pub struct UnsupportedLink;

#[async_trait]
impl TransportLink for UnsupportedLink {
    fn is_supported(&self) -> bool {
        false
    }

    async fn activate(&self) -> Result<(), WristError> {
        Err(WristError::Activation(
            "connectivity not supported on this host".to_string(),
        ))
    }

    async fn send(&self, _payload: Value) -> Result<(), WristError> {
        Err(WristError::SendFailed(
            "connectivity not supported on this host".to_string(),
        ))
    }

    fn subscribe(&self) -> broadcast::Receiver<Value> {
        // A channel nothing ever publishes to.
        let (sender, receiver) = broadcast::channel(1);
        drop(sender);
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn flaky_link_fails_only_scripted_attempts() {
        let link = FlakyLink::failing_on([1]);
        assert!(link.send(json!({"seq": 0})).await.is_ok());
        assert!(link.send(json!({"seq": 1})).await.is_err());
        assert!(link.send(json!({"seq": 2})).await.is_ok());
        assert_eq!(link.attempt_count(), 3);
    }

    #[tokio::test]
    async fn flaky_link_records_failed_attempts_too() {
        let link = FlakyLink::failing_on([0]);
        let _ = link.send(json!({"seq": 0})).await;
        let attempts = link.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0]["seq"], json!(0));
    }

    #[tokio::test]
    async fn flaky_link_delivers_successful_sends_to_subscribers() {
        let link = FlakyLink::reliable();
        let mut inbox = link.subscribe();
        link.send(json!({"seq": 7})).await.unwrap();
        assert_eq!(inbox.recv().await.unwrap()["seq"], json!(7));
    }

    #[tokio::test]
    async fn unsupported_link_rejects_everything() {
        let link = UnsupportedLink;
        assert!(!link.is_supported());
        assert!(link.activate().await.is_err());
        assert!(link.send(json!({})).await.is_err());
        let mut inbox = link.subscribe();
        assert!(matches!(
            inbox.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
