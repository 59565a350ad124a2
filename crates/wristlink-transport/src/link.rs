//! Point-to-point session abstraction and the in-process loopback pair.
//!
//! Uses [`tokio::sync::broadcast`] under the hood so delivery never blocks
//! the sender: a slow receiving side lags and loses old payloads instead of
//! applying backpressure, which matches the link's best-effort contract.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;
use wristlink_types::WristError;

/// Default per-direction channel capacity before old payloads are dropped
/// for a lagging receiver.
const DEFAULT_CAPACITY: usize = 64;

/// One end of a paired-device session.
///
/// # Contract
///
/// * `send` is fire-and-forget: it resolves as soon as the payload is handed
///   to the link, reports failure (e.g. peer unreachable) through its
///   `Result`, and is never retried by the link itself.
/// * Delivery to the peer is best-effort and carries no ordering guarantee;
///   receivers must tolerate arbitrary drops.
/// * `activate` is idempotent; callers may re-activate after a relaunch.
#[async_trait]
pub trait TransportLink: Send + Sync {
    /// Whether paired-device connectivity exists on this host at all.
    fn is_supported(&self) -> bool;

    /// Open the session. Safe to call repeatedly.
    async fn activate(&self) -> Result<(), WristError>;

    /// Hand one payload to the link. Fire-and-forget.
    async fn send(&self, payload: Value) -> Result<(), WristError>;

    /// Subscribe to payloads arriving from the peer.
    ///
    /// The returned receiver reports [`broadcast::error::RecvError::Lagged`]
    /// when the consumer falls behind; the lost payloads are gone, which is
    /// within the link's loss contract.
    fn subscribe(&self) -> broadcast::Receiver<Value>;
}

// ────────────────────────────────────────────────────────────────────────────
// Loopback pair
// ────────────────────────────────────────────────────────────────────────────

/// One end of an in-process paired link.
///
/// Obtained from [`LoopbackLink::pair`]. A payload sent on one end is
/// delivered to subscribers on the other end. Sending while the peer has no
/// live subscriber fails with [`WristError::SendFailed`], mirroring a real
/// link whose counterpart device is unreachable.
pub struct LoopbackLink {
    /// Payloads we emit toward the peer.
    outbound: broadcast::Sender<Value>,
    /// Payloads the peer emits toward us. Held to keep the channel open and
    /// to mint subscribers.
    inbound: broadcast::Sender<Value>,
    activated: Arc<AtomicBool>,
}

impl LoopbackLink {
    /// Create a connected pair of link ends with the given per-direction
    /// channel capacity.
    pub fn pair(capacity: usize) -> (LoopbackLink, LoopbackLink) {
        let (a_to_b, _) = broadcast::channel(capacity);
        let (b_to_a, _) = broadcast::channel(capacity);
        let a = LoopbackLink {
            outbound: a_to_b.clone(),
            inbound: b_to_a.clone(),
            activated: Arc::new(AtomicBool::new(false)),
        };
        let b = LoopbackLink {
            outbound: b_to_a,
            inbound: a_to_b,
            activated: Arc::new(AtomicBool::new(false)),
        };
        (a, b)
    }

    /// Connected pair with the default capacity.
    pub fn pair_default() -> (LoopbackLink, LoopbackLink) {
        Self::pair(DEFAULT_CAPACITY)
    }

    /// Whether `activate` has been called on this end.
    pub fn is_activated(&self) -> bool {
        self.activated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportLink for LoopbackLink {
    fn is_supported(&self) -> bool {
        true
    }

    async fn activate(&self) -> Result<(), WristError> {
        // Repeated activation is a no-op by contract.
        if !self.activated.swap(true, Ordering::SeqCst) {
            debug!("loopback session activated");
        }
        Ok(())
    }

    async fn send(&self, payload: Value) -> Result<(), WristError> {
        match self.outbound.send(payload) {
            Ok(_) => Ok(()),
            Err(broadcast::error::SendError(_)) => Err(WristError::SendFailed(
                "peer not reachable (no live subscriber)".to_string(),
            )),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.inbound.subscribe()
    }
}
