//! [`Receiver`] – inbox dispatch and smoothed-orientation state.
//!
//! The transport delivers payloads on whatever task the link runs; the
//! filter state must only ever be touched by one writer. [`Receiver::run`]
//! is that marshaling point: it consumes the inbox on a single task and
//! performs decode, filter update, and renderer push inline there, so no
//! locking is needed around the three-axis state.

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use wristlink_smoothing::{AttitudeSmoother, AxisMap, DEFAULT_ALPHA};
use wristlink_transport::TransportLink;
use wristlink_types::{OrientationMessage, WristError};

use crate::render::Renderer;

/// Maintains the most recent smoothed orientation derived from whatever
/// messages actually arrive, and drives the renderer with it.
///
/// # Example
///
/// ```rust,no_run
/// use wristlink_receiver::{Receiver, RecordingRenderer};
/// use wristlink_transport::{LoopbackLink, TransportLink};
///
/// # async fn demo() {
/// let (_watch_end, phone_end) = LoopbackLink::pair_default();
/// let receiver = Receiver::new(Box::new(RecordingRenderer::new()));
/// receiver.on_connectivity_ready(&phone_end).await;
/// tokio::spawn(receiver.run(phone_end.subscribe()));
/// # }
/// ```
pub struct Receiver {
    smoother: AttitudeSmoother,
    axis_map: AxisMap,
    renderer: Box<dyn Renderer>,
}

impl Receiver {
    /// Create a receiver with the default smoothing factor and the identity
    /// axis map. Filter state starts at (0, 0, 0).
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self {
            smoother: AttitudeSmoother::new(DEFAULT_ALPHA),
            axis_map: AxisMap::IDENTITY,
            renderer,
        }
    }

    /// Replace the smoothing factor (applies to all three axes).
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.smoother = AttitudeSmoother::new(alpha);
        self
    }

    /// Replace the attitude-to-model axis mapping.
    pub fn with_axis_map(mut self, axis_map: AxisMap) -> Self {
        self.axis_map = axis_map;
        self
    }

    /// Activate the transport session. Idempotent; safe to call again after
    /// an app relaunch. An activation failure is reported but does not stop
    /// the receiver from consuming whatever does arrive.
    pub async fn on_connectivity_ready(&self, link: &dyn TransportLink) {
        if let Err(e) = link.activate().await {
            warn!(error = %e, "transport activation failed");
        }
    }

    /// Handle one incoming payload.
    ///
    /// Malformed input (missing `attitude` category, non-numeric angle) is
    /// dropped whole: no partial update, nothing raised to the caller —
    /// ignoring it is the whole error policy. Accepted messages update the
    /// filter and push one rotation to the renderer, in arrival order.
    pub fn on_message(&mut self, payload: Value) {
        let msg = match OrientationMessage::from_payload(payload) {
            Ok(msg) => msg,
            Err(WristError::Serialization(reason)) => {
                debug!(%reason, "dropping malformed orientation payload");
                return;
            }
            Err(e) => {
                debug!(error = %e, "dropping undecodable orientation payload");
                return;
            }
        };
        let (roll, pitch, yaw) =
            self.smoother
                .update(msg.attitude.roll, msg.attitude.pitch, msg.attitude.yaw);
        let (rx, ry, rz) = self.axis_map.apply(roll, pitch, yaw);
        self.renderer.set_rotation(rx, ry, rz);
    }

    /// Current smoothed (roll, pitch, yaw). (0, 0, 0) until the first
    /// accepted message; holds its last value when messages stop.
    pub fn smoothed(&self) -> (f64, f64, f64) {
        self.smoother.value()
    }

    /// Consume the inbox until the link closes.
    ///
    /// This loop is the single writer of the filter state. A lagged inbox
    /// (consumer fell behind a flood of payloads) is logged and skipped —
    /// lost messages are within the link's loss contract. Returns the
    /// receiver so callers can inspect final state after shutdown.
    pub async fn run(mut self, mut inbox: broadcast::Receiver<Value>) -> Self {
        loop {
            match inbox.recv().await {
                Ok(payload) => self.on_message(payload),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(lagged_by = n, "receiver inbox lagged; payloads lost");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wristlink_sampler::{Sampler, SimMotion};
    use wristlink_transport::LoopbackLink;
    use wristlink_types::AttitudeSample;

    const TOL: f64 = 1e-9;

    fn attitude_payload(roll: f64, pitch: f64, yaw: f64) -> Value {
        json!({
            "attitude": { "roll": roll, "pitch": pitch, "yaw": yaw },
            "rotationRate": { "x": 0.0, "y": 0.0, "z": 0.0 },
            "gravity": { "x": 0.0, "y": 0.0, "z": -1.0 },
            "userAcceleration": { "x": 0.0, "y": 0.0, "z": 0.0 }
        })
    }

    #[test]
    fn accepted_message_updates_filter_and_renderer() {
        let renderer = RecordingRenderer::new();
        let calls = renderer.handle();
        let mut receiver = Receiver::new(Box::new(renderer)).with_alpha(0.1);

        receiver.on_message(attitude_payload(1.0, 0.0, 0.0));

        let (roll, _, _) = receiver.smoothed();
        assert!((roll - 0.1).abs() < TOL);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_attitude_category_mutates_nothing() {
        let renderer = RecordingRenderer::new();
        let calls = renderer.handle();
        let mut receiver = Receiver::new(Box::new(renderer));

        receiver.on_message(attitude_payload(1.0, 1.0, 1.0));
        let before = receiver.smoothed();

        receiver.on_message(json!({
            "rotationRate": { "x": 0.0, "y": 0.0, "z": 0.0 }
        }));

        assert_eq!(receiver.smoothed(), before);
        assert_eq!(calls.lock().unwrap().len(), 1, "no render push for a dropped message");
    }

    #[test]
    fn non_numeric_roll_mutates_nothing() {
        let mut receiver = Receiver::new(Box::new(RecordingRenderer::new()));
        receiver.on_message(json!({
            "attitude": { "roll": "up", "pitch": 0.0, "yaw": 0.0 }
        }));
        assert_eq!(receiver.smoothed(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn non_object_payload_mutates_nothing() {
        let mut receiver = Receiver::new(Box::new(RecordingRenderer::new()));
        receiver.on_message(json!(42));
        receiver.on_message(json!(null));
        assert_eq!(receiver.smoothed(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn reference_smoothing_sequence() {
        // roll [0, 1, 1, 1], α = 0.1 → [0, 0.1, 0.19, 0.271].
        let mut receiver = Receiver::new(Box::new(RecordingRenderer::new())).with_alpha(0.1);
        let expected = [0.0, 0.1, 0.19, 0.271];
        for (raw, want) in [0.0, 1.0, 1.0, 1.0].iter().zip(expected.iter()) {
            receiver.on_message(attitude_payload(*raw, 0.0, 0.0));
            let (roll, _, _) = receiver.smoothed();
            assert!((roll - want).abs() < TOL, "got {roll}, want {want}");
        }
    }

    #[test]
    fn messages_apply_in_arrival_order() {
        // Simulated transport reordering: the "older" reading arrives second
        // and is applied second. No reorder buffer exists.
        let mut receiver = Receiver::new(Box::new(RecordingRenderer::new())).with_alpha(0.5);
        receiver.on_message(attitude_payload(2.0, 0.0, 0.0)); // chronologically later
        receiver.on_message(attitude_payload(1.0, 0.0, 0.0)); // chronologically earlier

        // 0 → 1.0 (α·2) → 1.0 (0.5·1 + 0.5·1)
        let (roll, _, _) = receiver.smoothed();
        assert!((roll - 1.0).abs() < TOL);
    }

    #[test]
    fn axis_map_is_applied_after_smoothing() {
        let renderer = RecordingRenderer::new();
        let calls = renderer.handle();
        let mut receiver = Receiver::new(Box::new(renderer))
            .with_alpha(1.0)
            .with_axis_map(AxisMap::MIRRORED_YAW);

        receiver.on_message(attitude_payload(0.1, 0.2, 0.3));

        let recorded = calls.lock().unwrap();
        let (rx, ry, rz) = recorded[0];
        assert!((rx - 0.1).abs() < TOL);
        assert!((ry - 0.2).abs() < TOL);
        assert!((rz + 0.3).abs() < TOL, "yaw must arrive sign-flipped");
    }

    #[tokio::test]
    async fn on_connectivity_ready_is_idempotent() {
        let (_watch, phone) = LoopbackLink::pair_default();
        let receiver = Receiver::new(Box::new(RecordingRenderer::new()));
        receiver.on_connectivity_ready(&phone).await;
        receiver.on_connectivity_ready(&phone).await;
        assert!(phone.is_activated());
    }

    #[tokio::test]
    async fn run_drains_inbox_and_stops_on_close() {
        let (watch, phone) = LoopbackLink::pair_default();
        let inbox = phone.subscribe();

        let renderer = RecordingRenderer::new();
        let calls = renderer.handle();
        let receiver = Receiver::new(Box::new(renderer)).with_alpha(0.5);
        let running = tokio::spawn(receiver.run(inbox));

        watch.send(attitude_payload(1.0, 0.0, 0.0)).await.unwrap();
        watch.send(attitude_payload(1.0, 0.0, 0.0)).await.unwrap();

        // Dropping both ends closes the channel; run() drains what was
        // buffered and returns the receiver.
        drop(watch);
        drop(phone);

        let receiver = running.await.unwrap();
        let (roll, _, _) = receiver.smoothed();
        assert!((roll - 0.75).abs() < TOL);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn end_to_end_wrist_to_renderer() {
        let (watch, phone) = LoopbackLink::pair_default();
        let inbox = phone.subscribe();

        let renderer = RecordingRenderer::new();
        let calls = renderer.handle();
        let receiver = Receiver::new(Box::new(renderer));
        receiver.on_connectivity_ready(&phone).await;
        let running = tokio::spawn(receiver.run(inbox));

        let steady = AttitudeSample {
            roll: 0.5,
            pitch: -0.25,
            yaw: 1.0,
            ..AttitudeSample::default()
        };
        let mut sampler = Sampler::new(Arc::new(SimMotion::steady(steady)), Arc::new(watch));
        sampler.configure(50.0).unwrap();
        sampler.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        sampler.stop();
        drop(sampler);
        drop(phone);

        let receiver = running.await.unwrap();
        let pushed = calls.lock().unwrap().len();
        assert!(pushed >= 3, "expected several rendered frames, got {pushed}");

        // Smoothed state is creeping toward the steady pose from 0.
        let (roll, pitch, yaw) = receiver.smoothed();
        assert!(roll > 0.0 && roll < 0.5);
        assert!(pitch < 0.0 && pitch > -0.25);
        assert!(yaw > 0.0 && yaw < 1.0);
    }
}
