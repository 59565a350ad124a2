//! [`Sampler`] – periodic attitude capture and fire-and-forget transmission.
//!
//! The sampler is a two-state machine, Idle ⇄ Running, with no error state:
//! every failure is point-in-time. A tick that finds no sample is skipped; a
//! tick whose send fails reports to the tracing sink and is forgotten. The
//! design favors freshness over delivery guarantees, so nothing is ever
//! buffered or retried.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use wristlink_transport::TransportLink;
use wristlink_types::{OrientationMessage, WristError};

use crate::motion::MotionSource;

/// Recommended sampling rate: 50 Hz (20 ms period).
pub const DEFAULT_RATE_HZ: f64 = 50.0;

/// Periodic sampler that streams orientation payloads to the paired device.
///
/// Collaborators are injected at construction; there is no implicit default
/// session anywhere in the pipeline.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use wristlink_sampler::{Sampler, SimMotion};
/// use wristlink_transport::LoopbackLink;
///
/// # async fn demo() -> Result<(), wristlink_types::WristError> {
/// let (watch_end, _phone_end) = LoopbackLink::pair_default();
/// let mut sampler = Sampler::new(Arc::new(SimMotion::warming()), Arc::new(watch_end));
/// sampler.configure(50.0)?;
/// sampler.start().await?;
/// // ... later
/// sampler.stop();
/// # Ok(())
/// # }
/// ```
pub struct Sampler {
    motion: Arc<dyn MotionSource>,
    link: Arc<dyn TransportLink>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Sampler {
    /// Create an idle sampler at the default 50 Hz rate.
    pub fn new(motion: Arc<dyn MotionSource>, link: Arc<dyn TransportLink>) -> Self {
        Self {
            motion,
            link,
            period: Duration::from_secs_f64(1.0 / DEFAULT_RATE_HZ),
            task: None,
        }
    }

    /// Set the sampling rate in Hz. Must be finite, > 0, and yield a
    /// representable non-zero period.
    ///
    /// Re-configuring while running re-arms the timer with the new period,
    /// discarding any in-flight tick.
    pub fn configure(&mut self, rate_hz: f64) -> Result<(), WristError> {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(WristError::InvalidSampleRate(rate_hz));
        }
        let seconds = 1.0 / rate_hz;
        // A subnormal rate overflows to an infinite period; an enormous one
        // truncates to a zero period the interval timer cannot run at.
        if !seconds.is_finite() {
            return Err(WristError::InvalidSampleRate(rate_hz));
        }
        let period = Duration::from_secs_f64(seconds);
        if period.is_zero() {
            return Err(WristError::InvalidSampleRate(rate_hz));
        }
        self.period = period;
        if self.is_running() {
            self.abort_task();
            self.spawn_task();
        }
        Ok(())
    }

    /// Begin periodic sampling.
    ///
    /// Fails with [`WristError::MotionUnavailable`] when the host has no
    /// motion capability; that is terminal for this instance — the sampler
    /// stays Idle and never re-checks. Otherwise the transport session is
    /// registered (idempotently) and the tick task starts. Calling `start`
    /// while already running is a no-op.
    pub async fn start(&mut self) -> Result<(), WristError> {
        if self.is_running() {
            return Ok(());
        }
        if !self.motion.is_available() {
            warn!("device motion unavailable; sampler stays idle");
            return Err(WristError::MotionUnavailable);
        }
        // Activation failure does not gate the tick loop: sends attempted on
        // an inactive session fail individually and are reported per tick.
        if let Err(e) = self.link.activate().await {
            warn!(error = %e, "transport activation failed");
        }
        self.spawn_task();
        Ok(())
    }

    /// Halt the timer. Idempotent; safe to call when not started.
    pub fn stop(&mut self) {
        self.abort_task();
    }

    /// Whether the tick task is currently running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// The currently configured sampling period.
    pub fn period(&self) -> Duration {
        self.period
    }

    fn spawn_task(&mut self) {
        let motion = Arc::clone(&self.motion);
        let link = Arc::clone(&self.link);
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // A stalled send must not cause a burst of catch-up ticks.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tick(motion.as_ref(), link.as_ref()).await;
            }
        }));
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.abort_task();
    }
}

/// One sampling tick: read, package, send.
///
/// Each tick is independent. No sample yet → skip. Send failure → report to
/// the tracing sink and move on; the next tick is unaffected.
async fn tick(motion: &dyn MotionSource, link: &dyn TransportLink) {
    let Some(sample) = motion.sample() else {
        debug!("no motion sample available; skipping tick");
        return;
    };
    let payload = match OrientationMessage::from_sample(&sample).to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "failed to encode orientation payload");
            return;
        }
    };
    if let Err(e) = link.send(payload).await {
        warn!(error = %e, "orientation send failed; dropping this tick");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimMotion;
    use wristlink_transport::sim::{FlakyLink, UnsupportedLink};
    use wristlink_types::AttitudeSample;

    fn roll_sample(roll: f64) -> AttitudeSample {
        AttitudeSample {
            roll,
            ..AttitudeSample::default()
        }
    }

    #[test]
    fn configure_rejects_non_positive_rates() {
        let mut sampler = Sampler::new(
            Arc::new(SimMotion::warming()),
            Arc::new(FlakyLink::reliable()),
        );
        assert!(matches!(
            sampler.configure(0.0),
            Err(WristError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            sampler.configure(-10.0),
            Err(WristError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            sampler.configure(f64::NAN),
            Err(WristError::InvalidSampleRate(_))
        ));
    }

    #[tokio::test]
    async fn configure_rejects_degenerate_finite_and_infinite_rates() {
        let mut sampler = Sampler::new(
            Arc::new(SimMotion::warming()),
            Arc::new(FlakyLink::reliable()),
        );
        let default_period = sampler.period();

        // An infinite rate would collapse the period to zero and kill the
        // tick task from inside; a subnormal one overflows the period to
        // infinity; an enormous finite one truncates the period to zero.
        for rate in [f64::INFINITY, 5e-324, 1e308] {
            assert!(
                matches!(
                    sampler.configure(rate),
                    Err(WristError::InvalidSampleRate(_))
                ),
                "rate {rate} must be rejected"
            );
        }
        // The rejected rates left the configuration untouched and the
        // sampler fully usable.
        assert_eq!(sampler.period(), default_period);
        sampler.start().await.unwrap();
        assert!(sampler.is_running());
        sampler.stop();
    }

    #[test]
    fn configure_sets_period() {
        let mut sampler = Sampler::new(
            Arc::new(SimMotion::warming()),
            Arc::new(FlakyLink::reliable()),
        );
        sampler.configure(50.0).unwrap();
        assert_eq!(sampler.period(), Duration::from_millis(20));
    }

    #[tokio::test]
    async fn start_without_motion_capability_stays_idle() {
        let link = Arc::new(FlakyLink::reliable());
        let mut sampler = Sampler::new(Arc::new(SimMotion::unavailable()), link.clone());
        let result = sampler.start().await;
        assert!(matches!(result, Err(WristError::MotionUnavailable)));
        assert!(!sampler.is_running());
        // The session is never registered when the capability is absent.
        assert!(!link.is_activated());
    }

    #[tokio::test]
    async fn start_activates_the_session() {
        let link = Arc::new(FlakyLink::reliable());
        let mut sampler = Sampler::new(Arc::new(SimMotion::warming()), link.clone());
        sampler.start().await.unwrap();
        assert!(sampler.is_running());
        assert!(link.is_activated());
        sampler.stop();
    }

    #[tokio::test]
    async fn start_proceeds_when_activation_fails() {
        // Activation failures are reported, not fatal: the loop still runs
        // and individual sends fail on their own.
        let mut sampler = Sampler::new(Arc::new(SimMotion::warming()), Arc::new(UnsupportedLink));
        // UnsupportedLink::is_supported is about the host's connectivity,
        // not motion; start only gates on motion availability.
        sampler.start().await.unwrap();
        assert!(sampler.is_running());
        sampler.stop();
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_start_restarts() {
        let mut sampler = Sampler::new(
            Arc::new(SimMotion::warming()),
            Arc::new(FlakyLink::reliable()),
        );
        sampler.stop();
        assert!(!sampler.is_running());

        sampler.start().await.unwrap();
        assert!(sampler.is_running());

        sampler.stop();
        sampler.stop();
        assert!(!sampler.is_running());

        sampler.start().await.unwrap();
        assert!(sampler.is_running());
        sampler.stop();
    }

    #[tokio::test]
    async fn start_while_running_is_a_noop() {
        let mut sampler = Sampler::new(
            Arc::new(SimMotion::warming()),
            Arc::new(FlakyLink::reliable()),
        );
        sampler.start().await.unwrap();
        sampler.start().await.unwrap();
        assert!(sampler.is_running());
        sampler.stop();
    }

    #[tokio::test]
    async fn warming_motion_produces_zero_sends() {
        // 100 ticks with no sample available: nothing sent, nothing fatal.
        let motion = SimMotion::warming();
        let link = FlakyLink::reliable();
        for _ in 0..100 {
            tick(&motion, &link).await;
        }
        assert_eq!(link.attempt_count(), 0);
    }

    #[tokio::test]
    async fn send_failure_does_not_suppress_next_tick() {
        let motion = SimMotion::scripted([roll_sample(0.1), roll_sample(0.2), roll_sample(0.3)]);
        let link = FlakyLink::failing_on([1]);
        for _ in 0..3 {
            tick(&motion, &link).await;
        }
        // All three ticks attempted a send even though the second failed.
        assert_eq!(link.attempt_count(), 3);
        let attempts = link.attempts();
        assert_eq!(attempts[2]["attitude"]["roll"], serde_json::json!(0.3));
    }

    #[tokio::test]
    async fn scripted_source_exhaustion_skips_ticks() {
        let motion = SimMotion::scripted([roll_sample(0.1)]);
        let link = FlakyLink::reliable();
        for _ in 0..5 {
            tick(&motion, &link).await;
        }
        // Only the tick that found a sample transmitted.
        assert_eq!(link.attempt_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn running_sampler_ticks_at_the_configured_rate() {
        let link = Arc::new(FlakyLink::reliable());
        let mut sampler = Sampler::new(Arc::new(SimMotion::steady(roll_sample(0.5))), link.clone());
        sampler.configure(50.0).unwrap();
        sampler.start().await.unwrap();

        // 100 ms of virtual time at 50 Hz: the immediate first tick plus
        // five periodic ones.
        tokio::time::sleep(Duration::from_millis(100)).await;
        sampler.stop();

        let sent = link.attempt_count();
        assert!((5..=7).contains(&sent), "expected ~6 sends, got {sent}");
    }

    #[tokio::test(start_paused = true)]
    async fn reconfigure_while_running_rearms_the_timer() {
        let link = Arc::new(FlakyLink::reliable());
        let mut sampler = Sampler::new(Arc::new(SimMotion::steady(roll_sample(0.5))), link.clone());
        sampler.configure(50.0).unwrap();
        sampler.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        let before = link.attempt_count();

        // Slow way down; the old 20 ms cadence must stop.
        sampler.configure(1.0).unwrap();
        assert!(sampler.is_running());

        tokio::time::sleep(Duration::from_millis(400)).await;
        let after = link.attempt_count();
        sampler.stop();

        // At 1 Hz, 400 ms admits only the re-armed timer's immediate tick.
        assert!(
            after - before <= 1,
            "expected at most one send after re-arm, got {}",
            after - before
        );
    }
}
