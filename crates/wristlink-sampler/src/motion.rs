//! Read interface to the host's motion-sensing subsystem.
//!
//! The fusion that turns raw accelerometer/gyro data into gravity-referenced
//! attitude happens inside the platform's motion stack, outside this
//! pipeline. The sampler only ever asks two questions: does the capability
//! exist, and what is the latest fused sample.

use wristlink_types::AttitudeSample;

/// Interface the sampler polls once per tick.
pub trait MotionSource: Send + Sync {
    /// Whether device motion exists on this host. Checked once at
    /// [`start`][crate::sampler::Sampler::start]; a `false` here is terminal
    /// for the sampler instance.
    fn is_available(&self) -> bool;

    /// The latest fused attitude sample, or `None` while the subsystem is
    /// still warming up. A `None` tick is skipped silently.
    fn sample(&self) -> Option<AttitudeSample>;
}
