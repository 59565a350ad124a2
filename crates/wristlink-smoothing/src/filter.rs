//! Single-pole low-pass smoothing of the attitude stream.
//!
//! Each axis is filtered independently with the classic exponential
//! recurrence:
//!
//! ```text
//! smoothed[t] = α * raw[t] + (1 − α) * smoothed[t−1]
//! ```
//!
//! The filter is sample-indexed, not time-indexed: irregular inter-arrival
//! gaps on the lossy link are accepted as a smoothness/latency tradeoff
//! rather than corrected with dt weighting. When messages stop arriving the
//! state simply holds its last value.
//!
//! # Example
//!
//! ```rust
//! use wristlink_smoothing::filter::AttitudeSmoother;
//!
//! let mut smoother = AttitudeSmoother::new(0.1);
//! let (roll, _, _) = smoother.update(1.0, 0.0, 0.0);
//! assert!((roll - 0.1).abs() < 1e-12);
//! ```

use tracing::warn;

/// Recommended smoothing factor: ~90% weight retained on history per update.
/// Reaches ~63% of a step change in roughly `1/α` updates (10 samples, 200 ms
/// at the 50 Hz default rate).
pub const DEFAULT_ALPHA: f64 = 0.1;

// ────────────────────────────────────────────────────────────────────────────
// Single axis
// ────────────────────────────────────────────────────────────────────────────

/// One axis of exponential smoothing. State starts at 0.
#[derive(Debug, Clone, Copy)]
pub struct LowPass {
    alpha: f64,
    state: f64,
}

impl LowPass {
    /// Create a filter with the given smoothing factor.
    ///
    /// `alpha` is clamped into `[0, 1]`; 1 passes raw input through, values
    /// near 0 respond very slowly.
    pub fn new(alpha: f64) -> Self {
        let clamped = alpha.clamp(0.0, 1.0);
        if clamped != alpha {
            warn!(alpha, "smoothing factor outside [0, 1]; clamping");
        }
        Self {
            alpha: clamped,
            state: 0.0,
        }
    }

    /// Feed one raw value and return the new smoothed value.
    pub fn update(&mut self, raw: f64) -> f64 {
        self.state = self.alpha * raw + (1.0 - self.alpha) * self.state;
        self.state
    }

    /// The current smoothed value (last output, or 0 before any input).
    pub fn value(&self) -> f64 {
        self.state
    }

    /// The configured smoothing factor after clamping.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Three axes
// ────────────────────────────────────────────────────────────────────────────

/// Independent [`LowPass`] filters for roll, pitch, and yaw.
///
/// This is the receiving side's only mutable orientation state. It is meant
/// to be owned by exactly one task; all updates and reads happen there.
#[derive(Debug, Clone, Copy)]
pub struct AttitudeSmoother {
    roll: LowPass,
    pitch: LowPass,
    yaw: LowPass,
}

impl AttitudeSmoother {
    /// Create a smoother with the same `alpha` on all three axes.
    pub fn new(alpha: f64) -> Self {
        Self {
            roll: LowPass::new(alpha),
            pitch: LowPass::new(alpha),
            yaw: LowPass::new(alpha),
        }
    }

    /// Feed one raw attitude triple; returns the smoothed triple.
    pub fn update(&mut self, roll: f64, pitch: f64, yaw: f64) -> (f64, f64, f64) {
        (
            self.roll.update(roll),
            self.pitch.update(pitch),
            self.yaw.update(yaw),
        )
    }

    /// Current smoothed (roll, pitch, yaw). (0, 0, 0) before any update.
    pub fn value(&self) -> (f64, f64, f64) {
        (self.roll.value(), self.pitch.value(), self.yaw.value())
    }
}

impl Default for AttitudeSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
