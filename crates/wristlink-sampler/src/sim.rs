//! [`SimMotion`] – a motion subsystem stand-in for headless tests and the
//! demo binary.
//!
//! Three behaviors cover every path the sampler has:
//!
//! - `unavailable` – the host has no motion capability at all.
//! - `warming` / `scripted` – available, yields a fixed queue of samples
//!   (possibly none) and then dries up, like a subsystem that has not
//!   finished warming.
//! - `steady` / `wave` – available forever; `wave` synthesizes a slow wrist
//!   sweep for the demo.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

use wristlink_types::{AttitudeSample, Vec3};

use crate::motion::MotionSource;

enum Behavior {
    Unavailable,
    Scripted(Mutex<VecDeque<AttitudeSample>>),
    Steady(AttitudeSample),
    Wave { started: Instant },
}

/// Simulated motion source.
pub struct SimMotion {
    behavior: Behavior,
}

impl SimMotion {
    /// A host without device motion. `is_available` is `false`.
    pub fn unavailable() -> Self {
        Self {
            behavior: Behavior::Unavailable,
        }
    }

    /// Available but never warmed up: every read yields `None`.
    pub fn warming() -> Self {
        Self::scripted([])
    }

    /// Available, yielding the given samples in order and `None` afterward.
    pub fn scripted(samples: impl IntoIterator<Item = AttitudeSample>) -> Self {
        Self {
            behavior: Behavior::Scripted(Mutex::new(samples.into_iter().collect())),
        }
    }

    /// Available, yielding the same sample on every read.
    pub fn steady(sample: AttitudeSample) -> Self {
        Self {
            behavior: Behavior::Steady(sample),
        }
    }

    /// Available, synthesizing a slow sinusoidal wrist sweep from wall time.
    /// Used by the demo binary in place of real hardware.
    pub fn wave() -> Self {
        Self {
            behavior: Behavior::Wave {
                started: Instant::now(),
            },
        }
    }
}

impl MotionSource for SimMotion {
    fn is_available(&self) -> bool {
        !matches!(self.behavior, Behavior::Unavailable)
    }

    fn sample(&self) -> Option<AttitudeSample> {
        match &self.behavior {
            Behavior::Unavailable => None,
            Behavior::Scripted(queue) => queue.lock().expect("sim queue lock").pop_front(),
            Behavior::Steady(sample) => Some(*sample),
            Behavior::Wave { started } => {
                let t = started.elapsed().as_secs_f64();
                // A gentle wrist roll with a slower pitch nod on top.
                let roll = 0.6 * (t * 1.3).sin();
                let pitch = 0.3 * (t * 0.7).sin();
                let yaw = 0.2 * (t * 0.4).cos();
                Some(AttitudeSample {
                    roll,
                    pitch,
                    yaw,
                    rotation_rate: Vec3::new(
                        0.6 * 1.3 * (t * 1.3).cos(),
                        0.3 * 0.7 * (t * 0.7).cos(),
                        -0.2 * 0.4 * (t * 0.4).sin(),
                    ),
                    gravity: Vec3::new(0.0, 0.0, -1.0),
                    user_acceleration: Vec3::default(),
                })
            }
        }
    }
}
