//! `wristlink-sampler` – the wrist-side half of the pipeline.
//!
//! Owns a periodic timer that reads the latest attitude from the motion
//! subsystem once per tick, packages it as an orientation payload, and hands
//! it to the paired-device link fire-and-forget. Every tick is independent:
//! a missing sample is skipped, a failed send is logged and forgotten, and
//! the next tick proceeds regardless.
//!
//! # Modules
//!
//! - [`motion`] – the [`MotionSource`][motion::MotionSource] read interface.
//! - [`sampler`] – the [`Sampler`][sampler::Sampler] state machine and tick
//!   loop.
//! - [`sim`] – [`SimMotion`][sim::SimMotion], a scripted/synthesized motion
//!   source for tests and the demo binary.

pub mod motion;
pub mod sampler;
pub mod sim;

pub use motion::MotionSource;
pub use sampler::{Sampler, DEFAULT_RATE_HZ};
pub use sim::SimMotion;
