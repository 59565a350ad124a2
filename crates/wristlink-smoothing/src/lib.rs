//! `wristlink-smoothing` – orientation smoothing for the hand renderer.
//!
//! Raw IMU attitude at 50 Hz is jittery; rendering it directly makes the 3D
//! hand tremble. This crate supplies the numeric half of the receiving side:
//!
//! - [`filter`] – per-axis single-pole low-pass (exponential smoothing).
//! - [`orient`] – [`AxisMap`][orient::AxisMap]: the fixed, empirically-chosen
//!   correspondence between the sensor attitude frame and the rendered
//!   model's local frame.

pub mod filter;
pub mod orient;

pub use filter::{AttitudeSmoother, LowPass, DEFAULT_ALPHA};
pub use orient::{Axis, AxisMap, Channel};
