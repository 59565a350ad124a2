//! Attitude-frame to model-frame remapping.
//!
//! The wrist sensor reports attitude in its own device frame; the rendered
//! hand model rotates in the scene's local frame. The correspondence between
//! the two is an empirically-chosen permutation with optional sign flips per
//! axis, not something derivable from the pipeline itself. [`AxisMap`] names
//! that correspondence so a different hand model only needs a different
//! constant, not new code.

// ────────────────────────────────────────────────────────────────────────────
// Source axis selector
// ────────────────────────────────────────────────────────────────────────────

/// Which smoothed attitude axis feeds a given model rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Roll,
    Pitch,
    Yaw,
}

/// One output channel of an [`AxisMap`]: a source axis and a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub source: Axis,
    pub invert: bool,
}

impl Channel {
    /// Non-inverted channel reading from `source`.
    pub const fn direct(source: Axis) -> Self {
        Self {
            source,
            invert: false,
        }
    }

    /// Sign-inverted channel reading from `source`.
    pub const fn inverted(source: Axis) -> Self {
        Self {
            source,
            invert: true,
        }
    }

    fn pick(&self, roll: f64, pitch: f64, yaw: f64) -> f64 {
        let v = match self.source {
            Axis::Roll => roll,
            Axis::Pitch => pitch,
            Axis::Yaw => yaw,
        };
        if self.invert { -v } else { v }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AxisMap
// ────────────────────────────────────────────────────────────────────────────

/// Fixed transform `(roll, pitch, yaw) → (rx, ry, rz)` applied after
/// smoothing, immediately before handing rotation to the renderer.
///
/// Two reference hand models wanted different correspondences, so the map is
/// a named constant rather than hard-coded: [`AxisMap::IDENTITY`] for models
/// whose local frame matches the sensor frame, [`AxisMap::MIRRORED_YAW`] for
/// the observed model whose yaw axis runs opposite the sensor's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMap {
    pub rx: Channel,
    pub ry: Channel,
    pub rz: Channel,
}

impl AxisMap {
    /// rx ← roll, ry ← pitch, rz ← yaw. The default.
    pub const IDENTITY: AxisMap = AxisMap {
        rx: Channel::direct(Axis::Roll),
        ry: Channel::direct(Axis::Pitch),
        rz: Channel::direct(Axis::Yaw),
    };

    /// rx ← roll, ry ← pitch, rz ← −yaw, for models with a mirrored yaw
    /// convention.
    pub const MIRRORED_YAW: AxisMap = AxisMap {
        rx: Channel::direct(Axis::Roll),
        ry: Channel::direct(Axis::Pitch),
        rz: Channel::inverted(Axis::Yaw),
    };

    /// Map a smoothed attitude triple into model rotation axes.
    pub fn apply(&self, roll: f64, pitch: f64, yaw: f64) -> (f64, f64, f64) {
        (
            self.rx.pick(roll, pitch, yaw),
            self.ry.pick(roll, pitch, yaw),
            self.rz.pick(roll, pitch, yaw),
        )
    }
}

impl Default for AxisMap {
    fn default() -> Self {
        Self::IDENTITY
    }
}
