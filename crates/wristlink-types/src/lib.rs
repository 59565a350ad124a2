//! `wristlink-types` – shared data model for the wrist-to-phone pipeline.
//!
//! Defines the attitude sample produced by the motion subsystem, the wire
//! message exchanged over the paired-device link, and the global
//! [`WristError`] type used across the workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 3-axis vector carried on the wire (rotation rate, gravity, linear
/// acceleration).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One gravity-referenced motion reading, produced by the motion subsystem
/// each sampling tick and discarded after serialization.
///
/// Angles are right-handed Euler angles in radians. They arrive unwrapped:
/// this pipeline never normalizes them, the range is whatever the motion
/// subsystem yields (typically `[-π, π]` per axis).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeSample {
    /// Rotation around the device's long axis (radians).
    pub roll: f64,
    /// Rotation around the device's lateral axis (radians).
    pub pitch: f64,
    /// Rotation around the gravity axis (radians).
    pub yaw: f64,
    /// Angular velocity, rad/s.
    pub rotation_rate: Vec3,
    /// Unit-scale gravity direction in the device frame.
    pub gravity: Vec3,
    /// Linear acceleration excluding gravity, in g-units.
    pub user_acceleration: Vec3,
}

/// The `attitude` category of the wire message. This is the only category
/// the receiving side consumes; a message without a well-formed attitude
/// block is dropped whole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Wire-level orientation payload, one per sampling tick.
///
/// Serializes to the flat two-level key-value shape the paired-device
/// transport carries:
///
/// ```json
/// {
///   "attitude":         { "roll": 0.1, "pitch": 0.2, "yaw": 0.3 },
///   "rotationRate":     { "x": 0.0, "y": 0.0, "z": 0.0 },
///   "gravity":          { "x": 0.0, "y": 0.0, "z": -1.0 },
///   "userAcceleration": { "x": 0.0, "y": 0.0, "z": 0.0 }
/// }
/// ```
///
/// The three non-attitude categories are carried for completeness and may be
/// absent on decode without failing the message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationMessage {
    pub attitude: Attitude,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_rate: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<Vec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_acceleration: Option<Vec3>,
}

impl OrientationMessage {
    /// Package a fresh [`AttitudeSample`] for transmission.
    pub fn from_sample(sample: &AttitudeSample) -> Self {
        Self {
            attitude: Attitude {
                roll: sample.roll,
                pitch: sample.pitch,
                yaw: sample.yaw,
            },
            rotation_rate: Some(sample.rotation_rate),
            gravity: Some(sample.gravity),
            user_acceleration: Some(sample.user_acceleration),
        }
    }

    /// Serialize into the transport's key-value payload form.
    pub fn to_payload(&self) -> Result<serde_json::Value, WristError> {
        serde_json::to_value(self).map_err(|e| WristError::Serialization(e.to_string()))
    }

    /// Defensive decode of an incoming payload.
    ///
    /// Fails when the `attitude` category is missing or any of its three
    /// scalars is absent or non-numeric. The failure is total: callers must
    /// not apply a partial update from a rejected message.
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, WristError> {
        serde_json::from_value(payload).map_err(|e| WristError::Serialization(e.to_string()))
    }
}

/// Global error type spanning motion-capability, transport, and codec
/// failures. All are point-in-time conditions; nothing in this pipeline
/// latches an error state.
#[derive(Error, Debug)]
pub enum WristError {
    #[error("device motion is not available on this host")]
    MotionUnavailable,

    #[error("invalid sample rate {0} Hz (must be > 0)")]
    InvalidSampleRate(f64),

    #[error("transport send failed: {0}")]
    SendFailed(String),

    #[error("transport activation failed: {0}")]
    Activation(String),

    #[error("channel error: {0}")]
    Channel(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
