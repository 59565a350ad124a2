//! The rendering collaborator boundary.
//!
//! Everything past `set_rotation` — scene graph, hand mesh, camera — is
//! outside this pipeline. The receiver only promises one call per accepted
//! message, always from the single task that owns the filter state.

use std::sync::{Arc, Mutex};

/// Rotation consumer driven by the receiver.
pub trait Renderer: Send {
    /// Apply a model-frame rotation triple (radians). Called once per
    /// accepted, filtered message.
    fn set_rotation(&mut self, rx: f64, ry: f64, rz: f64);
}

/// Test double that records every rotation it is handed.
///
/// Clone-able handle included so a test can keep inspecting calls after the
/// renderer itself moves into a [`Receiver`][crate::receiver::Receiver].
#[derive(Default)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<(f64, f64, f64)>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle onto the recorded call list.
    pub fn handle(&self) -> Arc<Mutex<Vec<(f64, f64, f64)>>> {
        Arc::clone(&self.calls)
    }
}

impl Renderer for RecordingRenderer {
    fn set_rotation(&mut self, rx: f64, ry: f64, rz: f64) {
        self.calls.lock().expect("render call lock").push((rx, ry, rz));
    }
}
