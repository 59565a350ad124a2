//! Console stand-in for the 3D hand renderer.
//!
//! The real companion app feeds `set_rotation` into a scene graph; this demo
//! prints the pose instead, throttled so a 50 Hz stream does not flood the
//! terminal.

use std::time::{Duration, Instant};

use colored::Colorize;
use wristlink_receiver::Renderer;

/// Prints the rotation triple at most once per `period`.
pub struct ConsoleRenderer {
    period: Duration,
    last_print: Option<Instant>,
    frames: u64,
}

impl ConsoleRenderer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_print: None,
            frames: 0,
        }
    }

    fn due(&mut self) -> bool {
        match self.last_print {
            Some(t) if t.elapsed() < self.period => false,
            _ => {
                self.last_print = Some(Instant::now());
                true
            }
        }
    }
}

impl Renderer for ConsoleRenderer {
    fn set_rotation(&mut self, rx: f64, ry: f64, rz: f64) {
        self.frames += 1;
        if self.due() {
            println!(
                "  {} rx {:+.3}  ry {:+.3}  rz {:+.3}  ({} frames)",
                "hand".cyan().bold(),
                rx,
                ry,
                rz,
                self.frames
            );
        }
    }
}
