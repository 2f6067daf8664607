//! Camera tween
//!
//! Moves the camera along a straight line over a fixed duration, driven only
//! by elapsed time since start/restart. The camera aims at a fixed target.

use glam::DVec3;

use crate::config::CameraConfig;

/// Camera pose handed to the render service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub position: DVec3,
    pub look_at: DVec3,
}

/// Linear start-to-end interpolation, clamped at both ends
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTween {
    start: DVec3,
    end: DVec3,
    look_at: DVec3,
    duration_ms: f64,
}

impl CameraTween {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            start: config.start,
            end: config.end,
            look_at: config.look_at,
            duration_ms: config.move_duration_ms,
        }
    }

    /// Fraction of the move completed, in [0, 1]
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if !(elapsed_ms > 0.0) {
            return 0.0;
        }
        (elapsed_ms / self.duration_ms).min(1.0)
    }

    /// Camera position at `elapsed_ms`
    ///
    /// Interpolated as `start + (end - start) * t` so that an axis with equal
    /// endpoints stays exactly at its value for the whole move.
    pub fn position(&self, elapsed_ms: f64) -> DVec3 {
        let t = self.progress(elapsed_ms);
        if t <= 0.0 {
            self.start
        } else if t >= 1.0 {
            self.end
        } else {
            self.start + (self.end - self.start) * t
        }
    }

    pub fn transform(&self, elapsed_ms: f64) -> CameraTransform {
        CameraTransform {
            position: self.position(elapsed_ms),
            look_at: self.look_at,
        }
    }

    /// Whether the camera has reached its end pose
    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}
