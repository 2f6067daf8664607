//! Seams to the host
//!
//! The core never draws anything or reads a clock directly. The host supplies
//! a [`RenderService`] that receives transforms once per frame, and a
//! [`Clock`] that reports monotonic milliseconds.

use glam::DVec3;

use crate::camera::CameraTransform;
use crate::sim::Ball;

/// Ball pose handed to the render service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallTransform {
    pub position: DVec3,
    /// Non-uniform scale; identity unless the ball is squashed
    pub scale: DVec3,
}

impl BallTransform {
    pub fn from_ball(ball: &Ball) -> Self {
        Self {
            position: DVec3::new(0.0, ball.position_y, 0.0),
            scale: DVec3::from_array(ball.scale()),
        }
    }
}

/// Draws one frame with the given transforms
pub trait RenderService {
    fn render(&mut self, ball: &BallTransform, camera: &CameraTransform);
}

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock that only moves when told to (headless runs and tests)
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: f64,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.now_ms += dt_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Wall clock backed by `std::time::Instant` (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Render service that writes transforms to the log
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub frames: u64,
}

impl RenderService for LogRenderer {
    fn render(&mut self, ball: &BallTransform, camera: &CameraTransform) {
        self.frames += 1;
        log::trace!(
            "frame {}: ball y={:.4} scale={:.3} camera=({:.2}, {:.2}, {:.2})",
            self.frames,
            ball.position.y,
            ball.scale.y,
            camera.position.x,
            camera.position.y,
            camera.position.z
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_transform_tracks_height() {
        let ball = Ball::new(8.0, 2.0);
        let transform = BallTransform::from_ball(&ball);
        assert_eq!(transform.position, DVec3::new(0.0, 8.0, 0.0));
        assert_eq!(transform.scale, DVec3::ONE);
    }

    #[test]
    fn test_ball_transform_squash() {
        let mut ball = Ball::new(1.0, 2.0);
        ball.squash = 0.5;
        let transform = BallTransform::from_ball(&ball);
        assert_eq!(transform.scale, DVec3::new(2.0, 0.5, 2.0));
    }

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new(100.0);
        assert_eq!(clock.now_ms(), 100.0);
        clock.advance(33.0);
        assert_eq!(clock.now_ms(), 133.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::default();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(a >= 0.0);
    }

    #[test]
    fn test_log_renderer_counts_frames() {
        let mut renderer = LogRenderer::default();
        let ball = BallTransform::from_ball(&Ball::new(8.0, 2.0));
        let camera = CameraTransform {
            position: DVec3::new(0.0, 5.0, 20.0),
            look_at: DVec3::new(0.0, 5.0, 0.0),
        };
        renderer.render(&ball, &camera);
        renderer.render(&ball, &camera);
        assert_eq!(renderer.frames, 2);
    }
}
