//! Ball Drop - a bouncing ball above a floor, watched by a moving camera
//!
//! Core modules:
//! - `sim`: Deterministic physics (ball state, restitution, impact integrator)
//! - `camera`: Time-driven camera tween
//! - `scene`: Seams to the host (render service, clock)
//! - `driver`: Per-frame driver and restart handling
//! - `config`: Serializable scene configuration and presets

pub mod camera;
pub mod config;
pub mod driver;
pub mod error;
pub mod scene;
pub mod sim;

pub use camera::{CameraTransform, CameraTween};
pub use config::{CameraConfig, ImpactModel, Preset, SceneConfig};
pub use driver::{BallPhase, CameraPhase, FrameDriver, FrameStats, run_headless};
#[cfg(not(target_arch = "wasm32"))]
pub use driver::run_realtime;
pub use error::{ConfigError, Result};
pub use scene::{BallTransform, Clock, LogRenderer, ManualClock, RenderService};
#[cfg(not(target_arch = "wasm32"))]
pub use scene::SystemClock;

/// Scene configuration constants
///
/// All times are in milliseconds, so velocities are units/ms and
/// accelerations units/ms².
pub mod consts {
    use glam::DVec3;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 2.0;
    /// Drop height of the ball center, in radii above the floor
    pub const START_HEIGHT_RADII: f64 = 4.0;
    pub const FLOOR_LEVEL: f64 = 0.0;

    /// Analytic variant: stronger gravity, gentler restitution curve
    pub const ANALYTIC_GRAVITY: f64 = -0.000045;
    pub const ANALYTIC_RESTITUTION_K: f64 = 38.0;

    /// Squash variant: chosen so an impact at -0.01 returns ~0.9 of its speed
    pub const SQUASH_GRAVITY: f64 = -0.000015;
    pub const SQUASH_RESTITUTION_K: f64 = 900.0;

    /// Impact speed below which the ball is considered settled
    pub const REST_SPEED: f64 = 0.001;
    /// Upper bound on impacts resolved inside a single step
    pub const MAX_BOUNCES_PER_STEP: u32 = 64;
    /// Smallest vertical scale a squashed ball may reach
    pub const MIN_SQUASH: f64 = 0.05;

    /// Camera defaults
    pub const CAMERA_MOVE_DURATION_MS: f64 = 12000.0;
    pub const CAMERA_START: DVec3 = DVec3::new(0.0, 5.0, 20.0);
    pub const CAMERA_END: DVec3 = DVec3::new(20.0, 5.0, 0.0);
    pub const CAMERA_LOOK_AT: DVec3 = DVec3::new(0.0, 5.0, 0.0);

    /// Frame interval used by the headless runner (60 Hz)
    pub const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Hard stop for the headless runner
    pub const HEADLESS_MAX_FRAMES: u64 = 100_000;
}
