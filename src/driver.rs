//! Frame driver
//!
//! Runs once per display refresh: reads the time delta, steps the ball,
//! evaluates the camera tween, hands both transforms to the render service,
//! and reports whether another frame is needed. Looping stops only when the
//! ball has settled and the camera has reached its end pose.

use crate::camera::CameraTween;
use crate::config::SceneConfig;
use crate::error::Result;
use crate::scene::{BallTransform, Clock, ManualClock, RenderService};
use crate::sim::{Ball, Integrator};

/// Ball lifecycle, one-way until restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallPhase {
    Running,
    Settled,
}

/// Camera lifecycle, one-way until restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPhase {
    Running,
    Finished,
}

/// Counters since the last start/restart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Frames rendered
    pub frames: u64,
    /// Floor impacts resolved
    pub bounces: u32,
    /// Scene time at which the ball settled
    pub settled_at_ms: Option<f64>,
}

/// Owns the scene state and advances it frame by frame
#[derive(Debug, Clone)]
pub struct FrameDriver {
    config: SceneConfig,
    integrator: Integrator,
    tween: CameraTween,
    ball: Ball,
    elapsed_ms: f64,
    last_ms: Option<f64>,
    ball_phase: BallPhase,
    camera_phase: CameraPhase,
    stats: FrameStats,
}

impl FrameDriver {
    pub fn new(config: SceneConfig) -> Result<Self> {
        let integrator = Integrator::new(&config)?;
        let tween = CameraTween::new(&config.camera);
        let ball = Ball::from_config(&config);
        Ok(Self {
            config,
            integrator,
            tween,
            ball,
            elapsed_ms: 0.0,
            last_ms: None,
            ball_phase: BallPhase::Running,
            camera_phase: CameraPhase::Running,
            stats: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn ball_phase(&self) -> BallPhase {
        self.ball_phase
    }

    pub fn camera_phase(&self) -> CameraPhase {
        self.camera_phase
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Whether more frames are needed
    pub fn is_running(&self) -> bool {
        self.ball_phase == BallPhase::Running || self.camera_phase == CameraPhase::Running
    }

    /// Run one frame at host time `now_ms`
    ///
    /// The first frame after start/restart has a zero delta. Returns whether
    /// the caller should schedule another frame.
    pub fn frame<R: RenderService + ?Sized>(&mut self, now_ms: f64, renderer: &mut R) -> bool {
        let dt = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.elapsed_ms += dt;

        if self.ball_phase == BallPhase::Running && !self.integrator.step(&mut self.ball, dt) {
            self.ball_phase = BallPhase::Settled;
            self.stats.settled_at_ms = Some(self.elapsed_ms);
            log::info!(
                "Ball settled at {:.0}ms after {} bounces",
                self.elapsed_ms,
                self.ball.bounces
            );
        }

        if self.camera_phase == CameraPhase::Running && self.tween.is_finished(self.elapsed_ms) {
            self.camera_phase = CameraPhase::Finished;
            log::info!("Camera move finished at {:.0}ms", self.elapsed_ms);
        }

        let ball = BallTransform::from_ball(&self.ball);
        let camera = self.tween.transform(self.elapsed_ms);
        renderer.render(&ball, &camera);

        self.stats.frames += 1;
        self.stats.bounces = self.ball.bounces;

        let running = self.is_running();
        if !running {
            log::info!("Scene at rest after {} frames", self.stats.frames);
        }
        running
    }

    /// Run one frame, reading the time from `clock`
    pub fn frame_with<C: Clock + ?Sized, R: RenderService + ?Sized>(
        &mut self,
        clock: &C,
        renderer: &mut R,
    ) -> bool {
        self.frame(clock.now_ms(), renderer)
    }

    /// Reset ball, elapsed time and both phases to their initial state
    pub fn restart(&mut self) {
        self.ball.reset(&self.config);
        self.elapsed_ms = 0.0;
        self.last_ms = None;
        self.ball_phase = BallPhase::Running;
        self.camera_phase = CameraPhase::Running;
        self.stats = FrameStats::default();
        log::info!("Scene restarted");
    }
}

/// Drive frames on a fixed-step clock until the scene comes to rest
///
/// Stands in for the display scheduler when there is no display. Returns the
/// stats of the run; stops early after `max_frames`.
pub fn run_headless<R: RenderService + ?Sized>(
    driver: &mut FrameDriver,
    renderer: &mut R,
    frame_ms: f64,
    max_frames: u64,
) -> FrameStats {
    let mut clock = ManualClock::default();
    let mut frames = 0;
    while driver.frame_with(&clock, renderer) {
        frames += 1;
        if frames >= max_frames {
            log::warn!("Headless run stopped after {} frames", max_frames);
            break;
        }
        clock.advance(frame_ms);
    }
    driver.stats().clone()
}

/// Drive frames against the wall clock, sleeping between frames (native only)
#[cfg(not(target_arch = "wasm32"))]
pub fn run_realtime<R: RenderService + ?Sized>(
    driver: &mut FrameDriver,
    renderer: &mut R,
    frame_ms: f64,
) -> FrameStats {
    let clock = crate::scene::SystemClock::default();
    let interval = std::time::Duration::from_secs_f64(frame_ms / 1000.0);
    while driver.frame_with(&clock, renderer) {
        std::thread::sleep(interval);
    }
    driver.stats().clone()
}
