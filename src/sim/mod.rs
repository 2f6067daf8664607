//! Deterministic physics module
//!
//! Everything that moves the ball lives here. This module must be pure and
//! deterministic:
//! - Identical `dt` sequences produce identical trajectories
//! - No clocks, rendering, or platform dependencies

pub mod ball;
pub mod integrator;
pub mod restitution;

pub use ball::Ball;
pub use integrator::{Integrator, displacement, time_to_impact};
pub use restitution::RestitutionCurve;
