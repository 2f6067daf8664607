//! Ball-drop integrator
//!
//! Advances the ball under constant gravity. In the analytic model a floor
//! impact is never discovered after the fact: the exact impact instant inside
//! the frame is solved in closed form, the bounce is applied there, and the
//! rest of the frame is integrated from the floor. This keeps the ball above
//! the floor at every frame boundary no matter how large `dt` gets.

use super::ball::Ball;
use super::restitution::RestitutionCurve;
use crate::config::{ImpactModel, SceneConfig};
use crate::consts::{MAX_BOUNCES_PER_STEP, MIN_SQUASH};
use crate::error::Result;

/// Displacement after `dt` from velocity `v` under constant acceleration `g`
#[inline]
pub fn displacement(v: f64, g: f64, dt: f64) -> f64 {
    v * dt + 0.5 * g * dt * dt
}

/// Time until a body at `p0` moving at `v0` first reaches `contact`
///
/// Returns the non-negative root of `p0 + v0·t + ½·g·t² = contact` when it is
/// strictly positive. Requires `g < 0` and `p0 >= contact`, under which the
/// root is unique. `None` means the crossing cannot be resolved (negative
/// discriminant, zero time, or NaN).
///
/// A falling body uses the conjugate form `2·(p0 - contact) / (-v0 + √D)`,
/// which stays accurate when `p0` is a few ulps above contact.
pub fn time_to_impact(p0: f64, v0: f64, g: f64, contact: f64) -> Option<f64> {
    let height = p0 - contact;
    let discriminant = v0 * v0 - 2.0 * g * height;
    if !(discriminant >= 0.0) {
        return None;
    }
    let t = if v0 <= 0.0 {
        2.0 * height / (-v0 + discriminant.sqrt())
    } else {
        (-v0 - discriminant.sqrt()) / g
    };
    if t > 0.0 { Some(t) } else { None }
}

/// Steps a [`Ball`] against a flat floor
#[derive(Debug, Clone, PartialEq)]
pub struct Integrator {
    gravity: f64,
    floor_level: f64,
    rest_speed: f64,
    curve: RestitutionCurve,
    model: ImpactModel,
}

impl Integrator {
    /// Build from a validated config
    pub fn new(config: &SceneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            gravity: config.gravity,
            floor_level: config.floor_level,
            rest_speed: config.rest_speed,
            curve: RestitutionCurve::new(config.restitution_k),
            model: config.impact_model,
        })
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn curve(&self) -> RestitutionCurve {
        self.curve
    }

    /// Height of the ball center when touching the floor
    #[inline]
    pub fn floor_contact(&self, ball: &Ball) -> f64 {
        self.floor_level + ball.radius
    }

    /// Advance `ball` by `dt` milliseconds
    ///
    /// Returns whether the ball is still moving. Once this returns `false`
    /// the ball is pinned at floor contact and later calls leave it alone.
    /// A non-positive or non-finite `dt` is a no-op.
    pub fn step(&self, ball: &mut Ball, dt: f64) -> bool {
        if !ball.moving {
            return false;
        }
        if !(dt > 0.0) || !dt.is_finite() {
            return true;
        }
        match self.model {
            ImpactModel::Analytic => self.step_analytic(ball, dt),
            ImpactModel::Squash => self.step_squash(ball, dt),
        }
    }

    fn step_analytic(&self, ball: &mut Ball, dt: f64) -> bool {
        let g = self.gravity;
        let contact = self.floor_contact(ball);
        let mut p = ball.position_y;
        let mut v = ball.velocity_y;
        let mut remaining = dt;
        let mut bounces = 0;

        loop {
            let next_p = p + displacement(v, g, remaining);
            if next_p > contact {
                // Free flight for the rest of the frame
                let next_v = v + g * remaining;
                if !next_p.is_finite() || !next_v.is_finite() {
                    log::warn!("Non-finite ball state, settling");
                    ball.settle(contact);
                    return false;
                }
                ball.position_y = next_p;
                ball.velocity_y = next_v;
                return true;
            }

            let Some(t_hit) = time_to_impact(p, v, g, contact) else {
                log::info!("Ball settled (no resolvable impact) after {} bounces", ball.bounces);
                ball.settle(contact);
                return false;
            };

            let v_hit = v + g * t_hit;
            if v_hit.abs() < self.rest_speed {
                log::info!(
                    "Ball settled at impact speed {:.6} after {} bounces",
                    v_hit.abs(),
                    ball.bounces
                );
                ball.settle(contact);
                return false;
            }

            bounces += 1;
            if bounces > MAX_BOUNCES_PER_STEP {
                log::warn!("More than {} impacts in one step, settling", MAX_BOUNCES_PER_STEP);
                ball.settle(contact);
                return false;
            }

            let v_bounce = self.curve.bounce(v_hit);
            ball.bounces += 1;
            log::debug!(
                "Bounce {}: impact {:.6} -> rebound {:.6} at t+{:.2}ms",
                ball.bounces,
                v_hit,
                v_bounce,
                dt - remaining + t_hit
            );

            p = contact;
            v = v_bounce;
            remaining -= t_hit;
            if remaining <= 0.0 {
                // Frame ends on the bounce instant
                ball.position_y = p;
                ball.velocity_y = v;
                return true;
            }
        }
    }

    /// Integrate freely and squash the ball while it sinks below contact height
    fn step_squash(&self, ball: &mut Ball, dt: f64) -> bool {
        let g = self.gravity;
        let contact = self.floor_contact(ball);

        ball.position_y += displacement(ball.velocity_y, g, dt);
        ball.velocity_y += g * dt;

        if ball.position_y <= contact {
            ball.squash = ((ball.position_y - self.floor_level) / ball.radius).max(MIN_SQUASH);
            if ball.velocity_y < 0.0 {
                let v_bounce = self.curve.bounce(ball.velocity_y);
                ball.bounces += 1;
                log::debug!(
                    "Bounce {}: impact {:.6} -> rebound {:.6} (squash {:.3})",
                    ball.bounces,
                    ball.velocity_y,
                    v_bounce,
                    ball.squash
                );
                ball.velocity_y = v_bounce;
            }
            if ball.velocity_y.abs() < self.rest_speed {
                log::info!("Ball settled after {} bounces", ball.bounces);
                ball.settle(contact);
                return false;
            }
        } else {
            ball.squash = 1.0;
        }

        if !ball.position_y.is_finite() || !ball.velocity_y.is_finite() {
            log::warn!("Non-finite ball state, settling");
            ball.settle(contact);
            return false;
        }
        true
    }
}
