//! Velocity-dependent restitution
//!
//! A saturating curve: slow impacts barely bounce, fast impacts approach
//! (but never reach) a perfectly elastic reflection.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestitutionCurve {
    /// Curve steepness; larger values bounce more at low speed
    pub k: f64,
}

impl RestitutionCurve {
    pub fn new(k: f64) -> Self {
        Self { k }
    }

    /// Fraction of impact speed returned, in [0, 1)
    #[inline]
    pub fn factor(&self, velocity: f64) -> f64 {
        let kv = (self.k * velocity).abs();
        if kv.is_infinite() {
            // inf / inf would be NaN; the curve's limit is 1
            return 1.0;
        }
        kv / (1.0 + kv)
    }

    /// Rebound velocity for an impact at `velocity` (sign flipped)
    #[inline]
    pub fn bounce(&self, velocity: f64) -> f64 {
        -self.factor(velocity) * velocity
    }
}
