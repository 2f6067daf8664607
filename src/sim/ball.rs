//! Ball state
//!
//! The only stateful physical entity. Moves along Y only.

use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;

/// The ball, as seen by the integrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Height of the ball center
    pub position_y: f64,
    /// Vertical velocity in units/ms (negative is falling)
    pub velocity_y: f64,
    pub radius: f64,
    /// Cleared once the ball has settled; never set again until reset
    pub moving: bool,
    /// Vertical squash factor (1.0 = undeformed), used by the squash model
    #[serde(default = "unit_squash")]
    pub squash: f64,
    /// Floor impacts since the last reset
    #[serde(default)]
    pub bounces: u32,
}

fn unit_squash() -> f64 {
    1.0
}

impl Ball {
    /// A ball at rest at `position_y`, about to be dropped
    pub fn new(position_y: f64, radius: f64) -> Self {
        Self {
            position_y,
            velocity_y: 0.0,
            radius,
            moving: true,
            squash: 1.0,
            bounces: 0,
        }
    }

    /// The ball a scene starts (and restarts) with
    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(config.start_height, config.ball_radius)
    }

    /// Restore the initial drop state
    pub fn reset(&mut self, config: &SceneConfig) {
        *self = Self::from_config(config);
    }

    /// Pin the ball to the floor and stop it for good
    pub fn settle(&mut self, floor_contact: f64) {
        self.position_y = floor_contact;
        self.velocity_y = 0.0;
        self.squash = 1.0;
        self.moving = false;
    }

    /// Non-uniform scale of the rendered mesh: squashed in Y, bulged in X/Z
    pub fn scale(&self) -> [f64; 3] {
        let bulge = 1.0 / self.squash;
        [bulge, self.squash, bulge]
    }
}
