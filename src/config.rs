//! Scene configuration and presets
//!
//! Persisted as JSON: a file on native, LocalStorage on the web.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};

/// How a floor impact is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImpactModel {
    /// Solve for the exact impact instant and bounce there
    #[default]
    Analytic,
    /// Let the ball sink below contact height and squash it instead
    Squash,
}

/// Scene presets, one per demo variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    Squash,
    #[default]
    Analytic,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Squash => "Squash",
            Preset::Analytic => "Analytic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "squash" => Some(Preset::Squash),
            "analytic" | "analytical" => Some(Preset::Analytic),
            _ => None,
        }
    }

    /// Gravitational acceleration (units/ms², negative is down)
    pub fn gravity(&self) -> f64 {
        match self {
            Preset::Squash => SQUASH_GRAVITY,
            Preset::Analytic => ANALYTIC_GRAVITY,
        }
    }

    /// Restitution curve coefficient
    pub fn restitution_k(&self) -> f64 {
        match self {
            Preset::Squash => SQUASH_RESTITUTION_K,
            Preset::Analytic => ANALYTIC_RESTITUTION_K,
        }
    }

    pub fn impact_model(&self) -> ImpactModel {
        match self {
            Preset::Squash => ImpactModel::Squash,
            Preset::Analytic => ImpactModel::Analytic,
        }
    }
}

/// Camera path: a straight line from `start` to `end`, always aimed at `look_at`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub start: DVec3,
    pub end: DVec3,
    pub look_at: DVec3,
    /// Time to travel from start to end
    pub move_duration_ms: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start: CAMERA_START,
            end: CAMERA_END,
            look_at: CAMERA_LOOK_AT,
            move_duration_ms: CAMERA_MOVE_DURATION_MS,
        }
    }
}

/// Everything fixed for the lifetime of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub preset: Preset,
    /// Gravitational acceleration (units/ms², must be negative)
    pub gravity: f64,
    pub floor_level: f64,
    pub ball_radius: f64,
    /// Initial height of the ball center
    pub start_height: f64,
    /// Restitution curve coefficient `k`
    pub restitution_k: f64,
    /// Impact speed (units/ms) below which the ball settles
    #[serde(default = "default_rest_speed")]
    pub rest_speed: f64,
    pub impact_model: ImpactModel,
    #[serde(default)]
    pub camera: CameraConfig,
}

fn default_rest_speed() -> f64 {
    REST_SPEED
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl SceneConfig {
    /// Create a config from a preset (applies preset constants)
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            gravity: preset.gravity(),
            floor_level: FLOOR_LEVEL,
            ball_radius: BALL_RADIUS,
            start_height: FLOOR_LEVEL + START_HEIGHT_RADII * BALL_RADIUS,
            restitution_k: preset.restitution_k(),
            rest_speed: REST_SPEED,
            impact_model: preset.impact_model(),
            camera: CameraConfig::default(),
        }
    }

    /// Apply a preset (updates preset-dependent constants only)
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.gravity = preset.gravity();
        self.restitution_k = preset.restitution_k();
        self.impact_model = preset.impact_model();
    }

    /// Height of the ball center when resting on the floor
    pub fn floor_contact(&self) -> f64 {
        self.floor_level + self.ball_radius
    }

    /// Reject values that would make the integrator produce NaNs
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() || self.gravity >= 0.0 {
            return Err(ConfigError::Gravity(self.gravity));
        }
        if !self.ball_radius.is_finite() || self.ball_radius <= 0.0 {
            return Err(ConfigError::Radius(self.ball_radius));
        }
        if !self.floor_level.is_finite() {
            return Err(ConfigError::InvalidParameter(format!(
                "floor_level must be finite, got {}",
                self.floor_level
            )));
        }
        let contact = self.floor_contact();
        if !self.start_height.is_finite() || self.start_height < contact {
            return Err(ConfigError::StartBelowFloor {
                start: self.start_height,
                contact,
            });
        }
        if !self.restitution_k.is_finite() || self.restitution_k < 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "restitution_k must be finite and non-negative, got {}",
                self.restitution_k
            )));
        }
        if !self.rest_speed.is_finite() || self.rest_speed < 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "rest_speed must be finite and non-negative, got {}",
                self.rest_speed
            )));
        }
        let duration = self.camera.move_duration_ms;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "camera.move_duration_ms must be finite and positive, got {}",
                duration
            )));
        }
        if !self.camera.start.is_finite()
            || !self.camera.end.is_finite()
            || !self.camera.look_at.is_finite()
        {
            return Err(ConfigError::InvalidParameter(
                "camera vectors must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "ball_drop_config";

    /// Load a config file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded {} config from {}", config.preset.as_str(), path.display());
        Ok(config)
    }

    /// Write a config file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved {} config to {}", self.preset.as_str(), path.display());
        Ok(())
    }

    /// Load config from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_analytic() {
        let config = SceneConfig::default();
        assert_eq!(config.preset, Preset::Analytic);
        assert_eq!(config.impact_model, ImpactModel::Analytic);
        assert_eq!(config.gravity, ANALYTIC_GRAVITY);
        assert_eq!(config.start_height, 8.0);
        assert_eq!(config.floor_contact(), 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_preset() {
        let mut config = SceneConfig::default();
        config.ball_radius = 3.0;
        config.apply_preset(Preset::Squash);
        assert_eq!(config.gravity, SQUASH_GRAVITY);
        assert_eq!(config.restitution_k, SQUASH_RESTITUTION_K);
        assert_eq!(config.impact_model, ImpactModel::Squash);
        // Non-preset fields are untouched
        assert_eq!(config.ball_radius, 3.0);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(Preset::from_str("SQUASH"), Some(Preset::Squash));
        assert_eq!(Preset::from_str("analytical"), Some(Preset::Analytic));
        assert_eq!(Preset::from_str("bogus"), None);
        assert_eq!(Preset::from_str(Preset::Squash.as_str()), Some(Preset::Squash));
    }

    #[test]
    fn test_validate_rejects_bad_gravity() {
        let mut config = SceneConfig::default();
        config.gravity = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Gravity(_))));
        config.gravity = 0.001;
        assert!(matches!(config.validate(), Err(ConfigError::Gravity(_))));
        config.gravity = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Gravity(_))));
    }

    #[test]
    fn test_validate_rejects_bad_radius() {
        let mut config = SceneConfig::default();
        config.ball_radius = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Radius(_))));
        config.ball_radius = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Radius(_))));
    }

    #[test]
    fn test_validate_rejects_start_below_floor() {
        let mut config = SceneConfig::default();
        config.start_height = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartBelowFloor { .. })
        ));
        // Resting exactly on the floor is allowed
        config.start_height = config.floor_contact();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_camera_duration() {
        let mut config = SceneConfig::default();
        config.camera.move_duration_ms = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_config() {
        let config = SceneConfig::from_preset(Preset::Squash);
        let json = config.to_json().unwrap();
        let parsed = SceneConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_missing_optional_fields() {
        let json = r#"{
            "preset": "Analytic",
            "gravity": -0.00002,
            "floor_level": 1.0,
            "ball_radius": 0.5,
            "start_height": 10.0,
            "restitution_k": 50.0,
            "impact_model": "Analytic"
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.rest_speed, REST_SPEED);
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.floor_contact(), 1.5);
    }

    #[test]
    fn test_json_invalid_values_rejected() {
        let mut config = SceneConfig::default();
        config.gravity = 1.0;
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(
            SceneConfig::from_json(&json),
            Err(ConfigError::Gravity(_))
        ));
        assert!(matches!(
            SceneConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_save_then_load_from_path() {
        let path = std::env::temp_dir().join(format!(
            "ball_drop_config_{}.json",
            std::process::id()
        ));
        let mut config = SceneConfig::from_preset(Preset::Squash);
        config.start_height = 12.0;
        config.save_to_path(&path).unwrap();

        let loaded = SceneConfig::load_from_path(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("ball_drop_config_does_not_exist.json");
        assert!(matches!(
            SceneConfig::load_from_path(&path),
            Err(ConfigError::Io(_))
        ));
    }
}
