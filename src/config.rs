//! Designer tuning loaded from JSON and exposed as Bevy resources.
//!
//! Every section falls back to the defaults in [`crate::constants`] for any
//! field missing from the file, so a config only needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Errors raised while loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON for [`BookboundConfig`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// A value is outside the range the simulation can integrate.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted field name.
        field: &'static str,
        /// Human-readable constraint that was violated.
        reason: &'static str,
    },
}

/// Tuning for the avatar's locomotion model.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    /// Top horizontal speed in world units per second.
    pub max_linear_speed: f32,
    /// Rate at which the smoothed input vector follows raw input.
    pub acceleration: f32,
    /// Heading slerp rate per second.
    pub turn_rate: f32,
    /// Designer jump height before the 5% fudge.
    pub max_jump_height: f32,
    /// Total jump duration; the apex is reached at half of it.
    pub jump_duration: f32,
    /// Growth of the gravity magnitude per second.
    pub gravity_increase: f32,
    /// Acceleration scale while jumping.
    pub air_acceleration_multiplier: f32,
    /// Horizontal speed scale while jumping.
    pub air_speed_multiplier: f32,
    /// Radius of the avatar's collision body.
    pub body_radius: f32,
    /// Height of the avatar's collision body.
    pub body_height: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            max_linear_speed: DEFAULT_MAX_LINEAR_SPEED,
            acceleration: DEFAULT_ACCELERATION,
            turn_rate: DEFAULT_TURN_RATE,
            max_jump_height: DEFAULT_MAX_JUMP_HEIGHT,
            jump_duration: DEFAULT_JUMP_DURATION,
            gravity_increase: DEFAULT_GRAVITY_INCREASE,
            air_acceleration_multiplier: DEFAULT_AIR_ACCELERATION_MULTIPLIER,
            air_speed_multiplier: DEFAULT_AIR_SPEED_MULTIPLIER,
            body_radius: DEFAULT_BODY_RADIUS,
            body_height: DEFAULT_BODY_HEIGHT,
        }
    }
}

/// Tuning for push detection and force coupling.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushSettings {
    /// Probe length, also its forward start offset from the avatar.
    pub detection_range: f32,
    /// Probe height above the avatar origin.
    pub detection_height: f32,
    /// Force handed to the body each physics tick.
    pub push_force: f32,
    /// Minimum `dot(forward, -normal)` for a valid grab.
    pub alignment_threshold: f32,
    /// Gap kept between the avatar's body and the grabbed face.
    pub clearance: f32,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            detection_range: DEFAULT_DETECTION_RANGE,
            detection_height: DEFAULT_DETECTION_HEIGHT,
            push_force: DEFAULT_PUSH_FORCE,
            alignment_threshold: DEFAULT_ALIGNMENT_THRESHOLD,
            clearance: DEFAULT_PUSH_CLEARANCE,
        }
    }
}

/// Tuning for the follow camera.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Height above the focus.
    pub height: f32,
    /// Distance behind the focus along Z.
    pub depth: f32,
    /// Degrees subtracted from the geometric pitch.
    pub angle_offset: f32,
    /// Lateral framing reach in world units.
    pub lateral_offset: f32,
    /// Nominal lateral catch-up speed.
    pub lateral_speed: f32,
    /// Pitch swing in degrees per unit of forward framing.
    pub vertical_offset: f32,
    /// Nominal vertical catch-up speed.
    pub vertical_speed: f32,
    /// Speed boost applied on room change.
    pub change_focus_multiplier: f32,
    /// Rate at which current speeds return to nominal.
    pub catch_up_speed: f32,
    /// Nominal speed scale while a cinematic runs.
    pub cinematic_multiplier: f32,
    /// Rate at which the framing direction follows input.
    pub direction_acceleration: f32,
    /// Screen units per world unit for push-focus framing.
    pub screen_scale: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            height: DEFAULT_CAMERA_HEIGHT,
            depth: DEFAULT_CAMERA_DEPTH,
            angle_offset: DEFAULT_ANGLE_OFFSET,
            lateral_offset: DEFAULT_LATERAL_OFFSET,
            lateral_speed: DEFAULT_LATERAL_SPEED,
            vertical_offset: DEFAULT_VERTICAL_OFFSET,
            vertical_speed: DEFAULT_VERTICAL_SPEED,
            change_focus_multiplier: DEFAULT_CHANGE_FOCUS_MULTIPLIER,
            catch_up_speed: DEFAULT_CATCH_UP_SPEED,
            cinematic_multiplier: DEFAULT_CINEMATIC_MULTIPLIER,
            direction_acceleration: DEFAULT_DIRECTION_ACCELERATION,
            screen_scale: DEFAULT_SCREEN_SCALE,
        }
    }
}

/// Complete tuning set for a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookboundConfig {
    /// Avatar locomotion tuning.
    pub locomotion: LocomotionSettings,
    /// Push interaction tuning.
    pub push: PushSettings,
    /// Follow camera tuning.
    pub camera: CameraSettings,
}

fn require(condition: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

impl BookboundConfig {
    /// Reads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read,
    /// [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value fails [`Self::validate`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded tuning from {}", path.display());
        Ok(config)
    }

    /// Checks the values the integrators divide by or clamp against.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let loco = &self.locomotion;
        require(
            loco.jump_duration > 0.0,
            "locomotion.jump_duration",
            "must be positive",
        )?;
        require(
            loco.max_jump_height > 0.0,
            "locomotion.max_jump_height",
            "must be positive",
        )?;
        require(
            loco.max_linear_speed >= 0.0,
            "locomotion.max_linear_speed",
            "must not be negative",
        )?;
        require(
            loco.gravity_increase >= 0.0,
            "locomotion.gravity_increase",
            "must not be negative",
        )?;
        require(
            loco.body_radius > 0.0 && loco.body_height > 0.0,
            "locomotion.body_radius",
            "body dimensions must be positive",
        )?;
        require(
            (-1.0..=1.0).contains(&self.push.alignment_threshold),
            "push.alignment_threshold",
            "must lie within [-1, 1]",
        )?;
        require(
            self.push.detection_range > 0.0,
            "push.detection_range",
            "must be positive",
        )?;
        require(
            self.camera.cinematic_multiplier > 0.0,
            "camera.cinematic_multiplier",
            "must be positive",
        )?;
        require(
            self.camera.lateral_speed >= 0.0 && self.camera.vertical_speed >= 0.0,
            "camera.lateral_speed",
            "catch-up speeds must not be negative",
        )?;
        Ok(())
    }
}
