//! Controller, ball and course settings
//!
//! Defaults mirror `crate::consts`. Settings can be overridden from a JSON
//! file; missing fields fall back to their defaults.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::vec3;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Per-entity controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    // === Drive ===
    /// Linear impulse per second of held input
    pub impulse_strength: f32,
    /// Torque impulse per second of held input
    pub torque_strength: f32,
    /// Multiplier while a speed boost is active
    pub boost_multiplier: f32,
    /// Multiplier while a speed reduction is active
    pub reduction_multiplier: f32,

    // === Camera ===
    /// Camera offset from the marble
    pub camera_offset: Vec3,
    /// Look-at offset from the marble
    pub camera_target_offset: Vec3,
    /// Smoothing rate; lerp factor per tick is `rate * dt` clamped to 1
    pub camera_smoothing: f32,
    /// Smoothed camera position before the first tick
    pub camera_start_position: Vec3,
    /// Smoothed camera target before the first tick
    pub camera_start_target: Vec3,

    // === Course ===
    /// Row length along -Z
    pub row_length: f32,
    /// Distance past the last row that finishes the run
    pub end_margin: f32,
    /// Height below which the marble respawns
    pub fall_threshold: f32,
    /// Respawn position
    pub spawn_position: Vec3,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            impulse_strength: BASE_IMPULSE_STRENGTH,
            torque_strength: BASE_TORQUE_STRENGTH,
            boost_multiplier: BOOST_MULTIPLIER,
            reduction_multiplier: REDUCTION_MULTIPLIER,

            camera_offset: vec3(CAMERA_OFFSET),
            camera_target_offset: vec3(CAMERA_TARGET_OFFSET),
            camera_smoothing: CAMERA_SMOOTHING,
            camera_start_position: vec3(CAMERA_START_POSITION),
            camera_start_target: Vec3::ZERO,

            row_length: ROW_LENGTH,
            end_margin: END_MARGIN,
            fall_threshold: FALL_THRESHOLD,
            spawn_position: vec3(SPAWN_POSITION),
        }
    }
}

impl ControllerSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the tick logic can't work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("impulse_strength", self.impulse_strength)?;
        positive("torque_strength", self.torque_strength)?;
        positive("boost_multiplier", self.boost_multiplier)?;
        positive("reduction_multiplier", self.reduction_multiplier)?;
        positive("camera_smoothing", self.camera_smoothing)?;
        positive("row_length", self.row_length)?;
        if !self.end_margin.is_finite() || self.end_margin < 0.0 {
            return Err(SettingsError::Invalid {
                field: "end_margin",
                reason: format!("must be finite and >= 0, got {}", self.end_margin),
            });
        }
        if !self.fall_threshold.is_finite() {
            return Err(SettingsError::Invalid {
                field: "fall_threshold",
                reason: "must be finite".to_string(),
            });
        }
        if !self.spawn_position.is_finite() {
            return Err(SettingsError::Invalid {
                field: "spawn_position",
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: format!("must be finite and > 0, got {value}"),
        })
    }
}

/// Rigid body options for the headless marble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallSettings {
    pub radius: f32,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Downward acceleration (m/s²)
    pub gravity: f32,
}

impl Default for BallSettings {
    fn default() -> Self {
        Self {
            radius: 0.25,
            density: 1.0,
            restitution: 0.2,
            friction: 1.0,
            linear_damping: 0.5,
            angular_damping: 0.5,
            gravity: 9.81,
        }
    }
}

impl BallSettings {
    /// Zero radius or density makes mass and inertia zero
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("ball.radius", self.radius)?;
        positive("ball.density", self.density)?;
        positive("ball.gravity", self.gravity)?;
        for (field, value) in [
            ("ball.restitution", self.restitution),
            ("ball.friction", self.friction),
            ("ball.linear_damping", self.linear_damping),
            ("ball.angular_damping", self.angular_damping),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be finite and >= 0, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Solid sphere mass
    pub fn mass(&self) -> f32 {
        self.density * 4.0 / 3.0 * std::f32::consts::PI * self.radius.powi(3)
    }

    /// Solid sphere moment of inertia
    pub fn inertia(&self) -> f32 {
        0.4 * self.mass() * self.radius * self.radius
    }
}

/// Course layout for the headless runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseSettings {
    /// Number of obstacle rows
    pub blocks_count: u32,
    /// Floor extent along X, `[min, max]`
    pub floor_x: [f32; 2],
    /// Session id reported on reveals
    pub session_id: u32,
}

impl Default for CourseSettings {
    fn default() -> Self {
        Self {
            blocks_count: DEFAULT_BLOCKS_COUNT,
            floor_x: [0.0, 4.0],
            session_id: DEFAULT_SESSION_ID,
        }
    }
}

/// Everything the headless binary reads from a settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub controller: ControllerSettings,
    pub ball: BallSettings,
    pub course: CourseSettings,
}

impl RunSettings {
    /// Parse and validate the controller and ball sections
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.controller.validate()?;
        settings.ball.validate()?;
        Ok(settings)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded run settings from {}", path.as_ref().display());
        Ok(settings)
    }
}
