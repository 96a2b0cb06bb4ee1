//! Controller state and core simulation types
//!
//! Everything that survives between ticks lives in [`ControllerState`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::camera::CameraFollower;
use super::progression::ProgressionTracker;
use crate::settings::ControllerSettings;

/// Coarse lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Marble at spawn, waiting for the first key
    #[default]
    Ready,
    /// Active run
    Playing,
    /// Course cleared
    Ended,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::Ended => "ended",
        }
    }
}

/// Directions currently held by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeldDirections {
    pub forward: bool,
    pub backward: bool,
    pub leftward: bool,
    pub rightward: bool,
}

impl HeldDirections {
    pub const NONE: Self = Self {
        forward: false,
        backward: false,
        leftward: false,
        rightward: false,
    };

    pub const FORWARD: Self = Self {
        forward: true,
        ..Self::NONE
    };

    /// True if any direction is held
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.leftward || self.rightward
    }
}

/// Speed modifier derived from the store's boost/reduce flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedModifier {
    #[default]
    Normal,
    Boosted,
    Reduced,
}

impl SpeedModifier {
    /// Boost and reduction cancel each other out
    pub fn from_flags(boosted: bool, reduced: bool) -> Self {
        match (boosted, reduced) {
            (true, false) => SpeedModifier::Boosted,
            (false, true) => SpeedModifier::Reduced,
            _ => SpeedModifier::Normal,
        }
    }

    pub fn multiplier(&self, settings: &ControllerSettings) -> f32 {
        match self {
            SpeedModifier::Normal => 1.0,
            SpeedModifier::Boosted => settings.boost_multiplier,
            SpeedModifier::Reduced => settings.reduction_multiplier,
        }
    }
}

/// Body transform as seen through the physics capability
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerTransform {
    pub position: Vec3,
    pub linvel: Vec3,
    pub angvel: Vec3,
}

impl PlayerTransform {
    /// At rest at the given position
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
        }
    }
}

/// Notifications delivered by subscriptions, drained at the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    PhaseChanged(GamePhase),
    AnyKey,
}

/// Phase transition requests issued to the shared store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseCommand {
    Start,
    End,
    Restart,
}

/// Per-entity controller state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerState {
    /// Identity reported with row reveals
    pub session_id: u32,
    /// Row detector (owns `last_row`)
    pub progression: ProgressionTracker,
    /// Smoothed chase camera
    pub camera: CameraFollower,
    /// `start()` already requested this ready period
    pub start_requested: bool,
    /// `end()` already issued for the current crossing
    pub end_requested: bool,
    /// `restart()` already issued for the current fall
    pub restart_requested: bool,
}

impl ControllerState {
    pub fn new(session_id: u32, settings: &ControllerSettings) -> Self {
        Self {
            session_id,
            progression: ProgressionTracker::new(),
            camera: CameraFollower::new(
                settings.camera_start_position,
                settings.camera_start_target,
            ),
            start_requested: false,
            end_requested: false,
            restart_requested: false,
        }
    }

    /// Highest row reached since the last respawn
    pub fn last_row(&self) -> u32 {
        self.progression.last_row()
    }

    /// Respawn bookkeeping: row counter back to 0, triggers re-armed.
    /// The camera keeps its smoothed values so it glides back to spawn.
    pub fn reset_for_respawn(&mut self) {
        self.progression.reset();
        self.start_requested = false;
        self.end_requested = false;
        self.restart_requested = false;
    }
}
