//! Platform abstraction layer
//!
//! Capabilities the controller needs from the host engine:
//! - Rigid body access (physics solver)
//! - Held-key sampling and key-press notification
//! - Shared game store (phase, flags, commands)
//! - Progression reveal service
//! - Camera output

pub mod subscription;

pub use subscription::Subscription;

use glam::Vec3;
use thiserror::Error;

use crate::sim::{GamePhase, HeldDirections};

/// Rigid body handle owned by the physics engine
pub trait PhysicsBody {
    fn set_translation(&mut self, translation: Vec3);
    fn set_linvel(&mut self, linvel: Vec3);
    fn set_angvel(&mut self, angvel: Vec3);
    fn translation(&self) -> Vec3;
    fn apply_impulse(&mut self, impulse: Vec3);
    fn apply_torque_impulse(&mut self, torque: Vec3);
}

/// Keyboard (or any directional device)
pub trait InputSource {
    fn held_directions(&self) -> HeldDirections;
    /// Called whenever a key goes down
    fn on_any_key(&self, callback: Box<dyn FnMut()>) -> Subscription;
}

/// Shared game store; commands request transitions, the store decides
pub trait SharedGameStore {
    fn phase(&self) -> GamePhase;
    fn blocks_count(&self) -> u32;
    fn is_speed_boost_active(&self) -> bool;
    fn is_speed_reduced(&self) -> bool;
    fn is_paused(&self) -> bool;

    fn start(&self);
    fn end(&self);
    fn restart(&self);

    fn on_phase_change(&self, callback: Box<dyn FnMut(GamePhase)>) -> Subscription;
}

/// Failure reported by a progression service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    #[error("progression service unavailable")]
    Unavailable,
    #[error("row {row} rejected: {reason}")]
    Rejected { row: u32, reason: String },
}

/// Fire-and-forget reveal of obstacle rows
pub trait ProgressionService {
    fn reveal_row(&mut self, session_id: u32, row: u32) -> Result<(), RevealError>;
}

/// Camera output
pub trait RenderSink {
    fn set_camera_position(&mut self, position: Vec3);
    fn set_camera_look_at(&mut self, target: Vec3);
}
