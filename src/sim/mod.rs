//! Controller simulation module
//!
//! All per-tick logic lives here. This module must stay free of engine and
//! platform dependencies:
//! - Inputs are plain values sampled by the caller
//! - Outputs are effects the caller applies
//! - State between ticks lives in `ControllerState`

pub mod camera;
pub mod impulse;
pub mod progression;
pub mod state;
pub mod tick;

pub use camera::{CameraFollower, CameraPose};
pub use impulse::{Drive, impulse_strength, torque_strength, translate};
pub use progression::ProgressionTracker;
pub use state::{
    ControllerEvent, ControllerState, GamePhase, HeldDirections, PhaseCommand, PlayerTransform,
    SpeedModifier,
};
pub use tick::{EventEffects, TickEffects, TickInput, handle_event, tick};
