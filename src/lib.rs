//! Marble Dash - player controller core for a marble obstacle-course racer
//!
//! Core modules:
//! - `sim`: Per-tick controller logic (impulses, camera, row progress, outcomes)
//! - `controller`: Wires the sim to physics, input, store, progression and render
//! - `platform`: Capabilities the controller needs from the host engine
//! - `headless`: In-process implementations of those capabilities
//! - `settings`: Tunable controller, ball and course options

pub mod controller;
pub mod headless;
pub mod platform;
pub mod settings;
pub mod sim;

pub use controller::PlayerController;
pub use settings::{BallSettings, ControllerSettings, CourseSettings, SettingsError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Base linear impulse per second of held input
    pub const BASE_IMPULSE_STRENGTH: f32 = 0.6;
    /// Base torque impulse per second of held input
    pub const BASE_TORQUE_STRENGTH: f32 = 0.2;
    /// Speed boost pickup multiplier
    pub const BOOST_MULTIPLIER: f32 = 3.0;
    /// Speed reduction trap multiplier
    pub const REDUCTION_MULTIPLIER: f32 = 0.1;

    /// Camera sits above and behind the marble
    pub const CAMERA_OFFSET: [f32; 3] = [0.0, 0.95, 4.25];
    /// Camera looks slightly above the marble center
    pub const CAMERA_TARGET_OFFSET: [f32; 3] = [0.0, 0.25, 0.0];
    /// Exponential-ish smoothing rate (per second)
    pub const CAMERA_SMOOTHING: f32 = 5.0;
    /// First-frame camera position, so the view sweeps in on mount
    pub const CAMERA_START_POSITION: [f32; 3] = [10.0, 10.0, 10.0];

    /// Length of one obstacle row along -Z
    pub const ROW_LENGTH: f32 = 4.0;
    /// Extra distance past the last row before the run counts as finished
    pub const END_MARGIN: f32 = 2.0;
    /// Falling below this height triggers a respawn
    pub const FALL_THRESHOLD: f32 = -4.0;
    /// Spawn point on the first row
    pub const SPAWN_POSITION: [f32; 3] = [2.0, 1.0, -2.0];

    /// Session id reported to the progression service
    pub const DEFAULT_SESSION_ID: u32 = 11;
    /// Rows in a default course
    pub const DEFAULT_BLOCKS_COUNT: u32 = 10;

    /// Headless frame step (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Build a `Vec3` from a constant triple
#[inline]
pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

/// Row index containing a given Z coordinate (rows run along -Z).
///
/// Positions ahead of the start line (z > 0) map to negative rows.
#[inline]
pub fn row_at(z: f32, row_length: f32) -> i64 {
    (-z / row_length).floor() as i64
}

/// Z coordinate past which the course counts as cleared
#[inline]
pub fn finish_line_z(blocks_count: u32, row_length: f32, end_margin: f32) -> f32 {
    -(blocks_count as f32 * row_length + end_margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_at() {
        assert_eq!(row_at(-4.1, 4.0), 1);
        assert_eq!(row_at(-3.9, 4.0), 0);
        assert_eq!(row_at(-8.0, 4.0), 2);
        assert_eq!(row_at(0.5, 4.0), -1);
    }

    #[test]
    fn test_finish_line() {
        assert_eq!(finish_line_z(10, 4.0, 2.0), -42.0);
        assert_eq!(finish_line_z(0, 4.0, 2.0), -2.0);
    }
}
