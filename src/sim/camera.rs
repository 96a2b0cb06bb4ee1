//! Chase camera smoothing

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::settings::ControllerSettings;

/// Camera placement for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Trails the marble instead of snapping to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraFollower {
    smoothed_position: Vec3,
    smoothed_target: Vec3,
}

impl CameraFollower {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            smoothed_position: position,
            smoothed_target: target,
        }
    }

    /// Move the smoothed position and target toward the marble
    pub fn update(&mut self, body: Vec3, dt: f32, settings: &ControllerSettings) -> CameraPose {
        let desired_position = body + settings.camera_offset;
        let desired_target = body + settings.camera_target_offset;

        // Large frame times would overshoot past the desired point
        let t = (settings.camera_smoothing * dt).clamp(0.0, 1.0);
        self.smoothed_position = self.smoothed_position.lerp(desired_position, t);
        self.smoothed_target = self.smoothed_target.lerp(desired_target, t);

        self.pose()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.smoothed_position,
            look_at: self.smoothed_target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_step() {
        let settings = ControllerSettings::default();
        let mut cam = CameraFollower::new(Vec3::ZERO, Vec3::ZERO);
        // 5 * 0.1 = 0.5 of the way
        let pose = cam.update(Vec3::ZERO, 0.1, &settings);
        assert!((pose.position - Vec3::new(0.0, 0.475, 2.125)).length() < 1e-5);
        assert!((pose.look_at - Vec3::new(0.0, 0.125, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_large_dt_snaps_without_overshoot() {
        let settings = ControllerSettings::default();
        let mut cam = CameraFollower::new(Vec3::splat(10.0), Vec3::ZERO);
        let body = Vec3::new(2.0, 1.0, -2.0);
        let pose = cam.update(body, 1.0, &settings);
        assert!((pose.position - (body + settings.camera_offset)).length() < 1e-5);
        assert!((pose.look_at - (body + settings.camera_target_offset)).length() < 1e-5);
    }

    #[test]
    fn test_converges_on_still_body() {
        let settings = ControllerSettings::default();
        let mut cam = CameraFollower::new(Vec3::splat(10.0), Vec3::ZERO);
        let body = Vec3::new(2.0, 0.25, -6.0);
        for _ in 0..600 {
            cam.update(body, 1.0 / 60.0, &settings);
        }
        let pose = cam.pose();
        assert!((pose.position - Vec3::new(2.0, 1.2, -1.75)).length() < 1e-3);
        assert!((pose.look_at - Vec3::new(2.0, 0.5, -6.0)).length() < 1e-3);
    }

    #[test]
    fn test_zero_dt_holds() {
        let settings = ControllerSettings::default();
        let mut cam = CameraFollower::new(Vec3::ONE, Vec3::ONE);
        let pose = cam.update(Vec3::new(5.0, 5.0, 5.0), 0.0, &settings);
        assert_eq!(pose.position, Vec3::ONE);
        assert_eq!(pose.look_at, Vec3::ONE);
    }
}
