//! Rolling marble integrator
//!
//! Stands in for the physics engine in headless runs. Not a rigid-body
//! solver: one sphere, one flat floor, gravity, damping and rolling friction.

use glam::Vec3;

use crate::platform::PhysicsBody;
use crate::settings::BallSettings;
use crate::sim::PlayerTransform;

/// Walkable rectangle at y = 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floor {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Floor {
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }
}

/// Share of slip removed per tick at friction 1
const SLIP_RESPONSE: f32 = 10.0;
/// Below this the bounce is dropped
const REST_SPEED: f32 = 0.05;
/// How far below the surface a contact still counts
const CONTACT_DEPTH: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct RollingBody {
    transform: PlayerTransform,
    ball: BallSettings,
    floor: Floor,
    mass: f32,
    inertia: f32,
}

impl RollingBody {
    pub fn new(position: Vec3, ball: BallSettings, floor: Floor) -> Self {
        Self {
            transform: PlayerTransform::at_rest(position),
            mass: ball.mass(),
            inertia: ball.inertia(),
            ball,
            floor,
        }
    }

    pub fn linvel(&self) -> Vec3 {
        self.transform.linvel
    }

    pub fn angvel(&self) -> Vec3 {
        self.transform.angvel
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let r = self.ball.radius;
        let t = &mut self.transform;

        t.linvel.y -= self.ball.gravity * dt;
        t.linvel /= 1.0 + dt * self.ball.linear_damping;
        t.angvel /= 1.0 + dt * self.ball.angular_damping;
        t.position += t.linvel * dt;

        let supported = self.floor.contains(t.position);
        let touching = t.position.y <= r && t.position.y > r - CONTACT_DEPTH;
        if !(supported && touching) {
            return;
        }

        t.position.y = r;
        if t.linvel.y < 0.0 {
            let bounce = -t.linvel.y * self.ball.restitution;
            t.linvel.y = if bounce > REST_SPEED { bounce } else { 0.0 };
        }

        // Contact point velocity; zero when rolling without slipping
        let spin = Vec3::new(r * t.angvel.z, 0.0, -r * t.angvel.x);
        let slip = Vec3::new(t.linvel.x, 0.0, t.linvel.z) + spin;
        let correction = slip * (self.ball.friction * SLIP_RESPONSE * dt).min(1.0);

        // Solid sphere: 2/7 of the correction goes to linear, 5/7 to spin
        t.linvel -= correction * (2.0 / 7.0);
        let spin_fix = correction * (5.0 / 7.0) / r;
        t.angvel.z -= spin_fix.x;
        t.angvel.x += spin_fix.z;
    }
}

impl PhysicsBody for RollingBody {
    fn set_translation(&mut self, translation: Vec3) {
        self.transform.position = translation;
    }

    fn set_linvel(&mut self, linvel: Vec3) {
        self.transform.linvel = linvel;
    }

    fn set_angvel(&mut self, angvel: Vec3) {
        self.transform.angvel = angvel;
    }

    fn translation(&self) -> Vec3 {
        self.transform.position
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.transform.linvel += impulse / self.mass;
    }

    fn apply_torque_impulse(&mut self, torque: Vec3) {
        self.transform.angvel += torque / self.inertia;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Floor {
        Floor {
            min_x: 0.0,
            max_x: 4.0,
            min_z: -46.0,
            max_z: 0.0,
        }
    }

    #[test]
    fn test_settles_on_floor() {
        let mut body = RollingBody::new(Vec3::new(2.0, 1.0, -2.0), BallSettings::default(), course());
        for _ in 0..240 {
            body.step(1.0 / 60.0);
        }
        assert!((body.translation().y - 0.25).abs() < 1e-4);
        assert!(body.linvel().length() < 0.1);
    }

    #[test]
    fn test_falls_off_edge() {
        let mut body = RollingBody::new(Vec3::new(-1.0, 1.0, -2.0), BallSettings::default(), course());
        for _ in 0..120 {
            body.step(1.0 / 60.0);
        }
        assert!(body.translation().y < -4.0);
    }

    #[test]
    fn test_impulse_scales_by_mass() {
        let ball = BallSettings::default();
        let mass = ball.mass();
        let mut body = RollingBody::new(Vec3::ZERO, ball, course());
        body.apply_impulse(Vec3::new(0.0, 0.0, -mass));
        assert!((body.linvel() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_forward_torque_rolls_forward() {
        let mut body = RollingBody::new(Vec3::new(2.0, 0.25, -2.0), BallSettings::default(), course());
        body.apply_torque_impulse(Vec3::new(-0.01, 0.0, 0.0));
        for _ in 0..30 {
            body.step(1.0 / 60.0);
        }
        assert!(body.translation().z < -2.0);
    }

    #[test]
    fn test_reset_via_capability() {
        let mut body = RollingBody::new(Vec3::new(2.0, 0.25, -20.0), BallSettings::default(), course());
        body.apply_impulse(Vec3::ONE);
        body.set_translation(Vec3::new(2.0, 1.0, -2.0));
        body.set_linvel(Vec3::ZERO);
        body.set_angvel(Vec3::ZERO);
        assert_eq!(body.translation(), Vec3::new(2.0, 1.0, -2.0));
        assert_eq!(body.linvel(), Vec3::ZERO);
        assert_eq!(body.angvel(), Vec3::ZERO);
    }
}
