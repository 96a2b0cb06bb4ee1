//! Held input to impulse translation
//!
//! Directions add up independently; diagonals are not normalized.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{HeldDirections, SpeedModifier};
use crate::settings::ControllerSettings;

/// Impulses to inject into the body for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Drive {
    pub impulse: Vec3,
    pub torque: Vec3,
}

/// Linear impulse magnitude for one held direction
#[inline]
pub fn impulse_strength(dt: f32, modifier: SpeedModifier, settings: &ControllerSettings) -> f32 {
    settings.impulse_strength * dt * modifier.multiplier(settings)
}

/// Torque impulse magnitude for one held direction
#[inline]
pub fn torque_strength(dt: f32, modifier: SpeedModifier, settings: &ControllerSettings) -> f32 {
    settings.torque_strength * dt * modifier.multiplier(settings)
}

/// Map held directions to a linear impulse and a torque impulse.
///
/// Forward is -Z. Torque rolls the marble the same way it is pushed:
/// forward spins about -X, rightward about -Z.
pub fn translate(
    held: HeldDirections,
    dt: f32,
    modifier: SpeedModifier,
    settings: &ControllerSettings,
) -> Drive {
    let impulse_strength = impulse_strength(dt, modifier, settings);
    let torque_strength = torque_strength(dt, modifier, settings);

    let mut drive = Drive::default();

    if held.forward {
        drive.impulse.z -= impulse_strength;
        drive.torque.x -= torque_strength;
    }
    if held.rightward {
        drive.impulse.x += impulse_strength;
        drive.torque.z -= torque_strength;
    }
    if held.backward {
        drive.impulse.z += impulse_strength;
        drive.torque.x += torque_strength;
    }
    if held.leftward {
        drive.impulse.x -= impulse_strength;
        drive.torque.z += torque_strength;
    }

    drive
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-6
    }

    #[test]
    fn test_forward_boosted() {
        let settings = ControllerSettings::default();
        let drive = translate(HeldDirections::FORWARD, 0.016, SpeedModifier::Boosted, &settings);
        assert!(close(drive.impulse, Vec3::new(0.0, 0.0, -0.0288)));
        assert!(close(drive.torque, Vec3::new(-0.0096, 0.0, 0.0)));
    }

    #[test]
    fn test_no_input_is_zero() {
        let settings = ControllerSettings::default();
        let drive = translate(HeldDirections::NONE, 0.016, SpeedModifier::Normal, &settings);
        assert_eq!(drive, Drive::default());
    }

    #[test]
    fn test_opposites_cancel() {
        let settings = ControllerSettings::default();
        let held = HeldDirections {
            forward: true,
            backward: true,
            leftward: true,
            rightward: true,
        };
        let drive = translate(held, 0.016, SpeedModifier::Normal, &settings);
        assert!(close(drive.impulse, Vec3::ZERO));
        assert!(close(drive.torque, Vec3::ZERO));
    }

    #[test]
    fn test_diagonal_not_normalized() {
        let settings = ControllerSettings::default();
        let held = HeldDirections {
            forward: true,
            rightward: true,
            ..Default::default()
        };
        let drive = translate(held, 0.1, SpeedModifier::Normal, &settings);
        assert!(close(drive.impulse, Vec3::new(0.06, 0.0, -0.06)));
        assert!(close(drive.torque, Vec3::new(-0.02, 0.0, -0.02)));
    }

    #[test]
    fn test_leftward_backward() {
        let settings = ControllerSettings::default();
        let held = HeldDirections {
            backward: true,
            leftward: true,
            ..Default::default()
        };
        let drive = translate(held, 0.1, SpeedModifier::Reduced, &settings);
        assert!(close(drive.impulse, Vec3::new(-0.006, 0.0, 0.006)));
        assert!(close(drive.torque, Vec3::new(0.002, 0.0, 0.002)));
    }

    proptest! {
        #[test]
        fn prop_strength_by_modifier(dt in 0.0001f32..1.0) {
            let settings = ControllerSettings::default();
            let boosted = impulse_strength(dt, SpeedModifier::from_flags(true, false), &settings);
            let reduced = impulse_strength(dt, SpeedModifier::from_flags(false, true), &settings);
            let both = impulse_strength(dt, SpeedModifier::from_flags(true, true), &settings);
            let neither = impulse_strength(dt, SpeedModifier::from_flags(false, false), &settings);

            prop_assert!((boosted - 1.8 * dt).abs() < 1e-5);
            prop_assert!((reduced - 0.06 * dt).abs() < 1e-6);
            prop_assert!((both - 0.6 * dt).abs() < 1e-6);
            prop_assert!((neither - 0.6 * dt).abs() < 1e-6);
        }

        #[test]
        fn prop_components_bounded_by_strength(
            dt in 0.0001f32..1.0,
            forward in any::<bool>(),
            backward in any::<bool>(),
            leftward in any::<bool>(),
            rightward in any::<bool>(),
            boosted in any::<bool>(),
            reduced in any::<bool>(),
        ) {
            let settings = ControllerSettings::default();
            let modifier = SpeedModifier::from_flags(boosted, reduced);
            let held = HeldDirections { forward, backward, leftward, rightward };
            let drive = translate(held, dt, modifier, &settings);
            let s = impulse_strength(dt, modifier, &settings);
            let t = torque_strength(dt, modifier, &settings);

            prop_assert!(s >= 0.0 && t >= 0.0);
            prop_assert_eq!(drive.impulse.y, 0.0);
            prop_assert_eq!(drive.torque.y, 0.0);
            prop_assert!(drive.impulse.x.abs() <= s + 1e-6);
            prop_assert!(drive.impulse.z.abs() <= s + 1e-6);
            prop_assert!(drive.torque.x.abs() <= t + 1e-6);
            prop_assert!(drive.torque.z.abs() <= t + 1e-6);
        }
    }
}
