//! Keyboard state and seeded autopilot

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::platform::{InputSource, Subscription};
use crate::sim::HeldDirections;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Leftward,
    Rightward,
}

type KeyListener = Box<dyn FnMut()>;

struct KeyboardInner {
    held: Cell<HeldDirections>,
    listeners: RefCell<Vec<(u64, KeyListener)>>,
    next_listener_id: Cell<u64>,
}

/// Held-direction state; clones share the same keyboard
#[derive(Clone)]
pub struct KeyboardState {
    inner: Rc<KeyboardInner>,
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardState {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(KeyboardInner {
                held: Cell::new(HeldDirections::NONE),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(1),
            }),
        }
    }

    pub fn press(&self, direction: Direction) {
        let mut held = self.inner.held.get();
        set(&mut held, direction, true);
        self.set_held(held);
    }

    pub fn release(&self, direction: Direction) {
        let mut held = self.inner.held.get();
        set(&mut held, direction, false);
        self.set_held(held);
    }

    pub fn release_all(&self) {
        self.inner.held.set(HeldDirections::NONE);
    }

    /// Replace the held set; fires key listeners if anything new went down
    pub fn set_held(&self, held: HeldDirections) {
        let prev = self.inner.held.get();
        self.inner.held.set(held);

        let newly_pressed = HeldDirections {
            forward: held.forward && !prev.forward,
            backward: held.backward && !prev.backward,
            leftward: held.leftward && !prev.leftward,
            rightward: held.rightward && !prev.rightward,
        };
        if newly_pressed.any() {
            for (_, listener) in self.inner.listeners.borrow_mut().iter_mut() {
                listener();
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

fn set(held: &mut HeldDirections, direction: Direction, down: bool) {
    match direction {
        Direction::Forward => held.forward = down,
        Direction::Backward => held.backward = down,
        Direction::Leftward => held.leftward = down,
        Direction::Rightward => held.rightward = down,
    }
}

impl InputSource for KeyboardState {
    fn held_directions(&self) -> HeldDirections {
        self.inner.held.get()
    }

    fn on_any_key(&self, callback: Box<dyn FnMut()>) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, callback));

        let weak: Weak<KeyboardInner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }
}

/// Plays the course: holds forward and steers back toward the lane center
pub struct Autopilot {
    rng: Pcg32,
    lane_center: f32,
    /// Frames left on a random lateral tap
    wobble_frames: u32,
    wobble: Option<Direction>,
}

impl Autopilot {
    pub fn new(seed: u64, lane_center: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            lane_center,
            wobble_frames: 0,
            wobble: None,
        }
    }

    pub fn next_held(&mut self, position: Vec3, velocity: Vec3) -> HeldDirections {
        let mut held = HeldDirections {
            // Occasionally ease off
            forward: !self.rng.random_bool(0.05),
            ..HeldDirections::NONE
        };

        if self.wobble_frames > 0 {
            self.wobble_frames -= 1;
        } else if self.rng.random_bool(0.02) {
            self.wobble_frames = self.rng.random_range(3..12);
            self.wobble = Some(if self.rng.random_bool(0.5) {
                Direction::Leftward
            } else {
                Direction::Rightward
            });
        } else {
            self.wobble = None;
        }

        // Lead the lateral drift so corrections don't overshoot
        let drift = position.x - self.lane_center + velocity.x * 0.3;
        if drift > 0.3 {
            held.leftward = true;
        } else if drift < -0.3 {
            held.rightward = true;
        } else if let Some(direction) = self.wobble {
            set(&mut held, direction, true);
        }

        held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_fires_listeners_once() {
        let keys = KeyboardState::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let _sub = keys.on_any_key(Box::new(move || c.set(c.get() + 1)));

        keys.press(Direction::Forward);
        keys.press(Direction::Forward);
        assert_eq!(count.get(), 1);

        keys.press(Direction::Leftward);
        assert_eq!(count.get(), 2);

        keys.release(Direction::Forward);
        assert_eq!(count.get(), 2);
        assert_eq!(
            keys.held_directions(),
            HeldDirections {
                leftward: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_subscription_release() {
        let keys = KeyboardState::new();
        let sub = keys.on_any_key(Box::new(|| {}));
        assert_eq!(keys.listener_count(), 1);
        sub.release();
        assert_eq!(keys.listener_count(), 0);
    }

    #[test]
    fn test_autopilot_deterministic() {
        let mut a = Autopilot::new(42, 2.0);
        let mut b = Autopilot::new(42, 2.0);
        for i in 0..200 {
            let pos = Vec3::new(2.0 + (i as f32 * 0.1).sin(), 0.25, -(i as f32) * 0.1);
            assert_eq!(a.next_held(pos, Vec3::ZERO), b.next_held(pos, Vec3::ZERO));
        }
    }

    #[test]
    fn test_autopilot_steers_to_center() {
        let mut pilot = Autopilot::new(7, 2.0);
        let held = pilot.next_held(Vec3::new(3.5, 0.25, -5.0), Vec3::ZERO);
        assert!(held.leftward && !held.rightward);
        let held = pilot.next_held(Vec3::new(0.5, 0.25, -5.0), Vec3::ZERO);
        assert!(held.rightward && !held.leftward);
    }
}
