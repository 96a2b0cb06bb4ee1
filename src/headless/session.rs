//! Headless play session
//!
//! Wires the controller to the in-process collaborators and runs it at a
//! fixed frame step with the autopilot at the keys.

use serde::{Deserialize, Serialize};

use super::body::{Floor, RollingBody};
use super::input::{Autopilot, KeyboardState};
use super::sinks::{LoggingProgression, RecordingSink};
use super::store::GameStore;
use crate::controller::PlayerController;
use crate::platform::{PhysicsBody, SharedGameStore};
use crate::settings::RunSettings;
use crate::sim::{GamePhase, PhaseCommand};
use crate::finish_line_z;

/// Past the finish line the floor runs on for this many rows
const RUNOFF_ROWS: f32 = 1.0;

/// Result of a headless run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub frames: u32,
    /// Highest row revealed
    pub max_row: u32,
    /// Reveal notifications sent
    pub reveals: usize,
    pub restarts: usize,
    pub final_phase: GamePhase,
    /// Frame on which `end()` was first requested
    pub finished_at_frame: Option<u32>,
}

pub type HeadlessController =
    PlayerController<RollingBody, KeyboardState, GameStore, LoggingProgression, RecordingSink>;

/// Floor covering every row plus the runoff past the finish line
pub fn course_floor(settings: &RunSettings) -> Floor {
    let c = &settings.controller;
    let finish_z = finish_line_z(settings.course.blocks_count, c.row_length, c.end_margin);
    Floor {
        min_x: settings.course.floor_x[0],
        max_x: settings.course.floor_x[1],
        min_z: finish_z - RUNOFF_ROWS * c.row_length,
        max_z: 0.0,
    }
}

/// Mount a controller with a body at spawn
pub fn mount(settings: &RunSettings, keys: &KeyboardState, store: &GameStore) -> HeadlessController {
    let mut controller = PlayerController::mount(
        settings.controller.clone(),
        settings.course.session_id,
        keys.clone(),
        store.clone(),
        LoggingProgression::default(),
        RecordingSink::default(),
    );
    controller.attach_body(RollingBody::new(
        settings.controller.spawn_position,
        settings.ball.clone(),
        course_floor(settings),
    ));
    controller
}

/// Play until the course is cleared or `max_frames` have run
pub fn run_session(settings: &RunSettings, seed: u64, max_frames: u32, dt: f32) -> RunSummary {
    let store = GameStore::new(settings.course.blocks_count);
    let keys = KeyboardState::new();
    let mut controller = mount(settings, &keys, &store);
    let lane_center = (settings.course.floor_x[0] + settings.course.floor_x[1]) / 2.0;
    let mut pilot = Autopilot::new(seed, lane_center);

    log::info!(
        "Headless session: seed={}, rows={}, max_frames={}",
        seed,
        settings.course.blocks_count,
        max_frames
    );

    let mut frames = 0;
    let mut finished_at_frame = None;
    while frames < max_frames {
        if let Some(body) = controller.body() {
            keys.set_held(pilot.next_held(body.translation(), body.linvel()));
        }

        controller.on_frame(dt);
        if let Some(body) = controller.body_mut() {
            body.step(dt);
        }
        frames += 1;

        if store.phase() == GamePhase::Ended {
            finished_at_frame = Some(frames);
            break;
        }
    }

    let commands = store.command_log();
    let summary = RunSummary {
        seed,
        frames,
        max_row: controller
            .progression()
            .revealed
            .iter()
            .map(|&(_, row)| row)
            .max()
            .unwrap_or(0),
        reveals: controller.progression().revealed.len(),
        restarts: commands
            .iter()
            .filter(|c| **c == PhaseCommand::Restart)
            .count(),
        final_phase: store.phase(),
        finished_at_frame,
    };
    controller.unmount();

    log::info!(
        "Session over after {} frames: phase={}, max_row={}, restarts={}",
        summary.frames,
        summary.final_phase.as_str(),
        summary.max_row,
        summary.restarts
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::headless::Direction;

    #[test]
    fn test_session_is_deterministic() {
        let settings = RunSettings::default();
        let a = run_session(&settings, 1234, 600, FRAME_DT);
        let b = run_session(&settings, 1234, 600, FRAME_DT);
        assert_eq!(a, b);
    }

    #[test]
    fn test_session_makes_progress() {
        let settings = RunSettings::default();
        let summary = run_session(&settings, 99, 600, FRAME_DT);
        assert!(summary.max_row >= 1);
        assert!(summary.reveals >= 1);
        assert!(summary.frames <= 600);
    }

    #[test]
    fn test_course_floor_covers_finish() {
        let settings = RunSettings::default();
        let floor = course_floor(&settings);
        assert_eq!(floor.min_z, -46.0);
        assert!(floor.contains(settings.controller.spawn_position));
    }

    #[test]
    fn test_rolling_off_the_side_respawns() {
        let settings = RunSettings::default();
        let store = GameStore::new(settings.course.blocks_count);
        let keys = KeyboardState::new();
        let mut controller = mount(&settings, &keys, &store);

        keys.press(Direction::Rightward);
        let mut respawned = false;
        for _ in 0..600 {
            controller.on_frame(FRAME_DT);
            if store.command_log().contains(&PhaseCommand::Restart) {
                respawned = true;
                break;
            }
            controller.body_mut().unwrap().step(FRAME_DT);
        }

        assert!(respawned);
        assert_eq!(store.phase(), GamePhase::Ready);
        let body = controller.body().unwrap();
        assert_eq!(body.translation(), settings.controller.spawn_position);
        assert_eq!(body.linvel(), glam::Vec3::ZERO);
        assert_eq!(body.angvel(), glam::Vec3::ZERO);
        assert_eq!(controller.state().last_row(), 0);
    }
}
