//! Per-frame controller evaluation
//!
//! Pure over its inputs: the caller samples the body and store, and applies
//! the returned effects. Drive impulses come from [`super::impulse::translate`]
//! and must be applied before the body position fed into [`tick`] is read.

use glam::Vec3;

use super::camera::CameraPose;
use super::state::{ControllerEvent, ControllerState, GamePhase, PhaseCommand};
use crate::finish_line_z;
use crate::settings::ControllerSettings;

/// Observations for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Phase as currently held by the store
    pub phase: GamePhase,
    /// Rows in the current course
    pub blocks_count: u32,
    /// Body translation after this tick's impulses were applied
    pub position: Vec3,
}

/// What the caller must do after a tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickEffects {
    /// Camera placement for the render sink
    pub camera: CameraPose,
    /// Row to report to the progression service
    pub reveal: Option<u32>,
    /// Phase transitions to request, in order
    pub commands: Vec<PhaseCommand>,
}

/// What the caller must do after a subscription event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventEffects {
    /// Put the body back at spawn with zero velocity
    pub respawn: bool,
    pub command: Option<PhaseCommand>,
}

/// Camera, progression and outcome evaluation for one tick
pub fn tick(
    state: &mut ControllerState,
    input: &TickInput,
    dt: f32,
    settings: &ControllerSettings,
) -> TickEffects {
    let camera = state.camera.update(input.position, dt, settings);
    let reveal = state.progression.observe(input.position.z, settings.row_length);

    let mut commands = Vec::new();
    if input.phase == GamePhase::Playing {
        let finish_z = finish_line_z(input.blocks_count, settings.row_length, settings.end_margin);
        if edge(&mut state.end_requested, input.position.z < finish_z) {
            commands.push(PhaseCommand::End);
        }
    }
    // A marble that rolls off after finishing still respawns
    if matches!(input.phase, GamePhase::Playing | GamePhase::Ended)
        && edge(
            &mut state.restart_requested,
            input.position.y < settings.fall_threshold,
        )
    {
        commands.push(PhaseCommand::Restart);
    }

    TickEffects {
        camera,
        reveal,
        commands,
    }
}

/// React to a phase change or key notification
pub fn handle_event(
    state: &mut ControllerState,
    event: ControllerEvent,
    phase: GamePhase,
) -> EventEffects {
    match event {
        ControllerEvent::PhaseChanged(GamePhase::Ready) => {
            state.reset_for_respawn();
            EventEffects {
                respawn: true,
                command: None,
            }
        }
        ControllerEvent::PhaseChanged(_) => EventEffects::default(),
        ControllerEvent::AnyKey => {
            if phase == GamePhase::Ready && !state.start_requested {
                state.start_requested = true;
                EventEffects {
                    respawn: false,
                    command: Some(PhaseCommand::Start),
                }
            } else {
                EventEffects::default()
            }
        }
    }
}

/// Rising-edge detector: true only on the tick `condition` becomes true.
/// The latch re-arms once the condition clears.
fn edge(latch: &mut bool, condition: bool) -> bool {
    let fire = condition && !*latch;
    *latch = condition;
    fire
}
