//! Recording render sink and progression service

use glam::Vec3;

use crate::platform::{ProgressionService, RenderSink, RevealError};

/// Keeps every camera update
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub positions: Vec<Vec3>,
    pub targets: Vec<Vec3>,
}

impl RenderSink for RecordingSink {
    fn set_camera_position(&mut self, position: Vec3) {
        self.positions.push(position);
    }

    fn set_camera_look_at(&mut self, target: Vec3) {
        self.targets.push(target);
    }
}

/// Logs and records reveals; never fails
#[derive(Debug, Clone, Default)]
pub struct LoggingProgression {
    /// `(session_id, row)` in arrival order
    pub revealed: Vec<(u32, u32)>,
}

impl ProgressionService for LoggingProgression {
    fn reveal_row(&mut self, session_id: u32, row: u32) -> Result<(), RevealError> {
        log::info!("Reveal row {} for session {}", row, session_id);
        self.revealed.push((session_id, row));
        Ok(())
    }
}
