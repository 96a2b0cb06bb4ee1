//! Row-crossing detection for procedural reveal
//!
//! Rows are `row_length` long and run along -Z. Each newly reached row is
//! reported once; going back over revealed rows reports nothing.

use serde::{Deserialize, Serialize};

use crate::row_at;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionTracker {
    last_row: u32,
}

impl ProgressionTracker {
    pub fn new() -> Self {
        Self { last_row: 0 }
    }

    pub fn last_row(&self) -> u32 {
        self.last_row
    }

    /// Returns the row to reveal if `z` lies past every row reached so far
    pub fn observe(&mut self, z: f32, row_length: f32) -> Option<u32> {
        let current = row_at(z, row_length);
        if current > i64::from(self.last_row) {
            // Rows past u32::MAX are unreachable on any real course
            let row = u32::try_from(current).unwrap_or(u32::MAX);
            if row == self.last_row {
                return None;
            }
            self.last_row = row;
            Some(row)
        } else {
            None
        }
    }

    /// Back to the first row (respawn)
    pub fn reset(&mut self) {
        self.last_row = 0;
    }
}
