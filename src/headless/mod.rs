//! Headless runtime
//!
//! In-process implementations of the platform capabilities, used by the
//! `marble-dash` binary and by tests:
//! - `RollingBody`: single-sphere integrator over a flat course floor
//! - `GameStore`: shared phase store with command log
//! - `KeyboardState` / `Autopilot`: held keys and a seeded driver for them
//! - `RecordingSink` / `LoggingProgression`: camera and reveal recorders

pub mod body;
pub mod input;
pub mod session;
pub mod sinks;
pub mod store;

pub use body::{Floor, RollingBody};
pub use input::{Autopilot, Direction, KeyboardState};
pub use session::{HeadlessController, RunSummary, course_floor, mount, run_session};
pub use sinks::{LoggingProgression, RecordingSink};
pub use store::GameStore;
