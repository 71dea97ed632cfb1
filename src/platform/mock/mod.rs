//! Mock platform backends for deterministic tests.

pub mod gpio;
pub mod timer;

pub use gpio::{LevelTrace, MockOutput, MockPinBank};
pub use timer::MockTimer;
