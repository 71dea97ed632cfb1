//! Capability traits consumed by the toggle engine.

pub mod gpio;
pub mod timer;

pub use gpio::{DigitalOutput, PinBank};
pub use timer::{FiringCallback, OneShotTimer, TimerFactory};
