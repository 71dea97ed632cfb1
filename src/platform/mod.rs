//! Platform capability layer.
//!
//! The traits here are the only surface the core sees of the outside
//! world: a claimable digital output and a one-shot timer. Two backends
//! ship with the crate: mocks for deterministic tests and a thread-backed
//! timer for hosts without a hardware timer facility.

pub mod host;
pub mod mock;
pub mod traits;

pub use traits::{DigitalOutput, FiringCallback, OneShotTimer, PinBank, TimerFactory};
