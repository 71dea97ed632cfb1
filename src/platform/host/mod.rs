//! Host platform backends built on std.

pub mod timer;

pub use timer::ThreadTimer;
