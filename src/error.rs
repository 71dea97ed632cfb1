//! Error types for software PWM operations.

use std::time::Duration;

/// Result type for PWM operations.
pub type Result<T> = std::result::Result<T, PwmError>;

/// Errors that can occur while operating a software PWM channel.
///
/// Failed operations leave the channel in its prior state; there is no
/// error state to recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PwmError {
    /// The output pin cannot be claimed (already owned elsewhere). Fatal to
    /// channel creation; the channel is never constructed.
    #[error("pin {0} is unavailable")]
    ResourceUnavailable(u8),

    /// `enable` was called on a channel that is already running. The caller
    /// must disable first, or ignore.
    #[error("channel is already enabled")]
    Busy,

    /// The requested duty cycle exceeds the period. Rejected with no
    /// partial state mutation.
    #[error("invalid configuration: duty {duty:?} exceeds period {period:?}")]
    InvalidConfig { duty: Duration, period: Duration },
}
