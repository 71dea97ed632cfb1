//! Digital output capability traits.
//!
//! These traits are the binding point between the toggle engine and a
//! concrete platform: anything that can drive a pin high or low can back a
//! PWM channel.

use crate::error::Result;
use crate::types::Level;

/// A single digital output pin.
///
/// The channel owns its output exclusively; the handle is claimed at
/// channel creation and released when the channel is dropped.
///
/// Implementations are called from the timer firing context and must not
/// block indefinitely or require a cooperative scheduler. `set_level` is
/// infallible: the firing context has nowhere to route an error, so a
/// backend that can fail must handle or report the failure itself.
pub trait DigitalOutput: Send {
    /// Drive the pin to the given logic level.
    fn set_level(&mut self, level: Level);
}

/// A bank of claimable output pins (the platform binding point).
///
/// Pins are exclusive: a claim stays in force until the returned handle is
/// dropped.
pub trait PinBank: Send {
    /// Claim a pin for exclusive output use.
    ///
    /// # Errors
    ///
    /// Returns [`PwmError::ResourceUnavailable`](crate::PwmError::ResourceUnavailable)
    /// if the pin is already claimed or does not exist on this bank.
    fn claim_output(&mut self, pin: u8) -> Result<Box<dyn DigitalOutput>>;
}
