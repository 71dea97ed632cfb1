//! Channel factory over a bank of output pins.

use std::sync::Mutex;

use log::error;

use crate::channel::PwmChannel;
use crate::error::Result;
use crate::platform::host::ThreadTimer;
use crate::platform::traits::{PinBank, TimerFactory};

/// Factory for software PWM channels.
///
/// Owns the platform binding (which pins exist and which timer backend
/// drives them) and enforces exclusive pin claims. Its lifetime is owned
/// by the application: construct one at startup, request channels from it,
/// drop it at shutdown. Channels outlive none of their pins; releasing a
/// channel returns its pin to the bank.
pub struct PwmChip {
    bank: Mutex<Box<dyn PinBank>>,
    make_timer: TimerFactory,
}

impl PwmChip {
    /// Create a chip over a pin bank and a timer backend.
    pub fn new(bank: Box<dyn PinBank>, make_timer: TimerFactory) -> Self {
        Self {
            bank: Mutex::new(bank),
            make_timer,
        }
    }

    /// Create a chip whose channels are driven by [`ThreadTimer`]s, the
    /// usual choice on a host without a hardware timer facility.
    pub fn with_thread_timers(bank: Box<dyn PinBank>) -> Self {
        Self::new(bank, Box::new(|cb| Box::new(ThreadTimer::spawn(cb))))
    }

    /// Claim `pin` and build a PWM channel over it.
    ///
    /// # Errors
    ///
    /// Returns [`PwmError::ResourceUnavailable`](crate::PwmError::ResourceUnavailable)
    /// if the pin is already claimed or unknown to the bank.
    pub fn request(&self, pin: u8) -> Result<PwmChannel> {
        let output = self.bank.lock().unwrap().claim_output(pin).map_err(|e| {
            error!("failed to claim pin {pin} for pwm output");
            e
        })?;
        Ok(PwmChannel::new(output, |cb| (self.make_timer)(cb)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PwmError;
    use crate::platform::mock::{MockPinBank, MockTimer};

    fn mock_chip(bank: &MockPinBank, timer: &MockTimer) -> PwmChip {
        let t = timer.clone();
        PwmChip::new(
            Box::new(bank.clone()),
            Box::new(move |cb| {
                t.attach(cb);
                Box::new(t.clone())
            }),
        )
    }

    #[test]
    fn request_claims_pin() {
        let bank = MockPinBank::new();
        let timer = MockTimer::new();
        let chip = mock_chip(&bank, &timer);

        let _channel = chip.request(18).unwrap();
        assert!(bank.is_claimed(18));
    }

    #[test]
    fn request_claimed_pin_is_unavailable() {
        let bank = MockPinBank::new();
        let timer = MockTimer::new();
        let chip = mock_chip(&bank, &timer);

        let _channel = chip.request(18).unwrap();
        assert_eq!(
            chip.request(18).err(),
            Some(PwmError::ResourceUnavailable(18))
        );
    }

    #[test]
    fn released_pin_can_be_requested_again() {
        let bank = MockPinBank::new();
        let timer = MockTimer::new();
        let chip = mock_chip(&bank, &timer);

        let channel = chip.request(4).unwrap();
        channel.release();
        assert!(chip.request(4).is_ok());
    }
}
