//! Software PWM output on a general-purpose digital pin.
//!
//! This crate emulates a hardware PWM peripheral by toggling a pin's logic
//! level at precisely scheduled instants, driven by a one-shot timer
//! instead of dedicated PWM silicon. A [`PwmChannel`] owns one output pin
//! and one timer; once enabled, the timer's firing callback alternates the
//! pin between its "on" and "off" phases and re-arms itself for the next
//! phase, measured from the previous deadline so phase timing does not
//! drift.
//!
//! Period, duty cycle, and polarity can be reconfigured while the wave is
//! live; changes take effect at the next phase boundary. Platform binding
//! happens through two small traits, [`PinBank`]/[`DigitalOutput`] for the
//! pin and [`OneShotTimer`] for the clock, with mock backends for tests and
//! a thread-backed timer for hosts.
//!
//! ```
//! use std::time::Duration;
//! use pwm_gpio::platform::mock::{MockPinBank, MockTimer};
//! use pwm_gpio::{Level, PwmChip};
//!
//! let bank = MockPinBank::new();
//! let timer = MockTimer::new();
//! let t = timer.clone();
//! let chip = PwmChip::new(
//!     Box::new(bank.clone()),
//!     Box::new(move |cb| {
//!         t.attach(cb);
//!         Box::new(t.clone())
//!     }),
//! );
//!
//! let channel = chip.request(4).unwrap();
//! channel
//!     .configure(Duration::from_millis(5), Duration::from_millis(20))
//!     .unwrap();
//! channel.enable().unwrap();
//!
//! timer.fire(); // first firing drives the "on" level
//! assert_eq!(bank.trace(4).last(), Some(Level::High));
//! assert_eq!(timer.armed(), Some(Duration::from_millis(5)));
//!
//! channel.disable();
//! assert_eq!(bank.trace(4).last(), Some(Level::Low));
//! ```
//!
//! On a real host, build the chip with
//! [`PwmChip::with_thread_timers`] and implement [`PinBank`] over whatever
//! GPIO access the platform provides.

pub mod channel;
pub mod chip;
pub mod error;
pub mod platform;
pub mod types;

pub use channel::PwmChannel;
pub use chip::PwmChip;
pub use error::{PwmError, Result};
pub use platform::traits::{DigitalOutput, FiringCallback, OneShotTimer, PinBank, TimerFactory};
pub use types::{Level, Polarity};
