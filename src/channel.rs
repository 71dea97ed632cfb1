//! Software PWM channel: toggle engine plus configuration controller.
//!
//! A channel alternates one digital output between an "on" and an "off"
//! phase, driven by a one-shot timer that the firing callback keeps
//! re-arming. All mutable state sits behind one mutex per channel; the
//! firing callback and every configuration operation serialize on it, so
//! duty/period/polarity can be changed while the wave is live and take
//! effect at the next phase boundary.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};

use crate::error::{PwmError, Result};
use crate::platform::traits::{DigitalOutput, FiringCallback, OneShotTimer};
use crate::types::{Level, Polarity};

/// Mutable channel state, guarded by the per-channel lock.
struct ChannelState {
    /// Duration of the "on" phase.
    on_time: Duration,
    /// Duration of the "off" phase (`period - duty`).
    off_time: Duration,
    polarity: Polarity,
    /// Which phase is currently driven; mutated by the firing callback and
    /// the forced-off path of disable.
    pin_on: bool,
    running: bool,
    /// Owned output capability. `None` once the channel has been released;
    /// the timer callback may briefly outlive the channel and must not
    /// touch a pin that has been returned to its bank.
    pin: Option<Box<dyn DigitalOutput>>,
}

impl ChannelState {
    fn set_pin_level(&mut self, level: Level) {
        if let Some(pin) = self.pin.as_mut() {
            pin.set_level(level);
        }
    }

    fn drive_on(&mut self) {
        let level = self.polarity.on_level();
        self.set_pin_level(level);
        self.pin_on = true;
    }

    fn drive_off(&mut self) {
        let level = self.polarity.off_level();
        self.set_pin_level(level);
        self.pin_on = false;
    }
}

/// A software PWM channel bound to one digital output pin.
///
/// Construct one with [`PwmChannel::new`] or through a
/// [`PwmChip`](crate::PwmChip). The channel starts idle; call
/// [`configure`](PwmChannel::configure) and [`enable`](PwmChannel::enable)
/// to start the wave, [`disable`](PwmChannel::disable) to stop it. Dropping
/// the channel disables it and releases the pin.
///
/// All methods take `&self` and may be called from any thread; they
/// serialize on the channel lock.
pub struct PwmChannel {
    state: Arc<Mutex<ChannelState>>,
    timer: Box<dyn OneShotTimer>,
    /// Serializes lifecycle transitions (enable/disable/release) against
    /// each other. The state lock alone cannot: disable has to release it
    /// across the cancel quiesce, and an enable landing in that window
    /// would re-arm a timer the disable is about to cancel, stranding the
    /// channel as running with nothing armed.
    lifecycle: Mutex<()>,
}

impl PwmChannel {
    /// Build a channel over an already-claimed output pin.
    ///
    /// `make_timer` binds the engine's firing callback to a concrete timer
    /// backend; the timer is initialized but not started. If the backend
    /// reports that it cannot schedule with high resolution a warning is
    /// logged and the channel operates at whatever resolution is available.
    pub fn new<F>(pin: Box<dyn DigitalOutput>, make_timer: F) -> Self
    where
        F: FnOnce(FiringCallback) -> Box<dyn OneShotTimer>,
    {
        let state = Arc::new(Mutex::new(ChannelState {
            on_time: Duration::ZERO,
            off_time: Duration::ZERO,
            polarity: Polarity::Normal,
            pin_on: false,
            running: false,
            pin: Some(pin),
        }));
        let engine = Arc::clone(&state);
        let timer = make_timer(Box::new(move || Self::fire(&engine)));
        if !timer.is_high_resolution() {
            warn!("high-resolution timer unavailable, PWM timing will be coarse");
        }
        Self {
            state,
            timer,
            lifecycle: Mutex::new(()),
        }
    }

    /// Toggle engine: handle one timer expiry.
    ///
    /// Flips the pin to the complementary phase and returns the duration of
    /// that phase, which the timer measures from the deadline that just
    /// expired. A zero-length phase still performs its transition and
    /// re-arms immediately, so 0% and 100% duty keep a deterministic
    /// toggle sequence. The engine never stops itself: only a disable,
    /// observed here as `running == false`, ends the chain.
    fn fire(state: &Mutex<ChannelState>) -> Option<Duration> {
        let mut st = state.lock().unwrap();
        if !st.running {
            // Raced with a disable; the forced off level is written by
            // disable after the timer quiesces.
            return None;
        }
        if !st.pin_on {
            st.drive_on();
            Some(st.on_time)
        } else {
            st.drive_off();
            Some(st.off_time)
        }
    }

    /// Set duty cycle and period.
    ///
    /// The "on" phase lasts `duty`, the "off" phase `period - duty`. The
    /// update is applied atomically and takes effect at the next phase
    /// boundary; an in-flight phase is not aborted.
    ///
    /// # Errors
    ///
    /// Returns [`PwmError::InvalidConfig`] if `duty` exceeds `period`; the
    /// prior configuration is left untouched.
    pub fn configure(&self, duty: Duration, period: Duration) -> Result<()> {
        if duty > period {
            return Err(PwmError::InvalidConfig { duty, period });
        }
        let mut st = self.state.lock().unwrap();
        st.on_time = duty;
        st.off_time = period - duty;
        Ok(())
    }

    /// Set the polarity. Takes effect at the next phase transition.
    pub fn set_polarity(&self, polarity: Polarity) {
        self.state.lock().unwrap().polarity = polarity;
    }

    /// Start toggling.
    ///
    /// Arms the timer for an immediate first firing, which establishes the
    /// initial "on" phase for the current configuration. Safe to call
    /// before [`configure`](PwmChannel::configure): both phase durations
    /// default to zero and the engine simply toggles as fast as the timer
    /// can fire.
    ///
    /// # Errors
    ///
    /// Returns [`PwmError::Busy`] if the channel is already enabled; the
    /// running wave is not disturbed.
    pub fn enable(&self) -> Result<()> {
        let _lifecycle = self.lifecycle.lock().unwrap();
        let mut st = self.state.lock().unwrap();
        if st.running {
            return Err(PwmError::Busy);
        }
        st.running = true;
        self.timer.start(Duration::ZERO);
        debug!("pwm channel enabled");
        Ok(())
    }

    /// Stop toggling and force the pin to the "off" level for the current
    /// polarity.
    ///
    /// Blocks until the timer is fully quiesced: after this returns no
    /// further level change occurs, and the last one written is the off
    /// level. Disabling an idle channel is a no-op. An `enable` racing this
    /// call blocks until the disable has completed, then starts the wave
    /// fresh.
    pub fn disable(&self) {
        let _lifecycle = self.lifecycle.lock().unwrap();
        {
            let mut st = self.state.lock().unwrap();
            if !st.running {
                return;
            }
            st.running = false;
        }
        // Cancel with the state lock released: an in-flight firing takes
        // the lock, so holding it across the quiesce would deadlock. A
        // firing that slips in between sees `running == false` and neither
        // toggles nor re-arms.
        self.timer.cancel();
        self.state.lock().unwrap().drive_off();
        debug!("pwm channel disabled");
    }

    /// Disable the channel and release the output pin.
    ///
    /// Equivalent to dropping the channel; provided for call-site clarity.
    pub fn release(self) {
        drop(self);
    }

    /// Whether the channel is currently toggling.
    pub fn is_enabled(&self) -> bool {
        self.state.lock().unwrap().running
    }

    /// Configured "on" phase duration.
    pub fn duty(&self) -> Duration {
        self.state.lock().unwrap().on_time
    }

    /// Configured period (on + off).
    pub fn period(&self) -> Duration {
        let st = self.state.lock().unwrap();
        st.on_time + st.off_time
    }

    /// Configured polarity.
    pub fn polarity(&self) -> Polarity {
        self.state.lock().unwrap().polarity
    }
}

impl Drop for PwmChannel {
    fn drop(&mut self) {
        self.disable();
        // The timer's callback holds a clone of the state; drop the pin
        // here so its claim is returned as soon as the channel is gone.
        self.state.lock().unwrap().pin = None;
    }
}
