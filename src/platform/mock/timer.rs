//! Mock one-shot timer for testing.
//!
//! Instead of waiting on a clock, `MockTimer` records the armed phase
//! duration and lets the test deliver expiries with [`fire`](MockTimer::fire).
//! Re-arms requested by the callback's return value chain exactly as a real
//! backend would, so a test can step a channel through its waveform one
//! phase at a time and inspect each scheduled duration.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::platform::traits::{FiringCallback, OneShotTimer};

struct TimerInner {
    callback: Option<FiringCallback>,
    armed: Option<Duration>,
    high_resolution: bool,
}

/// Manually fired one-shot timer.
///
/// Clones share the same underlying timer, so a test can keep a handle
/// while a channel owns another. Intended for single-threaded test
/// contexts; `cancel` assumes no callback is concurrently in flight.
#[derive(Clone)]
pub struct MockTimer {
    inner: Arc<Mutex<TimerInner>>,
}

impl MockTimer {
    /// Create a timer that reports high resolution.
    pub fn new() -> Self {
        Self::with_resolution(true)
    }

    /// Create a timer that reports low resolution, for exercising the
    /// degraded-timing diagnostic.
    pub fn low_resolution() -> Self {
        Self::with_resolution(false)
    }

    fn with_resolution(high_resolution: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                callback: None,
                armed: None,
                high_resolution,
            })),
        }
    }

    /// Bind the firing callback. Used by the timer factory closure when a
    /// channel is constructed over this timer.
    pub fn attach(&self, callback: FiringCallback) {
        self.inner.lock().unwrap().callback = Some(callback);
    }

    /// The currently armed phase duration, if any.
    pub fn armed(&self) -> Option<Duration> {
        self.inner.lock().unwrap().armed
    }

    /// Deliver the pending expiry: invokes the callback and chains the
    /// re-arm it returns.
    ///
    /// # Panics
    ///
    /// Panics if the timer is not armed or no callback is attached.
    pub fn fire(&self) {
        let mut callback = {
            let mut inner = self.inner.lock().unwrap();
            assert!(inner.armed.is_some(), "fire() called with no armed deadline");
            inner.armed = None;
            inner.callback.take().expect("no firing callback attached")
        };
        // Invoke outside the inner lock: the callback takes the channel
        // lock, and channel operations in turn call start/cancel here.
        let next = callback();
        let mut inner = self.inner.lock().unwrap();
        inner.callback = Some(callback);
        if inner.armed.is_none() {
            inner.armed = next;
        }
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl OneShotTimer for MockTimer {
    fn start(&self, after: Duration) {
        self.inner.lock().unwrap().armed = Some(after);
    }

    fn cancel(&self) {
        self.inner.lock().unwrap().armed = None;
    }

    fn is_high_resolution(&self) -> bool {
        self.inner.lock().unwrap().high_resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_chains_rearm_from_callback() {
        let timer = MockTimer::new();
        let mut phases = vec![
            Some(Duration::from_millis(3)),
            Some(Duration::from_millis(7)),
            None,
        ]
        .into_iter();
        timer.attach(Box::new(move || phases.next().unwrap()));

        timer.start(Duration::ZERO);
        assert_eq!(timer.armed(), Some(Duration::ZERO));

        timer.fire();
        assert_eq!(timer.armed(), Some(Duration::from_millis(3)));

        timer.fire();
        assert_eq!(timer.armed(), Some(Duration::from_millis(7)));

        timer.fire();
        assert_eq!(timer.armed(), None);
    }

    #[test]
    fn cancel_clears_armed() {
        let timer = MockTimer::new();
        timer.attach(Box::new(|| Some(Duration::from_secs(1))));
        timer.start(Duration::from_millis(10));
        timer.cancel();
        assert_eq!(timer.armed(), None);
    }

    #[test]
    fn resolution_probe() {
        assert!(MockTimer::new().is_high_resolution());
        assert!(!MockTimer::low_resolution().is_high_resolution());
    }

    #[test]
    #[should_panic(expected = "no armed deadline")]
    fn fire_unarmed_panics() {
        let timer = MockTimer::new();
        timer.attach(Box::new(|| None));
        timer.fire();
    }
}
