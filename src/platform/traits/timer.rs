//! One-shot timer capability trait.
//!
//! The toggle engine consumes exactly three operations: arm for a duration,
//! cancel, and a resolution probe used for a diagnostic. The firing
//! callback is bound once, at timer construction, and drives the timer's
//! self-chaining protocol through its return value.

use std::time::Duration;

/// Callback invoked by a timer backend when a scheduled instant arrives.
///
/// Returning `Some(phase)` re-arms the timer for `phase` measured from the
/// deadline that just expired (not from "now"), so cumulative drift does
/// not accumulate across cycles. Returning `None` lets the timer go idle.
pub type FiringCallback = Box<dyn FnMut() -> Option<Duration> + Send>;

/// Builds a timer backend bound to a firing callback.
pub type TimerFactory = Box<dyn Fn(FiringCallback) -> Box<dyn OneShotTimer> + Send + Sync>;

/// A one-shot countdown timer with nanosecond-ish resolution.
///
/// The timer fires once per arming; continuous operation comes from the
/// callback re-arming it via its return value.
pub trait OneShotTimer: Send + Sync {
    /// Arm the timer to fire once, `after` from now.
    ///
    /// Arming an already-armed timer replaces the pending deadline.
    fn start(&self, after: Duration);

    /// Cancel any pending firing.
    ///
    /// This is a synchronous barrier: it does not return until no callback
    /// is in flight or about to start. After it returns the callback will
    /// not run again until the next `start`.
    fn cancel(&self);

    /// Whether the backing clock can schedule with high resolution.
    ///
    /// Used only to emit a diagnostic; a low-resolution timer still works,
    /// just with coarser edges.
    fn is_high_resolution(&self) -> bool;
}
