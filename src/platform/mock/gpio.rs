//! Mock pin bank and output for testing.
//!
//! `MockPinBank` tracks claims and hands out `MockOutput` handles that
//! record every level transition into a shared trace, so tests can assert
//! on the exact waveform a channel produced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{PwmError, Result};
use crate::platform::traits::{DigitalOutput, PinBank};
use crate::types::Level;

/// Recorded level transitions for one pin.
///
/// Clones share the same underlying buffer, so a test can keep a handle
/// while the mock output writes to it.
#[derive(Debug, Clone, Default)]
pub struct LevelTrace {
    levels: Arc<Mutex<Vec<Level>>>,
}

impl LevelTrace {
    fn push(&self, level: Level) {
        self.levels.lock().unwrap().push(level);
    }

    /// All transitions recorded so far, oldest first.
    pub fn levels(&self) -> Vec<Level> {
        self.levels.lock().unwrap().clone()
    }

    /// The most recent transition, if any.
    pub fn last(&self) -> Option<Level> {
        self.levels.lock().unwrap().last().copied()
    }

    /// Number of transitions recorded.
    pub fn len(&self) -> usize {
        self.levels.lock().unwrap().len()
    }

    /// Whether no transition has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discard all recorded transitions.
    pub fn clear(&self) {
        self.levels.lock().unwrap().clear();
    }
}

#[derive(Default)]
struct BankInner {
    claimed: Vec<u8>,
    traces: HashMap<u8, LevelTrace>,
}

/// Mock pin bank with claim tracking.
///
/// Clones share the same claim table and traces.
#[derive(Clone, Default)]
pub struct MockPinBank {
    inner: Arc<Mutex<BankInner>>,
}

impl MockPinBank {
    /// Create an empty bank; every pin number is available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace handle for a pin, created on first use.
    pub fn trace(&self, pin: u8) -> LevelTrace {
        self.inner
            .lock()
            .unwrap()
            .traces
            .entry(pin)
            .or_default()
            .clone()
    }

    /// Whether the pin is currently claimed.
    pub fn is_claimed(&self, pin: u8) -> bool {
        self.inner.lock().unwrap().claimed.contains(&pin)
    }
}

impl PinBank for MockPinBank {
    fn claim_output(&mut self, pin: u8) -> Result<Box<dyn DigitalOutput>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.claimed.contains(&pin) {
            return Err(PwmError::ResourceUnavailable(pin));
        }
        inner.claimed.push(pin);
        let trace = inner.traces.entry(pin).or_default().clone();
        Ok(Box::new(MockOutput {
            pin,
            bank: Arc::clone(&self.inner),
            trace,
        }))
    }
}

/// Mock output handle; returns its pin to the bank on drop.
pub struct MockOutput {
    pin: u8,
    bank: Arc<Mutex<BankInner>>,
    trace: LevelTrace,
}

impl DigitalOutput for MockOutput {
    fn set_level(&mut self, level: Level) {
        self.trace.push(level);
    }
}

impl Drop for MockOutput {
    fn drop(&mut self) {
        self.bank.lock().unwrap().claimed.retain(|&p| p != self.pin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_records_levels() {
        let mut bank = MockPinBank::new();
        let trace = bank.trace(5);
        let mut out = bank.claim_output(5).unwrap();

        out.set_level(Level::High);
        out.set_level(Level::Low);
        assert_eq!(trace.levels(), vec![Level::High, Level::Low]);
        assert_eq!(trace.last(), Some(Level::Low));
    }

    #[test]
    fn double_claim_rejected() {
        let mut bank = MockPinBank::new();
        let _out = bank.claim_output(3).unwrap();
        assert_eq!(
            bank.claim_output(3).err(),
            Some(PwmError::ResourceUnavailable(3))
        );
    }

    #[test]
    fn drop_releases_claim() {
        let mut bank = MockPinBank::new();
        let out = bank.claim_output(7).unwrap();
        assert!(bank.is_claimed(7));

        drop(out);
        assert!(!bank.is_claimed(7));
        assert!(bank.claim_output(7).is_ok());
    }

    #[test]
    fn trace_survives_reclaim() {
        let mut bank = MockPinBank::new();
        let trace = bank.trace(0);
        let mut out = bank.claim_output(0).unwrap();
        out.set_level(Level::High);
        drop(out);

        let mut out = bank.claim_output(0).unwrap();
        out.set_level(Level::Low);
        assert_eq!(trace.levels(), vec![Level::High, Level::Low]);
    }
}
