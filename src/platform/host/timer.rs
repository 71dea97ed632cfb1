//! Thread-backed one-shot timer for hosts without a hardware timer.
//!
//! A dedicated worker thread parks on a condition variable until the armed
//! deadline, invokes the firing callback, and chains the re-arm the
//! callback returns. Re-arms are measured from the deadline that just
//! expired, so phase timing does not drift with callback latency. If a
//! deadline has already passed by the time the re-arm is computed the
//! worker fires once as soon as it can and resynchronizes from now; missed
//! phases are skipped, never burst.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::platform::traits::{FiringCallback, OneShotTimer};

struct CtlState {
    deadline: Option<Instant>,
    executing: bool,
    shutdown: bool,
}

struct TimerCtl {
    state: Mutex<CtlState>,
    cv: Condvar,
}

/// One-shot timer driven by a dedicated thread.
///
/// Resolution is whatever the OS condition-variable timeout offers,
/// typically well under a millisecond on mainstream hosts.
pub struct ThreadTimer {
    ctl: Arc<TimerCtl>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadTimer {
    /// Spawn the worker thread and bind the firing callback to it.
    pub fn spawn(mut callback: FiringCallback) -> Self {
        let ctl = Arc::new(TimerCtl {
            state: Mutex::new(CtlState {
                deadline: None,
                executing: false,
                shutdown: false,
            }),
            cv: Condvar::new(),
        });
        let worker_ctl = Arc::clone(&ctl);
        let worker = thread::spawn(move || {
            let mut st = worker_ctl.state.lock().unwrap();
            loop {
                if st.shutdown {
                    return;
                }
                let deadline = match st.deadline {
                    Some(deadline) => deadline,
                    None => {
                        st = worker_ctl.cv.wait(st).unwrap();
                        continue;
                    }
                };
                let now = Instant::now();
                if now < deadline {
                    let (guard, _) = worker_ctl.cv.wait_timeout(st, deadline - now).unwrap();
                    st = guard;
                    // Re-check: the deadline may have been cancelled or
                    // replaced while we slept.
                    continue;
                }
                st.executing = true;
                drop(st);
                let next = callback();
                st = worker_ctl.state.lock().unwrap();
                st.executing = false;
                // Chain only if nobody cancelled or re-armed while the
                // callback ran.
                if st.deadline == Some(deadline) {
                    st.deadline = next.map(|phase| {
                        let target = deadline + phase;
                        let now = Instant::now();
                        if target < now {
                            now
                        } else {
                            target
                        }
                    });
                }
                worker_ctl.cv.notify_all();
            }
        });
        Self {
            ctl,
            worker: Some(worker),
        }
    }
}

impl OneShotTimer for ThreadTimer {
    fn start(&self, after: Duration) {
        let mut st = self.ctl.state.lock().unwrap();
        st.deadline = Some(Instant::now() + after);
        self.ctl.cv.notify_all();
    }

    fn cancel(&self) {
        let mut st = self.ctl.state.lock().unwrap();
        st.deadline = None;
        self.ctl.cv.notify_all();
        // Quiesce: wait out a callback that was already past the deadline
        // check when we cleared it.
        while st.executing {
            st = self.ctl.cv.wait(st).unwrap();
        }
    }

    fn is_high_resolution(&self) -> bool {
        true
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        {
            let mut st = self.ctl.state.lock().unwrap();
            st.shutdown = true;
            self.ctl.cv.notify_all();
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn fires_and_chains() {
        let count = Arc::new(AtomicU32::new(0));
        let cb_count = Arc::clone(&count);
        let timer = ThreadTimer::spawn(Box::new(move || {
            cb_count.fetch_add(1, Ordering::SeqCst);
            Some(Duration::from_millis(1))
        }));

        timer.start(Duration::ZERO);
        thread::sleep(Duration::from_millis(100));
        timer.cancel();

        // Generous bound: at 1 ms per phase, 100 ms should deliver plenty.
        assert!(count.load(Ordering::SeqCst) >= 5);
    }

    #[test]
    fn cancel_stops_firing() {
        let count = Arc::new(AtomicU32::new(0));
        let cb_count = Arc::clone(&count);
        let timer = ThreadTimer::spawn(Box::new(move || {
            cb_count.fetch_add(1, Ordering::SeqCst);
            Some(Duration::from_millis(1))
        }));

        timer.start(Duration::ZERO);
        thread::sleep(Duration::from_millis(20));
        timer.cancel();

        let settled = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), settled);
    }

    #[test]
    fn callback_can_stop_the_chain() {
        let count = Arc::new(AtomicU32::new(0));
        let cb_count = Arc::clone(&count);
        let timer = ThreadTimer::spawn(Box::new(move || {
            cb_count.fetch_add(1, Ordering::SeqCst);
            None
        }));

        timer.start(Duration::ZERO);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        drop(timer);
    }

    #[test]
    fn cancel_without_start_is_harmless() {
        let timer = ThreadTimer::spawn(Box::new(|| None));
        timer.cancel();
    }
}
