//! Aborting in-flight narration
//!
//! Narration blocks the event loop for the length of one word. A stop has to
//! cut that word short, so blocking backends poll an `AbortHandle` while they
//! wait. The process-wide interrupt flag is what a signal handler may touch.

use crate::Result;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Set from the SIGINT handler
static INTERRUPT: AtomicBool = AtomicBool::new(false);

/// How often blocking backends check for completion or abort
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Request that any in-flight utterance stops. Async-signal-safe.
pub fn interrupt() {
    INTERRUPT.store(true, Ordering::SeqCst);
}

/// Consume a pending interrupt request
pub fn take_interrupt() -> bool {
    INTERRUPT.swap(false, Ordering::SeqCst)
}

fn interrupt_pending() -> bool {
    INTERRUPT.load(Ordering::SeqCst)
}

/// Outcome of a blocking utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utterance {
    Finished,
    Aborted,
}

/// Shared flag telling a backend to drop the current word
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clear before starting a new utterance
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || interrupt_pending()
    }

    /// Block until `done` reports completion or the handle is raised
    pub fn wait_for<F>(&self, mut done: F) -> Result<Utterance>
    where
        F: FnMut() -> Result<bool>,
    {
        loop {
            if self.is_raised() {
                debug!("Utterance aborted");
                return Ok(Utterance::Aborted);
            }
            if done()? {
                return Ok(Utterance::Finished);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_finishes() {
        let handle = AbortHandle::new();
        let mut polls = 0;
        let outcome = handle
            .wait_for(|| {
                polls += 1;
                Ok(polls >= 3)
            })
            .unwrap();
        assert_eq!(outcome, Utterance::Finished);
        assert_eq!(polls, 3);
    }

    #[test]
    fn test_raised_handle_aborts() {
        let handle = AbortHandle::new();
        let remote = handle.clone();
        remote.raise();
        let outcome = handle.wait_for(|| Ok(false)).unwrap();
        assert_eq!(outcome, Utterance::Aborted);

        handle.reset();
        assert!(!remote.flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_abort_from_other_thread() {
        let handle = AbortHandle::new();
        let remote = handle.clone();
        let worker = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            remote.raise();
        });
        let outcome = handle.wait_for(|| Ok(false)).unwrap();
        worker.join().unwrap();
        assert_eq!(outcome, Utterance::Aborted);
    }

    #[test]
    fn test_wait_propagates_errors() {
        let handle = AbortHandle::new();
        let result = handle.wait_for(|| Err("engine gone".into()));
        assert!(result.is_err());
    }
}
