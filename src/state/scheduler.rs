//! Cancellable reading ticks
//!
//! At most one tick is pending at a time. Every tick carries the generation
//! it was scheduled in; cancelling bumps the generation so a tick that was
//! already handed out (a stale tick) can be recognised and ignored.

use log::trace;
use std::time::{Duration, Instant};

/// Delay between words for a reading speed
///
/// `60000 / wpm` milliseconds; a zero rate is treated as 1 wpm.
pub fn tick_delay(wpm: u32) -> Duration {
    Duration::from_millis(60_000 / u64::from(wpm.max(1)))
}

/// A scheduled invocation of the reading advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
    due: Instant,
}

/// Single-slot scheduler for reading ticks
#[derive(Debug, Default)]
pub struct TickScheduler {
    generation: u64,
    pending: Option<Tick>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the next tick `delay` after `now`, replacing any pending one
    pub fn schedule(&mut self, delay: Duration, now: Instant) -> Tick {
        let tick = Tick {
            generation: self.generation,
            due: now + delay,
        };
        trace!("Tick scheduled in {:?} (generation {})", delay, self.generation);
        self.pending = Some(tick);
        tick
    }

    /// Drop the pending tick and invalidate every tick handed out so far
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    /// Whether `tick` was scheduled after the last cancel
    pub fn is_current(&self, tick: &Tick) -> bool {
        tick.generation == self.generation
    }

    pub fn pending(&self) -> Option<Tick> {
        self.pending
    }

    /// Take the pending tick if it is due at `now`
    pub fn take_due(&mut self, now: Instant) -> Option<Tick> {
        match self.pending {
            Some(tick) if now >= tick.due => self.pending.take(),
            _ => None,
        }
    }

    /// Time until the pending tick, used as the poll timeout
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|tick| tick.due.saturating_duration_since(now))
    }
}
