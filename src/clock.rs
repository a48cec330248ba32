/// Elapsed-time source and pause accounting.
///
/// Time is reconstructed from a free-running 8-bit counter and an overflow
/// count bumped by the periodic sampler, the same way the handheld derives it
/// from its timer peripheral.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::{TICK_PERIOD, TIMER_TOP};

/// A hardware-style counter: completed overflows plus the current count
/// within the period (`0..TIMER_TOP`).
pub trait HardwareCounter {
    fn overflows(&self) -> u32;
    fn count(&self) -> u32;
}

impl<T: HardwareCounter + ?Sized> HardwareCounter for Arc<T> {
    fn overflows(&self) -> u32 {
        (**self).overflows()
    }

    fn count(&self) -> u32 {
        (**self).count()
    }
}

/// Monotonic seconds since the counter started.
#[derive(Debug)]
pub struct Clock<C> {
    counter: C,
}

impl<C: HardwareCounter> Clock<C> {
    pub fn new(counter: C) -> Clock<C> {
        Clock { counter }
    }

    pub fn elapsed_time(&self) -> f64 {
        let before = self.counter.overflows();
        let mut count = self.counter.count();
        let after = self.counter.overflows();
        // Overflowed between the two reads: the count may belong to either
        // period, so take it again against the newer overflow total.
        if before != after {
            count = self.counter.count();
        }
        let ticks = u64::from(after) * u64::from(TIMER_TOP) + u64::from(count.min(TIMER_TOP - 1));
        ticks as f64 * TICK_PERIOD
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }
}

/// Counter backed by the host clock. `on_overflow` plays the role of the
/// timer overflow interrupt and is called by the sampler thread.
#[derive(Debug)]
pub struct HostCounter {
    epoch: Instant,
    overflows: AtomicU32,
}

impl HostCounter {
    pub fn new() -> HostCounter {
        HostCounter {
            epoch: Instant::now(),
            overflows: AtomicU32::new(0),
        }
    }

    pub fn on_overflow(&self) {
        self.overflows.fetch_add(1, Ordering::AcqRel);
    }
}

impl Default for HostCounter {
    fn default() -> Self {
        HostCounter::new()
    }
}

impl HardwareCounter for HostCounter {
    fn overflows(&self) -> u32 {
        self.overflows.load(Ordering::Acquire)
    }

    fn count(&self) -> u32 {
        let ticks = (self.epoch.elapsed().as_secs_f64() / TICK_PERIOD) as u64;
        let base = u64::from(self.overflows()) * u64::from(TIMER_TOP);
        ticks.saturating_sub(base).min(u64::from(TIMER_TOP - 1)) as u32
    }
}

/// Pause bookkeeping: when the current pause began and how long all earlier
/// pauses lasted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PauseLedger {
    started: Option<f64>,
    total: f64,
}

impl PauseLedger {
    pub fn new() -> PauseLedger {
        PauseLedger::default()
    }

    /// Enter or leave a pause at clock reading `now`. Returns whether the
    /// game is paused afterwards.
    pub fn toggle(&mut self, now: f64) -> bool {
        match self.started.take() {
            Some(start) => {
                self.total += (now - start).max(0.0);
                false
            }
            None => {
                self.started = Some(now);
                true
            }
        }
    }

    pub fn is_paused(&self) -> bool {
        self.started.is_some()
    }

    /// Sum of all completed pauses.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Game time at clock reading `now`; frozen while paused.
    pub fn game_time(&self, now: f64) -> f64 {
        let reference = self.started.unwrap_or(now);
        (reference - self.total).max(0.0)
    }
}
