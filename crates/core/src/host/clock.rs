//! Elapsed-time sources
//!
//! The frame loop reads the clock once per tick. `SystemClock` follows wall
//! time; `ManualClock` is advanced by the host, which makes headless runs and
//! tests reproducible.

use std::time::Instant;

/// Monotonic elapsed-time source
pub trait Clock {
    /// Seconds since the clock started. Never decreases.
    fn elapsed_time(&self) -> f32;
}

/// Wall-clock time since construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_time(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Clock advanced explicitly by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    elapsed: f32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `dt` seconds. Negative steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += dt;
        }
    }
}

impl Clock for ManualClock {
    fn elapsed_time(&self) -> f32 {
        self.elapsed
    }
}
