//! Frame scheduling
//!
//! A scheduler stands in for the host's display-refresh callback: each call
//! to `next_frame` blocks until the next frame is due and reports whether
//! there is one. Returning `false` means the surface was torn down and the
//! frame loop should stop.

use std::thread;
use std::time::{Duration, Instant};

/// Source of display-refresh ticks
pub trait FrameScheduler {
    /// Wait for the next frame. Returns `false` once no more frames will come.
    fn next_frame(&mut self) -> bool;
}

/// Grants a fixed number of frames immediately, one per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFrameScheduler {
    remaining: u64,
}

impl FixedFrameScheduler {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameScheduler for FixedFrameScheduler {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Grants frames at a fixed refresh rate, sleeping between them
#[derive(Debug, Clone)]
pub struct PacedScheduler {
    interval: Duration,
    last_frame: Option<Instant>,
    remaining: Option<u64>,
}

impl PacedScheduler {
    /// Schedule at `refresh_rate` Hz, for `frames` frames or forever if `None`.
    ///
    /// A non-positive or non-finite rate disables pacing.
    pub fn new(refresh_rate: f32, frames: Option<u64>) -> Self {
        let interval = if refresh_rate.is_finite() && refresh_rate > 0.0 {
            Duration::from_secs_f32(1.0 / refresh_rate)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            last_frame: None,
            remaining: frames,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for PacedScheduler {
    fn next_frame(&mut self) -> bool {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
        }

        if let Some(last) = self.last_frame {
            let since = last.elapsed();
            if since < self.interval {
                thread::sleep(self.interval - since);
            }
        }
        self.last_frame = Some(Instant::now());
        true
    }
}
