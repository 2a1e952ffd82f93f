//! Performance profiling helpers for tracking frame timing.
//!
//! Provides RAII-style profiling scopes and a rolling frame timer.

use std::time::Instant;
use tracing::trace;

/// A profiling scope that measures elapsed time using RAII.
///
/// The elapsed time is emitted as a `trace` event when the scope is dropped.
pub struct ProfilerScope {
    start: Instant,
    name: &'static str,
}

impl ProfilerScope {
    /// Creates a new profiling scope.
    pub fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Gets elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfilerScope {
    fn drop(&mut self) {
        trace!("{} took {:.3}ms", self.name, self.elapsed_ms());
    }
}

/// Frame timer keeping the last frame time and an exponential moving average.
pub struct FrameTimer {
    last_frame_time_ms: f64,
    average_frame_time_ms: f64,
    samples: u64,
}

/// Weight of the newest sample in the moving average.
const AVERAGE_WEIGHT: f64 = 0.1;

impl FrameTimer {
    /// Creates a new frame timer.
    pub fn new() -> Self {
        Self {
            last_frame_time_ms: 0.0,
            average_frame_time_ms: 0.0,
            samples: 0,
        }
    }

    /// Records frame time in milliseconds.
    pub fn record(&mut self, time_ms: f64) {
        self.last_frame_time_ms = time_ms;
        self.average_frame_time_ms = if self.samples == 0 {
            time_ms
        } else {
            self.average_frame_time_ms + (time_ms - self.average_frame_time_ms) * AVERAGE_WEIGHT
        };
        self.samples += 1;
    }

    /// Gets the last recorded frame time.
    pub fn last_frame_time_ms(&self) -> f64 {
        self.last_frame_time_ms
    }

    /// Gets the moving average frame time.
    pub fn average_frame_time_ms(&self) -> f64 {
        self.average_frame_time_ms
    }

    /// Number of frames recorded so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_profiler_scope_measures_time() {
        let scope = ProfilerScope::new("test");
        thread::sleep(Duration::from_millis(10));
        let elapsed = scope.elapsed_ms();
        assert!(elapsed >= 10.0, "Expected at least 10ms, got {elapsed}");
    }

    #[test]
    fn test_frame_timer() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.last_frame_time_ms(), 0.0);

        timer.record(16.0);
        assert_eq!(timer.last_frame_time_ms(), 16.0);
        assert_eq!(timer.average_frame_time_ms(), 16.0);

        timer.record(26.0);
        assert_eq!(timer.last_frame_time_ms(), 26.0);
        assert!((timer.average_frame_time_ms() - 17.0).abs() < 1e-9);
        assert_eq!(timer.samples(), 2);
    }
}
