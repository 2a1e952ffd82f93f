//! Frame and run statistics

/// What happened during a single tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// 1-based frame number
    pub frame: u64,
    /// Clock time at the start of the tick, in seconds
    pub elapsed: f32,
    /// Seconds since the previous tick
    pub delta: f32,
    /// Particles moved back onto the sphere this tick
    pub respawned: usize,
}

/// Totals accumulated over the life of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationStats {
    pub frames: u64,
    pub total_respawns: u64,
}

impl SimulationStats {
    pub(crate) fn record(&mut self, respawned: usize) {
        self.frames += 1;
        self.total_respawns += respawned as u64;
    }

    /// Average number of respawns per frame, 0 before the first frame.
    pub fn mean_respawns_per_frame(&self) -> f32 {
        if self.frames == 0 {
            0.0
        } else {
            self.total_respawns as f32 / self.frames as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let mut stats = SimulationStats::default();
        assert_eq!(stats.mean_respawns_per_frame(), 0.0);

        stats.record(3);
        stats.record(1);

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.total_respawns, 4);
        assert_eq!(stats.mean_respawns_per_frame(), 2.0);
    }
}
