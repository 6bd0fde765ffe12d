//! Fixed-timestep accounting.
//!
//! Callers feed measured frame durations in; the accumulator hands back whole
//! simulation ticks. Everything is integer microseconds so the tick count for a
//! given sequence of frames is identical on every platform.

/// Longest frame the accumulator will absorb before dropping time.
pub const DEFAULT_MAX_FRAME_US: u64 = 250_000;

pub struct FixedStep {
    pub fixed_dt_us: u64,
    pub max_frame_us: u64,
    accumulator_us: u64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub interpolation_alpha: f64,
}

impl FixedStep {
    pub fn new(tick_hz: u32) -> Self {
        let hz = u64::from(tick_hz.max(1));
        Self {
            fixed_dt_us: (1_000_000 + hz / 2) / hz,
            max_frame_us: DEFAULT_MAX_FRAME_US,
            accumulator_us: 0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            interpolation_alpha: 0.0,
        }
    }

    pub fn begin_frame(&mut self, frame_us: u64) {
        let mut frame_us = frame_us;
        // Spiral-of-death cap
        if frame_us > self.max_frame_us {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                frame_us as f64 / 1000.0,
                self.max_frame_us / 1000
            );
            frame_us = self.max_frame_us;
        }

        self.accumulator_us += frame_us;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator_us >= self.fixed_dt_us {
            self.accumulator_us -= self.fixed_dt_us;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator_us as f64 / self.fixed_dt_us as f64;
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(60)
    }
}
