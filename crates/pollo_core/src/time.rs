//! Fixed-timestep clock.
//!
//! The host measures (or synthesises) frame time and feeds it into an
//! accumulator; the simulation then consumes it in fixed slices of
//! `fixed_dt_us`. All bookkeeping is integer microseconds so two runs fed the
//! same frame times take exactly the same number of steps.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// One simulation step is one millisecond of game time.
pub const SIM_STEP_US: u64 = 1_000;

/// Frame time above this is clamped before it reaches the accumulator.
pub const MAX_FRAME_US: u64 = 250_000;

pub struct TimeState {
    pub fixed_dt_us: u64,
    pub max_frame_us: u64,
    accumulator_us: u64,
    pub total_time_us: u64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt_us: u64,
    last_instant: Instant,
    pub interpolation_alpha: f64,

    fps_samples: [u64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_step(SIM_STEP_US)
    }

    pub fn with_step(fixed_dt_us: u64) -> Self {
        Self {
            fixed_dt_us: fixed_dt_us.max(1),
            max_frame_us: MAX_FRAME_US,
            accumulator_us: 0,
            total_time_us: 0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt_us: 0,
            last_instant: Instant::now(),
            interpolation_alpha: 0.0,
            fps_samples: [16_667; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure wall-clock time since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_instant).as_micros() as u64;
        self.last_instant = now;
        self.begin_frame_with(elapsed);
    }

    /// Feed a known frame duration. Headless runs and replays use this so the
    /// step count does not depend on the machine.
    pub fn begin_frame_with(&mut self, frame_us: u64) {
        self.real_dt_us = frame_us;

        // Spiral-of-death cap
        if self.real_dt_us > self.max_frame_us {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt_us as f64 / 1000.0,
                self.max_frame_us / 1000
            );
            self.real_dt_us = self.max_frame_us;
        }

        self.accumulator_us += self.real_dt_us;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt_us;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_us = self.fps_samples.iter().sum::<u64>() as f64 / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_us / 1000.0;
        self.smoothed_fps = if avg_us > 0.0 { 1_000_000.0 / avg_us } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator_us >= self.fixed_dt_us {
            self.accumulator_us -= self.fixed_dt_us;
            self.total_time_us += self.fixed_dt_us;
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

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
