//! Frame timing.
//!
//! Each scene context owns a [`FrameClock`] that starts when the scene is
//! built. The clock produces a [`FrameTime`] snapshot per frame; animation
//! reads `elapsed`, which restarts at zero whenever the scene is rebuilt.

use std::time::{Duration, Instant};

/// Longest frame delta reported, so a stalled window does not jump animations
const MAX_DELTA: f32 = 0.1;

/// Timing snapshot for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped to `MAX_DELTA`
    pub delta: f32,
    /// Seconds since the clock started
    pub elapsed: f32,
    /// Frames produced before this one
    pub frame_count: u64,
    pub fps: f32,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_tick: start,
            frame_count: 0,
        }
    }

    /// Seconds since the clock started, without advancing it
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let delta = now
            .saturating_duration_since(self.last_tick)
            .as_secs_f32()
            .min(MAX_DELTA);
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        let fps = if delta > 0.0 { 1.0 / delta } else { 0.0 };
        let frame_count = self.frame_count;

        self.last_tick = now;
        self.frame_count += 1;

        FrameTime {
            delta,
            elapsed,
            frame_count,
            fps,
        }
    }

    /// Convenience for driving the clock by a fixed step
    pub fn tick_by(&mut self, step: Duration) -> FrameTime {
        let now = self.last_tick + step;
        self.tick_at(now)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
