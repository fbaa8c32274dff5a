use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Instantaneous frame rate derived from `dt`.
    #[inline]
    pub fn fps(&self) -> f32 {
        if self.dt > 0.0 { 1.0 / self.dt } else { 0.0 }
    }
}

/// Frame clock producing `FrameTime` snapshots, one per window.
///
/// Delta time is clamped so a debugger pause or a minimized window does not produce
/// huge steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with the default clamps (0.1 ms to 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline (after a resume or surface reconfigure).
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        let a = clock.tick_at(start + Duration::from_millis(16));
        let b = clock.tick_at(start + Duration::from_millis(32));
        assert_eq!((a.frame_index, b.frame_index), (0, 1));
    }

    #[test]
    fn dt_is_clamped_both_ways() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let start = clock.last;
        let fast = clock.tick_at(start);
        assert!((fast.dt - 0.001).abs() < 1e-6);
        let stalled = clock.tick_at(start + Duration::from_secs(5));
        assert!((stalled.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn fps_from_dt() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        let ft = clock.tick_at(start + Duration::from_millis(20));
        assert!((ft.fps() - 50.0).abs() < 0.01);
    }
}
