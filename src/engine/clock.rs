//=========================================================================
// Frame Clock
//=========================================================================
//
// Per-engine frame timing. Owned by the engine and reset when the loop
// starts; the delta it produces is passed explicitly into update.
//
//=========================================================================

use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last_tick: Instant,
    window_start: Instant,
    window_frames: u32,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            window_start: now,
            window_frames: 0,
            fps: 0.0,
        }
    }

    /// Restarts timing from now. The next tick measures from here.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Seconds since the previous tick (or reset).
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;

        self.window_frames += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / window.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }

        dt.as_secs_f32()
    }

    /// Time since the last reset, as of the last tick.
    pub fn elapsed(&self) -> Duration {
        self.last_tick.saturating_duration_since(self.start)
    }

    /// Frames per second over the last completed one-second window.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[cfg(test)]
    pub(crate) fn started_at(&self) -> Instant {
        self.start
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

    const EPSILON: f32 = 1e-6;

    #[test]
    fn tick_reports_delta_since_previous_tick() {
        let mut clock = FrameClock::new();
        let t0 = clock.started_at();

        let dt = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < EPSILON);

        let dt = clock.tick_at(t0 + Duration::from_millis(50));
        assert!((dt - 0.034).abs() < EPSILON);
        assert_eq!(clock.elapsed(), Duration::from_millis(50));
    }

    #[test]
    fn fps_is_measured_over_one_second_windows() {
        let mut clock = FrameClock::new();
        let t0 = clock.started_at();
        assert_eq!(clock.fps(), 0.0);

        for frame in 1..=60 {
            clock.tick_at(t0 + Duration::from_secs_f64(frame as f64 / 60.0));
        }

        assert!((clock.fps() - 60.0).abs() < 0.01, "fps was {}", clock.fps());
    }

    #[test]
    fn reset_restarts_elapsed_time() {
        let mut clock = FrameClock::new();
        let t0 = clock.started_at();
        clock.tick_at(t0 + Duration::from_secs(3));

        clock.reset();

        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn time_going_backwards_yields_zero_delta() {
        let mut clock = FrameClock::new();
        let t0 = clock.started_at();
        clock.tick_at(t0 + Duration::from_millis(10));
        assert_eq!(clock.tick_at(t0), 0.0);
    }
}
