//! Wall-clock frame statistics.
//!
//! Simulations advance per frame, not per second, so nothing here feeds the
//! physics. [`FrameClock`] only reports how fast frames actually arrive,
//! which the gallery shows in its status bar. It uses `web_time::Instant` so
//! the same code runs natively and in the browser.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! // once per executed frame:
//! clock.tick();
//! println!("{} frames, {:.1} FPS", clock.frame(), clock.fps());
//! ```

use std::time::Duration;
use web_time::Instant;

/// Frame counter with a periodically refreshed FPS estimate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// When the clock was created or last reset.
    start: Instant,
    /// When the last frame ticked.
    last_frame: Instant,
    /// Time between the last two frames in seconds.
    delta_secs: f32,
    /// Frames ticked since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to refresh the FPS estimate.
    fps_update_interval: Duration,
    /// Time spent paused, excluded from `elapsed`.
    paused_total: Duration,
    /// When the current pause began.
    paused_at: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused_total: Duration::ZERO,
            paused_at: None,
        }
    }

    /// Record one executed frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if self.paused_at.is_some() {
            self.delta_secs = 0.0;
            return;
        }

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Seconds since start, not counting pauses.
    pub fn elapsed(&self) -> f32 {
        let end = self.paused_at.unwrap_or_else(Instant::now);
        end.duration_since(self.start)
            .saturating_sub(self.paused_total)
            .as_secs_f32()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
            self.fps = 0.0;
        }
    }

    pub fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            let now = Instant::now();
            self.paused_total += now.duration_since(at);
            self.last_frame = now;
            self.fps_update_time = now;
            self.fps_frame_count = self.frame_count;
        }
    }

    /// Start counting from zero again.
    pub fn reset(&mut self) {
        *self = Self::new();
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
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(5));
        clock.tick();
        clock.tick();
        assert_eq!(clock.frame(), 2);
        assert!(clock.elapsed() > 0.0);
    }

    #[test]
    fn test_paused_ticks_do_not_count() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.pause();
        clock.tick();
        assert_eq!(clock.frame(), 1);
        assert_eq!(clock.delta(), 0.0);

        clock.resume();
        clock.tick();
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_fps_refreshes() {
        let mut clock = FrameClock::new();
        clock.tick();
        thread::sleep(Duration::from_millis(520));
        clock.tick();
        assert!(clock.fps() > 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.reset();
        assert_eq!(clock.frame(), 0);
    }
}
