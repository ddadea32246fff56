//! Frame timing

use std::time::{Duration, Instant};

/// Delta reported for the very first frame, when there is no previous frame
/// to measure against. The GUI library rejects a zero delta.
pub const FIRST_FRAME_DELTA: f32 = 1.0 / 60.0;

/// Measures the time between consecutive `new_frame` calls
pub struct Timer {
    last_frame: Option<Instant>,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer that has not seen a frame yet
    pub fn new() -> Self {
        Self {
            last_frame: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Record a frame boundary at `Instant::now()` and return the delta in seconds
    pub fn update(&mut self) -> f32 {
        self.update_at(Instant::now())
    }

    /// Record a frame boundary at `now` and return the delta in seconds
    pub fn update_at(&mut self, now: Instant) -> f32 {
        let elapsed = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));

        self.delta_time = if elapsed.is_zero() {
            FIRST_FRAME_DELTA
        } else {
            elapsed.as_secs_f32()
        };
        self.total_time += self.delta_time;
        self.last_frame = Some(now);
        self.frame_count += 1;
        self.delta_time
    }

    /// Forget the previous frame (used on context teardown)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since the first frame
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
