//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
///
/// Mirrors a render-loop clock: `update` measures the wall-clock time since
/// the previous call and that value is what the frame driver hands to the
/// physics step.
pub struct Timer {
    last_frame: Instant,
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
    /// Create a new timer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    ///
    /// Returns the measured delta in seconds.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.record(elapsed.as_secs_f32());
        self.last_frame = now;
        self.delta_time
    }

    /// Record a frame of known length without reading the wall clock
    ///
    /// Used by headless runs that drive frames at a fixed cadence.
    pub fn record(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self
            .start_time
            .map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}
