//! Frame timing.
//!
//! [`Time`] is the clock the transition engine reads. In the viewer it
//! follows the wall clock; tests and benchmarks use [`Time::stepped`] so every
//! frame advances by the same amount and results are reproducible.
//!
//! ```ignore
//! let mut time = Time::new();
//! loop {
//!     time.update();
//!     scene.frame(&time);
//! }
//! ```

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
enum Source {
    Clock { start: Instant, last_frame: Instant },
    Stepped { step: f32 },
}

/// Elapsed time, delta time, frame count and FPS.
#[derive(Debug)]
pub struct Time {
    source: Source,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_window: f32,
}

/// How often the FPS estimate refreshes, in seconds.
const FPS_INTERVAL: f32 = 0.5;

impl Time {
    /// A clock that starts now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self::with_source(Source::Clock {
            start: now,
            last_frame: now,
        })
    }

    /// A deterministic clock advancing `step` seconds per update.
    pub fn stepped(step: f32) -> Self {
        Self::with_source(Source::Stepped { step: step.max(0.0) })
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_window: 0.0,
        }
    }

    /// Advance one frame. Returns `(elapsed, delta)`.
    pub fn update(&mut self) -> (f32, f32) {
        match &mut self.source {
            Source::Clock { start, last_frame } => {
                let now = Instant::now();
                self.delta_secs = now.duration_since(*last_frame).as_secs_f32();
                self.elapsed_secs = now.duration_since(*start).as_secs_f32();
                *last_frame = now;
            }
            Source::Stepped { step } => {
                self.delta_secs = *step;
                self.elapsed_secs = (self.frame_count + 1) as f32 * *step;
            }
        }
        self.frame_count += 1;

        self.fps_window += self.delta_secs;
        if self.fps_window >= FPS_INTERVAL {
            self.fps = (self.frame_count - self.fps_frame_count) as f32 / self.fps_window;
            self.fps_frame_count = self.frame_count;
            self.fps_window = 0.0;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds since the previous frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Elapsed time as a Duration.
    pub fn elapsed_duration(&self) -> Duration {
        Duration::from_secs_f32(self.elapsed_secs)
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
