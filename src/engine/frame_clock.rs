/// Frame timing for the render loop
///
/// Hands out the wall-clock delta between consecutive frames and keeps a
/// rolling frame-rate average for the stats overlay.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Recompute the FPS average every N frames
const FPS_REFRESH_INTERVAL: u64 = 10;

/// Source of per-frame time deltas
pub trait FrameClock {
    /// Seconds elapsed since the previous call
    fn delta(&mut self) -> f32;
}

/// Monotonic wall clock
pub struct Clock {
    /// Time of last frame
    last_frame_time: Instant,

    /// Frame timing history for FPS calculation
    frame_times: VecDeque<Duration>,

    /// Frames measured so far
    frame_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame_time: now,
            frame_times: VecDeque::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            current_fps: 0.0,
        }
    }

    /// Measure one frame and return its duration
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.pop_front();
        }

        if self.frame_count % FPS_REFRESH_INTERVAL == 0 {
            self.update_fps();
        }

        frame_time
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total number of frames measured
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for Clock {
    fn delta(&mut self) -> f32 {
        self.tick().as_secs_f32()
    }
}
