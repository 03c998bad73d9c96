use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;
const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Variable-timestep frame clock: each frame simulates exactly the wall-clock
/// time measured since the previous one, however long that was.
pub struct FrameClock {
    /// Frames longer than this are logged as stalls.
    pub long_frame_secs: f64,
    pub frame_count: u64,
    pub real_dt: f64,
    last_instant: Instant,
    last_report: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            long_frame_secs: 0.25,
            frame_count: 0,
            real_dt: 0.0,
            last_instant: now,
            last_report: now,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure the time since the previous frame. Returns the delta in seconds.
    pub fn begin_frame(&mut self) -> f64 {
        self.begin_frame_at(Instant::now())
    }

    pub fn begin_frame_at(&mut self, now: Instant) -> f64 {
        self.real_dt = now.saturating_duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.real_dt > self.long_frame_secs {
            log::warn!("Long frame: {:.1}ms", self.real_dt * 1000.0);
        }
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        if now.saturating_duration_since(self.last_report) >= FPS_REPORT_INTERVAL {
            self.last_report = now;
            log::debug!(
                "{:.1} fps ({:.2}ms/frame)",
                self.smoothed_fps,
                self.smoothed_frame_time_ms
            );
        }

        self.real_dt
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
    fn measures_elapsed_time() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let dt = clock.begin_frame_at(start + Duration::from_millis(20));
        assert!((dt - 0.020).abs() < 1e-9);
        assert_eq!(clock.frame_count, 1);
    }

    #[test]
    fn long_frames_report_full_elapsed_time() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let dt = clock.begin_frame_at(start + Duration::from_secs(3));
        assert!((dt - 3.0).abs() < 1e-9);
        assert_eq!(clock.real_dt, dt);
    }

    #[test]
    fn consecutive_frames_measure_from_previous() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.begin_frame_at(start + Duration::from_millis(10));
        let dt = clock.begin_frame_at(start + Duration::from_millis(26));
        assert!((dt - 0.016).abs() < 1e-9);
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn smoothed_fps_tracks_steady_rate() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        for i in 1..=(FPS_SAMPLE_COUNT as u64) {
            clock.begin_frame_at(start + Duration::from_millis(20 * i));
        }
        assert!((clock.smoothed_fps - 50.0).abs() < 0.01);
        assert!((clock.smoothed_frame_time_ms - 20.0).abs() < 0.01);
    }
}
