//! Frame-timer sprite animation.
//!
//! All timing uses integer microseconds (`u64`) so that elapsed time adds up
//! exactly: three 120 ms ticks land on the frame boundary with no float drift.
//!
//! A tick advances **at most one frame**, carrying the remainder. A long frame
//! therefore delays the animation instead of skipping frames, which keeps
//! frame-triggered events (like spawning a projectile on the last cannon frame)
//! from being jumped over.

/// Convert a delta in seconds to whole microseconds.
pub fn secs_to_us(dt: f64) -> u64 {
    if dt <= 0.0 {
        0
    } else {
        (dt * 1_000_000.0).round() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Looping,
    Once,
}

/// What a single `tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Still on the same frame.
    Held,
    /// Moved to `frame_index`.
    Advanced,
    /// A `Once` animation stepped past its last frame.
    Finished,
}

/// Runtime state for one animation instance with uniform frame duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAnimation {
    pub frame_count: usize,
    pub frame_duration_us: u64,
    pub playback: Playback,
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub finished: bool,
}

impl FrameAnimation {
    pub fn new(frame_count: usize, frame_duration_us: u64, playback: Playback) -> Self {
        Self {
            frame_count,
            frame_duration_us,
            playback,
            frame_index: 0,
            elapsed_us: 0,
            finished: false,
        }
    }

    pub fn looping(frame_count: usize, frame_duration_us: u64) -> Self {
        Self::new(frame_count, frame_duration_us, Playback::Looping)
    }

    pub fn once(frame_count: usize, frame_duration_us: u64) -> Self {
        Self::new(frame_count, frame_duration_us, Playback::Once)
    }

    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.elapsed_us = 0;
        self.finished = false;
    }

    pub fn is_last_frame(&self) -> bool {
        self.frame_index + 1 == self.frame_count
    }

    /// Advance by `dt_us` microseconds.
    pub fn tick(&mut self, dt_us: u64) -> TickResult {
        if self.finished || self.frame_count == 0 {
            return TickResult::Held;
        }

        self.elapsed_us += dt_us;
        if self.elapsed_us < self.frame_duration_us {
            return TickResult::Held;
        }

        self.elapsed_us -= self.frame_duration_us;
        self.frame_index += 1;
        if self.frame_index >= self.frame_count {
            match self.playback {
                Playback::Looping => self.frame_index = 0,
                Playback::Once => {
                    self.frame_index = 0;
                    self.elapsed_us = 0;
                    self.finished = true;
                    return TickResult::Finished;
                }
            }
        }
        TickResult::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_to_us_rounds_and_clamps() {
        assert_eq!(secs_to_us(0.12), 120_000);
        assert_eq!(secs_to_us(1.0 / 60.0), 16_667);
        assert_eq!(secs_to_us(0.0), 0);
        assert_eq!(secs_to_us(-1.0), 0);
    }

    #[test]
    fn looping_animation_alternates_frames() {
        let mut anim = FrameAnimation::looping(2, 180_000);
        assert_eq!(anim.tick(100_000), TickResult::Held);
        assert_eq!(anim.frame_index, 0);
        assert_eq!(anim.tick(80_000), TickResult::Advanced);
        assert_eq!(anim.frame_index, 1);
        assert_eq!(anim.tick(180_000), TickResult::Advanced);
        assert_eq!(anim.frame_index, 0);
        assert!(!anim.finished);
    }

    #[test]
    fn remainder_carries_to_next_frame() {
        let mut anim = FrameAnimation::looping(2, 100_000);
        anim.tick(130_000);
        assert_eq!(anim.frame_index, 1);
        assert_eq!(anim.elapsed_us, 30_000);
        assert_eq!(anim.tick(70_000), TickResult::Advanced);
        assert_eq!(anim.frame_index, 0);
    }

    #[test]
    fn long_tick_advances_only_one_frame() {
        let mut anim = FrameAnimation::once(3, 120_000);
        assert_eq!(anim.tick(1_000_000), TickResult::Advanced);
        assert_eq!(anim.frame_index, 1);
        assert_eq!(anim.tick(0), TickResult::Advanced);
        assert_eq!(anim.frame_index, 2);
    }

    #[test]
    fn once_animation_finishes_after_last_frame() {
        let mut anim = FrameAnimation::once(3, 120_000);
        assert_eq!(anim.tick(120_000), TickResult::Advanced);
        assert_eq!(anim.tick(120_000), TickResult::Advanced);
        assert!(anim.is_last_frame());
        assert_eq!(anim.tick(120_000), TickResult::Finished);
        assert!(anim.finished);
        assert_eq!(anim.frame_index, 0);
        assert_eq!(anim.tick(120_000), TickResult::Held);
    }

    #[test]
    fn reset_restarts_from_first_frame() {
        let mut anim = FrameAnimation::once(3, 10);
        anim.tick(10);
        anim.tick(10);
        anim.tick(10);
        assert!(anim.finished);
        anim.reset();
        assert!(!anim.finished);
        assert_eq!(anim.frame_index, 0);
        assert_eq!(anim.elapsed_us, 0);
    }

    #[test]
    fn empty_animation_never_advances() {
        let mut anim = FrameAnimation::looping(0, 10);
        assert_eq!(anim.tick(1_000), TickResult::Held);
        assert_eq!(anim.frame_index, 0);
    }
}
