use std::time::Instant;

/// Timing handed to the update and render callbacks, in seconds.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time since the clock was started.
    pub elapsed: f32,
    /// Time since the previous tick.
    pub delta: f32,
    pub frame_index: u64,
}

impl FrameTime {
    pub fn at(elapsed: f32) -> Self {
        Self {
            elapsed,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();

        Self {
            start: now,
            last: now,
            frame_index: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();

        let time = FrameTime {
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            delta: now.saturating_duration_since(self.last).as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.last = now;
        self.frame_index += 1;

        time
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
    fn ticks_are_monotonic() {
        let mut clock = FrameClock::new();

        let first = clock.tick();
        let second = clock.tick();

        assert_eq!(first.frame_index, 0);
        assert_eq!(second.frame_index, 1);
        assert!(second.elapsed >= first.elapsed);
        assert!(second.delta >= 0.0);
    }
}
