//! Frame-rate measurement.

use std::time::Duration;

const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames over windows of at least one second.
///
/// Time is passed in, so the counter works the same against a wall clock or
/// a simulated one.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start: Option<Duration>,
    frames: u32,
    fps: f64,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now`. Returns the new rate when a window closes.
    pub fn tick(&mut self, now: Duration) -> Option<f64> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;

        let elapsed = now.saturating_sub(start);
        if elapsed < WINDOW {
            return None;
        }
        self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = Some(now);
        Some(self.fps)
    }

    /// Rate over the last closed window, 0 before the first one closes.
    #[must_use]
    pub const fn fps(&self) -> f64 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let mut fps = FpsCounter::new();
        let mut reports = Vec::new();
        for i in 0..=60u64 {
            if let Some(rate) = fps.tick(Duration::from_millis(i * 25)) {
                reports.push(rate);
            }
        }
        // 41 frames over the first 1000 ms, then 20 more over 500 ms.
        assert_eq!(reports.len(), 1);
        assert!((reports[0] - 41.0).abs() < 1e-9);
        assert!((fps.fps() - 41.0).abs() < 1e-9);
    }

    #[test]
    fn zero_until_first_window_closes() {
        let mut fps = FpsCounter::new();
        assert_eq!(fps.tick(Duration::ZERO), None);
        assert_eq!(fps.tick(Duration::from_millis(999)), None);
        assert!(fps.fps().abs() < f64::EPSILON);
    }
}
