use std::time::Duration;

/// Rolling window of frame times, checked against a per-frame budget.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
    budget: Duration,
    over_budget: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize, budget: Duration) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
            budget,
            over_budget: 0,
        }
    }

    /// Record one frame. Returns false if it blew the budget.
    pub fn record(&mut self, dt: Duration) -> bool {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
        let within = dt <= self.budget;
        if !within {
            self.over_budget += 1;
            tracing::warn!(?dt, budget = ?self.budget, "frame over budget");
        }
        within
    }

    fn window(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let window = self.window();
        if window.is_empty() {
            return Duration::ZERO;
        }
        window.iter().sum::<Duration>() / window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.window().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Frames over budget since creation, not just in the window.
    pub fn over_budget(&self) -> usize {
        self.over_budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUDGET: Duration = Duration::from_millis(50);

    #[test]
    fn frame_timer_tracks_history() {
        let mut timer = FrameTimer::new(3, BUDGET);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert_eq!(timer.min(), Duration::from_millis(10));
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2, BUDGET);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30)); // overwrites first

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4, BUDGET);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.max(), Duration::ZERO);
    }

    #[test]
    fn over_budget_frames_are_counted() {
        let mut timer = FrameTimer::new(2, BUDGET);
        assert!(timer.record(Duration::from_millis(50)));
        assert!(!timer.record(Duration::from_millis(51)));
        assert!(!timer.record(Duration::from_millis(80)));
        assert_eq!(timer.over_budget(), 2);
    }
}
