// progress.rs - Throttled progress polling
//
// The union dirty ratio walks the whole grid, so it is read on a timer
// (default 5 Hz) instead of every frame. Reaching the win ratio latches.

#[derive(Clone, Debug)]
pub struct Progress {
    interval_ms: f64,
    win_ratio: f32,
    last_poll: Option<f64>,
    ratio: f32,
    won: bool,
}

impl Progress {
    pub fn new(interval_ms: f64, win_ratio: f32) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            win_ratio,
            last_poll: None,
            ratio: 1.0,
            won: false,
        }
    }

    /// Runs `read` if the interval has elapsed and returns the fresh ratio.
    pub fn poll(&mut self, now_ms: f64, read: impl FnOnce() -> f32) -> Option<f32> {
        if let Some(last) = self.last_poll {
            if now_ms - last < self.interval_ms { return None; }
        }
        self.last_poll = Some(now_ms);
        self.ratio = read();
        if self.ratio <= self.win_ratio {
            self.won = true;
        }
        Some(self.ratio)
    }

    pub fn reset(&mut self) {
        self.last_poll = None;
        self.ratio = 1.0;
        self.won = false;
    }

    /// Last polled ratio (1.0 before the first poll).
    pub fn ratio(&self) -> f32 { self.ratio }
    pub fn is_won(&self) -> bool { self.won }
}
