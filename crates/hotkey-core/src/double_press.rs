//! Detects the same binding fired twice within a short window.

/// Result of feeding one press into a [`DoublePressDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Detector (re)armed by this press.
    First,
    /// Second press inside the window; detector is disarmed again.
    Double,
}

#[derive(Debug, Clone)]
pub struct DoublePressDetector {
    window_ms: u64,
    armed_at: Option<u64>,
}

impl DoublePressDetector {
    /// A window of 0 never reports [`PressOutcome::Double`].
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            armed_at: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn press(&mut self, timestamp_ms: u64) -> PressOutcome {
        match self.armed_at {
            Some(armed)
                if self.window_ms > 0 && timestamp_ms.saturating_sub(armed) < self.window_ms =>
            {
                self.armed_at = None;
                PressOutcome::Double
            }
            _ => {
                self.armed_at = Some(timestamp_ms);
                PressOutcome::First
            }
        }
    }
}

impl Default for DoublePressDetector {
    fn default() -> Self {
        Self::new(1000)
    }
}
