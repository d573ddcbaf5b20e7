use std::time::Duration;

/// Delay schedule between retries of a failed page request
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
    current_attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current_attempt: 0,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = if self.current_attempt == 0 {
            self.initial.min(self.max)
        } else {
            let multiplier = 2f64.powi(self.current_attempt as i32);
            let delay_ms = self.initial.as_millis() as f64 * multiplier;
            let delay_ms = delay_ms.min(self.max.as_millis() as f64);
            Duration::from_millis(delay_ms as u64)
        };

        self.current_attempt += 1;
        delay
    }

    /// Retries handed out so far
    pub fn current_attempt(&self) -> u32 {
        self.current_attempt
    }
}
