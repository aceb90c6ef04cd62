use std::time::Duration;

/// Doubling reconnect delay, capped at `max`, reset after a successful connect
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.min(max);
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// Delay to wait now; the following call returns twice as much (up to `max`)
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = next_backoff(self.current, self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

fn next_backoff(current: Duration, max: Duration) -> Duration {
    let doubled = current.saturating_mul(2);
    if doubled > max {
        max
    } else {
        doubled
    }
}
