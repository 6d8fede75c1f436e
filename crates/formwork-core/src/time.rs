use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Clock abstracts access to the current timestamp so transitions remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that advances by a fixed step every time it is read.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        match self.next.lock() {
            Ok(mut guard) => {
                let current = *guard;
                *guard = current + self.step;
                current
            }
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_clock_is_strictly_increasing() {
        let clock = SteppingClock::new(Utc::now(), Duration::seconds(1));
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::seconds(1));
    }
}
