// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

/// Time source used to space out consecutive sends.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// How long to wait so that at least `delay` separates `last_send` from `now`.
pub fn remaining_delay(delay: Duration, last_send: Option<Instant>, now: Instant) -> Duration {
    match last_send {
        Some(last) => delay.saturating_sub(now.saturating_duration_since(last)),
        None => Duration::ZERO,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Manually advanced clock. Sleeping advances it and is recorded.
    #[derive(Clone)]
    pub struct FakeClock {
        now: Arc<Mutex<Instant>>,
        pub sleeps: Arc<Mutex<Vec<Duration>>>,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self {
                now: Arc::new(Mutex::new(Instant::now())),
                sleeps: Arc::default(),
            }
        }

        pub fn advance(&self, duration: Duration) {
            *self.now.lock().unwrap() += duration;
        }

        pub fn slept(&self) -> Vec<Duration> {
            self.sleeps.lock().unwrap().clone()
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }

        fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
            self.advance(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_send_never_waits() {
        assert_eq!(
            remaining_delay(Duration::from_secs(2), None, Instant::now()),
            Duration::ZERO
        );
    }

    #[test]
    fn waits_only_for_the_remainder() {
        let last = Instant::now();
        let delay = Duration::from_secs(2);
        assert_eq!(
            remaining_delay(delay, Some(last), last + Duration::from_millis(500)),
            Duration::from_millis(1500)
        );
        assert_eq!(
            remaining_delay(delay, Some(last), last + Duration::from_secs(3)),
            Duration::ZERO
        );
        assert_eq!(
            remaining_delay(Duration::ZERO, Some(last), last),
            Duration::ZERO
        );
    }
}
