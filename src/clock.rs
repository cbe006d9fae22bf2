//! Time source for gate decisions.
//!
//! Gates read "now" through a [`Clock`] so window arithmetic can be driven
//! deterministically in tests.

use std::fmt;

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "mocks"))]
mod mock {
    use std::sync::Mutex;

    use chrono::{DateTime, Duration, Utc};

    use super::Clock;

    /// Manually advanced clock. Starts at the instant it was created.
    #[derive(Debug)]
    pub struct MockClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl MockClock {
        pub fn new() -> Self {
            Self::at(Utc::now())
        }

        pub fn at(instant: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(instant),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }

        pub fn set(&self, instant: DateTime<Utc>) {
            *self.now.lock().unwrap() = instant;
        }
    }

    impl Default for MockClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
pub use mock::MockClock;
