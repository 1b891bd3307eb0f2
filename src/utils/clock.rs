//! Wall-clock abstraction.
//!
//! Cache expiry and "today" are both read through [`Clock`] so tests can
//! move time by hand.

use std::fmt::Debug;

use chrono::{DateTime, Local, NaiveDate};

/// Source of the current local time.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Calendar date of [`Clock::now`] in local time.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use std::sync::Arc;

    use chrono::{DateTime, Local, NaiveDate, TimeZone};
    use parking_lot::Mutex;

    use super::Clock;

    /// Clock that only moves when told to.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<DateTime<Local>>>,
    }

    impl ManualClock {
        pub fn at(now: DateTime<Local>) -> Self {
            Self {
                now: Arc::new(Mutex::new(now)),
            }
        }

        /// Noon on the given date, local time.
        pub fn on(year: i32, month: u32, day: u32) -> Self {
            let now = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .and_then(|dt| Local.from_local_datetime(&dt).earliest())
                .expect("valid test date");
            Self::at(now)
        }

        pub fn advance(&self, by: chrono::Duration) {
            let mut now = self.now.lock();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            *self.now.lock()
        }
    }
}
