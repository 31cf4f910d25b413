//! Wall-clock access for time-aware constraints.
//!
//! Constraints never call `Local::now()` themselves. They read the time from a
//! [`Clock`] carried by the validation context, so a pass can be replayed
//! against a fixed instant.

use chrono::{Local, NaiveDateTime};

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    /// Returns "now" as a naive local date-time.
    fn now(&self) -> NaiveDateTime;
}

/// The process wall clock, in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
///
/// # Examples
///
/// ```
/// use case_pipeline::{Clock, FixedClock};
/// use chrono::NaiveDate;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 1)
///     .and_then(|d| d.and_hms_opt(9, 0, 0))
///     .unwrap();
/// assert_eq!(FixedClock::new(at).now(), at);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    at: NaiveDateTime,
}

impl FixedClock {
    /// Creates a clock that always reports `at`.
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.at
    }
}
