//! Shared proptest strategies for unit tests.

use chrono::NaiveTime;
use proptest::prelude::*;

/// Generates a 12-hour time string together with the time it denotes.
///
/// Hours may be zero-padded and the meridiem may be in either case.
pub fn arb_clock_time() -> impl Strategy<Value = (String, NaiveTime)> {
    (1u32..=12, 0u32..60, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(hour, minute, pm, padded, upper)| {
            let meridiem = match (pm, upper) {
                (true, true) => "PM",
                (true, false) => "pm",
                (false, true) => "AM",
                (false, false) => "am",
            };
            let text = if padded {
                format!("{hour:02}:{minute:02}{meridiem}")
            } else {
                format!("{hour}:{minute:02}{meridiem}")
            };
            let hour24 = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            };
            let time = NaiveTime::from_hms_opt(hour24, minute, 0).unwrap_or(NaiveTime::MIN);
            (text, time)
        },
    )
}

/// Generates strings that are not a case-insensitive spelling of `true`.
pub fn arb_not_true() -> impl Strategy<Value = String> {
    "\\PC{0,16}".prop_filter("must not spell true", |s| s.trim().to_lowercase() != "true")
}
