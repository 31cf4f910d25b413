//! Time-of-day predicates.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// The accepted 12-hour time format, e.g. `2:30pm` or `11:05AM`.
///
/// Meridiem tokens are the English `am`/`pm`, matched case-insensitively.
pub const TIME_FORMAT: &str = "%I:%M%p";

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parses a `H:MMam/pm` time of day.
///
/// The hour has one or two digits, the minute exactly two, and no whitespace
/// is allowed anywhere.
pub fn parse_time(candidate: &str) -> Option<NaiveTime> {
    if !has_clock_shape(candidate) {
        return None;
    }
    NaiveTime::parse_from_str(candidate, TIME_FORMAT).ok()
}

// chrono pads and skips whitespace around numbers; pin the layout first.
fn has_clock_shape(candidate: &str) -> bool {
    let Some((hour, rest)) = candidate.split_once(':') else {
        return false;
    };
    let rest = rest.as_bytes();

    (1..=2).contains(&hour.len())
        && hour.bytes().all(|b| b.is_ascii_digit())
        && rest.len() == 4
        && rest[..2].iter().all(u8::is_ascii_digit)
        && rest[2..].iter().all(u8::is_ascii_alphabetic)
}

/// Parses a date-only value, either `YYYY-MM-DD` or `D/M/YYYY`.
pub fn parse_date(candidate: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
}

/// Returns true iff `candidate` is a valid 12-hour time.
///
/// Missing or empty input is a plain format failure here.
///
/// # Examples
///
/// ```
/// use case_pipeline::is_valid_time;
///
/// assert!(is_valid_time(Some("2:30pm")));
/// assert!(!is_valid_time(Some("14:30")));
/// assert!(!is_valid_time(None));
/// ```
pub fn is_valid_time(candidate: Option<&str>) -> bool {
    candidate.and_then(parse_time).is_some()
}

/// Returns true iff `candidate` is strictly later in the day than `other`.
///
/// If either side is missing or does not parse, the comparison does not
/// apply and the result is `true`.
///
/// # Examples
///
/// ```
/// use case_pipeline::is_after;
///
/// assert!(is_after(Some("10:00am"), Some("9:00am")));
/// assert!(!is_after(Some("9:00am"), Some("9:00am")));
/// assert!(is_after(Some("garbage"), Some("9:00am")));
/// ```
pub fn is_after(candidate: Option<&str>, other: Option<&str>) -> bool {
    match (candidate.and_then(parse_time), other.and_then(parse_time)) {
        (Some(candidate), Some(other)) => candidate > other,
        _ => true,
    }
}

/// Returns true iff `date` at `candidate` is at least one minute after `now`.
///
/// An unparsable date or time, or an instant that cannot be represented,
/// passes.
pub fn is_future_time(candidate: Option<&str>, date: Option<&str>, now: NaiveDateTime) -> bool {
    let time = candidate.and_then(parse_time);
    let (Some(time), Some(date)) = (time, date.and_then(parse_date)) else {
        return true;
    };

    match now.checked_add_signed(Duration::minutes(1)) {
        Some(threshold) => date.and_time(time) >= threshold,
        None => true,
    }
}
