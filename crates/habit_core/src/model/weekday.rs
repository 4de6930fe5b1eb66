//! Locale-independent weekday names.
//!
//! # Responsibility
//! - Resolve persisted weekday names to `chrono::Weekday`.
//! - Convert weekdays to the calendar-trigger index at the scheduling boundary.
//!
//! # Invariants
//! - Canonical names are English, `Sunday` through `Saturday`.
//! - Trigger indices run 1..=7 with 1 = Sunday.

use chrono::Weekday;

/// Canonical weekday names in trigger-index order.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Resolves one weekday name.
///
/// Matching is case-insensitive after trimming. Abbreviations and localized
/// names are not accepted.
pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    let trimmed = name.trim();
    WEEKDAY_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(trimmed))
        .map(|index| WEEKDAYS_FROM_SUNDAY[index])
}

/// Returns the canonical persisted name for a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_sunday() as usize]
}

/// Returns the calendar-trigger index (1 = Sunday, 7 = Saturday).
pub fn trigger_index(day: Weekday) -> u32 {
    day.number_from_sunday()
}

/// Returns the weekday for a calendar-trigger index, if in range.
pub fn weekday_from_trigger_index(index: u32) -> Option<Weekday> {
    match index {
        1..=7 => Some(WEEKDAYS_FROM_SUNDAY[(index - 1) as usize]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_weekday_name, trigger_index, weekday_from_trigger_index, weekday_name};
    use chrono::Weekday;

    #[test]
    fn parse_accepts_canonical_names_in_any_case() {
        assert_eq!(parse_weekday_name("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday_name(" saturday "), Some(Weekday::Sat));
        assert_eq!(parse_weekday_name("SUNDAY"), Some(Weekday::Sun));
    }

    #[test]
    fn parse_rejects_unknown_and_abbreviated_names() {
        assert_eq!(parse_weekday_name("Funday"), None);
        assert_eq!(parse_weekday_name("Mon"), None);
        assert_eq!(parse_weekday_name(""), None);
    }

    #[test]
    fn trigger_index_starts_at_sunday() {
        assert_eq!(trigger_index(Weekday::Sun), 1);
        assert_eq!(trigger_index(Weekday::Mon), 2);
        assert_eq!(trigger_index(Weekday::Sat), 7);
        assert_eq!(weekday_from_trigger_index(4), Some(Weekday::Wed));
        assert_eq!(weekday_from_trigger_index(0), None);
        assert_eq!(weekday_from_trigger_index(8), None);
    }

    #[test]
    fn weekday_name_is_canonical() {
        assert_eq!(weekday_name(Weekday::Thu), "Thursday");
    }
}
