//! Calendar helpers for the ledger.
//!
//! Days travel as `YYYY-MM-DD` strings and months as `YYYY-MM` strings, the
//! same representation the gateway uses. Everything here is pure apart from
//! [`today`] and [`current_month`], which read the clock.

use chrono::{Datelike, NaiveDate, Utc};

/// Current day (UTC) as `YYYY-MM-DD`
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Current month (UTC) as `YYYY-MM`
pub fn current_month() -> String {
    Utc::now().date_naive().format("%Y-%m").to_string()
}

/// Month (`YYYY-MM`) a day string belongs to
pub fn month_of(day: &str) -> &str {
    day.get(..7).unwrap_or(day)
}

/// Parse `YYYY-MM` into year and month number
pub fn parse_month(month: &str) -> Option<(i32, u32)> {
    let (year, month_part) = month.split_once('-')?;
    if year.len() != 4 || month_part.len() != 2 {
        return None;
    }

    let year = year.parse::<i32>().ok()?;
    let month_number = month_part.parse::<u32>().ok()?;
    if (1..=12).contains(&month_number) {
        Some((year, month_number))
    } else {
        None
    }
}

/// Parse `YYYY-MM-DD` into a calendar date
pub fn parse_day(day: &str) -> Option<NaiveDate> {
    if day.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a month, accounting for leap years
pub fn day_count(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Every day of `month` in ascending order.
///
/// A malformed month yields an empty list.
pub fn days_in_month(month: &str) -> Vec<String> {
    match parse_month(month) {
        Some((year, month_number)) => (1..=day_count(year, month_number))
            .map(|day| format!("{:04}-{:02}-{:02}", year, month_number, day))
            .collect(),
        None => Vec::new(),
    }
}

/// Day of month taken from the trailing two digits of `YYYY-MM-DD`
pub fn day_number(day: &str) -> Option<u32> {
    day.get(8..10)?.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
}

/// Get the human-readable name for a month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January", 2 => "February", 3 => "March", 4 => "April",
        5 => "May", 6 => "June", 7 => "July", 8 => "August",
        9 => "September", 10 => "October", 11 => "November", 12 => "December",
        _ => "Invalid Month",
    }
}

/// Format `YYYY-MM-DD` for display (e.g. "March 5, 2024").
///
/// Empty input gives an empty string; anything unparsable is returned as-is.
pub fn format_day(day: &str) -> String {
    if day.is_empty() {
        return String::new();
    }
    match parse_day(day) {
        Some(date) => format!("{} {}, {}", month_name(date.month()), date.day(), date.year()),
        None => day.to_string(),
    }
}

/// Format `YYYY-MM` for display (e.g. "February 2024")
pub fn format_month(month: &str) -> String {
    if month.is_empty() {
        return String::new();
    }
    match parse_month(month) {
        Some((year, month_number)) => format!("{} {}", month_name(month_number), year),
        None => month.to_string(),
    }
}

/// Month before `month`, rolling back across years
pub fn previous_month(month: &str) -> Option<String> {
    let (year, month_number) = parse_month(month)?;
    let (year, month_number) = if month_number == 1 {
        (year - 1, 12)
    } else {
        (year, month_number - 1)
    };
    Some(format!("{:04}-{:02}", year, month_number))
}

/// Month after `month`, rolling over across years
pub fn next_month(month: &str) -> Option<String> {
    let (year, month_number) = parse_month(month)?;
    let (year, month_number) = if month_number == 12 {
        (year + 1, 1)
    } else {
        (year, month_number + 1)
    };
    Some(format!("{:04}-{:02}", year, month_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month_leap_february() {
        let days = days_in_month("2024-02");
        assert_eq!(days.len(), 29);
        assert_eq!(days.first().map(String::as_str), Some("2024-02-01"));
        assert_eq!(days.last().map(String::as_str), Some("2024-02-29"));
    }

    #[test]
    fn test_days_in_month_lengths() {
        assert_eq!(days_in_month("2023-02").len(), 28);
        assert_eq!(days_in_month("1900-02").len(), 28);
        assert_eq!(days_in_month("2000-02").len(), 29);
        assert_eq!(days_in_month("2024-04").len(), 30);
        assert_eq!(days_in_month("2024-12").len(), 31);
    }

    #[test]
    fn test_days_in_month_matches_chrono_for_every_month() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12u32 {
                let label = format!("{:04}-{:02}", year, month);
                let days = days_in_month(&label);

                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
                };
                let expected = (next - first).num_days() as usize;
                assert_eq!(days.len(), expected, "{}", label);

                for (index, day) in days.iter().enumerate() {
                    assert_eq!(day, &format!("{}-{:02}", label, index + 1));
                }
                assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
            }
        }
    }

    #[test]
    fn test_days_in_month_rejects_malformed() {
        assert!(days_in_month("").is_empty());
        assert!(days_in_month("2024-13").is_empty());
        assert!(days_in_month("2024/02").is_empty());
        assert!(days_in_month("24-02").is_empty());
    }

    #[test]
    fn test_day_number() {
        assert_eq!(day_number("2024-03-05"), Some(5));
        assert_eq!(day_number("2024-03-31"), Some(31));
        assert_eq!(day_number("2024-03"), None);
        assert_eq!(day_number("2024-03-xx"), None);
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day("2024-03-05"), "March 5, 2024");
        assert_eq!(format_day(""), "");
        assert_eq!(format_day("not a date"), "not a date");
    }

    #[test]
    fn test_format_is_idempotent() {
        assert_eq!(format_day("2025-12-31"), format_day("2025-12-31"));
        assert_eq!(format_month("2024-02"), format_month("2024-02"));
    }

    #[test]
    fn test_format_month() {
        assert_eq!(format_month("2024-02"), "February 2024");
        assert_eq!(format_month(""), "");
    }

    #[test]
    fn test_month_navigation() {
        assert_eq!(previous_month("2024-01").as_deref(), Some("2023-12"));
        assert_eq!(previous_month("2024-03").as_deref(), Some("2024-02"));
        assert_eq!(next_month("2024-12").as_deref(), Some("2025-01"));
        assert_eq!(next_month("2024-02").as_deref(), Some("2024-03"));
        assert_eq!(next_month("garbage"), None);
    }

    #[test]
    fn test_today_and_current_month_shapes() {
        let day = today();
        let month = current_month();
        assert_eq!(day.len(), 10);
        assert!(parse_day(&day).is_some());
        assert_eq!(month_of(&day), month);
        assert!(parse_month(&month).is_some());
    }

    #[test]
    fn test_is_leap_year() {
        assert!(!is_leap_year(2025));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }
}
