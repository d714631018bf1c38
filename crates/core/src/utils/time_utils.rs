use chrono::{Datelike, Local, NaiveDate};

use crate::constants::DATE_FORMAT;

/// Today's date in the local timezone of the farm.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a `YYYY-MM-DD` date, tolerating surrounding whitespace.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// True when `date` falls inside the given calendar month.
pub fn is_in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_tolerates_whitespace() {
        assert_eq!(
            parse_date(" 2023-10-27 "),
            NaiveDate::from_ymd_opt(2023, 10, 27)
        );
        assert_eq!(parse_date("27/10/2023"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_format_date_round_trips() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(format_date(date), "2024-02-29");
        assert_eq!(parse_date(&format_date(date)), Some(date));
    }

    #[test]
    fn test_is_in_month() {
        let date = NaiveDate::from_ymd_opt(2023, 10, 30).unwrap();
        assert!(is_in_month(date, 2023, 10));
        assert!(!is_in_month(date, 2023, 11));
        assert!(!is_in_month(date, 2022, 10));
    }
}
