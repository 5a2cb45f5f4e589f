//! Common utility functions

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use crate::MINOR_UNITS;

/// Date format for database storage
pub const DB_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert DateTime to database string format
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DB_DATE_FORMAT).to_string()
}

/// Parse database datetime string
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, DB_DATE_FORMAT)
        .ok()
        .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
}

/// Current UTC datetime at the precision the database stores (whole seconds)
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Format minor units as a display amount, e.g. `NT$ 1234.50`
pub fn format_amount(amount: i64, currency: &str) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let units = abs / MINOR_UNITS as u64;
    let cents = abs % MINOR_UNITS as u64;
    if currency.is_empty() {
        format!("{}{}.{:02}", sign, units, cents)
    } else {
        format!("{} {}{}.{:02}", currency, sign, units, cents)
    }
}

/// Parse a user-entered decimal amount into minor units
///
/// Accepts `12`, `12.3` and `12.34`. Returns `None` for negative numbers,
/// more than two decimals, or anything that is not a plain decimal.
pub fn parse_amount(s: &str) -> Option<i64> {
    let s = s.trim();
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 2 {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };

    whole.checked_mul(MINOR_UNITS)?.checked_add(cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_date_to_db_conversion() {
        let dt = Utc.with_ymd_and_hms(2016, 12, 15, 17, 23, 54).unwrap();
        assert_eq!("2016-12-15 17:23:54", format_datetime(&dt));
    }

    #[test]
    fn test_db_datetime_conversion() {
        let expected = Utc.with_ymd_and_hms(2016, 12, 15, 17, 23, 54).unwrap();
        assert_eq!(expected, parse_datetime("2016-12-15 17:23:54").unwrap());
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("invalid").is_none());
        assert!(parse_datetime("2023-13-01 00:00:00").is_none());
    }

    #[test]
    fn test_now_is_whole_seconds() {
        let before = Utc::now().trunc_subsecs(0);
        let result = now();
        assert_eq!(result.nanosecond(), 0);
        assert!(result >= before);
        assert_eq!(parse_datetime(&format_datetime(&result)), Some(result));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(85000, "NT$"), "NT$ 850.00");
        assert_eq!(format_amount(1205, "USD"), "USD 12.05");
        assert_eq!(format_amount(-35000, "NT$"), "NT$ -350.00");
        assert_eq!(format_amount(7, ""), "0.07");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("850"), Some(85000));
        assert_eq!(parse_amount("12.3"), Some(1230));
        assert_eq!(parse_amount("12.34"), Some(1234));
        assert_eq!(parse_amount(" 0.5 "), Some(50));
        assert_eq!(parse_amount(".75"), Some(75));
        assert_eq!(parse_amount("12."), Some(1200));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("1.234"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1,000"), None);
        assert_eq!(parse_amount("99999999999999999999"), None);
    }
}
