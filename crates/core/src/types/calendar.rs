//! Basket timestamp display.
//!
//! Basket times are stored as epoch milliseconds and rendered either in the
//! Gregorian calendar or in the Solar Hijri (Jalali) calendar.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Timelike, Utc};
use thiserror::Error;

/// Calendar used when rendering basket times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// Solar Hijri calendar, e.g. `1403/01/01 14:05`.
    #[default]
    Jalali,
    /// Gregorian calendar, e.g. `2024/03/20 14:05`.
    Gregorian,
}

/// Error parsing a [`DateStyle`].
#[derive(Debug, Error)]
#[error("unknown date style: {0} (expected `jalali` or `gregorian`)")]
pub struct DateStyleError(String);

impl FromStr for DateStyle {
    type Err = DateStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jalali" | "persian" => Ok(Self::Jalali),
            "gregorian" => Ok(Self::Gregorian),
            other => Err(DateStyleError(other.to_owned())),
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jalali => f.write_str("jalali"),
            Self::Gregorian => f.write_str("gregorian"),
        }
    }
}

/// Render epoch milliseconds as `YYYY/MM/DD HH:MM` (UTC) in the given calendar.
///
/// Out-of-range timestamps render as the raw number.
#[must_use]
pub fn format_timestamp(millis: i64, style: DateStyle) -> String {
    let Some(time) = DateTime::<Utc>::from_timestamp_millis(millis) else {
        return millis.to_string();
    };

    let (year, month, day) = match style {
        DateStyle::Gregorian => (i64::from(time.year()), time.month(), time.day()),
        DateStyle::Jalali => gregorian_to_jalali(i64::from(time.year()), time.month(), time.day()),
    };

    format!(
        "{year:04}/{month:02}/{day:02} {:02}:{:02}",
        time.hour(),
        time.minute()
    )
}

/// Cumulative day count before each Gregorian month in a common year.
const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Convert a Gregorian date to the Solar Hijri calendar.
fn gregorian_to_jalali(year: i64, month: u32, day: u32) -> (i64, u32, u32) {
    let leap_year = if month > 2 { year + 1 } else { year };
    let month_offset = DAYS_BEFORE_MONTH
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or_default();

    let mut days = 355_666 + 365 * year + (leap_year + 3) / 4 - (leap_year + 99) / 100
        + (leap_year + 399) / 400
        + i64::from(day)
        + month_offset;

    let mut jalali_year = -1595 + 33 * (days / 12_053);
    days %= 12_053;
    jalali_year += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        jalali_year += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    // days is now within 0..=365
    let days = u32::try_from(days).unwrap_or_default();
    let (jalali_month, jalali_day) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    (jalali_year, jalali_month, jalali_day)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2024-03-20 00:00:00 UTC, Nowruz 1403.
    const NOWRUZ_1403: i64 = 1_710_892_800_000;

    #[test]
    fn test_jalali_new_year() {
        assert_eq!(gregorian_to_jalali(2024, 3, 20), (1403, 1, 1));
        assert_eq!(gregorian_to_jalali(2023, 3, 21), (1402, 1, 1));
    }

    #[test]
    fn test_jalali_second_half_of_year() {
        // 2023-12-22 is 1 Dey 1402.
        assert_eq!(gregorian_to_jalali(2023, 12, 22), (1402, 10, 1));
    }

    #[test]
    fn test_format_timestamp_gregorian() {
        let millis = NOWRUZ_1403 + (14 * 60 + 5) * 60 * 1000;
        assert_eq!(
            format_timestamp(millis, DateStyle::Gregorian),
            "2024/03/20 14:05"
        );
    }

    #[test]
    fn test_format_timestamp_jalali() {
        assert_eq!(
            format_timestamp(NOWRUZ_1403, DateStyle::Jalali),
            "1403/01/01 00:00"
        );
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(i64::MAX, DateStyle::Jalali), i64::MAX.to_string());
    }

    #[test]
    fn test_date_style_parse() {
        assert_eq!("Jalali".parse::<DateStyle>().ok(), Some(DateStyle::Jalali));
        assert_eq!(
            "gregorian".parse::<DateStyle>().ok(),
            Some(DateStyle::Gregorian)
        );
        assert!("lunar".parse::<DateStyle>().is_err());
    }
}
