//! Date, time, and count field normalization.
//!
//! The upstream export encodes dates as `MM/DD/YYYY` and times as `H:MM` or
//! `HH:MM`; both are re-encoded as plain integers (`YYYYMMDD` / `HHMM`) so
//! range predicates stay integer comparisons.

use collision_stats_collision_models::ValidationPolicy;

use crate::RowError;

/// Separator character in raw date fields.
pub const DATE_SEPARATOR: char = '/';

/// Separator character in raw time fields.
pub const TIME_SEPARATOR: char = ':';

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Re-encodes a raw `MM/DD/YYYY` date as a `YYYYMMDD` integer.
///
/// Single-digit month and day segments are left-padded with a zero, the same
/// way single-digit hours are in [`normalize_time`], so `3/4/2021` and
/// `03/04/2021` normalize identically. A separator-free field must already
/// be exactly 8 digits in `MMDDYYYY` order.
///
/// Under [`ValidationPolicy::Lenient`] the digit shape is the only check:
/// `13/45/2021` is accepted as `20211345`. [`ValidationPolicy::Strict`]
/// additionally requires month 1-12 and day 1-31.
///
/// # Errors
///
/// Returns [`RowError::EmptyDate`] for an empty field and
/// [`RowError::BadDate`] when the field does not reduce to 8 digits;
/// strict mode adds [`RowError::CalendarBounds`].
pub fn normalize_date(raw: &str, policy: ValidationPolicy) -> Result<u32, RowError> {
    if raw.is_empty() {
        return Err(RowError::EmptyDate);
    }
    let bad = || RowError::BadDate {
        value: raw.to_string(),
    };

    let (month_part, day_part, year_part) = if raw.contains(DATE_SEPARATOR) {
        let mut parts = raw.split(DATE_SEPARATOR);
        let (Some(month), Some(day), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(bad());
        };
        (month, day, year)
    } else {
        if raw.len() != 8 || !is_digits(raw) {
            return Err(bad());
        }
        (&raw[0..2], &raw[2..4], &raw[4..8])
    };

    if month_part.len() > 2 || day_part.len() > 2 || year_part.len() != 4 {
        return Err(bad());
    }
    if !is_digits(month_part) || !is_digits(day_part) || !is_digits(year_part) {
        return Err(bad());
    }

    let month: u32 = month_part.parse().map_err(|_| bad())?;
    let day: u32 = day_part.parse().map_err(|_| bad())?;
    let year: u32 = year_part.parse().map_err(|_| bad())?;

    if policy == ValidationPolicy::Strict {
        if !(1..=12).contains(&month) {
            return Err(RowError::CalendarBounds {
                component: "month",
                value: month,
            });
        }
        if !(1..=31).contains(&day) {
            return Err(RowError::CalendarBounds {
                component: "day",
                value: day,
            });
        }
    }

    Ok(year * 10_000 + month * 100 + day)
}

/// Re-encodes a raw `H:MM`/`HH:MM` time as an `HHMM` integer.
///
/// A single-digit hour (separator at the second character) is left-padded
/// with a zero before the separator is stripped; the result must be exactly
/// 4 digits. [`ValidationPolicy::Strict`] additionally requires hour 0-23
/// and minute 0-59.
///
/// # Errors
///
/// Returns [`RowError::EmptyTime`] for an empty field and
/// [`RowError::BadTime`] when the separator is missing, the field is
/// shorter than 3 characters, or the stripped result is not 4 digits;
/// strict mode adds [`RowError::CalendarBounds`].
pub fn normalize_time(raw: &str, policy: ValidationPolicy) -> Result<u32, RowError> {
    if raw.is_empty() {
        return Err(RowError::EmptyTime);
    }
    let bad = || RowError::BadTime {
        value: raw.to_string(),
    };

    let Some(separator_at) = raw.find(TIME_SEPARATOR) else {
        return Err(bad());
    };
    if raw.len() < 3 {
        return Err(bad());
    }

    let mut digits = String::with_capacity(4);
    if separator_at == 1 {
        digits.push('0');
    }
    digits.extend(raw.chars().filter(|&c| c != TIME_SEPARATOR));

    if digits.len() != 4 || !is_digits(&digits) {
        return Err(bad());
    }

    let hour: u32 = digits[0..2].parse().map_err(|_| bad())?;
    let minute: u32 = digits[2..4].parse().map_err(|_| bad())?;

    if policy == ValidationPolicy::Strict {
        if hour > 23 {
            return Err(RowError::CalendarBounds {
                component: "hour",
                value: hour,
            });
        }
        if minute > 59 {
            return Err(RowError::CalendarBounds {
                component: "minute",
                value: minute,
            });
        }
    }

    Ok(hour * 100 + minute)
}

/// Parses one count field. Empty maps to zero; anything else must be a
/// non-negative integer.
///
/// # Errors
///
/// Returns [`RowError::BadCount`] naming the column when the field is
/// non-empty and not a non-negative integer.
pub fn parse_count(raw: &str, column: &'static str) -> Result<u32, RowError> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(|_| RowError::BadCount {
        column,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorders_date_to_yyyymmdd() {
        assert_eq!(
            normalize_date("03/04/2021", ValidationPolicy::Lenient).unwrap(),
            20210304
        );
        assert_eq!(
            normalize_date("12/31/2023", ValidationPolicy::Lenient).unwrap(),
            20231231
        );
    }

    #[test]
    fn pads_single_digit_month_and_day() {
        assert_eq!(
            normalize_date("3/4/2021", ValidationPolicy::Lenient).unwrap(),
            20210304
        );
    }

    #[test]
    fn accepts_separator_free_eight_digit_date() {
        assert_eq!(
            normalize_date("03042021", ValidationPolicy::Lenient).unwrap(),
            20210304
        );
    }

    #[test]
    fn lenient_accepts_impossible_calendar_values() {
        // Digit-shape validation only; the dataset is taken as-is.
        assert_eq!(
            normalize_date("13/45/2021", ValidationPolicy::Lenient).unwrap(),
            20211345
        );
    }

    #[test]
    fn strict_rejects_impossible_calendar_values() {
        assert_eq!(
            normalize_date("13/45/2021", ValidationPolicy::Strict).unwrap_err(),
            RowError::CalendarBounds {
                component: "month",
                value: 13,
            }
        );
        assert_eq!(
            normalize_date("12/45/2021", ValidationPolicy::Strict).unwrap_err(),
            RowError::CalendarBounds {
                component: "day",
                value: 45,
            }
        );
        assert_eq!(
            normalize_date("12/31/2021", ValidationPolicy::Strict).unwrap(),
            20211231
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(
            normalize_date("", ValidationPolicy::Lenient).unwrap_err(),
            RowError::EmptyDate
        );
        assert!(normalize_date("3/4/21", ValidationPolicy::Lenient).is_err());
        assert!(normalize_date("2021-03-04", ValidationPolicy::Lenient).is_err());
        assert!(normalize_date("03/04/2021/9", ValidationPolicy::Lenient).is_err());
        assert!(normalize_date("aa/bb/cccc", ValidationPolicy::Lenient).is_err());
        assert!(normalize_date("0304221", ValidationPolicy::Lenient).is_err());
    }

    #[test]
    fn pads_single_digit_hour() {
        assert_eq!(normalize_time("7:05", ValidationPolicy::Lenient).unwrap(), 705);
        assert_eq!(
            normalize_time("07:05", ValidationPolicy::Lenient).unwrap(),
            705
        );
        assert_eq!(normalize_time("0:00", ValidationPolicy::Lenient).unwrap(), 0);
        assert_eq!(
            normalize_time("23:59", ValidationPolicy::Lenient).unwrap(),
            2359
        );
    }

    #[test]
    fn lenient_accepts_out_of_range_time() {
        assert_eq!(
            normalize_time("99:99", ValidationPolicy::Lenient).unwrap(),
            9999
        );
    }

    #[test]
    fn strict_rejects_out_of_range_time() {
        assert_eq!(
            normalize_time("24:00", ValidationPolicy::Strict).unwrap_err(),
            RowError::CalendarBounds {
                component: "hour",
                value: 24,
            }
        );
        assert_eq!(
            normalize_time("23:60", ValidationPolicy::Strict).unwrap_err(),
            RowError::CalendarBounds {
                component: "minute",
                value: 60,
            }
        );
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(
            normalize_time("", ValidationPolicy::Lenient).unwrap_err(),
            RowError::EmptyTime
        );
        assert!(normalize_time("705", ValidationPolicy::Lenient).is_err());
        assert!(normalize_time("7:5", ValidationPolicy::Lenient).is_err());
        assert!(normalize_time(":05", ValidationPolicy::Lenient).is_err());
        assert!(normalize_time("7:", ValidationPolicy::Lenient).is_err());
        assert!(normalize_time("12:345", ValidationPolicy::Lenient).is_err());
    }

    #[test]
    fn empty_count_is_zero() {
        assert_eq!(parse_count("", "persons_injured").unwrap(), 0);
    }

    #[test]
    fn numeric_count_parses() {
        assert_eq!(parse_count("7", "persons_injured").unwrap(), 7);
        assert_eq!(parse_count("0", "persons_killed").unwrap(), 0);
    }

    #[test]
    fn non_numeric_count_fails() {
        assert!(parse_count("abc", "persons_injured").is_err());
        assert!(parse_count("-1", "persons_injured").is_err());
        assert!(parse_count("2.0", "persons_injured").is_err());
        assert!(parse_count(" 3", "persons_injured").is_err());
    }
}
