#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::unreadable_literal)]

//! Row normalization for raw collision CSV data.
//!
//! Converts one delimited row into a validated [`CollisionRecord`] or a
//! classified [`RowError`]. Failures are values, never panics — the loader
//! tallies them and moves on to the next row.

pub mod parsing;

use collision_stats_collision_models::{CollisionRecord, ValidationPolicy};

/// Number of leading columns a row must have to be normalized. Columns past
/// this index are ignored.
pub const COLUMN_COUNT: usize = 18;

/// Column index of the crash date (`MM/DD/YYYY`).
pub const COL_CRASH_DATE: usize = 0;

/// Column index of the crash time (`H:MM` or `HH:MM`).
pub const COL_CRASH_TIME: usize = 1;

/// Column index of the first of the eight count columns. Columns 2-9
/// (borough, zip code, coordinates, street names) sit between the time and
/// the counts and are read positionally but never interpreted.
pub const COL_FIRST_COUNT: usize = 10;

/// Count column names, in positional order, used for diagnostics.
pub const COUNT_COLUMNS: [&str; 8] = [
    "persons_injured",
    "persons_killed",
    "pedestrians_injured",
    "pedestrians_killed",
    "cyclists_injured",
    "cyclists_killed",
    "motorists_injured",
    "motorists_killed",
];

/// Why a row was dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// The row has fewer delimited fields than the fixed schema requires.
    #[error("row has {found} columns, expected at least 18")]
    MissingColumns {
        /// Number of columns actually present.
        found: usize,
    },

    /// The crash date field was empty.
    #[error("missing crash date")]
    EmptyDate,

    /// The crash date did not reduce to 8 digits in `MM/DD/YYYY` order.
    #[error("invalid crash date {value:?}: expected MM/DD/YYYY")]
    BadDate {
        /// The raw field text.
        value: String,
    },

    /// The crash time field was empty.
    #[error("missing crash time")]
    EmptyTime,

    /// The crash time did not reduce to 4 digits in `H:MM`/`HH:MM` order.
    #[error("invalid crash time {value:?}: expected H:MM or HH:MM")]
    BadTime {
        /// The raw field text.
        value: String,
    },

    /// A non-empty count field was not a non-negative integer.
    #[error("invalid {column} count {value:?}")]
    BadCount {
        /// Name of the offending count column.
        column: &'static str,
        /// The raw field text.
        value: String,
    },

    /// A date or time component fell outside calendar bounds. Only produced
    /// under [`ValidationPolicy::Strict`].
    #[error("{component} {value} outside calendar bounds")]
    CalendarBounds {
        /// Which component was out of range (`"month"`, `"hour"`, ...).
        component: &'static str,
        /// The offending numeric value.
        value: u32,
    },
}

/// Normalizes one raw delimited row into a [`CollisionRecord`].
///
/// The row is consumed positionally: date, time, eight skipped columns,
/// then the eight injury/fatality counts. Empty count fields default to
/// zero. Trailing columns beyond the first 18 are ignored.
///
/// # Errors
///
/// Returns a [`RowError`] describing the first violation encountered; the
/// caller drops the row and continues.
pub fn normalize_row(
    row: &csv::StringRecord,
    policy: ValidationPolicy,
) -> Result<CollisionRecord, RowError> {
    if row.len() < COLUMN_COUNT {
        return Err(RowError::MissingColumns { found: row.len() });
    }

    let crash_date = parsing::normalize_date(&row[COL_CRASH_DATE], policy)?;
    let crash_time = parsing::normalize_time(&row[COL_CRASH_TIME], policy)?;

    let mut counts = [0_u32; 8];
    for (offset, slot) in counts.iter_mut().enumerate() {
        *slot = parsing::parse_count(&row[COL_FIRST_COUNT + offset], COUNT_COLUMNS[offset])?;
    }

    let [
        persons_injured,
        persons_killed,
        pedestrians_injured,
        pedestrians_killed,
        cyclists_injured,
        cyclists_killed,
        motorists_injured,
        motorists_killed,
    ] = counts;

    Ok(CollisionRecord {
        crash_date,
        crash_time,
        persons_injured,
        persons_killed,
        pedestrians_injured,
        pedestrians_killed,
        cyclists_injured,
        cyclists_killed,
        motorists_injured,
        motorists_killed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    fn full_row(date: &str, time: &str, counts: &[&str; 8]) -> csv::StringRecord {
        let mut fields = vec![date, time];
        fields.extend(["", "", "", "", "", "", "", ""]);
        fields.extend(counts.iter().copied());
        row(&fields)
    }

    #[test]
    fn normalizes_complete_row() {
        let rec = normalize_row(
            &full_row(
                "03/04/2021",
                "7:05",
                &["2", "0", "1", "0", "0", "0", "1", "0"],
            ),
            ValidationPolicy::Lenient,
        )
        .unwrap();

        assert_eq!(rec.crash_date, 20210304);
        assert_eq!(rec.crash_time, 705);
        assert_eq!(rec.persons_injured, 2);
        assert_eq!(rec.pedestrians_injured, 1);
        assert_eq!(rec.motorists_injured, 1);
        assert_eq!(rec.motorists_killed, 0);
    }

    #[test]
    fn empty_count_fields_default_to_zero() {
        let rec = normalize_row(
            &full_row("01/01/2023", "0:00", &["", "", "", "", "", "", "", ""]),
            ValidationPolicy::Lenient,
        )
        .unwrap();

        assert_eq!(rec.persons_injured, 0);
        assert_eq!(rec.persons_killed, 0);
        assert_eq!(rec.cyclists_killed, 0);
    }

    #[test]
    fn short_row_is_dropped() {
        let err = normalize_row(&row(&["03/04/2021", "7:05", "x"]), ValidationPolicy::Lenient)
            .unwrap_err();
        assert_eq!(err, RowError::MissingColumns { found: 3 });
    }

    #[test]
    fn trailing_columns_are_ignored() {
        let mut fields: Vec<&str> = vec!["03/04/2021", "7:05"];
        fields.extend(["", "", "", "", "", "", "", ""]);
        fields.extend(["1", "0", "0", "0", "0", "0", "0", "0"]);
        fields.extend(["extra", "columns", "here"]);

        let rec = normalize_row(&row(&fields), ValidationPolicy::Lenient).unwrap();
        assert_eq!(rec.persons_injured, 1);
    }

    #[test]
    fn bad_count_names_the_column() {
        let err = normalize_row(
            &full_row(
                "03/04/2021",
                "7:05",
                &["2", "0", "1", "oops", "0", "0", "0", "0"],
            ),
            ValidationPolicy::Lenient,
        )
        .unwrap_err();

        assert_eq!(
            err,
            RowError::BadCount {
                column: "pedestrians_killed",
                value: "oops".to_string(),
            }
        );
    }

    #[test]
    fn skip_columns_are_never_interpreted() {
        // Garbage in the eight skipped columns must not affect the outcome.
        let mut fields: Vec<&str> = vec!["12/31/2023", "23:59"];
        fields.extend(["BROOKLYN", "11201", "40.69", "-73.99", "??", "", "1st Ave", "2nd Ave"]);
        fields.extend(["0", "0", "0", "0", "0", "0", "0", "0"]);

        let rec = normalize_row(&row(&fields), ValidationPolicy::Lenient).unwrap();
        assert_eq!(rec.crash_date, 20231231);
        assert_eq!(rec.crash_time, 2359);
    }
}
