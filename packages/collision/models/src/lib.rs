#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::unreadable_literal)]

//! Collision record value types and aggregate result definitions.
//!
//! This crate defines the canonical normalized collision record shared
//! across the collision-stats system, along with the small result types
//! produced by bulk loading and by the range queries.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A record is severe when more than this many persons were injured.
pub const SEVERE_INJURY_THRESHOLD: u32 = 5;

/// A record is severe when more than this many persons were killed.
pub const SEVERE_FATALITY_THRESHOLD: u32 = 1;

/// One normalized collision observation.
///
/// Every field is present and numeric once a record exists; rows that fail
/// normalization are never constructed. Immutable after construction —
/// queries hand out copies, never references into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionRecord {
    /// Crash date as a `YYYYMMDD` integer (e.g. `20230415`).
    pub crash_date: u32,
    /// Crash time as an `HHMM` integer (e.g. `0705`).
    pub crash_time: u32,
    /// Total persons injured.
    pub persons_injured: u32,
    /// Total persons killed.
    pub persons_killed: u32,
    /// Pedestrians injured.
    pub pedestrians_injured: u32,
    /// Pedestrians killed.
    pub pedestrians_killed: u32,
    /// Cyclists injured.
    pub cyclists_injured: u32,
    /// Cyclists killed.
    pub cyclists_killed: u32,
    /// Motorists injured.
    pub motorists_injured: u32,
    /// Motorists killed.
    pub motorists_killed: u32,
}

impl CollisionRecord {
    /// Returns `true` when this record counts as a severe accident:
    /// more than [`SEVERE_INJURY_THRESHOLD`] persons injured or more than
    /// [`SEVERE_FATALITY_THRESHOLD`] persons killed.
    #[must_use]
    pub const fn is_severe(&self) -> bool {
        self.persons_injured > SEVERE_INJURY_THRESHOLD
            || self.persons_killed > SEVERE_FATALITY_THRESHOLD
    }

    /// Returns the hour-of-day bucket for this record, derived from the
    /// `HHMM` encoding. Values of `crash_time` at or above `2400` (possible
    /// under lenient normalization) yield hours at or above 24 and fall
    /// outside the histogram's bucket range.
    #[must_use]
    pub const fn hour_of_day(&self) -> u32 {
        self.crash_time / 100
    }

    /// Returns `true` when `crash_date` falls within the inclusive range
    /// `[start_date, end_date]`.
    #[must_use]
    pub const fn in_range(&self, start_date: u32, end_date: u32) -> bool {
        self.crash_date >= start_date && self.crash_date <= end_date
    }
}

/// Calendar validation policy applied during record normalization.
///
/// The upstream dataset contains structurally valid but semantically
/// impossible dates and times. Lenient mode accepts them as-is (digit-shape
/// checks only); strict mode rejects rows whose components fall outside
/// calendar bounds.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ValidationPolicy {
    /// Accept any 8-digit date and 4-digit time without range checks.
    #[default]
    Lenient,
    /// Additionally require month 1-12, day 1-31, hour 0-23, minute 0-59.
    Strict,
}

/// Outcome of a bulk load: how many rows became records and how many were
/// dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStats {
    /// Rows successfully normalized and appended to the store.
    pub loaded: u64,
    /// Rows dropped due to a parse failure or malformed shape.
    pub failed: u64,
}

/// The hour-of-day bucket with the most matching records, paired with its
/// count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHour {
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Number of matching records in that hour.
    pub count: u64,
}

/// Injured-person totals broken down by traveler class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryBreakdown {
    /// Pedestrians injured across matching records.
    pub pedestrians: u64,
    /// Cyclists injured across matching records.
    pub cyclists: u64,
    /// Motorists injured across matching records.
    pub motorists: u64,
}

impl InjuryBreakdown {
    /// Field-wise sum of two breakdowns. Associative and commutative, so
    /// partition merge order never changes the result.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            pedestrians: self.pedestrians + other.pedestrians,
            cyclists: self.cyclists + other.cyclists,
            motorists: self.motorists + other.motorists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: u32, time: u32, injured: u32, killed: u32) -> CollisionRecord {
        CollisionRecord {
            crash_date: date,
            crash_time: time,
            persons_injured: injured,
            persons_killed: killed,
            pedestrians_injured: 0,
            pedestrians_killed: 0,
            cyclists_injured: 0,
            cyclists_killed: 0,
            motorists_injured: 0,
            motorists_killed: 0,
        }
    }

    #[test]
    fn severity_requires_strictly_greater_counts() {
        assert!(!record(20230101, 1200, 5, 0).is_severe());
        assert!(record(20230101, 1200, 6, 0).is_severe());
        assert!(!record(20230101, 1200, 0, 1).is_severe());
        assert!(record(20230101, 1200, 0, 2).is_severe());
    }

    #[test]
    fn hour_of_day_truncates_minutes() {
        assert_eq!(record(20230101, 705, 0, 0).hour_of_day(), 7);
        assert_eq!(record(20230101, 2359, 0, 0).hour_of_day(), 23);
        assert_eq!(record(20230101, 0, 0, 0).hour_of_day(), 0);
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let rec = record(20230601, 1200, 0, 0);
        assert!(rec.in_range(20230601, 20230601));
        assert!(rec.in_range(20230101, 20230601));
        assert!(rec.in_range(20230601, 20231231));
        assert!(!rec.in_range(20230602, 20231231));
        assert!(!rec.in_range(20230101, 20230531));
    }

    #[test]
    fn breakdown_merge_is_field_wise() {
        let a = InjuryBreakdown {
            pedestrians: 1,
            cyclists: 2,
            motorists: 3,
        };
        let b = InjuryBreakdown {
            pedestrians: 10,
            cyclists: 20,
            motorists: 30,
        };
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(b).motorists, 33);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(
            "lenient".parse::<ValidationPolicy>().unwrap(),
            ValidationPolicy::Lenient
        );
        assert_eq!(
            "STRICT".parse::<ValidationPolicy>().unwrap(),
            ValidationPolicy::Strict
        );
        assert!("fuzzy".parse::<ValidationPolicy>().is_err());
    }
}
