//! Range-filtered aggregation over the record sequence.
//!
//! Every operation is one linear pass over the full sequence with an
//! inclusive date-range predicate. The pass is split into disjoint
//! partitions scanned by rayon workers that run to completion before the
//! call returns; each operation defines its own merge step:
//!
//! - sums accumulate partition-locally and merge by addition, so the
//!   result is independent of partition count and worker interleaving;
//! - filter-collects buffer matches partition-locally and splice them into
//!   the shared result under a mutex — output order is unspecified for
//!   more than one partition;
//! - the hour histogram increments shared atomic buckets, then a
//!   single-threaded ascending scan picks the peak.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use collision_stats_collision_models::{CollisionRecord, InjuryBreakdown, PeakHour};
use rayon::prelude::*;

use crate::CollisionStore;

/// Number of hour-of-day buckets in the peak-hour histogram.
const HOUR_BUCKETS: usize = 24;

impl CollisionStore {
    /// Partition-local sum of `field` over records matching the range,
    /// merged by addition.
    fn sum_over<F>(&self, start_date: u32, end_date: u32, field: F) -> u64
    where
        F: Fn(&CollisionRecord) -> u64 + Sync,
    {
        self.records
            .par_chunks(self.partition_len())
            .map(|chunk| {
                chunk
                    .iter()
                    .filter(|r| r.in_range(start_date, end_date))
                    .map(&field)
                    .sum::<u64>()
            })
            .sum()
    }

    /// Copies of every record matching `predicate`. Each worker collects
    /// into a partition-local buffer, then splices it into the shared
    /// result inside the mutex so no two workers write it concurrently.
    fn filter_collect<P>(&self, predicate: P) -> Vec<CollisionRecord>
    where
        P: Fn(&CollisionRecord) -> bool + Sync,
    {
        let matches = Mutex::new(Vec::new());

        self.records
            .par_chunks(self.partition_len())
            .for_each(|chunk| {
                let local: Vec<CollisionRecord> =
                    chunk.iter().filter(|r| predicate(r)).cloned().collect();
                if !local.is_empty() {
                    matches
                        .lock()
                        .expect("partition merge lock poisoned")
                        .extend(local);
                }
            });

        matches
            .into_inner()
            .expect("partition merge lock poisoned")
    }

    /// Sum of `persons_injured` over records in the inclusive date range.
    /// Zero for an empty store or a range matching nothing.
    #[must_use]
    pub fn total_injuries(&self, start_date: u32, end_date: u32) -> u64 {
        self.sum_over(start_date, end_date, |r| u64::from(r.persons_injured))
    }

    /// Sum of `persons_killed` over records in the inclusive date range.
    /// Zero for an empty store or a range matching nothing.
    #[must_use]
    pub fn total_fatalities(&self, start_date: u32, end_date: u32) -> u64 {
        self.sum_over(start_date, end_date, |r| u64::from(r.persons_killed))
    }

    /// Copies of every severe accident in the inclusive date range.
    ///
    /// Result order is unspecified when the store scans more than one
    /// partition; with one partition it matches source-row order.
    #[must_use]
    pub fn severe_accidents(&self, start_date: u32, end_date: u32) -> Vec<CollisionRecord> {
        self.filter_collect(|r| r.in_range(start_date, end_date) && r.is_severe())
    }

    /// Copies of every record in the inclusive date range, under the same
    /// order contract as [`Self::severe_accidents`].
    #[must_use]
    pub fn records_in_range(&self, start_date: u32, end_date: u32) -> Vec<CollisionRecord> {
        self.filter_collect(|r| r.in_range(start_date, end_date))
    }

    /// Injured-person totals for the range broken down by traveler class,
    /// accumulated partition-locally in one pass and merged field-wise.
    #[must_use]
    pub fn injury_breakdown(&self, start_date: u32, end_date: u32) -> InjuryBreakdown {
        self.records
            .par_chunks(self.partition_len())
            .map(|chunk| {
                let mut local = InjuryBreakdown::default();
                for r in chunk.iter().filter(|r| r.in_range(start_date, end_date)) {
                    local.pedestrians += u64::from(r.pedestrians_injured);
                    local.cyclists += u64::from(r.cyclists_injured);
                    local.motorists += u64::from(r.motorists_injured);
                }
                local
            })
            .reduce(InjuryBreakdown::default, InjuryBreakdown::merge)
    }

    /// The hour of day (0-23) with the most records in the inclusive date
    /// range, paired with its count.
    ///
    /// Workers bump shared atomic buckets; the peak is then chosen by a
    /// deterministic ascending scan with strict-greater replacement, so the
    /// earliest hour wins ties. An empty match set yields hour 0, count 0.
    /// Records whose lenient `crash_time` encodes an hour of 24 or more
    /// match the range but land in no bucket.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn peak_accident_hour(&self, start_date: u32, end_date: u32) -> PeakHour {
        let buckets: [AtomicU64; HOUR_BUCKETS] = std::array::from_fn(|_| AtomicU64::new(0));

        self.records
            .par_chunks(self.partition_len())
            .for_each(|chunk| {
                for record in chunk.iter().filter(|r| r.in_range(start_date, end_date)) {
                    if let Some(bucket) = buckets.get(record.hour_of_day() as usize) {
                        bucket.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });

        let mut peak = PeakHour::default();
        for (hour, bucket) in buckets.iter().enumerate() {
            let count = bucket.load(Ordering::Relaxed);
            if count > peak.count {
                peak = PeakHour {
                    hour: hour as u32,
                    count,
                };
            }
        }
        peak
    }

    /// The record with the most `persons_killed` on an exact date, chosen
    /// by a deterministic left-to-right scan with strict-greater
    /// replacement (the first maximum wins). `None` when no record carries
    /// that date.
    #[must_use]
    pub fn deadliest_accident_on(&self, date: u32) -> Option<CollisionRecord> {
        let mut deadliest: Option<&CollisionRecord> = None;
        for record in self.records.iter().filter(|r| r.crash_date == date) {
            if deadliest.is_none_or(|best| record.persons_killed > best.persons_killed) {
                deadliest = Some(record);
            }
        }
        deadliest.cloned()
    }
}
