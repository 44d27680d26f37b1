#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::unreadable_literal)]

//! In-memory collision store and parallel range-query engine.
//!
//! The store owns an ordered sequence of normalized records, built once by
//! bulk load and read many times by queries. The store never parses field
//! text itself — every row goes through [`collision_stats_source`], and rows
//! that fail normalization are tallied and dropped. Queries are single
//! linear passes over the full sequence; see [`query`] for the partitioned
//! execution strategy.

pub mod query;

use std::fs::File;
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Instant;

use collision_stats_collision_models::{CollisionRecord, LoadStats, ValidationPolicy};
use collision_stats_source::normalize_row;

/// An ordered, load-once sequence of [`CollisionRecord`]s.
///
/// Insertion order is source-row order. Callers receive copies or derived
/// aggregates, never mutable access to the stored records.
#[derive(Debug)]
pub struct CollisionStore {
    records: Vec<CollisionRecord>,
    policy: ValidationPolicy,
    partitions: usize,
}

impl Default for CollisionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionStore {
    /// Creates an empty store with the lenient validation policy and one
    /// scan partition per available CPU.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            policy: ValidationPolicy::default(),
            partitions: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }

    /// Sets the calendar validation policy applied to subsequently loaded
    /// rows.
    #[must_use]
    pub const fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the number of disjoint partitions each query scan is split
    /// into. Clamped to a minimum of 1; with 1 partition every query runs
    /// single-threaded and filter-collect results keep source order.
    #[must_use]
    pub const fn with_partitions(mut self, partitions: usize) -> Self {
        self.partitions = if partitions == 0 { 1 } else { partitions };
        self
    }

    /// Number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only view of the stored records, in source-row order.
    #[must_use]
    pub fn records(&self) -> &[CollisionRecord] {
        &self.records
    }

    /// Records per scan partition for the current store size.
    pub(crate) fn partition_len(&self) -> usize {
        let len = self.records.len().div_ceil(self.partitions);
        if len == 0 { 1 } else { len }
    }

    /// Bulk-loads a collision CSV export from disk, appending every row
    /// that normalizes cleanly.
    ///
    /// An unopenable path is not an error: it is reported with a single
    /// diagnostic and the load completes with zero records.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> LoadStats {
        let path = path.as_ref();
        log::info!("Loading collision data from {}", path.display());

        match File::open(path) {
            Ok(file) => self.load_from_reader(file),
            Err(e) => {
                log::error!("Unable to open {}: {e}", path.display());
                LoadStats::default()
            }
        }
    }

    /// Bulk-loads collision rows from any readable source.
    ///
    /// The first line is consumed as the header. Every subsequent row is
    /// normalized under the store's policy; rows that fail — malformed
    /// date or time, non-numeric counts, too few columns, unreadable text —
    /// are dropped and tallied, never fatal.
    pub fn load_from_reader(&mut self, reader: impl Read) -> LoadStats {
        let start = Instant::now();
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut stats = LoadStats::default();
        for row in csv_reader.records() {
            match row {
                Ok(row) => match normalize_row(&row, self.policy) {
                    Ok(record) => {
                        self.records.push(record);
                        stats.loaded += 1;
                    }
                    Err(e) => {
                        stats.failed += 1;
                        log::debug!("Dropped row {}: {e}", stats.loaded + stats.failed);
                    }
                },
                Err(e) => {
                    stats.failed += 1;
                    log::debug!("Unreadable row: {e}");
                }
            }
        }

        log::info!(
            "Loaded {} records ({} rows dropped) in {:.1}s",
            stats.loaded,
            stats.failed,
            start.elapsed().as_secs_f64()
        );
        stats
    }
}
