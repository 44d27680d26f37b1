#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for collision data queries.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use collision_stats_collision_models::{CollisionRecord, ValidationPolicy};
use collision_stats_store::CollisionStore;

#[derive(Parser)]
#[command(name = "collision_stats_cli", about = "Collision data query tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct QueryArgs {
    /// Path to the collision CSV export
    #[arg(long)]
    file: PathBuf,
    /// Range start date, inclusive (YYYYMMDD)
    #[arg(long)]
    start: u32,
    /// Range end date, inclusive (YYYYMMDD)
    #[arg(long)]
    end: u32,
    /// Calendar validation policy applied while loading (lenient or strict)
    #[arg(long, default_value = "lenient")]
    policy: ValidationPolicy,
    /// Scan partitions per query (defaults to the CPU count)
    #[arg(long)]
    workers: Option<usize>,
    /// Emit the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sum persons injured over the date range
    Injuries(QueryArgs),
    /// Sum persons killed over the date range
    Fatalities(QueryArgs),
    /// List severe accidents (more than 5 injured or more than 1 killed)
    Severe(QueryArgs),
    /// Find the hour of day with the most accidents
    PeakHour(QueryArgs),
    /// Break injuries down by pedestrian, cyclist, and motorist
    Breakdown(QueryArgs),
    /// Find the deadliest accident on a single date
    Deadliest {
        /// Path to the collision CSV export
        #[arg(long)]
        file: PathBuf,
        /// Exact date to search (YYYYMMDD)
        #[arg(long)]
        date: u32,
        /// Calendar validation policy applied while loading (lenient or strict)
        #[arg(long, default_value = "lenient")]
        policy: ValidationPolicy,
        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load once and time the core queries
    Bench {
        #[command(flatten)]
        query: QueryArgs,
        /// Repetitions per query
        #[arg(long, default_value_t = 100)]
        runs: u32,
    },
}

fn build_store(file: &Path, policy: ValidationPolicy, workers: Option<usize>) -> CollisionStore {
    let mut store = CollisionStore::new().with_policy(policy);
    if let Some(workers) = workers {
        store = store.with_partitions(workers);
    }
    let stats = store.load_from_path(file);
    log::info!(
        "Store ready: {} records ({} rows dropped)",
        stats.loaded,
        stats.failed
    );
    store
}

fn print_severe_table(records: &[CollisionRecord]) {
    println!("{:<10} {:<6} {:>8} {:>7}", "DATE", "TIME", "INJURED", "KILLED");
    println!("{}", "-".repeat(34));
    for record in records {
        println!(
            "{:<10} {:0>4}   {:>8} {:>7}",
            record.crash_date, record.crash_time, record.persons_injured, record.persons_killed
        );
    }
    println!("{} severe accident(s)", records.len());
}

/// Times `runs` repetitions of `op` and prints the cumulative microseconds,
/// returning them for the grand total.
fn benchmark(name: &str, runs: u32, mut op: impl FnMut()) -> u128 {
    let mut total_micros: u128 = 0;
    for _ in 0..runs {
        let start = Instant::now();
        op();
        total_micros += start.elapsed().as_micros();
    }
    println!("{name}: {total_micros} \u{b5}s over {runs} runs");
    total_micros
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Injuries(args) => {
            let store = build_store(&args.file, args.policy, args.workers);
            let total = store.total_injuries(args.start, args.end);
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "totalInjuries": total }))?
                );
            } else {
                println!("Total injuries: {total}");
            }
        }
        Commands::Fatalities(args) => {
            let store = build_store(&args.file, args.policy, args.workers);
            let total = store.total_fatalities(args.start, args.end);
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "totalFatalities": total }))?
                );
            } else {
                println!("Total fatalities: {total}");
            }
        }
        Commands::Severe(args) => {
            let store = build_store(&args.file, args.policy, args.workers);
            let records = store.severe_accidents(args.start, args.end);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_severe_table(&records);
            }
        }
        Commands::PeakHour(args) => {
            let store = build_store(&args.file, args.policy, args.workers);
            let peak = store.peak_accident_hour(args.start, args.end);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&peak)?);
            } else {
                println!(
                    "Peak accident hour: {:02}:00 with {} accident(s)",
                    peak.hour, peak.count
                );
            }
        }
        Commands::Breakdown(args) => {
            let store = build_store(&args.file, args.policy, args.workers);
            let breakdown = store.injury_breakdown(args.start, args.end);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                println!("Pedestrians injured: {}", breakdown.pedestrians);
                println!("Cyclists injured:    {}", breakdown.cyclists);
                println!("Motorists injured:   {}", breakdown.motorists);
            }
        }
        Commands::Deadliest {
            file,
            date,
            policy,
            json,
        } => {
            let store = build_store(&file, policy, None);
            match store.deadliest_accident_on(date) {
                Some(record) if json => println!("{}", serde_json::to_string_pretty(&record)?),
                Some(record) => println!(
                    "Deadliest accident on {date}: {:0>4} with {} killed, {} injured",
                    record.crash_time, record.persons_killed, record.persons_injured
                ),
                None if json => println!("null"),
                None => println!("No accidents recorded on {date}"),
            }
        }
        Commands::Bench { query, runs } => {
            let store = build_store(&query.file, query.policy, query.workers);
            let (start, end) = (query.start, query.end);

            println!("================== Performance Benchmark ==================");
            let mut total = benchmark("Total injuries", runs, || {
                let _ = store.total_injuries(start, end);
            });
            total += benchmark("Total fatalities", runs, || {
                let _ = store.total_fatalities(start, end);
            });
            total += benchmark("Severe accidents", runs, || {
                let _ = store.severe_accidents(start, end);
            });
            total += benchmark("Peak accident hour", runs, || {
                let _ = store.peak_accident_hour(start, end);
            });
            println!("All queries: {total} \u{b5}s over {runs} runs");
            println!("===========================================================");
        }
    }

    Ok(())
}
