//! report-runner: headless driver for RideWatch fraud reports.
//!
//! Usage:
//!   report-runner --db rides.db --data-dir ./data generate --window last_7_days
//!   report-runner --db rides.db list
//!   report-runner --db rides.db show <report_id>
//!   report-runner --db rides.db delete <report_id>
//!   report-runner --db rides.db purge
//!   report-runner --db rides.db load <fixture.json>

use anyhow::{bail, Result};
use chrono::Utc;
use ridewatch_core::{
    config::ReportConfig,
    generator::{ReportGenerator, ReportOutcome},
    ride::RideRecord,
    store::ReportStore,
    window::ReportWindow,
};
use std::env;

/// Flags that take a value; everything else is positional.
const VALUE_FLAGS: &[&str] = &["--db", "--data-dir", "--window"];

#[derive(serde::Deserialize)]
struct Fixture {
    #[serde(default)]
    riders: Vec<FixtureRider>,
    #[serde(default)]
    rides: Vec<RideRecord>,
}

#[derive(serde::Deserialize)]
struct FixtureRider {
    rider_id: String,
    name: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or("rides.db");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let window = flag_value(&args, "--window").unwrap_or("last_7_days");
    let positional = positional_args(&args);

    let store = ReportStore::open(db)?;
    store.migrate()?;
    log::info!("report-runner: db={db} data_dir={data_dir}");

    match positional.as_slice() {
        ["generate"] => generate(&store, data_dir, window)?,
        ["list"] => list(&store)?,
        ["show", report_id] => show(&store, report_id)?,
        ["delete", report_id] => {
            store.delete_report(report_id)?;
            println!("Deleted report {report_id}");
        }
        ["purge"] => {
            let n = store.delete_all_reports()?;
            println!("Deleted {n} reports");
        }
        ["load", path] => load(&store, path)?,
        _ => bail!(
            "usage: report-runner [--db PATH] [--data-dir DIR] [--window LABEL] \
             <generate|list|show ID|delete ID|purge|load FILE>"
        ),
    }
    Ok(())
}

fn generate(store: &ReportStore, data_dir: &str, window: &str) -> Result<()> {
    let config = ReportConfig::load(data_dir)?;
    let window: ReportWindow = window.parse()?;

    let generator = ReportGenerator::new(store, store, store, config);
    let outcome = generator.generate(&window, Utc::now())?;
    println!("{}", outcome.message());
    if let ReportOutcome::Generated(report) = &outcome {
        print_rows(report.rows());
    }
    Ok(())
}

fn list(store: &ReportStore) -> Result<()> {
    let reports = store.list_reports()?;
    if reports.is_empty() {
        println!("  (No reports generated yet)");
        return Ok(());
    }
    for r in reports {
        println!(
            "  {} | {} | {} | {} flagged",
            r.report_id,
            r.generated_at.format("%Y-%m-%d %H:%M"),
            r.window_label,
            r.flagged_count
        );
    }
    Ok(())
}

fn show(store: &ReportStore, report_id: &str) -> Result<()> {
    let report = store.get_report(report_id)?;
    println!("=== REPORT {} ===", report.report_id);
    println!("  generated: {}", report.generated_at.to_rfc3339());
    println!("  window:    {}", report.window_label);
    println!();
    print_rows(report.rows());
    Ok(())
}

fn load(store: &ReportStore, path: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
    let fixture: Fixture = serde_json::from_str(&content)?;
    for rider in &fixture.riders {
        store.upsert_rider(&rider.rider_id, &rider.name)?;
    }
    for ride in &fixture.rides {
        store.upsert_ride(ride)?;
    }
    println!(
        "Loaded {} riders and {} rides ({} rides stored)",
        fixture.riders.len(),
        fixture.rides.len(),
        store.ride_count()?
    );
    Ok(())
}

fn print_rows<'a>(rows: impl Iterator<Item = (&'a str, &'a str, &'a str)>) {
    for (name, rider_id, remark) in rows {
        println!("  {name:<24} {rider_id:<16} {remark}");
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(1) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        out.push(arg.as_str());
    }
    out
}
