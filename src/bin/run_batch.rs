//! Reconcile every case file in a directory
//!
//! Outputs one summary row per case for comparison across runs

use anyhow::{Context, Result};
use clap::Parser;
use payout_periods::{load_case, map_payout_periods, Catalog, Language, LocaleDateFormatter, PayoutSummary};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Build payout periods for a directory of case files")]
struct Cli {
    /// Directory containing *.json case files
    #[arg(long, default_value = "data/cases")]
    cases: PathBuf,

    /// Directory with catalog CSV files (built-in tables when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(long, default_value = "nb")]
    language: Language,

    /// Summary CSV to write
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,
}

/// One row of the batch summary
#[derive(Debug, Serialize)]
struct CaseRow {
    case: String,
    status: &'static str,
    periods: usize,
    approved: usize,
    denied: usize,
    benefit_from: String,
    benefit_to: String,
    lost_days: Decimal,
    lacks_care: bool,
    error: String,
}

impl CaseRow {
    fn failed(case: String, error: String) -> Self {
        Self {
            case,
            status: "error",
            periods: 0,
            approved: 0,
            denied: 0,
            benefit_from: String::new(),
            benefit_to: String::new(),
            lost_days: Decimal::ZERO,
            lacks_care: false,
            error,
        }
    }
}

fn case_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("failed to read case directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn run_case(path: &Path, catalog: &Catalog, formatter: &LocaleDateFormatter) -> CaseRow {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let case = match load_case(path) {
        Ok(case) => case,
        Err(e) => return CaseRow::failed(name, e.to_string()),
    };
    let periods = match map_payout_periods(&case, catalog, formatter) {
        Ok(periods) => periods,
        Err(e) => return CaseRow::failed(name, e.to_string()),
    };

    let summary = PayoutSummary::from_periods(&periods, catalog);
    let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

    CaseRow {
        case: name,
        status: "ok",
        periods: summary.period_count,
        approved: summary.approved_count,
        denied: summary.denied_count,
        benefit_from: date(summary.benefit_from),
        benefit_to: date(summary.benefit_to),
        lost_days: summary.total_lost_days,
        lacks_care: summary.lacks_care,
        error: String::new(),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    let catalog = match &cli.catalog {
        Some(dir) => Catalog::from_csv_path(dir)
            .with_context(|| format!("failed to load catalog from {}", dir.display()))?,
        None => Catalog::default(),
    };
    let formatter = LocaleDateFormatter::new(cli.language);

    let files = case_files(&cli.cases)?;
    println!("Loaded {} case files from {}", files.len(), cli.cases.display());

    // Cases are independent; run them in parallel
    let rows: Vec<CaseRow> = files
        .par_iter()
        .map(|path| run_case(path, &catalog, &formatter))
        .collect();

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let failed = rows.iter().filter(|row| row.status == "error").count();
    println!("Output written to {}", cli.output.display());
    println!("\nBatch Summary:");
    println!("  Cases:  {}", rows.len());
    println!("  Failed: {}", failed);
    for row in rows.iter().filter(|row| row.status == "error") {
        println!("    {}: {}", row.case, row.error);
    }
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
