//! Payout Periods CLI
//!
//! Reconciles the timelines of one case file and prints the letter's payout table

use anyhow::{Context, Result};
use clap::Parser;
use payout_periods::payout::collect_natural_benefit_notices;
use payout_periods::timeline::loader::DEFAULT_CASE_PATH;
use payout_periods::{
    load_case, map_payout_periods, Catalog, DateFormatter, Language, LocaleDateFormatter, PayoutPeriod,
    PayoutSummary,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "payout_periods",
    about = "Build the merged payout periods for a parental-benefit case",
    version
)]
struct Cli {
    /// Case file with awarded, outcome and basis timelines
    #[arg(long, default_value = DEFAULT_CASE_PATH)]
    case: PathBuf,

    /// Directory with catalog CSV files (built-in tables when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Letter language: nb, nn or en
    #[arg(long, default_value = "nb")]
    language: Language,

    /// Print the periods as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(dir) => Catalog::from_csv_path(dir)
            .with_context(|| format!("failed to load catalog from {}", dir.display()))?,
        None => Catalog::default(),
    };
    let formatter = LocaleDateFormatter::new(cli.language);

    let case = load_case(&cli.case).with_context(|| format!("failed to load case {}", cli.case.display()))?;
    let periods = map_payout_periods(&case, &catalog, &formatter).context("failed to reconcile timelines")?;
    let summary = PayoutSummary::from_periods(&periods, &catalog);
    let notices = collect_natural_benefit_notices(&case.awarded, &case.basis, &catalog, &formatter)
        .context("failed to collect natural-benefit changes")?;

    if cli.json {
        let output = serde_json::json!({
            "periods": periods,
            "summary": summary,
            "natural_benefits": notices,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Payout Periods v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!("Case: {}", cli.case.display());
    println!();

    print_table(&periods);

    println!("\nSummary:");
    match (summary.benefit_from, summary.benefit_to) {
        (Some(from), Some(to)) => println!(
            "  Benefit period: {} - {}",
            formatter.format_date(from),
            formatter.format_date(to)
        ),
        _ => println!("  Benefit period: none approved"),
    }
    println!(
        "  Periods: {} ({} approved, {} denied)",
        summary.period_count, summary.approved_count, summary.denied_count
    );
    println!("  Lost days: {}", summary.total_lost_days);
    if summary.lacks_care {
        println!("  Includes periods denied for lack of care");
    }

    if !notices.is_empty() {
        println!("\nNatural-benefit changes:");
        for notice in &notices {
            println!(
                "  {:<24} {:?} from {} (new daily rate {})",
                notice.employer_name, notice.event.change, notice.event.date_text, notice.event.new_daily_rate
            );
        }
    }

    Ok(())
}

fn print_table(periods: &[PayoutPeriod]) {
    println!(
        "{:>10} {:>10} {:>8} {:>6} {:>9} {:>10} {:>6} {:<18}",
        "From", "To", "Approved", "Reason", "LostDays", "DailyRate", "Pct", "Account"
    );
    println!("{}", "-".repeat(86));

    for period in periods {
        let daily_rate = period
            .daily_rate
            .map(|rate| rate.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>10} {:>10} {:>8} {:>6} {:>9} {:>10} {:>6} {:<18}",
            period.from.to_string(),
            period.to.to_string(),
            if period.approved { "yes" } else { "no" },
            period.reason.as_str(),
            period.lost_days_fraction.to_string(),
            daily_rate,
            period.prioritized_payout_percentage.value().to_string(),
            format!("{:?}", period.account),
        );
    }
}
