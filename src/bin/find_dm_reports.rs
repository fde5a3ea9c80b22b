// FIND Data Management Report Creator
//
// Usage: find_dm_reports --report "DM Ready" [--config config.json] [--data-dir DIR]

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use find_dm_reports::{pipeline, Exporter, GeoJsonDirectory, ReportConfig, ReportType};

#[derive(Parser)]
#[command(name = "find_dm_reports")]
#[command(about = "Creates FIND data management status reports")]
#[command(version)]
struct Args {
    /// Report to run: DM Pending, DM Ready, DM Biologist, DM Reviewer, DM Total or DM All
    #[arg(short, long, required_unless_present = "list")]
    report: Option<String>,

    /// List the available reports and exit
    #[arg(long)]
    list: bool,

    /// JSON configuration overriding the built-in rosters and paths
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the <collection>.geojson files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// County boundary layer (GeoJSON)
    #[arg(long)]
    counties: Option<PathBuf>,

    /// Taxonomy lookup table (CSV)
    #[arg(long)]
    taxonomy: Option<PathBuf>,

    /// Root directory for report files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Date stamped into filenames (YYYY-MM-DD, default today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "find_dm_reports=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if args.list {
        for report in ReportType::INDIVIDUAL.iter().chain([&ReportType::DmAll]) {
            println!("{:<13} {}", report.label(), report.description());
        }
        return Ok(());
    }

    let report: ReportType = args
        .report
        .as_deref()
        .context("--report is required")?
        .parse()?;

    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(path) = args.counties {
        config.counties_path = path;
    }
    if let Some(path) = args.taxonomy {
        config.taxonomy_path = path;
    }
    if let Some(dir) = args.output_dir {
        config.output.root = dir;
    }
    config.validate()?;

    tracing::info!("Running {} report", report);
    tracing::info!("  Data dir: {:?}", config.data_dir);
    tracing::info!("  Counties: {:?}", config.counties_path);
    tracing::info!("  Output:   {:?}", config.output.root);

    let date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let source = GeoJsonDirectory::new(&config.data_dir);
    let exporter = Exporter::new(config.output.clone(), date);

    let written = pipeline::run(report, &source, &config, &exporter)?;
    for path in written {
        tracing::info!("  {}", path.display());
    }

    Ok(())
}
