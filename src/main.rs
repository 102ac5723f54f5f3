//! CLI entry point for Academic Pulse.
//!
//! Provides subcommands for generating synthetic feedback, transforming it,
//! and rendering console, text, CSV and HTML reports from the processed data.

use academic_pulse::analyzers::Aggregator;
use academic_pulse::config::Paths;
use academic_pulse::extract::{ExtractOptions, extract};
use academic_pulse::output::load_processed;
use academic_pulse::pipeline::{DEFAULT_RUN_COUNT, final_summary, run_complete};
use academic_pulse::reports::interactive::Dashboard;
use academic_pulse::reports::{console, dashboard, export, html};
use academic_pulse::transform::{QualityReport, transform};
use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "academic_pulse")]
#[command(about = "Synthetic student feedback ETL and reporting", long_about = None)]
struct Cli {
    /// Directory holding data/ and reports/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic feedback and write the raw CSV
    Extract {
        /// Number of records to generate
        #[arg(short = 'n', long, default_value_t = 100)]
        count: u32,
    },
    /// Enhance the raw CSV with derived metrics
    Transform,
    /// Extract, transform and analyze in one go
    Run {
        /// Number of records to generate
        #[arg(short = 'n', long, default_value_t = DEFAULT_RUN_COUNT)]
        count: u32,
    },
    /// Print a quick summary of the processed data
    Summary,
    /// Print averages, distributions and top instructors
    Analyze,
    /// Print text bar charts
    Charts {
        /// Width of the longest bar
        #[arg(short, long, default_value_t = 50)]
        width: usize,
    },
    /// Print the comprehensive report with recommendations
    Report,
    /// Write reports/Dashboard_Summary.txt
    DashboardReport,
    /// Write the CSV reports and the HTML report under reports/
    Export,
    /// Explore the processed data through an interactive menu
    Dashboard,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/academic_pulse.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("academic_pulse.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let paths = Paths::new(cli.root);
    let mut rng = rand::thread_rng();

    match cli.command {
        Commands::Extract { count } => {
            let options = ExtractOptions::new(count);
            let extracted = extract(&mut rng, &options, &paths.raw_csv(), &paths.raw_metadata())?;
            println!(
                "Extracted {} records to {}",
                extracted.records.len(),
                extracted.csv_path.display()
            );
        }
        Commands::Transform => {
            match transform(
                &paths.raw_csv(),
                &paths.processed_csv(),
                &paths.quality_report(),
            )? {
                Some(result) => println!(
                    "Processed {} records ({} skipped, quality {:.1}%)",
                    result.quality.records_cleaned,
                    result.quality.records_skipped,
                    result.quality.data_quality_score
                ),
                None => println!("No raw data found. Run the extract step first!"),
            }
        }
        Commands::Run { count } => {
            let options = ExtractOptions::new(count);
            match run_complete(&mut rng, &paths, &options)? {
                Some(run) => {
                    let agg = Aggregator::new(&run.transformed.records);
                    print!("{}", console::pipeline_analysis(&agg));
                    print!("{}", final_summary(&run, &paths));
                }
                None => println!("Pipeline failed at transformation step"),
            }
        }
        Commands::Summary => {
            with_records(&paths, |agg| print!("{}", console::summary(agg)))?;
        }
        Commands::Analyze => {
            with_records(&paths, |agg| print!("{}", console::analysis(agg)))?;
        }
        Commands::Charts { width } => {
            with_records(&paths, |agg| print!("{}", console::charts(agg, width)))?;
        }
        Commands::Report => {
            with_records(&paths, |agg| {
                print!("{}", console::comprehensive(agg, Local::now()))
            })?;
        }
        Commands::DashboardReport => {
            let quality = quality_score(&paths);
            try_with_records(&paths, |agg| {
                let path = paths.report(dashboard::FILE_NAME);
                dashboard::save(agg, &path, Local::now(), quality)?;
                println!("Dashboard report created: {}", path.display());
                Ok(())
            })?;
        }
        Commands::Export => {
            let quality = quality_score(&paths);
            try_with_records(&paths, |agg| {
                let generated_at = Local::now();
                for path in export::export_all(agg, &paths.reports_dir(), generated_at)? {
                    println!("Report written: {}", path.display());
                }
                let html_path = paths.report(html::FILE_NAME);
                html::save(agg, &html_path, generated_at, quality)?;
                println!("HTML report created: {}", html_path.display());
                Ok(())
            })?;
        }
        Commands::Dashboard => {
            try_with_records(&paths, |agg| {
                let stdin = std::io::stdin();
                let mut session = Dashboard::new(*agg, stdin.lock(), std::io::stdout());
                session.run()
            })?;
        }
    }

    Ok(())
}

/// Runs `render` over the processed records, or tells the user to run the
/// pipeline first.
fn with_records(paths: &Paths, render: impl FnOnce(&Aggregator)) -> Result<()> {
    try_with_records(paths, |agg| {
        render(agg);
        Ok(())
    })
}

fn try_with_records(paths: &Paths, f: impl FnOnce(&Aggregator) -> Result<()>) -> Result<()> {
    let Some(records) = load_processed(&paths.processed_csv())? else {
        println!("No processed data found. Run the ETL pipeline first!");
        return Ok(());
    };
    info!(records = records.len(), "Rendering report");
    f(&Aggregator::new(&records))
}

/// Quality score of the last transformation, if its report can be read.
fn quality_score(paths: &Paths) -> Option<f64> {
    match QualityReport::load(&paths.quality_report()) {
        Ok(report) => report.map(|r| r.data_quality_score),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable data quality report");
            None
        }
    }
}
