mod analyzer;
mod config;
mod model;
mod normalizer;
mod quiz;
mod storage;
mod utils;

use analyzer::{AnalyzerImpl, DashboardReport};
use chrono::Utc;
use config::{load_config, AppConfig};
use model::ReportError;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use storage::{SqliteStorage, SubmissionStore};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({}): {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    let storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(import_path) = &config.import_path {
        info!("Importing submissions from {}...", import_path);
        if let Err(e) = quiz::import_file(import_path, &storage, &config, Utc::now()) {
            error!("Import failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match storage.count_submissions() {
        Ok(count) => info!("Storage ready: {} submissions in {}", count, config.database_path),
        Err(e) => warn!("Could not count submissions: {}", e),
    }

    let analyzer = AnalyzerImpl::new();

    let Some(interval) = config.report_interval_seconds else {
        return match run_cycle(&analyzer, &storage, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Analysis failed: {}", e);
                ExitCode::FAILURE
            }
        };
    };

    // Watch mode: re-run until interrupted
    loop {
        if let Err(e) = run_cycle(&analyzer, &storage, &config) {
            warn!("Analysis cycle failed: {}", e);
        }

        info!("Waiting {}s for the next report...", interval);
        tokio::select! {
            _ = sleep(Duration::from_secs(interval)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down.");
                return ExitCode::SUCCESS;
            }
        }
    }
}

/// Fetches every submission, analyzes it and writes the report.
fn run_cycle<S: SubmissionStore>(
    analyzer: &AnalyzerImpl,
    storage: &S,
    config: &AppConfig,
) -> Result<(), ReportError> {
    let submissions = storage.get_all_submissions()?;
    info!("Analyzing {} submissions...", submissions.len());

    let report = DashboardReport::build(analyzer, &submissions, Utc::now());
    info!(
        "Completion rate: {:.1}% | {} business insights | {} product insights | {} sales opportunities",
        report.summary.completion_rate,
        report.analysis.business_insights.len(),
        report.analysis.product_insights.len(),
        report.analysis.sales_opportunities.len()
    );
    for insight in &report.analysis.business_insights {
        info!("[{}] {}", insight.category, insight.insight);
    }

    write_report(&report, config.report_path.as_deref())
}

fn write_report(report: &DashboardReport, path: Option<&str>) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
