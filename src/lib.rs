pub mod auditor;
pub mod cli;
pub mod config;
pub mod http_client;
pub mod link_checker;
pub mod models;
pub mod orchestrator;
pub mod reporter;
pub mod scheduler;
pub mod seo_analyzer;
pub mod tracker;

use anyhow::Result;
use auditor::PageAuditor;
use cli::Cli;
use colored::*;
use config::{Config, Settings};
use models::PassOutcome;
use orchestrator::Orchestrator;
use reporter::IssueReporter;
use tracing_subscriber::EnvFilter;
use tracker::JiraClient;

/// Builds the orchestrator for the resolved settings
pub fn build_orchestrator(settings: &Settings) -> Result<Orchestrator<JiraClient>> {
    let reporter = match &settings.tracker {
        Some(tracker) => Some(IssueReporter::new(
            JiraClient::new(tracker)?,
            tracker.project_key.clone(),
            tracker.related_issue_key.clone(),
        )),
        None => None,
    };

    Ok(Orchestrator::new(
        settings.pages.clone(),
        PageAuditor::new()?,
        reporter,
    ))
}

/// Runs one audit pass and prints the outcome in the requested format
pub async fn run_audit_pass(
    orchestrator: &Orchestrator<JiraClient>,
    output: &str,
) -> Result<PassOutcome> {
    let outcome = orchestrator.run_pass().await;

    if output == "json" {
        let json = serde_json::to_string_pretty(&outcome)?;
        println!("{}", json);
    }

    Ok(outcome)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("siteaudit={}", default_level)));

    // Ignore the error when a subscriber is already installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run(args: Cli) -> Result<()> {
    let mut config = Config::load(&args)?;
    config.apply_env_overrides();
    let settings = config.resolve(&args)?;

    init_tracing(settings.verbose);

    println!(
        "{}",
        "siteaudit - SEO & Broken Link Auditor".bright_cyan().bold()
    );
    println!("{}", "=".repeat(50).bright_blue());
    println!("{} {}", "Pages:".bright_white().bold(), settings.pages.len());
    if settings.tracker.is_none() {
        println!("{}", "Dry run: findings will not be submitted".bright_yellow());
    }
    println!();

    let orchestrator = build_orchestrator(&settings)?;

    match settings.schedule {
        Some(schedule) => {
            println!(
                "{} {}",
                "Scheduled daily at".bright_white().bold(),
                schedule.at().format("%H:%M")
            );
            let orchestrator = &orchestrator;
            let output = settings.output.as_str();
            schedule
                .run_daily(move || async move {
                    println!("{}", "Running site audit...".bright_yellow());
                    if let Err(e) = run_audit_pass(orchestrator, output).await {
                        tracing::error!(error = %e, "Audit pass failed");
                    }
                })
                .await;
        }
        None => {
            run_audit_pass(&orchestrator, &settings.output).await?;
        }
    }

    Ok(())
}
