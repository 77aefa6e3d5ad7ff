//! RankSight main entry point
//!
//! This is the command-line interface for the RankSight website audit
//! pipeline.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ranksight::config::{load_config_with_hash, Config};
use ranksight::pipeline::{Orchestrator, Worker};
use ranksight::storage::AuditRecord;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// RankSight: search and AI-search readiness audits
///
/// RankSight crawls a handful of pages from a website, checks its
/// robots.txt and sitemap, measures mobile page speed, and scores the site
/// across AI readiness, technical health, content, visibility, and on-page
/// SEO.
#[derive(Parser, Debug)]
#[command(name = "ranksight")]
#[command(version = "1.0.0")]
#[command(about = "Website SEO and AI-search readiness audits", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Queue an audit for a website
    Submit {
        /// Website address; `https://` is assumed when no scheme is given
        url: String,

        /// Contact email for the report
        #[arg(long)]
        email: Option<String>,
    },

    /// Run the pipeline for a queued or failed audit
    Run {
        /// Audit ID
        id: Uuid,
    },

    /// Show an audit's status, progress, and scores
    Status {
        /// Audit ID
        id: Uuid,
    },

    /// Queue an audit and run it immediately
    Audit {
        url: String,

        #[arg(long)]
        email: Option<String>,
    },

    /// Run every queued audit and exit
    Work,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let orchestrator = Arc::new(
        Orchestrator::from_config(&config, Some(config_hash))
            .context("Failed to initialize the audit pipeline")?,
    );

    match cli.command {
        Command::Submit { url, email } => {
            let audit = orchestrator.submit(&url, email.as_deref())?;
            print_json(&audit)?;
        }
        Command::Run { id } => {
            orchestrator.start(id).await?;
            print_json(&orchestrator.status(id)?)?;
        }
        Command::Status { id } => {
            print_json(&orchestrator.status(id)?)?;
        }
        Command::Audit { url, email } => {
            let audit = orchestrator.submit(&url, email.as_deref())?;
            orchestrator.start(audit.id).await?;
            print_audit_summary(&orchestrator.status(audit.id)?);
        }
        Command::Work => {
            handle_work(&config, orchestrator).await?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ranksight=info,warn"),
            1 => EnvFilter::new("ranksight=debug,info"),
            2 => EnvFilter::new("ranksight=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Drains the queue once with the configured concurrency
async fn handle_work(config: &Config, orchestrator: Arc<Orchestrator>) -> anyhow::Result<()> {
    let worker = Worker::new(orchestrator, config.worker.max_concurrent_audits);
    let report = worker.run_pending().await?;

    println!("=== RankSight Worker ===\n");
    println!("Completed: {}", report.completed);
    println!("Failed:    {}", report.failed);
    println!("Skipped:   {}", report.rejected);

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a human-readable summary of a finished audit
fn print_audit_summary(audit: &AuditRecord) {
    println!("=== RankSight Audit ===\n");
    println!("Audit:  {}", audit.id);
    println!("URL:    {}", audit.url);
    println!("Status: {} ({}%)", audit.status, audit.progress);
    println!("Step:   {}", audit.current_step);

    if let Some(message) = &audit.error_message {
        println!("\nError: {}", message);
        return;
    }

    if let (Some(overall), Some(grade)) = (audit.overall_score, &audit.overall_grade) {
        println!("\nOverall: {}/100 ({})", overall, grade);
    }

    let categories = [
        ("AI readiness", audit.geo_score),
        ("Technical", audit.technical_score),
        ("Content", audit.content_score),
        ("Visibility", audit.visibility_score),
        ("On-page", audit.onpage_score),
    ];
    for (name, score) in categories {
        if let Some(score) = score {
            println!("  {:<14}{:>3}", name, score);
        }
    }

    let top_issues = audit
        .teaser_data
        .as_ref()
        .and_then(|teaser| teaser.get("topIssues"))
        .and_then(|issues| issues.as_array());

    if let Some(issues) = top_issues {
        println!("\nTop issues:");
        for issue in issues {
            println!(
                "  [{}] {}",
                issue["severity"].as_str().unwrap_or("?"),
                issue["title"].as_str().unwrap_or("")
            );
        }
    }
}
