//! `mailbrief run` and `mailbrief once`.
//!
//! Startup sequence for `run`:
//! 1. Build the job pipeline from config
//! 2. Print the banner
//! 3. Start the scheduler (first pass one interval after start)
//! 4. Handle Ctrl+C for graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use mailbrief_core::config::Config;
use mailbrief_core::scheduler::Scheduler;

use crate::helpers;

/// Run the polling loop until Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let runner = Arc::new(crate::build_runner(&config)?);

    let interval = Duration::from_secs(config.schedule.interval_secs);
    let tick = Duration::from_millis(config.schedule.tick_millis);
    let scheduler = Scheduler::new(runner.into_job(), Some(interval), Some(tick));

    helpers::print_banner(&config, scheduler.interval());
    info!("Email WhatsApp bot started...");

    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("  Shutting down...");
            info!("received Ctrl+C, shutting down");
            scheduler.stop();
        }
    }

    println!("  Mailbrief stopped. Goodbye!");
    Ok(())
}

/// Run one pass and print the report.
pub async fn once(config: Config, json: bool) -> Result<()> {
    let runner = crate::build_runner(&config)?;
    let report = runner.run_once().await;

    if json {
        let out = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{out}");
        return Ok(());
    }

    println!();
    println!("{}", "📬 Mailbrief run".cyan().bold());
    println!("  {:<12} {}", "Fetched:".bold(), report.fetched);
    println!("  {:<12} {}", "Sent:".bold(), report.sent.to_string().green());
    if report.failed_subjects.is_empty() {
        println!("  {:<12} {}", "Failed:".bold(), "0".dimmed());
    } else {
        println!("  {:<12} {}", "Failed:".bold(), report.failed().to_string().red());
        for subject in &report.failed_subjects {
            println!("    {} {}", "✗".red(), subject);
        }
    }
    println!();
    Ok(())
}
