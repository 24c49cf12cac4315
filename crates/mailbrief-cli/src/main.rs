//! Mailbrief CLI: entry point.
//!
//! # Commands
//!
//! - `mailbrief run`: poll the inbox every interval until Ctrl+C
//! - `mailbrief once`: run a single fetch → summarize → notify pass
//! - `mailbrief auth`: grant Gmail read-only access and cache the token
//! - `mailbrief init`: write a default config file
//! - `mailbrief status`: show configuration and credential status

mod auth_cmd;
mod helpers;
mod init;
mod run;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use mailbrief_channels::{Notifier, TwilioChannel};
use mailbrief_core::config::{load_config, Config};
use mailbrief_cron::JobRunner;
use mailbrief_mail::{GmailClient, MessageFetcher, TokenManager};
use mailbrief_providers::{HttpProvider, Summarizer};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 📬 Mailbrief: Gmail summaries delivered to WhatsApp
#[derive(Parser)]
#[command(name = "mailbrief", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.mailbrief/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the inbox on a fixed interval until interrupted
    Run {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Run one pass and print what happened
    Once {
        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Authorize Gmail access and store the token
    Auth,

    /// Write a default config file
    Init,

    /// Show configuration and credential status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run { logs } => {
            init_logging(logs);
            run::run(load_config(config_path)).await
        }
        Commands::Once { json, logs } => {
            init_logging(logs);
            run::once(load_config(config_path), json).await
        }
        Commands::Auth => {
            init_logging(false);
            auth_cmd::run(&load_config(config_path)).await
        }
        Commands::Init => init::run(config_path),
        Commands::Status => status::run(config_path),
    }
}

/// Build the job pipeline from the loaded configuration.
pub fn build_runner(config: &Config) -> Result<JobRunner> {
    if !config.llm.is_configured() {
        bail!("no LLM API key configured (set OPENAI_API_KEY or llm.apiKey)");
    }
    if !config.twilio.is_configured() {
        bail!(
            "Twilio is not configured (set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, \
             TWILIO_WHATSAPP_NUMBER and YOUR_WHATSAPP_NUMBER)"
        );
    }

    let credentials =
        TokenManager::from_config(&config.gmail).context("failed to set up Gmail credentials")?;
    let gmail = GmailClient::from_config(&config.gmail).context("failed to create Gmail client")?;
    let fetcher = MessageFetcher::new(
        Arc::new(credentials),
        Arc::new(gmail),
        config.gmail.label.clone(),
    );

    let provider = HttpProvider::new(&config.llm).context("failed to create LLM provider")?;
    let summarizer = Summarizer::from_config(Arc::new(provider), &config.llm);

    let channel = TwilioChannel::new(&config.twilio).context("failed to create Twilio channel")?;
    let notifier = Notifier::from_config(Arc::new(channel), &config.twilio);

    Ok(JobRunner::new(fetcher, summarizer, notifier)
        .with_max_messages(config.schedule.max_messages))
}

/// Initialize tracing/logging. `RUST_LOG` wins over both defaults.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose {
        "mailbrief=debug,info"
    } else {
        "mailbrief=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
