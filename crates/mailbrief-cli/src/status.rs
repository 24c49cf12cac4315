//! `mailbrief status`: show configuration and credential status.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;

use mailbrief_core::config::{get_config_path, load_config};
use mailbrief_core::utils::expand_home;
use mailbrief_mail::TokenManager;

use crate::helpers::{format_interval, mask_secret, status_mark};

pub fn run(path: Option<&Path>) -> Result<()> {
    let config = load_config(path);
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    println!();
    println!("{}", "📬 Mailbrief Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );
    println!(
        "  {:<18} every {} | {} newest messages",
        "Schedule:".bold(),
        format_interval(std::time::Duration::from_secs(config.schedule.interval_secs)),
        config.schedule.max_messages
    );

    // Gmail
    println!();
    println!("  {}", "Gmail:".bold());
    let secrets = expand_home(&config.gmail.credentials_file);
    println!(
        "    {:<20} {}",
        "Client secrets",
        if secrets.exists() {
            format!("{} {}", "✓".green(), secrets.display())
        } else {
            format!("{} {}", "(not found)".red(), secrets.display())
        }
    );
    println!("    {:<20} {}", "Token", token_status(&config.gmail));
    println!("    {:<20} {}", "Label", config.gmail.label);

    // LLM
    println!();
    println!(
        "  {:<18} {} {}",
        "LLM:".bold(),
        config.llm.model,
        format!("({})", config.llm.api_base).dimmed()
    );
    println!(
        "    {:<20} {}",
        "API key",
        status_mark(
            config.llm.is_configured(),
            &mask_secret(&config.llm.api_key)
        )
    );

    // Twilio
    println!();
    println!("  {}", "Twilio WhatsApp:".bold());
    println!(
        "    {:<20} {}",
        "Account",
        status_mark(
            !config.twilio.account_sid.is_empty() && !config.twilio.auth_token.is_empty(),
            &config.twilio.account_sid
        )
    );
    println!(
        "    {:<20} {}",
        "From → To",
        status_mark(
            !config.twilio.from.is_empty() && !config.twilio.to.is_empty(),
            &format!("{} → {}", config.twilio.from, config.twilio.to)
        )
    );

    println!();
    Ok(())
}

fn token_status(gmail: &mailbrief_core::config::GmailConfig) -> String {
    let manager = match TokenManager::from_config(gmail) {
        Ok(m) => m,
        Err(e) => return format!("{} {}", "✗".red(), e),
    };
    match manager.load_token() {
        Ok(Some(token)) if token.is_valid_at(Utc::now()) => {
            format!("{} valid", "✓".green())
        }
        Ok(Some(token)) if token.refresh_token.is_some() => {
            format!("{} expired (will refresh)", "✓".yellow())
        }
        Ok(Some(_)) => format!("{} expired, run `mailbrief auth`", "✗".red()),
        Ok(None) => format!("{} run `mailbrief auth`", "(not found)".red()),
        Err(e) => format!("{} {}", "✗".red(), e),
    }
}
