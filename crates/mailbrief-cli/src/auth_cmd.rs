//! `mailbrief auth`: interactive Gmail consent.
//!
//! Prints the authorization URL, reads back the redirect URL (or the bare
//! code) from stdin, and exchanges it for a token stored at `gmail.tokenFile`.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use mailbrief_core::config::Config;
use mailbrief_mail::TokenManager;

pub async fn run(config: &Config) -> Result<()> {
    let manager =
        TokenManager::from_config(&config.gmail).context("failed to set up Gmail credentials")?;
    let url = manager
        .authorization_url()
        .context("cannot build the authorization URL")?;

    println!();
    println!("{}", "📬 Mailbrief — Gmail authorization".cyan().bold());
    println!();
    println!("  1. Open this URL and grant read-only access:");
    println!();
    println!("     {}", url.underline());
    println!();
    println!("  2. Paste the URL you were redirected to (or just the code):");
    print!("  > ");
    std::io::Write::flush(&mut std::io::stdout()).context("failed to flush stdout")?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read from stdin")?;
    let input = line.trim();
    if input.is_empty() {
        bail!("no authorization code entered");
    }

    let token = manager
        .exchange_code(input)
        .await
        .context("authorization failed")?;

    println!();
    println!(
        "  {} token saved to {}{}",
        "✓".green(),
        manager.token_path().display(),
        if token.refresh_token.is_some() {
            ""
        } else {
            " (no refresh token returned; re-run auth when it expires)"
        }
    );
    println!();
    Ok(())
}
