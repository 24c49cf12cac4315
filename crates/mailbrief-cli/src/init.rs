//! `mailbrief init`: write `~/.mailbrief/config.json` with defaults.
//!
//! An existing file is left alone. Secrets are better kept in `.env`; the
//! written file carries empty keys.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use mailbrief_core::config::{get_config_path, save_config, Config};

pub fn run(path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "📬 Mailbrief — Setup".cyan().bold());
    println!();

    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    if write_default_config(&config_path)? {
        println!("  {} created config at {}", "✓".green(), config_path.display());
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    println!();
    println!("  Next steps:");
    println!("    1. Put credentials.json from the Google Cloud console in the working directory");
    println!("    2. Set OPENAI_API_KEY and the TWILIO_* variables (a .env file works)");
    println!("    3. Run {} once to authorize Gmail", "mailbrief auth".bold());
    println!("    4. Start polling with {}", "mailbrief run".bold());
    println!();
    Ok(())
}

/// Write the default config unless `path` exists. Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
