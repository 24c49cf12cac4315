//! Shared CLI helpers: banner, status marks, secret masking.

use std::time::Duration;

use colored::Colorize;

use mailbrief_core::config::Config;

/// Print the banner shown when the polling loop starts.
pub fn print_banner(config: &Config, interval: Duration) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "📬 Mailbrief".cyan().bold(), version.dimmed());
    println!("  Model:     {}", config.llm.model);
    println!("  Interval:  {}", format_interval(interval));
    println!("  Recipient: {}", config.twilio.to);
    println!("{}", "  Press Ctrl+C to stop.".dimmed());
    println!();
}

/// `✓` or a dimmed "not configured" marker.
pub fn status_mark(ok: bool, detail: &str) -> String {
    if ok {
        format!("{} {}", "✓".green(), detail)
    } else {
        format!("{}", "· not configured".dimmed())
    }
}

/// Keep the first four characters of a secret and hide the rest.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 8 {
        return "****".to_string();
    }
    let head: String = secret.chars().take(4).collect();
    format!("{head}****")
}

/// Human-readable interval, e.g. `10m`, `90s`, `1h 5m`.
pub fn format_interval(d: Duration) -> String {
    let secs = d.as_secs();
    match (secs / 3600, (secs % 3600) / 60, secs % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, 0, 0) => format!("{h}h"),
        (h, m, _) => format!("{h}h {m}m"),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
