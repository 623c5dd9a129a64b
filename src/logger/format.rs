/// Console formatting: timestamped, tag-labelled lines with highlighting for
/// hex addresses, transaction hashes, amounts and status words.
use super::tags::LogTag;
use super::LogLevel;
use chrono::Utc;
use colored::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, Write};

static HEX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(0x[0-9a-fA-F]{8,})").unwrap());
static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?[\d,]+\.?\d*%?)").unwrap());

pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let timestamp = Utc::now().format("%H:%M:%S").to_string();
    let body = highlight_message(message);

    let line = match level {
        LogLevel::Error => format!(
            "{} {} {} {}",
            "❌".red().bold(),
            tag.label(),
            format!("[{}]", timestamp).dimmed(),
            body.red()
        ),
        LogLevel::Warning => format!(
            "{} {} {} {}",
            "⚠".yellow().bold(),
            tag.label(),
            format!("[{}]", timestamp).dimmed(),
            body.yellow()
        ),
        LogLevel::Debug | LogLevel::Verbose => format!(
            "{} {} {} {}",
            "🐛".purple().bold(),
            tag.label(),
            format!("[{}]", timestamp).dimmed(),
            body.dimmed()
        ),
        LogLevel::Info => format!(
            "{} {} {} {}",
            "ℹ".blue().bold(),
            tag.label(),
            format!("[{}]", timestamp).dimmed(),
            body
        ),
    };

    println!("{}", line);
    let _ = io::stdout().flush();
}

/// Truncate and colorize 0x-prefixed hex blobs (addresses, tx hashes,
/// calldata), highlight numbers and status words.
fn highlight_message(message: &str) -> String {
    let mut formatted = HEX_RE
        .replace_all(message, |caps: &regex::Captures| {
            let hex = &caps[1];
            if hex.len() > 18 {
                format!(
                    "{}...{}",
                    hex[..10].bright_cyan().bold(),
                    hex[hex.len() - 4..].bright_cyan().bold()
                )
            } else {
                hex.bright_cyan().bold().to_string()
            }
        })
        .to_string();

    formatted = NUMBER_RE
        .replace_all(&formatted, |caps: &regex::Captures| {
            caps[1].bright_white().bold().to_string()
        })
        .to_string();

    formatted
        .replace("SUCCESS", &"SUCCESS".green().bold().to_string())
        .replace("FAILED", &"FAILED".red().bold().to_string())
        .replace("ERROR", &"ERROR".red().bold().to_string())
        .replace("PENDING", &"PENDING".yellow().bold().to_string())
}
