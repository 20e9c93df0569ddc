//! Output formatting utilities

use colored::Colorize;
use serde::Serialize;

use crate::error::Result;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a success message
pub(crate) fn success(msg: &str) {
    println!("{} {}", "[PASS]".green().bold(), msg);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Print an error message
pub(crate) fn error(msg: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), msg);
}

/// Pretty-print any serializable value as JSON
pub(crate) fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Colour a level name by severity
pub(crate) fn level(name: &str) -> String {
    match name {
        "high" => name.to_uppercase().red().bold().to_string(),
        "medium" => name.to_uppercase().yellow().bold().to_string(),
        _ => name.to_uppercase().green().bold().to_string(),
    }
}
