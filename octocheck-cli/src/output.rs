//! # Output Formatting
//!
//! Provides formatted output functions with colors, emojis, and consistent
//! styling for user-facing messages, check results, and JSON output.

use anyhow::{Context, Result};
use octocheck_gh::{CheckConclusion, CheckStatus, WireValue};
use owo_colors::OwoColorize;
use serde::Serialize;
use {clap, emojis};

/// Enum representing different color modes for output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Yes,
  /// Enable colored output (alias for Yes)
  Always,
  /// Automatically detect if colors should be used based on terminal
  /// capabilities
  Auto,
  /// Disable colored output
  No,
  /// Disable colored output (alias for No)
  Never,
}

impl ColorMode {
  /// Apply the mode as the global owo-colors override
  pub fn apply(self) {
    match self {
      Self::Always | Self::Yes => owo_colors::set_override(true),
      Self::Never | Self::No => owo_colors::set_override(false),
      // Leave terminal detection to owo-colors
      Self::Auto => {}
    }
  }
}

/// Helper function to safely get an emoji or fallback to a default character
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  let cross = get_emoji_or_default("cross_mark", "✗");
  eprintln!("{} {}", cross.red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Print a section header
pub fn print_header(header: &str) {
  println!("\n{}", header.blue().bold());
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  let content = serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")?;
  println!("{content}");
  Ok(())
}

/// Print a value as a single line of JSON
pub fn print_json_line<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  let content = serde_json::to_string(value).context("Failed to serialize output as JSON")?;
  println!("{content}");
  Ok(())
}

/// Format a file path
pub fn format_path(path: &str) -> String {
  path.bright_green().to_string()
}

/// Format a repository reference
pub fn format_repo(repo: &str) -> String {
  repo.bright_cyan().bold().to_string()
}

/// Format a command or command example
pub fn format_command(cmd: &str) -> String {
  cmd.purple().to_string()
}

/// Format a check conclusion
pub fn format_conclusion(conclusion: CheckConclusion) -> String {
  let token = conclusion.as_str();
  match conclusion {
    CheckConclusion::Success => token.green().to_string(),
    CheckConclusion::Failure | CheckConclusion::TimedOut | CheckConclusion::StartupFailure => token.red().to_string(),
    CheckConclusion::Cancelled | CheckConclusion::ActionRequired => token.yellow().to_string(),
    CheckConclusion::Skipped | CheckConclusion::Stale | CheckConclusion::Neutral => token.bright_black().to_string(),
  }
}

/// Format a check run or suite state, preferring the conclusion once completed
pub fn format_check_status(
  status: Option<&WireValue<CheckStatus>>,
  conclusion: Option<&WireValue<CheckConclusion>>,
) -> String {
  if let Some(conclusion) = conclusion {
    return match conclusion.known() {
      Some(conclusion) => format_conclusion(conclusion),
      None => conclusion.as_str().bright_black().to_string(),
    };
  }

  let Some(status) = status else {
    return "unknown".bright_black().to_string();
  };
  match status.known() {
    Some(CheckStatus::InProgress) => status.as_str().yellow().to_string(),
    Some(CheckStatus::Queued) => status.as_str().blue().to_string(),
    Some(CheckStatus::Completed) => status.as_str().to_string(),
    None => status.as_str().bright_black().to_string(),
  }
}

/// Truncate a string to `max` characters, appending an ellipsis (UTF-8 safe)
pub fn truncate_string(value: &str, max: usize) -> String {
  if value.chars().count() <= max {
    return value.to_string();
  }
  let kept: String = value.chars().take(max.saturating_sub(1)).collect();
  format!("{kept}…")
}
