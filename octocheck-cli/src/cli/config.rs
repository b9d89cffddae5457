//! # Config Command
//!
//! Shows and edits the API configuration file.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use octocheck_core::get_config_dirs;

use super::Context;
use crate::output::{format_path, print_header, print_json, print_success};

/// Command for configuration management
#[derive(Args)]
pub struct ConfigArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfigSubcommands,
}

/// Subcommands for the config command
#[derive(Subcommand)]
pub enum ConfigSubcommands {
  /// Show the effective configuration
  Show,

  /// Change values in the configuration file
  #[command(long_about = "Change values in the configuration file.\n\n\
            Only the given values change. Environment overrides are not written\n\
            back to the file.")]
  Set(SetArgs),
}

#[derive(Args)]
pub struct SetArgs {
  /// REST API base URL
  #[arg(long = "base-url", value_name = "URL")]
  pub base_url: Option<String>,

  /// Request timeout in seconds
  #[arg(long = "timeout-secs", value_name = "SECS")]
  pub timeout_secs: Option<u64>,

  /// User-Agent header value
  #[arg(long = "user-agent", value_name = "AGENT")]
  pub user_agent: Option<String>,
}

/// Handle the config command
pub(crate) fn handle_config_command(context: &Context, config: ConfigArgs) -> Result<()> {
  match config.subcommand {
    ConfigSubcommands::Show => handle_show_command(context),
    ConfigSubcommands::Set(args) => handle_set_command(context, args),
  }
}

fn handle_show_command(context: &Context) -> Result<()> {
  if context.json {
    return print_json(&context.config);
  }

  let config_dirs = get_config_dirs()?;
  print_header("Configuration");
  println!("  File: {}", format_path(&config_dirs.config_path().display().to_string()));
  println!("  API URL: {}", context.config.base_url);
  match context.config.timeout_secs {
    Some(secs) => println!("  Timeout: {secs}s"),
    None => println!("  Timeout: default"),
  }
  if let Some(user_agent) = &context.config.user_agent {
    println!("  User-Agent: {user_agent}");
  }
  Ok(())
}

fn handle_set_command(context: &Context, args: SetArgs) -> Result<()> {
  if args.base_url.is_none() && args.timeout_secs.is_none() && args.user_agent.is_none() {
    bail!("nothing to set; pass --base-url, --timeout-secs, or --user-agent");
  }

  let config_dirs = get_config_dirs()?;
  let mut config = config_dirs.load_api_config()?;
  if let Some(base_url) = args.base_url {
    config.base_url = base_url.trim_end_matches('/').to_string();
  }
  if let Some(timeout_secs) = args.timeout_secs {
    config.timeout_secs = Some(timeout_secs);
  }
  if let Some(user_agent) = args.user_agent {
    config.user_agent = Some(user_agent);
  }
  config_dirs.save_api_config(&config)?;

  if context.json {
    return print_json(&config);
  }
  print_success(&format!(
    "Saved configuration to {}",
    format_path(&config_dirs.config_path().display().to_string())
  ));
  Ok(())
}
