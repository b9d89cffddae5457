//! # Auth Command
//!
//! Derive-based implementation of the auth command for checking and storing
//! the credentials used for the GitHub API.

use std::fs::metadata;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use octocheck_core::consts::ENV_GITHUB_TOKEN;
use octocheck_core::creds::netrc::{get_netrc_path, machine_for_api_url, write_netrc_entry};
use octocheck_gh::{GitHubAuth, GitHubClient, RateLimit};
use octocheck_gh::auth::check_github_credentials;
use serde_json::json;

use super::Context;
use crate::output::{
  format_command, format_path, print_error, print_header, print_info, print_json, print_success, print_warning,
};

/// Command for credential management
#[derive(Args)]
pub struct AuthArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: AuthSubcommands,
}

/// Subcommands for the auth command
#[derive(Subcommand)]
pub enum AuthSubcommands {
  /// Check which credentials are in use and whether they work
  #[command(long_about = "Check which credentials octocheck will use and whether they work.\n\n\
            Reports the credential source (GITHUB_TOKEN, .netrc, or anonymous),\n\
            checks .netrc permissions, and authenticates against the API.")]
  Check,

  /// Store a token in .netrc for the API host
  #[command(long_about = "Store a GitHub token in your .netrc file.\n\n\
            The entry is written for the web host behind the API URL (github.com\n\
            for api.github.com). Any existing entry for that host is replaced and\n\
            the file permissions are set to 600.")]
  Set(SetArgs),
}

#[derive(Args)]
pub struct SetArgs {
  /// GitHub username
  #[arg(long)]
  pub login: String,

  /// Personal access token
  #[arg(long)]
  pub token: String,

  /// Store the token without authenticating first
  #[arg(long = "no-verify")]
  pub no_verify: bool,
}

/// Handle the auth command
pub(crate) fn handle_auth_command(context: &Context, auth: AuthArgs) -> Result<()> {
  match auth.subcommand {
    AuthSubcommands::Check => handle_check_command(context),
    AuthSubcommands::Set(args) => handle_set_command(context, args),
  }
}

fn credential_source(auth: &GitHubAuth) -> &'static str {
  match auth {
    GitHubAuth::Anonymous => "anonymous",
    GitHubAuth::Token(_) => "environment",
    GitHubAuth::Basic { .. } => "netrc",
  }
}

fn handle_check_command(context: &Context) -> Result<()> {
  let api_url = &context.config.base_url;
  let machine = machine_for_api_url(api_url);
  let netrc_path = get_netrc_path(&context.home);
  let netrc_entry = check_github_credentials(&context.home, api_url)?;

  let client = context.client()?;
  let source = credential_source(client.auth());
  let rt = context.runtime()?;
  let authenticated = if client.auth().is_anonymous() {
    false
  } else {
    rt.block_on(client.test_connection())?
  };
  let rate_limit = client.last_api_info().map(|info| info.rate_limit);

  if context.json {
    return print_json(&json!({
      "api_url": api_url,
      "machine": machine,
      "source": source,
      "netrc_entry": netrc_entry,
      "authenticated": authenticated,
      "rate_limit": rate_limit,
    }));
  }

  print_header("GitHub credentials");
  println!("  API URL: {api_url}");
  println!("  Source: {source}");

  if netrc_path.exists() {
    check_netrc_permissions(&netrc_path)?;
  } else {
    print_info(&format!("No .netrc file at {}", format_path(&netrc_path.display().to_string())));
  }

  if netrc_entry {
    print_success(&format!(".netrc entry found for machine '{machine}'."));
  } else {
    print_warning(&format!("No .netrc entry for machine '{machine}'."));
  }

  match (client.auth().is_anonymous(), authenticated) {
    (true, _) => {
      print_warning("No credentials found; requests will be anonymous and rate limited.");
      println!(
        "Set {ENV_GITHUB_TOKEN} or run {}",
        format_command("octocheck auth set --login <user> --token <token>")
      );
    }
    (false, true) => print_success("Successfully authenticated with GitHub."),
    (false, false) => print_error("GitHub rejected the configured credentials."),
  }

  if let Some(RateLimit {
    limit: Some(limit),
    remaining: Some(remaining),
    ..
  }) = rate_limit
  {
    print_info(&format!("{remaining} of {limit} API requests remaining this hour."));
  }

  Ok(())
}

#[cfg(unix)]
fn check_netrc_permissions(netrc_path: &std::path::Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let mode = metadata(netrc_path)?.permissions().mode();
  if mode & 0o077 != 0 {
    print_warning("Your .netrc file has insecure permissions.");
    println!(
      "For security, change permissions to 600: {}",
      format_command(&format!("chmod 600 {}", netrc_path.display()))
    );
  } else {
    print_success(".netrc file has secure permissions.");
  }
  Ok(())
}

#[cfg(not(unix))]
fn check_netrc_permissions(netrc_path: &std::path::Path) -> Result<()> {
  metadata(netrc_path)?;
  Ok(())
}

fn handle_set_command(context: &Context, args: SetArgs) -> Result<()> {
  if args.login.trim().is_empty() || args.token.trim().is_empty() {
    bail!("--login and --token must not be empty");
  }

  let api_url = &context.config.base_url;
  if !args.no_verify {
    let auth = GitHubAuth::Basic {
      username: args.login.clone(),
      token: args.token.clone(),
    };
    let client = GitHubClient::from_config(&context.config, auth);
    let rt = context.runtime()?;
    if !rt.block_on(client.test_connection())? {
      bail!("GitHub rejected the token; nothing was written (use --no-verify to store it anyway)");
    }
  }

  let machine = machine_for_api_url(api_url);
  let netrc_path = get_netrc_path(&context.home);
  write_netrc_entry(&netrc_path, &machine, &args.login, &args.token)?;

  if context.json {
    return print_json(&json!({
      "machine": machine,
      "netrc_path": netrc_path.display().to_string(),
      "verified": !args.no_verify,
    }));
  }

  print_success(&format!(
    "Stored credentials for machine '{machine}' in {}",
    format_path(&netrc_path.display().to_string())
  ));
  Ok(())
}
