//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for octocheck, including
//! subcommands for check runs, check suites, credentials, and configuration.

mod auth;
mod config;
mod runs;
mod suites;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Args, Parser, Subcommand};
use directories::BaseDirs;
use octocheck_core::{ApiConfig, get_config_dirs};
use octocheck_gh::{ApiOptions, GitHubClient, RepoRef, resolve_github_auth};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::output::ColorMode;

/// Top-level CLI command for the octocheck tool
#[derive(Parser)]
#[command(name = "octocheck")]
#[command(display_name = "✅ Octocheck")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Create, update, and inspect GitHub check runs and check suites")]
#[command(
  long_about = "Octocheck talks to the GitHub Checks API.\n\n\
        It creates and updates check runs, lists runs and annotations for a commit\n\
        or suite, and manages check suites and their auto-trigger preferences.\n\
        Repositories can be given as owner/name, a numeric id, or a GitHub URL."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  /// Print results as pretty JSON instead of tables
  #[arg(long, global = true)]
  pub json: bool,

  /// Override the REST API base URL (e.g. https://github.example.com/api/v3)
  #[arg(long = "api-url", global = true, value_name = "URL")]
  pub api_url: Option<String>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the octocheck tool
#[derive(Subcommand)]
pub enum Commands {
  /// Check run operations
  #[command(long_about = "Create, update, and inspect check runs.\n\n\
            Check runs are individual checks reported against a commit. This command\n\
            group creates and updates runs, fetches a single run, and lists runs and\n\
            their annotations across every page of results.")]
  #[command(alias = "run")]
  Runs(runs::RunsArgs),

  /// Check suite operations
  #[command(long_about = "Create, inspect, and re-trigger check suites.\n\n\
            A check suite groups the check runs one app reports for a commit. This\n\
            command group also manages whether suites are created automatically\n\
            when code is pushed.")]
  #[command(alias = "suite")]
  Suites(suites::SuitesArgs),

  /// Credential management
  #[command(long_about = "Check and store the credentials used for the GitHub API.\n\n\
            Credentials come from the GITHUB_TOKEN environment variable or from the\n\
            .netrc entry for the API host. Without either, requests are anonymous.")]
  #[command(arg_required_else_help = true)]
  Auth(auth::AuthArgs),

  /// Configuration management
  #[command(long_about = "Show or change the API configuration file.\n\n\
            The configuration holds the API base URL, a request timeout, and an\n\
            optional User-Agent. OCTOCHECK_API_URL and OCTOCHECK_TIMEOUT_SECS\n\
            override the file for a single invocation.")]
  #[command(arg_required_else_help = true)]
  Config(config::ConfigArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  let context = Context::load(cli.json, cli.api_url)?;

  match cli.command {
    Commands::Runs(runs) => runs::handle_runs_command(&context, runs),
    Commands::Suites(suites) => suites::handle_suites_command(&context, suites),
    Commands::Auth(auth) => auth::handle_auth_command(&context, auth),
    Commands::Config(config) => config::handle_config_command(&context, config),
  }
}

/// Settings shared by every command handler
pub struct Context {
  pub json: bool,
  pub config: ApiConfig,
  pub home: PathBuf,
}

impl Context {
  fn load(json: bool, api_url: Option<String>) -> Result<Self> {
    let mut config = get_config_dirs()?.load_api_config()?.with_env_overrides()?;
    if let Some(api_url) = api_url {
      config.base_url = api_url;
    }

    let home = BaseDirs::new()
      .context("Failed to determine home directory")?
      .home_dir()
      .to_path_buf();

    debug!("Using API base URL {}", config.base_url);
    Ok(Self { json, config, home })
  }

  /// Build a client authenticated from the environment or `.netrc`
  pub fn client(&self) -> Result<GitHubClient> {
    let auth = resolve_github_auth(&self.home, &self.config.base_url)?;
    Ok(GitHubClient::from_config(&self.config, auth))
  }

  /// Create a runtime for async operations
  pub fn runtime(&self) -> Result<Runtime> {
    Runtime::new().context("Failed to start async runtime")
  }
}

/// Repository argument shared by the run and suite commands
#[derive(Args, Debug, Clone)]
pub struct RepoArg {
  /// Repository as owner/name, numeric id, or GitHub URL
  #[arg(value_name = "REPO", value_parser = parse_repo)]
  pub repo: RepoRef,
}

fn parse_repo(value: &str) -> Result<RepoRef, String> {
  value.parse::<RepoRef>().map_err(|e| e.to_string())
}

/// Paging flags shared by the list commands
#[derive(Args, Debug, Clone, Default)]
pub struct PagingArgs {
  /// Number of items per page (1-100)
  #[arg(long = "per-page", value_name = "N")]
  pub per_page: Option<u32>,

  /// Stop after this many pages
  #[arg(long = "max-pages", value_name = "N")]
  pub max_pages: Option<u32>,

  /// First page to fetch
  #[arg(long = "page", value_name = "N")]
  pub page: Option<u32>,
}

impl PagingArgs {
  /// The paging options, or `None` when no flag was given
  pub fn options(&self) -> Option<ApiOptions> {
    if self.per_page.is_none() && self.max_pages.is_none() && self.page.is_none() {
      return None;
    }

    let mut options = ApiOptions::new();
    options.page_size = self.per_page;
    options.page_count = self.max_pages;
    options.start_page = self.page;
    Some(options)
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_paging_args_without_flags() {
    assert_eq!(PagingArgs::default().options(), None);
  }

  #[test]
  fn test_paging_args_map_to_options() {
    let paging = PagingArgs {
      per_page: Some(50),
      max_pages: Some(2),
      page: None,
    };
    let options = paging.options().unwrap();
    assert_eq!(options.page_size, Some(50));
    assert_eq!(options.page_count, Some(2));
    assert_eq!(options.start_page, None);
  }

  #[test]
  fn test_repo_argument_forms() {
    assert_eq!(parse_repo("octocat/hello-world").unwrap(), RepoRef::named("octocat", "hello-world"));
    assert_eq!(parse_repo("1296269").unwrap(), RepoRef::id(1296269));
    assert!(parse_repo("not a repo").is_err());
  }
}
