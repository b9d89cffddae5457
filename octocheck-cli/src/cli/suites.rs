//! # Check Suites Command
//!
//! Derive-based implementation of the check suite commands, including the
//! repository-wide auto-trigger preferences.

use anyhow::Result;
use clap::{Args, Subcommand};
use octocheck_gh::{
  CheckSuite, CheckSuitePreferenceAutoTrigger, CheckSuitePreferences, CheckSuiteRequest, CheckSuiteTriggerRequest,
  NewCheckSuite,
};
use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{Context, PagingArgs, RepoArg};
use crate::output::{
  format_check_status, format_repo, print_header, print_info, print_json, print_success, print_warning,
};

/// Command for check suite operations
#[derive(Args)]
pub struct SuitesArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: SuitesSubcommands,
}

/// Subcommands for the suites command
#[derive(Subcommand)]
pub enum SuitesSubcommands {
  /// Show a single check suite
  #[command(alias = "show")]
  Get(GetArgs),

  /// List check suites for a commit reference
  #[command(alias = "ls")]
  List(ListArgs),

  /// Create a check suite manually
  #[command(long_about = "Create a check suite for a commit.\n\n\
            Only needed when automatic suite creation has been disabled with\n\
            'octocheck suites preferences'.")]
  Create(CreateArgs),

  /// Ask GitHub to create a check suite for a commit
  #[command(long_about = "Ask GitHub to create a check suite for a commit.\n\n\
            Reports whether the request was accepted. GitHub answers 201 Created\n\
            when a new suite was requested; any other success means it was not.")]
  Request(RequestArgs),

  /// Re-run every check in a suite
  Rerequest(RerequestArgs),

  /// Change which apps automatically create check suites
  #[command(long_about = "Change which apps automatically create check suites on push.\n\n\
            Each --auto-trigger takes APP_ID=true or APP_ID=false. Settings for\n\
            apps that are not mentioned are left unchanged.")]
  #[command(alias = "prefs")]
  Preferences(PreferencesArgs),
}

#[derive(Args)]
pub struct GetArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Check suite id
  pub check_suite_id: u64,
}

#[derive(Args)]
pub struct ListArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Commit SHA, branch, or tag
  #[arg(value_name = "REF")]
  pub reference: String,

  /// Only suites created by this GitHub App
  #[arg(long = "app-id", value_name = "APP_ID")]
  pub app_id: Option<u64>,

  /// Only suites containing a run with this check name
  #[arg(long = "check-name", value_name = "NAME")]
  pub check_name: Option<String>,

  #[command(flatten)]
  pub paging: PagingArgs,
}

impl ListArgs {
  fn request(&self) -> Option<CheckSuiteRequest> {
    if self.app_id.is_none() && self.check_name.is_none() {
      return None;
    }

    let mut request = CheckSuiteRequest::new();
    request.app_id = self.app_id;
    request.check_name = self.check_name.clone();
    Some(request)
  }
}

#[derive(Args)]
pub struct CreateArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Commit SHA for the new suite
  #[arg(long = "sha", value_name = "SHA")]
  pub head_sha: String,
}

#[derive(Args)]
pub struct RequestArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Commit SHA to request a suite for
  #[arg(long = "sha", value_name = "SHA")]
  pub head_sha: String,
}

#[derive(Args)]
pub struct RerequestArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Check suite id
  pub check_suite_id: u64,
}

#[derive(Args)]
pub struct PreferencesArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Auto-trigger setting for one app, as APP_ID=true|false
  #[arg(
    long = "auto-trigger",
    value_name = "APP_ID=BOOL",
    value_parser = parse_auto_trigger,
    required = true
  )]
  pub auto_trigger: Vec<CheckSuitePreferenceAutoTrigger>,
}

fn parse_auto_trigger(value: &str) -> Result<CheckSuitePreferenceAutoTrigger, String> {
  let (app_id, setting) = value
    .split_once('=')
    .ok_or_else(|| format!("expected APP_ID=true|false, got '{value}'"))?;
  let app_id = app_id
    .trim()
    .parse::<u64>()
    .map_err(|e| format!("invalid app id '{app_id}': {e}"))?;
  let setting = setting
    .trim()
    .parse::<bool>()
    .map_err(|_| format!("setting must be true or false, got '{setting}'"))?;
  Ok(CheckSuitePreferenceAutoTrigger::new(app_id, setting))
}

/// Handle the suites command
pub(crate) fn handle_suites_command(context: &Context, suites: SuitesArgs) -> Result<()> {
  match suites.subcommand {
    SuitesSubcommands::Get(args) => handle_get_command(context, args),
    SuitesSubcommands::List(args) => handle_list_command(context, args),
    SuitesSubcommands::Create(args) => handle_create_command(context, args),
    SuitesSubcommands::Request(args) => handle_request_command(context, args),
    SuitesSubcommands::Rerequest(args) => handle_rerequest_command(context, args),
    SuitesSubcommands::Preferences(args) => handle_preferences_command(context, args),
  }
}

fn handle_get_command(context: &Context, args: GetArgs) -> Result<()> {
  let client = context.client()?;
  let rt = context.runtime()?;
  let suite = rt.block_on(client.check_suites().get(&args.repo.repo, args.check_suite_id))?;

  if context.json {
    return print_json(&suite);
  }
  print_check_suite(&suite);
  Ok(())
}

fn handle_list_command(context: &Context, args: ListArgs) -> Result<()> {
  let client = context.client()?;
  let rt = context.runtime()?;
  let request = args.request();
  let options = args.paging.options();
  let response = rt.block_on(client.check_suites().get_all_for_reference(
    &args.repo.repo,
    &args.reference,
    request.as_ref(),
    options.as_ref(),
  ))?;

  if context.json {
    return print_json(&response);
  }

  if response.check_suites.is_empty() {
    print_info(&format!("No check suites found for {}", args.reference));
    return Ok(());
  }

  println!(
    "{}",
    format!("Check suites ({} of {})", response.check_suites.len(), response.total_count)
      .bold()
      .underline()
  );
  println!("\n{}", suites_table(&response.check_suites));
  Ok(())
}

fn handle_create_command(context: &Context, args: CreateArgs) -> Result<()> {
  let client = context.client()?;
  let rt = context.runtime()?;
  let suite = rt.block_on(
    client
      .check_suites()
      .create(&args.repo.repo, &NewCheckSuite::new(args.head_sha)),
  )?;

  if context.json {
    return print_json(&suite);
  }
  print_success(&format!(
    "Created check suite {} in {}",
    suite.id,
    format_repo(&args.repo.repo.to_string())
  ));
  print_check_suite(&suite);
  Ok(())
}

fn handle_request_command(context: &Context, args: RequestArgs) -> Result<()> {
  let client = context.client()?;
  let rt = context.runtime()?;
  let trigger = CheckSuiteTriggerRequest::new(&args.head_sha);
  let accepted = rt.block_on(client.check_suites().request(&args.repo.repo, &trigger))?;

  report_acceptance(context, accepted, &format!("check suite for {}", args.head_sha))
}

fn handle_rerequest_command(context: &Context, args: RerequestArgs) -> Result<()> {
  let client = context.client()?;
  let rt = context.runtime()?;
  let accepted = rt.block_on(client.check_suites().rerequest(&args.repo.repo, args.check_suite_id))?;

  report_acceptance(context, accepted, &format!("re-run of check suite {}", args.check_suite_id))
}

fn report_acceptance(context: &Context, accepted: bool, what: &str) -> Result<()> {
  if context.json {
    return print_json(&json!({ "accepted": accepted }));
  }
  if accepted {
    print_success(&format!("Requested {what}"));
  } else {
    print_warning(&format!("GitHub did not accept the request for a {what}"));
  }
  Ok(())
}

fn handle_preferences_command(context: &Context, args: PreferencesArgs) -> Result<()> {
  let preferences = CheckSuitePreferences::new(args.auto_trigger);

  let client = context.client()?;
  let rt = context.runtime()?;
  let response = rt.block_on(
    client
      .check_suites()
      .update_preferences(&args.repo.repo, &preferences),
  )?;

  if context.json {
    return print_json(&response);
  }

  print_success(&format!(
    "Updated check suite preferences for {}",
    format_repo(&response.repository.full_name)
  ));
  print_header("Auto-trigger settings");
  for setting in &response.preferences.auto_trigger_checks {
    let state = if setting.setting {
      "enabled".green().to_string()
    } else {
      "disabled".red().to_string()
    };
    println!("  App {}: {state}", setting.app_id);
  }
  Ok(())
}

#[derive(Tabled)]
struct CheckSuiteRow {
  #[tabled(rename = "ID")]
  id: u64,
  #[tabled(rename = "App")]
  app: String,
  #[tabled(rename = "Branch")]
  branch: String,
  #[tabled(rename = "Status")]
  status: String,
  #[tabled(rename = "Runs")]
  runs: String,
}

fn suites_table(suites: &[CheckSuite]) -> String {
  let rows: Vec<CheckSuiteRow> = suites
    .iter()
    .map(|suite| CheckSuiteRow {
      id: suite.id,
      app: suite
        .app
        .as_ref()
        .map(|app| app.slug.clone().unwrap_or_else(|| app.name.clone()))
        .unwrap_or_else(|| "-".to_string()),
      branch: suite.head_branch.clone().unwrap_or_else(|| "-".to_string()),
      status: format_check_status(suite.status.as_ref(), suite.conclusion.as_ref()),
      runs: suite
        .latest_check_runs_count
        .map(|count| count.to_string())
        .unwrap_or_else(|| "-".to_string()),
    })
    .collect();

  Table::new(rows).with(Style::sharp()).to_string()
}

fn print_check_suite(suite: &CheckSuite) {
  println!("  ID: {}", suite.id);
  println!("  Head SHA: {}", suite.head_sha);
  if let Some(branch) = &suite.head_branch {
    println!("  Branch: {branch}");
  }
  println!("  Status: {}", format_check_status(suite.status.as_ref(), suite.conclusion.as_ref()));
  if let Some(app) = &suite.app {
    println!("  App: {} ({})", app.name, app.id);
  }
  if let Some(count) = suite.latest_check_runs_count {
    println!("  Check runs: {count}");
  }
}
