//! # Check Runs Command
//!
//! Derive-based implementation of the check run commands: create, update,
//! get, list (awaited or streamed), and annotations.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use futures_util::StreamExt;
use octocheck_gh::{
  CheckConclusion, CheckRun, CheckRunAnnotation, CheckRunCompletedAtFilter, CheckRunRequest, CheckRunUpdate,
  CheckStatus, CheckStatusFilter, GitHubError, NewCheckRun, NewCheckRunOutput, StreamingGitHubClient,
};
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{Context, PagingArgs, RepoArg};
use crate::output::{
  format_check_status, format_repo, print_info, print_json, print_json_line, print_success, print_warning,
  truncate_string,
};

/// Command for check run operations
#[derive(Args)]
pub struct RunsArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: RunsSubcommands,
}

/// Subcommands for the runs command
#[derive(Subcommand)]
pub enum RunsSubcommands {
  /// Create a check run for a commit
  #[command(long_about = "Create a check run for a commit.\n\n\
            The run starts queued unless --status is given. Passing --conclusion\n\
            marks the run completed. --title and --summary attach an output block.")]
  Create(CreateArgs),

  /// Update an existing check run
  #[command(long_about = "Update an existing check run.\n\n\
            Only the fields given on the command line are sent; everything else\n\
            is left unchanged on the server.")]
  Update(UpdateArgs),

  /// Show a single check run
  #[command(alias = "show")]
  Get(GetArgs),

  /// List check runs for a commit reference or a check suite
  #[command(long_about = "List check runs for a SHA, branch, or tag, or for a check suite.\n\n\
            Every page is fetched unless --max-pages limits it. With --stream each run\n\
            is printed as soon as its page arrives (as JSON lines with --json).")]
  #[command(alias = "ls")]
  List(ListArgs),

  /// List the annotations of a check run
  Annotations(AnnotationsArgs),
}

/// Output flags shared by create and update
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
  /// Output title (requires --summary)
  #[arg(long, requires = "summary")]
  pub title: Option<String>,

  /// Output summary in Markdown (requires --title)
  #[arg(long, requires = "title")]
  pub summary: Option<String>,

  /// Output details in Markdown
  #[arg(long, requires = "title")]
  pub text: Option<String>,
}

impl OutputArgs {
  fn output(&self) -> Option<NewCheckRunOutput> {
    let (title, summary) = (self.title.as_ref()?, self.summary.as_ref()?);
    let mut output = NewCheckRunOutput::new(title, summary);
    output.text = self.text.clone();
    Some(output)
  }
}

#[derive(Args)]
pub struct CreateArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Name of the check
  #[arg(long)]
  pub name: String,

  /// Commit SHA the run reports on
  #[arg(long = "sha", value_name = "SHA")]
  pub head_sha: String,

  /// Initial status (queued, in_progress, completed)
  #[arg(long)]
  pub status: Option<CheckStatus>,

  /// Final conclusion; marks the run completed
  #[arg(long, value_name = "CONCLUSION")]
  pub conclusion: Option<CheckConclusion>,

  /// URL of the integrator's site with full details
  #[arg(long = "details-url", value_name = "URL")]
  pub details_url: Option<String>,

  /// Reference for the run on the integrator's system
  #[arg(long = "external-id", value_name = "ID")]
  pub external_id: Option<String>,

  #[command(flatten)]
  pub output: OutputArgs,
}

#[derive(Args)]
pub struct UpdateArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Check run id
  pub check_run_id: u64,

  /// New name for the check
  #[arg(long)]
  pub name: Option<String>,

  /// New status (queued, in_progress, completed)
  #[arg(long)]
  pub status: Option<CheckStatus>,

  /// Final conclusion; marks the run completed
  #[arg(long, value_name = "CONCLUSION")]
  pub conclusion: Option<CheckConclusion>,

  /// URL of the integrator's site with full details
  #[arg(long = "details-url", value_name = "URL")]
  pub details_url: Option<String>,

  #[command(flatten)]
  pub output: OutputArgs,
}

#[derive(Args)]
pub struct GetArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Check run id
  pub check_run_id: u64,
}

#[derive(Args)]
pub struct ListArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Commit SHA, branch, or tag
  #[arg(value_name = "REF", required_unless_present = "suite", conflicts_with = "suite")]
  pub reference: Option<String>,

  /// List the runs of this check suite instead of a reference
  #[arg(long, value_name = "SUITE_ID")]
  pub suite: Option<u64>,

  /// Only runs with this check name
  #[arg(long = "check-name", value_name = "NAME")]
  pub check_name: Option<String>,

  /// Only runs with this status (queued, in_progress, completed)
  #[arg(long)]
  pub status: Option<CheckStatusFilter>,

  /// Which runs to return when checks were re-run (latest, all)
  #[arg(long)]
  pub filter: Option<CheckRunCompletedAtFilter>,

  #[command(flatten)]
  pub paging: PagingArgs,

  /// Print each run as soon as its page arrives
  #[arg(long)]
  pub stream: bool,
}

impl ListArgs {
  fn request(&self) -> Option<CheckRunRequest> {
    if self.check_name.is_none() && self.status.is_none() && self.filter.is_none() {
      return None;
    }

    let mut request = CheckRunRequest::new();
    request.check_name = self.check_name.clone();
    request.status = self.status;
    request.filter = self.filter;
    Some(request)
  }
}

#[derive(Args)]
pub struct AnnotationsArgs {
  #[command(flatten)]
  pub repo: RepoArg,

  /// Check run id
  pub check_run_id: u64,

  #[command(flatten)]
  pub paging: PagingArgs,
}

/// Handle the runs command
pub(crate) fn handle_runs_command(context: &Context, runs: RunsArgs) -> Result<()> {
  match runs.subcommand {
    RunsSubcommands::Create(args) => handle_create_command(context, args),
    RunsSubcommands::Update(args) => handle_update_command(context, args),
    RunsSubcommands::Get(args) => handle_get_command(context, args),
    RunsSubcommands::List(args) => handle_list_command(context, args),
    RunsSubcommands::Annotations(args) => handle_annotations_command(context, args),
  }
}

fn handle_create_command(context: &Context, args: CreateArgs) -> Result<()> {
  let mut new_check_run = NewCheckRun::new(args.name, args.head_sha);
  if let Some(status) = args.status {
    new_check_run = new_check_run.with_status(status);
  }
  if let Some(conclusion) = args.conclusion {
    if args.status.is_some_and(|status| status != CheckStatus::Completed) {
      bail!("--conclusion can only be combined with --status completed");
    }
    new_check_run = new_check_run.with_conclusion(conclusion);
  }
  if let Some(details_url) = args.details_url {
    new_check_run = new_check_run.with_details_url(details_url);
  }
  if let Some(external_id) = args.external_id {
    new_check_run = new_check_run.with_external_id(external_id);
  }
  if let Some(output) = args.output.output() {
    new_check_run = new_check_run.with_output(output);
  }

  let client = context.client()?;
  let rt = context.runtime()?;
  let check_run = rt.block_on(client.check_runs().create(&args.repo.repo, &new_check_run))?;

  if context.json {
    return print_json(&check_run);
  }
  print_success(&format!(
    "Created check run {} ({}) in {}",
    check_run.name.bold(),
    check_run.id,
    format_repo(&args.repo.repo.to_string())
  ));
  print_check_run(&check_run);
  Ok(())
}

fn handle_update_command(context: &Context, args: UpdateArgs) -> Result<()> {
  let mut update = CheckRunUpdate::new();
  if let Some(name) = args.name {
    update = update.with_name(name);
  }
  if let Some(status) = args.status {
    update = update.with_status(status);
  }
  if let Some(conclusion) = args.conclusion {
    if args.status.is_some_and(|status| status != CheckStatus::Completed) {
      bail!("--conclusion can only be combined with --status completed");
    }
    update = update.with_conclusion(conclusion);
  }
  update.details_url = args.details_url;
  if let Some(output) = args.output.output() {
    update = update.with_output(output);
  }

  if update.is_empty() {
    print_warning("Nothing to update; pass at least one field such as --status or --conclusion");
    return Ok(());
  }

  let client = context.client()?;
  let rt = context.runtime()?;
  let check_run = rt.block_on(client.check_runs().update(&args.repo.repo, args.check_run_id, &update))?;

  if context.json {
    return print_json(&check_run);
  }
  print_success(&format!("Updated check run {} ({})", check_run.name.bold(), check_run.id));
  print_check_run(&check_run);
  Ok(())
}

fn handle_get_command(context: &Context, args: GetArgs) -> Result<()> {
  let client = context.client()?;
  let rt = context.runtime()?;
  let check_run = rt.block_on(client.check_runs().get(&args.repo.repo, args.check_run_id))?;

  if context.json {
    return print_json(&check_run);
  }
  print_check_run(&check_run);
  Ok(())
}

fn handle_list_command(context: &Context, args: ListArgs) -> Result<()> {
  let client = context.client()?;
  let rt = context.runtime()?;
  let request = args.request();
  let options = args.paging.options();
  let repo = &args.repo.repo;

  if args.stream {
    let streaming = StreamingGitHubClient::new(client);
    let mut runs = match (&args.reference, args.suite) {
      (_, Some(suite_id)) => {
        streaming
          .check_runs()
          .get_all_for_check_suite(repo, suite_id, request.as_ref(), options.as_ref())
      }
      (Some(reference), None) => {
        streaming
          .check_runs()
          .get_all_for_reference(repo, reference, request.as_ref(), options.as_ref())
      }
      (None, None) => bail!("either REF or --suite is required"),
    };

    return rt.block_on(async {
      let mut count = 0usize;
      while let Some(check_run) = runs.next().await {
        let check_run = check_run?;
        count += 1;
        if context.json {
          print_json_line(&check_run)?;
        } else {
          println!("{}", format_run_line(&check_run));
        }
      }
      if !context.json && count == 0 {
        print_info("No check runs found");
      }
      Ok::<_, anyhow::Error>(())
    });
  }

  let response = rt.block_on(async {
    match (&args.reference, args.suite) {
      (_, Some(suite_id)) => {
        client
          .check_runs()
          .get_all_for_check_suite(repo, suite_id, request.as_ref(), options.as_ref())
          .await
      }
      (Some(reference), None) => {
        client
          .check_runs()
          .get_all_for_reference(repo, reference, request.as_ref(), options.as_ref())
          .await
      }
      (None, None) => Err(GitHubError::argument("reference", "either REF or --suite is required")),
    }
  })?;

  if context.json {
    return print_json(&response);
  }

  if response.check_runs.is_empty() {
    print_info("No check runs found");
    return Ok(());
  }

  println!(
    "{}",
    format!("Check runs ({} of {})", response.check_runs.len(), response.total_count)
      .bold()
      .underline()
  );
  println!("\n{}", runs_table(&response.check_runs));
  Ok(())
}

fn handle_annotations_command(context: &Context, args: AnnotationsArgs) -> Result<()> {
  let client = context.client()?;
  let rt = context.runtime()?;
  let options = args.paging.options();
  let annotations = rt.block_on(
    client
      .check_runs()
      .get_all_annotations(&args.repo.repo, args.check_run_id, options.as_ref()),
  )?;

  if context.json {
    return print_json(&annotations);
  }

  if annotations.is_empty() {
    print_info(&format!("Check run {} has no annotations", args.check_run_id));
    return Ok(());
  }
  println!("\n{}", annotations_table(&annotations));
  Ok(())
}

#[derive(Tabled)]
struct CheckRunRow {
  #[tabled(rename = "ID")]
  id: u64,
  #[tabled(rename = "Name")]
  name: String,
  #[tabled(rename = "Status")]
  status: String,
  #[tabled(rename = "Head SHA")]
  head_sha: String,
  #[tabled(rename = "Started")]
  started: String,
}

#[derive(Tabled)]
struct AnnotationRow {
  #[tabled(rename = "Level")]
  level: String,
  #[tabled(rename = "Location")]
  location: String,
  #[tabled(rename = "Message")]
  message: String,
}

fn short_sha(sha: &str) -> String {
  sha.chars().take(7).collect()
}

fn runs_table(check_runs: &[CheckRun]) -> String {
  let rows: Vec<CheckRunRow> = check_runs
    .iter()
    .map(|run| CheckRunRow {
      id: run.id,
      name: truncate_string(&run.name, 40),
      status: format_check_status(Some(&run.status), run.conclusion.as_ref()),
      head_sha: short_sha(&run.head_sha),
      started: run
        .started_at
        .map(|started| started.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string()),
    })
    .collect();

  Table::new(rows).with(Style::sharp()).to_string()
}

fn annotations_table(annotations: &[CheckRunAnnotation]) -> String {
  let rows: Vec<AnnotationRow> = annotations
    .iter()
    .map(|annotation| AnnotationRow {
      level: annotation
        .annotation_level
        .as_ref()
        .map(|level| level.to_string())
        .unwrap_or_else(|| "-".to_string()),
      location: if annotation.start_line == annotation.end_line {
        format!("{}:{}", annotation.path, annotation.start_line)
      } else {
        format!("{}:{}-{}", annotation.path, annotation.start_line, annotation.end_line)
      },
      message: truncate_string(annotation.message.as_deref().unwrap_or_default(), 60),
    })
    .collect();

  Table::new(rows).with(Style::sharp()).to_string()
}

fn format_run_line(check_run: &CheckRun) -> String {
  format!(
    "{:>12}  {:<11}  {}  {}",
    check_run.id,
    format_check_status(Some(&check_run.status), check_run.conclusion.as_ref()),
    short_sha(&check_run.head_sha).yellow(),
    check_run.name
  )
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
  timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Wall time between start and completion, e.g. `1m 05s`
fn run_duration(check_run: &CheckRun) -> Option<String> {
  let elapsed = check_run.completed_at? - check_run.started_at?;
  let seconds = elapsed.num_seconds();
  if seconds < 0 {
    return None;
  }
  Some(match seconds {
    0..60 => format!("{seconds}s"),
    60..3600 => format!("{}m {:02}s", seconds / 60, seconds % 60),
    _ => format!("{}h {:02}m", seconds / 3600, (seconds % 3600) / 60),
  })
}

fn print_check_run(check_run: &CheckRun) {
  println!("  ID: {}", check_run.id);
  println!("  Name: {}", check_run.name);
  println!("  Head SHA: {}", check_run.head_sha);
  println!(
    "  Status: {}",
    format_check_status(Some(&check_run.status), check_run.conclusion.as_ref())
  );
  if let Some(started_at) = check_run.started_at {
    println!("  Started: {}", format_timestamp(started_at));
  }
  if let Some(completed_at) = check_run.completed_at {
    println!("  Completed: {}", format_timestamp(completed_at));
  }
  if let Some(elapsed) = run_duration(check_run) {
    println!("  Duration: {elapsed}");
  }
  if let Some(title) = &check_run.output.title {
    println!("  Title: {title}");
  }
  if check_run.output.annotations_count > 0 {
    println!("  Annotations: {}", check_run.output.annotations_count);
  }
  if let Some(html_url) = &check_run.html_url {
    println!("  URL: {}", html_url.cyan());
  }
}
