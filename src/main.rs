mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::issue::{self, IssueCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;
use crate::infra::gitlab::GitLabClient;
use crate::infra::openai::OpenAiClient;
use crate::infra::terminal::TerminalPrompt;
use crate::workflow::review::ReviewOptions;
use crate::workflow::{deploy, open_mr, report, review, summary};

#[derive(Parser)]
#[command(name = "labctl", author, version, about = "Personal GitLab workflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an issue from a template, plus a branch and merge request.
    Create(CreateArgs),
    /// Review the current branch's merge request: track time, add reviewers.
    Review(ReviewArgs),
    /// Show commits from the last two weeks.
    Summary(SummaryArgs),
    /// Log an incident as a closed, time-tracked issue.
    Report(ReportArgs),
    /// Show the last successful production deployment.
    Deploy,
    /// Open the current branch's merge request in the browser.
    Open,
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Title of the issue.
    #[arg(required = true, num_args = 1..)]
    title: Vec<String>,
    /// Id or URL-encoded path of the target project.
    #[arg(long)]
    project_id: Option<String>,
    /// Pick the milestone manually instead of the currently active one.
    #[arg(short, long)]
    milestone: bool,
    /// Skip milestone selection.
    #[arg(long)]
    no_milestone: bool,
    /// Skip iteration selection.
    #[arg(long)]
    no_iteration: bool,
    /// Skip epic selection.
    #[arg(long)]
    no_epic: bool,
    /// Create only the issue, no branch or merge request.
    #[arg(long)]
    only_issue: bool,
}

#[derive(Args)]
struct ReviewArgs {
    /// Merge automatically once the pipeline succeeds.
    #[arg(short = 'a', long)]
    auto_merge: bool,
    /// Pick reviewers interactively instead of the configured defaults.
    #[arg(long)]
    select: bool,
    /// Post an AI code review to the merge request.
    #[arg(long)]
    ai: bool,
}

#[derive(Args)]
struct SummaryArgs {
    /// Summarize the commits with the language model.
    #[arg(long)]
    ai: bool,
}

#[derive(Args)]
struct ReportArgs {
    /// What happened.
    text: String,
    /// Minutes spent dealing with it.
    minutes: u32,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Config commands work before anything is configured.
    if let Commands::Config(args) = &cli.command {
        return config_cmd::run(args.command.clone());
    }

    let config = AppConfig::load()?;
    let ctx = build_context(config)?;

    match cli.command {
        Commands::Create(args) => {
            issue::run(
                &ctx,
                IssueCommandArgs {
                    title: args.title.join(" "),
                    project_id: args.project_id,
                    manual_milestone: args.milestone,
                    no_milestone: args.no_milestone,
                    no_iteration: args.no_iteration,
                    no_epic: args.no_epic,
                    only_issue: args.only_issue,
                },
            )
            .await?;
            Ok(())
        }
        Commands::Review(args) => {
            review::run(
                &ctx,
                ReviewOptions {
                    auto_merge: args.auto_merge,
                    select_reviewers: args.select,
                    ai: args.ai,
                },
            )
            .await
        }
        Commands::Summary(args) => summary::run(&ctx, args.ai).await,
        Commands::Report(args) => report::run(&ctx, &args.text, args.minutes).await,
        Commands::Deploy => deploy::run(&ctx).await,
        Commands::Open => open_mr::run(&ctx).await,
        Commands::Config(_) => unreachable!("handled above"),
    }
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    let cwd = std::env::current_dir()?;

    let platform = Arc::new(GitLabClient::new(
        config.api_url(),
        &config.token,
        config.group_id.clone(),
    )?);
    let version_control = Arc::new(GitCli::new(cwd));
    let prompt = Arc::new(TerminalPrompt::new());
    let language_model = Arc::new(OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    ));

    Ok(AppContext::new(
        config,
        platform,
        version_control,
        prompt,
        language_model,
    ))
}
