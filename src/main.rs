//! kickoff - branch and merge request bootstrapping for GitLab
//!
//! CLI binary that derives a branch name from ticket metadata, creates the
//! branch from the base branch, and optionally opens a merge request.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use mr_kickoff::types::{Author, BranchKind, TaskRequest};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "kickoff")]
#[command(about = "Create a task branch and optionally open a GitLab merge request")]
#[command(version)]
struct Cli {
    /// Path to the local git repository
    #[arg(long, default_value = ".")]
    project_path: PathBuf,

    /// Ticket identifier (e.g. JIRA-42)
    #[arg(long)]
    ticket_id: Option<String>,

    /// Ticket title, used in the merge request title
    #[arg(long)]
    ticket_title: String,

    /// Short task slug (lowercase latin letters, digits, underscores)
    #[arg(long)]
    task_slug: Option<String>,

    /// Branch kind prefix
    #[arg(long, value_enum, default_value = "feature")]
    branch_kind: KindArg,

    /// Base branch to branch from and target with the merge request
    #[arg(long, default_value = "dev")]
    base_branch: String,

    /// Message for the initial commit
    #[arg(long, default_value = "first commit")]
    commit_message: String,

    /// GitLab project id
    #[arg(long)]
    project_id: u64,

    /// GitLab base URL
    #[arg(long, default_value = "https://gitlab.com/")]
    base_url: String,

    /// GitLab access token (falls back to the GITLAB_TOKEN environment variable)
    #[arg(long)]
    token: Option<String>,

    /// Author name for the commit and merge request
    #[arg(long)]
    author_name: String,

    /// Author email for the commit and merge request
    #[arg(long)]
    author_email: String,

    /// Merge request description file, relative to the project path
    #[arg(long, default_value = ".gitlab/merge_request_templates/Default.md")]
    mr_description_file: PathBuf,

    /// Additional PEM CA bundle for self-hosted instances
    #[arg(long)]
    ca_cert_file: Option<PathBuf>,

    /// Also open a merge request after the branch is pushed
    #[arg(long)]
    create_mr: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Feature,
    Hotfix,
    Bugfix,
    Release,
}

impl From<KindArg> for BranchKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Feature => Self::Feature,
            KindArg::Hotfix => Self::Hotfix,
            KindArg::Bugfix => Self::Bugfix,
            KindArg::Release => Self::Release,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let token = args
        .token
        .or_else(|| env::var("GITLAB_TOKEN").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("no GitLab token: pass --token or set GITLAB_TOKEN")
        })?;

    let task = TaskRequest {
        ticket_id: args.ticket_id,
        ticket_title: args.ticket_title,
        task_slug: args.task_slug,
        kind: args.branch_kind.into(),
        base_branch: args.base_branch,
        commit_message: args.commit_message,
        author: Author {
            name: args.author_name,
            email: args.author_email,
        },
        description_file: Some(args.project_path.join(&args.mr_description_file)),
    };

    cli::run_kickoff(cli::KickoffConfig {
        task,
        project_path: args.project_path,
        project_id: args.project_id,
        base_url: args.base_url,
        token,
        ca_cert_file: args.ca_cert_file,
        create_mr: args.create_mr,
    })
    .await?;

    Ok(())
}
