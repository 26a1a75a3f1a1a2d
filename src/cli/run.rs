//! Kickoff command - derive the branch, reconcile, execute, summarize

use crate::cli::prompt::TerminalPrompter;
use crate::cli::style::{check, Stylize};
use anstream::println;
use mr_kickoff::error::Result;
use mr_kickoff::naming;
use mr_kickoff::platform::GitLabService;
use mr_kickoff::repo::GitCli;
use mr_kickoff::types::TaskRequest;
use mr_kickoff::workflow::{execute, reconcile, ExecutionReport};
use std::path::PathBuf;

/// Everything one kickoff run needs beyond the task itself
pub struct KickoffConfig {
    /// Task metadata
    pub task: TaskRequest,
    /// Path to the local repository
    pub project_path: PathBuf,
    /// GitLab project id
    pub project_id: u64,
    /// GitLab base URL
    pub base_url: String,
    /// GitLab access token
    pub token: String,
    /// Optional PEM CA bundle for self-hosted instances
    pub ca_cert_file: Option<PathBuf>,
    /// Also open a merge request after the branch is pushed
    pub create_mr: bool,
}

/// Run the kickoff command.
pub async fn run_kickoff(config: KickoffConfig) -> Result<()> {
    // Name derivation is pure and runs before any I/O, so bad input fails
    // before the repository or the server is touched.
    let plan = naming::derive(&config.task)?;
    println!("{} {}", "Branch:".emphasis(), plan.branch_name.accent());
    println!("{} {}", "MR title:".emphasis(), plan.mr_title.accent());
    println!();

    let repo = GitCli::open(&config.project_path)?;
    let host = GitLabService::new(
        &config.base_url,
        config.token.clone(),
        config.project_id,
        config.ca_cert_file.as_deref(),
    )?;
    let prompter = TerminalPrompter;

    let action = reconcile(
        &config.task,
        &plan,
        &repo,
        &host,
        &prompter,
        config.create_mr,
    )
    .await?;

    let report = execute(action, &repo, &host).await?;
    print_summary(&config.task.base_branch, &report);

    Ok(())
}

fn print_summary(base_branch: &str, report: &ExecutionReport) {
    println!();
    if report.created {
        println!(
            "{} Branch '{}' created and pushed.",
            check(),
            report.branch.accent()
        );
    } else if report.pushed {
        println!("{} Branch '{}' pushed.", check(), report.branch.accent());
    }
    if !report.committed_files.is_empty() {
        println!(
            "{} Committed: {}",
            check(),
            report.committed_files.join(", ")
        );
    }

    if let Some(mr) = &report.merge_request {
        println!("{} Merge request created", check());
        println!();
        println!("{}", mr.title.emphasis());
        println!("{}", mr.web_url.accent());
        println!();
        println!("{}", "--- Summary ---".muted());
        println!("Target branch: {base_branch}");
        match &mr.description {
            Some(_) => println!("Description:   from description file"),
            None => println!("Description:   (none)"),
        }
        if let Some(author) = &report.mr_author {
            println!("Author:        {}", author.name);
            println!(
                "Author email:  {}",
                author.email.as_deref().unwrap_or("(not visible)")
            );
        }
        if let Some(created_at) = mr.created_at {
            println!("Created at:    {created_at}");
        }
    }
}
