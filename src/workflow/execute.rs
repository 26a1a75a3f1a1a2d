//! Action plan execution
//!
//! Performs the side effects in strict order: branch creation/checkout,
//! commit, push, merge request. A failure stops the sequence; completed
//! steps are not rolled back, and the resulting error names exactly what
//! already succeeded so the operator can resume manually.

use crate::error::{Error, Result};
use crate::platform::HostingService;
use crate::repo::Repository;
use crate::types::{ActionPlan, HostUser, MergeRequest};
use tracing::{info, warn};

/// What one executed run produced
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Branch the run operated on
    pub branch: String,
    /// Whether the branch was created during this run
    pub created: bool,
    /// Whether the branch was pushed during this run
    pub pushed: bool,
    /// Files included in the initial commit (empty for branch-only runs)
    pub committed_files: Vec<String>,
    /// Merge request created during this run, if any
    pub merge_request: Option<MergeRequest>,
    /// Merge request author details, when the lookup succeeded
    pub mr_author: Option<HostUser>,
}

/// Execute a terminal action plan.
///
/// A merge request is only ever submitted after the branch push for the
/// same run has completed.
pub async fn execute(
    plan: ActionPlan,
    repo: &dyn Repository,
    host: &dyn HostingService,
) -> Result<ExecutionReport> {
    match plan {
        ActionPlan::CreateBranch {
            branch,
            commit,
            merge_request,
        } => {
            let remote = repo.push_remote()?;
            let mut completed = Vec::new();

            repo.create_branch(&branch)?;
            completed.push(format!("created branch '{branch}'"));
            repo.checkout(&branch)
                .map_err(|e| partial(&completed, e))?;
            completed.push(format!("checked out '{branch}'"));

            let committed_files = match &commit {
                Some(spec) => {
                    repo.commit(&spec.message, &spec.author)
                        .map_err(|e| partial(&completed, e))?;
                    completed.push(format!("committed {} file(s)", spec.files.len()));
                    spec.files.clone()
                }
                None => Vec::new(),
            };

            push_branch(repo, &remote, &branch).map_err(|e| partial(&completed, e))?;
            completed.push(format!("pushed '{branch}' to '{remote}'"));
            info!(branch = %branch, remote = %remote, "branch created and pushed");

            let mr = match merge_request {
                Some(spec) => Some(
                    host.create_mr(&spec)
                        .await
                        .map_err(|e| partial(&completed, e))?,
                ),
                None => None,
            };
            let mr_author = fetch_mr_author(host, mr.as_ref()).await;

            Ok(ExecutionReport {
                branch,
                created: true,
                pushed: true,
                committed_files,
                merge_request: mr,
                mr_author,
            })
        }

        ActionPlan::OpenMrForExisting {
            branch,
            needs_push,
            merge_request,
        } => {
            let mut completed = Vec::new();
            if needs_push {
                let remote = repo.push_remote()?;
                push_branch(repo, &remote, &branch)?;
                completed.push(format!("pushed '{branch}' to '{remote}'"));
                info!(branch = %branch, remote = %remote, "existing branch pushed");
            }

            let mr = host
                .create_mr(&merge_request)
                .await
                .map_err(|e| partial(&completed, e))?;
            let mr_author = fetch_mr_author(host, Some(&mr)).await;

            Ok(ExecutionReport {
                branch,
                created: false,
                pushed: needs_push,
                committed_files: Vec::new(),
                merge_request: Some(mr),
                mr_author,
            })
        }
    }
}

fn push_branch(repo: &dyn Repository, remote: &str, branch: &str) -> Result<()> {
    let refspec = format!("{branch}:{branch}");
    repo.push(remote, &refspec)
}

/// Best-effort author lookup for the final summary; never fatal.
async fn fetch_mr_author(host: &dyn HostingService, mr: Option<&MergeRequest>) -> Option<HostUser> {
    let id = mr.and_then(|mr| mr.author_id)?;
    match host.get_user(id).await {
        Ok(user) => Some(user),
        Err(err) => {
            warn!(user_id = id, error = %err, "merge request author lookup failed");
            None
        }
    }
}

fn partial(completed: &[String], err: Error) -> Error {
    if completed.is_empty() {
        err
    } else {
        Error::Partial {
            completed: completed.join(", "),
            failed: err.to_string(),
        }
    }
}
