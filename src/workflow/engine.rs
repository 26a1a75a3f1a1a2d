//! Branch/MR reconciliation state machine
//!
//! Combines the derived branch plan, the existence probe, and the resolved
//! change set into exactly one terminal action plan, asking for
//! confirmation before every irreversible step. The probe report gates all
//! creation paths so a duplicate branch or merge request is never created
//! silently.

use crate::error::{Error, Result};
use crate::platform::HostingService;
use crate::repo::Repository;
use crate::types::{
    ActionPlan, BranchPlan, CommitSpec, ExistenceReport, MergeRequest, NewMergeRequest, Presence,
    TaskRequest,
};
use crate::workflow::{probe, resolve_change_set, Prompter};
use tracing::{debug, info};

/// State of the branch name under consideration
#[derive(Debug, Clone)]
pub enum BranchState {
    /// The name is unused everywhere
    Absent,
    /// The branch exists (somewhere) without an open merge request
    ExistsNoMr(Presence),
    /// The branch exists and has an open merge request
    ExistsWithMr(MergeRequest),
    /// The currently checked-out branch is the target itself
    CurrentMatchesTarget(Presence),
}

/// Classify the probe report against the freshly-read current branch.
pub fn classify(report: &ExistenceReport, current_branch: &str, target: &str) -> BranchState {
    if let Some(mr) = &report.open_mr {
        return BranchState::ExistsWithMr(mr.clone());
    }
    let presence = report.presence();
    if current_branch == target {
        return BranchState::CurrentMatchesTarget(presence);
    }
    if presence.exists() {
        return BranchState::ExistsNoMr(presence);
    }
    BranchState::Absent
}

/// Run the reconciliation protocol to a single terminal [`ActionPlan`].
///
/// `open_mr_requested` is the run-level flag asking for a merge request in
/// addition to the branch; existing-branch states may upgrade it after an
/// explicit confirmation.
pub async fn reconcile(
    task: &TaskRequest,
    plan: &BranchPlan,
    repo: &dyn Repository,
    host: &dyn HostingService,
    prompter: &dyn Prompter,
    open_mr_requested: bool,
) -> Result<ActionPlan> {
    let report = probe(repo, host, &plan.branch_name).await?;
    // The current branch is read from the repository immediately before
    // each decision; operator-driven switches between steps are part of
    // the protocol.
    let current = repo.current_branch()?;
    let state = classify(&report, &current, &plan.branch_name);
    debug!(branch = %plan.branch_name, ?state, "classified branch state");

    match state {
        BranchState::ExistsWithMr(mr) => {
            prompter.report(&format!(
                "An open merge request already exists for '{}': {}",
                plan.branch_name, mr.web_url
            ));
            Err(Error::Duplicate {
                branch: plan.branch_name.clone(),
                location: report.presence().describe().to_string(),
                url: mr.web_url,
            })
        }

        BranchState::ExistsNoMr(presence) => {
            let question = format!(
                "Branch '{}' already exists {} but has no open merge request. Open one?",
                plan.branch_name,
                presence.describe()
            );
            if !prompter.confirm(&question)? {
                return Err(Error::UserAborted(
                    "merge request creation for the existing branch declined".to_string(),
                ));
            }
            Ok(ActionPlan::OpenMrForExisting {
                branch: plan.branch_name.clone(),
                needs_push: report.remotes.is_empty(),
                merge_request: new_mr_spec(task, plan, prompter),
            })
        }

        BranchState::CurrentMatchesTarget(_) => {
            prompter.report(&format!(
                "The current branch already matches the target '{}'.",
                plan.branch_name
            ));
            if !prompter.confirm("Push it if needed and open a merge request right away?")? {
                return Err(Error::UserAborted(
                    "merge request creation for the current branch declined".to_string(),
                ));
            }
            Ok(ActionPlan::OpenMrForExisting {
                branch: plan.branch_name.clone(),
                needs_push: report.remotes.is_empty(),
                merge_request: new_mr_spec(task, plan, prompter),
            })
        }

        BranchState::Absent => reconcile_absent(task, plan, repo, prompter, open_mr_requested),
    }
}

/// Creation path: the branch name is unused everywhere.
fn reconcile_absent(
    task: &TaskRequest,
    plan: &BranchPlan,
    repo: &dyn Repository,
    prompter: &dyn Prompter,
    open_mr_requested: bool,
) -> Result<ActionPlan> {
    // Re-read rather than reuse the classification-time value; the
    // operator may have switched branches since.
    let current = repo.current_branch()?;
    if current != task.base_branch {
        let question = format!(
            "You are on '{current}', not on '{}'. Switch to '{}'?",
            task.base_branch, task.base_branch
        );
        if !prompter.confirm(&question)? {
            return Err(Error::WrongBranch {
                expected: task.base_branch.clone(),
                actual: current.to_string(),
            });
        }
        repo.checkout(&task.base_branch)?;
        info!(branch = %task.base_branch, "switched to base branch");
        prompter.report(&format!("Switched to '{}'.", task.base_branch));
    }

    let change_set = resolve_change_set(repo, prompter)?;

    let commit = if change_set.is_empty() {
        let question = format!(
            "No changes to commit. Create branch '{}' without a commit?",
            plan.branch_name
        );
        if !prompter.confirm(&question)? {
            return Err(Error::NoChanges(format!(
                "nothing to commit on '{}'",
                task.base_branch
            )));
        }
        None
    } else {
        Some(CommitSpec {
            message: task.commit_message.clone(),
            author: task.author.clone(),
            files: change_set.files.clone(),
        })
    };

    let merge_request = open_mr_requested.then(|| new_mr_spec(task, plan, prompter));

    // Final confirmation with the full summary of what is about to happen.
    prompter.report("About to:");
    prompter.report(&format!("  Project:  {}", repo.project_name()));
    prompter.report(&format!("  Branch:   {}", plan.branch_name));
    prompter.report(&format!("  Base:     {}", task.base_branch));
    prompter.report(&format!("  Author:   {}", task.author.name));
    prompter.report(&format!("  Email:    {}", task.author.email));
    match &commit {
        Some(spec) => {
            prompter.report(&format!("  Files:    {}", spec.files.join(", ")));
        }
        None => prompter.report("  Files:    (no commit)"),
    }
    if let Some(mr) = &merge_request {
        prompter.report(&format!("  MR title: {}", mr.title));
        prompter.report(&format!("  MR body:  {}", match &mr.description {
            Some(_) => "from description file",
            None => "(none)",
        }));
    }
    let verb = if merge_request.is_some() {
        "create the branch, push it, and open the merge request"
    } else {
        "create and push the branch"
    };
    if !prompter.confirm(&format!("Proceed ({verb})?"))? {
        return Err(Error::UserAborted("final confirmation declined".to_string()));
    }

    Ok(ActionPlan::CreateBranch {
        branch: plan.branch_name.clone(),
        commit,
        merge_request,
    })
}

/// Build the merge request spec, loading the description best-effort.
///
/// A missing or unreadable description file is reported but never fails
/// the plan; the merge request is simply created without a body.
fn new_mr_spec(task: &TaskRequest, plan: &BranchPlan, prompter: &dyn Prompter) -> NewMergeRequest {
    let description = task.description_file.as_ref().and_then(|path| {
        match std::fs::read_to_string(path) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                prompter.report(&format!(
                    "Description file '{}' is not readable ({err}); the merge request will have no description.",
                    path.display()
                ));
                None
            }
        }
    });

    NewMergeRequest {
        source_branch: plan.branch_name.clone(),
        target_branch: task.base_branch.clone(),
        title: plan.mr_title.clone(),
        description,
        author: Some(task.author.clone()),
        squash: true,
    }
}
