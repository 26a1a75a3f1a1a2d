//! Branch name and merge request title derivation
//!
//! Pure: identical task metadata always yields the identical
//! `(branch_name, mr_title)` pair. No I/O happens here.

use crate::error::{Error, Result};
use crate::types::{BranchPlan, TaskRequest};
use regex::Regex;
use std::sync::OnceLock;

/// Suffix appended to every generated branch name
const BRANCH_SUFFIX: &str = "-short";

fn slug_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9_]+$").expect("hardcoded slug pattern is valid"))
}

/// Derive the canonical branch name and merge request title for a task.
///
/// Fails with [`Error::Validation`] when both the ticket identifier and the
/// task slug are empty, or when a non-empty slug contains anything outside
/// lowercase latin letters, digits and underscores.
pub fn derive(task: &TaskRequest) -> Result<BranchPlan> {
    let ticket_id = task.ticket_id.as_deref().filter(|s| !s.is_empty());
    let slug = task.task_slug.as_deref().filter(|s| !s.is_empty());

    if let Some(slug) = slug {
        if !slug_pattern().is_match(slug) {
            return Err(Error::Validation(format!(
                "task slug '{slug}' may contain only lowercase latin letters, digits and underscores"
            )));
        }
    }

    let kind = task.kind;
    let (branch_name, mr_title) = match (ticket_id, slug) {
        (None, None) => {
            return Err(Error::Validation(
                "ticket id and task slug cannot both be empty".to_string(),
            ));
        }
        (None, Some(slug)) => (
            format!("{kind}/{slug}{BRANCH_SUFFIX}"),
            format!("[{}] {}", kind.capitalized(), task.ticket_title),
        ),
        (Some(id), Some(slug)) => (
            format!("{kind}/{id}_{slug}{BRANCH_SUFFIX}"),
            format!("[{}][{id}] {}", kind.capitalized(), task.ticket_title),
        ),
        (Some(id), None) => (
            format!("{kind}/{id}{BRANCH_SUFFIX}"),
            format!("[{}][{id}] {}", kind.capitalized(), task.ticket_title),
        ),
    };

    Ok(BranchPlan {
        branch_name,
        mr_title,
    })
}
