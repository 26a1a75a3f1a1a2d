//! Change set resolution
//!
//! Decides which files go into the initial commit: the staged paths when
//! the index is ahead of HEAD, otherwise the modified working-tree paths
//! after the operator agrees to stage them all.

use crate::error::{Error, Result};
use crate::repo::Repository;
use crate::types::{ChangeSet, ChangeSource};
use crate::workflow::Prompter;

/// Resolve the set of files to commit, interactively.
///
/// Returns an empty set when neither the index nor the working tree has
/// changes; callers decide whether that is acceptable for the selected
/// action.
pub fn resolve_change_set(repo: &dyn Repository, prompter: &dyn Prompter) -> Result<ChangeSet> {
    let staged = repo.staged_files()?;
    if !staged.is_empty() {
        report_files(prompter, "Staged files:", &staged);
        if !prompter.confirm("Continue with these staged files?")? {
            return Err(Error::UserAborted(
                "staged file set declined; stage the files you need and rerun".to_string(),
            ));
        }
        return Ok(ChangeSet {
            files: staged,
            source: ChangeSource::Staged,
        });
    }

    let modified = repo.modified_files()?;
    if !modified.is_empty() {
        report_files(prompter, "Modified files (nothing staged):", &modified);
        if !prompter.confirm("Stage all modified files for the initial commit?")? {
            return Err(Error::UserAborted(
                "staging declined; stage the files you need and rerun".to_string(),
            ));
        }
        repo.stage_all()?;
        // Re-derive from the index; the commit must never trust the
        // pre-staging listing.
        let staged = repo.staged_files()?;
        if staged.is_empty() {
            return Err(Error::NoChanges(
                "index still matches HEAD after staging".to_string(),
            ));
        }
        return Ok(ChangeSet {
            files: staged,
            source: ChangeSource::AllModified,
        });
    }

    Ok(ChangeSet {
        files: Vec::new(),
        source: ChangeSource::Empty,
    })
}

fn report_files(prompter: &dyn Prompter, heading: &str, files: &[String]) {
    prompter.report(heading);
    for file in files {
        prompter.report(&format!("  {file}"));
    }
}
