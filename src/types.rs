//! Core types for mr-kickoff

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Category label prefixed onto generated branch names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKind {
    /// New functionality
    #[default]
    Feature,
    /// Urgent fix against a release
    Hotfix,
    /// Regular defect fix
    Bugfix,
    /// Release preparation
    Release,
}

impl BranchKind {
    /// Lowercase form used in branch names
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Hotfix => "hotfix",
            Self::Bugfix => "bugfix",
            Self::Release => "release",
        }
    }

    /// Capitalized form used in merge request titles
    pub const fn capitalized(self) -> &'static str {
        match self {
            Self::Feature => "Feature",
            Self::Hotfix => "Hotfix",
            Self::Bugfix => "Bugfix",
            Self::Release => "Release",
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commit and merge request author identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

/// Task metadata driving one workflow run
///
/// Immutable input; everything else in a run is derived from this plus the
/// live repository and server state.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    /// Ticket identifier (e.g. "JIRA-42")
    pub ticket_id: Option<String>,
    /// Free-text ticket title used in the merge request title
    pub ticket_title: String,
    /// Short task slug, `[a-z0-9_]+` when present
    pub task_slug: Option<String>,
    /// Branch kind prefix
    pub kind: BranchKind,
    /// Branch new work branches from and merge requests target
    pub base_branch: String,
    /// Message for the initial commit
    pub commit_message: String,
    /// Author identity for the commit and merge request
    pub author: Author,
    /// Optional path to a merge request description file
    pub description_file: Option<PathBuf>,
}

/// Canonical branch name and merge request title derived from a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPlan {
    /// Branch name, `{kind}/{id?}_{slug?}-short`
    pub branch_name: String,
    /// Merge request title, `[{Kind}][{id?}] {title}`
    pub mr_title: String,
}

/// Combined local/remote presence of a branch name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Not found anywhere
    Absent,
    /// Local ref only
    LocalOnly,
    /// On at least one remote, no local ref
    RemoteOnly,
    /// Local ref and at least one remote
    Both,
}

impl Presence {
    /// Whether the branch exists anywhere
    pub const fn exists(self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Human-readable location for prompts and error messages
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Absent => "nowhere",
            Self::LocalOnly => "locally",
            Self::RemoteOnly => "on a remote",
            Self::Both => "locally and on a remote",
        }
    }
}

/// Snapshot of where a branch name exists right now
///
/// Produced fresh on every run; never cached across runs, since branch and
/// merge request state can change between invocations.
#[derive(Debug, Clone, Default)]
pub struct ExistenceReport {
    /// Whether `refs/heads/<name>` resolves locally
    pub local: bool,
    /// Remotes on which the branch exists
    pub remotes: Vec<String>,
    /// First open merge request with the branch as source, if any
    pub open_mr: Option<MergeRequest>,
}

impl ExistenceReport {
    /// Classify combined local/remote presence
    pub fn presence(&self) -> Presence {
        match (self.local, !self.remotes.is_empty()) {
            (false, false) => Presence::Absent,
            (true, false) => Presence::LocalOnly,
            (false, true) => Presence::RemoteOnly,
            (true, true) => Presence::Both,
        }
    }
}

/// Which side of the index a change set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// Paths already staged in the index
    Staged,
    /// Working-tree modifications staged after operator confirmation
    AllModified,
    /// Nothing to commit
    Empty,
}

/// Files that will go into the initial commit
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Paths relative to the repository root
    pub files: Vec<String>,
    /// How the set was derived
    pub source: ChangeSource,
}

impl ChangeSet {
    /// True when there is nothing to commit
    pub fn is_empty(&self) -> bool {
        matches!(self.source, ChangeSource::Empty) || self.files.is_empty()
    }
}

/// An open merge request on the hosting server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Project-scoped merge request id
    pub iid: u64,
    /// Web URL
    pub web_url: String,
    /// Source branch name
    pub source_branch: String,
    /// Target branch name
    pub target_branch: String,
    /// Title
    pub title: String,
    /// Description body, if any
    pub description: Option<String>,
    /// Server-side author id, if reported
    pub author_id: Option<u64>,
    /// Creation timestamp, if reported
    pub created_at: Option<DateTime<Utc>>,
}

/// A hosting-server user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostUser {
    /// Display name
    pub name: String,
    /// Email, when visible to the token
    pub email: Option<String>,
}

/// Fields submitted when opening a merge request
#[derive(Debug, Clone)]
pub struct NewMergeRequest {
    /// Source branch
    pub source_branch: String,
    /// Target branch
    pub target_branch: String,
    /// Title
    pub title: String,
    /// Optional description body
    pub description: Option<String>,
    /// Optional author metadata forwarded to the server
    pub author: Option<Author>,
    /// Collapse source-branch commits into one on merge
    pub squash: bool,
}

/// Commit to create on the new branch
#[derive(Debug, Clone)]
pub struct CommitSpec {
    /// Commit message
    pub message: String,
    /// Explicit author identity
    pub author: Author,
    /// Files going into the commit, for reporting
    pub files: Vec<String>,
}

/// The single terminal outcome selected by the reconciliation engine
#[derive(Debug, Clone)]
pub enum ActionPlan {
    /// Create the branch at HEAD, optionally commit, push, optionally open
    /// a merge request
    CreateBranch {
        /// Branch to create
        branch: String,
        /// Initial commit, absent for a branch-only creation
        commit: Option<CommitSpec>,
        /// Merge request to open after the push, if requested
        merge_request: Option<NewMergeRequest>,
    },
    /// The branch already exists; push it if it is missing from the push
    /// remote, then open a merge request for it
    OpenMrForExisting {
        /// Existing branch name
        branch: String,
        /// Whether the branch still has to be pushed first
        needs_push: bool,
        /// Merge request to open
        merge_request: NewMergeRequest,
    },
}
