//! Error types for mr-kickoff

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the kickoff workflow
///
/// Every fatal kind propagates to the top level unmodified; none is retried
/// automatically, since each one requires different input or a different
/// operator decision.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed task slug or missing required identifiers
    #[error("invalid task: {0}")]
    Validation(String),

    /// Operator is not on the expected base branch and declined to switch
    #[error("expected to be on '{expected}' but currently on '{actual}'")]
    WrongBranch {
        /// The base branch the workflow needs
        expected: String,
        /// The branch actually checked out
        actual: String,
    },

    /// Target branch already exists with an open merge request
    #[error("branch '{branch}' already exists {location} and has an open merge request: {url}")]
    Duplicate {
        /// The derived branch name
        branch: String,
        /// Where the branch was found ("locally", "on a remote", ...)
        location: String,
        /// URL of the existing merge request
        url: String,
    },

    /// Nothing to commit when a commit-bearing plan was selected
    #[error("no changes to commit: {0}")]
    NoChanges(String),

    /// Operator declined a confirmation
    #[error("aborted: {0}")]
    UserAborted(String),

    /// A git command failed
    #[error("git: {0}")]
    Git(String),

    /// GitLab API rejected a request
    #[error("GitLab API: {0}")]
    Platform(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Terminal prompt could not be read
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Invalid configuration (bad base URL, unreadable certificate, ...)
    #[error("configuration: {0}")]
    Config(String),

    /// A plan partially completed before a step failed
    ///
    /// Steps already performed are not rolled back; the message names
    /// exactly what succeeded so the operator can resume manually.
    #[error("{failed} (already completed: {completed}; completed steps were not rolled back)")]
    Partial {
        /// Human-readable list of steps that succeeded
        completed: String,
        /// The failure that stopped the sequence
        failed: String,
    },
}
