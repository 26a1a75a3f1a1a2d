//! Hosting-server services
//!
//! Abstracts merge request operations behind a trait so the reconciliation
//! workflow can run against a scripted server in tests.

mod gitlab;

pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{HostUser, MergeRequest, NewMergeRequest};
use async_trait::async_trait;

/// Hosting-server operations consumed by the workflow
#[async_trait]
pub trait HostingService: Send + Sync {
    /// Find an open merge request whose source branch is `source_branch`
    ///
    /// At most the first match is reported; the caller never needs more
    /// than one to detect a duplicate.
    async fn find_open_mr(&self, source_branch: &str) -> Result<Option<MergeRequest>>;

    /// Open a merge request
    async fn create_mr(&self, request: &NewMergeRequest) -> Result<MergeRequest>;

    /// Look up a user by server-side id
    async fn get_user(&self, id: u64) -> Result<HostUser>;
}
