//! Existence probing for a candidate branch name
//!
//! This is the idempotency gate: every creation path consults the report
//! produced here before mutating anything.

use crate::error::Result;
use crate::platform::HostingService;
use crate::repo::Repository;
use crate::types::ExistenceReport;
use tracing::{debug, warn};

/// Probe local refs, every configured remote, and the hosting server's
/// open merge requests for `branch_name`.
///
/// A lookup failure on one remote is logged and treated as absence on that
/// remote; it never aborts the probe for the others.
pub async fn probe(
    repo: &dyn Repository,
    host: &dyn HostingService,
    branch_name: &str,
) -> Result<ExistenceReport> {
    let local = repo.ref_exists(branch_name)?;
    debug!(branch = branch_name, local, "probed local refs");

    let mut remotes = Vec::new();
    for remote in repo.remotes()? {
        match repo.remote_has_branch(&remote, branch_name) {
            Ok(true) => remotes.push(remote),
            Ok(false) => {}
            Err(err) => {
                warn!(
                    remote = %remote,
                    error = %err,
                    "remote lookup failed; treating branch as absent there"
                );
            }
        }
    }

    let open_mr = host.find_open_mr(branch_name).await?;

    Ok(ExistenceReport {
        local,
        remotes,
        open_mr,
    })
}
