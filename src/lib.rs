//! mr-kickoff - branch and merge request bootstrapping
//!
//! Derives a canonical branch name and merge request title from task
//! metadata, probes where that branch already exists (local refs, every
//! configured remote, the server's open merge requests), and reconciles
//! that state into exactly one branch/MR creation plan, confirmed
//! interactively and executed in strict order.

pub mod error;
pub mod naming;
pub mod platform;
pub mod repo;
pub mod types;
pub mod workflow;
