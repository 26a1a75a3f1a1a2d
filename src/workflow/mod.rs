//! Branch/MR reconciliation workflow
//!
//! One interactive run walks three phases:
//! 1. Probe - where does the derived branch name exist right now
//! 2. Reconcile - classify that state and pick one terminal action plan
//! 3. Execute - perform the plan's side effects in strict order

mod changes;
mod engine;
mod execute;
mod probe;
mod prompt;

pub use changes::resolve_change_set;
pub use engine::{classify, reconcile, BranchState};
pub use execute::{execute, ExecutionReport};
pub use probe::probe;
pub use prompt::Prompter;
