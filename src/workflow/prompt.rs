//! Operator interaction capability
//!
//! Confirmation prompts block until the operator answers; abstracting them
//! behind a trait lets tests substitute a scripted responder for real
//! terminal I/O.

use crate::error::Result;

/// Blocking operator interaction used at each irreversible step
pub trait Prompter {
    /// Print an informational line to the operator
    fn report(&self, message: &str);

    /// Ask a yes/no question; `false` means the operator declined
    fn confirm(&self, prompt: &str) -> Result<bool>;
}
