//! Terminal prompter backed by dialoguer

use anstream::println;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use mr_kickoff::error::{Error, Result};
use mr_kickoff::workflow::Prompter;

/// Prompter that asks on the controlling terminal
///
/// Blocks indefinitely at each question; the tool is interactive-first and
/// has no timeout by design.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn report(&self, message: &str) {
        println!("{message}");
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}
