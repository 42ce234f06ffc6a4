//! Terminal prompts.
//!
//! Confirmations go through the core `Prompter` port; free-text answers and
//! choices are only needed by the generators and stay in the CLI. Without
//! the `interactive` feature every prompt fails and answers must come from
//! flags.

use wizard_core::prelude::{ApplicationError, DomainError, Prompter, WizardResult};

use crate::error::{CliError, CliResult};

/// `Prompter` backed by the terminal. `--yes` answers every confirmation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> WizardResult<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        confirm_on_terminal(message)
    }
}

#[cfg(feature = "interactive")]
fn confirm_on_terminal(message: &str) -> WizardResult<bool> {
    // Esc counts as "no".
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact_opt()
        .map(|answer| answer.unwrap_or(false))
        .map_err(|err| {
            ApplicationError::PromptFailed {
                reason: err.to_string(),
            }
            .into()
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_on_terminal(_message: &str) -> WizardResult<bool> {
    Err(ApplicationError::PromptFailed {
        reason: "interactive prompts are disabled in this build, pass --yes".into(),
    }
    .into())
}

/// Ask for a line of text until `validate` accepts it.
#[cfg(feature = "interactive")]
pub fn ask_text<F>(prompt: &str, validate: F) -> CliResult<String>
where
    F: Fn(&str) -> Result<(), DomainError>,
{
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| validate(input).map_err(|e| reason(&e)))
        .interact_text()
        .map(|value| value.trim().to_owned())
        .map_err(prompt_error)
}

#[cfg(not(feature = "interactive"))]
pub fn ask_text<F>(_prompt: &str, _validate: F) -> CliResult<String>
where
    F: Fn(&str) -> Result<(), DomainError>,
{
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

/// Pick one of `items`; the first is preselected.
#[cfg(feature = "interactive")]
pub fn ask_choice(prompt: &str, items: &[String]) -> CliResult<String> {
    let index = dialoguer::Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(prompt_error)?
        .ok_or(CliError::Cancelled)?;
    items.get(index).cloned().ok_or(CliError::Cancelled)
}

#[cfg(not(feature = "interactive"))]
pub fn ask_choice(_prompt: &str, _items: &[String]) -> CliResult<String> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(feature = "interactive")]
fn prompt_error(err: dialoguer::Error) -> CliError {
    match err {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            CliError::Cancelled
        }
        other => CliError::Core(
            ApplicationError::PromptFailed {
                reason: other.to_string(),
            }
            .into(),
        ),
    }
}

/// Validation message shown under the prompt.
fn reason(err: &DomainError) -> String {
    match err {
        DomainError::InvalidInput { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assume_yes_confirms_without_a_terminal() {
        assert!(TerminalPrompter::new(true).confirm("Generate?").unwrap());
    }

    #[test]
    fn validation_reason_drops_the_field_name() {
        let err = DomainError::InvalidInput {
            field: "folderName".into(),
            reason: "Folder already exists".into(),
        };
        assert_eq!(reason(&err), "Folder already exists");
        assert_eq!(reason(&DomainError::InsideProject), DomainError::InsideProject.to_string());
    }
}
