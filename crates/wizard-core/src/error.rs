//! The one error type every public operation of this crate returns.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WizardError {
    /// A rule about answers, project kinds or documents was broken.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A port failed while a service was running.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// The embedded settings could not be parsed.
    #[error("Broken built-in settings: {message}")]
    Configuration { message: String },
}

impl WizardError {
    /// Hints for the person at the terminal.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { .. } => {
                vec!["Check templates.local_path if you override the templates".into()]
            }
        }
    }

    /// Used by the CLI to choose an exit code.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => {
                use crate::domain::ErrorCategory as Domain;
                match e.category() {
                    Domain::Validation => ErrorCategory::Validation,
                    Domain::Context => ErrorCategory::Context,
                    Domain::Configuration => ErrorCategory::Configuration,
                    Domain::Document => ErrorCategory::Document,
                }
            }
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }

    /// `true` when a subprocess was stopped by the user.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Application(e) if e.is_interrupted())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Context,
    NotFound,
    Configuration,
    Document,
    External,
    Internal,
}

pub type WizardResult<T> = Result<T, WizardError>;
