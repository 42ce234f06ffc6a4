//! Errors surfaced to the terminal.
//!
//! Every failure ends up as a [`CliError`], which knows its exit code and
//! a few hints on how to get past it.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use wizard_core::application::{ApplicationError, INTERRUPTED_EXIT_CODE};
use wizard_core::domain::DomainError;
use wizard_core::error::{ErrorCategory as CoreCategory, WizardError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A flag or answer was rejected.
    #[error("{message}")]
    InvalidInput { message: String },

    /// The command does not apply to the current directory.
    #[error("You can only run this command in projects of type: {expected}")]
    WrongProject {
        expected: String,
        found: Option<String>,
    },

    /// Settings file unreadable or holding a bad value.
    #[error("Bad configuration: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Anything else coming out of `wizard-core` or the adapters.
    #[error(transparent)]
    Core(WizardError),

    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A prompt was dismissed.
    #[error("Cancelled")]
    Cancelled,

    /// A subprocess was stopped with Ctrl-C.
    #[error("Interrupted")]
    Interrupted,

    /// The binary was built without a cargo feature the command needs.
    #[error("This build has no '{feature}' support")]
    FeatureNotAvailable { feature: &'static str },

    /// docker or docker-compose exited non-zero.
    #[error("Command exited with an error: {command}")]
    ExternalCommandFailed { command: String, code: Option<i32> },
}

impl From<WizardError> for CliError {
    fn from(err: WizardError) -> Self {
        if err.is_interrupted() {
            return Self::Interrupted;
        }
        match err {
            WizardError::Domain(DomainError::WrongProject { expected, found }) => {
                Self::WrongProject { expected, found }
            }
            WizardError::Application(ApplicationError::CommandFailed { command, code }) => {
                Self::ExternalCommandFailed { command, code }
            }
            other => Self::Core(other),
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        WizardError::from(err).into()
    }
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        let message = format!("I/O failure: {source}");
        Self::IoError { message, source }
    }
}

impl CliError {
    /// Hints printed under the message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Fix the value and retry ({message})"),
                "Run the command with --help to see its flags".into(),
            ],

            Self::WrongProject { expected, found } => {
                let mut out = vec![format!("This command needs a {expected} project")];
                match found {
                    Some(found) => out.push(format!("The current project is of type {found}")),
                    None => out.push("No .wizard file was found in the current directory".into()),
                }
                out.push("cd into a project generated by wizard and try again".into());
                out
            }

            Self::ConfigError { message, .. } => vec![
                message.clone(),
                format!(
                    "Settings are read from {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "`wizard config init --force` writes a fresh default file".into(),
            ],

            Self::Core(inner) => inner.suggestions(),

            Self::IoError { .. } => vec!["Is the directory writable?".into()],

            Self::Cancelled => vec!["Nothing was changed".into()],

            Self::Interrupted => Vec::new(),

            Self::FeatureNotAvailable { feature } => vec![
                format!("Reinstall with `cargo install wizard-cli --features {feature}`"),
                "or pass every answer as a flag together with --yes".into(),
            ],

            Self::ExternalCommandFailed { command, .. } => vec![
                format!("See the output of `{command}` above"),
                "Is the environment running? Try `wizard env:build`".into(),
            ],
        }
    }

    /// Bucket deciding the exit code and log level.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::WrongProject { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Context | CoreCategory::Document => {
                    ErrorCategory::UserError
                }
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::External | CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::ExternalCommandFailed { .. } => ErrorCategory::Internal,
            Self::Interrupted => ErrorCategory::Interrupted,
        }
    }

    /// Process exit status; see the table in `main.rs`.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
            ErrorCategory::Interrupted => INTERRUPTED_EXIT_CODE as u8,
        }
    }

    /// Ctrl-C already told the user what happened.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Message, causes (with `verbose`) and hints, styled for a terminal.
    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    /// Same layout as [`Self::format_colored`] without escape codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, color: bool) -> String {
        let paint = |text: String, style: fn(&str) -> String| {
            if color { style(&text) } else { text }
        };

        let mut out = String::from("\n");
        out += &paint(format!("\u{2717} Error: {self}"), |t| t.red().bold().to_string());
        out.push('\n');

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                out += &paint(format!("  caused by: {err}"), |t| t.dimmed().to_string());
                out.push('\n');
                cause = err.source();
            }
        }

        let hints = self.suggestions();
        if !hints.is_empty() {
            out.push('\n');
            out += &paint("Hints:".into(), |t| t.yellow().bold().to_string());
            out.push('\n');
            for hint in hints {
                out += &format!("  - {hint}\n");
            }
        }

        if !verbose {
            out.push('\n');
            out += &paint("Run again with -v to see the cause.".into(), |t| {
                t.dimmed().to_string()
            });
            out.push('\n');
        }
        out
    }

    /// Emit a tracing event at a level matching the category.
    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, "{self}")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, "{self}")
            }
            ErrorCategory::Interrupted => tracing::info!("stopped with Ctrl-C"),
        }
        if let Some(source) = self.source() {
            tracing::debug!(%source, "underlying error");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad flag, bad answer or wrong directory.
    UserError,
    NotFound,
    Configuration,
    /// Failed subprocess or local I/O.
    Internal,
    Interrupted,
}

/// Attach a message to an io failure while converting it.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}
