//! Failures raised while a service drives a port.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Exit status reported by a process stopped with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Port-level failures, as opposed to broken domain rules.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Template lookup failed.
    #[error("Template not found: {template}")]
    TemplateNotFound { template: String },

    #[error("Template rendering failed for {template}: {reason}")]
    RenderingFailed { template: String, reason: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Refused to overwrite an existing file.
    #[error("File already exists: {path}")]
    FileExists { path: PathBuf },

    /// A subprocess could not be started.
    #[error("Failed to start `{program}`: {reason}")]
    CommandNotStarted { program: String, reason: String },

    /// A subprocess exited unsuccessfully.
    #[error("Command `{command}` failed{}", exit_suffix(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// Interactive prompt failed (no TTY, closed stdin).
    #[error("Prompt failed: {reason}")]
    PromptFailed { reason: String },
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" with exit code {c}")).unwrap_or_default()
}

impl ApplicationError {
    /// `true` when a subprocess was stopped by the user.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            Self::CommandFailed {
                code: Some(INTERRUPTED_EXIT_CODE),
                ..
            }
        )
    }

    /// Hints shown below the message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { template } => vec![
                format!("No template named {template} is available"),
                "Check templates.local_path in your configuration".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Path involved: {}", path.display()),
                "Is the location writable by your user?".into(),
            ],
            Self::FileExists { path } => vec![
                format!("Remove or rename {} first", path.display()),
                "Or choose a different name".into(),
            ],
            Self::CommandNotStarted { program, .. } => vec![
                format!("Make sure `{program}` is installed and on your PATH"),
            ],
            Self::CommandFailed { .. } => vec![
                "See the command output above".into(),
                "Is the environment running? Try `wizard env:build`".into(),
            ],
            Self::PromptFailed { .. } => vec![
                "Pass the answers as flags to run without a terminal".into(),
            ],
            Self::RenderingFailed { .. } => vec!["Check the template syntax".into()],
        }
    }

    /// Coarse bucket the CLI maps to an exit code.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::FileExists { .. } => ErrorCategory::Validation,
            Self::CommandNotStarted { .. } | Self::CommandFailed { .. } => ErrorCategory::External,
            Self::FilesystemError { .. }
            | Self::RenderingFailed { .. }
            | Self::PromptFailed { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_130_is_an_interrupt() {
        let err = ApplicationError::CommandFailed {
            command: "docker exec -it node sh".into(),
            code: Some(130),
        };
        assert!(err.is_interrupted());
        assert!(err.to_string().contains("exit code 130"));

        let killed = ApplicationError::CommandFailed {
            command: "docker logs node".into(),
            code: None,
        };
        assert!(!killed.is_interrupted());
        assert_eq!(killed.to_string(), "Command `docker logs node` failed");
    }
}
