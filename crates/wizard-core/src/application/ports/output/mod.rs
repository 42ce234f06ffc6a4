//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `wizard-adapters` crate provides implementations.

use serde_json::Value;
use std::path::Path;

use crate::domain::Invocation;
use crate::error::WizardResult;

/// Port for filesystem operations.
///
/// Implemented by `wizard_adapters::LocalFilesystem` and, for the
/// integration tests, `wizard_adapters::MemoryFilesystem`.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories. Idempotent.
    fn create_dir_all(&self, path: &Path) -> WizardResult<()>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> WizardResult<()>;

    /// Append content to a file, creating it when missing.
    fn append_file(&self, path: &Path, content: &str) -> WizardResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> WizardResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `wizard_adapters::renderer::JinjaRenderer` (embedded or on-disk templates)
pub trait TemplateRenderer: Send + Sync {
    /// Suffix of template resources, without the dot.
    fn extension(&self) -> &str;

    /// Render the template at `template` with `props` bound as its context.
    fn render(&self, template: &str, props: Option<&Value>) -> WizardResult<String>;
}

/// Port for running external programs.
///
/// Implemented by:
/// - `wizard_adapters::process::SystemProcessRunner` (inherits stdio, blocks)
/// - `wizard_adapters::process::RecordingRunner` (testing)
///
/// A non-zero exit must surface as `ApplicationError::CommandFailed`.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> WizardResult<()>;
}

/// Port for yes/no confirmations.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    fn confirm(&self, message: &str) -> WizardResult<bool>;
}
