//! Command handlers.
//!
//! Each handler turns parsed arguments into calls on a core service and
//! reports the result. Shared wiring lives here.

pub mod auth;
pub mod completions;
pub mod config;
pub mod database;
pub mod env;
pub mod generate;

use std::path::PathBuf;

use tracing::debug;

use wizard_adapters::{JinjaRenderer, LocalFilesystem, SystemProcessRunner, builtin_config};
use wizard_core::prelude::{BuildType, ProjectContext, WizardConfig};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    runner::ReportingRunner,
};

/// Everything a command needs to know about where it runs.
pub struct Workspace {
    pub context: ProjectContext,
    pub config: WizardConfig,
}

impl Workspace {
    /// Read the marker in the current directory and the built-in config.
    pub fn load() -> CliResult<Self> {
        let root = std::env::current_dir()
            .with_cli_context(|| "Failed to read the current directory")?;
        Self::load_at(root)
    }

    pub fn load_at(root: PathBuf) -> CliResult<Self> {
        let context = ProjectContext::load(&LocalFilesystem::new(), &root)?;
        let config = builtin_config()?;
        debug!(root = %root.display(), project = context.is_project(), "Workspace loaded");
        Ok(Self { context, config })
    }
}

/// Renderer over the embedded templates, or the configured override directory.
pub fn renderer(app: &AppConfig) -> CliResult<JinjaRenderer> {
    match app.template_override() {
        Some(dir) => Ok(JinjaRenderer::with_overrides(dir)?),
        None => Ok(JinjaRenderer::embedded()),
    }
}

/// Runner that announces each command, or only prints it with `--dry-run`.
pub fn runner(output: &OutputManager, dry_run: bool) -> ReportingRunner<SystemProcessRunner> {
    ReportingRunner::new(SystemProcessRunner::new(), output.clone(), dry_run)
}

/// Build type from the flags, else `environment.default_build`.
pub fn build_type(selected: Option<BuildType>, app: &AppConfig) -> CliResult<BuildType> {
    if let Some(build) = selected {
        return Ok(build);
    }
    app.environment
        .default_build
        .parse()
        .map_err(|e: wizard_core::prelude::DomainError| CliError::ConfigError {
            message: format!("environment.default_build: {e}"),
            source: Some(Box::new(e)),
        })
}
