//! Knex wrappers: `migrate:*` and `seed:*`.

use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use tracing::instrument;

use wizard_adapters::LocalFilesystem;
use wizard_core::prelude::{
    AnswerValidator, DatabaseFileKind, DatabaseService, EnvCommand, EnvironmentService,
    ProjectType,
};

use crate::{
    cli::MakeArgs,
    commands::{Workspace, runner},
    error::CliResult,
    output::OutputManager,
    prompt::ask_text,
};

/// Run one of the Knex commands inside the app container.
#[instrument(skip_all, fields(command = command.as_str()))]
pub fn run(command: EnvCommand, dry_run: bool, output: &OutputManager) -> CliResult<()> {
    let workspace = Workspace::load()?;
    EnvironmentService::new(
        Box::new(runner(output, dry_run)),
        Box::new(LocalFilesystem::new()),
    )
    .database(&workspace.context, &workspace.config, command)?;
    Ok(())
}

/// Create a migration or seed file from the project's stub.
#[instrument(skip_all, fields(kind = kind.label()))]
pub fn make(kind: DatabaseFileKind, args: MakeArgs, output: &OutputManager) -> CliResult<()> {
    let workspace = Workspace::load()?;
    // Fail on the wrong directory before asking for a name.
    workspace.context.require(&[ProjectType::BackendExpress])?;

    let started = Instant::now();
    let name = match args.name() {
        Some(name) => name,
        None => ask_text("Name :", |v| AnswerValidator::required("name", v))?,
    };

    let path = DatabaseService::new(Box::new(LocalFilesystem::new())).make_file(
        &workspace.context,
        &workspace.config,
        kind,
        &name,
        Utc::now(),
    )?;

    if output.is_json() {
        output.json(&json!({ "kind": kind.label(), "path": path }))?;
        return Ok(());
    }
    output.success(&format!("New {}: {}", kind.label(), path.display()))?;
    output.duration(started.elapsed())?;
    Ok(())
}
