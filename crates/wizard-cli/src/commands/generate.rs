//! `wizard generate:backend` and `wizard generate:frontend`.
//!
//! Answers come from flags when given, otherwise from prompts. A flag value
//! that fails validation is a user error; a prompted one is asked again.

use std::path::Path;

use serde_json::json;
use tracing::{info, instrument};

use wizard_adapters::LocalFilesystem;
use wizard_core::prelude::{
    AnswerValidator, DomainError, GenerationOutcome, ProjectAnswers, ProjectType,
    ScaffoldService,
};

use crate::{
    cli::GenerateArgs,
    commands::{Workspace, renderer},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt::{TerminalPrompter, ask_choice, ask_text},
};

/// Generate a project of `project_type` in a new folder below the current
/// directory.
#[instrument(skip_all, fields(project_type = %project_type))]
pub fn execute(
    project_type: ProjectType,
    args: GenerateArgs,
    node_version: Option<String>,
    app: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let workspace = Workspace::load()?;
    workspace.context.require_outside()?;

    output.warning(&format!("Generating {project_type}..."))?;
    let answers = collect_answers(project_type, &args, node_version, &workspace)?;

    let service = ScaffoldService::new(Box::new(LocalFilesystem::new()), Box::new(renderer(app)?));
    let outcome = service.create_project(
        &workspace.context,
        &workspace.config,
        project_type,
        &answers,
        &TerminalPrompter::new(args.confirm.yes),
    )?;

    match outcome {
        GenerationOutcome::Declined => {
            output.info("Nothing was generated.")?;
        }
        GenerationOutcome::Generated { folders, files } => {
            info!(folders, files = files.len(), "Project generated");
            if output.is_json() {
                output.json(&json!({
                    "projectType": project_type.as_str(),
                    "folder": answers.folder_name,
                    "folders": folders,
                    "files": files,
                }))?;
                return Ok(());
            }
            for file in &files {
                output.print(&format!("New file: {file}"))?;
            }
            output.success(&format!(
                "{} generated in {}/",
                answers.project_name, answers.folder_name
            ))?;
            output.print("")?;
            output.print("Next steps:")?;
            output.print(&format!("  cd {}", answers.folder_name))?;
            output.print("  wizard env:build")?;
        }
    }

    Ok(())
}

fn collect_answers(
    project_type: ProjectType,
    args: &GenerateArgs,
    node_version: Option<String>,
    workspace: &Workspace,
) -> CliResult<ProjectAnswers> {
    let root = workspace.context.root();

    let project_name = answer(args.name.as_deref(), "Project name :", |v| {
        AnswerValidator::project_name(v)
    })?;
    let author_name = answer(args.author.as_deref(), "Author name :", |v| {
        AnswerValidator::author_name(v)
    })?;
    let folder_name = answer(args.folder.as_deref(), "Folder name :", |v| {
        AnswerValidator::folder_name(v, folder_exists(root, v))
    })?;

    let node_version = if project_type.asks_node_version() {
        Some(pick_node_version(node_version, &workspace.config.node_versions)?)
    } else {
        None
    };

    Ok(ProjectAnswers::new(
        project_name,
        author_name,
        folder_name,
        node_version,
    ))
}

/// Validate a flag value, or prompt until the answer is valid.
fn answer<F>(flag: Option<&str>, prompt: &str, validate: F) -> CliResult<String>
where
    F: Fn(&str) -> Result<(), DomainError>,
{
    match flag {
        Some(value) => {
            let value = value.trim();
            validate(value)?;
            Ok(value.to_owned())
        }
        None => ask_text(prompt, validate),
    }
}

fn pick_node_version(flag: Option<String>, choices: &[String]) -> CliResult<String> {
    match flag {
        Some(version) if choices.contains(&version) => Ok(version),
        Some(version) => Err(CliError::InvalidInput {
            message: format!(
                "node version {version} is not one of: {}",
                choices.join(", ")
            ),
        }),
        None => ask_choice("Node version :", choices),
    }
}

fn folder_exists(root: &Path, folder: &str) -> bool {
    !folder.trim().is_empty() && root.join(folder.trim()).exists()
}
