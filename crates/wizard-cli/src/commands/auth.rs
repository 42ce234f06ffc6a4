//! `wizard generate:auth` (alias `make:auth`).

use serde_json::json;
use tracing::instrument;

use wizard_adapters::LocalFilesystem;
use wizard_core::prelude::{FeatureReport, FeatureService};

use crate::{
    cli::ConfirmArgs,
    commands::{Workspace, renderer},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompt::TerminalPrompter,
};

#[instrument(skip_all)]
pub fn execute(args: ConfirmArgs, app: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let workspace = Workspace::load()?;
    let service = FeatureService::new(Box::new(LocalFilesystem::new()), Box::new(renderer(app)?));

    let report = service.add_authentication(
        &workspace.context,
        &workspace.config,
        &TerminalPrompter::new(args.yes),
    )?;

    match report {
        None => output.info("Nothing was generated.")?,
        Some(report) if output.is_json() => output.json(&to_json(&report))?,
        Some(report) => print_report(&report, output)?,
    }
    Ok(())
}

fn print_report(report: &FeatureReport, output: &OutputManager) -> std::io::Result<()> {
    for file in &report.files {
        output.print(&format!("New file: {file}"))?;
    }

    for group in &report.dependencies.groups {
        for dep in &group.added {
            output.print(&format!("Added {} {} to {}", dep.name, dep.version, group.group))?;
        }
        for dep in &group.skipped {
            output.warning(&format!("{} already in {}", dep.name, group.group))?;
        }
    }

    for route in &report.routes {
        output.print(&format!("New route: /{} in {}", route.path, report.routes_file))?;
    }
    for file in &report.env_files {
        output.print(&format!(
            "Environment variables {} added to {file}",
            report.variables.join(", ")
        ))?;
    }

    output.success("Authentication generated")?;
    if report.dependencies.added_count() > 0 {
        output.info("Run `wizard env:build` to install the new dependencies.")?;
    }
    Ok(())
}

fn to_json(report: &FeatureReport) -> serde_json::Value {
    let dependencies: Vec<_> = report
        .dependencies
        .groups
        .iter()
        .map(|g| {
            json!({
                "group": g.group,
                "added": g.added.iter().map(|d| &d.name).collect::<Vec<_>>(),
                "skipped": g.skipped.iter().map(|d| &d.name).collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({
        "files": report.files,
        "dependencies": dependencies,
        "routesFile": report.routes_file,
        "routes": report.routes.iter().map(|r| &r.name).collect::<Vec<_>>(),
        "envFiles": report.env_files,
        "variables": report.variables,
    })
}
