//! `wizard env:*`: Docker environments of generated projects.

use std::time::Instant;

use tracing::instrument;

use wizard_adapters::LocalFilesystem;
use wizard_core::prelude::{EnvironmentService, LogOptions, ProjectType, TestSelection};

use crate::{
    cli::{BuildArgs, LogsArgs, StopArgs, TestArgs, TimedArgs},
    commands::{Workspace, build_type, runner},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// The operation an `env:*` command performs.
#[derive(Debug, Clone)]
pub enum EnvAction {
    Build(BuildArgs),
    Run(TimedArgs),
    Stop(StopArgs),
    Ssh,
    Logs(LogsArgs),
    Format(TimedArgs),
    Test(TestArgs),
}

#[instrument(skip_all, fields(action = ?action))]
pub fn execute(
    action: EnvAction,
    dry_run: bool,
    app: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let workspace = Workspace::load()?;
    let (context, config) = (&workspace.context, &workspace.config);
    let service = EnvironmentService::new(
        Box::new(runner(output, dry_run)),
        Box::new(LocalFilesystem::new()),
    );
    let started = Instant::now();

    match action {
        EnvAction::Build(args) => {
            let build = build_type(args.selected(), app)?;
            // Checked here as well so nothing is printed for a wrong directory.
            context.require(&ProjectType::ALL)?;
            output.success(&format!("Creating environment for {build}"))?;
            service.build(context, config, build)?;
            output.duration(started.elapsed())?;
        }
        EnvAction::Run(args) => {
            service.run_app(context, config)?;
            if args.duration {
                output.duration(started.elapsed())?;
            }
        }
        EnvAction::Stop(args) => {
            service.stop(context, config, args.clean)?;
            output.success("Environment stopped")?;
        }
        EnvAction::Ssh => service.ssh(context, config)?,
        EnvAction::Logs(args) => {
            let options = LogOptions {
                follow: args.follow,
                timestamps: args.timestamps,
            };
            service.logs(context, config, args.database, options)?;
        }
        EnvAction::Format(args) => {
            service.format_code(context, config)?;
            if args.duration {
                output.duration(started.elapsed())?;
            }
        }
        EnvAction::Test(args) => {
            let selection = TestSelection {
                coverage: args.coverage,
                file: args.file,
                path: args.path,
            };
            service.test(context, config, &selection)?;
            output.duration(started.elapsed())?;
        }
    }

    Ok(())
}
