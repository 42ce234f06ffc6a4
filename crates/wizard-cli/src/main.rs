//! `wizard`: generates express backends and react frontends, drives their
//! Docker environments and wraps Knex migrations.
//!
//! `main` parses flags, installs logging, loads settings and hands the
//! command to [`run`]. Any [`CliError`] that comes back is printed and
//! turned into the process exit code:
//!
//! | Code | Meaning                         |
//! |------|---------------------------------|
//! |  0   | Success                         |
//! |  1   | Internal error, failed command  |
//! |  2   | User / input error              |
//! |  3   | Resource not found              |
//! |  4   | Configuration error             |
//! | 130  | Interrupted with Ctrl-C         |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use wizard_core::prelude::{DatabaseFileKind, EnvCommand, ProjectType};

use crate::{
    cli::{Cli, Commands},
    commands::env::EnvAction,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;
mod runner;

fn main() -> ExitCode {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too; clap picks the exit code.
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("wizard: cannot set up logging: {e:#}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        dry_run = cli.global.dry_run,
        "parsed arguments"
    );

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "configuration rejected");
            eprintln!("wizard: cannot load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;

    match run(cli, &config, &output) {
        Ok(()) => {
            info!("done");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Route a parsed command line to its handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let dry_run = cli.global.dry_run;
    let env = |action| commands::env::execute(action, dry_run, config, output);
    let knex = |command| commands::database::run(command, dry_run, output);

    match cli.command {
        Commands::GenerateBackend(args) => commands::generate::execute(
            ProjectType::BackendExpress,
            args.answers,
            args.node_version,
            config,
            output,
        ),
        Commands::GenerateFrontend(args) => {
            commands::generate::execute(ProjectType::FrontendReact, args, None, config, output)
        }
        Commands::GenerateAuth(args) => commands::auth::execute(args, config, output),

        Commands::EnvBuild(args) => env(EnvAction::Build(args)),
        Commands::EnvRun(args) => env(EnvAction::Run(args)),
        Commands::EnvStop(args) => env(EnvAction::Stop(args)),
        Commands::EnvSsh => env(EnvAction::Ssh),
        Commands::EnvLogs(args) => env(EnvAction::Logs(args)),
        Commands::EnvFormat(args) => env(EnvAction::Format(args)),
        Commands::EnvTest(args) => env(EnvAction::Test(args)),

        Commands::MigrateLatest => knex(EnvCommand::MigrateLatest),
        Commands::MigrateRollback => knex(EnvCommand::MigrateRollback),
        Commands::MigrateVersion => knex(EnvCommand::MigrateVersion),
        Commands::SeedRun => knex(EnvCommand::SeedRun),
        Commands::MigrateMake(args) => {
            commands::database::make(DatabaseFileKind::Migration, args, output)
        }
        Commands::SeedMake(args) => commands::database::make(DatabaseFileKind::Seed, args, output),

        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// Print `err` unless it is silent and return its exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // Ctrl-C inside a container.
    if !err.is_silent() {
        let colored = std::io::IsTerminal::is_terminal(&std::io::stderr());
        eprint!(
            "{}",
            if colored {
                err.format_colored(verbose)
            } else {
                err.format_plain(verbose)
            }
        );
    }

    ExitCode::from(err.exit_code())
}
