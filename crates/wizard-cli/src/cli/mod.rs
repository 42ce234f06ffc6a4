//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use wizard_core::domain::BuildType;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

const BANNER: &str = r"
      __      __.__                         .___
     /  \    /  \__|____________ _______  __| _/
     \   \/\/   /  \___   /\__  \\_  __ \/ __ |
      \        /|  |/    /  / __ \|  | \/ /_/ |
       \__/\  / |__/_____ \(____  /__|  \____ |
            \/           \/     \/           \/
";

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "wizard",
    bin_name = "wizard",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Project generators and Docker development environments",
    long_about = "Wizard generates express backends and react frontends, \
                  runs them in Docker and wraps Knex migrations.",
    before_help = BANNER,
    after_help = "EXAMPLES:\n\
        \x20 wizard generate:backend\n\
        \x20 wizard env:build --dev\n\
        \x20 wizard migrate:make \"create users\"\n\
        \x20 wizard completions bash > /usr/share/bash-completion/completions/wizard",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate an express application.
    #[command(
        name = "generate:backend",
        after_help = "EXAMPLES:\n\
            \x20 wizard generate:backend\n\
            \x20 wizard generate:backend --name \"Shop Api\" --author Jo --folder shop --node-version 12.16.1 -y"
    )]
    GenerateBackend(BackendArgs),

    /// Generate a react application.
    #[command(name = "generate:frontend")]
    GenerateFrontend(GenerateArgs),

    /// Add authentication to the current express project.
    #[command(name = "generate:auth", visible_alias = "make:auth")]
    GenerateAuth(ConfirmArgs),

    /// Build the docker environment and run the build steps.
    #[command(name = "env:build")]
    EnvBuild(BuildArgs),

    /// Run the app in its container.
    #[command(name = "env:run")]
    EnvRun(TimedArgs),

    /// Stop the docker environment.
    #[command(name = "env:stop")]
    EnvStop(StopArgs),

    /// Open a shell in the app container.
    #[command(name = "env:ssh")]
    EnvSsh,

    /// Show the logs of the app or database container.
    #[command(name = "env:logs")]
    EnvLogs(LogsArgs),

    /// Format the code inside the app container.
    #[command(name = "env:format")]
    EnvFormat(TimedArgs),

    /// Run the tests inside the app container.
    #[command(
        name = "env:test",
        after_help = "Tests are looked up in dist/tests, so compile first."
    )]
    EnvTest(TestArgs),

    /// Run all pending migrations.
    #[command(name = "migrate:latest")]
    MigrateLatest,

    /// Roll back the last batch of migrations.
    #[command(name = "migrate:rollback")]
    MigrateRollback,

    /// Show the current migration version.
    #[command(name = "migrate:version")]
    MigrateVersion,

    /// Create a migration file from the project's stub.
    #[command(name = "migrate:make")]
    MigrateMake(MakeArgs),

    /// Create a seed file from the project's stub.
    #[command(name = "seed:make")]
    SeedMake(MakeArgs),

    /// Run the seed files.
    #[command(name = "seed:run")]
    SeedRun,

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 wizard completions bash > ~/.local/share/bash-completion/completions/wizard\n\
            \x20 wizard completions zsh  > ~/.zfunc/_wizard\n\
            \x20 wizard completions fish > ~/.config/fish/completions/wizard.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Wizard configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 wizard config get environment.default_build\n\
            \x20 wizard config list\n\
            \x20 wizard config init"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Answers for the project generators; missing ones are prompted for.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Project name (at most 30 characters).
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Author name (at most 30 characters).
    #[arg(long = "author", value_name = "AUTHOR")]
    pub author: Option<String>,

    /// Folder to generate into; must not exist.
    #[arg(long = "folder", value_name = "FOLDER")]
    pub folder: Option<String>,

    #[command(flatten)]
    pub confirm: ConfirmArgs,
}

/// `generate:backend` also asks for the Node.js version.
#[derive(Debug, Clone, Default, Args)]
pub struct BackendArgs {
    #[command(flatten)]
    pub answers: GenerateArgs,

    /// Node.js version of the generated project.
    #[arg(long = "node-version", value_name = "VERSION")]
    pub node_version: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ConfirmArgs {
    /// Skip confirmation prompts.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

// ── env ───────────────────────────────────────────────────────────────────────

/// Build type selection; at most one flag.
#[derive(Debug, Clone, Copy, Default, Args)]
#[command(group(ArgGroup::new("build").args(["dev", "test", "prod"]).multiple(false)))]
pub struct BuildArgs {
    /// Development build (default).
    #[arg(long = "dev")]
    pub dev: bool,

    /// Testing build.
    #[arg(long = "test")]
    pub test: bool,

    /// Production build.
    #[arg(long = "prod")]
    pub prod: bool,
}

impl BuildArgs {
    /// The selected build type, if a flag was given.
    pub fn selected(self) -> Option<BuildType> {
        match (self.dev, self.test, self.prod) {
            (_, true, _) => Some(BuildType::Testing),
            (_, _, true) => Some(BuildType::Production),
            (true, _, _) => Some(BuildType::Development),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct TimedArgs {
    /// Print how long the command took.
    #[arg(short = 'd', long = "duration")]
    pub duration: bool,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct StopArgs {
    /// Also remove containers, images and volumes.
    #[arg(long = "clean")]
    pub clean: bool,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LogsArgs {
    /// Follow log output.
    #[arg(short = 'f', long = "follow")]
    pub follow: bool,

    /// Show timestamps.
    #[arg(short = 't', long = "timestamps")]
    pub timestamps: bool,

    /// Show the database container instead of the app.
    #[arg(long = "db")]
    pub database: bool,
}

#[derive(Debug, Clone, Default, Args)]
#[command(group(ArgGroup::new("selection").args(["file", "path"]).multiple(false)))]
pub struct TestArgs {
    /// Collect test coverage.
    #[arg(short = 'c', long = "coverage")]
    pub coverage: bool,

    /// Run `dist/tests/**/<NAME>.test.js` only.
    #[arg(long = "file", value_name = "NAME")]
    pub file: Option<String>,

    /// Run every test under `dist/tests/<DIR>`.
    #[arg(long = "path", value_name = "DIR")]
    pub path: Option<String>,
}

// ── database ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Args)]
pub struct MakeArgs {
    /// File name; words are joined with `_`. Prompted for when absent.
    #[arg(value_name = "NAME", num_args = 0..)]
    pub words: Vec<String>,
}

impl MakeArgs {
    /// The name as typed, unquoted words joined by spaces.
    pub fn name(&self) -> Option<String> {
        (!self.words.is_empty()).then(|| self.words.join(" "))
    }
}

// ── completions / config ──────────────────────────────────────────────────────

/// Arguments for `wizard completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

/// Sub-commands of `wizard config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one configuration value.
    Get {
        /// Dotted key, e.g. `output.format`.
        key: String,
    },
    /// Print the effective configuration as TOML.
    List,
    /// Print the default configuration file path.
    Path,
    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
