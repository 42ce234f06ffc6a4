//! Flags accepted by every subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// More log output: -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain output without ANSI colours (honours NO_COLOR).
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from FILE instead of the platform config directory.
    ///
    /// There is no short form: `-c` belongs to `env:test --coverage`.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print docker commands without running them.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// How results are printed.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

/// Rendering of command results on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human when stdout is a terminal, plain otherwise.
    #[default]
    Auto,
    Human,
    Plain,
    /// One JSON document per command, for scripts.
    Json,
}
