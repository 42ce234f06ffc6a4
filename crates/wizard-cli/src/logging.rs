//! Tracing subscriber setup.
//!
//! Core and adapters only emit events; the binary decides where they go.
//! Events are written to stderr so stdout stays usable for command output.
//!
//! | Flags     | Level |
//! |-----------|-------|
//! | `-q`      | error |
//! | (none)    | warn  |
//! | `-v`      | info  |
//! | `-vv`     | debug |
//! | `-vvv`    | trace |
//!
//! A `RUST_LOG` directive replaces the flag-derived filter entirely.

use std::io::IsTerminal as _;

use anyhow::Context as _;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Crates whose events pass the flag-derived filter.
const TARGETS: [&str; 4] = ["wizard", "wizard_cli", "wizard_core", "wizard_adapters"];

/// Install the global subscriber. Fails when one is already installed.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directives(level(args)))
            .context("Invalid log filter")?,
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("Failed to initialise tracing")
}

fn level(args: &GlobalArgs) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn directives(level: LevelFilter) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
