//! Shell completion generation.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::cli::{Cli, CompletionsArgs, Shell};
use crate::error::CliResult;

const BIN_NAME: &str = "wizard";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    write_completions(args.shell, &mut std::io::stdout())
}

fn write_completions(shell: Shell, out: &mut dyn Write) -> CliResult<()> {
    let mut cmd = Cli::command();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, BIN_NAME, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, BIN_NAME, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, BIN_NAME, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, BIN_NAME, out),
        Shell::Elvish => generate(shells::Elvish, &mut cmd, BIN_NAME, out),
    };

    Ok(())
}
