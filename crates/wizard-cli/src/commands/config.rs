//! `wizard config`: inspect and initialise the configuration file.

use std::path::Path;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key).ok_or_else(|| CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            })?;
            output.print(&format!("{key} = {value:?}"))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(config)?;
                return Ok(());
            }
            output.header("Settings in effect:")?;
            output.print(&to_toml(config)?)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }

        ConfigCommands::Init { force } => {
            let path = AppConfig::config_path();
            if path.exists() && !force {
                output.warning(&format!(
                    "{} exists; pass --force to replace it",
                    path.display(),
                ))?;
                return Ok(());
            }
            write_default(&path)?;
            output.success(&format!("Wrote {}", path.display()))?;
        }
    }

    Ok(())
}

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("cannot encode settings as TOML: {e}"),
        source: Some(Box::new(e)),
    })
}

fn write_default(path: &Path) -> CliResult<()> {
    let contents = to_toml(&AppConfig::default())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, contents)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}
