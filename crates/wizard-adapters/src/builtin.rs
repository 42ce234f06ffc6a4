//! Built-in configuration shipped with the binary.
//!
//! The YAML document is parsed into [`WizardConfig`] and validated once;
//! callers get a typed value or a configuration error, never a partial one.

use tracing::{debug, instrument};

use wizard_core::{
    domain::WizardConfig,
    error::{WizardError, WizardResult},
};

const BUILTIN_CONFIG: &str = include_str!("../assets/wizard.yaml");

/// Load and validate the embedded configuration.
#[instrument]
pub fn builtin_config() -> WizardResult<WizardConfig> {
    parse_config(BUILTIN_CONFIG)
}

/// Parse and validate a configuration document.
pub fn parse_config(source: &str) -> WizardResult<WizardConfig> {
    let config: WizardConfig =
        serde_yaml::from_str(source).map_err(|e| WizardError::Configuration {
            message: e.to_string(),
        })?;
    config.validate()?;
    debug!(
        projects = config.projects.len(),
        runtimes = config.runtimes.len(),
        "Configuration loaded"
    );
    Ok(config)
}
