//! User settings for the `wizard` binary.
//!
//! These tune how the tool behaves (output, template overrides, default
//! build); they are separate from the per-project `.wizard` marker and from
//! the embedded docker/knex configuration in the core crate.
//!
//! Later sources override earlier ones:
//!
//! 1. Defaults below
//! 2. Config file (`--config`, else the platform config dir, optional)
//! 3. `WIZARD_*` environment variables, `__` between sections
//!    (`WIZARD_TEMPLATES__LOCAL_PATH=./templates`)
//!
//! Command-line flags are applied on top by the commands themselves.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub templates: TemplateConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose templates override the embedded ones.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Build type used when no `--dev/--test/--prod` flag is given.
    pub default_build: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            default_build: "development".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and the environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let defaults = toml::to_string(&Self::default())
            .context("Failed to serialise default configuration")?;

        let config = Config::builder()
            .add_source(File::from_str(&defaults, FileFormat::Toml))
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("WIZARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        config
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// `config.toml` in the platform config directory, or `.wizard.toml`
    /// in the working directory when no home directory is known.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "wizard", "wizard")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".wizard.toml"))
    }

    /// The template override directory, if one is configured.
    pub fn template_override(&self) -> Option<&Path> {
        self.templates.local_path.as_deref()
    }

    /// Look up a dotted key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "output.no_color" => Some(self.output.no_color.to_string()),
            "output.format" => Some(self.output.format.clone()),
            "templates.local_path" => Some(
                self.templates
                    .local_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            "environment.default_build" => Some(self.environment.default_build.clone()),
            _ => None,
        }
    }
}
