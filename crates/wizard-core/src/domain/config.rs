//! Typed schema of the tool's built-in configuration.
//!
//! The schema is deserialized once at startup and checked with
//! [`WizardConfig::validate`]; nothing downstream looks keys up by string.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    CommandSpec, ConfigTree, ContainerSpec, DatabaseSettings, DependencyGroup, DomainError,
    Engine, EnvVariableGroup, ProjectType, RouteDescriptor, RoutesFormat, RuntimeDescriptor,
};

/// Root of the configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardConfig {
    /// Choices offered for `nodeVersion`.
    pub node_versions: Vec<String>,
    /// Files shared by every generated project.
    pub common: TemplateSet,
    pub projects: BTreeMap<ProjectType, ProjectSettings>,
    /// Container or service runtime parameters, by name.
    #[serde(default)]
    pub runtimes: BTreeMap<String, RuntimeDescriptor>,
}

/// A template root and the tree of files rendered from it.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSet {
    pub template: String,
    pub structure: ConfigTree,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSettings {
    pub generation: TemplateSet,
    pub environment: EnvironmentSettings,
    #[serde(default)]
    pub authentication: Option<FeatureSettings>,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
}

/// Container (docker) or service (compose) names.
#[derive(Debug, Clone, Deserialize)]
pub struct Bins {
    pub app: String,
    #[serde(default)]
    pub database: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSettings {
    #[serde(default)]
    pub engine: Engine,
    pub bins: Bins,
    /// Folders created before containers start, relative to the project.
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
    /// Commands run in the app container after the environment is up.
    #[serde(default)]
    pub build_steps: Vec<EnvCommand>,
    #[serde(default)]
    pub commands: BTreeMap<EnvCommand, CommandSpec>,
}

impl EnvironmentSettings {
    pub fn command(&self, command: EnvCommand) -> Result<&CommandSpec, DomainError> {
        self.commands
            .get(&command)
            .ok_or_else(|| DomainError::NotConfigured {
                kind: "command",
                name: command.to_string(),
            })
    }

    pub fn database_bin(&self) -> Result<&str, DomainError> {
        self.bins
            .database
            .as_deref()
            .ok_or_else(|| DomainError::NotConfigured {
                kind: "bin",
                name: "database".into(),
            })
    }
}

/// Named commands run inside the app container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvCommand {
    InstallDependencies,
    TypescriptBuild,
    MigrateLatest,
    MigrateRollback,
    MigrateVersion,
    SeedRun,
    RunApp,
    Ssh,
    FormatCode,
    RunTests,
    RunTestsWithCoverage,
}

impl EnvCommand {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InstallDependencies => "installDependencies",
            Self::TypescriptBuild => "typescriptBuild",
            Self::MigrateLatest => "migrateLatest",
            Self::MigrateRollback => "migrateRollback",
            Self::MigrateVersion => "migrateVersion",
            Self::SeedRun => "seedRun",
            Self::RunApp => "runApp",
            Self::Ssh => "ssh",
            Self::FormatCode => "formatCode",
            Self::RunTests => "runTests",
            Self::RunTestsWithCoverage => "runTestsWithCoverage",
        }
    }
}

impl fmt::Display for EnvCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An optional feature added to an existing project.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureSettings {
    pub generation: TemplateSet,
    pub dependencies: DependencySettings,
    pub routes: RouteSettings,
    pub environment: EnvironmentVariableSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DependencySettings {
    pub file: String,
    pub groups: Vec<DependencyGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteSettings {
    pub file: String,
    #[serde(default)]
    pub format: RoutesFormat,
    pub routes: Vec<RouteDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentVariableSettings {
    pub files: Vec<String>,
    pub group: EnvVariableGroup,
}

impl WizardConfig {
    pub fn project(&self, project_type: ProjectType) -> Result<&ProjectSettings, DomainError> {
        self.projects
            .get(&project_type)
            .ok_or_else(|| DomainError::NotConfigured {
                kind: "project type",
                name: project_type.to_string(),
            })
    }

    /// Check cross references the type system cannot express.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.node_versions.is_empty() {
            return Err(invalid("nodeVersions must not be empty"));
        }
        check_template(&self.common, "common")?;

        for project_type in ProjectType::ALL {
            let settings = self.project(project_type)?;
            check_template(&settings.generation, project_type.as_str())?;
            check_environment(project_type, &settings.environment)?;

            if let Some(feature) = &settings.authentication {
                check_template(&feature.generation, "authentication")?;
                if feature.routes.routes.iter().any(|r| r.name.is_empty()) {
                    return Err(invalid("authentication routes need a name"));
                }
            }
        }

        Ok(())
    }
}

fn check_template(set: &TemplateSet, owner: &str) -> Result<(), DomainError> {
    if set.template.trim().is_empty() {
        return Err(invalid(&format!("{owner}: template root is empty")));
    }
    Ok(())
}

fn check_environment(
    project_type: ProjectType,
    env: &EnvironmentSettings,
) -> Result<(), DomainError> {
    for step in &env.build_steps {
        env.command(*step).map_err(|_| {
            invalid(&format!(
                "{project_type}: build step '{step}' has no matching command"
            ))
        })?;
    }

    if env.engine == Engine::Docker {
        if env.containers.is_empty() {
            return Err(invalid(&format!(
                "{project_type}: the docker engine needs at least one container"
            )));
        }
        let bins = std::iter::once(env.bins.app.as_str()).chain(env.bins.database.as_deref());
        for bin in bins {
            if !env.containers.iter().any(|c| c.name == bin) {
                return Err(invalid(&format!(
                    "{project_type}: bin '{bin}' is not a configured container"
                )));
            }
        }
    }

    Ok(())
}

fn invalid(message: &str) -> DomainError {
    DomainError::InvalidConfig(message.to_owned())
}
