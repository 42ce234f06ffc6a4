//! Environment Service - Docker environments of generated projects.
//!
//! Invocations run one after another and the first failure stops the
//! sequence. The project context is checked before any process starts.

use std::path::Path;

use tracing::{info, instrument};

use crate::{
    application::ports::{Filesystem, ProcessRunner},
    domain::{
        BuildType, CommandSpec, ComposeDriver, DockerDriver, Engine, EnvCommand,
        EnvironmentDriver, EnvironmentSettings, Invocation, LogOptions, ProjectContext,
        ProjectMarker, ProjectType, WizardConfig,
    },
    error::WizardResult,
};

/// Project types with a managed environment.
const ALL_TYPES: &[ProjectType] = &ProjectType::ALL;
const BACKEND: &[ProjectType] = &[ProjectType::BackendExpress];

const TESTS_ROOT: &str = "dist/tests";

/// Which tests `env:test` runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestSelection {
    pub coverage: bool,
    /// A single test file name, without `.test.js`.
    pub file: Option<String>,
    /// A directory below the compiled tests root.
    pub path: Option<String>,
}

impl TestSelection {
    /// Glob handed to the test runner. `file` wins over `path`.
    pub fn pattern(&self) -> String {
        match (&self.file, &self.path) {
            (Some(file), _) => format!("{TESTS_ROOT}/**/{file}.test.js"),
            (None, Some(path)) => format!("{TESTS_ROOT}/{path}/**/*.test.js"),
            (None, None) => format!("{TESTS_ROOT}/**/*.test.js"),
        }
    }
}

struct Resolved<'a> {
    settings: &'a EnvironmentSettings,
    driver: Box<dyn EnvironmentDriver>,
}

pub struct EnvironmentService {
    runner: Box<dyn ProcessRunner>,
    filesystem: Box<dyn Filesystem>,
}

impl EnvironmentService {
    pub fn new(runner: Box<dyn ProcessRunner>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { runner, filesystem }
    }

    /// Bring the environment up, then run the configured build steps.
    #[instrument(skip_all, fields(build = %build))]
    pub fn build(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        build: BuildType,
    ) -> WizardResult<()> {
        let env = self.resolve(context, config, ALL_TYPES)?;

        // Created up front so mounted folders are not owned by root.
        for folder in &env.settings.folders {
            self.filesystem.create_dir_all(&context.root().join(folder))?;
        }

        self.run_all(env.driver.up(build))?;

        for step in &env.settings.build_steps {
            let command = env.settings.command(*step)?;
            self.execute(&env.driver.exec(&env.settings.bins.app, command))?;
        }

        info!("Environment built");
        Ok(())
    }

    /// Start the application inside its container.
    pub fn run_app(&self, context: &ProjectContext, config: &WizardConfig) -> WizardResult<()> {
        self.exec_named(context, config, ALL_TYPES, EnvCommand::RunApp)
    }

    /// Open a shell inside the app container.
    pub fn ssh(&self, context: &ProjectContext, config: &WizardConfig) -> WizardResult<()> {
        self.exec_named(context, config, ALL_TYPES, EnvCommand::Ssh)
    }

    pub fn format_code(&self, context: &ProjectContext, config: &WizardConfig) -> WizardResult<()> {
        self.exec_named(context, config, ALL_TYPES, EnvCommand::FormatCode)
    }

    /// Knex commands: latest, rollback, version and seed runs.
    pub fn database(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        command: EnvCommand,
    ) -> WizardResult<()> {
        self.exec_named(context, config, BACKEND, command)
    }

    #[instrument(skip_all, fields(coverage = selection.coverage))]
    pub fn test(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        selection: &TestSelection,
    ) -> WizardResult<()> {
        let env = self.resolve(context, config, ALL_TYPES)?;
        let name = if selection.coverage {
            EnvCommand::RunTestsWithCoverage
        } else {
            EnvCommand::RunTests
        };
        let command = env.settings.command(name)?.with_params([selection.pattern()]);
        self.execute(&env.driver.exec(&env.settings.bins.app, &command))
    }

    /// Stop the environment; `clean` also removes images (and volumes).
    #[instrument(skip_all, fields(clean = clean))]
    pub fn stop(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        clean: bool,
    ) -> WizardResult<()> {
        let env = self.resolve(context, config, ALL_TYPES)?;
        self.run_all(env.driver.down(clean))
    }

    /// Show app logs, or database logs when `database` is set.
    pub fn logs(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        database: bool,
        options: LogOptions,
    ) -> WizardResult<()> {
        let env = self.resolve(context, config, BACKEND)?;
        let target = if database {
            env.settings.database_bin()?
        } else {
            env.settings.bins.app.as_str()
        };
        self.execute(&env.driver.logs(target, options))
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn exec_named(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        allowed: &[ProjectType],
        name: EnvCommand,
    ) -> WizardResult<()> {
        let env = self.resolve(context, config, allowed)?;
        let command: &CommandSpec = env.settings.command(name)?;
        self.execute(&env.driver.exec(&env.settings.bins.app, command))
    }

    fn resolve<'a>(
        &self,
        context: &ProjectContext,
        config: &'a WizardConfig,
        allowed: &[ProjectType],
    ) -> WizardResult<Resolved<'a>> {
        let (marker, project_type) = context.require(allowed)?;
        let settings = &config.project(project_type)?.environment;
        let driver = driver_for(settings, marker, context.root(), config);
        Ok(Resolved { settings, driver })
    }

    fn run_all(&self, invocations: Vec<Invocation>) -> WizardResult<()> {
        invocations.iter().try_for_each(|inv| self.execute(inv))
    }

    fn execute(&self, invocation: &Invocation) -> WizardResult<()> {
        info!(command = %invocation, "Running");
        self.runner.run(invocation)
    }
}

fn driver_for(
    settings: &EnvironmentSettings,
    marker: &ProjectMarker,
    root: &Path,
    config: &WizardConfig,
) -> Box<dyn EnvironmentDriver> {
    let alias = marker.project_alias();
    match settings.engine {
        Engine::Compose => Box::new(ComposeDriver::new(alias, config.runtimes.clone())),
        Engine::Docker => Box::new(DockerDriver::new(
            alias,
            root,
            settings.containers.clone(),
            config.runtimes.clone(),
        )),
    }
}
