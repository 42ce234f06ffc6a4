//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports. Every operation that
//! depends on the current project takes a `ProjectContext` and checks it
//! before touching a port.

pub mod database_service;
pub mod environment_service;
pub mod feature_service;
pub mod scaffold_service;

pub use database_service::DatabaseService;
pub use environment_service::{EnvironmentService, TestSelection};
pub use feature_service::{FeatureReport, FeatureService};
pub use scaffold_service::{GenerationOutcome, ScaffoldService};

#[cfg(test)]
pub(crate) mod testing {
    //! In-crate fakes shared by the service tests.

    use std::collections::{BTreeMap, BTreeSet};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    use serde_json::Value;

    use crate::application::{ApplicationError, Filesystem, TemplateRenderer};
    use crate::domain::WizardConfig;
    use crate::error::WizardResult;

    #[derive(Debug, Default)]
    struct State {
        dirs: BTreeSet<PathBuf>,
        files: BTreeMap<PathBuf, String>,
    }

    /// Shared in-memory filesystem; clones see the same state.
    #[derive(Debug, Clone, Default)]
    pub struct FakeFilesystem {
        state: Arc<Mutex<State>>,
    }

    impl FakeFilesystem {
        pub fn with_file(self, path: &str, content: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .files
                .insert(PathBuf::from(path), content.to_owned());
            self
        }

        pub fn read(&self, path: &str) -> Option<String> {
            self.state.lock().unwrap().files.get(Path::new(path)).cloned()
        }

        pub fn has_dir(&self, path: &str) -> bool {
            self.state.lock().unwrap().dirs.contains(Path::new(path))
        }

        pub fn is_empty(&self) -> bool {
            let state = self.state.lock().unwrap();
            state.dirs.is_empty() && state.files.is_empty()
        }

        pub fn file_paths(&self) -> Vec<PathBuf> {
            self.state.lock().unwrap().files.keys().cloned().collect()
        }
    }

    impl Filesystem for FakeFilesystem {
        fn create_dir_all(&self, path: &Path) -> WizardResult<()> {
            self.state.lock().unwrap().dirs.insert(path.to_path_buf());
            Ok(())
        }

        fn write_file(&self, path: &Path, content: &str) -> WizardResult<()> {
            self.state
                .lock()
                .unwrap()
                .files
                .insert(path.to_path_buf(), content.to_owned());
            Ok(())
        }

        fn append_file(&self, path: &Path, content: &str) -> WizardResult<()> {
            self.state
                .lock()
                .unwrap()
                .files
                .entry(path.to_path_buf())
                .or_default()
                .push_str(content);
            Ok(())
        }

        fn read_to_string(&self, path: &Path) -> WizardResult<String> {
            self.state
                .lock()
                .unwrap()
                .files
                .get(path)
                .cloned()
                .ok_or_else(|| {
                    ApplicationError::FilesystemError {
                        path: path.to_path_buf(),
                        reason: "not found".into(),
                    }
                    .into()
                })
        }

        fn exists(&self, path: &Path) -> bool {
            let state = self.state.lock().unwrap();
            state.files.contains_key(path) || state.dirs.contains(path)
        }
    }

    /// Renders `<template>|<projectName>` so tests can see what was bound.
    pub struct TagRenderer;

    impl TemplateRenderer for TagRenderer {
        fn extension(&self) -> &str {
            "jinja"
        }

        fn render(&self, template: &str, props: Option<&Value>) -> WizardResult<String> {
            let name = props
                .and_then(|p| p.get("projectName"))
                .and_then(Value::as_str);
            Ok(match name {
                Some(name) => format!("{template}|{name}"),
                None => template.to_owned(),
            })
        }
    }

    pub const SAMPLE_CONFIG: &str = r#"
nodeVersions: ["12", "10"]
common:
  template: common
  structure:
    root:
      files: [.prettierrc]
projects:
  backend-express:
    generation:
      template: backend-express/bare
      structure:
        root:
          files: [package.json]
        src:
          path: src
          files: [src/app.ts]
          migrations:
            path: src/database/migrations
    environment:
      engine: compose
      bins: { app: node, database: postgres }
      folders: [node_modules]
      buildSteps: [installDependencies, migrateLatest]
      commands:
        installDependencies: { comment: Installing dependencies, params: [npm, install] }
        migrateLatest: { comment: Running migrations, params: [npx, knex, "migrate:latest"] }
        runApp: { comment: Running the app, params: [npm, run, dev] }
        runTests: { comment: Running tests, params: [npx, mocha], tty: false }
        runTestsWithCoverage: { comment: Running tests with coverage, params: [npx, nyc, mocha], tty: false }
    authentication:
      generation:
        template: backend-express/auth
        structure:
          authentication:
            path: src/resources/authentication
            files: [src/resources/authentication/controller.ts]
      dependencies:
        file: package.json
        groups:
          - group: dependencies
            packages: [{ name: jsonwebtoken, version: "^8.5.1" }]
      routes:
        file: src/config/routes.json
        routes: [{ name: authentication, path: resources/authentication/routes }]
      environment:
        files: [.env, .env.example]
        group:
          comment: Authentication
          variables: [{ key: JWT_SECRET, generate: 32 }]
    database:
      extension: ts
      migrations: { directory: src/database/migrations, stub: src/database/migration.stub }
      seeds: { directory: src/database/seeds, stub: src/database/seed.stub }
  frontend-react:
    generation:
      template: frontend-react/bare
      structure:
        root:
          files: [package.json]
    environment:
      engine: docker
      bins: { app: react }
      folders: [node_modules]
      containers:
        - { name: react, image: "node:12", options: [detach, interactive, attachToNetwork] }
      buildSteps: [installDependencies]
      commands:
        installDependencies: { comment: Installing dependencies, params: [npm, install] }
        ssh: { comment: Opening a shell, params: [sh] }
runtimes:
  react:
    env: [{ key: NODE_ENV, value: development }]
    user: node
    workDir: /home/node/app
  node:
    user: node
"#;

    pub fn sample_config() -> WizardConfig {
        let config: WizardConfig = serde_yaml::from_str(SAMPLE_CONFIG).unwrap();
        config.validate().unwrap();
        config
    }
}
