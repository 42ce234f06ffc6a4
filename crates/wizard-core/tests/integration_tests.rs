//! Integration tests for wizard-core, driven through the public API only.

use std::path::Path;

use serde_json::Value;
use wizard_adapters::{MemoryFilesystem, RecordingRunner};
use wizard_core::prelude::*;

// ── Fakes ──────────────────────────────────────────────────────────────────

struct PlainRenderer;

impl TemplateRenderer for PlainRenderer {
    fn extension(&self) -> &str {
        "jinja"
    }

    fn render(&self, template: &str, _props: Option<&Value>) -> WizardResult<String> {
        Ok(format!("rendered {template}"))
    }
}

struct Always(bool);

impl Prompter for Always {
    fn confirm(&self, _message: &str) -> WizardResult<bool> {
        Ok(self.0)
    }
}

const CONFIG: &str = r#"
nodeVersions: ["12"]
common:
  template: common
  structure:
    root:
      files: [PULL_REQUEST_TEMPLATE.md]
projects:
  backend-express:
    generation:
      template: backend-express/bare
      structure:
        root:
          files: [package.json, docker-compose.yml]
        src:
          path: src
          config:
            path: src/config
            files: [src/config/routes.json]
    environment:
      bins: { app: node, database: postgres }
      buildSteps: [installDependencies]
      commands:
        installDependencies: { comment: Installing dependencies, params: [npm, install] }
  frontend-react:
    generation:
      template: frontend-react/bare
      structure:
        root:
          files: [package.json]
    environment:
      engine: docker
      bins: { app: react }
      containers:
        - { name: react, image: "node:12" }
"#;

fn config() -> WizardConfig {
    let config: WizardConfig = serde_yaml::from_str(CONFIG).unwrap();
    config.validate().unwrap();
    config
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[test]
fn generated_project_can_be_built() {
    let fs = MemoryFilesystem::new();
    let config = config();
    let answers = ProjectAnswers::new("Shop Api", "Jo", "shop", Some("12".into()));

    let outside = ProjectContext::load(&fs, Path::new("/w")).unwrap();
    let scaffold = ScaffoldService::new(Box::new(fs.clone()), Box::new(PlainRenderer));
    let outcome = scaffold
        .create_project(&outside, &config, ProjectType::BackendExpress, &answers, &Always(true))
        .unwrap();
    assert!(outcome.is_generated());
    assert!(fs.is_dir("/w/shop/src/config"));

    assert_eq!(
        fs.read_file("/w/shop/src/config/routes.json").unwrap(),
        "rendered backend-express/bare/src/config/routes.json.jinja"
    );
    assert!(fs.read_file("/w/shop/PULL_REQUEST_TEMPLATE.md").is_some());

    // The generated folder is now a project.
    let inside = ProjectContext::load(&fs, Path::new("/w/shop")).unwrap();
    assert_eq!(
        inside.require(&[ProjectType::BackendExpress]).unwrap().1,
        ProjectType::BackendExpress
    );

    let recorder = RecordingRunner::new();
    EnvironmentService::new(Box::new(recorder.clone()), Box::new(fs.clone()))
        .build(&inside, &config, BuildType::Development)
        .unwrap();

    assert_eq!(
        recorder.command_lines(),
        [
            "docker-compose -p shop_api -f docker-compose.yml -f docker-compose.dev.yml up -d --build",
            "docker-compose -p shop_api -f docker-compose.yml exec node npm install",
        ]
    );
}

#[test]
fn environment_commands_need_a_marker() {
    let fs = MemoryFilesystem::new();
    let recorder = RecordingRunner::new();
    let context = ProjectContext::load(&fs, Path::new("/w")).unwrap();

    let err = EnvironmentService::new(Box::new(recorder.clone()), Box::new(fs))
        .stop(&context, &config(), true)
        .unwrap_err();

    assert!(matches!(
        err,
        WizardError::Domain(DomainError::WrongProject { found: None, .. })
    ));
    assert!(recorder.invocations().is_empty());
}

#[test]
fn malformed_marker_fails_loading() {
    let fs = MemoryFilesystem::new().with_file("/w/.wizard", "{ nope");
    assert!(matches!(
        ProjectContext::load(&fs, Path::new("/w")),
        Err(WizardError::Domain(DomainError::MalformedMarker(_)))
    ));
}

#[test]
fn declined_generation_leaves_no_marker() {
    let fs = MemoryFilesystem::new();
    let outcome = ScaffoldService::new(Box::new(fs.clone()), Box::new(PlainRenderer))
        .create_project(
            &ProjectContext::new("/w", None),
            &config(),
            ProjectType::FrontendReact,
            &ProjectAnswers::new("App", "Jo", "app", None),
            &Always(false),
        )
        .unwrap();

    assert_eq!(outcome, GenerationOutcome::Declined);
    assert!(fs.read_file("/w/app/.wizard").is_none());
}
