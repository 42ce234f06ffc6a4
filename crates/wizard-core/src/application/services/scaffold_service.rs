//! Scaffold Service - project generation.
//!
//! Generation is a two step workflow:
//! 1. Flatten the configured trees into folder and file maps
//! 2. After confirmation, create every folder then render and write every file
//!
//! There is no rollback: a failure midway leaves what was already written.

use std::path::Path;
use tracing::{debug, info, instrument};

use crate::{
    application::ports::{Filesystem, Prompter, TemplateRenderer},
    domain::{
        FileMapRecord, MARKER_FILE, ProjectAnswers, ProjectContext, ProjectMarker, ProjectType,
        TemplateSet, WizardConfig, flatten_files, flatten_folders,
    },
    error::WizardResult,
};

/// Result of a confirmed or declined generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated { folders: usize, files: Vec<String> },
    Declined,
}

impl GenerationOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
}

impl ScaffoldService {
    pub fn new(filesystem: Box<dyn Filesystem>, renderer: Box<dyn TemplateRenderer>) -> Self {
        Self {
            filesystem,
            renderer,
        }
    }

    /// Generate `folder` from pre-built maps after asking "Generate?".
    ///
    /// Map entries are relative to `root`.
    #[instrument(skip_all, fields(folder = %folder))]
    pub fn generate_project(
        &self,
        root: &Path,
        folder: &str,
        folder_maps: &[String],
        file_maps: &[FileMapRecord],
        prompter: &dyn Prompter,
    ) -> WizardResult<GenerationOutcome> {
        if !prompter.confirm("Generate?")? {
            info!("Generation declined");
            return Ok(GenerationOutcome::Declined);
        }

        for entry in folder_maps {
            self.filesystem.create_dir_all(&root.join(entry))?;
        }
        let files = write_records(&*self.filesystem, &*self.renderer, root, file_maps)?;

        info!(folders = folder_maps.len(), files = files.len(), "Project generated");
        Ok(GenerationOutcome::Generated {
            folders: folder_maps.len(),
            files,
        })
    }

    /// Generate a new project of `project_type` and write its marker.
    #[instrument(skip_all, fields(project_type = %project_type, folder = %answers.folder_name))]
    pub fn create_project(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        project_type: ProjectType,
        answers: &ProjectAnswers,
        prompter: &dyn Prompter,
    ) -> WizardResult<GenerationOutcome> {
        context.require_outside()?;
        let settings = config.project(project_type)?;

        let folder = answers.folder_name.as_str();
        let props = answers.to_props();

        let mut folders = Vec::new();
        let mut files = Vec::new();
        for set in [&config.common, &settings.generation] {
            folders.extend(flatten_folders(Some(folder), &set.structure));
            files.extend(self.file_map(set, Some(folder), Some(&props)));
        }
        debug!(folders = folders.len(), files = files.len(), "Maps built");

        let outcome =
            self.generate_project(context.root(), folder, &folders, &files, prompter)?;

        if outcome.is_generated() {
            let marker = ProjectMarker::new(project_type, answers);
            let path = context.root().join(folder).join(MARKER_FILE);
            self.filesystem.write_file(&path, &marker.to_json())?;
        }

        Ok(outcome)
    }

    /// File map for one template set.
    pub fn file_map(
        &self,
        set: &TemplateSet,
        destination: Option<&str>,
        props: Option<&serde_json::Value>,
    ) -> Vec<FileMapRecord> {
        flatten_files(
            Some(&set.template),
            destination,
            self.renderer.extension(),
            &set.structure,
            props,
        )
    }
}

/// Render each record and write it under `root`, creating parents.
///
/// Returns the written targets in order.
pub(crate) fn write_records(
    filesystem: &dyn Filesystem,
    renderer: &dyn TemplateRenderer,
    root: &Path,
    records: &[FileMapRecord],
) -> WizardResult<Vec<String>> {
    let mut written = Vec::with_capacity(records.len());
    for record in records {
        let content = renderer.render(&record.template, record.props.as_ref())?;
        let path = root.join(&record.target);
        if let Some(parent) = path.parent() {
            filesystem.create_dir_all(parent)?;
        }
        filesystem.write_file(&path, &content)?;
        debug!(target = %record.target, "File written");
        written.push(record.target.clone());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockPrompter;
    use crate::application::services::testing::{FakeFilesystem, TagRenderer, sample_config};
    use crate::domain::DomainError;
    use crate::error::WizardError;

    fn service(fs: &FakeFilesystem) -> ScaffoldService {
        ScaffoldService::new(Box::new(fs.clone()), Box::new(TagRenderer))
    }

    fn yes() -> MockPrompter {
        let mut prompter = MockPrompter::new();
        prompter.expect_confirm().returning(|_| Ok(true));
        prompter
    }

    fn answers() -> ProjectAnswers {
        ProjectAnswers::new("My Api", "Jane", "demo", Some("12".into()))
    }

    #[test]
    fn declined_generation_touches_nothing() {
        let fs = FakeFilesystem::default();
        let mut prompter = MockPrompter::new();
        prompter
            .expect_confirm()
            .withf(|m| m == "Generate?")
            .times(1)
            .returning(|_| Ok(false));

        let outcome = service(&fs)
            .create_project(
                &ProjectContext::new("/work", None),
                &sample_config(),
                ProjectType::BackendExpress,
                &answers(),
                &prompter,
            )
            .unwrap();

        assert_eq!(outcome, GenerationOutcome::Declined);
        assert!(fs.is_empty());
    }

    #[test]
    fn create_project_writes_folders_files_and_marker() {
        let fs = FakeFilesystem::default();
        let outcome = service(&fs)
            .create_project(
                &ProjectContext::new("/work", None),
                &sample_config(),
                ProjectType::BackendExpress,
                &answers(),
                &yes(),
            )
            .unwrap();

        let GenerationOutcome::Generated { folders, files } = outcome else {
            panic!("expected generation");
        };
        assert_eq!(folders, 2);
        assert_eq!(files, ["demo/.prettierrc", "demo/package.json", "demo/src/app.ts"]);

        assert!(fs.has_dir("/work/demo/src"));
        assert!(fs.has_dir("/work/demo/src/database/migrations"));
        assert_eq!(
            fs.read("/work/demo/package.json").unwrap(),
            "backend-express/bare/package.json.jinja|My Api"
        );

        let marker = ProjectMarker::parse(&fs.read("/work/demo/.wizard").unwrap()).unwrap();
        assert_eq!(marker.project_type, "backend-express");
        assert_eq!(marker.answer("projectNameAlias"), Some("my_api"));
    }

    #[test]
    fn create_project_refuses_to_run_inside_a_project() {
        let fs = FakeFilesystem::default();
        let context = ProjectContext::from_marker_contents(
            "/work",
            Some(r#"{"projectType":"backend-express"}"#),
        )
        .unwrap();

        let err = service(&fs)
            .create_project(
                &context,
                &sample_config(),
                ProjectType::FrontendReact,
                &answers(),
                &MockPrompter::new(),
            )
            .unwrap_err();

        assert_eq!(err, WizardError::Domain(DomainError::InsideProject));
        assert!(fs.is_empty());
    }

    #[test]
    fn generate_project_is_idempotent_for_existing_folders() {
        let fs = FakeFilesystem::default();
        let folders = vec!["demo/src".to_owned(), "demo/src".to_owned()];
        let outcome = service(&fs)
            .generate_project(Path::new("/w"), "demo", &folders, &[], &yes())
            .unwrap();
        assert!(outcome.is_generated());
        assert!(fs.has_dir("/w/demo/src"));
    }
}
