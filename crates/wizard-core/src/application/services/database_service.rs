//! Database Service - migration and seed files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{
        AnswerValidator, DatabaseFileKind, DomainError, ProjectContext, ProjectType, WizardConfig,
        database_file_name,
    },
    error::WizardResult,
};

pub struct DatabaseService {
    filesystem: Box<dyn Filesystem>,
}

impl DatabaseService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Create a migration or seed file from the project's stub.
    ///
    /// Returns the new file's path relative to the project root. Existing
    /// files are never overwritten.
    #[instrument(skip_all, fields(kind = kind.label(), name = %name))]
    pub fn make_file(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        kind: DatabaseFileKind,
        name: &str,
        now: DateTime<Utc>,
    ) -> WizardResult<PathBuf> {
        let (_, project_type) = context.require(&[ProjectType::BackendExpress])?;
        AnswerValidator::required("name", name)?;

        let settings = config
            .project(project_type)?
            .database
            .as_ref()
            .ok_or_else(|| DomainError::NotConfigured {
                kind: "database",
                name: project_type.to_string(),
            })?;
        let files = settings.files(kind);

        let file_name = database_file_name(kind, name, &settings.extension, now);
        let relative = Path::new(&files.directory).join(file_name);
        let target = context.root().join(&relative);

        if self.filesystem.exists(&target) {
            return Err(ApplicationError::FileExists { path: relative }.into());
        }

        let stub = self
            .filesystem
            .read_to_string(&context.root().join(&files.stub))?;
        self.filesystem
            .create_dir_all(&context.root().join(&files.directory))?;
        self.filesystem.write_file(&target, &stub)?;

        info!(path = %relative.display(), "Database file created");
        Ok(relative)
    }
}
