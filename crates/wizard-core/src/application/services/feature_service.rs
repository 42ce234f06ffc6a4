//! Feature Service - mutations of an existing project.
//!
//! Adds dependencies to the manifest, variables to env files and routes to
//! the routes file, and bundles the three with generated files for the
//! authentication feature.

use std::path::Path;

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Prompter, TemplateRenderer},
        services::scaffold_service::write_records,
    },
    domain::{
        DependencyGroup, DomainError, EnvVariableGroup, MergeReport, ProjectContext, ProjectType,
        RouteDescriptor, RoutesFormat, WizardConfig, flatten_files, flatten_folders,
        merge_dependencies,
    },
    error::WizardResult,
};

/// Everything `generate:auth` changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureReport {
    pub files: Vec<String>,
    pub dependencies: MergeReport,
    pub routes_file: String,
    pub routes: Vec<RouteDescriptor>,
    pub env_files: Vec<String>,
    pub variables: Vec<String>,
}

pub struct FeatureService {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
}

impl FeatureService {
    pub fn new(filesystem: Box<dyn Filesystem>, renderer: Box<dyn TemplateRenderer>) -> Self {
        Self {
            filesystem,
            renderer,
        }
    }

    /// Merge `groups` into the manifest at `root/file`.
    ///
    /// The manifest is only rewritten when something was added.
    #[instrument(skip_all, fields(file = %file))]
    pub fn add_dependencies(
        &self,
        root: &Path,
        file: &str,
        groups: &[DependencyGroup],
    ) -> WizardResult<MergeReport> {
        let path = root.join(file);
        let mut manifest: Value = serde_json::from_str(&self.filesystem.read_to_string(&path)?)
            .map_err(|e| DomainError::MalformedManifest(e.to_string()))?;

        let report = merge_dependencies(&mut manifest, groups)?;

        if report.changed() {
            let mut out = serde_json::to_string_pretty(&manifest)
                .map_err(|e| DomainError::MalformedManifest(e.to_string()))?;
            out.push('\n');
            self.filesystem.write_file(&path, &out)?;
        }

        info!(
            added = report.added_count(),
            skipped = report.skipped_count(),
            "Dependencies merged"
        );
        Ok(report)
    }

    /// Append `group` to every file in `files`, creating missing ones.
    ///
    /// Keys already present are appended again.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn append_environment(
        &self,
        root: &Path,
        files: &[String],
        group: &EnvVariableGroup,
    ) -> WizardResult<Vec<String>> {
        for file in files {
            let path = root.join(file);
            let existing = if self.filesystem.exists(&path) {
                self.filesystem.read_to_string(&path)?
            } else {
                String::new()
            };
            self.filesystem
                .append_file(&path, &group.render_block(&existing))?;
        }

        Ok(group.variables.iter().map(|v| v.key.clone()).collect())
    }

    /// Register `routes` in `root/file`, returning the ones that were new.
    #[instrument(skip_all, fields(file = %file, format = ?format))]
    pub fn add_routes(
        &self,
        root: &Path,
        file: &str,
        format: RoutesFormat,
        routes: &[RouteDescriptor],
    ) -> WizardResult<Vec<RouteDescriptor>> {
        let path = root.join(file);
        let contents = if self.filesystem.exists(&path) {
            self.filesystem.read_to_string(&path)?
        } else if format == RoutesFormat::Json {
            warn!(path = %path.display(), "Routes file missing, starting an empty one");
            String::new()
        } else {
            return Err(ApplicationError::FilesystemError {
                path,
                reason: "routes file not found".into(),
            }
            .into());
        };

        let added = format.pending(&contents, routes)?;
        if added.is_empty() {
            info!("Routes already registered");
            return Ok(added);
        }
        let updated = format.inject(&contents, &added)?;
        self.filesystem.write_file(&path, &updated)?;
        Ok(added)
    }

    /// Generate the authentication feature in the current backend project.
    ///
    /// Returns `None` when the user declines.
    #[instrument(skip_all)]
    pub fn add_authentication(
        &self,
        context: &ProjectContext,
        config: &WizardConfig,
        prompter: &dyn Prompter,
    ) -> WizardResult<Option<FeatureReport>> {
        let (marker, project_type) = context.require(&[ProjectType::BackendExpress])?;
        let feature = config
            .project(project_type)?
            .authentication
            .as_ref()
            .ok_or_else(|| DomainError::NotConfigured {
                kind: "feature",
                name: "authentication".into(),
            })?;

        if !prompter.confirm("Generate authentication")? {
            return Ok(None);
        }

        let root = context.root();
        let props = Value::Object(marker.answers.clone());

        for folder in flatten_folders(None, &feature.generation.structure) {
            self.filesystem.create_dir_all(&root.join(folder))?;
        }
        let records = flatten_files(
            Some(&feature.generation.template),
            None,
            self.renderer.extension(),
            &feature.generation.structure,
            Some(&props),
        );
        let files = write_records(&*self.filesystem, &*self.renderer, root, &records)?;

        let dependencies = self.add_dependencies(
            root,
            &feature.dependencies.file,
            &feature.dependencies.groups,
        )?;
        let routes = self.add_routes(
            root,
            &feature.routes.file,
            feature.routes.format,
            &feature.routes.routes,
        )?;
        let variables =
            self.append_environment(root, &feature.environment.files, &feature.environment.group)?;

        info!(files = files.len(), "Authentication generated");
        Ok(Some(FeatureReport {
            files,
            dependencies,
            routes_file: feature.routes.file.clone(),
            routes,
            env_files: feature.environment.files.clone(),
            variables,
        }))
    }
}
