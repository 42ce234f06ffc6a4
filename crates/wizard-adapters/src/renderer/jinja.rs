//! `minijinja` renderer over the embedded template tree.
//!
//! Templates ship inside the binary (`templates/` at the crate root). A
//! directory on disk can override any of them: a file at the same relative
//! path wins over the embedded one.
//!
//! Undefined variables are errors, so a template that references a prop the
//! caller did not bind fails instead of rendering an empty string.

use std::collections::BTreeMap;
use std::path::Path;

use include_dir::{Dir, DirEntry, include_dir};
use minijinja::{Environment, UndefinedBehavior, context};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use wizard_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    error::WizardResult,
};

/// Suffix of every template resource.
pub const TEMPLATE_EXTENSION: &str = "jinja";

static TEMPLATES: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

pub struct JinjaRenderer {
    env: Environment<'static>,
    overrides: BTreeMap<String, String>,
}

impl JinjaRenderer {
    /// Renderer over the embedded templates only.
    pub fn embedded() -> Self {
        Self {
            env: environment(),
            overrides: BTreeMap::new(),
        }
    }

    /// Renderer whose templates under `dir` take precedence.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn with_overrides(dir: &Path) -> WizardResult<Self> {
        if !dir.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: dir.to_path_buf(),
                reason: "Template override directory does not exist".into(),
            }
            .into());
        }

        let mut overrides = BTreeMap::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = template_name(dir, entry.path()) else {
                continue;
            };
            match std::fs::read_to_string(entry.path()) {
                Ok(source) => {
                    overrides.insert(name, source);
                }
                Err(e) => warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "Skipping unreadable template"
                ),
            }
        }

        debug!(count = overrides.len(), "Template overrides loaded");
        Ok(Self {
            env: environment(),
            overrides,
        })
    }

    /// `true` when `template` resolves to an override or an embedded file.
    pub fn contains(&self, template: &str) -> bool {
        self.source(template).is_some()
    }

    /// Names of every embedded template, sorted.
    pub fn embedded_names() -> Vec<String> {
        let mut names = Vec::new();
        collect_names(&TEMPLATES, &mut names);
        names.sort();
        names
    }

    fn source(&self, template: &str) -> Option<&str> {
        self.overrides
            .get(template)
            .map(String::as_str)
            .or_else(|| TEMPLATES.get_file(template).and_then(|f| f.contents_utf8()))
    }
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::embedded()
    }
}

impl TemplateRenderer for JinjaRenderer {
    fn extension(&self) -> &str {
        TEMPLATE_EXTENSION
    }

    #[instrument(skip(self, props))]
    fn render(&self, template: &str, props: Option<&Value>) -> WizardResult<String> {
        let source = self
            .source(template)
            .ok_or_else(|| ApplicationError::TemplateNotFound {
                template: template.to_owned(),
            })?;

        let rendered = match props {
            Some(props) => self.env.render_str(source, props),
            None => self.env.render_str(source, context! {}),
        };
        rendered.map_err(|e| {
            ApplicationError::RenderingFailed {
                template: template.to_owned(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

/// `/`-separated path of `file` relative to `root`.
fn template_name(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

fn collect_names(dir: &'static Dir, names: &mut Vec<String>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::File(file) => names.push(file.path().to_string_lossy().replace('\\', "/")),
            DirEntry::Dir(sub) => collect_names(sub, names),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wizard_core::error::WizardError;

    fn props() -> Value {
        json!({
            "projectName": "Shop Api",
            "authorName": "Jo",
            "folderName": "shop",
            "nodeVersion": "12.16.1",
            "projectNameAlias": "shop_api",
        })
    }

    #[test]
    fn embedded_template_renders_props() {
        let out = JinjaRenderer::embedded()
            .render("backend-express/bare/.node-version.jinja", Some(&props()))
            .unwrap();
        assert_eq!(out, "12.16.1\n");
    }

    #[test]
    fn missing_template_is_reported() {
        let err = JinjaRenderer::embedded()
            .render("nope.jinja", None)
            .unwrap_err();
        assert!(matches!(
            err,
            WizardError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn undefined_prop_fails_rendering() {
        let err = JinjaRenderer::embedded()
            .render("backend-express/bare/.node-version.jinja", None)
            .unwrap_err();
        assert!(matches!(
            err,
            WizardError::Application(ApplicationError::RenderingFailed { .. })
        ));
    }

    #[test]
    fn override_directory_wins() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("common");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join(".prettierrc.jinja"), "{{ projectName }}!").unwrap();

        let renderer = JinjaRenderer::with_overrides(dir.path()).unwrap();

        assert_eq!(
            renderer.render("common/.prettierrc.jinja", Some(&props())).unwrap(),
            "Shop Api!"
        );
        // Everything else still comes from the embedded tree.
        assert!(renderer.contains("common/PULL_REQUEST_TEMPLATE.md.jinja"));
    }

    #[test]
    fn missing_override_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(JinjaRenderer::with_overrides(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn embedded_names_use_forward_slashes() {
        let names = JinjaRenderer::embedded_names();
        assert!(names.contains(&"common/.prettierrc.jinja".to_owned()));
        assert!(names.iter().all(|n| n.ends_with(".jinja")));
    }
}
