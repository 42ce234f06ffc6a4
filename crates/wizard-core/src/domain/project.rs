//! Project types, build types and the `.wizard` project marker.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// File name of the marker identifying a managed project.
pub const MARKER_FILE: &str = ".wizard";

// ── Project type ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "backend-express")]
    BackendExpress,
    #[serde(rename = "frontend-react")]
    FrontendReact,
}

impl ProjectType {
    pub const ALL: [ProjectType; 2] = [Self::BackendExpress, Self::FrontendReact];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackendExpress => "backend-express",
            Self::FrontendReact => "frontend-react",
        }
    }

    /// Whether generators prompt for a Node.js version.
    pub const fn asks_node_version(self) -> bool {
        matches!(self, Self::BackendExpress)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownProjectType(s.to_owned()))
    }
}

// ── Build type ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    #[default]
    Development,
    Testing,
    Production,
}

impl BuildType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Production => "production",
        }
    }

    /// Short form used in compose override file names.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Testing => "test",
            Self::Production => "prod",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test" => Ok(Self::Testing),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(DomainError::UnknownBuildType(s.to_owned())),
        }
    }
}

// ── Answers ────────────────────────────────────────────────────────────────

/// Answers collected by the project generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnswers {
    pub project_name: String,
    pub author_name: String,
    pub folder_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    pub project_name_alias: String,
}

impl ProjectAnswers {
    pub fn new(
        project_name: impl Into<String>,
        author_name: impl Into<String>,
        folder_name: impl Into<String>,
        node_version: Option<String>,
    ) -> Self {
        let project_name = project_name.into();
        Self {
            project_name_alias: alias(&project_name),
            project_name,
            author_name: author_name.into(),
            folder_name: folder_name.into(),
            node_version,
        }
    }

    /// Template data bound into every generated file.
    pub fn to_props(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Lower-case `name` with spaces replaced by underscores.
pub fn alias(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

// ── Marker ─────────────────────────────────────────────────────────────────

/// Contents of the `.wizard` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMarker {
    pub project_type: String,
    #[serde(flatten)]
    pub answers: Map<String, Value>,
}

impl ProjectMarker {
    pub fn new(project_type: ProjectType, answers: &ProjectAnswers) -> Self {
        let answers = match answers.to_props() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            project_type: project_type.as_str().to_owned(),
            answers,
        }
    }

    pub fn parse(contents: &str) -> Result<Self, DomainError> {
        serde_json::from_str(contents).map_err(|e| DomainError::MalformedMarker(e.to_string()))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn project_type(&self) -> Result<ProjectType, DomainError> {
        self.project_type.parse()
    }

    /// A string answer, e.g. `projectNameAlias`.
    pub fn answer(&self, key: &str) -> Option<&str> {
        self.answers.get(key).and_then(Value::as_str)
    }

    /// Name used for the compose project and the docker network.
    pub fn project_alias(&self) -> String {
        self.answer("projectNameAlias")
            .map(str::to_owned)
            .or_else(|| self.answer("projectName").map(alias))
            .unwrap_or_else(|| self.project_type.clone())
    }
}

// ── Context ────────────────────────────────────────────────────────────────

/// The project the CLI was started in, if any.
///
/// Built once at startup and passed to every operation that depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectContext {
    root: PathBuf,
    marker: Option<ProjectMarker>,
}

impl ProjectContext {
    pub fn new(root: impl Into<PathBuf>, marker: Option<ProjectMarker>) -> Self {
        Self {
            root: root.into(),
            marker,
        }
    }

    /// Build a context from the raw marker contents, if present.
    pub fn from_marker_contents(
        root: impl Into<PathBuf>,
        contents: Option<&str>,
    ) -> Result<Self, DomainError> {
        let marker = contents.map(ProjectMarker::parse).transpose()?;
        Ok(Self::new(root, marker))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn marker(&self) -> Option<&ProjectMarker> {
        self.marker.as_ref()
    }

    pub fn is_project(&self) -> bool {
        self.marker.is_some()
    }

    /// Fail when the working directory already is a project.
    pub fn require_outside(&self) -> Result<(), DomainError> {
        if self.is_project() {
            return Err(DomainError::InsideProject);
        }
        Ok(())
    }

    /// Return the marker and its type when it is one of `allowed`.
    pub fn require(
        &self,
        allowed: &[ProjectType],
    ) -> Result<(&ProjectMarker, ProjectType), DomainError> {
        let wrong = |found: Option<String>| DomainError::WrongProject {
            expected: allowed
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            found,
        };

        let marker = self.marker.as_ref().ok_or_else(|| wrong(None))?;
        match marker.project_type() {
            Ok(kind) if allowed.contains(&kind) => Ok((marker, kind)),
            _ => Err(wrong(Some(marker.project_type.clone()))),
        }
    }
}
