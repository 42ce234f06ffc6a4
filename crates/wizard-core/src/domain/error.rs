//! Broken rules about answers, project kinds and config documents.

use thiserror::Error;

/// Cloneable so feature reports can hold on to them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // validation errors
    #[error("{field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid configuration tree: {0}")]
    InvalidTree(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown project type '{0}'")]
    UnknownProjectType(String),

    #[error("Unknown build type '{0}'")]
    UnknownBuildType(String),

    // project context errors
    #[error("You can only run this command outside a project folder")]
    InsideProject,

    #[error("You can only run this command in projects of type: {expected}")]
    WrongProject { expected: String, found: Option<String> },

    #[error("Project marker is malformed: {0}")]
    MalformedMarker(String),

    // document errors (manifest, routes)
    #[error("Dependency manifest is malformed: {0}")]
    MalformedManifest(String),

    #[error("Routes file is malformed: {0}")]
    MalformedRoutes(String),

    #[error("Sentinel '{sentinel}' not found in routes file")]
    SentinelNotFound { sentinel: &'static str },

    // lookup errors
    #[error("No {kind} named '{name}' is configured")]
    NotConfigured { kind: &'static str, name: String },
}

impl DomainError {
    /// Hints shown below the message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { field, .. } => vec![
                format!("Check the value given for {field}"),
                "Values are required and limited to 30 characters".into(),
            ],
            Self::InsideProject => vec![
                "A .wizard file was found in the current directory".into(),
                "Run generators from the folder that should contain the new project".into(),
            ],
            Self::WrongProject { expected, found } => {
                let mut out = vec![format!("This command needs a {expected} project")];
                match found {
                    Some(found) => out.push(format!("The current project is of type {found}")),
                    None => out.push("No .wizard file was found in the current directory".into()),
                }
                out.push("cd into a project generated by wizard and try again".into());
                out
            }
            Self::MalformedMarker(_) => vec![
                "The .wizard file must be a JSON object with a projectType key".into(),
            ],
            Self::SentinelNotFound { sentinel } => vec![
                format!("The routes file must contain the marker `{sentinel}`"),
                "Restore the marker comment or switch the routes format to json".into(),
            ],
            Self::MalformedManifest(_) => vec![
                "package.json must be a JSON object".into(),
                "Dependency groups must be objects of name to version".into(),
            ],
            Self::UnknownProjectType(_) => vec![
                "Supported project types: backend-express, frontend-react".into(),
            ],
            Self::UnknownBuildType(_) => vec![
                "Supported build types: development, testing, production".into(),
            ],
            _ => Vec::new(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::UnknownProjectType(_)
            | Self::UnknownBuildType(_) => ErrorCategory::Validation,
            Self::InsideProject | Self::WrongProject { .. } => ErrorCategory::Context,
            Self::InvalidTree(_) | Self::InvalidConfig(_) | Self::NotConfigured { .. } => {
                ErrorCategory::Configuration
            }
            Self::MalformedMarker(_)
            | Self::MalformedManifest(_)
            | Self::MalformedRoutes(_)
            | Self::SentinelNotFound { .. } => ErrorCategory::Document,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Context,
    Configuration,
    Document,
}
