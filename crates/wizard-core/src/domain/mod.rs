// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Wizard.
//!
//! Pure logic only: configuration trees, document mutations (manifests,
//! env files, routes), project context and Docker argument assembly. All
//! filesystem, template and process concerns are reached through the ports
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: Functions take and return values, never paths to open
//! - **Owned data**: All domain objects are Clone + PartialEq
pub mod config;
pub mod config_tree;
pub mod database;
pub mod docker;
pub mod environment;
pub mod error;
pub mod manifest;
pub mod project;
pub mod routes;

mod validation;

pub use config::{
    Bins, DependencySettings, EnvCommand, EnvironmentSettings, EnvironmentVariableSettings,
    FeatureSettings, ProjectSettings, RouteSettings, TemplateSet, WizardConfig,
};
pub use config_tree::{ConfigTree, FileMapRecord, TreeEntry, flatten_files, flatten_folders};
pub use database::{DatabaseFileKind, DatabaseFileSettings, DatabaseSettings, database_file_name};
pub use docker::{
    CommandSpec, ComposeDriver, ContainerOption, ContainerSpec, DockerDriver, Engine,
    EnvironmentDriver, EnvPair, Invocation, LogOptions, PortMapping, RuntimeDescriptor,
    VolumeMapping,
};
pub use environment::{EnvVariable, EnvVariableGroup, generate_key};
pub use error::{DomainError, ErrorCategory};
pub use manifest::{Dependency, DependencyGroup, GroupReport, MergeReport, merge_dependencies};
pub use project::{
    BuildType, MARKER_FILE, ProjectAnswers, ProjectContext, ProjectMarker, ProjectType,
};
pub use routes::{ROUTES_SENTINEL, RouteDescriptor, RoutesFormat};
pub use validation::{AnswerValidator, MAX_NAME_LENGTH};
