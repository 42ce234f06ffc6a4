//! Use cases: scaffolding, feature generation, docker environments and
//! Knex files. Services only talk to the outside through `ports`.

mod context;
pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    DatabaseService, EnvironmentService, FeatureReport, FeatureService, GenerationOutcome,
    ScaffoldService, TestSelection,
};

pub use ports::{Filesystem, ProcessRunner, Prompter, TemplateRenderer};

pub use error::{ApplicationError, INTERRUPTED_EXIT_CODE};
