//! Project rules and use cases for the `wizard` scaffolder.
//!
//! `domain` is pure: answers and their validation, the `.wizard` marker,
//! package manifests, route tables, docker invocations. `application`
//! holds the services the CLI calls, and the traits (`Filesystem`,
//! `TemplateRenderer`, `ProcessRunner`, `Prompter`) that `wizard-adapters`
//! implements. Nothing here touches the disk or spawns a process directly.
//!
//! ```rust,no_run
//! use wizard_core::prelude::*;
//!
//! # fn run(fs: Box<dyn Filesystem>, runner: Box<dyn ProcessRunner>, context: ProjectContext, config: WizardConfig) -> WizardResult<()> {
//! EnvironmentService::new(runner, fs).build(&context, &config, BuildType::Development)?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        ApplicationError, DatabaseService, EnvironmentService, FeatureReport, FeatureService,
        GenerationOutcome, ScaffoldService, TestSelection,
        ports::{Filesystem, ProcessRunner, Prompter, TemplateRenderer},
    };
    pub use crate::domain::{
        AnswerValidator, BuildType, DatabaseFileKind, DomainError, EnvCommand, Invocation,
        LogOptions, ProjectAnswers, ProjectContext, ProjectType, WizardConfig,
    };
    pub use crate::error::{WizardError, WizardResult};
}
