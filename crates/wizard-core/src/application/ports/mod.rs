//! Traits the services drive and the adapters crate implements.
//!
//! - `Filesystem`: reads, writes and directory listing
//! - `TemplateRenderer`: named templates to text
//! - `ProcessRunner`: docker and docker-compose invocations
//! - `Prompter`: yes/no confirmations

pub mod output;

pub use output::{Filesystem, ProcessRunner, Prompter, TemplateRenderer};

#[cfg(test)]
pub use output::{MockProcessRunner, MockPrompter};
