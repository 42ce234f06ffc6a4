//! Infrastructure adapters for Wizard.
//!
//! This crate implements the ports defined in `wizard-core::application::ports`
//! and ships the built-in configuration and templates.

pub mod builtin;
pub mod filesystem;
pub mod process;
pub mod renderer;

pub use builtin::builtin_config;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{RecordingRunner, SystemProcessRunner};
pub use renderer::JinjaRenderer;
