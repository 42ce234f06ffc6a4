//! Process runner adapters.

use std::process::{Command, ExitStatus};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use wizard_core::{
    application::{ApplicationError, INTERRUPTED_EXIT_CODE, ports::ProcessRunner},
    domain::Invocation,
    error::WizardResult,
};

/// Runs programs with inherited stdio and waits for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    #[instrument(skip_all, fields(program = %invocation.program))]
    fn run(&self, invocation: &Invocation) -> WizardResult<()> {
        debug!(args = ?invocation.args, "Spawning");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|e| ApplicationError::CommandNotStarted {
                program: invocation.program.clone(),
                reason: e.to_string(),
            })?;

        if status.success() {
            return Ok(());
        }

        Err(ApplicationError::CommandFailed {
            command: invocation.command_line(),
            code: exit_code(status),
        }
        .into())
    }
}

/// Exit code, mapping death by SIGINT to the shell's 130.
fn exit_code(status: ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        const SIGINT: i32 = 2;
        if status.signal() == Some(SIGINT) {
            return Some(INTERRUPTED_EXIT_CODE);
        }
    }
    status.code()
}

/// Records invocations instead of running them.
///
/// Clones share the same log. An optional exit code makes every run fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    log: Arc<Mutex<Vec<Invocation>>>,
    fail_with: Option<i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every run is recorded then fails with `code`.
    pub fn failing(code: i32) -> Self {
        Self {
            fail_with: Some(code),
            ..Self::default()
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> WizardResult<()> {
        if let Ok(mut log) = self.log.lock() {
            log.push(invocation.clone());
        }
        match self.fail_with {
            Some(code) => Err(ApplicationError::CommandFailed {
                command: invocation.command_line(),
                code: Some(code),
            }
            .into()),
            None => Ok(()),
        }
    }
}
