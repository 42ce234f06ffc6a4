//! Process runner used by the environment commands.

use wizard_core::prelude::{Invocation, ProcessRunner, WizardResult};

use crate::output::OutputManager;

/// Announces every invocation before handing it to the wrapped runner.
///
/// In dry-run mode the command line is printed and nothing is spawned.
pub struct ReportingRunner<R> {
    inner: R,
    output: OutputManager,
    dry_run: bool,
}

impl<R: ProcessRunner> ReportingRunner<R> {
    pub fn new(inner: R, output: OutputManager, dry_run: bool) -> Self {
        Self {
            inner,
            output,
            dry_run,
        }
    }
}

impl<R: ProcessRunner> ProcessRunner for ReportingRunner<R> {
    fn run(&self, invocation: &Invocation) -> WizardResult<()> {
        // A closed stdout must not stop the environment from starting.
        if let Err(err) = self.output.command(invocation) {
            tracing::debug!(error = %err, "Could not announce command");
        }
        if self.dry_run {
            return Ok(());
        }
        let result = self.inner.run(invocation);
        if let Err(err) = self.output.print("") {
            tracing::debug!(error = %err, "Could not write separator");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::global::{GlobalArgs, OutputFormat};
    use crate::config::AppConfig;
    use wizard_adapters::RecordingRunner;

    fn output() -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet: true,
            no_color: true,
            config: None,
            dry_run: false,
            output_format: OutputFormat::Plain,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn delegates_when_not_dry_run() {
        let recorder = RecordingRunner::new();
        let runner = ReportingRunner::new(recorder.clone(), output(), false);
        runner
            .run(&Invocation::new("docker", "Stopping").args(["stop", "react"]))
            .unwrap();
        assert_eq!(recorder.command_lines(), ["docker stop react"]);
    }

    #[test]
    fn dry_run_spawns_nothing() {
        let recorder = RecordingRunner::new();
        let runner = ReportingRunner::new(recorder.clone(), output(), true);
        runner.run(&Invocation::new("docker", "").arg("ps")).unwrap();
        assert!(recorder.invocations().is_empty());
    }

    #[test]
    fn failures_pass_through() {
        let runner = ReportingRunner::new(RecordingRunner::failing(1), output(), false);
        assert!(runner.run(&Invocation::new("docker", "").arg("ps")).is_err());
    }
}
