//! Everything written to stdout goes through [`OutputManager`].

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use wizard_core::prelude::Invocation;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Quiet, colour and format settings for stdout.
///
/// Cheap to clone: the process runner keeps its own copy to announce each
/// subprocess.
#[derive(Debug, Clone)]
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Flag wins; otherwise the configured format, with Auto resolved
        // against stdout.
        let requested = match args.output_format {
            OutputFormat::Auto => match config.output.format.as_str() {
                "plain" => OutputFormat::Plain,
                "json" => OutputFormat::Json,
                _ => OutputFormat::Auto,
            },
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format == OutputFormat::Plain,
            term: Term::stdout(),
        }
    }

    /// Plain line, dropped under `--quiet`.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.line(None, msg, |t| t.to_owned())
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.line(Some('\u{2713}'), msg, |t| t.green().to_string())
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.line(Some('\u{26a0}'), msg, |t| t.yellow().to_string())
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.line(Some('\u{2139}'), msg, |t| t.blue().to_string())
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        self.line(None, text, |t| t.cyan().bold().to_string())
    }

    /// One line of human output, prefixed with `marker` when given.
    fn line(&self, marker: Option<char>, msg: &str, paint: fn(&str) -> String) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        let text = match marker {
            Some(marker) => format!("{marker} {msg}"),
            None => msg.to_owned(),
        };
        if self.no_color {
            self.term.write_line(&text)
        } else {
            self.term.write_line(&paint(&text))
        }
    }

    /// Announce a subprocess: its description as a warning, then the
    /// command line dimmed.
    pub fn command(&self, invocation: &Invocation) -> io::Result<()> {
        if self.silenced() {
            return Ok(());
        }
        if !invocation.description.is_empty() {
            self.warning(&invocation.description)?;
        }
        let line = invocation.command_line();
        if self.no_color {
            self.term.write_line(&line)
        } else {
            self.term.write_line(&line.dimmed().to_string())
        }
    }

    /// `Executed in 1.23s.`
    pub fn duration(&self, elapsed: Duration) -> io::Result<()> {
        self.info(&format_duration(elapsed))
    }

    /// Print a value as pretty JSON. Shown even in quiet mode, since it was
    /// asked for explicitly.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// `true` when commands should emit a JSON report instead of prose.
    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    // JSON mode keeps stdout parseable.
    fn silenced(&self) -> bool {
        self.quiet || self.is_json()
    }
}

fn format_duration(elapsed: Duration) -> String {
    format!("Executed in {:.2}s.", elapsed.as_secs_f64())
}
