//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde_json::json;

use liwe_core::domain::{ProvisionReport, StepOutcome};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => match config.output.format.to_ascii_lowercase().as_str() {
                "plain" => OutputFormat::Plain,
                "json" => OutputFormat::Json,
                _ => OutputFormat::Auto,
            },
            explicit => explicit,
        };

        // Auto → Human (TTY) or Plain (piped/redirected).
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
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet and JSON modes.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}")
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`. Never suppressed.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}")
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}")
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}")
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Print what a provisioning run did.
    ///
    /// JSON mode writes a single document to stdout even when `--quiet` is
    /// set, so scripts always get a result to parse.
    pub fn report(&self, report: &ProvisionReport) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            return self.term.write_line(&report_json(report).to_string());
        }
        if self.quiet {
            return Ok(());
        }

        for step in &report.steps {
            match &step.outcome {
                StepOutcome::Applied => self.success(&step.description)?,
                StepOutcome::Skipped { reason } => {
                    let line = format!("- {} ({reason})", step.description);
                    if self.no_color {
                        self.term.write_line(&line)?;
                    } else {
                        self.term.write_line(&line.dimmed().to_string())?;
                    }
                }
            }
        }
        self.print(&format!(
            "\n{} applied, {} already up to date",
            report.applied(),
            report.skipped()
        ))
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    fn silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }
}

fn report_json(report: &ProvisionReport) -> serde_json::Value {
    let steps: Vec<_> = report
        .steps
        .iter()
        .map(|step| match &step.outcome {
            StepOutcome::Applied => json!({
                "phase": step.phase.to_string(),
                "step": step.description,
                "outcome": "applied",
            }),
            StepOutcome::Skipped { reason } => json!({
                "phase": step.phase.to_string(),
                "step": step.description,
                "outcome": "skipped",
                "reason": reason,
            }),
        })
        .collect();

    json!({
        "run_id": report.run_id.to_string(),
        "root": report.root.display().to_string(),
        "applied": report.applied(),
        "skipped": report.skipped(),
        "steps": steps,
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
