#![forbid(unsafe_code)]

//! Human-readable output formatter with colorization support

use crate::dispatch::{DispatchError, Outcome, ResolutionReport};
use crate::doc::HelpDocument;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Human-readable output formatter
///
/// Formats help pages, resolution reports and dispatch errors for terminal
/// display with optional colors.
pub struct HumanFormatter {
    color_choice: ColorChoice,
}

impl HumanFormatter {
    /// Creates a new HumanFormatter with the specified color choice
    pub fn new(color_choice: ColorChoice) -> Self {
        HumanFormatter { color_choice }
    }

    /// Plain rendering of a help page
    pub fn format_help(&self, doc: &HelpDocument) -> String {
        doc.render()
    }

    /// Plain rendering of a resolution report
    pub fn format_report(&self, report: &ResolutionReport) -> String {
        let mut output = String::new();

        let command = if report.command.is_empty() {
            "<root>"
        } else {
            report.command.as_str()
        };
        output.push_str(&format!("command: {}\n", command));
        if report.passthrough {
            output.push_str("mode: passthrough\n");
        }
        if !report.runnable {
            output.push_str("warning: command has no run callback\n");
        }

        output.push_str(&format!(
            "positionals: {}\n",
            if report.positionals.is_empty() {
                "(none)".to_string()
            } else {
                report.positionals.join(" ")
            }
        ));

        if !report.flags.is_empty() {
            output.push_str("flags:\n");
            for flag in &report.flags {
                output.push_str(&format!(
                    "  --{} = {}{}\n",
                    flag.name,
                    flag.value,
                    if flag.explicit { "" } else { " (default)" }
                ));
            }
        }

        if report.terminator_seen {
            output.push_str("terminator: seen\n");
        }

        output
    }

    /// Plain rendering of a dispatch failure
    ///
    /// Help text is returned as-is; everything else gets an `error:` prefix.
    pub fn format_error(&self, err: &DispatchError) -> String {
        match err.outcome() {
            Outcome::Help => format!("{}\n", err),
            Outcome::UserError | Outcome::CallerBug => format!("error: {}\n", err),
        }
    }

    /// Write a help page to stdout, with bold headings
    pub fn write_help(&self, doc: &HelpDocument) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);

        for line in doc.render().lines() {
            if line.starts_with("## ") || line == "===" || line.starts_with(&doc.title) {
                stdout.set_color(ColorSpec::new().set_bold(true))?;
                writeln!(stdout, "{}", line)?;
                stdout.reset()?;
            } else {
                writeln!(stdout, "{}", line)?;
            }
        }

        stdout.flush()
    }

    /// Write a resolution report to stdout with colors
    pub fn write_report(&self, report: &ResolutionReport) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);

        for line in self.format_report(report).lines() {
            if line.starts_with("  --") {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
                writeln!(stdout, "{}", line)?;
                stdout.reset()?;
                continue;
            }

            let Some((label, rest)) = line.split_once(':') else {
                writeln!(stdout, "{}", line)?;
                continue;
            };

            if label == "warning" {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
            } else {
                stdout.set_color(ColorSpec::new().set_bold(true))?;
            }
            write!(stdout, "{}:", label)?;
            stdout.reset()?;
            writeln!(stdout, "{}", rest)?;
        }

        stdout.flush()
    }

    /// Write a dispatch failure to stderr
    ///
    /// Help requests go to stdout since they are not failures.
    pub fn write_error(&self, err: &DispatchError) -> io::Result<()> {
        if err.is_help() {
            let mut stdout = StandardStream::stdout(self.color_choice);
            writeln!(stdout, "{}", err)?;
            return stdout.flush();
        }

        let mut stderr = StandardStream::stderr(self.color_choice);
        stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stderr, "error")?;
        stderr.reset()?;
        writeln!(stderr, ": {}", err)?;
        stderr.flush()
    }

    /// Write a plain message to stderr with a red `error:` prefix
    pub fn write_message(&self, message: &str) -> io::Result<()> {
        let mut stderr = StandardStream::stderr(self.color_choice);
        stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stderr, "error")?;
        stderr.reset()?;
        writeln!(stderr, ": {}", message)?;
        stderr.flush()
    }
}
