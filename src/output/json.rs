#![forbid(unsafe_code)]

//! JSON output formatter for machine-readable output
//!
//! Every record is a single JSON object on one line with a `type` field:
//! `help`, `report` or `error`.

use crate::dispatch::{DispatchError, FlagReport, Outcome, ResolutionReport};
use crate::doc::HelpDocument;
use serde::Serialize;

/// JSON output formatter
pub struct JsonFormatter;

impl JsonFormatter {
    /// Creates a new JsonFormatter
    pub fn new() -> Self {
        JsonFormatter
    }

    pub fn format_help(&self, doc: &HelpDocument) -> String {
        to_line(&HelpRecord {
            record_type: "help",
            doc,
            rendered: doc.render(),
        })
    }

    pub fn format_report(&self, report: &ResolutionReport) -> String {
        to_line(&ReportRecord {
            record_type: "report",
            command: &report.command,
            runnable: report.runnable,
            passthrough: report.passthrough,
            positionals: &report.positionals,
            flags: &report.flags,
            terminator_seen: report.terminator_seen,
        })
    }

    pub fn format_error(&self, err: &DispatchError) -> String {
        let outcome = match err.outcome() {
            Outcome::Help => "help",
            Outcome::UserError => "user-error",
            Outcome::CallerBug => "caller-bug",
        };
        to_line(&ErrorRecord {
            record_type: "error",
            outcome,
            message: err.to_string(),
        })
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_line<T: Serialize>(record: &T) -> String {
    match serde_json::to_string(record) {
        Ok(json) => format!("{}\n", json),
        Err(_) => String::new(),
    }
}

/// Help record for JSON output
#[derive(Debug, Serialize)]
struct HelpRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    #[serde(flatten)]
    doc: &'a HelpDocument,
    rendered: String,
}

/// Resolution record for JSON output
#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    command: &'a str,
    runnable: bool,
    passthrough: bool,
    positionals: &'a [String],
    flags: &'a [FlagReport],
    terminator_seen: bool,
}

/// Error record for JSON output
#[derive(Debug, Serialize)]
struct ErrorRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    outcome: &'static str,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FlagValue;
    use serde_json::Value;

    fn parse(line: &str) -> Value {
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        serde_json::from_str(line.trim_end()).unwrap()
    }

    #[test]
    fn test_format_report() {
        let report = ResolutionReport {
            command: "clone".to_string(),
            runnable: true,
            passthrough: false,
            positionals: vec!["repo".to_string()],
            flags: vec![FlagReport {
                name: "depth".to_string(),
                value: FlagValue::Int(3),
                explicit: true,
            }],
            terminator_seen: true,
        };

        let value = parse(&JsonFormatter::new().format_report(&report));
        assert_eq!(value["type"], "report");
        assert_eq!(value["command"], "clone");
        assert_eq!(value["positionals"][0], "repo");
        assert_eq!(value["flags"][0]["name"], "depth");
        assert_eq!(value["flags"][0]["value"], 3);
        assert_eq!(value["flags"][0]["explicit"], true);
        assert_eq!(value["terminator_seen"], true);
    }

    #[test]
    fn test_format_help() {
        let doc = HelpDocument {
            title: "hub-sync".to_string(),
            name: "sync".to_string(),
            summary: "Fetch git objects from upstream.".to_string(),
            usage: "`hub sync`".to_string(),
            body: "## Options\n--color".to_string(),
        };

        let value = parse(&JsonFormatter::new().format_help(&doc));
        assert_eq!(value["type"], "help");
        assert_eq!(value["title"], "hub-sync");
        assert_eq!(value["summary"], "Fetch git objects from upstream.");
        assert_eq!(value["rendered"], doc.render());
    }

    #[test]
    fn test_format_error_outcomes() {
        let formatter = JsonFormatter::new();

        let value = parse(&formatter.format_error(&DispatchError::UnknownSubcommand {
            name: "nope".to_string(),
        }));
        assert_eq!(value["type"], "error");
        assert_eq!(value["outcome"], "user-error");
        assert_eq!(value["message"], "Unknown subcommand: nope");

        let value = parse(&formatter.format_error(&DispatchError::HelpRequested {
            text: "Usage: hub sync".to_string(),
        }));
        assert_eq!(value["outcome"], "help");

        let value = parse(&formatter.format_error(&DispatchError::NotRunnable {
            name: "pr".to_string(),
        }));
        assert_eq!(value["outcome"], "caller-bug");
    }
}
