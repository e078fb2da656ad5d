//! Subcommands of the `cmdtree` binary
//!
//! Each subcommand loads a manifest, builds an inert tree from it (handlers
//! bound to no-ops) and inspects it through a [`Dispatcher`].

use crate::cli::args::{Cli, Command, OutputFormat};
use crate::config::{Manifest, ManifestError};
use crate::dispatch::{DispatchError, Dispatcher, Outcome, ResolutionReport};
use crate::doc::HelpDocument;
use crate::output::{HumanFormatter, JsonFormatter};
use crate::types::{NodeId, is_valid_name};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USER_ERROR: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Runs the parsed command line and returns the process exit code
///
/// Exit code:
/// - 0: success, or help was requested
/// - 1: the invocation being inspected is wrong (unknown subcommand, bad flag)
/// - 2: the manifest is unreadable or invalid, or output could not be written
pub fn run(cli: &Cli) -> i32 {
    let out = Output::new(cli);
    match &cli.command {
        Command::Check { manifest } => run_check(manifest, &out),
        Command::Synopsis { manifest, path } => run_synopsis(manifest, path, &out),
        Command::Man { manifest, path } => run_man(manifest, path, &out),
        Command::Resolve { manifest, tokens } => run_resolve(manifest, tokens, &out),
    }
}

/// Loads a manifest and checks every command name
pub fn run_check(manifest: &Path, out: &Output) -> i32 {
    let dispatcher = match load(manifest) {
        Ok(dispatcher) => dispatcher,
        Err(e) => return out.manifest_error(manifest, &e),
    };
    let tree = dispatcher.tree();

    let invalid: Vec<String> = tree
        .ids()
        .filter(|&id| id != tree.root())
        .filter(|&id| !is_valid_name(tree[id].name()))
        .map(|id| tree.display_path(id))
        .collect();

    let summary = CheckSummary {
        record_type: "check",
        program: dispatcher.program(),
        commands: tree.len(),
        invalid_names: &invalid,
    };

    let written = match out.format {
        OutputFormat::Json => write_json(&summary),
        OutputFormat::Human if invalid.is_empty() => write_stdout(&format!(
            "ok: '{}' defines {} commands\n",
            summary.program, summary.commands
        )),
        OutputFormat::Human => invalid.iter().try_for_each(|name| {
            out.human
                .write_message(&format!("invalid command name '{}'", name))
        }),
    };

    finish(
        written,
        if invalid.is_empty() {
            EXIT_SUCCESS
        } else {
            EXIT_ERROR
        },
    )
}

/// Prints the usage block of the command at `path`
pub fn run_synopsis(manifest: &Path, path: &[String], out: &Output) -> i32 {
    let dispatcher = match load(manifest) {
        Ok(dispatcher) => dispatcher,
        Err(e) => return out.manifest_error(manifest, &e),
    };
    let id = match find(&dispatcher, path, out) {
        Ok(id) => id,
        Err(code) => return code,
    };

    let text = dispatcher.synopsis(id);
    let written = match out.format {
        OutputFormat::Json => write_json(&SynopsisRecord {
            record_type: "synopsis",
            command: dispatcher.tree().display_path(id),
            text,
        }),
        OutputFormat::Human => write_stdout(&format!("{}\n", text)),
    };
    finish(written, EXIT_SUCCESS)
}

/// Prints the help page of the command at `path`
pub fn run_man(manifest: &Path, path: &[String], out: &Output) -> i32 {
    let dispatcher = match load(manifest) {
        Ok(dispatcher) => dispatcher,
        Err(e) => return out.manifest_error(manifest, &e),
    };
    let id = match find(&dispatcher, path, out) {
        Ok(id) => id,
        Err(code) => return code,
    };

    finish(out.help(&dispatcher.help(id)), EXIT_SUCCESS)
}

/// Dry-runs dispatch of `tokens` and prints what would run
pub fn run_resolve(manifest: &Path, tokens: &[String], out: &Output) -> i32 {
    let dispatcher = match load(manifest) {
        Ok(dispatcher) => dispatcher,
        Err(e) => return out.manifest_error(manifest, &e),
    };

    match dispatcher.report(tokens.iter().cloned()) {
        Ok(report) => finish(out.report(&report), EXIT_SUCCESS),
        Err(e) => finish(out.dispatch_error(&e), exit_code(&e)),
    }
}

/// Exit code for a failed dispatch
pub fn exit_code(err: &DispatchError) -> i32 {
    match err.outcome() {
        Outcome::Help => EXIT_SUCCESS,
        Outcome::UserError => EXIT_USER_ERROR,
        Outcome::CallerBug => EXIT_ERROR,
    }
}

/// Returns `code` if the output was written, otherwise reports the failure
fn finish(written: io::Result<()>, code: i32) -> i32 {
    match written {
        Ok(()) => code,
        Err(e) => {
            log::debug!("output failed, discarding exit code {}", code);
            eprintln!("Failed to write output: {}", e);
            EXIT_ERROR
        }
    }
}

fn load(path: &Path) -> Result<Dispatcher, ManifestError> {
    let manifest = Manifest::load(path)?;
    let tree = manifest.build_inert()?;
    log::debug!("loaded manifest {} ({} commands)", path.display(), tree.len());
    Ok(Dispatcher::new(tree, manifest.program))
}

/// Looks up `path`, reporting a missing command; `Err` carries the exit code
fn find(dispatcher: &Dispatcher, path: &[String], out: &Output) -> Result<NodeId, i32> {
    match dispatcher.tree().find(path) {
        Some(id) => Ok(id),
        None => {
            let written = out.message(&format!("no command '{}' in manifest", path.join(" ")));
            Err(finish(written, EXIT_USER_ERROR))
        }
    }
}

fn write_stdout(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

fn write_json<T: Serialize>(record: &T) -> io::Result<()> {
    let json = serde_json::to_string(record).map_err(io::Error::other)?;
    write_stdout(&format!("{}\n", json))
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    program: &'a str,
    commands: usize,
    invalid_names: &'a [String],
}

#[derive(Serialize)]
struct SynopsisRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    command: String,
    text: String,
}

#[derive(Serialize)]
struct MessageRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    message: &'a str,
}

/// Routes records to the human or JSON formatter
pub struct Output {
    format: OutputFormat,
    human: HumanFormatter,
    json: JsonFormatter,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self::with_format(cli.format, cli.color.into())
    }

    pub fn with_format(format: OutputFormat, color: termcolor::ColorChoice) -> Self {
        Output {
            format,
            human: HumanFormatter::new(color),
            json: JsonFormatter::new(),
        }
    }

    fn help(&self, doc: &HelpDocument) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_stdout(&self.json.format_help(doc)),
            OutputFormat::Human => self.human.write_help(doc),
        }
    }

    fn report(&self, report: &ResolutionReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_stdout(&self.json.format_report(report)),
            OutputFormat::Human => self.human.write_report(report),
        }
    }

    fn dispatch_error(&self, err: &DispatchError) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_stdout(&self.json.format_error(err)),
            OutputFormat::Human => self.human.write_error(err),
        }
    }

    fn message(&self, message: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&MessageRecord {
                record_type: "error",
                message,
            }),
            OutputFormat::Human => self.human.write_message(message),
        }
    }

    fn manifest_error(&self, path: &Path, err: &ManifestError) -> i32 {
        log::debug!("manifest {} rejected: {:?}", path.display(), err);
        let written = self.message(&format!("invalid manifest '{}': {}", path.display(), err));
        finish(written, EXIT_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
program = "hub"

[root]
usage = "[--noop] <command> [<args>]"

[[root.commands]]
usage = "sync"
long = "Fetch git objects from upstream."
handler = "sync"

[[root.commands]]
key = "pr"
usage = "pr list [-s <STATE>]"

[[root.commands.commands]]
usage = "list"
handler = "pr-list"
options = [{ name = "state", short = "s", kind = "string", default = "open" }]
"#;

    fn write_manifest(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cmdtree.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn quiet() -> Output {
        Output::with_format(OutputFormat::Human, termcolor::ColorChoice::Never)
    }

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_check_valid_manifest() {
        let (_dir, path) = write_manifest(MANIFEST);
        assert_eq!(run_check(&path, &quiet()), EXIT_SUCCESS);
    }

    #[test]
    fn test_check_invalid_name() {
        let (_dir, path) = write_manifest(
            r#"
program = "hub"
[root]
usage = "<command>"
[[root.commands]]
usage = "bad!name"
handler = "x"
"#,
        );
        assert_eq!(run_check(&path, &quiet()), EXIT_ERROR);
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        assert_eq!(run_check(&path, &quiet()), EXIT_ERROR);
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let (_dir, path) = write_manifest(
            r#"
program = "hub"
[root]
usage = "<command>"
[[root.commands]]
usage = "pr"
"#,
        );
        assert_eq!(run_check(&path, &quiet()), EXIT_ERROR);
    }

    #[test]
    fn test_synopsis_and_man_paths() {
        let (_dir, path) = write_manifest(MANIFEST);
        let out = quiet();

        assert_eq!(run_synopsis(&path, &[], &out), EXIT_SUCCESS);
        assert_eq!(run_synopsis(&path, &tokens(&["pr", "list"]), &out), EXIT_SUCCESS);
        assert_eq!(run_man(&path, &tokens(&["sync"]), &out), EXIT_SUCCESS);
        assert_eq!(run_man(&path, &tokens(&["nope"]), &out), EXIT_USER_ERROR);
    }

    #[test]
    fn test_resolve_exit_codes() {
        let (_dir, path) = write_manifest(MANIFEST);
        let out = quiet();

        assert_eq!(
            run_resolve(&path, &tokens(&["pr", "list", "-s", "closed"]), &out),
            EXIT_SUCCESS
        );
        assert_eq!(run_resolve(&path, &tokens(&["sync", "--help"]), &out), EXIT_SUCCESS);
        assert_eq!(run_resolve(&path, &tokens(&["nope"]), &out), EXIT_USER_ERROR);
        assert_eq!(
            run_resolve(&path, &tokens(&["pr", "list", "--bogus"]), &out),
            EXIT_USER_ERROR
        );
    }

    #[test]
    fn test_write_failure_overrides_exit_code() {
        let broken = || Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(finish(broken(), EXIT_SUCCESS), EXIT_ERROR);
        assert_eq!(finish(broken(), EXIT_USER_ERROR), EXIT_ERROR);
        assert_eq!(finish(Ok(()), EXIT_USER_ERROR), EXIT_USER_ERROR);
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(
            exit_code(&DispatchError::HelpRequested {
                text: String::new()
            }),
            EXIT_SUCCESS
        );
        assert_eq!(
            exit_code(&DispatchError::NotRunnable {
                name: "pr".to_string()
            }),
            EXIT_ERROR
        );
    }
}
