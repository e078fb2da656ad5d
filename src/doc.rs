#![forbid(unsafe_code)]

//! Usage and help rendering
//!
//! Help pages are derived from two templates stored on each node:
//! - the usage template, one usage form per line
//! - the long description, whose first line is the summary and whose rest is
//!   lightly marked-up text run through [`transforms`]

pub mod transforms;

use crate::tree::{CommandNode, CommandTree};
use crate::types::NodeId;
use serde::Serialize;

pub use transforms::{code_references, normalize_body};

const USAGE_PREFIX: &str = "Usage:";

/// Identity of `node`: its key, or the first word of its usage
pub fn name(node: &CommandNode) -> &str {
    node.name()
}

/// Usage template of `id`, falling back to its parent's when blank
fn usage_template(tree: &CommandTree, id: NodeId) -> &str {
    let Some(node) = tree.get(id) else {
        return "";
    };
    if !node.usage().trim().is_empty() {
        return node.usage();
    }
    node.parent()
        .and_then(|parent| tree.get(parent))
        .map(CommandNode::usage)
        .unwrap_or("")
}

/// Renders the `Usage:` block for `id`
///
/// The first non-blank usage line is prefixed with `Usage: <program> `; later
/// lines get a blank prefix of the same width so they line up.
pub fn synopsis(tree: &CommandTree, id: NodeId, program: &str) -> String {
    let blank = " ".repeat(USAGE_PREFIX.len());
    let mut prefix = USAGE_PREFIX;

    let mut lines = Vec::new();
    for line in usage_template(tree, id).lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        lines.push(format!("{} {} {}", prefix, program, line));
        prefix = blank.as_str();
    }
    lines.join("\n")
}

/// Manual-style help page for a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpDocument {
    /// Page title, e.g. `hub-pr-list`
    pub title: String,
    /// Space-joined command path, e.g. `pr list`
    pub name: String,
    /// First line of the long description
    pub summary: String,
    /// Usage lines with command words marked as code
    pub usage: String,
    /// Normalized long description without its summary line
    pub body: String,
}

impl HelpDocument {
    /// Markdown rendering of the page
    pub fn render(&self) -> String {
        let mut out = format!(
            "{}(1) -- {}\n===\n\n## Synopsis\n\n{}\n",
            self.title, self.summary, self.usage
        );
        if !self.body.is_empty() {
            out.push('\n');
            out.push_str(&self.body);
            out.push('\n');
        }
        out
    }
}

/// Builds the help page for `id`
pub fn help_text(tree: &CommandTree, id: NodeId, program: &str) -> HelpDocument {
    let path = tree.path(id);
    let title = std::iter::once(program)
        .chain(path.iter().copied())
        .collect::<Vec<_>>()
        .join("-");

    let long = tree.get(id).map(CommandNode::long_description).unwrap_or("").trim();
    let (summary, rest) = match long.split_once('\n') {
        Some((first, rest)) => (first.trim(), rest),
        None => (long, ""),
    };

    let body = normalize_body(rest);
    let body = body.trim_start_matches('\n').trim_end();

    HelpDocument {
        title,
        name: path.join(" "),
        summary: summary.to_string(),
        usage: code_references(usage_template(tree, id), program),
        body: body.to_string(),
    }
}
