#![forbid(unsafe_code)]

//! A single command in the tree

use crate::args::Args;
use crate::dispatch::CommandRef;
use crate::options::{OptionParser, OptionSpec};
use crate::types::NodeId;
use std::collections::HashMap;
use std::fmt;

/// Body of a runnable command
///
/// The callback owns its output and exit behaviour; dispatch only hands it the
/// resolved command and the finished argument vector.
pub type RunCallback = Box<dyn Fn(&CommandRef<'_>, &mut Args)>;

/// A command with its usage metadata, option grammar and subcommands
///
/// Nodes are built standalone and then moved into a
/// [`CommandTree`](super::CommandTree), which assigns ids and links parents.
pub struct CommandNode {
    pub(super) key: Option<String>,
    pub(super) usage: String,
    pub(super) long: String,
    pub(super) passthrough: bool,
    pub(super) options: OptionParser,
    pub(super) run: Option<RunCallback>,
    pub(super) children: HashMap<String, NodeId>,
    pub(super) parent: Option<NodeId>,
}

impl CommandNode {
    /// Creates a node from its usage template, one usage form per line
    pub fn new(usage: impl Into<String>) -> Self {
        CommandNode {
            key: None,
            usage: usage.into(),
            long: String::new(),
            passthrough: false,
            options: OptionParser::Minimal,
            run: None,
            children: HashMap::new(),
            parent: None,
        }
    }

    /// Sets an explicit identity instead of deriving it from the usage
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the long description used for help pages
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    /// Forwards all tokens verbatim instead of parsing flags
    pub fn passthrough(mut self) -> Self {
        self.passthrough = true;
        self
    }

    /// Declares a typed option
    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.declare(spec);
        self
    }

    /// Sets the run callback, making the node a leaf
    pub fn run<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CommandRef<'_>, &mut Args) + 'static,
    {
        self.run = Some(Box::new(callback));
        self
    }

    /// Identity among siblings
    ///
    /// The explicit key if one is set, otherwise the first word of the first
    /// usage line.
    pub fn name(&self) -> &str {
        if let Some(key) = self.key.as_deref().filter(|k| !k.is_empty()) {
            return key;
        }
        self.usage
            .trim()
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or("")
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn long_description(&self) -> &str {
        &self.long
    }

    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    pub fn options(&self) -> &OptionParser {
        &self.options
    }

    /// Returns true if the node has a run callback
    pub fn is_runnable(&self) -> bool {
        self.run.is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn callback(&self) -> Option<&RunCallback> {
        self.run.as_ref()
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name())
            .field("usage", &self.usage)
            .field("passthrough", &self.passthrough)
            .field("options", &self.options)
            .field("runnable", &self.is_runnable())
            .field("children", &self.children)
            .field("parent", &self.parent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_usage() {
        let node = CommandNode::new("foo bar [args]");
        assert_eq!(node.name(), "foo");
    }

    #[test]
    fn test_name_uses_first_line_after_trim() {
        let node = CommandNode::new("\n  clone [options] <repo>\nclone2\n");
        assert_eq!(node.name(), "clone");
    }

    #[test]
    fn test_key_overrides_usage() {
        let node = CommandNode::new("pull-request [-f]").key("pr");
        assert_eq!(node.name(), "pr");
    }

    #[test]
    fn test_empty_usage_has_empty_name() {
        assert_eq!(CommandNode::new("").name(), "");
        assert_eq!(CommandNode::new("").key("").name(), "");
    }

    #[test]
    fn test_option_promotes_parser() {
        let node = CommandNode::new("sync");
        assert!(node.options().is_minimal());

        let node = node.option(OptionSpec::bool("force"));
        assert!(!node.options().is_minimal());
    }

    #[test]
    fn test_run_makes_runnable() {
        let node = CommandNode::new("sync");
        assert!(!node.is_runnable());
        let node = node.run(|_, _| {});
        assert!(node.is_runnable());
    }

    #[test]
    fn test_debug_does_not_require_callback_debug() {
        let node = CommandNode::new("sync").run(|_, _| {});
        let rendered = format!("{:?}", node);
        assert!(rendered.contains("\"sync\""));
        assert!(rendered.contains("runnable: true"));
    }
}
