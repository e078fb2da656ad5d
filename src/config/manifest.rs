#![forbid(unsafe_code)]

//! TOML manifest describing a command tree
//!
//! ```toml
//! program = "hub"
//!
//! [root]
//! usage = "<command> [<args>]"
//! handler = "git"
//!
//! [[root.commands]]
//! usage = "clone [-p] <repo> [<dir>]"
//! long = "Clone a repository from GitHub."
//! handler = "clone"
//!
//! [[root.commands.options]]
//! name = "private"
//! short = "p"
//! kind = "bool"
//! ```
//!
//! Handlers are referenced by name and bound to callbacks through a
//! [`HandlerRegistry`] when the tree is built.

use crate::args::Args;
use crate::dispatch::CommandRef;
use crate::options::OptionSpec;
use crate::tree::{CommandNode, CommandTree, TreeError};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Errors raised while loading or building a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("command '{command}' refers to unknown handler '{handler}'")]
    UnknownHandler { command: String, handler: String },

    #[error("command '{command}' declares option '--{option}' more than once")]
    DuplicateOption { command: String, option: String },

    #[error("command '{command}' declares shorthand '-{short}' for both '--{first}' and '--{second}'")]
    DuplicateShorthand {
        command: String,
        short: char,
        first: String,
        second: String,
    },

    #[error("default for option '--{option}' of command '{command}' does not match its kind")]
    DefaultKindMismatch { command: String, option: String },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// One command in a manifest; nested through `commands`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandEntry {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub long: String,
    #[serde(default)]
    pub passthrough: bool,
    /// Name of the callback in the [`HandlerRegistry`]
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}

/// A whole command tree as read from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Program name shown in usage lines
    pub program: String,
    pub root: CommandEntry,
}

type Handler = Rc<dyn Fn(&CommandRef<'_>, &mut Args)>;

/// Named run callbacks that manifests can refer to
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&CommandRef<'_>, &mut Args) + 'static,
    {
        self.handlers.insert(name.into(), Rc::new(callback));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).cloned()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &names)
            .finish()
    }
}

impl Manifest {
    /// Reads and parses a manifest file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Every handler name referenced anywhere in the manifest
    pub fn handler_names(&self) -> Vec<String> {
        let mut names = HashSet::new();
        let mut stack = vec![&self.root];
        while let Some(entry) = stack.pop() {
            if let Some(handler) = &entry.handler {
                names.insert(handler.clone());
            }
            stack.extend(entry.commands.iter());
        }
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();
        names
    }

    /// Builds and validates the tree, binding handlers from `registry`
    pub fn build(&self, registry: &HandlerRegistry) -> Result<CommandTree, ManifestError> {
        let root = node_from_entry(&self.root, "<root>", registry)?;
        let mut tree = CommandTree::new(root);
        let root_id = tree.root();
        add_children(&mut tree, root_id, &self.root, registry)?;
        tree.validate()?;

        log::debug!(
            "built command tree for '{}' with {} commands",
            self.program,
            tree.len()
        );
        Ok(tree)
    }

    /// Builds the tree with every referenced handler bound to a no-op
    ///
    /// Useful for inspecting or dry-running a manifest without the real
    /// command bodies.
    pub fn build_inert(&self) -> Result<CommandTree, ManifestError> {
        let mut registry = HandlerRegistry::new();
        for name in self.handler_names() {
            let label = name.clone();
            registry.register(name, move |cmd, _args| {
                log::info!("inert handler '{}' invoked for '{}'", label, cmd.name());
            });
        }
        self.build(&registry)
    }
}

fn add_children(
    tree: &mut CommandTree,
    parent: NodeId,
    entry: &CommandEntry,
    registry: &HandlerRegistry,
) -> Result<(), ManifestError> {
    for child in &entry.commands {
        let label = child
            .key
            .clone()
            .or_else(|| child.usage.split_whitespace().next().map(str::to_string))
            .unwrap_or_default();
        let node = node_from_entry(child, &label, registry)?;
        let id = tree.add(parent, node)?;
        add_children(tree, id, child, registry)?;
    }
    Ok(())
}

fn node_from_entry(
    entry: &CommandEntry,
    label: &str,
    registry: &HandlerRegistry,
) -> Result<CommandNode, ManifestError> {
    let mut node = CommandNode::new(entry.usage.clone()).long(entry.long.clone());
    if let Some(key) = &entry.key {
        node = node.key(key.clone());
    }
    if entry.passthrough {
        node = node.passthrough();
    }

    let mut seen = HashSet::new();
    let mut shorts: HashMap<char, &str> = HashMap::new();
    for spec in &entry.options {
        if !seen.insert(spec.name.as_str()) {
            return Err(ManifestError::DuplicateOption {
                command: label.to_string(),
                option: spec.name.clone(),
            });
        }
        if let Some(short) = spec.short
            && let Some(first) = shorts.insert(short, spec.name.as_str())
        {
            return Err(ManifestError::DuplicateShorthand {
                command: label.to_string(),
                short,
                first: first.to_string(),
                second: spec.name.clone(),
            });
        }
        if let Some(default) = &spec.default
            && !default.matches_kind(spec.kind)
        {
            return Err(ManifestError::DefaultKindMismatch {
                command: label.to_string(),
                option: spec.name.clone(),
            });
        }
        node = node.option(spec.clone());
    }

    if let Some(handler_name) = &entry.handler {
        let handler = registry
            .get(handler_name)
            .ok_or_else(|| ManifestError::UnknownHandler {
                command: label.to_string(),
                handler: handler_name.clone(),
            })?;
        node = node.run(move |cmd, args| handler(cmd, args));
    }

    Ok(node)
}
