#![forbid(unsafe_code)]

//! Command tree arena
//!
//! Nodes are stored in a flat vector and refer to each other by [`NodeId`].
//! Parents are plain indices, so the tree has a single owner and no cycles.

mod node;

pub use node::{CommandNode, RunCallback};

use crate::types::NodeId;
use std::ops::Index;
use thiserror::Error;

/// Errors raised while building or validating a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A sibling with the same identity already exists
    #[error("command '{name}' is already registered under '{parent}'")]
    DuplicateCommand { parent: String, name: String },

    /// The node has neither a key nor a usage line
    #[error("command under '{parent}' has neither a key nor a usage line to name it")]
    MissingName { parent: String },

    /// The id was not issued by this tree
    #[error("node {0} does not belong to this tree")]
    UnknownNode(NodeId),

    /// A grouping node that can never dispatch anywhere
    #[error("command '{0}' has no run callback and no subcommands")]
    EmptyGroup(String),
}

/// Arena holding every command reachable from the root
#[derive(Debug)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    /// Creates a tree whose root is `root`
    pub fn new(mut root: CommandNode) -> Self {
        root.parent = None;
        root.children.clear();
        CommandTree { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    /// Attaches `node` as a subcommand of `parent`
    pub fn add(&mut self, parent: NodeId, mut node: CommandNode) -> Result<NodeId, TreeError> {
        if parent.0 >= self.nodes.len() {
            return Err(TreeError::UnknownNode(parent));
        }

        let name = node.name().to_string();
        if name.is_empty() {
            return Err(TreeError::MissingName {
                parent: self.display_path(parent),
            });
        }
        if self.nodes[parent.0].children.contains_key(&name) {
            return Err(TreeError::DuplicateCommand {
                parent: self.display_path(parent),
                name,
            });
        }

        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.insert(name, id);
        Ok(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(CommandNode::parent)
    }

    /// Children of `id`, sorted by name
    pub fn children(&self, id: NodeId) -> Vec<(&str, NodeId)> {
        let mut children: Vec<(&str, NodeId)> = self
            .get(id)
            .map(|node| {
                node.children
                    .iter()
                    .map(|(name, child)| (name.as_str(), *child))
                    .collect()
            })
            .unwrap_or_default();
        children.sort_by(|a, b| a.0.cmp(b.0));
        children
    }

    /// Follows `path` from the root, one subcommand name per element
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        path.iter().try_fold(self.root(), |current, name| {
            self.get(current)?.child(name.as_ref())
        })
    }

    /// Subcommand names leading from the root to `id`
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            names.push(self[current].name());
            current = parent;
        }
        names.reverse();
        names
    }

    /// Space-joined path, or `<root>` for the root itself
    pub fn display_path(&self, id: NodeId) -> String {
        let path = self.path(id);
        if path.is_empty() {
            "<root>".to_string()
        } else {
            path.join(" ")
        }
    }

    /// Node ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Checks that every grouping node has somewhere to dispatch to
    pub fn validate(&self) -> Result<(), TreeError> {
        for id in self.ids() {
            let node = &self[id];
            if !node.is_runnable() && !node.has_children() {
                return Err(TreeError::EmptyGroup(self.display_path(id)));
            }
        }
        Ok(())
    }
}

impl Index<NodeId> for CommandTree {
    type Output = CommandNode;

    fn index(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }
}
