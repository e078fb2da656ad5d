#![forbid(unsafe_code)]

//! Subcommand resolution and command execution
//!
//! A [`Dispatcher`] owns a finished [`CommandTree`] and the program name used
//! in usage lines. One dispatcher is built at startup and passed by reference
//! to whatever reads the process arguments.
//!
//! Dispatch proceeds in three steps:
//! 1. Walk the tree, consuming one leading token per level
//! 2. Parse options with the leaf's grammar (skipped for passthrough leaves)
//! 3. Run the leaf's callback
//!
//! Tokens consumed in step 1 stay consumed if step 2 fails.

mod report;

pub use report::{FlagReport, ResolutionReport};

use crate::args::Args;
use crate::doc::{self, HelpDocument};
use crate::options::ParseFailure;
use crate::tree::{CommandNode, CommandTree};
use crate::types::NodeId;
use thiserror::Error;

/// How a caller should treat a dispatch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and exit successfully
    Help,
    /// The invocation was wrong; print the message and usage
    UserError,
    /// The command tree itself is inconsistent
    CallerBug,
}

/// Reasons dispatch stopped without running a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The leading token at a level with subcommands matched none of them
    #[error("Unknown subcommand: {name}")]
    UnknownSubcommand { name: String },

    /// The leaf's option grammar rejected the input; includes its synopsis
    #[error("{message}")]
    FlagParse { message: String },

    /// `-h`/`--help` was given; carries the leaf's synopsis
    #[error("{text}")]
    HelpRequested { text: String },

    /// Raised by a command body through [`CommandRef::usage_error`]
    #[error("{message}")]
    Usage { message: String },

    /// Resolution stopped on a node without a run callback
    #[error("command '{name}' has no run callback")]
    NotRunnable { name: String },
}

impl DispatchError {
    pub fn outcome(&self) -> Outcome {
        match self {
            DispatchError::HelpRequested { .. } => Outcome::Help,
            DispatchError::UnknownSubcommand { .. }
            | DispatchError::FlagParse { .. }
            | DispatchError::Usage { .. } => Outcome::UserError,
            DispatchError::NotRunnable { .. } => Outcome::CallerBug,
        }
    }

    pub fn is_help(&self) -> bool {
        self.outcome() == Outcome::Help
    }
}

/// Entry point for dispatching invocations against a command tree
#[derive(Debug)]
pub struct Dispatcher {
    tree: CommandTree,
    program: String,
}

impl Dispatcher {
    /// Creates a dispatcher; `program` is the name shown in usage lines
    pub fn new(tree: CommandTree, program: impl Into<String>) -> Self {
        Dispatcher {
            tree,
            program: program.into(),
        }
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// View of the command at `id`
    pub fn command(&self, id: NodeId) -> CommandRef<'_> {
        CommandRef {
            dispatcher: self,
            id,
        }
    }

    /// Walks subcommands from the root, removing each matched token
    ///
    /// Only the leading token is consulted at each level, and resolution
    /// stops at the first node without children or the first flag-shaped
    /// token.
    pub fn lookup(&self, args: &mut Args) -> Result<NodeId, DispatchError> {
        let mut current = self.tree.root();

        while self.tree[current].has_children() && args.has_subcommand() {
            let Some(name) = args.first_token() else {
                break;
            };
            match self.tree[current].child(name) {
                Some(child) => {
                    log::debug!("resolved subcommand '{}' -> {}", name, child);
                    args.shift();
                    current = child;
                }
                None => {
                    log::debug!(
                        "no subcommand '{}' under '{}'",
                        name,
                        self.tree.display_path(current)
                    );
                    return Err(DispatchError::UnknownSubcommand {
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(current)
    }

    /// Resolves the leaf and parses its options without running it
    ///
    /// On success `args` holds the positionals and flag values the leaf's
    /// callback would receive.
    pub fn resolve(&self, args: &mut Args) -> Result<NodeId, DispatchError> {
        let leaf = self.lookup(args)?;
        let node = &self.tree[leaf];

        if node.is_passthrough() {
            log::debug!(
                "'{}' is passthrough; forwarding {} tokens",
                self.tree.display_path(leaf),
                args.tokens().len()
            );
            return Ok(leaf);
        }

        log::debug!(
            "parsing options for '{}' with {} grammar",
            self.tree.display_path(leaf),
            if node.options().is_minimal() { "minimal" } else { "full" }
        );

        match node.options().parse(args.tokens()) {
            Ok(parsed) => {
                args.apply(parsed);
                Ok(leaf)
            }
            Err(ParseFailure::HelpRequested) => Err(DispatchError::HelpRequested {
                text: self.synopsis(leaf),
            }),
            Err(ParseFailure::Invalid(err)) => Err(DispatchError::FlagParse {
                message: format!("{}\n{}", err, self.synopsis(leaf)),
            }),
        }
    }

    /// Resolves the leaf, parses its options and runs its callback
    ///
    /// Returns the id of the command that ran.
    pub fn call(&self, args: &mut Args) -> Result<NodeId, DispatchError> {
        let leaf = self.resolve(args)?;
        let node = &self.tree[leaf];

        let Some(callback) = node.callback() else {
            return Err(DispatchError::NotRunnable {
                name: self.tree.display_path(leaf),
            });
        };

        callback(&self.command(leaf), args);
        Ok(leaf)
    }

    /// Dry-run dispatch of raw tokens, summarising what would run
    pub fn report<I, S>(&self, tokens: I) -> Result<ResolutionReport, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = Args::new(tokens);
        let id = self.resolve(&mut args)?;
        Ok(ResolutionReport::new(self, id, &args))
    }

    /// Convenience wrapper building the [`Args`] from raw tokens
    pub fn call_tokens<I, S>(&self, tokens: I) -> Result<NodeId, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = Args::new(tokens);
        self.call(&mut args)
    }

    /// `Usage: <program> ...` block for the command at `id`
    pub fn synopsis(&self, id: NodeId) -> String {
        doc::synopsis(&self.tree, id, &self.program)
    }

    /// Manual-style help document for the command at `id`
    pub fn help(&self, id: NodeId) -> HelpDocument {
        doc::help_text(&self.tree, id, &self.program)
    }

    /// Builds a user error made of `message` followed by the synopsis
    pub fn usage_error(&self, id: NodeId, message: &str) -> DispatchError {
        let separator = if message.is_empty() { "" } else { "\n" };
        DispatchError::Usage {
            message: format!("{}{}{}", message, separator, self.synopsis(id)),
        }
    }
}

/// A resolved command as seen by its run callback
#[derive(Clone, Copy)]
pub struct CommandRef<'a> {
    dispatcher: &'a Dispatcher,
    id: NodeId,
}

impl<'a> CommandRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a CommandNode {
        &self.dispatcher.tree[self.id]
    }

    pub fn name(&self) -> &'a str {
        self.node().name()
    }

    /// Subcommand names from the root to this command
    pub fn path(&self) -> Vec<&'a str> {
        self.dispatcher.tree.path(self.id)
    }

    pub fn program(&self) -> &'a str {
        &self.dispatcher.program
    }

    pub fn synopsis(&self) -> String {
        self.dispatcher.synopsis(self.id)
    }

    pub fn help(&self) -> HelpDocument {
        self.dispatcher.help(self.id)
    }

    pub fn usage_error(&self, message: &str) -> DispatchError {
        self.dispatcher.usage_error(self.id, message)
    }
}

impl std::fmt::Debug for CommandRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
