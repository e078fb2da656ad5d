#![forbid(unsafe_code)]

//! cmdtree: nested subcommand dispatch with typed flags and manual-style help
//!
//! A program describes its commands as a tree of [`CommandNode`]s. A
//! [`Dispatcher`] walks the tree along the leading tokens of an invocation,
//! parses the remaining tokens with the leaf's option grammar and runs the
//! leaf's callback. Usage lines and help pages are rendered from templates
//! stored on each node.
//!
//! ```
//! use cmdtree::{Args, CommandNode, CommandTree, Dispatcher};
//! use cmdtree::options::OptionSpec;
//!
//! let mut tree = CommandTree::new(CommandNode::new("<command> [<args>]"));
//! let root = tree.root();
//! tree.add(
//!     root,
//!     CommandNode::new("sync [--dry-run]")
//!         .option(OptionSpec::bool("dry-run"))
//!         .run(|_cmd, args: &mut Args| assert!(args.bool_flag("dry-run"))),
//! )
//! .unwrap();
//!
//! let dispatcher = Dispatcher::new(tree, "hub");
//! dispatcher.call_tokens(["sync", "--dry-run"]).unwrap();
//! ```

pub mod args;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod doc;
pub mod options;
pub mod output;
pub mod tree;
pub mod types;

pub use args::Args;
pub use dispatch::{CommandRef, DispatchError, Dispatcher, Outcome};
pub use tree::{CommandNode, CommandTree};
pub use types::NodeId;
