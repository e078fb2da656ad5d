#![forbid(unsafe_code)]

//! Summary of a resolved invocation

use super::Dispatcher;
use crate::args::Args;
use crate::options::FlagValue;
use crate::types::NodeId;
use serde::Serialize;

/// A flag value and whether the user supplied it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagReport {
    pub name: String,
    pub value: FlagValue,
    pub explicit: bool,
}

/// What a dry-run dispatch resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    /// Space-joined command path, empty for the root
    pub command: String,
    pub runnable: bool,
    pub passthrough: bool,
    pub positionals: Vec<String>,
    /// Flags sorted by name
    pub flags: Vec<FlagReport>,
    pub terminator_seen: bool,
}

impl ResolutionReport {
    pub(super) fn new(dispatcher: &Dispatcher, id: NodeId, args: &Args) -> Self {
        let node = &dispatcher.tree()[id];

        let mut flags: Vec<FlagReport> = args
            .flags()
            .iter()
            .map(|(name, value)| FlagReport {
                name: name.clone(),
                value: value.clone(),
                explicit: args.flag_passed(name),
            })
            .collect();
        flags.sort_by(|a, b| a.name.cmp(&b.name));

        ResolutionReport {
            command: dispatcher.tree().path(id).join(" "),
            runnable: node.is_runnable(),
            passthrough: node.is_passthrough(),
            positionals: args.tokens().to_vec(),
            flags,
            terminator_seen: args.terminator_seen(),
        }
    }
}
