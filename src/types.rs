#![forbid(unsafe_code)]

//! Shared identifiers and naming patterns

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Pattern for a bare name: a word character or dot, then word characters,
/// dots or hyphens.
pub const NAME_PATTERN: &str = r"[\w.][\w.-]*";

/// Pattern for an owner segment: alphanumeric start, then alphanumerics or
/// hyphens.
pub const OWNER_PATTERN: &str = r"[a-zA-Z0-9][a-zA-Z0-9-]*";

/// Anchored pattern accepting either `name` or `owner/name`, composed from
/// [`NAME_PATTERN`] and [`OWNER_PATTERN`].
pub static NAME_WITH_OWNER_PATTERN: LazyLock<String> = LazyLock::new(|| {
    format!(
        "^(?:{name}|{owner}/{name})$",
        name = NAME_PATTERN,
        owner = OWNER_PATTERN
    )
});

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", NAME_PATTERN)).unwrap());

static NAME_WITH_OWNER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&NAME_WITH_OWNER_PATTERN).unwrap());

/// Returns true if `value` is a valid bare name
pub fn is_valid_name(value: &str) -> bool {
    NAME_REGEX.is_match(value)
}

/// Returns true if `value` is a valid `name` or `owner/name` pair
pub fn is_valid_name_with_owner(value: &str) -> bool {
    NAME_WITH_OWNER_REGEX.is_match(value)
}

/// Index of a node inside a [`crate::tree::CommandTree`]
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
