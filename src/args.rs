#![forbid(unsafe_code)]

//! Per-invocation argument vector
//!
//! An [`Args`] starts out as the raw invocation tokens. The dispatcher removes
//! subcommand names from the front, and the option parser replaces the rest
//! with positionals while recording flag values.

use crate::options::{FlagValue, ParsedOptions};
use std::collections::{HashMap, HashSet};

/// Tokens and parsed flags for a single invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    tokens: Vec<String>,
    flags: HashMap<String, FlagValue>,
    explicitly_set: HashSet<String>,
    terminator_seen: bool,
}

impl Args {
    /// Creates an argument vector from raw invocation tokens
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Args {
            tokens: tokens.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Remaining tokens; positionals once options have been parsed
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    pub fn first_token(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Returns true if the leading token could name a subcommand
    pub fn has_subcommand(&self) -> bool {
        self.first_token().is_some_and(|t| !t.starts_with('-'))
    }

    /// Removes and returns the leading token
    pub fn shift(&mut self) -> Option<String> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(self.tokens.remove(0))
        }
    }

    /// Whether a literal `--` ended option recognition
    pub fn terminator_seen(&self) -> bool {
        self.terminator_seen
    }

    /// Returns true only if the user supplied `name`, even with its default
    pub fn flag_passed(&self, name: &str) -> bool {
        self.explicitly_set.contains(name)
    }

    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    pub fn flags(&self) -> &HashMap<String, FlagValue> {
        &self.flags
    }

    pub fn bool_flag(&self, name: &str) -> bool {
        self.flag(name).and_then(FlagValue::as_bool).unwrap_or(false)
    }

    pub fn string_flag(&self, name: &str) -> Option<&str> {
        self.flag(name).and_then(FlagValue::as_str)
    }

    pub fn int_flag(&self, name: &str) -> Option<i64> {
        self.flag(name).and_then(FlagValue::as_int)
    }

    pub fn list_flag(&self, name: &str) -> &[String] {
        self.flag(name).and_then(FlagValue::as_list).unwrap_or(&[])
    }

    /// Replaces the tokens with the parser's positionals and records its flags
    pub(crate) fn apply(&mut self, parsed: ParsedOptions) {
        self.tokens = parsed.positionals;
        self.flags = parsed.flags;
        self.explicitly_set = parsed.explicitly_set;
        self.terminator_seen = parsed.terminator_seen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_shift() {
        let mut args = Args::new(["pr", "list", "--state", "open"]);
        assert_eq!(args.first_token(), Some("pr"));
        assert!(args.has_subcommand());

        assert_eq!(args.shift().as_deref(), Some("pr"));
        assert_eq!(args.shift().as_deref(), Some("list"));
        assert!(!args.has_subcommand());
        assert_eq!(args.tokens(), ["--state", "open"]);
    }

    #[test]
    fn test_shift_empty() {
        let mut args = Args::new(Vec::<String>::new());
        assert_eq!(args.shift(), None);
        assert!(!args.has_subcommand());
    }

    #[test]
    fn test_apply_parsed_options() {
        let mut parsed = ParsedOptions::default();
        parsed.positionals = vec!["a".into()];
        parsed.flags.insert("limit".into(), FlagValue::Int(30));
        parsed.flags.insert("draft".into(), FlagValue::Bool(true));
        parsed.explicitly_set.insert("draft".into());
        parsed.terminator_seen = true;

        let mut args = Args::new(["a", "--draft", "--", "b"]);
        args.apply(parsed);

        assert_eq!(args.tokens(), ["a"]);
        assert!(args.terminator_seen());
        assert!(args.flag_passed("draft"));
        assert!(!args.flag_passed("limit"));
        assert_eq!(args.int_flag("limit"), Some(30));
        assert!(args.bool_flag("draft"));
        assert!(!args.bool_flag("missing"));
        assert!(args.list_flag("missing").is_empty());
        assert_eq!(args.string_flag("limit"), None);
    }
}
