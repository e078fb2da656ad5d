#![forbid(unsafe_code)]

//! Option parsing for resolved commands
//!
//! Every command node carries an [`OptionParser`]. Nodes that declare no
//! options get the [`OptionParser::Minimal`] variant, which only recognises
//! the help flag and hands everything else through untouched. Nodes with
//! declarations get [`OptionParser::Full`], an interspersed long/short flag
//! grammar.

mod full;
mod minimal;
mod spec;

pub use spec::{FlagValue, OptionKind, OptionSpec};

use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Diagnostics produced by the full option grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// A long flag that no declaration matches
    #[error("unknown flag: --{0}")]
    UnknownFlag(String),

    /// A short flag character that no declaration matches
    #[error("unknown shorthand flag: '{short}' in {token}")]
    UnknownShorthand { short: char, token: String },

    /// A value-taking long flag at the end of input
    #[error("flag needs an argument: --{0}")]
    MissingValue(String),

    /// A value-taking short flag at the end of input
    #[error("flag needs an argument: '{short}' in {token}")]
    MissingShortValue { short: char, token: String },

    /// A value that does not convert to the declared kind
    #[error("invalid argument \"{value}\" for \"--{flag}\" flag: {reason}")]
    InvalidValue {
        value: String,
        flag: String,
        reason: String,
    },
}

/// Why a parse did not produce positionals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// `-h` or `--help` was present
    #[error("help requested")]
    HelpRequested,

    /// The input violated the option grammar
    #[error(transparent)]
    Invalid(#[from] OptionError),
}

/// Result of a successful parse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedOptions {
    /// Tokens that were not consumed as flags or flag values
    pub positionals: Vec<String>,
    /// Value of every declared option, defaults included
    pub flags: HashMap<String, FlagValue>,
    /// Options the user actually supplied
    pub explicitly_set: HashSet<String>,
    /// Whether a literal `--` ended option recognition
    pub terminator_seen: bool,
}

/// Option grammar attached to a command node
///
/// The variant is chosen when the node is built: a node without declarations
/// is `Minimal`, anything else is `Full`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OptionParser {
    /// Recognises only `-h`/`--help`; every other token is a positional
    #[default]
    Minimal,
    /// Typed long/short flags parsed anywhere in the input
    Full(Vec<OptionSpec>),
}

impl OptionParser {
    /// Builds the parser variant that fits `specs`
    pub fn from_specs(specs: Vec<OptionSpec>) -> Self {
        if specs.is_empty() {
            OptionParser::Minimal
        } else {
            OptionParser::Full(specs)
        }
    }

    /// Adds a declaration, promoting a minimal parser to a full one
    pub fn declare(&mut self, spec: OptionSpec) {
        match self {
            OptionParser::Minimal => *self = OptionParser::Full(vec![spec]),
            OptionParser::Full(specs) => specs.push(spec),
        }
    }

    /// Declared options, empty for the minimal variant
    pub fn specs(&self) -> &[OptionSpec] {
        match self {
            OptionParser::Minimal => &[],
            OptionParser::Full(specs) => specs,
        }
    }

    /// Returns true for the minimal variant
    pub fn is_minimal(&self) -> bool {
        matches!(self, OptionParser::Minimal)
    }

    /// Parses `tokens` according to this grammar
    pub fn parse(&self, tokens: &[String]) -> Result<ParsedOptions, ParseFailure> {
        match self {
            OptionParser::Minimal => minimal::parse(tokens),
            OptionParser::Full(specs) => full::parse(specs, tokens),
        }
    }
}

fn is_help_token(token: &str) -> bool {
    token == "-h" || token == "--help"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_specs_picks_variant() {
        assert!(OptionParser::from_specs(vec![]).is_minimal());
        assert!(!OptionParser::from_specs(vec![OptionSpec::bool("verbose")]).is_minimal());
    }

    #[test]
    fn test_declare_promotes_minimal() {
        let mut parser = OptionParser::Minimal;
        parser.declare(OptionSpec::bool("verbose"));
        parser.declare(OptionSpec::string("message"));

        assert!(!parser.is_minimal());
        assert_eq!(parser.specs().len(), 2);
    }

    #[test]
    fn test_minimal_and_full_agree_on_terminator() {
        let input = tokens(&["a", "--", "--looks-like-flag"]);

        let minimal = OptionParser::Minimal.parse(&input).unwrap();
        let full = OptionParser::from_specs(vec![OptionSpec::bool("verbose")])
            .parse(&input)
            .unwrap();

        for parsed in [minimal, full] {
            assert!(parsed.terminator_seen);
            assert_eq!(parsed.positionals, tokens(&["a", "--looks-like-flag"]));
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            OptionError::UnknownFlag("nope".into()).to_string(),
            "unknown flag: --nope"
        );
        assert_eq!(
            OptionError::UnknownShorthand {
                short: 'x',
                token: "-vx".into()
            }
            .to_string(),
            "unknown shorthand flag: 'x' in -vx"
        );
        assert_eq!(
            OptionError::InvalidValue {
                value: "abc".into(),
                flag: "limit".into(),
                reason: "invalid digit found in string".into(),
            }
            .to_string(),
            "invalid argument \"abc\" for \"--limit\" flag: invalid digit found in string"
        );
    }
}
