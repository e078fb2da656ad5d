#![forbid(unsafe_code)]

//! Typed option declarations and their values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of value an option carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    /// Switch; present means true
    Bool,
    /// Single string value
    String,
    /// Signed integer value
    Int,
    /// Repeatable string value
    StringList,
}

impl OptionKind {
    /// Returns true if the option consumes a value token
    pub fn takes_value(self) -> bool {
        !matches!(self, OptionKind::Bool)
    }

    /// Value used when neither the user nor the declaration supplies one
    pub fn zero_value(self) -> FlagValue {
        match self {
            OptionKind::Bool => FlagValue::Bool(false),
            OptionKind::String => FlagValue::String(String::new()),
            OptionKind::Int => FlagValue::Int(0),
            OptionKind::StringList => FlagValue::List(Vec::new()),
        }
    }
}

/// Parsed value of an option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<String>),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FlagValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FlagValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true if this value can be stored in an option of `kind`
    pub fn matches_kind(&self, kind: OptionKind) -> bool {
        matches!(
            (self, kind),
            (FlagValue::Bool(_), OptionKind::Bool)
                | (FlagValue::String(_), OptionKind::String)
                | (FlagValue::Int(_), OptionKind::Int)
                | (FlagValue::List(_), OptionKind::StringList)
        )
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{}", b),
            FlagValue::Int(n) => write!(f, "{}", n),
            FlagValue::String(s) => write!(f, "{}", s),
            FlagValue::List(items) => write!(f, "[{}]", items.join(",")),
        }
    }
}

/// Declaration of a single option
///
/// ```
/// use cmdtree::options::{FlagValue, OptionSpec};
///
/// let spec = OptionSpec::int("limit")
///     .short('L')
///     .default_value(FlagValue::Int(30))
///     .help("Display only the first N entries");
/// assert_eq!(spec.initial_value(), FlagValue::Int(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Long name without the leading dashes
    pub name: String,
    /// Single-character short form
    #[serde(default)]
    pub short: Option<char>,
    pub kind: OptionKind,
    #[serde(default)]
    pub default: Option<FlagValue>,
    #[serde(default)]
    pub help: String,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>, kind: OptionKind) -> Self {
        OptionSpec {
            name: name.into(),
            short: None,
            kind,
            default: None,
            help: String::new(),
        }
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Bool)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::Int)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, OptionKind::StringList)
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn default_value(mut self, value: FlagValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Value the option holds before the user supplies anything
    pub fn initial_value(&self) -> FlagValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.kind.zero_value())
    }

    /// `-x, --name` style label used in listings
    pub fn label(&self) -> String {
        match self.short {
            Some(short) => format!("-{}, --{}", short, self.name),
            None => format!("--{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_value_falls_back_to_zero() {
        assert_eq!(OptionSpec::bool("v").initial_value(), FlagValue::Bool(false));
        assert_eq!(OptionSpec::int("n").initial_value(), FlagValue::Int(0));
        assert_eq!(
            OptionSpec::list("label").initial_value(),
            FlagValue::List(vec![])
        );
        assert_eq!(
            OptionSpec::string("m")
                .default_value(FlagValue::String("hi".into()))
                .initial_value(),
            FlagValue::String("hi".into())
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(OptionSpec::bool("force").short('f').label(), "-f, --force");
        assert_eq!(OptionSpec::bool("force").label(), "--force");
    }

    #[test]
    fn test_kind_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: OptionKind,
        }
        let parsed: Wrapper = toml::from_str(r#"kind = "string-list""#).unwrap();
        assert_eq!(parsed.kind, OptionKind::StringList);
    }

    #[test]
    fn test_matches_kind() {
        assert!(FlagValue::Int(3).matches_kind(OptionKind::Int));
        assert!(!FlagValue::Int(3).matches_kind(OptionKind::String));
        assert!(FlagValue::List(vec![]).matches_kind(OptionKind::StringList));
    }

    #[test]
    fn test_display() {
        assert_eq!(FlagValue::Bool(true).to_string(), "true");
        assert_eq!(
            FlagValue::List(vec!["a".into(), "b".into()]).to_string(),
            "[a,b]"
        );
    }
}
