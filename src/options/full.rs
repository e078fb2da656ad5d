#![forbid(unsafe_code)]

//! Interspersed long/short flag grammar
//!
//! Supported forms:
//! - `--name`, `--name=value`, `--name value`
//! - `-x`, `-xvalue`, `-x=value`, `-x value`, and clusters of boolean shorts (`-abc`)
//! - `--` ends option recognition; everything after it is positional
//! - a lone `-` is positional

use super::{
    FlagValue, OptionError, OptionKind, OptionSpec, ParseFailure, ParsedOptions, is_help_token,
};

pub(super) fn parse(
    specs: &[OptionSpec],
    tokens: &[String],
) -> Result<ParsedOptions, ParseFailure> {
    let help_declared = specs.iter().any(|s| s.name == "help");
    let h_declared = specs.iter().any(|s| s.short == Some('h'));

    // Help wins over every other diagnostic
    if help_requested(specs, tokens, help_declared, h_declared) {
        return Err(ParseFailure::HelpRequested);
    }

    let mut state = State::new(specs);
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];
        index += 1;

        if token == "--" {
            state.parsed.terminator_seen = true;
            state
                .parsed
                .positionals
                .extend(tokens[index..].iter().cloned());
            break;
        }

        if let Some(body) = token.strip_prefix("--") {
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            let spec = state
                .find_long(name)
                .ok_or_else(|| OptionError::UnknownFlag(name.to_string()))?;

            let value = match (spec.kind.takes_value(), inline) {
                (false, None) => "true".to_string(),
                (_, Some(value)) => value.to_string(),
                (true, None) => {
                    let next = tokens
                        .get(index)
                        .ok_or_else(|| OptionError::MissingValue(spec.name.clone()))?;
                    index += 1;
                    next.clone()
                }
            };
            state.set(spec, &value)?;
            continue;
        }

        if token.len() > 1 && token.starts_with('-') {
            index = parse_short_cluster(&mut state, token, tokens, index, h_declared)?;
            continue;
        }

        state.parsed.positionals.push(token.clone());
    }

    Ok(state.parsed)
}

/// Looks for an unshadowed help flag before any terminator
///
/// Walks the tokens with the same arity rules as the main loop, so the value
/// of a value-taking flag (`-m --help`) is never mistaken for a help request.
/// Unknown flags are skipped; the main loop reports them.
fn help_requested(
    specs: &[OptionSpec],
    tokens: &[String],
    help_declared: bool,
    h_declared: bool,
) -> bool {
    let takes_value = |spec: Option<&OptionSpec>| spec.is_some_and(|s| s.kind.takes_value());
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        if token == "--" {
            return false;
        }
        if is_help_token(token) {
            let shadowed = (token == "--help" && help_declared) || (token == "-h" && h_declared);
            if !shadowed {
                return true;
            }
        }

        if let Some(body) = token.strip_prefix("--") {
            if !body.contains('=') && takes_value(specs.iter().find(|s| s.name == body)) {
                iter.next();
            }
            continue;
        }

        if token.len() > 1 && token.starts_with('-') {
            let cluster = &token[1..];
            for (offset, short) in cluster.char_indices() {
                let spec = specs.iter().find(|s| s.short == Some(short));
                if spec.is_none() {
                    if short == 'h' && !h_declared {
                        return true;
                    }
                    break;
                }
                if takes_value(spec) {
                    if cluster[offset + short.len_utf8()..].is_empty() {
                        iter.next();
                    }
                    break;
                }
            }
        }
    }

    false
}

/// Handles one `-abc` token and returns the index of the next unread token
fn parse_short_cluster(
    state: &mut State<'_>,
    token: &str,
    tokens: &[String],
    mut index: usize,
    h_declared: bool,
) -> Result<usize, ParseFailure> {
    let cluster = &token[1..];

    for (offset, short) in cluster.char_indices() {
        let spec = match state.find_short(short) {
            Some(spec) => spec,
            None if short == 'h' && !h_declared => return Err(ParseFailure::HelpRequested),
            None => {
                return Err(OptionError::UnknownShorthand {
                    short,
                    token: token.to_string(),
                }
                .into());
            }
        };

        if !spec.kind.takes_value() {
            state.set(spec, "true")?;
            continue;
        }

        let rest = &cluster[offset + short.len_utf8()..];
        let value = if !rest.is_empty() {
            rest.strip_prefix('=').unwrap_or(rest).to_string()
        } else {
            let next = tokens.get(index).ok_or_else(|| OptionError::MissingShortValue {
                short,
                token: token.to_string(),
            })?;
            index += 1;
            next.clone()
        };
        state.set(spec, &value)?;
        break;
    }

    Ok(index)
}

struct State<'a> {
    specs: &'a [OptionSpec],
    parsed: ParsedOptions,
}

impl<'a> State<'a> {
    fn new(specs: &'a [OptionSpec]) -> Self {
        let mut parsed = ParsedOptions::default();
        for spec in specs {
            parsed.flags.insert(spec.name.clone(), spec.initial_value());
        }
        State { specs, parsed }
    }

    fn find_long(&self, name: &str) -> Option<&'a OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    fn find_short(&self, short: char) -> Option<&'a OptionSpec> {
        self.specs.iter().find(|s| s.short == Some(short))
    }

    fn set(&mut self, spec: &OptionSpec, raw: &str) -> Result<(), OptionError> {
        let invalid = |reason: String| OptionError::InvalidValue {
            value: raw.to_string(),
            flag: spec.name.clone(),
            reason,
        };

        let value = match spec.kind {
            OptionKind::Bool => {
                let parsed = parse_bool(raw).ok_or_else(|| invalid("invalid syntax".to_string()))?;
                FlagValue::Bool(parsed)
            }
            OptionKind::String => FlagValue::String(raw.to_string()),
            OptionKind::Int => {
                let parsed = raw.parse::<i64>().map_err(|e| invalid(e.to_string()))?;
                FlagValue::Int(parsed)
            }
            OptionKind::StringList => {
                let mut items = match self.parsed.flags.get(&spec.name) {
                    // The first explicit value replaces the default list
                    Some(FlagValue::List(items))
                        if self.parsed.explicitly_set.contains(&spec.name) =>
                    {
                        items.clone()
                    }
                    _ => Vec::new(),
                };
                items.push(raw.to_string());
                FlagValue::List(items)
            }
        };

        log::trace!("flag --{} = {}", spec.name, value);
        self.parsed.flags.insert(spec.name.clone(), value);
        self.parsed.explicitly_set.insert(spec.name.clone());
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn specs() -> Vec<OptionSpec> {
        vec![
            OptionSpec::bool("verbose").short('v'),
            OptionSpec::bool("force").short('f'),
            OptionSpec::string("message").short('m'),
            OptionSpec::int("limit").short('L').default_value(FlagValue::Int(30)),
            OptionSpec::list("label").short('l'),
        ]
    }

    fn parse_ok(input: &[&str]) -> ParsedOptions {
        parse(&specs(), &tokens(input)).unwrap()
    }

    fn parse_err(input: &[&str]) -> ParseFailure {
        parse(&specs(), &tokens(input)).unwrap_err()
    }

    #[test]
    fn test_interspersed_bool() {
        let parsed = parse_ok(&["a", "--verbose", "b"]);
        assert_eq!(parsed.positionals, tokens(&["a", "b"]));
        assert_eq!(parsed.flags["verbose"], FlagValue::Bool(true));
        assert!(parsed.explicitly_set.contains("verbose"));
        assert!(!parsed.explicitly_set.contains("force"));
    }

    #[test]
    fn test_defaults_are_recorded_but_not_explicit() {
        let parsed = parse_ok(&[]);
        assert_eq!(parsed.flags["limit"], FlagValue::Int(30));
        assert_eq!(parsed.flags["verbose"], FlagValue::Bool(false));
        assert!(parsed.explicitly_set.is_empty());
    }

    #[test]
    fn test_explicit_default_counts_as_passed() {
        let parsed = parse_ok(&["--limit", "30"]);
        assert_eq!(parsed.flags["limit"], FlagValue::Int(30));
        assert!(parsed.explicitly_set.contains("limit"));
    }

    #[test]
    fn test_long_value_forms() {
        let parsed = parse_ok(&["--message=hello world", "--limit", "5"]);
        assert_eq!(parsed.flags["message"], FlagValue::String("hello world".into()));
        assert_eq!(parsed.flags["limit"], FlagValue::Int(5));
        assert!(parsed.positionals.is_empty());
    }

    #[test]
    fn test_value_may_look_like_flag() {
        let parsed = parse_ok(&["-m", "--verbose", "--limit", "-3"]);
        assert_eq!(parsed.flags["message"], FlagValue::String("--verbose".into()));
        assert_eq!(parsed.flags["limit"], FlagValue::Int(-3));
        assert!(!parsed.explicitly_set.contains("verbose"));
    }

    #[test]
    fn test_short_forms() {
        let parsed = parse_ok(&["-vf", "-mfix", "-L=7", "x"]);
        assert_eq!(parsed.flags["verbose"], FlagValue::Bool(true));
        assert_eq!(parsed.flags["force"], FlagValue::Bool(true));
        assert_eq!(parsed.flags["message"], FlagValue::String("fix".into()));
        assert_eq!(parsed.flags["limit"], FlagValue::Int(7));
        assert_eq!(parsed.positionals, tokens(&["x"]));
    }

    #[test]
    fn test_cluster_ending_in_value_flag() {
        let parsed = parse_ok(&["-vm", "note"]);
        assert_eq!(parsed.flags["verbose"], FlagValue::Bool(true));
        assert_eq!(parsed.flags["message"], FlagValue::String("note".into()));
    }

    #[test]
    fn test_bool_with_explicit_value() {
        let parsed = parse_ok(&["--verbose=false"]);
        assert_eq!(parsed.flags["verbose"], FlagValue::Bool(false));
        assert!(parsed.explicitly_set.contains("verbose"));

        assert_eq!(
            parse_err(&["--verbose=maybe"]),
            ParseFailure::Invalid(OptionError::InvalidValue {
                value: "maybe".into(),
                flag: "verbose".into(),
                reason: "invalid syntax".into(),
            })
        );
    }

    #[test]
    fn test_list_accumulates_and_replaces_default() {
        let specs = vec![
            OptionSpec::list("label").default_value(FlagValue::List(vec!["triage".into()])),
        ];
        let parsed = parse(&specs, &tokens(&["--label", "bug", "--label=ui"])).unwrap();
        assert_eq!(
            parsed.flags["label"],
            FlagValue::List(vec!["bug".into(), "ui".into()])
        );

        let parsed = parse(&specs, &[]).unwrap();
        assert_eq!(parsed.flags["label"], FlagValue::List(vec!["triage".into()]));
    }

    #[test]
    fn test_terminator() {
        let parsed = parse_ok(&["a", "--", "--looks-like-flag"]);
        assert!(parsed.terminator_seen);
        assert_eq!(parsed.positionals, tokens(&["a", "--looks-like-flag"]));
    }

    #[test]
    fn test_terminator_as_flag_value_is_not_a_terminator() {
        let parsed = parse_ok(&["-m", "--", "rest"]);
        assert!(!parsed.terminator_seen);
        assert_eq!(parsed.flags["message"], FlagValue::String("--".into()));
        assert_eq!(parsed.positionals, tokens(&["rest"]));
    }

    #[test]
    fn test_lone_dash_is_positional() {
        let parsed = parse_ok(&["-", "-v"]);
        assert_eq!(parsed.positionals, tokens(&["-"]));
    }

    #[test]
    fn test_unknown_flags() {
        assert_eq!(
            parse_err(&["--nope"]),
            ParseFailure::Invalid(OptionError::UnknownFlag("nope".into()))
        );
        assert_eq!(
            parse_err(&["-vx"]),
            ParseFailure::Invalid(OptionError::UnknownShorthand {
                short: 'x',
                token: "-vx".into()
            })
        );
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(
            parse_err(&["--message"]),
            ParseFailure::Invalid(OptionError::MissingValue("message".into()))
        );
        assert_eq!(
            parse_err(&["a", "-m"]),
            ParseFailure::Invalid(OptionError::MissingShortValue {
                short: 'm',
                token: "-m".into()
            })
        );
    }

    #[test]
    fn test_bad_int() {
        match parse_err(&["--limit", "many"]) {
            ParseFailure::Invalid(OptionError::InvalidValue { value, flag, .. }) => {
                assert_eq!(value, "many");
                assert_eq!(flag, "limit");
            }
            other => panic!("unexpected failure: {:?}", other),
        }
    }

    #[test]
    fn test_help_short_circuits_other_errors() {
        assert_eq!(parse_err(&["--nope", "--help"]), ParseFailure::HelpRequested);
        assert_eq!(parse_err(&["--limit", "x", "-h"]), ParseFailure::HelpRequested);
        assert_eq!(parse_err(&["-vh"]), ParseFailure::HelpRequested);
    }

    #[test]
    fn test_help_as_flag_value_is_not_a_help_request() {
        let parsed = parse_ok(&["-m", "--help"]);
        assert_eq!(parsed.flags["message"], FlagValue::String("--help".into()));

        let parsed = parse_ok(&["--message", "-h", "x"]);
        assert_eq!(parsed.flags["message"], FlagValue::String("-h".into()));
        assert_eq!(parsed.positionals, tokens(&["x"]));

        let parsed = parse_ok(&["-vm", "--help"]);
        assert_eq!(parsed.flags["message"], FlagValue::String("--help".into()));
    }

    #[test]
    fn test_help_after_inline_value_is_still_help() {
        assert_eq!(parse_err(&["-mfix", "--help"]), ParseFailure::HelpRequested);
        assert_eq!(parse_err(&["--message=x", "-h"]), ParseFailure::HelpRequested);
        assert_eq!(parse_err(&["--nope", "-vh"]), ParseFailure::HelpRequested);
    }

    #[test]
    fn test_help_after_terminator_is_positional() {
        let parsed = parse_ok(&["--", "--help"]);
        assert_eq!(parsed.positionals, tokens(&["--help"]));
    }

    #[test]
    fn test_declared_help_option_is_a_regular_flag() {
        let specs = vec![OptionSpec::bool("help"), OptionSpec::string("host").short('h')];
        let parsed = parse(&specs, &tokens(&["--help", "-h", "example.com"])).unwrap();
        assert_eq!(parsed.flags["help"], FlagValue::Bool(true));
        assert_eq!(parsed.flags["host"], FlagValue::String("example.com".into()));
    }
}
