#![forbid(unsafe_code)]

//! Help-only grammar for nodes without option declarations

use super::{ParseFailure, ParsedOptions, is_help_token};

/// Scans for `-h`/`--help` and passes everything else through
///
/// Flag-shaped tokens are kept as positionals because they usually belong to
/// a downstream program. A `--` is consumed and stops help recognition.
pub(super) fn parse(tokens: &[String]) -> Result<ParsedOptions, ParseFailure> {
    let mut parsed = ParsedOptions::default();

    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        if token == "--" {
            parsed.terminator_seen = true;
            parsed.positionals.extend(iter.cloned());
            break;
        }
        if is_help_token(token) {
            return Err(ParseFailure::HelpRequested);
        }
        parsed.positionals.push(token.clone());
    }

    log::trace!(
        "minimal parse kept {} positionals",
        parsed.positionals.len()
    );
    Ok(parsed)
}
