#![forbid(unsafe_code)]

//! Text transforms that turn long descriptions into help-page markdown
//!
//! Each transform is a plain `&str -> String` function. [`normalize_body`]
//! applies (a) through (d) in order; [`code_references`] is applied to usage
//! templates only.
//!
//! Indented runs that do not belong to a definition are emitted as fenced
//! code blocks. Lines inside a fence are left alone by every transform, so
//! running [`normalize_body`] on its own output changes nothing.

/// Opening and closing line of a code block
pub const FENCE: &str = "```";

/// Applies [`strip_indent`], [`normalize_headings`], [`definition_lists`] and
/// [`normalize_quotes`], in that order
pub fn normalize_body(text: &str) -> String {
    let text = strip_indent(text);
    let text = normalize_headings(&text);
    let text = definition_lists(&text);
    normalize_quotes(&text)
}

/// (a) Removes one indentation level (a tab or four spaces) from every line
///
/// `"\tone\n\t\ttwo\nthree"` becomes `"one\n\ttwo\nthree"`.
pub fn strip_indent(text: &str) -> String {
    map_outside_fences(text, |line| dedent(line).to_string())
}

/// (b) Drops the trailing colons of `## Heading:` lines
///
/// `"## Options:"` becomes `"## Options"`.
pub fn normalize_headings(text: &str) -> String {
    map_outside_fences(text, |line| {
        let heading = line.trim_end_matches(':');
        if heading.len() < line.len() && heading.starts_with("## ") && heading.len() > 3 {
            heading.to_string()
        } else {
            line.to_string()
        }
    })
}

/// (c) Turns a term line followed by an indented block into a definition
///
/// `"-p, --private:\n\tCreate a private repository."` becomes
/// `"-p, --private\n:\tCreate a private repository."`. A leading `* ` and a
/// trailing `:` on the term are dropped. Further lines of the block, including
/// paragraphs separated by blank lines, lose their indentation.
///
/// An indented run with no term above it (under a heading, after a blank
/// line) becomes a fenced code block with one indentation level removed.
pub fn definition_lists(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line == FENCE {
            out.push(line.to_string());
            i += 1;
            while let Some(inner) = lines.get(i) {
                out.push(inner.to_string());
                i += 1;
                if *inner == FENCE {
                    break;
                }
            }
            continue;
        }

        if is_indented(line) {
            out.push(FENCE.to_string());
            i = take_block(&lines, i, &mut out, |l| dedent(l).to_string());
            out.push(FENCE.to_string());
            continue;
        }

        let next_indented = lines.get(i + 1).is_some_and(|next| is_indented(next));
        if !(is_term(line) && next_indented) {
            out.push(if line.trim().is_empty() {
                String::new()
            } else {
                line.to_string()
            });
            i += 1;
            continue;
        }

        out.push(term_text(line).to_string());
        out.push(format!(":\t{}", lines[i + 1].trim_start()));
        i = take_block(&lines, i + 2, &mut out, |l| l.trim_start().to_string());
    }

    out.join("\n")
}

/// (d) Replaces straight and typographic single quotes with backticks
///
/// `"use 'hub sync'"` becomes ``"use `hub sync`"``.
pub fn normalize_quotes(text: &str) -> String {
    map_outside_fences(text, |line| {
        line.chars()
            .map(|c| match c {
                '\'' | '\u{2018}' | '\u{2019}' => '`',
                other => other,
            })
            .collect()
    })
}

/// (e) Wraps the leading command word of each usage line as inline code
///
/// With program `hub`, `"pr list [-s <state>]"` becomes
/// ``"`hub pr` list [-s <state>]"``. Lines that do not start with a
/// lowercase or hyphen word are left alone. Every rewritten line ends with two
/// spaces (a markdown line break) and the result is trimmed.
pub fn code_references(usage: &str, program: &str) -> String {
    let rendered: Vec<String> = usage
        .split('\n')
        .map(|line| {
            let word_len = line
                .find(|c: char| !(c.is_ascii_lowercase() || c == '-'))
                .unwrap_or(line.len());
            if word_len == 0 {
                return line.to_string();
            }
            let (word, rest) = line.split_at(word_len);
            format!("`{} {}`{}  ", program, word, rest)
        })
        .collect();
    rendered.join("\n").trim().to_string()
}

/// Applies `f` to every line that is not a fence or inside one
fn map_outside_fences(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut in_fence = false;
    text.split('\n')
        .map(|line| {
            if line == FENCE {
                in_fence = !in_fence;
                line.to_string()
            } else if in_fence {
                line.to_string()
            } else {
                f(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Copies the indented run starting at `start` through `f`, keeping blank
/// lines that separate indented paragraphs; returns the first index after it
fn take_block(
    lines: &[&str],
    start: usize,
    out: &mut Vec<String>,
    f: impl Fn(&str) -> String,
) -> usize {
    let mut i = start;
    loop {
        match lines.get(i) {
            Some(next) if is_indented(next) => {
                out.push(f(next));
                i += 1;
            }
            Some(next)
                if next.trim().is_empty()
                    && lines.get(i + 1).is_some_and(|after| is_indented(after)) =>
            {
                out.push(String::new());
                i += 1;
            }
            _ => return i,
        }
    }
}

fn dedent(line: &str) -> &str {
    line.strip_prefix('\t')
        .or_else(|| line.strip_prefix("    "))
        .unwrap_or(line)
}

fn is_indented(line: &str) -> bool {
    (line.starts_with('\t') || line.starts_with("    ")) && !line.trim().is_empty()
}

fn is_term(line: &str) -> bool {
    match line.chars().next() {
        Some(c) => !(c.is_whitespace() || c == '#' || c == ':'),
        None => false,
    }
}

fn term_text(line: &str) -> &str {
    let line = line.strip_prefix("* ").unwrap_or(line);
    line.strip_suffix(':').unwrap_or(line)
}
