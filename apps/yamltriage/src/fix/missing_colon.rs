//! Insert the `:` separator on `key value` lines that lost it.
//!
//! The heuristic is deliberately conservative: it must never touch a line
//! that is already valid, so it gives up on anything that looks like a
//! comment, a list item, a structured value, or block-scalar content.

use super::FixOutcome;
use regex::Regex;
use std::sync::OnceLock;

/// Name under which this fix is registered.
pub const NAME: &str = "missing_colon";

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<indent>\s*)(?P<key>[A-Za-z0-9_.\-]+) +(?P<rest>[^\s#].*)$")
            .expect("static regex")
    })
}

fn block_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[\s:\-])[|>](?:[1-9][+\-]?|[+\-][1-9]?)$").expect("static regex")
    })
}

/// Characters that mark a value as an already-structured node.
const STRUCTURED_VALUE_STARTS: &[char] = &['-', '[', '{', '&', '*', '!', '%', '`'];

fn is_block_header(trimmed: &str) -> bool {
    trimmed.ends_with('|') || trimmed.ends_with('>') || block_header_re().is_match(trimmed)
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Split `rest` at the first `#` not preceded by a backslash.
fn split_comment(rest: &str) -> (&str, &str) {
    let mut prev: Option<char> = None;
    for (i, c) in rest.char_indices() {
        if c == '#' && prev != Some('\\') {
            let value = rest[..i].trim_end();
            return (value, &rest[value.len()..]);
        }
        prev = Some(c);
    }
    (rest.trim_end(), &rest[rest.trim_end().len()..])
}

/// Rewrite one line, or `None` when it must stay as is.
fn rewrite_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with('-')
        || trimmed.starts_with('|')
        || trimmed.starts_with('>')
        || trimmed.contains(':')
        || !trimmed.contains(char::is_whitespace)
    {
        return None;
    }
    let caps = line_re().captures(line)?;
    let indent = caps.name("indent")?.as_str();
    let key = caps.name("key")?.as_str();
    let (value, comment) = split_comment(caps.name("rest")?.as_str());
    if value.is_empty() || value.starts_with(STRUCTURED_VALUE_STARTS) {
        return None;
    }
    Some(format!("{}{}: {}{}", indent, key, value, comment))
}

/// Apply the missing-colon heuristic to a whole document.
pub fn missing_colon_fix(content: &str, _filename: &str) -> FixOutcome {
    let mut out: Vec<String> = Vec::new();
    let mut fixed_lines: Vec<usize> = Vec::new();
    let mut prev_is_header = false;
    // indentation of the header whose body we are inside
    let mut block_indent: Option<usize> = None;

    for (idx, raw) in content.split('\n').enumerate() {
        let (line, cr) = match raw.strip_suffix('\r') {
            Some(l) => (l, "\r"),
            None => (raw, ""),
        };
        let trimmed = line.trim();
        let indent = indent_width(line);

        let in_body = match block_indent {
            Some(h) if trimmed.is_empty() || indent > h => true,
            Some(_) => {
                block_indent = None;
                false
            }
            None => false,
        };

        let rewritten = if in_body || prev_is_header {
            None
        } else {
            rewrite_line(line)
        };

        prev_is_header = is_block_header(trimmed);
        if prev_is_header && !in_body {
            block_indent = Some(indent);
        }

        match rewritten {
            Some(new_line) => {
                fixed_lines.push(idx + 1);
                out.push(format!("{}{}", new_line, cr));
            }
            None => out.push(raw.to_string()),
        }
    }

    if fixed_lines.is_empty() {
        return FixOutcome::unchanged(content);
    }
    let lines: Vec<String> = fixed_lines.iter().map(|n| n.to_string()).collect();
    FixOutcome {
        content: out.join("\n"),
        labels: vec![format!("{}: inserted ':' on line(s) {}", NAME, lines.join(", "))],
    }
}
