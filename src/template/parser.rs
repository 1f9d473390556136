//! Template Parser
//!
//! Splits template source into literal text and field actions.

use crate::error::{Result, VfsError};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Field path: `{{.A.B}}` is `["A", "B"]`, `{{.}}` is empty
    Field(Vec<String>),
}

/// Parse template source into segments.
///
/// # Errors
///
/// Returns `Syntax` for an unclosed or empty action, or an action that is
/// not a field path or comment.
pub fn parse_segments(name: &str, source: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = source;
    let mut trim_leading = false;

    while let Some(open) = rest.find(OPEN) {
        let mut literal = &rest[..open];
        if trim_leading {
            literal = literal.trim_start();
        }

        let after = &rest[open + OPEN.len()..];
        let close = action_end(after)
            .ok_or_else(|| VfsError::Syntax(format!("{}: unclosed action", name)))?;

        let (inner, trim_before) = strip_left_marker(&after[..close]);
        let (inner, trim_after) = strip_right_marker(inner);
        if trim_before {
            literal = literal.trim_end();
        }
        push_literal(&mut segments, literal);

        if let Some(segment) = parse_action(name, inner.trim())? {
            segments.push(segment);
        }

        trim_leading = trim_after;
        rest = &after[close + CLOSE.len()..];
    }

    let literal = if trim_leading { rest.trim_start() } else { rest };
    push_literal(&mut segments, literal);

    Ok(segments)
}

/// Offset of the `}}` closing the action that starts `after`.
///
/// A comment runs to its `*/`, so it may contain `}}`.
fn action_end(after: &str) -> Option<usize> {
    let (inner, _) = strip_left_marker(after);
    let body = inner.trim_start();
    if let Some(comment) = body.strip_prefix("/*") {
        let start = after.len() - comment.len();
        let end = start + comment.find("*/")? + 2;
        return after[end..].find(CLOSE).map(|i| end + i);
    }
    after.find(CLOSE)
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    // Adjacent literals appear when a comment is dropped
    if let Some(Segment::Literal(prev)) = segments.last_mut() {
        prev.push_str(text);
    } else {
        segments.push(Segment::Literal(text.to_string()));
    }
}

/// `{{- ` trims whitespace before the action.
fn strip_left_marker(inner: &str) -> (&str, bool) {
    match inner.strip_prefix('-') {
        Some(rest) if rest.starts_with(char::is_whitespace) => (rest, true),
        _ => (inner, false),
    }
}

/// ` -}}` trims whitespace after the action.
fn strip_right_marker(inner: &str) -> (&str, bool) {
    match inner.strip_suffix('-') {
        Some(rest) if rest.ends_with(char::is_whitespace) => (rest, true),
        _ => (inner, false),
    }
}

fn parse_action(name: &str, action: &str) -> Result<Option<Segment>> {
    if action.is_empty() {
        return Err(VfsError::Syntax(format!("{}: empty action", name)));
    }

    if action.len() >= 4 && action.starts_with("/*") && action.ends_with("*/") {
        return Ok(None);
    }

    let path = action.strip_prefix('.').ok_or_else(|| {
        VfsError::Syntax(format!("{}: unsupported action {:?}", name, action))
    })?;

    if path.is_empty() {
        return Ok(Some(Segment::Field(Vec::new())));
    }

    let fields: Vec<String> = path.split('.').map(str::to_string).collect();
    let valid = fields
        .iter()
        .all(|f| !f.is_empty() && f.chars().all(|c| c.is_alphanumeric() || c == '_'));
    if !valid {
        return Err(VfsError::Syntax(format!("{}: bad field path {:?}", name, action)));
    }

    Ok(Some(Segment::Field(fields)))
}
