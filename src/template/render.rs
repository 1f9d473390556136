//! Template Renderer
//!
//! Executes parsed segments against a JSON payload.

use std::borrow::Cow;

use serde_json::Value;

use super::Segment;
use crate::error::{Result, VfsError};

/// Render segments against `payload`, HTML-escaping every field value.
///
/// # Errors
///
/// Returns `Render` if a field is missing or looked up on a non-object value.
pub fn render_segments(name: &str, segments: &[Segment], payload: &Value) -> Result<String> {
    let mut out = String::new();

    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Field(path) => {
                let value = lookup(name, payload, path)?;
                escape_html(&mut out, &display(value));
            }
        }
    }

    Ok(out)
}

fn lookup<'a>(name: &str, payload: &'a Value, path: &[String]) -> Result<&'a Value> {
    path.iter().try_fold(payload, |value, field| match value {
        Value::Object(map) => map.get(field).ok_or_else(|| {
            VfsError::Render(format!("{}: can't evaluate field {}", name, field))
        }),
        _ => Err(VfsError::Render(format!(
            "{}: can't evaluate field {} in non-object value",
            name, field
        ))),
    })
}

fn display(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        // Compact JSON
        other => Cow::Owned(other.to_string()),
    }
}

/// Append `text` to `out` with HTML special characters escaped.
pub fn escape_html(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
