//! Template Module
//!
//! A small Go-template-like language rendered against JSON payloads.
//!
//! # Syntax
//! - `{{.Field}}` / `{{.A.B}}` - field lookup, output is HTML-escaped
//! - `{{.}}` - the whole payload
//! - `{{- .Field -}}` - trim surrounding whitespace
//! - `{{/* comment */}}` - ignored

mod parser;
mod render;

pub use parser::{parse_segments, Segment};
pub use render::{escape_html, render_segments};

use serde_json::Value;

use crate::error::Result;

// == Template ==
/// A parsed, executable template.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parses template source. `name` is only used in error messages.
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self> {
        let name = name.into();
        let segments = parse_segments(&name, source)?;
        Ok(Self { name, segments })
    }

    /// Executes the template against `payload`.
    pub fn render(&self, payload: &Value) -> Result<String> {
        render_segments(&self.name, &self.segments, payload)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_render() {
        let template = Template::parse("default.tmpl", "<h1>{{.Caption}}</h1>").unwrap();
        let html = template.render(&json!({"Caption": "hi"})).unwrap();
        assert_eq!(html, "<h1>hi</h1>");
        assert_eq!(template.name(), "default.tmpl");
    }

    #[test]
    fn test_redirect_page() {
        let source = r#"<title>{{.Title}}</title>
<script>
    window.location.href = "{{.Url}}"
</script>"#;
        let template = Template::parse("redirect.tmpl", source).unwrap();
        let payload = json!({
            "Title": "Title",
            "Url": "https://example.com/?a=1&b=2"
        });

        let html = template.render(&payload).unwrap();
        assert!(html.contains("<title>Title</title>"));
        assert!(html.contains("https://example.com/?a=1&amp;b=2"));
    }
}
