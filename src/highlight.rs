//! JSON syntax highlighting for lookup results.
//!
//! Serializes a decoded payload (or accepts already-encoded text) and wraps
//! every lexical token in a span tagged with its semantic kind:
//!
//! - **Key**: a quoted token followed (modulo whitespace) by a colon
//! - **Str**: any other quoted token
//! - **Num**: signed, fractional, and exponential number forms
//! - **Bool** / **Null**: the literal keywords
//! - **Punct**: everything in between (braces, commas, whitespace)
//!
//! The highlighter never alters the underlying text: concatenating the span
//! texts reproduces the serialized document byte for byte, so the result pane
//! and the clipboard always agree on content.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Semantic kind of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Object key, including its trailing colon.
    Key,
    /// String value.
    Str,
    /// Numeric value.
    Num,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
    /// Structural text between tokens.
    Punct,
}

impl SpanKind {
    /// Display color for the result pane.
    pub fn color(self) -> egui::Color32 {
        match self {
            SpanKind::Key => egui::Color32::from_rgb(102, 217, 239),
            SpanKind::Str => egui::Color32::from_rgb(152, 195, 121),
            SpanKind::Num => egui::Color32::from_rgb(229, 192, 123),
            SpanKind::Bool => egui::Color32::from_rgb(198, 120, 221),
            SpanKind::Null => egui::Color32::from_rgb(128, 128, 128),
            SpanKind::Punct => egui::Color32::from_rgb(171, 178, 191),
        }
    }
}

/// A run of text sharing one semantic kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

/// A fully classified document.
#[derive(Debug, Clone, Default)]
pub struct HighlightedDocument {
    spans: Vec<Span>,
}

impl HighlightedDocument {
    /// The ordered spans making up the document.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// The document with all wrapping stripped. Equals the text that was
    /// tokenized, unchanged.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// One regex pass classifies every token: a quoted string (with escapes),
/// optionally capturing a trailing colon, or a bare literal, or a number.
fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#""(\\u[a-fA-F0-9]{4}|\\[^u]|[^\\"])*"(\s*:)?|\b(?:true|false|null)\b|-?\d+(?:\.\d*)?(?:[eE][+-]?\d+)?"#,
        )
        .unwrap()
    })
}

/// Serialize a decoded value with the encoding the result pane displays:
/// multi-line, 2-space indentation, keys in the order the payload carries
/// them.
pub fn serialize(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Highlight a decoded payload. The value is serialized with [`serialize`]
/// and then classified token by token.
pub fn highlight_value(value: &Value) -> HighlightedDocument {
    highlight_text(&serialize(value))
}

/// Highlight already-encoded text without re-serializing it.
pub fn highlight_text(text: &str) -> HighlightedDocument {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for m in token_re().find_iter(text) {
        if m.start() > cursor {
            spans.push(Span {
                kind: SpanKind::Punct,
                text: text[cursor..m.start()].to_string(),
            });
        }

        let token = m.as_str();
        let kind = if token.starts_with('"') {
            if token.ends_with(':') {
                SpanKind::Key
            } else {
                SpanKind::Str
            }
        } else if token == "true" || token == "false" {
            SpanKind::Bool
        } else if token == "null" {
            SpanKind::Null
        } else {
            SpanKind::Num
        };

        spans.push(Span {
            kind,
            text: token.to_string(),
        });
        cursor = m.end();
    }

    if cursor < text.len() {
        spans.push(Span {
            kind: SpanKind::Punct,
            text: text[cursor..].to_string(),
        });
    }

    HighlightedDocument { spans }
}
