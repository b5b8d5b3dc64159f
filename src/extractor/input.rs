//! Input normalization.
//!
//! Reduces every supported input shape to an ordered list of [`Segment`]s,
//! each a piece of text plus where it came from. Conversation JSON yields one
//! segment per message (or per content block); every other format is scanned
//! as a single document.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::types::SourceType;
use crate::error::InputError;

/// Fields consulted when a message has no `content`.
const FALLBACK_TEXT_FIELDS: &[&str] = &["text", "message", "body", "description"];

static MARKDOWN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]{0,3}(?:```|~~~|#{1,6}[ \t]+\S)").expect("valid regex"));

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>").expect("valid regex"));

/// Raw extractor input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Unparsed text (Markdown, HTML, XML, plain text, or JSON text)
    Text(String),
    /// An already parsed JSON value, usually a conversation
    Json(Value),
}

impl Input {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn json(value: Value) -> Self {
        Self::Json(value)
    }

    /// Interpret raw text, parsing it as JSON when it is valid JSON.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) if value.is_array() || value.is_object() => Self::Json(value),
            _ => Self::Text(raw),
        }
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Declared input format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Auto,
    Json,
    Text,
    Html,
    Xml,
    Markdown,
}

/// Location of a segment inside the original input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentContext {
    pub message_index: Option<usize>,
    pub role: Option<String>,
    pub block_index: Option<usize>,
    pub timestamp: Option<String>,
}

/// A piece of text to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub context: SegmentContext,
}

impl Segment {
    fn document(text: String) -> Self {
        Self {
            text,
            context: SegmentContext::default(),
        }
    }
}

/// Normalizer output: the resolved source type and its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub source_type: SourceType,
    pub segments: Vec<Segment>,
}

/// Normalize `input` according to `input_type`.
///
/// Never fails: malformed JSON falls back to text scanning.
pub fn normalize(input: &Input, input_type: InputType) -> Normalized {
    let source_type = match (input_type, input) {
        (InputType::Auto, input) => detect(input),
        (InputType::Json, Input::Text(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => return from_json(&value),
            Err(e) => {
                warn!("{}; scanning as text", InputError::MalformedJson(e));
                SourceType::Text
            }
        },
        (InputType::Json, Input::Json(_)) => SourceType::Json,
        (InputType::Text, _) => SourceType::Text,
        (InputType::Html, _) => SourceType::Html,
        (InputType::Xml, _) => SourceType::Xml,
        (InputType::Markdown, _) => SourceType::Markdown,
    };
    debug!(%source_type, "Resolved input type");

    match (source_type, input) {
        (SourceType::Json, Input::Json(value)) => from_json(value),
        (source_type, input) => Normalized {
            source_type,
            segments: vec![Segment::document(as_text(input))],
        },
    }
}

/// Auto-detection decision table.
pub fn detect(input: &Input) -> SourceType {
    let text = match input {
        Input::Json(_) => return SourceType::Json,
        Input::Text(text) => text,
    };

    let trimmed = text.trim_start();
    if trimmed.starts_with('<') {
        return if trimmed.starts_with("<?xml") {
            SourceType::Xml
        } else {
            SourceType::Html
        };
    }

    let markers = MARKDOWN_MARKER.find_iter(text).count();
    if markers > 0 && markers > HTML_TAG.find_iter(text).count() {
        return SourceType::Markdown;
    }

    SourceType::Text
}

fn as_text(input: &Input) -> String {
    match input {
        Input::Text(text) => text.clone(),
        Input::Json(Value::String(s)) => s.clone(),
        Input::Json(value) => value.to_string(),
    }
}

fn from_json(value: &Value) -> Normalized {
    let mut segments = Vec::new();
    match value {
        Value::Array(messages) => {
            for (index, message) in messages.iter().enumerate() {
                push_message(&mut segments, message, index);
            }
        }
        Value::Object(map) => match map.get("messages") {
            Some(Value::Array(messages)) => {
                for (index, message) in messages.iter().enumerate() {
                    push_message(&mut segments, message, index);
                }
            }
            _ => push_message(&mut segments, value, 0),
        },
        Value::String(text) if !text.is_empty() => {
            segments.push(Segment::document(text.clone()));
        }
        _ => {}
    }
    debug!(count = segments.len(), "Normalized JSON input");
    Normalized {
        source_type: SourceType::Json,
        segments,
    }
}

fn push_message(segments: &mut Vec<Segment>, message: &Value, index: usize) {
    let base = SegmentContext {
        message_index: Some(index),
        role: message
            .get("role")
            .and_then(Value::as_str)
            .map(str::to_string),
        block_index: None,
        timestamp: message.get("timestamp").and_then(scalar_string),
    };

    let content = match message {
        Value::String(_) => Some(message),
        Value::Object(map) => map.get("content").or_else(|| {
            FALLBACK_TEXT_FIELDS
                .iter()
                .filter_map(|field| map.get(*field))
                .find(|v| v.is_string())
        }),
        _ => None,
    };

    match content {
        Some(Value::String(text)) => {
            if !text.is_empty() {
                segments.push(Segment {
                    text: text.clone(),
                    context: base,
                });
            }
        }
        Some(Value::Array(blocks)) => {
            let mut leaves = Vec::new();
            collect_leaves(blocks, &mut leaves);
            for (block_index, text) in leaves.into_iter().enumerate() {
                segments.push(Segment {
                    text,
                    context: SegmentContext {
                        block_index: Some(block_index),
                        ..base.clone()
                    },
                });
            }
        }
        _ => {}
    }
}

/// Flatten a content list into its non-empty leaf strings.
fn collect_leaves(blocks: &[Value], out: &mut Vec<String>) {
    for block in blocks {
        match block {
            Value::String(text) if !text.is_empty() => out.push(text.clone()),
            Value::Object(map) => {
                if let Some(Value::String(text)) = map.get("text") {
                    if !text.is_empty() {
                        out.push(text.clone());
                    }
                } else {
                    match map.get("content") {
                        Some(Value::String(text)) if !text.is_empty() => out.push(text.clone()),
                        Some(Value::Array(nested)) => collect_leaves(nested, out),
                        _ => {}
                    }
                }
            }
            Value::Array(nested) => collect_leaves(nested, out),
            _ => {}
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
