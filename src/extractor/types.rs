//! Data structures shared by the extraction pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The syntactic construct that produced a candidate.
///
/// Declaration order is scan priority: a variant earlier in the list claims
/// its spans before any later variant is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// ```` ```lang ... ``` ````
    TripleBacktick,
    /// `~~~lang ... ~~~`
    FencedTilde,
    /// `<script>...</script>`
    ScriptTag,
    /// `<style>...</style>`
    StyleTag,
    /// `<pre>...</pre>`, optionally wrapping a `<code>`
    HtmlPre,
    /// `<code>...</code>`
    HtmlCode,
    /// `<<TAG ... TAG`
    Heredoc,
    /// `// lang: python` followed by a block
    LanguageComment,
    /// Lines indented by four spaces or a tab
    IndentedCode,
    /// `` `inline` ``
    SingleBacktick,
}

impl ExtractionMethod {
    /// All methods in scan priority order.
    pub const ALL: [ExtractionMethod; 10] = [
        Self::TripleBacktick,
        Self::FencedTilde,
        Self::ScriptTag,
        Self::StyleTag,
        Self::HtmlPre,
        Self::HtmlCode,
        Self::Heredoc,
        Self::LanguageComment,
        Self::IndentedCode,
        Self::SingleBacktick,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TripleBacktick => "triple_backtick",
            Self::FencedTilde => "fenced_tilde",
            Self::ScriptTag => "script_tag",
            Self::StyleTag => "style_tag",
            Self::HtmlPre => "html_pre",
            Self::HtmlCode => "html_code",
            Self::Heredoc => "heredoc",
            Self::LanguageComment => "language_comment",
            Self::IndentedCode => "indented_code",
            Self::SingleBacktick => "single_backtick",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownPattern(s.to_string()))
    }
}

/// Format of the document a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Json,
    Html,
    Xml,
    Markdown,
    Text,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            "xml" => Ok(Self::Xml),
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            other => Err(ConfigError::UnknownSourceType(other.to_string())),
        }
    }
}

/// Where a candidate was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeContext {
    /// 1-based line of the span start within its segment
    pub line: usize,
    /// Index of the normalized segment the candidate came from
    pub segment_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Position inside a flattened message content list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Input position when several documents are extracted at once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_index: Option<usize>,
}

/// Auxiliary data describing how a candidate was matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeMetadata {
    /// Byte offset of the span start (delimiters included)
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
    /// Name of the pattern that claimed the span
    pub pattern: String,
    /// Index among accepted matches of the same pattern in the segment
    pub match_index: usize,
    /// Language tag as written in the source, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
    /// Other heuristic candidates, best first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_languages: Vec<String>,
    /// Number of heuristic signals supporting the resolved language
    pub signals: usize,
    pub segment_length: usize,
    pub content_length: usize,
}

/// A code block found by the extractor.
///
/// Instances are created once per `extract` call and never mutated; all
/// fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedCode {
    content: String,
    language: String,
    source_type: SourceType,
    extraction_method: ExtractionMethod,
    confidence: f64,
    context: CodeContext,
    metadata: CodeMetadata,
}

impl ExtractedCode {
    pub(crate) fn new(
        content: String,
        language: String,
        source_type: SourceType,
        extraction_method: ExtractionMethod,
        confidence: f64,
        context: CodeContext,
        metadata: CodeMetadata,
    ) -> Self {
        debug_assert!(!content.trim().is_empty());
        Self {
            content,
            language,
            source_type,
            extraction_method,
            confidence: confidence.clamp(0.0, 1.0),
            context,
            metadata,
        }
    }

    pub(crate) fn with_document_index(mut self, index: usize) -> Self {
        self.context.document_index = Some(index);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn extraction_method(&self) -> ExtractionMethod {
        self.extraction_method
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn context(&self) -> &CodeContext {
        &self.context
    }

    pub fn metadata(&self) -> &CodeMetadata {
        &self.metadata
    }

    /// Content length in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Role of the conversation message, if the input was a conversation.
    pub fn role(&self) -> Option<&str> {
        self.context.role.as_deref()
    }

    /// Byte span `[start, end)` within the originating segment.
    pub fn span(&self) -> (usize, usize) {
        (self.metadata.start, self.metadata.end)
    }
}

#[cfg(test)]
pub(crate) fn sample(
    content: &str,
    language: &str,
    method: ExtractionMethod,
    confidence: f64,
) -> ExtractedCode {
    ExtractedCode::new(
        content.to_string(),
        language.to_string(),
        SourceType::Markdown,
        method,
        confidence,
        CodeContext::default(),
        CodeMetadata {
            pattern: method.to_string(),
            content_length: content.chars().count(),
            ..CodeMetadata::default()
        },
    )
}
