//! Pattern scanner.
//!
//! Each [`ExtractionMethod`] has one scanner. A scanner walks a segment,
//! skipping anything already claimed by a higher-priority pattern, and
//! returns candidates in offset order. Unterminated constructs never match.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::language::{normalize_tag, LanguageClassifier};
use super::spans::ClaimedSpans;
use super::types::ExtractionMethod;
use crate::error::PatternError;

/// A candidate span before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    /// Span start, delimiters included
    pub start: usize,
    /// Span end (exclusive), delimiters included
    pub end: usize,
    pub content: String,
    /// Tag exactly as written in the source
    pub hint: Option<String>,
    /// Tag to use as an explicit language
    pub explicit: Option<String>,
    /// Language implied by the construct itself, such as css for `<style>`
    pub implied: Option<&'static str>,
}

impl RawMatch {
    fn new(start: usize, end: usize, content: impl Into<String>) -> Self {
        Self {
            start,
            end,
            content: content.into(),
            hint: None,
            explicit: None,
            implied: None,
        }
    }

    /// Record `tag` as written and use it as the explicit language.
    fn tagged(mut self, tag: Option<&str>) -> Self {
        if let Some(tag) = tag.filter(|t| !t.trim().is_empty()) {
            self.hint = Some(tag.to_string());
            self.explicit = Some(tag.to_string());
        }
        self
    }

    fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }

    fn implied(mut self, language: &'static str) -> Self {
        self.implied = Some(language);
        self
    }
}

/// Scan `text` with one pattern, ignoring everything inside `claimed`.
///
/// Fails when the pattern produces more than `limit` candidates, or when it
/// has to decline more than `limit` raw matches.
pub fn scan(
    method: ExtractionMethod,
    text: &str,
    claimed: &ClaimedSpans,
    limit: usize,
) -> Result<Vec<RawMatch>, PatternError> {
    let mut out = Collector {
        method,
        limit,
        claimed,
        found: Vec::new(),
        declined: 0,
    };
    match method {
        ExtractionMethod::TripleBacktick => scan_fence(text, "```", "~~~", &mut out)?,
        ExtractionMethod::FencedTilde => scan_fence(text, "~~~", "```", &mut out)?,
        ExtractionMethod::ScriptTag => scan_regex(&SCRIPT, text, &mut out, script_match)?,
        ExtractionMethod::StyleTag => scan_regex(&STYLE, text, &mut out, |c| {
            let (start, end) = whole(c);
            Some(RawMatch::new(start, end, &c[1]).implied("css"))
        })?,
        ExtractionMethod::HtmlPre => scan_regex(&PRE, text, &mut out, pre_match)?,
        ExtractionMethod::HtmlCode => scan_regex(&CODE, text, &mut out, |c| {
            let (start, end) = whole(c);
            Some(RawMatch::new(start, end, &c[2]).tagged(class_language(&c[1])))
        })?,
        ExtractionMethod::Heredoc => {
            let terminators = Terminators::new(text);
            scan_regex(&HEREDOC, text, &mut out, |c| heredoc_match(&terminators, c))?
        }
        ExtractionMethod::LanguageComment => {
            scan_regex(&LANG_COMMENT, text, &mut out, |c| language_comment_match(text, c))?
        }
        ExtractionMethod::IndentedCode => scan_indented(text, &mut out)?,
        ExtractionMethod::SingleBacktick => scan_regex(&INLINE, text, &mut out, |c| {
            let (start, end) = whole(c);
            Some(RawMatch::new(start, end, &c[1]))
        })?,
    }
    Ok(out.found)
}

/// Accumulates candidates for one pattern and enforces the match budget.
struct Collector<'a> {
    method: ExtractionMethod,
    limit: usize,
    claimed: &'a ClaimedSpans,
    found: Vec<RawMatch>,
    /// Raw matches the pattern looked at and rejected
    declined: usize,
}

impl Collector<'_> {
    fn push(&mut self, candidate: RawMatch) -> Result<(), PatternError> {
        if candidate.content.trim().is_empty() {
            return Ok(());
        }
        if self.found.len() >= self.limit {
            return Err(PatternError::MatchLimitExceeded {
                method: self.method,
                limit: self.limit,
            });
        }
        self.found.push(candidate);
        Ok(())
    }

    fn decline(&mut self) -> Result<(), PatternError> {
        self.declined += 1;
        if self.declined > self.limit {
            return Err(PatternError::MatchLimitExceeded {
                method: self.method,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

static SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("valid regex"));
static STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").expect("valid regex"));
static PRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre\b([^>]*)>(.*?)</pre\s*>").expect("valid regex"));
static CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<code\b([^>]*)>(.*?)</code\s*>").expect("valid regex"));
static SOLE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\A\s*<code\b([^>]*)>(.*?)</code\s*>\s*\z").expect("valid regex")
});
static CLASS_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).expect("valid regex")
});
static TYPE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:type|lang|language)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("valid regex")
});
static HEREDOC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<<(-?)[ \t]*['"]?([A-Za-z_][A-Za-z0-9_]*)['"]?[^\n]*\n"#).expect("valid regex")
});
static LANG_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?mi)^[ \t]*(?://|#|--|;)[ \t]*(?:lang|language)[ \t]*[:=][ \t]*([A-Za-z0-9_+#.-]+)[ \t]*\r?$",
    )
    .expect("valid regex")
});
static INLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));

fn whole(caps: &Captures<'_>) -> (usize, usize) {
    caps.get(0).map_or((0, 0), |m| (m.start(), m.end()))
}

/// Byte offset of the character after the one at `pos`.
fn next_char(text: &str, pos: usize) -> usize {
    pos + text[pos..].chars().next().map_or(1, char::len_utf8)
}

/// Drive a regex over `text`, building a candidate from each match.
///
/// A match that overlaps a claimed span is dropped and the search resumes
/// after it. A match `build` declines resumes one character after its start,
/// since a shorter construct may still begin inside it.
fn scan_regex<F>(
    re: &Regex,
    text: &str,
    out: &mut Collector<'_>,
    mut build: F,
) -> Result<(), PatternError>
where
    F: FnMut(&Captures<'_>) -> Option<RawMatch>,
{
    let mut pos = 0;
    while pos < text.len() {
        let Some(caps) = re.captures_at(text, pos) else {
            break;
        };
        let (start, end) = whole(&caps);
        if let Some(claimed_end) = out.claimed.covering(start) {
            pos = claimed_end;
            continue;
        }
        let resume = end.max(next_char(text, start));
        match build(&caps) {
            Some(candidate) if out.claimed.overlaps(candidate.start, candidate.end) => {
                pos = candidate.end.max(resume);
            }
            Some(candidate) => {
                pos = candidate.end.max(resume);
                out.push(candidate)?;
            }
            None => {
                out.decline()?;
                pos = next_char(text, start);
            }
        }
    }
    Ok(())
}

/// Backtick or tilde fences.
///
/// A fence opens with a run of three or more markers and closes at the first
/// line holding nothing but a run at least as long.
fn scan_fence(
    text: &str,
    marker: &str,
    other: &str,
    out: &mut Collector<'_>,
) -> Result<(), PatternError> {
    let marker_char = marker.chars().next().unwrap_or('`');
    let mut pos = 0;
    while let Some(rel) = text[pos..].find(marker) {
        let open = pos + rel;
        if let Some(end) = out.claimed.covering(open) {
            pos = end;
            continue;
        }
        let run = marker_run(&text[open..], marker_char);
        let after = open + run;
        let Some(nl) = text[after..].find('\n') else {
            break;
        };
        let info = text[after..after + nl].trim();
        let body_start = after + nl + 1;
        if info.contains(marker_char) {
            pos = after;
            continue;
        }
        let Some((close, end)) = find_fence_close(text, body_start, marker_char, run) else {
            // A minimal opener without a close means no later fence closes either
            if run == marker.len() {
                break;
            }
            pos = after;
            continue;
        };
        let body = &text[body_start..close];
        let interrupted = body
            .lines()
            .any(|line| line.trim_start().starts_with(other));
        if interrupted || out.claimed.overlaps(open, end) {
            pos = body_start;
            continue;
        }
        let content = strip_closing_newline(body);
        let tag = info.split_whitespace().next();
        out.push(RawMatch::new(open, end, content).tagged(tag))?;
        pos = end;
    }
    Ok(())
}

/// Length of the run of `marker` at the start of `s`.
fn marker_run(s: &str, marker: char) -> usize {
    s.chars().take_while(|&c| c == marker).count()
}

/// Locate the closing fence for a body starting at `from`.
///
/// Returns where the body ends and where the closing run ends. The last line
/// of the segment may also carry the closing run after its code.
fn find_fence_close(text: &str, from: usize, marker: char, min_run: usize) -> Option<(usize, usize)> {
    let mut line_start = from;
    while line_start < text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |i| line_start + i);
        let line = &text[line_start..line_end];
        let trimmed = line.trim_start_matches([' ', '\t']);
        let run = marker_run(trimmed, marker);
        if run >= min_run && trimmed[run..].trim().is_empty() {
            let run_start = line_start + (line.len() - trimmed.len());
            return Some((line_start, run_start + run));
        }
        if text[line_end..].trim().is_empty() {
            let code = line.trim_end();
            let tail = code.len() - code.trim_end_matches(marker).len();
            if tail < min_run {
                return None;
            }
            let run_start = line_start + code.len() - tail;
            return Some((run_start, run_start + tail));
        }
        line_start = line_end + 1;
    }
    None
}

fn strip_closing_newline(body: &str) -> &str {
    body.strip_suffix('\n')
        .map(|b| b.strip_suffix('\r').unwrap_or(b))
        .unwrap_or(body)
}

fn attr_value<'a>(re: &Regex, attrs: &'a str) -> Option<&'a str> {
    let caps = re.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

/// `language-x` or `lang-x` from a class attribute.
fn class_language(attrs: &str) -> Option<&str> {
    attr_value(&CLASS_ATTR, attrs)?
        .split_whitespace()
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .filter(|lang| !lang.is_empty())
}

fn script_match(caps: &Captures<'_>) -> Option<RawMatch> {
    let (start, end) = whole(caps);
    let candidate = RawMatch::new(start, end, &caps[2]).implied("javascript");
    let Some(declared) = attr_value(&TYPE_ATTR, &caps[1]) else {
        return Some(candidate);
    };
    let subtype = declared
        .rsplit('/')
        .next()
        .unwrap_or(declared)
        .trim_start_matches("x-")
        .to_ascii_lowercase();
    let language = match subtype.as_str() {
        "module" | "javascript" | "ecmascript" | "babel" | "jsx" => "javascript",
        "ld+json" | "importmap" | "json" => "json",
        other => return Some(candidate.tagged(Some(other)).with_hint(declared)),
    };
    Some(candidate.tagged(Some(language)).with_hint(declared))
}

fn pre_match(caps: &Captures<'_>) -> Option<RawMatch> {
    let (start, end) = whole(caps);
    let pre_attrs = &caps[1];
    let inner = &caps[2];
    let (content, tag) = match SOLE_CODE.captures(inner) {
        Some(code) => {
            let tag = class_language(code.get(1).map_or("", |m| m.as_str()))
                .or_else(|| class_language(pre_attrs));
            (code.get(2).map_or("", |m| m.as_str()), tag)
        }
        None => (inner, class_language(pre_attrs)),
    };
    Some(RawMatch::new(start, end, content).tagged(tag))
}

/// Candidate heredoc terminator lines of one segment, indexed by text.
///
/// Built once per segment so each `<<TAG` is resolved by lookup rather than
/// by walking the rest of the segment.
struct Terminators<'a> {
    text: &'a str,
    /// Line text without a trailing `\r`
    exact: HashMap<&'a str, Vec<(usize, usize)>>,
    /// Same, with leading tabs removed, for `<<-TAG`
    tab_stripped: HashMap<&'a str, Vec<(usize, usize)>>,
}

impl<'a> Terminators<'a> {
    fn new(text: &'a str) -> Self {
        let mut exact: HashMap<&str, Vec<(usize, usize)>> = HashMap::new();
        let mut tab_stripped: HashMap<&str, Vec<(usize, usize)>> = HashMap::new();
        let mut line_start = 0;
        while line_start < text.len() {
            let line_end = text[line_start..]
                .find('\n')
                .map_or(text.len(), |i| line_start + i);
            let line = text[line_start..line_end].trim_end_matches('\r');
            if is_identifier(line) {
                exact.entry(line).or_default().push((line_start, line_end));
            }
            let stripped = line.trim_start_matches('\t');
            if is_identifier(stripped) {
                tab_stripped
                    .entry(stripped)
                    .or_default()
                    .push((line_start, line_end));
            }
            line_start = line_end + 1;
        }
        Self {
            text,
            exact,
            tab_stripped,
        }
    }

    /// First line at or after `from` that terminates `tag`.
    fn first_after(&self, tag: &str, from: usize, tabs_allowed: bool) -> Option<(usize, usize)> {
        let index = if tabs_allowed {
            &self.tab_stripped
        } else {
            &self.exact
        };
        let lines = index.get(tag)?;
        let at = lines.partition_point(|&(start, _)| start < from);
        lines.get(at).copied()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `<<TAG` through a line consisting of `TAG`.
fn heredoc_match(terminators: &Terminators<'_>, caps: &Captures<'_>) -> Option<RawMatch> {
    let (start, body_start) = whole(caps);
    let tabs_allowed = !caps[1].is_empty();
    let tag = &caps[2];

    let (line_start, line_end) = terminators.first_after(tag, body_start, tabs_allowed)?;
    let content = strip_closing_newline(&terminators.text[body_start..line_start]);
    let mut candidate = RawMatch::new(start, line_end, content).with_hint(tag);
    if let Some(language) = normalize_tag(tag) {
        if LanguageClassifier::shared().is_known(&language) {
            candidate.explicit = Some(tag.to_string());
        }
    }
    Some(candidate)
}

/// A `lang: x` comment line plus the block below it.
fn language_comment_match(text: &str, caps: &Captures<'_>) -> Option<RawMatch> {
    let (start, opener_end) = whole(caps);
    let body_start = text[opener_end..]
        .find('\n')
        .map(|i| opener_end + i + 1)?;

    let mut last_content_end = None;
    let mut line_start = body_start;
    let mut after_blank = false;
    while line_start < text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |i| line_start + i);
        let line = &text[line_start..line_end];
        if line.trim().is_empty() {
            after_blank = true;
        } else {
            let indented = line.starts_with([' ', '\t']);
            if LANG_COMMENT.is_match(line) || (after_blank && !indented) {
                break;
            }
            after_blank = false;
            last_content_end = Some(line_end);
        }
        if line_end == text.len() {
            break;
        }
        line_start = line_end + 1;
    }
    let block_end = last_content_end?;
    let content = text[body_start..block_end].trim_end_matches('\r');
    Some(RawMatch::new(start, block_end, content).tagged(Some(&caps[1])))
}

/// Runs of at least two indented non-blank lines.
fn scan_indented(text: &str, out: &mut Collector<'_>) -> Result<(), PatternError> {
    let mut run: Vec<(usize, usize)> = Vec::new();
    let mut line_start = 0;
    while line_start < text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map_or(text.len(), |i| line_start + i);
        let line = &text[line_start..line_end];
        if dedent(line).is_some() && !line.trim().is_empty() {
            run.push((line_start, line_end));
        } else {
            flush_indented(text, &mut run, out)?;
        }
        line_start = line_end + 1;
    }
    flush_indented(text, &mut run, out)
}

fn flush_indented(
    text: &str,
    run: &mut Vec<(usize, usize)>,
    out: &mut Collector<'_>,
) -> Result<(), PatternError> {
    let lines = std::mem::take(run);
    let (Some(&(start, _)), Some(&(_, end))) = (lines.first(), lines.last()) else {
        return Ok(());
    };
    if lines.len() < 2 || out.claimed.overlaps(start, end) {
        return Ok(());
    }
    let content = lines
        .iter()
        .filter_map(|&(s, e)| dedent(&text[s..e]))
        .collect::<Vec<_>>()
        .join("\n");
    out.push(RawMatch::new(start, end, content))
}

/// Strip one level of indentation, if present.
fn dedent(line: &str) -> Option<&str> {
    line.strip_prefix('\t')
        .or_else(|| line.strip_prefix("    "))
}
