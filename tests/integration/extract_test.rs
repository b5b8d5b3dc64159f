//! End-to-end extraction over the fixture documents.

use code_extractor::{
    extract, filter, get_statistics, CodeExtractor, CodeFilter, ExtractedCode, ExtractionConfig,
    ExtractionMethod, Input, InputType, SourceType,
};

use crate::helpers::load_fixture;

fn extract_fixture(name: &str) -> Vec<ExtractedCode> {
    CodeExtractor::default().extract(&Input::parse(load_fixture(name)), InputType::Auto)
}

fn summary(codes: &[ExtractedCode]) -> Vec<(ExtractionMethod, &str, usize)> {
    codes
        .iter()
        .map(|c| (c.extraction_method(), c.language(), c.context().line))
        .collect()
}

// ============================================================================
// Markdown
// ============================================================================

#[test]
fn markdown_guide_yields_every_construct_once() {
    let codes = extract_fixture("guide.md");

    assert_eq!(
        summary(&codes),
        vec![
            (ExtractionMethod::SingleBacktick, "bash", 3),
            (ExtractionMethod::TripleBacktick, "python", 5),
            (ExtractionMethod::FencedTilde, "bash", 14),
            (ExtractionMethod::IndentedCode, "sql", 20),
        ]
    );
    assert!(codes.iter().all(|c| c.source_type() == SourceType::Markdown));
}

#[test]
fn markdown_guide_contents_are_stripped() {
    let codes = extract_fixture("guide.md");
    let contents: Vec<_> = codes.iter().map(|c| c.content()).collect();

    assert_eq!(
        contents,
        vec![
            "pip install requests",
            "import requests\n\ndef fetch(url):\n    return requests.get(url).json()",
            "python fetch.py --verbose",
            "SELECT id, name\nFROM users\nWHERE active = 1;",
        ]
    );
}

#[test]
fn fenced_blocks_outrank_inline_and_indented() {
    let codes = extract_fixture("guide.md");
    let fence = codes
        .iter()
        .find(|c| c.extraction_method() == ExtractionMethod::TripleBacktick)
        .unwrap();
    let inline = codes
        .iter()
        .find(|c| c.extraction_method() == ExtractionMethod::SingleBacktick)
        .unwrap();
    let indented = codes
        .iter()
        .find(|c| c.extraction_method() == ExtractionMethod::IndentedCode)
        .unwrap();

    assert!(fence.confidence() > indented.confidence());
    assert!(fence.confidence() > inline.confidence());
    assert_eq!(fence.metadata().language_hint.as_deref(), Some("python"));
    assert!(indented.metadata().language_hint.is_none());
}

#[test]
fn spans_point_back_into_the_document() {
    let text = load_fixture("guide.md");
    let codes = extract_fixture("guide.md");

    for code in &codes {
        let (start, end) = code.span();
        let span = &text[start..end];
        let first_line = code.content().lines().next().unwrap().trim();
        assert!(span.contains(first_line), "{:?} not in {:?}", first_line, span);
    }
}

// ============================================================================
// Conversations
// ============================================================================

#[test]
fn conversation_candidates_carry_message_context() {
    let codes = extract_fixture("conversation.json");

    assert_eq!(codes.len(), 2);
    assert!(codes.iter().all(|c| c.source_type() == SourceType::Json));

    let rust = &codes[0];
    assert_eq!(rust.language(), "rust");
    assert_eq!(rust.extraction_method(), ExtractionMethod::TripleBacktick);
    assert!(rust.content().starts_with("use std::fs;"));
    assert_eq!(rust.context().message_index, Some(2));
    assert_eq!(rust.context().block_index, Some(0));
    assert_eq!(rust.role(), Some("assistant"));
    assert_eq!(rust.context().timestamp.as_deref(), Some("2024-05-01T10:00:05Z"));

    let shell = &codes[1];
    assert_eq!(shell.content(), "ls -la");
    assert_eq!(shell.context().block_index, Some(1));
    assert_eq!(shell.confidence(), 0.5);
}

#[test]
fn conversation_filters_by_role() {
    let codes = extract_fixture("conversation.json");

    let assistant = filter(&codes, &CodeFilter::new().role("assistant")).unwrap();
    let user = filter(&codes, &CodeFilter::new().role("user")).unwrap();

    assert_eq!(assistant.len(), 2);
    assert!(user.is_empty());
}

#[test]
fn conversation_read_as_text_loses_message_context() {
    let raw = load_fixture("conversation.json");
    let codes = CodeExtractor::default().extract(&Input::text(raw), InputType::Text);

    assert!(!codes.is_empty());
    assert!(codes.iter().all(|c| c.context().message_index.is_none()));
    assert!(codes.iter().all(|c| c.source_type() == SourceType::Text));
}

// ============================================================================
// HTML
// ============================================================================

#[test]
fn html_page_yields_tags_in_document_order() {
    let codes = extract_fixture("page.html");
    let methods: Vec<_> = codes.iter().map(|c| c.extraction_method()).collect();

    assert_eq!(
        methods,
        vec![
            ExtractionMethod::StyleTag,
            ExtractionMethod::HtmlCode,
            ExtractionMethod::HtmlPre,
            ExtractionMethod::ScriptTag,
        ]
    );
    assert!(codes.iter().all(|c| c.source_type() == SourceType::Html));
}

#[test]
fn html_languages_come_from_tags_and_attributes() {
    let codes = extract_fixture("page.html");

    assert_eq!(codes[0].language(), "css");
    assert_eq!(codes[0].confidence(), 0.9);

    assert_eq!(codes[1].content(), "render()");

    assert_eq!(codes[2].language(), "python");
    assert_eq!(codes[2].confidence(), 0.85);
    assert_eq!(codes[2].metadata().language_hint.as_deref(), Some("python"));
    assert!(codes[2].content().starts_with("def render():"));

    assert_eq!(codes[3].language(), "javascript");
    assert!(codes[3].content().contains("addEventListener"));
}

// ============================================================================
// Configuration and batch use
// ============================================================================

#[test]
fn pattern_subset_limits_methods() {
    let input = Input::parse(load_fixture("guide.md"));
    let codes = extract(
        &input,
        InputType::Auto,
        Some(&[ExtractionMethod::IndentedCode, ExtractionMethod::SingleBacktick]),
        0.0,
    )
    .unwrap();

    let methods: Vec<_> = codes.iter().map(|c| c.extraction_method()).collect();
    assert!(!methods.contains(&ExtractionMethod::TripleBacktick));
    assert!(methods.contains(&ExtractionMethod::SingleBacktick));
}

#[test]
fn extractor_threshold_drops_weak_candidates() {
    let config = ExtractionConfig::default().with_min_confidence(0.85);
    let extractor = CodeExtractor::new(config).unwrap();
    let codes = extractor.extract(&Input::parse(load_fixture("guide.md")), InputType::Auto);

    assert!(!codes.is_empty());
    assert!(codes.iter().all(|c| c.confidence() >= 0.85));
}

#[test]
fn extract_many_keeps_documents_apart() {
    let inputs = vec![
        Input::parse(load_fixture("guide.md")),
        Input::parse(load_fixture("conversation.json")),
        Input::parse(load_fixture("page.html")),
    ];
    let codes = CodeExtractor::default().extract_many(&inputs, InputType::Auto);

    let stats = get_statistics(&codes);
    assert_eq!(stats.total, 10);
    assert_eq!(stats.by_source_type.get("markdown"), Some(&4));
    assert_eq!(stats.by_source_type.get("json"), Some(&2));
    assert_eq!(stats.by_source_type.get("html"), Some(&4));

    let docs: Vec<_> = codes.iter().filter_map(|c| c.context().document_index).collect();
    let mut sorted = docs.clone();
    sorted.sort_unstable();
    assert_eq!(docs, sorted);
    assert_eq!(docs.len(), codes.len());
}

#[test]
fn shared_extractor_is_reusable() {
    let extractor = CodeExtractor::default();
    let input = Input::parse(load_fixture("page.html"));

    let first = extractor.extract(&input, InputType::Auto);
    let second = extractor.extract(&input, InputType::Auto);
    assert_eq!(first, second);
}
