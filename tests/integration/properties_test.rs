//! Property-based tests for extraction invariants.

use code_extractor::{filter, CodeExtractor, CodeFilter, ExtractedCode, Input, InputType};
use proptest::prelude::*;

/// Document fragments mixing every construct the scanner knows.
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ,.]{0,30}".prop_map(|s| format!("{}\n", s)),
        ("(python|js|rust|sql|)", "[a-z =()0-9]{1,20}")
            .prop_map(|(lang, body)| format!("```{}\n{}\n```\n", lang, body)),
        "[a-z =()]{1,15}".prop_map(|body| format!("~~~\n{}\n~~~\n", body)),
        "[a-z ]{1,12}".prop_map(|body| format!("Use `{}` here.\n", body)),
        ("[a-z =]{1,12}", "[a-z =]{1,12}")
            .prop_map(|(a, b)| format!("\n    {}\n    {}\n\n", a, b)),
        "[a-z{}: ;]{1,20}".prop_map(|body| format!("<style>{}</style>\n", body)),
        "[a-z()]{1,10}".prop_map(|body| format!("<pre><code>{}</code></pre>\n", body)),
        "[a-z ]{1,12}".prop_map(|body| format!("cat <<EOF\n{}\nEOF\n", body)),
        Just("```\nunterminated\n".to_string()),
        Just("`".to_string()),
    ]
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..12).prop_map(|parts| parts.concat())
}

fn extract_text(text: &str) -> Vec<ExtractedCode> {
    CodeExtractor::default().extract(&Input::text(text), InputType::Auto)
}

mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn extraction_is_deterministic(doc in document_strategy()) {
            prop_assert_eq!(extract_text(&doc), extract_text(&doc));
        }

        #[test]
        fn spans_never_overlap(doc in document_strategy()) {
            let codes = extract_text(&doc);
            for (i, a) in codes.iter().enumerate() {
                for b in &codes[i + 1..] {
                    if a.context().segment_index != b.context().segment_index {
                        continue;
                    }
                    let (a_start, a_end) = a.span();
                    let (b_start, b_end) = b.span();
                    prop_assert!(
                        a_end <= b_start || b_end <= a_start,
                        "{:?} overlaps {:?}",
                        a.span(),
                        b.span()
                    );
                }
            }
        }

        #[test]
        fn candidates_are_sorted_by_offset(doc in document_strategy()) {
            let starts: Vec<_> = extract_text(&doc).iter().map(|c| c.span().0).collect();
            let mut sorted = starts.clone();
            sorted.sort_unstable();
            prop_assert_eq!(starts, sorted);
        }

        #[test]
        fn confidence_is_bounded_and_content_non_empty(doc in document_strategy()) {
            for code in extract_text(&doc) {
                prop_assert!((0.0..=1.0).contains(&code.confidence()));
                prop_assert!(!code.content().trim().is_empty());
                prop_assert_eq!(code.char_len(), code.content().chars().count());
            }
        }

        #[test]
        fn arbitrary_text_never_panics(doc in any::<String>()) {
            for input_type in [InputType::Auto, InputType::Json, InputType::Html, InputType::Text] {
                let _ = CodeExtractor::default().extract(&Input::text(doc.as_str()), input_type);
            }
        }

        #[test]
        fn filter_conjunction_is_intersection(doc in document_strategy(), min in 0.0f64..=1.0) {
            let codes = extract_text(&doc);

            let both = filter(&codes, &CodeFilter::new().language("python").min_confidence(min)).unwrap();
            let by_language = filter(&codes, &CodeFilter::new().language("python")).unwrap();
            let by_confidence = filter(&codes, &CodeFilter::new().min_confidence(min)).unwrap();

            let intersection: Vec<_> = by_language
                .into_iter()
                .filter(|c| by_confidence.contains(c))
                .collect();
            prop_assert_eq!(both, intersection);
        }
    }
}
