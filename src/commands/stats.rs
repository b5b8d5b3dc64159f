//! Statistics report printed by `--stats`.

use std::collections::BTreeMap;

use humansize::{format_size, BINARY};

use code_extractor::{get_statistics, ExtractedCode, Statistics};

/// Print a statistics summary for `codes` to stdout.
pub fn print(codes: &[ExtractedCode]) {
    let bytes: usize = codes.iter().map(|c| c.content().len()).sum();
    print!("{}", render(&get_statistics(codes), bytes));
}

fn render(stats: &Statistics, content_bytes: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total code blocks: {}\n", stats.total));
    if stats.total == 0 {
        return out;
    }

    push_counts(&mut out, "By language", &stats.by_language);
    push_counts(&mut out, "By method", &stats.by_method);
    push_counts(&mut out, "By source type", &stats.by_source_type);

    let c = &stats.confidence_stats;
    out.push_str(&format!(
        "Confidence: avg {:.3}, min {:.3}, max {:.3}\n",
        c.avg, c.min, c.max
    ));
    out.push_str(&format!(
        "  high (>= 0.9): {}, medium: {}, low (< 0.7): {}\n",
        stats.high_confidence, stats.medium_confidence, stats.low_confidence
    ));

    let l = &stats.content_length;
    out.push_str(&format!(
        "Content length: {} chars ({}), min {}, max {}, avg {:.1}\n",
        l.total,
        format_size(content_bytes as u64, BINARY),
        l.min,
        l.max,
        l.avg
    ));
    out
}

fn push_counts(out: &mut String, title: &str, counts: &BTreeMap<String, usize>) {
    out.push_str(title);
    out.push_str(":\n");
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (name, count) in sorted {
        out.push_str(&format!("  {:<18} {}\n", name, count));
    }
}
