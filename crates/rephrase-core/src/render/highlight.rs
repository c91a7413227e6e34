//! Literal span highlighting for detection results

use crate::escape::{escape_html, newlines_to_breaks};
use regex::Regex;
use tracing::warn;

const MARK_OPEN: &str = r#"<mark class="ai-highlight">"#;
const MARK_CLOSE: &str = "</mark>";

/// Escape `text` and wrap every occurrence of every flagged span in a
/// `<mark>`.
///
/// Spans are matched literally against the raw text, longest first, and
/// escaping is applied to the pieces afterwards, so a marker can never land
/// inside an entity. Line breaks are converted last.
pub fn highlight_spans(text: &str, spans: &[String]) -> String {
    let Some(pattern) = span_pattern(spans) else {
        return newlines_to_breaks(&escape_html(text));
    };

    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!(error = %e, spans = spans.len(), "Could not build highlight pattern");
            return newlines_to_breaks(&escape_html(text));
        }
    };

    let mut out = String::with_capacity(text.len() * 2);
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&escape_html(&text[last..m.start()]));
        out.push_str(MARK_OPEN);
        out.push_str(&escape_html(m.as_str()));
        out.push_str(MARK_CLOSE);
        last = m.end();
    }
    out.push_str(&escape_html(&text[last..]));

    newlines_to_breaks(&out)
}

/// Alternation of the distinct non-blank spans, longest first.
fn span_pattern(spans: &[String]) -> Option<String> {
    let mut distinct: Vec<&str> = spans
        .iter()
        .map(String::as_str)
        .filter(|span| !span.trim().is_empty())
        .collect();
    if distinct.is_empty() {
        return None;
    }

    distinct.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    distinct.dedup();

    Some(
        distinct
            .into_iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spans(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_marks_every_occurrence() {
        assert_eq!(
            highlight_spans("The cat sat. The cat ran.", &spans(&["The cat"])),
            "<mark class=\"ai-highlight\">The cat</mark> sat. \
             <mark class=\"ai-highlight\">The cat</mark> ran."
        );
    }

    #[test]
    fn test_metacharacters_match_literally() {
        assert_eq!(
            highlight_spans("A+B equals C. AAB is not.", &spans(&["A+B"])),
            "<mark class=\"ai-highlight\">A+B</mark> equals C. AAB is not."
        );
        assert_eq!(
            highlight_spans("cost (approx.) $5", &spans(&["(approx.)", "$5"])),
            "cost <mark class=\"ai-highlight\">(approx.)</mark> \
             <mark class=\"ai-highlight\">$5</mark>"
        );
    }

    #[test]
    fn test_longer_span_wins() {
        assert_eq!(
            highlight_spans("The cat sat.", &spans(&["cat", "The cat sat."])),
            "<mark class=\"ai-highlight\">The cat sat.</mark>"
        );
    }

    #[test]
    fn test_duplicates_and_blank_spans_ignored() {
        assert_eq!(
            highlight_spans("one two", &spans(&["two", "two", "", "  "])),
            "one <mark class=\"ai-highlight\">two</mark>"
        );
    }

    #[test]
    fn test_never_splits_entities() {
        // "amp" and "lt" only exist in the escaped form, not the input.
        assert_eq!(
            highlight_spans("Tom & Jerry < Spike", &spans(&["amp", "lt;"])),
            "Tom &amp; Jerry &lt; Spike"
        );
        assert_eq!(
            highlight_spans("Tom & Jerry", &spans(&["&"])),
            "Tom <mark class=\"ai-highlight\">&amp;</mark> Jerry"
        );
    }

    #[test]
    fn test_markup_in_text_and_spans_is_escaped() {
        let out = highlight_spans("<script>x</script> rest", &spans(&["<script>x</script>"]));
        assert_eq!(
            out,
            "<mark class=\"ai-highlight\">&lt;script&gt;x&lt;/script&gt;</mark> rest"
        );
    }

    #[test]
    fn test_newlines_converted_after_highlighting() {
        assert_eq!(
            highlight_spans("first line\nsecond line", &spans(&["line\nsecond"])),
            "first <mark class=\"ai-highlight\">line<br>second</mark> line"
        );
    }

    #[test]
    fn test_no_spans_is_escaped_text() {
        assert_eq!(highlight_spans("a < b\nc", &[]), "a &lt; b<br>c");
    }
}
