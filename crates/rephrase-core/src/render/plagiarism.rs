use crate::escape::escape_html;
use crate::response::{PlagiarismMatch, PlagiarismResult};

/// Confidence fraction as a whole percent. Absent means 0%.
pub fn confidence_percent(confidence: Option<f64>) -> u32 {
    match confidence {
        Some(c) if c.is_finite() => (c.clamp(0.0, 1.0) * 100.0).round() as u32,
        _ => 0,
    }
}

pub fn render_plagiarism(report: &PlagiarismResult) -> String {
    let overall = confidence_percent(report.overall_confidence);

    if !report.is_similarity_found {
        return format!(
            r#"<div class="plagiarism-unique"><h3>No Significant Plagiarism Found</h3><p>The provided text appears to be unique.</p><p class="plagiarism-confidence">Confidence: {}%</p></div>"#,
            overall
        );
    }

    let mut html = format!(
        r#"<div class="plagiarism-report"><h3>Potential Matches Found</h3><p class="plagiarism-confidence">Overall confidence: {}%</p><ul class="plagiarism-list">"#,
        overall
    );
    for m in &report.matches {
        html.push_str(&render_match(m));
    }
    html.push_str("</ul></div>");
    html
}

fn render_match(m: &PlagiarismMatch) -> String {
    let mut html = format!("<li><p>&quot;{}&quot;</p>", escape_html(&m.matching_text));

    let source = m.potential_source.trim();
    if is_web_link(source) {
        html.push_str(&format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">Possible Source</a>"#,
            escape_html(source)
        ));
    } else if !source.is_empty() {
        html.push_str(&format!(
            r#"<span class="plagiarism-source">{}</span>"#,
            escape_html(source)
        ));
    }

    if m.confidence.is_some() {
        html.push_str(&format!(
            r#"<span class="plagiarism-match-confidence">{}%</span>"#,
            confidence_percent(m.confidence)
        ));
    }

    html.push_str("</li>");
    html
}

fn is_web_link(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(text: &str, source: &str, confidence: Option<f64>) -> PlagiarismMatch {
        PlagiarismMatch {
            matching_text: text.to_string(),
            potential_source: source.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_confidence_percent() {
        assert_eq!(confidence_percent(Some(0.873)), 87);
        assert_eq!(confidence_percent(Some(0.875)), 88);
        assert_eq!(confidence_percent(Some(1.7)), 100);
        assert_eq!(confidence_percent(Some(-0.2)), 0);
        assert_eq!(confidence_percent(None), 0);
    }

    #[test]
    fn test_unique_ignores_matches() {
        let report = PlagiarismResult {
            is_similarity_found: false,
            overall_confidence: Some(0.12),
            matches: vec![entry("ignored", "https://example.com", Some(0.9))],
        };
        assert_eq!(
            render_plagiarism(&report),
            "<div class=\"plagiarism-unique\"><h3>No Significant Plagiarism Found</h3>\
             <p>The provided text appears to be unique.</p>\
             <p class=\"plagiarism-confidence\">Confidence: 12%</p></div>"
        );
    }

    #[test]
    fn test_unique_without_confidence_shows_zero() {
        let report = PlagiarismResult {
            is_similarity_found: false,
            overall_confidence: None,
            matches: vec![],
        };
        assert!(render_plagiarism(&report).contains("Confidence: 0%"));
    }

    #[test]
    fn test_matches_listed() {
        let report = PlagiarismResult {
            is_similarity_found: true,
            overall_confidence: Some(0.873),
            matches: vec![
                entry("to be or not", "https://example.com/a?b=1&c=2", Some(0.91)),
                entry("<b>bold</b>", "Old textbook", None),
            ],
        };
        assert_eq!(
            render_plagiarism(&report),
            "<div class=\"plagiarism-report\"><h3>Potential Matches Found</h3>\
             <p class=\"plagiarism-confidence\">Overall confidence: 87%</p>\
             <ul class=\"plagiarism-list\">\
             <li><p>&quot;to be or not&quot;</p>\
             <a href=\"https://example.com/a?b=1&amp;c=2\" target=\"_blank\" rel=\"noopener noreferrer\">Possible Source</a>\
             <span class=\"plagiarism-match-confidence\">91%</span></li>\
             <li><p>&quot;&lt;b&gt;bold&lt;/b&gt;&quot;</p>\
             <span class=\"plagiarism-source\">Old textbook</span></li>\
             </ul></div>"
        );
    }

    #[test]
    fn test_script_sources_are_not_links() {
        let report = PlagiarismResult {
            is_similarity_found: true,
            overall_confidence: None,
            matches: vec![entry("x", "javascript:alert(1)", None)],
        };
        let html = render_plagiarism(&report);
        assert!(!html.contains("href"));
        assert!(html.contains("<span class=\"plagiarism-source\">javascript:alert(1)</span>"));
    }
}
