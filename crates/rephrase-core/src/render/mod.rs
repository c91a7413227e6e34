//! Result rendering
//!
//! One branch per result kind. Every branch escapes untrusted text and
//! either returns the complete markup for the results region or an error,
//! never a partial render.

pub mod gauge;
pub mod highlight;
pub mod plagiarism;
pub mod research;

use crate::error::ClientError;
use crate::escape::{escape_html, text_to_paragraphs};
use crate::response::{AnalysisResult, DetectionResult, ResponseEnvelope};
use tracing::warn;

pub use gauge::{render_gauge, Tier};
pub use highlight::highlight_spans;
pub use plagiarism::{confidence_percent, render_plagiarism};
pub use research::{render_research, research_markdown};

/// Decode an envelope and render it.
///
/// `submitted_text` is the input snapshot taken when the request was sent;
/// detection highlighting runs over it.
pub fn render_response(
    envelope: ResponseEnvelope,
    submitted_text: &str,
) -> Result<String, ClientError> {
    let result = envelope.into_result().map_err(|e| {
        match &e {
            ClientError::UnknownKind(kind) => warn!(kind = %kind, "Unrecognized result kind"),
            ClientError::MissingKind => warn!("Response is missing result_type"),
            ClientError::InvalidResult { kind, reason } => {
                warn!(kind = %kind, reason = %reason, "Malformed result payload")
            }
            _ => {}
        }
        e
    })?;

    render_result(&result, submitted_text).map_err(|e| {
        warn!(error = %e, kind = %result.kind(), "Rendering failed");
        e
    })
}

pub fn render_result(result: &AnalysisResult, submitted_text: &str) -> Result<String, ClientError> {
    match result {
        AnalysisResult::Rewrite { text } => Ok(render_rewrite(text)),
        AnalysisResult::Detection(detection) => Ok(render_detection(detection, submitted_text)),
        AnalysisResult::Plagiarism(report) => Ok(render_plagiarism(report)),
        AnalysisResult::Research(report) => render_research(report),
    }
}

pub fn render_rewrite(text: &str) -> String {
    format!(r#"<div class="humanize-result">{}</div>"#, text_to_paragraphs(text))
}

pub fn render_detection(detection: &DetectionResult, submitted_text: &str) -> String {
    let mut html = String::from(r#"<div class="detect-header">"#);
    html.push_str(&render_gauge(detection.overall_score));

    let analysis = detection.analysis.trim();
    if !analysis.is_empty() {
        html.push_str(r#"<p class="detect-analysis">"#);
        html.push_str(&escape_html(analysis));
        html.push_str("</p>");
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="highlighted-text-container">"#);
    html.push_str(&highlight_spans(submitted_text, &detection.flagged_spans));
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{PlagiarismMatch, PlagiarismResult, ResearchReport, ResearchResult};
    use pretty_assertions::assert_eq;

    const SCRIPT: &str = "<script>alert(1)</script>";

    fn decode(body: &str) -> ResponseEnvelope {
        ResponseEnvelope::from_http(true, body).unwrap()
    }

    #[test]
    fn test_rewrite_paragraphs() {
        let html = render_result(
            &AnalysisResult::Rewrite {
                text: "Hello.\nStill here.\n\nNew paragraph.".into(),
            },
            "",
        )
        .unwrap();
        assert_eq!(
            html,
            "<div class=\"humanize-result\"><p>Hello.<br>Still here.</p><p>New paragraph.</p></div>"
        );
    }

    #[test]
    fn test_detect_end_to_end() {
        let submitted = "The cat sat. It was warm.";
        let body = r#"{
            "success": true,
            "result_type": "detect",
            "detection_result": {
                "overall_score": 72,
                "analysis": "Uniform sentence rhythm.",
                "flagged_spans": ["The cat sat."]
            }
        }"#;
        let html = render_response(decode(body), submitted).unwrap();

        assert!(html.contains("High AI Likelihood"));
        assert!(html.contains("<span>72%</span>"));
        assert!(html.contains("<p class=\"detect-analysis\">Uniform sentence rhythm.</p>"));
        assert!(html.contains(
            "<div class=\"highlighted-text-container\">\
             <mark class=\"ai-highlight\">The cat sat.</mark> It was warm.</div>"
        ));
        assert_eq!(html.matches("<mark").count(), 1);
    }

    #[test]
    fn test_detect_marks_only_flagged_sentence() {
        let submitted = "Cats are mammals. Cats are popular pets.";
        let body = r#"{
            "success": true,
            "result_type": "detect",
            "detection_result": {
                "overall_score": 72,
                "analysis": "",
                "flagged_spans": ["Cats are mammals."]
            }
        }"#;
        let html = render_response(decode(body), submitted).unwrap();

        assert!(html.contains("High AI Likelihood"));
        assert!(html.contains("<span>72%</span>"));
        assert!(html.contains(
            "<div class=\"highlighted-text-container\">\
             <mark class=\"ai-highlight\">Cats are mammals.</mark> Cats are popular pets.</div>"
        ));
        assert!(!html.contains("<mark class=\"ai-highlight\">Cats are popular pets.</mark>"));
        assert_eq!(html.matches("<mark").count(), 1);
    }

    #[test]
    fn test_detect_without_analysis_omits_paragraph() {
        let detection = DetectionResult {
            overall_score: 10.0,
            analysis: "  ".into(),
            flagged_spans: vec![],
        };
        let html = render_detection(&detection, "text");
        assert!(!html.contains("detect-analysis"));
        assert!(html.contains("Low AI Likelihood"));
    }

    #[test]
    fn test_malformed_detection_renders_nothing() {
        let body = r#"{"success": true, "result_type": "detect", "detection_result": "oops"}"#;
        let err = render_response(decode(body), "text").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResult { .. }));
    }

    #[test]
    fn test_failure_envelope_is_not_rendered() {
        let err = render_response(ResponseEnvelope::failure("Quota exceeded"), "text").unwrap_err();
        assert_eq!(err, ClientError::Application("Quota exceeded".into()));
    }

    #[test]
    fn test_script_escaped_in_every_branch() {
        let results = vec![
            AnalysisResult::Rewrite { text: SCRIPT.into() },
            AnalysisResult::Detection(DetectionResult {
                overall_score: 50.0,
                analysis: SCRIPT.into(),
                flagged_spans: vec![SCRIPT.into()],
            }),
            AnalysisResult::Plagiarism(PlagiarismResult {
                is_similarity_found: true,
                overall_confidence: Some(0.5),
                matches: vec![PlagiarismMatch {
                    matching_text: SCRIPT.into(),
                    potential_source: SCRIPT.into(),
                    confidence: Some(0.5),
                }],
            }),
            AnalysisResult::Research(ResearchReport::Structured(ResearchResult {
                topic: SCRIPT.into(),
                executive_summary: SCRIPT.into(),
                historical_context: SCRIPT.into(),
                core_concepts: vec![SCRIPT.into()],
                controversies_and_critiques: vec![],
                practical_applications: vec![],
            })),
        ];

        for result in results {
            let html = render_result(&result, SCRIPT).unwrap();
            assert!(!html.contains("<script>"), "{:?} leaked markup: {}", result.kind(), html);
        }
    }
}
