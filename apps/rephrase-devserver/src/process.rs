//! `POST /api/process`

use axum::{body::Bytes, extract::State, Json};
use rephrase_core::{
    count_words, Action, AnalysisOptions, AnalysisResult, ResearchReport, ResponseEnvelope,
};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::fixtures;
use crate::AppState;

/// Request body with the action left unparsed, so an unknown action gets
/// its own error instead of a generic decode failure.
#[derive(Debug, Deserialize)]
struct ProcessRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    action: String,
    #[serde(flatten)]
    options: AnalysisOptions,
}

pub async fn process(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let request: ProcessRequest = serde_json::from_slice(&body)?;
    let action = request
        .action
        .parse::<Action>()
        .map_err(|_| ApiError::InvalidAction(request.action.clone()))?;

    let result = analyze(action, &request.text, &request.options, state.word_limit)?;
    state.stats.increment(action);
    info!(action = %action, words = count_words(&request.text), "Processed request");

    Ok(Json(ResponseEnvelope::success(&result)))
}

/// Validate and run one analysis.
pub fn analyze(
    action: Action,
    text: &str,
    options: &AnalysisOptions,
    word_limit: usize,
) -> Result<AnalysisResult, ApiError> {
    let count = count_words(text);
    if action.enforces_word_limit() && count > word_limit {
        return Err(ApiError::OverLimit {
            count,
            limit: word_limit,
        });
    }

    let result = match action {
        Action::Rewrite => AnalysisResult::Rewrite {
            text: fixtures::rewrite(text, options),
        },
        Action::Detect => AnalysisResult::Detection(fixtures::detect(text)),
        Action::PlagiarismCheck => AnalysisResult::Plagiarism(fixtures::plagiarism(text)),
        Action::Research => {
            if text.trim().is_empty() {
                return Err(ApiError::EmptyTopic);
            }
            AnalysisResult::Research(ResearchReport::Structured(fixtures::research(text)))
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_skipped_for_research() {
        let topic = vec!["word"; 300].join(" ");
        assert!(analyze(Action::Research, &topic, &AnalysisOptions::default(), 200).is_ok());
        assert!(matches!(
            analyze(Action::Detect, &topic, &AnalysisOptions::default(), 200),
            Err(ApiError::OverLimit { count: 300, limit: 200 })
        ));
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert!(matches!(
            analyze(Action::Research, "  ", &AnalysisOptions::default(), 200),
            Err(ApiError::EmptyTopic)
        ));
    }

    #[test]
    fn test_result_kind_matches_action() {
        for action in Action::ALL {
            let result = analyze(action, "Some text here.", &AnalysisOptions::default(), 200).unwrap();
            assert_eq!(result.kind().as_str(), action.as_str());
        }
    }
}
