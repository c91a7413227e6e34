//! Request payload assembly

use crate::action::Action;
use serde::{Deserialize, Serialize};

/// Rewrite options collected from the option controls.
///
/// Only meaningful for [`Action::Rewrite`]. They are sent with every
/// request and the backend ignores them for other actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub complexity: String,
    #[serde(default)]
    pub dialect: String,
    /// Comma separated terms the rewrite must keep verbatim
    #[serde(default)]
    pub freeze_keywords: String,
}

impl AnalysisOptions {
    /// Split `freeze_keywords` into trimmed, non-empty terms.
    pub fn frozen_terms(&self) -> Vec<&str> {
        self.freeze_keywords
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .collect()
    }
}

/// Body of `POST /api/process`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
    pub action: Action,
    #[serde(flatten)]
    pub options: AnalysisOptions,
}

impl AnalysisRequest {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Build the request for one submission.
///
/// Options are included for every action, never omitted.
pub fn build_request(text: &str, action: Action, options: &AnalysisOptions) -> AnalysisRequest {
    AnalysisRequest {
        text: text.to_string(),
        action,
        options: options.clone(),
    }
}
