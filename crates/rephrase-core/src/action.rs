//! Analysis actions and their per-action presentation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysis mode selected by the user.
///
/// Serialized with the backend's wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    /// Rewrite text so it reads as human-written
    #[default]
    #[serde(rename = "humanize")]
    Rewrite,
    /// Estimate the likelihood the text is AI-generated
    #[serde(rename = "detect")]
    Detect,
    /// Look for passages similar to published content
    #[serde(rename = "plagiarize")]
    PlagiarismCheck,
    /// Produce a structured report on a topic
    #[serde(rename = "research")]
    Research,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Rewrite,
        Action::Detect,
        Action::PlagiarismCheck,
        Action::Research,
    ];

    /// Wire name, also used for `data-action` attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Rewrite => "humanize",
            Action::Detect => "detect",
            Action::PlagiarismCheck => "plagiarize",
            Action::Research => "research",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Action::Rewrite => "Humanizer",
            Action::Detect => "AI Detector",
            Action::PlagiarismCheck => "Plagiarism Check",
            Action::Research => "AI Research",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            Action::Research => "Research Topic",
            other => other.title(),
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Action::Research => "Enter a topic to research...",
            _ => "Enter text to begin...",
        }
    }

    /// Only the rewrite action exposes tone, complexity, dialect and
    /// freeze-keyword controls.
    pub fn shows_options(&self) -> bool {
        matches!(self, Action::Rewrite)
    }

    /// Research topics are exempt from the word limit.
    pub fn enforces_word_limit(&self) -> bool {
        !matches!(self, Action::Research)
    }

    /// Key of this action's counter in a stats message.
    pub fn stats_key(&self) -> &'static str {
        match self {
            Action::Rewrite => "humanize_count",
            Action::Detect => "detect_count",
            Action::PlagiarismCheck => "plagiarize_count",
            Action::Research => "research_count",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "humanize" | "rewrite" => Ok(Action::Rewrite),
            "detect" => Ok(Action::Detect),
            "plagiarize" | "plagiarism-check" => Ok(Action::PlagiarismCheck),
            "research" => Ok(Action::Research),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}
