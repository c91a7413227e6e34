//! Response envelope and typed analysis results
//!
//! The backend answers `POST /api/process` with a JSON envelope carrying a
//! success flag, a result kind discriminator and one payload field per
//! kind. [`ResponseEnvelope::into_result`] turns the loosely typed
//! envelope into an [`AnalysisResult`], so renderers only ever see
//! well-formed data.

use crate::error::ClientError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Result kind discriminator (`result_type` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    #[serde(rename = "humanize")]
    Rewrite,
    #[serde(rename = "detect")]
    Detection,
    #[serde(rename = "plagiarize")]
    Plagiarism,
    #[serde(rename = "research")]
    Research,
}

impl ResultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Rewrite => "humanize",
            ResultKind::Detection => "detect",
            ResultKind::Plagiarism => "plagiarize",
            ResultKind::Research => "research",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "humanize" => Ok(ResultKind::Rewrite),
            "detect" => Ok(ResultKind::Detection),
            "plagiarize" => Ok(ResultKind::Plagiarism),
            "research" => Ok(ResultKind::Research),
            other => Err(ClientError::UnknownKind(other.to_string())),
        }
    }
}

/// AI-likelihood analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Likelihood in percent, 0 to 100
    pub overall_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub analysis: String,
    /// Literal substrings of the submitted text to mark
    #[serde(default, alias = "sentences", deserialize_with = "null_as_default")]
    pub flagged_spans: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismMatch {
    pub matching_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub potential_source: String,
    /// Fraction in [0, 1]; absent in legacy text reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismResult {
    pub is_similarity_found: bool,
    /// Fraction in [0, 1]; rendered as 0% when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_confidence: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<PlagiarismMatch>,
}

impl PlagiarismResult {
    /// Parse the line-oriented report format of older backends.
    ///
    /// `UNIQUE` means no similarity. Otherwise every line containing
    /// `MATCH:` is read as `MATCH: phrase | SOURCE: url`.
    pub fn from_report(report: &str) -> Self {
        if report.trim().eq_ignore_ascii_case("UNIQUE") {
            return Self {
                is_similarity_found: false,
                overall_confidence: None,
                matches: Vec::new(),
            };
        }

        let matches = report
            .lines()
            .filter(|line| line.contains("MATCH:"))
            .map(|line| {
                let mut parts = line.splitn(2, '|');
                let phrase = parts
                    .next()
                    .unwrap_or_default()
                    .replacen("MATCH:", "", 1)
                    .trim()
                    .to_string();
                let source = parts
                    .next()
                    .map(|s| s.replacen("SOURCE:", "", 1).trim().to_string())
                    .unwrap_or_default();
                PlagiarismMatch {
                    matching_text: phrase,
                    potential_source: source,
                    confidence: None,
                }
            })
            .collect();

        Self {
            is_similarity_found: true,
            overall_confidence: None,
            matches,
        }
    }
}

/// Structured topic research
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub executive_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub historical_context: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub core_concepts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub controversies_and_critiques: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub practical_applications: Vec<String>,
}

/// Research payload: structured fields, or a ready markdown document
/// from older backends.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchReport {
    Structured(ResearchResult),
    Markdown(String),
}

/// A decoded, well-formed analysis result
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Rewrite { text: String },
    Detection(DetectionResult),
    Plagiarism(PlagiarismResult),
    Research(ResearchReport),
}

impl AnalysisResult {
    pub fn kind(&self) -> ResultKind {
        match self {
            AnalysisResult::Rewrite { .. } => ResultKind::Rewrite,
            AnalysisResult::Detection(_) => ResultKind::Detection,
            AnalysisResult::Plagiarism(_) => ResultKind::Plagiarism,
            AnalysisResult::Research(_) => ResultKind::Research,
        }
    }
}

/// Wire envelope for `POST /api/process` responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism_result: Option<Value>,
    /// Older text report, read only when `plagiarism_result` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism_report: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_result: Option<Value>,
}

impl ResponseEnvelope {
    /// Envelope for a successful analysis.
    pub fn success(result: &AnalysisResult) -> Self {
        let mut envelope = Self {
            success: Some(true),
            result_type: Some(result.kind().as_str().to_string()),
            ..Self::default()
        };
        match result {
            AnalysisResult::Rewrite { text } => envelope.text = Some(Value::String(text.clone())),
            AnalysisResult::Detection(detection) => {
                envelope.detection_result = serde_json::to_value(detection).ok()
            }
            AnalysisResult::Plagiarism(report) => {
                envelope.plagiarism_result = serde_json::to_value(report).ok()
            }
            AnalysisResult::Research(ResearchReport::Structured(research)) => {
                envelope.research_result = serde_json::to_value(research).ok()
            }
            AnalysisResult::Research(ResearchReport::Markdown(markdown)) => {
                envelope.research_result = Some(Value::String(markdown.clone()))
            }
        }
        envelope
    }

    /// Envelope for a failed request.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Interpret an HTTP response from the submit endpoint.
    ///
    /// A body that is not JSON is a transport failure. A non-2xx status is
    /// an application failure carrying the body's `error` text.
    pub fn from_http(status_ok: bool, body: &str) -> Result<Self, ClientError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ClientError::Transport(format!("response is not JSON: {}", e)))?;

        if !status_ok {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(ClientError::Application(message));
        }

        serde_json::from_value(value)
            .map_err(|e| ClientError::invalid_result("response", e.to_string()))
    }

    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// Check the success flag, then decode the payload for the declared kind.
    pub fn into_result(self) -> Result<AnalysisResult, ClientError> {
        if !self.is_success() {
            return Err(ClientError::Application(self.error.unwrap_or_default()));
        }

        let kind: ResultKind = self
            .result_type
            .as_deref()
            .ok_or(ClientError::MissingKind)?
            .parse()?;

        match kind {
            ResultKind::Rewrite => match self.text {
                Some(Value::String(text)) => Ok(AnalysisResult::Rewrite { text }),
                Some(_) => Err(ClientError::invalid_result(kind.as_str(), "text is not a string")),
                None => Err(ClientError::invalid_result(kind.as_str(), "missing text")),
            },
            ResultKind::Detection => {
                decode(kind, self.detection_result).map(AnalysisResult::Detection)
            }
            ResultKind::Plagiarism => match self.plagiarism_result.or(self.plagiarism_report) {
                Some(Value::String(report)) => Ok(AnalysisResult::Plagiarism(
                    PlagiarismResult::from_report(&report),
                )),
                payload => decode(kind, payload).map(AnalysisResult::Plagiarism),
            },
            ResultKind::Research => match self.research_result {
                Some(Value::String(markdown)) => Ok(AnalysisResult::Research(
                    ResearchReport::Markdown(markdown),
                )),
                payload => decode(kind, payload)
                    .map(|research| AnalysisResult::Research(ResearchReport::Structured(research))),
            },
        }
    }
}

fn decode<T: DeserializeOwned>(kind: ResultKind, payload: Option<Value>) -> Result<T, ClientError> {
    let value = payload.ok_or_else(|| ClientError::invalid_result(kind.as_str(), "missing payload"))?;
    serde_json::from_value(value).map_err(|e| ClientError::invalid_result(kind.as_str(), e.to_string()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
