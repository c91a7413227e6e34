//! Page controller state machine
//!
//! [`Controller`] owns every piece of UI state: the selected action, the
//! input text, the rewrite options, derived validation, the in-flight
//! request and the results view. The wasm app only calls the transitions
//! below and copies the accessors into the DOM.
//!
//! Each submission carries the controller's generation. Selecting an
//! action bumps the generation, so a response that arrives afterwards is
//! discarded instead of rendered into the wrong view.

use crate::action::Action;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::render::render_response;
use crate::request::{build_request, AnalysisOptions, AnalysisRequest};
use crate::response::ResponseEnvelope;
use crate::validation::{validate_input, InputValidation};
use tracing::{debug, info, warn};

/// Content of the results region
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Empty,
    Loading,
    Rendered(String),
    /// Plain-text error message
    Failed(String),
}

/// Handle for one dispatched request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// A request that passed the submission gate
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: Ticket,
    pub request: AnalysisRequest,
}

/// What happened to a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The action changed while the request was in flight
    Discarded,
}

#[derive(Debug, Clone)]
struct PendingRequest {
    generation: u64,
    text: String,
    action: Action,
}

#[derive(Debug, Clone)]
pub struct Controller {
    config: ClientConfig,
    action: Action,
    text: String,
    options: AnalysisOptions,
    validation: InputValidation,
    generation: u64,
    pending: Option<PendingRequest>,
    view: ResultView,
}

impl Controller {
    pub fn new(config: ClientConfig) -> Self {
        let action = Action::default();
        let validation = validate_input("", action, config.word_limit);
        Self {
            config,
            action,
            text: String::new(),
            options: AnalysisOptions::default(),
            validation,
            generation: 0,
            pending: None,
            view: ResultView::Empty,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn validation(&self) -> &InputValidation {
        &self.validation
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    /// Switch actions. Always clears the results region, even when the
    /// same action is selected again.
    pub fn select_action(&mut self, action: Action) {
        if self.action != action {
            info!(from = %self.action, to = %action, "Action selected");
        }
        self.action = action;
        self.generation += 1;
        self.view = ResultView::Empty;
        self.revalidate();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.revalidate();
    }

    pub fn set_options(&mut self, options: AnalysisOptions) {
        self.options = options;
    }

    fn revalidate(&mut self) {
        self.validation = validate_input(&self.text, self.action, self.config.word_limit);
    }

    /// Gate and dispatch a submission.
    ///
    /// On success the view switches to loading and the returned request
    /// must be sent exactly once, then passed back via
    /// [`Controller::complete_submit`].
    pub fn begin_submit(&mut self) -> Result<Submission, ClientError> {
        if self.pending.is_some() {
            return Err(ClientError::Busy);
        }
        self.validation.check()?;

        let request = build_request(&self.text, self.action, &self.options);
        self.pending = Some(PendingRequest {
            generation: self.generation,
            text: self.text.clone(),
            action: self.action,
        });
        self.view = ResultView::Loading;
        debug!(action = %self.action, words = self.validation.word_count, "Submitting");

        Ok(Submission {
            ticket: Ticket {
                generation: self.generation,
            },
            request,
        })
    }

    /// Apply the outcome of a dispatched request.
    pub fn complete_submit(
        &mut self,
        ticket: Ticket,
        outcome: Result<ResponseEnvelope, ClientError>,
    ) -> Completion {
        let pending = match self.pending.take() {
            Some(pending) if pending.generation == ticket.generation => pending,
            other => {
                self.pending = other;
                debug!(generation = ticket.generation, "Unmatched completion ignored");
                return Completion::Discarded;
            }
        };

        if pending.generation != self.generation {
            debug!(
                action = %pending.action,
                current = %self.action,
                "Discarding stale response"
            );
            return Completion::Discarded;
        }

        self.view = match outcome.and_then(|envelope| render_response(envelope, &pending.text)) {
            Ok(html) => ResultView::Rendered(html),
            Err(e) => {
                if matches!(e, ClientError::Transport(_)) {
                    warn!(error = %e, "Request failed");
                }
                ResultView::Failed(e.user_message())
            }
        };
        Completion::Applied
    }

    pub fn page_title(&self) -> &'static str {
        self.action.title()
    }

    pub fn submit_label(&self) -> &'static str {
        self.action.submit_label()
    }

    pub fn placeholder(&self) -> &'static str {
        self.action.placeholder()
    }

    pub fn options_visible(&self) -> bool {
        self.action.shows_options()
    }

    pub fn counter_label(&self) -> String {
        self.validation.counter_label()
    }

    pub fn over_limit(&self) -> bool {
        self.validation.over_limit
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn submit_disabled(&self) -> bool {
        self.is_loading() || !self.validation.can_submit
    }

    pub fn results_html(&self) -> Option<&str> {
        match &self.view {
            ResultView::Rendered(html) => Some(html),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.view {
            ResultView::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The placeholder is shown only while nothing else occupies the
    /// results region.
    pub fn placeholder_visible(&self) -> bool {
        matches!(self.view, ResultView::Empty)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ValidationError, INVALID_RESULT_MESSAGE, TRANSPORT_ERROR_MESSAGE};
    use crate::response::{AnalysisResult, DetectionResult};
    use pretty_assertions::assert_eq;

    fn detect_envelope(score: f64, spans: &[&str]) -> ResponseEnvelope {
        ResponseEnvelope::success(&AnalysisResult::Detection(DetectionResult {
            overall_score: score,
            analysis: String::new(),
            flagged_spans: spans.iter().map(|s| s.to_string()).collect(),
        }))
    }

    fn ready(action: Action, text: &str) -> Controller {
        let mut c = Controller::default();
        c.select_action(action);
        c.set_text(text);
        c
    }

    #[test]
    fn test_initial_state() {
        let c = Controller::default();
        assert_eq!(c.action(), Action::Rewrite);
        assert_eq!(c.page_title(), "Humanizer");
        assert!(c.options_visible());
        assert!(c.submit_disabled());
        assert!(c.placeholder_visible());
        assert_eq!(c.counter_label(), "0 / 200 words");
    }

    #[test]
    fn test_select_action_updates_presentation() {
        let mut c = Controller::default();
        c.select_action(Action::Research);
        assert_eq!(c.page_title(), "AI Research");
        assert_eq!(c.submit_label(), "Research Topic");
        assert_eq!(c.placeholder(), "Enter a topic to research...");
        assert!(!c.options_visible());
    }

    #[test]
    fn test_select_action_revalidates() {
        let long = vec!["w"; 250].join(" ");
        let mut c = ready(Action::Detect, &long);
        assert!(c.over_limit());
        assert!(c.submit_disabled());

        c.select_action(Action::Research);
        assert!(!c.over_limit());
        assert!(!c.submit_disabled());
    }

    #[test]
    fn test_select_action_clears_results_and_errors() {
        let mut c = ready(Action::Detect, "some text");
        let s = c.begin_submit().unwrap();
        c.complete_submit(s.ticket, Err(ClientError::Application("boom".into())));
        assert_eq!(c.error_message(), Some("boom"));

        c.select_action(Action::Detect);
        assert_eq!(c.view(), &ResultView::Empty);
        assert!(c.error_message().is_none());
        assert!(c.placeholder_visible());
    }

    #[test]
    fn test_gate_blocks_empty_and_over_limit() {
        let mut c = ready(Action::Rewrite, "   ");
        assert_eq!(
            c.begin_submit().unwrap_err(),
            ClientError::Validation(ValidationError::Empty)
        );

        c.set_text(vec!["w"; 201].join(" "));
        assert!(matches!(
            c.begin_submit().unwrap_err(),
            ClientError::Validation(ValidationError::OverLimit { count: 201, .. })
        ));
        assert!(!c.is_loading());
    }

    #[test]
    fn test_single_request_in_flight() {
        let mut c = ready(Action::Detect, "text");
        let first = c.begin_submit().unwrap();
        assert!(c.is_loading());
        assert!(c.submit_disabled());
        assert_eq!(c.view(), &ResultView::Loading);
        assert!(!c.placeholder_visible());
        assert_eq!(c.begin_submit().unwrap_err(), ClientError::Busy);

        c.complete_submit(first.ticket, Ok(detect_envelope(10.0, &[])));
        assert!(!c.is_loading());
        assert!(!c.submit_disabled());
    }

    #[test]
    fn test_submission_carries_options() {
        let mut c = ready(Action::Rewrite, "hello world");
        c.set_options(AnalysisOptions {
            tone: "formal".into(),
            ..AnalysisOptions::default()
        });
        let s = c.begin_submit().unwrap();
        assert_eq!(s.request.action, Action::Rewrite);
        assert_eq!(s.request.text, "hello world");
        assert_eq!(s.request.options.tone, "formal");
    }

    #[test]
    fn test_detect_renders_against_snapshot() {
        let mut c = ready(Action::Detect, "The cat sat. It was warm.");
        let s = c.begin_submit().unwrap();
        c.set_text("Edited while waiting.");

        let completion = c.complete_submit(s.ticket, Ok(detect_envelope(72.0, &["The cat sat."])));
        assert_eq!(completion, Completion::Applied);
        let html = c.results_html().unwrap();
        assert!(html.contains("High AI Likelihood"));
        assert!(html.contains("<span>72%</span>"));
        assert!(html.contains("<mark class=\"ai-highlight\">The cat sat.</mark> It was warm."));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut c = ready(Action::Detect, "text");
        let s = c.begin_submit().unwrap();
        c.select_action(Action::Research);

        let completion = c.complete_submit(s.ticket, Ok(detect_envelope(90.0, &[])));
        assert_eq!(completion, Completion::Discarded);
        assert_eq!(c.view(), &ResultView::Empty);
        assert!(!c.is_loading());
    }

    #[test]
    fn test_error_outcomes_map_to_messages() {
        let mut c = ready(Action::Detect, "text");
        let s = c.begin_submit().unwrap();
        c.complete_submit(s.ticket, Err(ClientError::Transport("offline".into())));
        assert_eq!(c.error_message(), Some(TRANSPORT_ERROR_MESSAGE));
        assert!(c.results_html().is_none());

        let s = c.begin_submit().unwrap();
        c.complete_submit(s.ticket, Ok(ResponseEnvelope::failure("")));
        assert_eq!(c.error_message(), Some(crate::error::UNKNOWN_ERROR_MESSAGE));

        let s = c.begin_submit().unwrap();
        let mut envelope = ResponseEnvelope::failure("");
        envelope.success = Some(true);
        envelope.result_type = Some("summarize".into());
        c.complete_submit(s.ticket, Ok(envelope));
        assert_eq!(c.error_message(), Some(INVALID_RESULT_MESSAGE));
    }

    #[test]
    fn test_error_text_is_plain() {
        let mut c = ready(Action::Detect, "text");
        let s = c.begin_submit().unwrap();
        c.complete_submit(s.ticket, Ok(ResponseEnvelope::failure("<b>bad</b>")));
        // Inserted with textContent by the app, so kept verbatim here.
        assert_eq!(c.view(), &ResultView::Failed("<b>bad</b>".into()));
    }
}
