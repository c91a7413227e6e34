//! Rephrase client core
//!
//! Platform-independent logic behind the Rephrase web controller:
//! input validation, action state, request assembly, response decoding
//! and HTML rendering of analysis results, plus the live stats channel
//! state machine.
//!
//! Nothing in this crate touches the DOM or the network. The wasm app
//! (`apps/rephrase-web/wasm`) drives a [`Controller`] and a
//! [`StatsChannel`] and copies their view state into the page.

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod escape;
pub mod render;
pub mod request;
pub mod response;
pub mod stats;
pub mod validation;

pub use action::Action;
pub use config::{ClientConfig, ConfigError};
pub use controller::{Completion, Controller, ResultView, Submission, Ticket};
pub use error::{ClientError, ValidationError};
pub use escape::escape_html;
pub use render::render_response;
pub use request::{build_request, AnalysisOptions, AnalysisRequest};
pub use response::{
    AnalysisResult, DetectionResult, PlagiarismMatch, PlagiarismResult, ResearchReport,
    ResearchResult, ResponseEnvelope, ResultKind,
};
pub use stats::{ChannelState, StatsChannel, StatsCounters, StatsError, StatsUpdate};
pub use validation::{count_words, validate_input, InputValidation, WORD_LIMIT};
