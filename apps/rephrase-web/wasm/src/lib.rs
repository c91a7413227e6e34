//! WASM bindings for the Rephrase text tools page
//!
//! All page state lives in Rust inside [`RephraseApp`]; JavaScript only
//! loads the module and mounts it.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { RephraseApp } from './pkg/rephrase_wasm.js';
//!
//! await init();
//!
//! const app = new RephraseApp();            // or new RephraseApp('{"word_limit": 300}')
//! app.mount();                              // binds #inputText, #processButton, ...
//! app.selectAction('detect');
//! ```

pub mod app;
pub mod dom;
pub mod live_stats;
pub mod logging;
pub mod transport;

use rephrase_core::{Action, ResponseEnvelope};
use wasm_bindgen::prelude::*;

pub use app::RephraseApp;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[wasm_bindgen]
pub fn count_words(text: &str) -> usize {
    rephrase_core::count_words(text)
}

#[wasm_bindgen]
pub fn escape_html(text: &str) -> String {
    rephrase_core::escape_html(text)
}

/// Validation state for `text` under `action`, as
/// `{ word_count, limit, over_limit, can_submit }`.
#[wasm_bindgen]
pub fn validate_input(text: &str, action: &str, limit: usize) -> Result<JsValue, JsValue> {
    let action = action
        .parse::<Action>()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let validation = rephrase_core::validate_input(text, action, limit);
    serde_wasm_bindgen::to_value(&validation)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Render a response body into results markup.
///
/// Errors carry the message the page would show.
#[wasm_bindgen]
pub fn render_response_html(body: &str, submitted_text: &str) -> Result<String, JsValue> {
    render_response_html_internal(body, submitted_text).map_err(|e| JsValue::from_str(&e))
}

pub fn render_response_html_internal(body: &str, submitted_text: &str) -> Result<String, String> {
    ResponseEnvelope::from_http(true, body)
        .and_then(|envelope| rephrase_core::render_response(envelope, submitted_text))
        .map_err(|e| e.user_message())
}
