//! Submit endpoint client

use rephrase_core::{AnalysisRequest, ClientError, ResponseEnvelope};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// POST a JSON body. Returns the status flag and the raw response text.
async fn post_json(url: &str, body: &str) -> Result<(bool, String), JsValue> {
    let window = web_sys::window().ok_or("No window")?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;
    request.headers().set("Accept", "application/json")?;

    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: Response = response.dyn_into()?;

    let text = JsFuture::from(response.text()?).await?;
    Ok((response.ok(), text.as_string().unwrap_or_default()))
}

/// Send one analysis request and interpret the reply.
pub async fn submit(
    endpoint: &str,
    request: &AnalysisRequest,
) -> Result<ResponseEnvelope, ClientError> {
    let body = request
        .to_json()
        .map_err(|e| ClientError::Transport(format!("could not encode request: {}", e)))?;

    let (ok, text) = post_json(endpoint, &body)
        .await
        .map_err(|e| ClientError::Transport(js_error_text(&e)))?;

    ResponseEnvelope::from_http(ok, &text)
}

/// Best-effort description of a thrown JS value.
pub fn js_error_text(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}
