//! Browser controller bound to the page
//!
//! `RephraseApp` wraps a [`Controller`] in shared state so DOM event
//! handlers and the in-flight fetch can reach it. All decisions happen in
//! the controller; this type wires events to transitions and calls
//! [`Elements::sync`] afterwards.

use crate::dom::Elements;
use crate::live_stats::{stats_url, LiveStats};
use crate::transport;
use rephrase_core::{Action, ClientConfig, Controller, ResultView, StatsCounters};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Event;

struct AppState {
    controller: Controller,
    elements: Option<Elements>,
    _listeners: Vec<Closure<dyn FnMut(Event)>>,
    stats: Option<LiveStats>,
}

impl AppState {
    fn sync(&self) -> Result<(), JsValue> {
        match &self.elements {
            Some(elements) => elements.sync(&self.controller),
            None => Ok(()),
        }
    }
}

#[wasm_bindgen]
pub struct RephraseApp {
    inner: Rc<RefCell<AppState>>,
}

#[wasm_bindgen]
impl RephraseApp {
    /// Create a controller. `config_json` may override any
    /// [`ClientConfig`] field.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<RephraseApp, JsValue> {
        Self::new_internal(config_json.as_deref()).map_err(|e| JsValue::from_str(&e))
    }

    /// Bind the page elements, attach listeners and open the stats channel.
    pub fn mount(&self) -> Result<(), JsValue> {
        if self.inner.borrow().elements.is_some() {
            return Err(JsValue::from_str("Already mounted"));
        }

        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let elements = Elements::bind(&document)?;

        let mut listeners = Vec::new();
        for link in &elements.nav_links {
            let weak = Rc::downgrade(&self.inner);
            let action = link.action;
            let on_click = Closure::wrap(Box::new(move |event: Event| {
                event.prevent_default();
                with_state(&weak, |state| state.controller.select_action(action));
            }) as Box<dyn FnMut(_)>);
            link.element
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            listeners.push(on_click);
        }

        let weak = Rc::downgrade(&self.inner);
        let input = elements.input.clone();
        let on_input = Closure::wrap(Box::new(move |_event: Event| {
            let text = input.value();
            with_state(&weak, |state| state.controller.set_text(text));
        }) as Box<dyn FnMut(_)>);
        elements
            .input
            .add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        listeners.push(on_input);

        let weak = Rc::downgrade(&self.inner);
        let on_submit = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            if let Some(inner) = weak.upgrade() {
                if let Err(e) = dispatch(&inner) {
                    error!(error = ?e, "Submission failed to start");
                }
            }
        }) as Box<dyn FnMut(_)>);
        elements
            .submit
            .add_event_listener_with_callback("click", on_submit.as_ref().unchecked_ref())?;
        listeners.push(on_submit);

        let location = window.location();
        let config = self.inner.borrow().controller.config().clone();
        let url = stats_url(&location.protocol()?, &location.host()?, &config.stats_path);
        let stats_elements = elements.clone();
        let on_counters = Rc::new(move |counters: &StatsCounters| stats_elements.sync_stats(counters));

        {
            let mut state = self.inner.borrow_mut();
            let text = elements.input.value();
            state.controller.set_text(text);
            state.elements = Some(elements);
            state._listeners = listeners;
        }
        self.inner.borrow().sync()?;

        // Started last: the first socket event must find the state unborrowed.
        let stats = LiveStats::start(url, config.reconnect_delay(), on_counters);
        self.inner.borrow_mut().stats = Some(stats);

        info!("Rephrase mounted");
        Ok(())
    }

    /// Select an action by wire name (`humanize`, `detect`, `plagiarize`,
    /// `research`).
    #[wasm_bindgen(js_name = selectAction)]
    pub fn select_action(&self, action: &str) -> Result<(), JsValue> {
        self.select_action_internal(action)
            .map_err(|e| JsValue::from_str(&e))?;
        self.inner.borrow().sync()
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: String) -> Result<(), JsValue> {
        self.inner.borrow_mut().controller.set_text(text);
        self.inner.borrow().sync()
    }

    /// Submit the current input. Does nothing while a request is pending
    /// or the input fails validation.
    pub fn submit(&self) -> Result<(), JsValue> {
        dispatch(&self.inner)
    }

    #[wasm_bindgen(getter)]
    pub fn action(&self) -> String {
        self.inner.borrow().controller.action().as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.inner.borrow().controller.is_loading()
    }

    #[wasm_bindgen(getter, js_name = submitDisabled)]
    pub fn submit_disabled(&self) -> bool {
        self.inner.borrow().controller.submit_disabled()
    }

    #[wasm_bindgen(getter, js_name = counterLabel)]
    pub fn counter_label(&self) -> String {
        self.inner.borrow().controller.counter_label()
    }

    /// Last error message, if the results region shows one.
    #[wasm_bindgen(getter, js_name = errorMessage)]
    pub fn error_message(&self) -> Option<String> {
        self.inner
            .borrow()
            .controller
            .error_message()
            .map(str::to_string)
    }

    /// Live counters as `{ humanize_count, detect_count, ... }`.
    #[wasm_bindgen(getter)]
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        let counters = self
            .inner
            .borrow()
            .stats
            .as_ref()
            .map(LiveStats::counters)
            .unwrap_or_default();
        serde_wasm_bindgen::to_value(&counters)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

// Internal methods, testable without a browser
impl RephraseApp {
    pub fn new_internal(config_json: Option<&str>) -> Result<RephraseApp, String> {
        let config = ClientConfig::from_json(config_json).map_err(|e| e.to_string())?;
        Ok(RephraseApp {
            inner: Rc::new(RefCell::new(AppState {
                controller: Controller::new(config),
                elements: None,
                _listeners: Vec::new(),
                stats: None,
            })),
        })
    }

    pub fn select_action_internal(&self, action: &str) -> Result<(), String> {
        let action = action.parse::<Action>().map_err(|e| e.to_string())?;
        self.inner.borrow_mut().controller.select_action(action);
        Ok(())
    }

    pub fn set_text_internal(&self, text: &str) {
        self.inner.borrow_mut().controller.set_text(text);
    }

    pub fn view(&self) -> ResultView {
        self.inner.borrow().controller.view().clone()
    }
}

/// Run `f` against the state, then refresh the page.
fn with_state(weak: &Weak<RefCell<AppState>>, f: impl FnOnce(&mut AppState)) {
    let Some(inner) = weak.upgrade() else { return };
    let mut state = inner.borrow_mut();
    f(&mut state);
    if let Err(e) = state.sync() {
        error!(error = ?e, "Could not update the page");
    }
}

/// Gate the current input and, if it passes, send it.
fn dispatch(inner: &Rc<RefCell<AppState>>) -> Result<(), JsValue> {
    let (submission, endpoint) = {
        let mut guard = inner.borrow_mut();
        let state = &mut *guard;
        if let Some(elements) = &state.elements {
            state.controller.set_options(elements.read_options());
        }
        match state.controller.begin_submit() {
            Ok(submission) => (submission, state.controller.config().process_endpoint.clone()),
            Err(e) => {
                debug!(reason = %e, "Submission blocked");
                return state.sync();
            }
        }
    };
    inner.borrow().sync()?;

    let inner = Rc::clone(inner);
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = transport::submit(&endpoint, &submission.request).await;
        let mut state = inner.borrow_mut();
        state.controller.complete_submit(submission.ticket, outcome);
        if let Err(e) = state.sync() {
            error!(error = ?e, "Could not render the response");
        }
    });
    Ok(())
}
