//! WebSocket side of the live stats channel
//!
//! Connection state and counter updates live in
//! [`rephrase_core::StatsChannel`]; this module owns the socket, its event
//! handlers and the reconnect timer.

use rephrase_core::{StatsChannel, StatsCounters};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

/// `ws://` or `wss://` URL for `path`, following the page protocol.
pub fn stats_url(page_protocol: &str, host: &str, path: &str) -> String {
    let scheme = if page_protocol.eq_ignore_ascii_case("https:") {
        "wss"
    } else {
        "ws"
    };
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    format!("{}://{}{}", scheme, host, path)
}

pub type CountersCallback = Rc<dyn Fn(&StatsCounters)>;

struct Handlers {
    _open: Closure<dyn FnMut(Event)>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _error: Closure<dyn FnMut(Event)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
}

struct Inner {
    url: String,
    channel: StatsChannel,
    socket: Option<WebSocket>,
    handlers: Option<Handlers>,
    on_counters: CountersCallback,
}

/// A self-reconnecting stats connection
pub struct LiveStats {
    inner: Rc<RefCell<Inner>>,
}

impl LiveStats {
    /// Open the channel. It keeps reconnecting until dropped.
    pub fn start(url: String, reconnect_delay: Duration, on_counters: CountersCallback) -> Self {
        let inner = Rc::new(RefCell::new(Inner {
            url,
            channel: StatsChannel::new(reconnect_delay),
            socket: None,
            handlers: None,
            on_counters,
        }));
        connect(&inner);
        Self { inner }
    }

    pub fn counters(&self) -> StatsCounters {
        *self.inner.borrow().channel.counters()
    }
}

impl Drop for LiveStats {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            if let Some(socket) = detach(&mut inner) {
                let _ = socket.close();
            }
        }
    }
}

/// Clear the handlers of the current socket so its closures can be dropped.
fn detach(inner: &mut Inner) -> Option<WebSocket> {
    let socket = inner.socket.take()?;
    socket.set_onopen(None);
    socket.set_onmessage(None);
    socket.set_onerror(None);
    socket.set_onclose(None);
    inner.handlers = None;
    Some(socket)
}

fn connect(shared: &Rc<RefCell<Inner>>) {
    let url = shared.borrow().url.clone();

    let socket = match WebSocket::new(&url) {
        Ok(socket) => socket,
        Err(e) => {
            warn!(url = %url, error = ?e, "Could not open stats socket");
            let delay = shared.borrow_mut().channel.on_error();
            if let Some(delay) = delay {
                schedule_reconnect(shared, delay);
            }
            return;
        }
    };

    let weak = Rc::downgrade(shared);
    let on_open = Closure::wrap(Box::new(move |_event: Event| {
        if let Some(shared) = weak.upgrade() {
            shared.borrow_mut().channel.on_open();
        }
    }) as Box<dyn FnMut(_)>);

    let weak = Rc::downgrade(shared);
    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        handle_message(&weak, &event);
    }) as Box<dyn FnMut(_)>);

    let weak = Rc::downgrade(shared);
    let on_error = Closure::wrap(Box::new(move |_event: Event| {
        let Some(shared) = weak.upgrade() else { return };
        let delay = shared.borrow_mut().channel.on_error();
        let socket = shared.borrow().socket.clone();
        if let Some(socket) = socket {
            let _ = socket.close();
        }
        if let Some(delay) = delay {
            schedule_reconnect(&shared, delay);
        }
    }) as Box<dyn FnMut(_)>);

    let weak = Rc::downgrade(shared);
    let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
        let Some(shared) = weak.upgrade() else { return };
        debug!(code = event.code(), "Stats socket closed");
        let delay = shared.borrow_mut().channel.on_close();
        if let Some(delay) = delay {
            schedule_reconnect(&shared, delay);
        }
    }) as Box<dyn FnMut(_)>);

    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

    let mut inner = shared.borrow_mut();
    inner.socket = Some(socket);
    inner.handlers = Some(Handlers {
        _open: on_open,
        _message: on_message,
        _error: on_error,
        _close: on_close,
    });
}

fn handle_message(weak: &Weak<RefCell<Inner>>, event: &MessageEvent) {
    let Some(shared) = weak.upgrade() else { return };
    let Some(text) = event.data().as_string() else {
        debug!("Ignoring non-text stats frame");
        return;
    };

    let (changed, counters, callback) = {
        let mut inner = shared.borrow_mut();
        let changed = inner.channel.on_message(&text);
        (changed, *inner.channel.counters(), inner.on_counters.clone())
    };
    if changed {
        callback(&counters);
    }
}

fn schedule_reconnect(shared: &Rc<RefCell<Inner>>, delay: Duration) {
    let weak = Rc::downgrade(shared);
    let callback = Closure::once_into_js(move || {
        let Some(shared) = weak.upgrade() else { return };
        {
            let mut inner = shared.borrow_mut();
            let _ = detach(&mut inner);
            inner.channel.begin_reconnect();
        }
        connect(&shared);
    });

    let Some(window) = web_sys::window() else {
        warn!("No window, stats channel stays closed");
        return;
    };
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
    {
        warn!(error = ?e, "Could not schedule stats reconnect");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_url_follows_page_protocol() {
        assert_eq!(stats_url("http:", "localhost:8080", "/ws"), "ws://localhost:8080/ws");
        assert_eq!(stats_url("https:", "rephrase.app", "/ws"), "wss://rephrase.app/ws");
    }

    #[test]
    fn test_stats_url_adds_leading_slash() {
        assert_eq!(stats_url("http:", "host", "live"), "ws://host/live");
    }
}
