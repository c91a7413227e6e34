//! Usage counters and the `/ws` broadcast hub

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use rephrase_core::{Action, StatsCounters};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::AppState;

const BROADCAST_CAPACITY: usize = 16;

/// Per-action request counters shared by the process handler and the hub
pub struct StatsTracker {
    counters: Mutex<StatsCounters>,
    tx: broadcast::Sender<String>,
}

impl StatsTracker {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            counters: Mutex::new(StatsCounters::default()),
            tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatsCounters> {
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn increment(&self, action: Action) {
        self.lock().increment(action);
    }

    pub fn snapshot(&self) -> StatsCounters {
        *self.lock()
    }

    /// Current counters as a `stats` message.
    pub fn message(&self) -> String {
        match self.snapshot().to_update().to_message() {
            Ok(message) => message,
            Err(e) => {
                warn!("Could not encode stats: {}", e);
                String::new()
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Send the current counters to every connected client.
    pub fn broadcast(&self) -> usize {
        // Err only means nobody is listening.
        self.tx.send(self.message()).unwrap_or(0)
    }

    /// Broadcast on a fixed interval until the returned task is aborted.
    pub fn spawn_ticker(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                self.broadcast();
            }
        })
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| client_session(socket, state.stats))
}

async fn client_session(socket: WebSocket, stats: Arc<StatsTracker>) {
    let (mut sender, mut receiver) = socket.split();
    let mut updates = stats.subscribe();
    info!("Stats client connected");

    if sender.send(Message::Text(stats.message())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(message) => {
                    if sender.send(Message::Text(message)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Stats client lagging");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    info!("Stats client disconnected");
}
