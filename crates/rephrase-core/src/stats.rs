//! Live usage counters pushed over the stats channel
//!
//! [`StatsChannel`] is the transport-free half of the channel: it tracks
//! the connection state, applies inbound messages to the counters and
//! decides when a reconnect must be scheduled. The wasm app owns the
//! socket and the timer.

use crate::action::Action;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Stats message is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Message received while channel is {0:?}")]
    NotOpen(ChannelState),
}

/// A `stats` message. Counters that are absent stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humanize_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detect_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarize_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_count: Option<u64>,
}

const MESSAGE_TYPE: &str = "stats";

impl StatsUpdate {
    /// Parse an inbound message. Messages of any other type, or with no
    /// type at all, yield `None`.
    ///
    /// Each counter is read on its own: a value that is not a
    /// non-negative integer is skipped and the rest still apply.
    pub fn parse(message: &str) -> Result<Option<Self>, StatsError> {
        let value: Value = serde_json::from_str(message)?;
        let Some(fields) = value.as_object() else {
            return Ok(None);
        };
        if fields.get("type").and_then(Value::as_str) != Some(MESSAGE_TYPE) {
            return Ok(None);
        }

        Ok(Some(Self {
            humanize_count: read_counter(fields, "humanize_count"),
            detect_count: read_counter(fields, "detect_count"),
            plagiarize_count: read_counter(fields, "plagiarize_count"),
            research_count: read_counter(fields, "research_count"),
        }))
    }

    /// Serialize as a `stats` message.
    pub fn to_message(&self) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        if let Some(map) = value.as_object_mut() {
            map.insert("type".to_string(), MESSAGE_TYPE.into());
        }
        serde_json::to_string(&value)
    }
}

fn read_counter(fields: &Map<String, Value>, key: &str) -> Option<u64> {
    let value = fields.get(key)?;
    let count = value.as_u64();
    if count.is_none() && !value.is_null() {
        warn!(counter = key, value = %value, "Skipping invalid stats counter");
    }
    count
}

/// Counter values shown on the page, all starting at zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsCounters {
    pub humanize_count: u64,
    pub detect_count: u64,
    pub plagiarize_count: u64,
    pub research_count: u64,
}

impl StatsCounters {
    pub fn apply(&mut self, update: &StatsUpdate) {
        if let Some(n) = update.humanize_count {
            self.humanize_count = n;
        }
        if let Some(n) = update.detect_count {
            self.detect_count = n;
        }
        if let Some(n) = update.plagiarize_count {
            self.plagiarize_count = n;
        }
        if let Some(n) = update.research_count {
            self.research_count = n;
        }
    }

    pub fn get(&self, action: Action) -> u64 {
        match action {
            Action::Rewrite => self.humanize_count,
            Action::Detect => self.detect_count,
            Action::PlagiarismCheck => self.plagiarize_count,
            Action::Research => self.research_count,
        }
    }

    pub fn increment(&mut self, action: Action) {
        let counter = match action {
            Action::Rewrite => &mut self.humanize_count,
            Action::Detect => &mut self.detect_count,
            Action::PlagiarismCheck => &mut self.plagiarize_count,
            Action::Research => &mut self.research_count,
        };
        *counter = counter.saturating_add(1);
    }

    /// Full snapshot as an update carrying every counter.
    pub fn to_update(&self) -> StatsUpdate {
        StatsUpdate {
            humanize_count: Some(self.humanize_count),
            detect_count: Some(self.detect_count),
            plagiarize_count: Some(self.plagiarize_count),
            research_count: Some(self.research_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

/// Connection state machine with a fixed-delay reconnect policy
#[derive(Debug, Clone)]
pub struct StatsChannel {
    state: ChannelState,
    counters: StatsCounters,
    reconnect_delay: Duration,
    attempts: u64,
}

impl StatsChannel {
    /// A channel about to open its first connection.
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ChannelState::Connecting,
            counters: StatsCounters::default(),
            reconnect_delay,
            attempts: 1,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn counters(&self) -> &StatsCounters {
        &self.counters
    }

    /// Connection attempts made so far, including the first.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn on_open(&mut self) {
        info!(attempt = self.attempts, "Stats channel open");
        self.state = ChannelState::Open;
    }

    /// Handle one inbound message. Returns `true` when counters changed.
    ///
    /// Errors are logged and contained: the channel stays open and the
    /// counters keep their values.
    pub fn on_message(&mut self, message: &str) -> bool {
        match self.try_message(message) {
            Ok(changed) => changed,
            Err(e) => {
                warn!(error = %e, "Ignoring stats message");
                false
            }
        }
    }

    fn try_message(&mut self, message: &str) -> Result<bool, StatsError> {
        if self.state != ChannelState::Open {
            return Err(StatsError::NotOpen(self.state));
        }
        match StatsUpdate::parse(message)? {
            Some(update) => {
                let before = self.counters;
                self.counters.apply(&update);
                Ok(before != self.counters)
            }
            None => {
                debug!("Ignoring non-stats message");
                Ok(false)
            }
        }
    }

    /// Transport error. Forces the channel closed.
    pub fn on_error(&mut self) -> Option<Duration> {
        warn!("Stats channel error");
        self.close()
    }

    pub fn on_close(&mut self) -> Option<Duration> {
        self.close()
    }

    /// Returns the reconnect delay on the transition into `Closed` only,
    /// so an error followed by a close schedules a single reconnect.
    fn close(&mut self) -> Option<Duration> {
        if self.state == ChannelState::Closed {
            return None;
        }
        self.state = ChannelState::Closed;
        info!(delay_ms = self.reconnect_delay.as_millis() as u64, "Stats channel closed, reconnecting");
        Some(self.reconnect_delay)
    }

    /// The reconnect timer fired.
    pub fn begin_reconnect(&mut self) {
        if self.state == ChannelState::Closed {
            self.attempts += 1;
            self.state = ChannelState::Connecting;
        }
    }
}
