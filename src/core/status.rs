//! Internal diagnostics channel
//!
//! The bridge cannot report its own problems through itself. Sink failures,
//! rejected configurations and formatting fallbacks are published as
//! [`StatusEvent`]s on a bounded channel and echoed to stderr when they meet
//! the configured status threshold.

use super::log_level::{LevelFilter, LogLevel};
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Capacity of the status channel; when full the oldest event makes room.
pub const STATUS_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub level: LogLevel,
    /// Component that raised the event, e.g. `appender 'file'`
    pub source: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Publishes status events to subscribers and stderr.
#[derive(Debug)]
pub struct StatusReporter {
    sender: Sender<StatusEvent>,
    receiver: Receiver<StatusEvent>,
    echo_threshold: RwLock<LevelFilter>,
    overflowed: AtomicU64,
}

impl StatusReporter {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(STATUS_CHANNEL_CAPACITY);
        Self {
            sender,
            receiver,
            echo_threshold: RwLock::new(LevelFilter::Level(LogLevel::Error)),
            overflowed: AtomicU64::new(0),
        }
    }

    /// Receiver for status events. Receivers share one queue; each event is
    /// delivered to one of them.
    pub fn subscribe(&self) -> Receiver<StatusEvent> {
        self.receiver.clone()
    }

    pub fn set_echo_threshold(&self, threshold: LevelFilter) {
        *self.echo_threshold.write() = threshold;
    }

    pub fn echo_threshold(&self) -> LevelFilter {
        *self.echo_threshold.read()
    }

    /// Number of old status events evicted because the channel was full.
    pub fn overflowed(&self) -> u64 {
        self.overflowed.load(Ordering::Relaxed)
    }

    pub fn report(&self, level: LogLevel, source: impl Into<String>, message: impl Into<String>) {
        let mut event = StatusEvent {
            level,
            source: source.into(),
            message: message.into(),
            timestamp: Utc::now(),
        };

        if self.echo_threshold().enables(level) {
            eprintln!(
                "[LOGGER {}] {}: {}",
                status_tag(level),
                event.source,
                event.message
            );
        }

        loop {
            match self.sender.try_send(event) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(rejected)) => {
                    if self.receiver.try_recv().is_ok() {
                        self.overflowed.fetch_add(1, Ordering::Relaxed);
                    }
                    event = rejected;
                }
            }
        }
    }

    pub fn warn(&self, source: impl Into<String>, message: impl Into<String>) {
        self.report(LogLevel::Warn, source, message);
    }

    pub fn error(&self, source: impl Into<String>, message: impl Into<String>) {
        self.report(LogLevel::Error, source, message);
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn status_tag(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace | LogLevel::Debug | LogLevel::Info => "INFO",
        LogLevel::Warn => "WARNING",
        LogLevel::Error => "ERROR",
        LogLevel::Fatal => "CRITICAL",
    }
}
