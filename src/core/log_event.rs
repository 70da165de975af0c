//! Log event structure

use super::log_arg::LogArg;
use super::log_level::LogLevel;
use super::throwable::ThrowableInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// One log call that passed the level filter.
///
/// Built after the message has been rendered; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub category: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<LogArg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throwable: Option<ThrowableInfo>,
    pub timestamp: DateTime<Utc>,
    pub thread_id: String,
    pub thread_name: Option<String>,
}

impl LogEvent {
    pub fn new(category: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            level,
            message: message.into(),
            args: Vec::new(),
            throwable: None,
            timestamp: Utc::now(),
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
        }
    }

    pub fn with_args(mut self, args: Vec<LogArg>) -> Self {
        self.args = args;
        self
    }

    pub fn with_throwable(mut self, throwable: Option<ThrowableInfo>) -> Self {
        self.throwable = throwable;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Thread name if the thread has one, otherwise its id.
    pub fn thread(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_label() {
        let event = std::thread::Builder::new()
            .name("worker-1".to_string())
            .spawn(|| LogEvent::new("a", LogLevel::Info, "m"))
            .expect("spawn")
            .join()
            .expect("join");
        assert_eq!(event.thread(), "worker-1");

        let event = std::thread::spawn(|| LogEvent::new("a", LogLevel::Info, "m"))
            .join()
            .expect("join");
        assert!(event.thread().starts_with("ThreadId("));
    }

    #[test]
    fn test_builders() {
        let event = LogEvent::new("my.logger", LogLevel::Warn, "hello")
            .with_args(vec!["x".into()])
            .with_throwable(Some(ThrowableInfo::new("E", "m")));
        assert_eq!(event.category, "my.logger");
        assert_eq!(event.args.len(), 1);
        assert!(event.throwable.is_some());
    }
}
