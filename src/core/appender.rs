//! Appender trait for log output destinations

use super::{
    error::Result,
    log_event::LogEvent,
    log_level::{LevelFilter, LogLevel},
};

/// An output sink plus the layout that renders events for it.
///
/// Appenders are shared between threads and between the routes of one
/// configuration snapshot, so every method takes `&self`; implementations
/// serialise writes internally. A write that returns `Ok` is visible in the
/// sink when the call returns, unless the appender was explicitly configured
/// without immediate flushing.
pub trait Appender: Send + Sync {
    fn append(&self, event: &LogEvent) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;

    /// Events below this threshold are not offered to the appender.
    fn threshold(&self) -> LevelFilter {
        LevelFilter::Level(LogLevel::Trace)
    }

    /// Whether the sink has failed and events are being dropped.
    fn is_failed(&self) -> bool {
        false
    }

    /// Flush and release the sink. Later appends are dropped.
    fn close(&self) {
        let _ = self.flush();
    }
}
