//! Logger handle
//!
//! A [`Logger`] is a cheap, cloneable handle onto a named registry entry.
//! It carries the message style it was acquired with; everything else
//! (levels, routing, layouts) comes from the context's live configuration
//! at call time.

use super::log_arg::LogArg;
use super::log_level::LogLevel;
use super::message::FormatStyle;
use super::registry::LoggerEntry;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    entry: Arc<LoggerEntry>,
    style: FormatStyle,
}

impl Logger {
    pub(crate) fn new(entry: Arc<LoggerEntry>, style: FormatStyle) -> Self {
        Self { entry, style }
    }

    /// Category name
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn style(&self) -> FormatStyle {
        self.style
    }

    /// Handle on the same entry rendering messages in `style`.
    #[must_use]
    pub fn with_style(&self, style: FormatStyle) -> Logger {
        Logger {
            entry: Arc::clone(&self.entry),
            style,
        }
    }

    /// Whether both handles refer to the same registry entry.
    pub fn same_entry(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.entry.context.is_enabled(&self.entry.name, level)
    }

    pub fn is_trace_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Trace)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Debug)
    }

    pub fn is_info_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Info)
    }

    pub fn is_warn_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Warn)
    }

    pub fn is_error_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Error)
    }

    pub fn is_fatal_enabled(&self) -> bool {
        self.is_enabled(LogLevel::Fatal)
    }

    /// Render `template` with `args` and deliver it if `level` is enabled.
    ///
    /// A trailing [`LogArg::Throwable`] is attached to the event as its error
    /// and does not take part in substitution.
    pub fn log(&self, level: LogLevel, template: &str, args: &[LogArg]) {
        self.entry
            .context
            .log(&self.entry.name, level, self.style, template, args);
    }

    pub fn trace(&self, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Trace, template, args);
    }

    pub fn debug(&self, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Debug, template, args);
    }

    pub fn info(&self, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Info, template, args);
    }

    pub fn warn(&self, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Warn, template, args);
    }

    pub fn error(&self, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Error, template, args);
    }

    pub fn fatal(&self, template: &str, args: &[LogArg]) {
        self.log(LogLevel::Fatal, template, args);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.entry.name)
            .field("style", &self.style)
            .finish()
    }
}
