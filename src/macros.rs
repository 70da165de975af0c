//! Logging macros
//!
//! The macros check the level before converting their arguments, so a
//! disabled call costs one level lookup and nothing else. Arguments are
//! converted with [`LogArg::from`](crate::LogArg); a trailing error argument
//! (built with [`LogArg::error`](crate::LogArg::error)) is attached to the
//! event instead of being substituted.
//!
//! # Examples
//!
//! ```
//! use log_bridge::{info, warn, LoggerContext, Properties};
//!
//! let context = LoggerContext::new();
//! context
//!     .apply(&Properties::new().with("rootLogger.level", "warn"))
//!     .expect("valid configuration");
//! let logger = context.get_logger("server");
//!
//! // Filtered: arguments are never converted
//! info!(logger, "Server listening on port {}", 8080);
//!
//! warn!(logger, "Retrying {} of {}", 1, 3);
//! ```

/// Log at an explicit level.
///
/// ```
/// # use log_bridge::{LoggerContext, LogLevel};
/// # let context = LoggerContext::new();
/// # let logger = context.get_logger("doc");
/// use log_bridge::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, $template, &[$($crate::LogArg::from($arg)),*]);
        }
    }};
}

#[macro_export]
macro_rules! trace {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($rest)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($rest)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($rest)+)
    };
}

/// ```
/// # use log_bridge::{LoggerContext, LogArg};
/// # let context = LoggerContext::new();
/// # let logger = context.get_logger("doc");
/// use log_bridge::error;
/// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
/// error!(logger, "Failed to load {}", "config.toml", LogArg::error(&err));
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($rest)+)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($rest)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::{LogArg, LoggerContext, Properties, ThrowableInfo};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_macros_deliver_enabled_levels() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("macros.log");
        let context = LoggerContext::from_properties(
            &Properties::new()
                .with("appender.f.type", "File")
                .with("appender.f.fileName", path.display().to_string())
                .with("appender.f.layout.pattern", "%-5p %m%n")
                .with("rootLogger", "info, f")
                .with("status", "off"),
        )
        .expect("valid configuration");
        let logger = context.get_logger("m");

        trace!(logger, "hidden");
        debug!(logger, "hidden {}", 1);
        info!(logger, "visible {}", "text");
        warn!(logger, "{} and {}", 'a', true,);
        error!(
            logger,
            "oops",
            LogArg::Throwable(ThrowableInfo::new("IoError", "disk full"))
        );
        fatal!(logger, "bye");

        let content = fs::read_to_string(&path).expect("read log");
        assert_eq!(
            content,
            "INFO  visible text\nWARN  a and true\nERROR oops\nIoError: disk full\nFATAL bye\n"
        );
        assert_eq!(context.metrics().formatted_count(), 4);
    }

    #[test]
    fn test_disabled_macro_skips_conversion() {
        let context = LoggerContext::from_properties(
            &Properties::new().with("rootLogger.level", "off").with("status", "off"),
        )
        .expect("valid configuration");
        let logger = context.get_logger("m");

        let mut evaluated = false;
        info!(logger, "{}", {
            evaluated = true;
            1
        });

        assert!(!evaluated);
        assert_eq!(context.metrics().filtered_count(), 0);
    }
}
