//! # Log Bridge
//!
//! A logging bridge that routes named-logger calls to file and console
//! appenders under a configuration that can be replaced at runtime.
//!
//! ## Features
//!
//! - **Two message styles**: `{}` placeholders or printf-style conversions,
//!   chosen per logger handle
//! - **Hierarchical levels**: per-category thresholds resolved by longest
//!   dotted prefix
//! - **Atomic reconfiguration**: a new configuration is validated, built and
//!   swapped in as a whole; invalid input leaves the running one untouched
//! - **Self-diagnostics**: sink failures and rejected configurations are
//!   published on a status channel and never raised to callers
//!
//! ## Example
//!
//! ```
//! use log_bridge::prelude::*;
//!
//! let context = LoggerContext::new();
//! context
//!     .apply(
//!         &Properties::new()
//!             .with("appender.console.type", "Console")
//!             .with("appender.console.layout.pattern", "%c [%p] %m%n")
//!             .with("rootLogger.level", "info")
//!             .with("rootLogger.appenderRef.console.ref", "console"),
//!     )
//!     .expect("valid configuration");
//!
//! let logger = context.get_logger("app.main");
//! logger.info("started in {} ms", &[LogArg::from(42)]);
//!
//! let printf = context.get_formatter_logger("app.main");
//! printf.info("%s is %d%%", &["progress".into(), 75.into()]);
//! ```

pub mod appenders;
pub mod config;
pub mod core;
pub mod layouts;
#[macro_use]
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, ConsoleTarget, FileAppender, FileOptions};
    pub use crate::config::{ConfigSpec, Properties};
    pub use crate::core::{
        Appender, FormatStyle, LevelFilter, LogArg, LogEvent, LogLevel, Logger, LoggerContext,
        LoggerError, LoggerMetrics, Result, StatusEvent, ThrowableInfo,
    };
    pub use crate::layouts::{JsonLayout, Layout, PatternLayout};
}

pub use appenders::{ConsoleAppender, ConsoleTarget, FileAppender, FileOptions};
pub use config::{ConfigSpec, Properties};
pub use core::{
    Appender, Configuration, FormatStyle, LevelConfig, LevelFilter, LogArg, LogEvent, LogLevel,
    Logger, LoggerContext, LoggerError, LoggerMetrics, Result, StatusEvent, StatusReporter,
    ThrowableInfo, TimestampFormat,
};
pub use layouts::{JsonLayout, Layout, PatternLayout};
