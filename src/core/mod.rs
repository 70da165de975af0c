//! Core logger types and traits

pub mod appender;
pub mod configuration;
pub mod context;
pub mod error;
pub mod level_config;
pub mod log_arg;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod printf;
mod registry;
pub mod status;
pub mod throwable;
pub mod timestamp;

pub use appender::Appender;
pub use configuration::Configuration;
pub use context::LoggerContext;
pub use error::{LoggerError, Result};
pub use level_config::LevelConfig;
pub use log_arg::LogArg;
pub use log_event::LogEvent;
pub use log_level::{LevelFilter, LogLevel};
pub use logger::Logger;
pub use message::{format_brace, format_message, FormatStyle, FormattedMessage};
pub use metrics::LoggerMetrics;
pub use printf::sprintf;
pub use status::{StatusEvent, StatusReporter, STATUS_CHANNEL_CAPACITY};
pub use throwable::ThrowableInfo;
pub use timestamp::TimestampFormat;
