//! Error types for the logging bridge

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation { operation: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A root or category logger refers to an appender that is not defined
    #[error("{logger} refers to undefined appender '{appender}'")]
    UnknownAppenderRef { logger: String, appender: String },

    /// Appender or layout type the engine cannot build
    #[error("Unsupported {component} type '{type_name}'")]
    UnsupportedType { component: String, type_name: String },

    /// Unparsable level value
    #[error("Invalid level '{value}' for {key}")]
    InvalidLevel { key: String, value: String },

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// Appender is in the failed state and drops events
    #[error("Appender '{name}' has failed and is dropping events")]
    AppenderFailed { name: String },

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },

    /// Appender was closed by shutdown while a call was in flight
    #[error("Appender '{name}' is closed")]
    AppenderClosed { name: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: &std::io::Error) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unknown_appender_ref(logger: impl Into<String>, appender: impl Into<String>) -> Self {
        LoggerError::UnknownAppenderRef {
            logger: logger.into(),
            appender: appender.into(),
        }
    }

    pub fn unsupported_type(component: impl Into<String>, type_name: impl Into<String>) -> Self {
        LoggerError::UnsupportedType {
            component: component.into(),
            type_name: type_name.into(),
        }
    }

    pub fn invalid_level(key: impl Into<String>, value: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn appender_failed(name: impl Into<String>) -> Self {
        LoggerError::AppenderFailed { name: name.into() }
    }

    pub fn appender_closed(name: impl Into<String>) -> Self {
        LoggerError::AppenderClosed { name: name.into() }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }


    /// Whether this error rejects a configuration snapshot.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidConfiguration { .. }
                | LoggerError::UnknownAppenderRef { .. }
                | LoggerError::UnsupportedType { .. }
                | LoggerError::InvalidLevel { .. }
        )
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(e: std::io::Error) -> Self {
        LoggerError::IoOperation {
            operation: "performing I/O".to_string(),
            message: e.to_string(),
        }
    }
}
