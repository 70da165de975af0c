//! Timestamp formatting for the `%d` pattern converter
//!
//! Named formats follow the names layout authors already use (`DEFAULT`,
//! `ISO8601`, `ABSOLUTE`, `UNIX`, `UNIX_MILLIS`); anything else is taken as
//! a chrono strftime string.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45,123`
    #[default]
    Default,

    /// `2025-01-08T10:30:45,123`
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `10:30:45,123`
    Absolute,

    /// `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Validated strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Resolve a `%d{...}` option. Returns `None` for an invalid strftime
    /// string so the caller can fall back to emitting the option literally.
    pub fn from_option(option: &str) -> Option<Self> {
        let named = match option.trim().to_uppercase().as_str() {
            "" | "DEFAULT" => Some(TimestampFormat::Default),
            "ISO8601" => Some(TimestampFormat::Iso8601),
            "ISO8601_MICROS" => Some(TimestampFormat::Iso8601Micros),
            "ABSOLUTE" => Some(TimestampFormat::Absolute),
            "RFC3339" => Some(TimestampFormat::Rfc3339),
            "UNIX" => Some(TimestampFormat::Unix),
            "UNIX_MILLIS" => Some(TimestampFormat::UnixMillis),
            _ => None,
        };
        if named.is_some() {
            return named;
        }

        let valid = StrftimeItems::new(option).all(|item| !matches!(item, Item::Error));
        valid.then(|| TimestampFormat::Custom(option.to_string()))
    }

    /// Append the formatted timestamp to `out`.
    pub fn write_to(&self, out: &mut String, datetime: &DateTime<Utc>) {
        let _ = match self {
            TimestampFormat::Default => {
                write!(out, "{}", datetime.format("%Y-%m-%d %H:%M:%S,%3f"))
            }
            TimestampFormat::Iso8601 => {
                write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S,%3f"))
            }
            TimestampFormat::Iso8601Micros => {
                write!(out, "{}", datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ"))
            }
            TimestampFormat::Absolute => write!(out, "{}", datetime.format("%H:%M:%S,%3f")),
            TimestampFormat::Rfc3339 => write!(out, "{}", datetime.to_rfc3339()),
            TimestampFormat::Unix => write!(out, "{}", datetime.timestamp()),
            TimestampFormat::UnixMillis => write!(out, "{}", datetime.timestamp_millis()),
            TimestampFormat::Custom(format_str) => write!(out, "{}", datetime.format(format_str)),
        };
    }

    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        let mut out = String::with_capacity(32);
        self.write_to(&mut out, datetime);
        out
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::Unix | TimestampFormat::UnixMillis)
    }
}
