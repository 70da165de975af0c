//! JSON layout: one JSON object per line

use crate::core::{LogEvent, TimestampFormat};

#[derive(Debug, Clone, PartialEq)]
pub struct JsonLayout {
    timestamp_format: TimestampFormat,
}

impl JsonLayout {
    pub fn new() -> Self {
        Self {
            timestamp_format: TimestampFormat::Iso8601Micros,
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn format(&self, event: &LogEvent) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert("timestamp".to_string(), self.format_timestamp(event));
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(event.level.to_str().to_string()),
        );
        json_obj.insert(
            "loggerName".to_string(),
            serde_json::Value::String(event.category.clone()),
        );
        json_obj.insert(
            "thread".to_string(),
            serde_json::Value::String(event.thread().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(event.message.clone()),
        );

        if let Some(ref throwable) = event.throwable {
            if let Ok(thrown) = serde_json::to_value(throwable) {
                json_obj.insert("thrown".to_string(), thrown);
            }
        }

        let mut line = serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default();
        line.push('\n');
        line
    }

    fn format_timestamp(&self, event: &LogEvent) -> serde_json::Value {
        match self.timestamp_format {
            TimestampFormat::Unix => serde_json::Value::Number(event.timestamp.timestamp().into()),
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(event.timestamp.timestamp_millis().into())
            }
            ref other => serde_json::Value::String(other.format(&event.timestamp)),
        }
    }
}

impl Default for JsonLayout {
    fn default() -> Self {
        Self::new()
    }
}
