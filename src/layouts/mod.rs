//! Layouts turn a log event into the text an appender writes

pub mod json;
pub mod pattern;

pub use json::JsonLayout;
pub use pattern::{PatternLayout, DEFAULT_PATTERN};

use crate::core::LogEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Pattern(PatternLayout),
    Json(JsonLayout),
}

impl Layout {
    pub fn format(&self, event: &LogEvent) -> String {
        match self {
            Layout::Pattern(layout) => layout.format(event),
            Layout::Json(layout) => layout.format(event),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layout::Pattern(_) => "PatternLayout",
            Layout::Json(_) => "JsonLayout",
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Pattern(PatternLayout::default())
    }
}

impl From<PatternLayout> for Layout {
    fn from(layout: PatternLayout) -> Self {
        Layout::Pattern(layout)
    }
}

impl From<JsonLayout> for Layout {
    fn from(layout: JsonLayout) -> Self {
        Layout::Json(layout)
    }
}
