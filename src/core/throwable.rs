//! Error information attached to a log event
//!
//! The bridge never holds on to the caller's error value; it captures the
//! kind, message and cause chain at call time so events stay `Send` and
//! immutable.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowableInfo {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ThrowableInfo>>,
}

impl ThrowableInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            cause: None,
        }
    }

    #[must_use]
    pub fn with_cause(mut self, cause: ThrowableInfo) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Capture a Rust error, using its type name as the kind and walking
    /// `source()` for the cause chain.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: StdError + 'static,
    {
        let mut info = Self::new(std::any::type_name::<E>(), error.to_string());
        info.cause = error.source().map(|source| Box::new(Self::from_source(source)));
        info
    }

    fn from_source(error: &(dyn StdError + 'static)) -> Self {
        let mut info = Self::new(kind_of(error), error.to_string());
        info.cause = error.source().map(|source| Box::new(Self::from_source(source)));
        info
    }

    /// Iterate this error and its causes, outermost first.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// One `"<kind>: <message>"` line per chain entry.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.chain().map(|entry| entry.to_string())
    }
}

impl fmt::Display for ThrowableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

pub struct Chain<'a> {
    next: Option<&'a ThrowableInfo>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a ThrowableInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause.as_deref();
        Some(current)
    }
}

/// Best-effort kind name for an erased source error.
fn kind_of(error: &(dyn StdError + 'static)) -> &'static str {
    if error.is::<std::io::Error>() {
        std::any::type_name::<std::io::Error>()
    } else if error.is::<std::fmt::Error>() {
        std::any::type_name::<std::fmt::Error>()
    } else if error.is::<std::num::ParseIntError>() {
        std::any::type_name::<std::num::ParseIntError>()
    } else if error.is::<std::num::ParseFloatError>() {
        std::any::type_name::<std::num::ParseFloatError>()
    } else if error.is::<std::str::Utf8Error>() {
        std::any::type_name::<std::str::Utf8Error>()
    } else if error.is::<std::string::FromUtf8Error>() {
        std::any::type_name::<std::string::FromUtf8Error>()
    } else {
        "dyn core::error::Error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Wrapper {
        inner: std::io::Error,
    }

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "wrapped")
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.inner)
        }
    }

    #[test]
    fn test_display() {
        let info = ThrowableInfo::new("java.lang.Exception", "Hello");
        assert_eq!(info.to_string(), "java.lang.Exception: Hello");
        assert_eq!(ThrowableInfo::new("Panic", "").to_string(), "Panic");
    }

    #[test]
    fn test_chain_order() {
        let info = ThrowableInfo::new("Outer", "a")
            .with_cause(ThrowableInfo::new("Middle", "b").with_cause(ThrowableInfo::new("Inner", "c")));

        let lines: Vec<String> = info.lines().collect();
        assert_eq!(lines, vec!["Outer: a", "Middle: b", "Inner: c"]);
    }

    #[test]
    fn test_from_error_walks_sources() {
        let err = Wrapper {
            inner: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let info = ThrowableInfo::from_error(&err);

        assert!(info.kind.ends_with("Wrapper"));
        assert_eq!(info.message, "wrapped");
        let cause = info.cause.as_deref().expect("cause captured");
        assert!(cause.kind.contains("io"));
        assert_eq!(cause.message, "missing");
    }
}
