//! Substitution arguments for logger calls
//!
//! `LogArg` is what a caller passes after the message template. A trailing
//! `Throwable` is never substituted; it becomes the event's attached error.

use super::throwable::ThrowableInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type for message arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogArg {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Null,
    Throwable(ThrowableInfo),
}

impl fmt::Display for LogArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogArg::Str(s) => write!(f, "{}", s),
            LogArg::Int(i) => write!(f, "{}", i),
            LogArg::UInt(u) => write!(f, "{}", u),
            LogArg::Float(fl) => write!(f, "{}", fl),
            LogArg::Bool(b) => write!(f, "{}", b),
            LogArg::Char(c) => write!(f, "{}", c),
            LogArg::Null => write!(f, "null"),
            LogArg::Throwable(t) => write!(f, "{}", t),
        }
    }
}

impl LogArg {
    /// Capture anything printable as a string argument.
    pub fn display(value: impl fmt::Display) -> Self {
        LogArg::Str(value.to_string())
    }

    /// Capture a Rust error as an attached error.
    pub fn error<E>(error: &E) -> Self
    where
        E: std::error::Error + 'static,
    {
        LogArg::Throwable(ThrowableInfo::from_error(error))
    }

    pub fn is_throwable(&self) -> bool {
        matches!(self, LogArg::Throwable(_))
    }
}

/// Split a trailing error off an argument list.
pub(crate) fn split_throwable(args: &[LogArg]) -> (&[LogArg], Option<&ThrowableInfo>) {
    match args.split_last() {
        Some((LogArg::Throwable(t), rest)) => (rest, Some(t)),
        _ => (args, None),
    }
}

impl From<String> for LogArg {
    fn from(s: String) -> Self {
        LogArg::Str(s)
    }
}

impl From<&str> for LogArg {
    fn from(s: &str) -> Self {
        LogArg::Str(s.to_string())
    }
}

impl From<&String> for LogArg {
    fn from(s: &String) -> Self {
        LogArg::Str(s.clone())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for LogArg {
            fn from(i: $t) -> Self {
                LogArg::Int(i as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for LogArg {
            fn from(u: $t) -> Self {
                LogArg::UInt(u as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for LogArg {
    fn from(f: f32) -> Self {
        LogArg::Float(f as f64)
    }
}

impl From<f64> for LogArg {
    fn from(f: f64) -> Self {
        LogArg::Float(f)
    }
}

impl From<bool> for LogArg {
    fn from(b: bool) -> Self {
        LogArg::Bool(b)
    }
}

impl From<char> for LogArg {
    fn from(c: char) -> Self {
        LogArg::Char(c)
    }
}

impl From<ThrowableInfo> for LogArg {
    fn from(t: ThrowableInfo) -> Self {
        LogArg::Throwable(t)
    }
}

impl<T: Into<LogArg>> From<Option<T>> for LogArg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LogArg::Null)
    }
}
