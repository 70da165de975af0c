//! Appender implementations

pub mod console;
pub mod file;
mod sink;

pub use console::{ConsoleAppender, ConsoleTarget};
pub use file::{FileAppender, FileOptions};
pub use sink::MAX_WRITE_ATTEMPTS;

pub use crate::core::Appender;
