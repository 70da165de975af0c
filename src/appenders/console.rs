//! Console appender implementation

use super::sink::SinkWriter;
use crate::core::{Appender, LevelFilter, LogEvent, LogLevel, Result, StatusReporter};
use crate::layouts::Layout;
use parking_lot::Mutex;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

impl FromStr for ConsoleTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SYSTEM_OUT" | "STDOUT" => Ok(ConsoleTarget::Stdout),
            "SYSTEM_ERR" | "STDERR" => Ok(ConsoleTarget::Stderr),
            _ => Err(format!("Invalid console target: '{}'", s)),
        }
    }
}

pub struct ConsoleAppender {
    name: String,
    target: ConsoleTarget,
    layout: Layout,
    threshold: LevelFilter,
    sink: Mutex<SinkWriter<Box<dyn Write + Send>>>,
}

impl ConsoleAppender {
    pub fn new(name: impl Into<String>, target: ConsoleTarget) -> Self {
        let writer: Box<dyn Write + Send> = match target {
            ConsoleTarget::Stdout => Box::new(std::io::stdout()),
            ConsoleTarget::Stderr => Box::new(std::io::stderr()),
        };
        Self::with_writer(name, target, writer)
    }

    /// Console appender writing to an arbitrary stream (useful for capture).
    pub fn with_writer(
        name: impl Into<String>,
        target: ConsoleTarget,
        writer: Box<dyn Write + Send>,
    ) -> Self {
        let name = name.into();
        Self {
            sink: Mutex::new(SinkWriter::open(name.clone(), writer, true)),
            name,
            target,
            layout: Layout::default(),
            threshold: LevelFilter::Level(LogLevel::Trace),
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: impl Into<Layout>) -> Self {
        self.layout = layout.into();
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: LevelFilter) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_reporter(self, reporter: Arc<StatusReporter>) -> Self {
        self.sink.lock().set_reporter(reporter);
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, event: &LogEvent) -> Result<()> {
        let output = self.layout.format(event);
        self.sink.lock().write_all(output.as_bytes())
    }

    fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn threshold(&self) -> LevelFilter {
        self.threshold
    }

    fn is_failed(&self) -> bool {
        self.sink.lock().is_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layouts::PatternLayout;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_target_parse() {
        assert_eq!("SYSTEM_OUT".parse::<ConsoleTarget>(), Ok(ConsoleTarget::Stdout));
        assert_eq!("system_err".parse::<ConsoleTarget>(), Ok(ConsoleTarget::Stderr));
        assert!("SYSTEM_NULL".parse::<ConsoleTarget>().is_err());
    }

    #[test]
    fn test_writes_through_layout() {
        let capture = Capture::default();
        let appender = ConsoleAppender::with_writer(
            "console",
            ConsoleTarget::Stdout,
            Box::new(capture.clone()),
        )
        .with_layout(PatternLayout::new("[%p] %m%n"));

        appender
            .append(&LogEvent::new("a", LogLevel::Warn, "watch out"))
            .expect("append");

        let written = String::from_utf8(capture.0.lock().clone()).expect("utf8");
        assert_eq!(written, "[WARN] watch out\n");
        assert_eq!(appender.name(), "console");
    }
}
