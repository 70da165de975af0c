//! Writer state shared by the stream-backed appenders
//!
//! Retries transient write failures with a short back-off, then moves the
//! sink into the failed state. The transition is reported once on the status
//! channel; afterwards writes are dropped without further noise.

use crate::core::{LoggerError, Result, StatusReporter};
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const MAX_WRITE_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(1);

enum SinkState<W> {
    Open(W),
    Failed,
    Closed,
}

pub(crate) struct SinkWriter<W: Write> {
    name: String,
    /// Status source, e.g. `appender 'file'`
    owner: String,
    state: SinkState<W>,
    immediate_flush: bool,
    reporter: Option<Arc<StatusReporter>>,
}

impl<W: Write> SinkWriter<W> {
    pub(crate) fn open(name: impl Into<String>, writer: W, immediate_flush: bool) -> Self {
        let name = name.into();
        Self {
            owner: format!("appender '{}'", name),
            name,
            state: SinkState::Open(writer),
            immediate_flush,
            reporter: None,
        }
    }

    pub(crate) fn failed(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            owner: format!("appender '{}'", name),
            name,
            state: SinkState::Failed,
            immediate_flush: true,
            reporter: None,
        }
    }

    pub(crate) fn set_reporter(&mut self, reporter: Arc<StatusReporter>) {
        self.reporter = Some(reporter);
    }

    pub(crate) fn is_failed(&self) -> bool {
        matches!(self.state, SinkState::Failed)
    }

    pub(crate) fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let writer = match self.state {
            SinkState::Open(ref mut writer) => writer,
            SinkState::Failed => return Err(LoggerError::appender_failed(&self.name)),
            SinkState::Closed => return Err(LoggerError::appender_closed(&self.name)),
        };

        let mut written = false;
        let mut attempt = 0;
        let failure = loop {
            let result = if written {
                Ok(())
            } else {
                writer.write_all(bytes)
            };
            let result = result.and_then(|()| {
                written = true;
                if self.immediate_flush {
                    writer.flush()
                } else {
                    Ok(())
                }
            });

            match result {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    if attempt >= MAX_WRITE_ATTEMPTS {
                        break e;
                    }
                    thread::sleep(RETRY_BACKOFF * attempt);
                }
            }
        };

        let err = LoggerError::io_operation(format!("writing to {}", self.owner), &failure);
        self.fail(&err);
        Err(err)
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        let SinkState::Open(ref mut writer) = self.state else {
            return Ok(());
        };
        if let Err(e) = writer.flush() {
            let err = LoggerError::io_operation(format!("flushing {}", self.owner), &e);
            self.fail(&err);
            return Err(err);
        }
        Ok(())
    }

    pub(crate) fn close(&mut self) {
        let _ = self.flush();
        if !self.is_failed() {
            self.state = SinkState::Closed;
        }
    }

    /// Enter the failed state, reporting the cause.
    pub(crate) fn fail(&mut self, cause: &LoggerError) {
        self.state = SinkState::Failed;
        let message = format!("{}; further events will be dropped", cause);
        match self.reporter {
            Some(ref reporter) => reporter.error(&self.owner, message),
            None => eprintln!("[LOGGER ERROR] {}: {}", self.owner, message),
        }
    }
}
