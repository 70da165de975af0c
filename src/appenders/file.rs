//! File appender implementation

use super::sink::SinkWriter;
use crate::core::{Appender, LevelFilter, LogEvent, LogLevel, LoggerError, Result, StatusReporter};
use crate::layouts::Layout;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOptions {
    /// Append to an existing file instead of truncating it
    pub append: bool,
    /// Flush after every event
    pub immediate_flush: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            append: true,
            immediate_flush: true,
        }
    }
}

pub struct FileAppender {
    name: String,
    path: PathBuf,
    layout: Layout,
    threshold: LevelFilter,
    sink: Mutex<SinkWriter<BufWriter<File>>>,
}

impl FileAppender {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(name, path, FileOptions::default())
    }

    /// Open the file, creating missing parent directories.
    pub fn open(name: impl Into<String>, path: impl Into<PathBuf>, options: FileOptions) -> Result<Self> {
        let name = name.into();
        let path = path.into();
        let file = open_file(&path, options.append)?;

        Ok(Self {
            sink: Mutex::new(SinkWriter::open(
                name.clone(),
                BufWriter::new(file),
                options.immediate_flush,
            )),
            name,
            path,
            layout: Layout::default(),
            threshold: LevelFilter::Level(LogLevel::Trace),
        })
    }

    /// An appender whose sink could not be opened; it drops every event.
    pub fn failed(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            sink: Mutex::new(SinkWriter::failed(name.clone())),
            name,
            path: path.into(),
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

    /// Route sink failures to a status channel instead of stderr.
    #[must_use]
    pub fn with_reporter(self, reporter: Arc<StatusReporter>) -> Self {
        self.sink.lock().set_reporter(reporter);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

fn open_file(path: &Path, append: bool) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), e.to_string())
            })?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options
        .open(path)
        .map_err(|e| LoggerError::file_appender(path.display().to_string(), e.to_string()))
}

impl Appender for FileAppender {
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

    fn close(&self) {
        self.sink.lock().close();
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.sink.get_mut().flush();
    }
}
