//! Logger context: configuration engine and dispatch
//!
//! A [`LoggerContext`] owns the published [`Configuration`] snapshot, the
//! logger registry, metrics and the status channel. Reconfiguration builds a
//! complete new snapshot off to the side and swaps it in atomically, so a log
//! call sees either the old or the new configuration, never a mix.

use super::configuration::Configuration;
use super::log_arg::{split_throwable, LogArg};
use super::log_event::LogEvent;
use super::log_level::{LevelFilter, LogLevel};
use super::logger::Logger;
use super::message::{format_message, FormatStyle};
use super::metrics::LoggerMetrics;
use super::registry::LoggerRegistry;
use super::status::{StatusEvent, StatusReporter};
use super::appender::Appender;
use super::error::LoggerError;
use super::Result;
use crate::config::{ConfigSpec, Properties};
use arc_swap::ArcSwap;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<LoggerContext> = OnceLock::new();

/// State shared between a context and every logger handle it produced.
pub(crate) struct ContextShared {
    config: ArcSwap<Configuration>,
    metrics: LoggerMetrics,
    status: Arc<StatusReporter>,
    /// Serialises snapshot installation
    apply_lock: Mutex<()>,
    generation: AtomicU64,
}

impl ContextShared {
    pub(crate) fn new() -> Self {
        let status = Arc::new(StatusReporter::new());
        let config = Configuration::build(&ConfigSpec::default_console(), 0, &status);
        Self {
            config: ArcSwap::from_pointee(config),
            metrics: LoggerMetrics::new(),
            status,
            apply_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        self.config.load().is_enabled(category, level)
    }

    /// Build and publish a snapshot for `spec`; returns its generation and
    /// the snapshot it replaced.
    fn install(&self, spec: &ConfigSpec) -> (u64, Arc<Configuration>) {
        let _guard = self.apply_lock.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.status
            .set_echo_threshold(spec.status.unwrap_or(LevelFilter::Level(LogLevel::Error)));
        let config = Configuration::build(spec, generation, &self.status);
        let previous = self.config.swap(Arc::new(config));
        self.metrics.record_reload();
        (generation, previous)
    }

    /// Filter, render and deliver one call.
    pub(crate) fn log(
        &self,
        category: &str,
        level: LogLevel,
        style: FormatStyle,
        template: &str,
        args: &[LogArg],
    ) {
        let config = self.config.load();
        if !config.is_enabled(category, level) {
            self.metrics.record_filtered();
            return;
        }

        // Appenders whose own threshold rejects the level never see the
        // call, so it is not rendered for them either
        let targets: Vec<&Arc<dyn Appender>> = config
            .route(category)
            .iter()
            .filter(|appender| appender.threshold().enables(level))
            .collect();
        if targets.is_empty() {
            return;
        }

        let message = format_message(style, template, args);
        self.metrics.record_formatted();
        if let Some(ref e) = message.error {
            self.status.warn(
                format!("logger '{}'", category),
                format!("{}; template logged as is", e),
            );
        }

        let (plain_args, _) = split_throwable(args);
        let event = LogEvent::new(category, level, message.text)
            .with_args(plain_args.to_vec())
            .with_throwable(message.throwable);

        let mut delivered = false;
        let mut dropped = false;
        for appender in targets {
            // One misbehaving appender must not starve the others
            let result = panic::catch_unwind(AssertUnwindSafe(|| appender.append(&event)));
            match result {
                Ok(Ok(())) => delivered = true,
                // Released by shutdown while this call was in flight
                Ok(Err(LoggerError::AppenderClosed { .. })) => dropped = true,
                Ok(Err(e)) => {
                    dropped = true;
                    // Failed sinks have already reported the transition
                    if !appender.is_failed() {
                        self.status
                            .error(format!("appender '{}'", appender.name()), e.to_string());
                    }
                }
                Err(payload) => {
                    dropped = true;
                    self.status.report(
                        LogLevel::Fatal,
                        format!("appender '{}'", appender.name()),
                        format!(
                            "panicked: {}. Other appenders continue to function.",
                            panic_message(payload.as_ref())
                        ),
                    );
                }
            }
        }

        if delivered {
            self.metrics.record_logged();
        }
        if dropped {
            self.metrics.record_dropped();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Entry point for acquiring loggers and (re)configuring output.
///
/// # Example
///
/// ```
/// use log_bridge::{LoggerContext, Properties};
///
/// let context = LoggerContext::new();
/// context
///     .apply(&Properties::new().with("rootLogger.level", "off"))
///     .expect("valid configuration");
///
/// let logger = context.get_logger("app.startup");
/// assert!(!logger.is_error_enabled());
/// logger.info("ignored {}", &["argument".into()]);
/// ```
pub struct LoggerContext {
    shared: Arc<ContextShared>,
    registry: LoggerRegistry,
}

impl LoggerContext {
    /// Context running the built-in console configuration.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(ContextShared::new()),
            registry: LoggerRegistry::new(),
        }
    }

    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let context = Self::new();
        context.apply(properties)?;
        Ok(context)
    }

    /// Process-wide context, created on first use.
    pub fn global() -> &'static LoggerContext {
        GLOBAL.get_or_init(LoggerContext::new)
    }

    /// Validate `properties` and install them as the new configuration.
    ///
    /// On error nothing changes: the previous snapshot stays live and a
    /// status event describes the rejection.
    pub fn apply(&self, properties: &Properties) -> Result<()> {
        let spec = match ConfigSpec::from_properties(properties) {
            Ok(spec) => spec,
            Err(e) => {
                self.shared.metrics.record_rejected_config();
                self.shared.status.error(
                    "configuration",
                    format!(
                        "rejected ({}); generation {} stays active",
                        e,
                        self.generation()
                    ),
                );
                return Err(e);
            }
        };
        self.apply_spec(&spec);
        Ok(())
    }

    /// Install an already validated configuration; returns its generation.
    pub fn apply_spec(&self, spec: &ConfigSpec) -> u64 {
        let (generation, previous) = self.shared.install(spec);
        // The superseded sinks close once the last in-flight call lets go
        previous.flush(&self.shared.status);
        generation
    }

    /// Reinstall the built-in console configuration.
    pub fn reset(&self) {
        self.apply_spec(&ConfigSpec::default_console());
    }

    /// Disable all logging and release every sink.
    pub fn shutdown(&self) {
        let (_, previous) = self.shared.install(&ConfigSpec::disabled());
        previous.flush(&self.shared.status);
        previous.close();
    }

    /// Flush every appender of the live configuration.
    pub fn flush(&self) {
        self.shared.config.load().flush(&self.shared.status);
    }

    /// The currently published snapshot.
    pub fn configuration(&self) -> Arc<Configuration> {
        self.shared.config.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.shared.config.load().generation()
    }

    pub fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        self.shared.is_enabled(category, level)
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Receiver for internal diagnostics (sink failures, rejected
    /// configurations, formatting fallbacks).
    pub fn status_events(&self) -> Receiver<StatusEvent> {
        self.shared.status.subscribe()
    }

    pub fn status(&self) -> &StatusReporter {
        &self.shared.status
    }

    /// Brace-style logger for `name`.
    pub fn get_logger(&self, name: &str) -> Logger {
        self.get_logger_with_style(name, FormatStyle::Brace)
    }

    /// printf-style logger for `name`.
    pub fn get_formatter_logger(&self, name: &str) -> Logger {
        self.get_logger_with_style(name, FormatStyle::Printf)
    }

    /// Handle for `name` rendering messages in `style`. Handles for the same
    /// name share one registry entry whatever their style.
    pub fn get_logger_with_style(&self, name: &str, style: FormatStyle) -> Logger {
        Logger::new(self.registry.get_or_create(name, &self.shared), style)
    }

    /// Names of every logger acquired so far, sorted.
    pub fn logger_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn logger_count(&self) -> usize {
        self.registry.len()
    }

    pub fn has_logger(&self, name: &str) -> bool {
        self.registry.contains(name)
    }
}

impl Default for LoggerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerContext")
            .field("generation", &self.generation())
            .field("loggers", &self.registry.len())
            .finish()
    }
}
