//! Immutable configuration snapshot
//!
//! A [`Configuration`] is built once from a validated [`ConfigSpec`] and
//! never changes afterwards. The engine publishes it atomically; callers that
//! loaded it keep a consistent view (levels, routes, layouts) for the whole
//! call even if a newer snapshot is installed meanwhile.

use super::appender::Appender;
use super::level_config::{hierarchy, LevelConfig};
use super::log_level::LogLevel;
use super::status::StatusReporter;
use crate::config::{ConfigSpec, LoggerSpec};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub struct Configuration {
    generation: u64,
    levels: LevelConfig,
    appenders: Vec<Arc<dyn Appender>>,
    root_route: Vec<Arc<dyn Appender>>,
    /// Effective appender list per configured category, additivity applied.
    routes: HashMap<String, Vec<Arc<dyn Appender>>>,
}

impl Configuration {
    /// Open every appender of `spec` and resolve category routes.
    pub fn build(spec: &ConfigSpec, generation: u64, reporter: &Arc<StatusReporter>) -> Self {
        let appenders: Vec<Arc<dyn Appender>> = spec
            .appenders
            .iter()
            .map(|appender| appender.build(reporter))
            .collect();

        let by_name: HashMap<&str, &Arc<dyn Appender>> =
            appenders.iter().map(|a| (a.name(), a)).collect();
        let resolve = |refs: &[String]| -> Vec<Arc<dyn Appender>> {
            refs.iter()
                .filter_map(|r| by_name.get(r.as_str()).map(|a| Arc::clone(*a)))
                .collect()
        };

        let root_route = resolve(&spec.root.appender_refs);

        let by_category: HashMap<&str, &LoggerSpec> = spec
            .loggers
            .iter()
            .map(|logger| (logger.category.as_str(), logger))
            .collect();
        let configured_parent = |category: &str| {
            hierarchy(category)
                .skip(1)
                .find_map(|name| by_category.get(name).copied())
        };

        let mut routes = HashMap::with_capacity(spec.loggers.len());
        for logger in &spec.loggers {
            let mut route = resolve(&logger.appender_refs);
            let mut current = logger;
            while current.additive {
                match configured_parent(current.category.as_str()) {
                    Some(parent) => {
                        route.extend(resolve(&parent.appender_refs));
                        current = parent;
                    }
                    None => {
                        route.extend(root_route.iter().cloned());
                        break;
                    }
                }
            }
            routes.insert(logger.category.clone(), route);
        }

        Self {
            generation,
            levels: spec.level_config(),
            appenders,
            root_route,
            routes,
        }
    }

    /// Snapshot routing every category to `appenders`.
    #[cfg(test)]
    pub(crate) fn with_root(
        generation: u64,
        levels: LevelConfig,
        appenders: Vec<Arc<dyn Appender>>,
    ) -> Self {
        Self {
            generation,
            levels,
            root_route: appenders.clone(),
            appenders,
            routes: HashMap::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn levels(&self) -> &LevelConfig {
        &self.levels
    }

    #[inline]
    pub fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        self.levels.is_enabled(category, level)
    }

    /// Appenders an event of `category` is delivered to: the route of the
    /// nearest configured category, or the root's.
    pub fn route(&self, category: &str) -> &[Arc<dyn Appender>] {
        if self.routes.is_empty() {
            return &self.root_route;
        }
        hierarchy(category)
            .find_map(|name| self.routes.get(name))
            .unwrap_or(&self.root_route)
    }

    pub fn appender(&self, name: &str) -> Option<&Arc<dyn Appender>> {
        self.appenders.iter().find(|a| a.name() == name)
    }

    pub fn appenders(&self) -> &[Arc<dyn Appender>] {
        &self.appenders
    }

    /// Flush every appender, reporting failures on the status channel.
    pub fn flush(&self, reporter: &StatusReporter) {
        for appender in &self.appenders {
            if let Err(e) = appender.flush() {
                reporter.warn(format!("appender '{}'", appender.name()), e.to_string());
            }
        }
    }

    /// Flush and release every sink.
    pub fn close(&self) {
        for appender in &self.appenders {
            appender.close();
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("generation", &self.generation)
            .field("levels", &self.levels)
            .field(
                "appenders",
                &self.appenders.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Properties;
    use crate::core::{LevelFilter, LogEvent};

    fn reporter() -> Arc<StatusReporter> {
        let reporter = StatusReporter::new();
        reporter.set_echo_threshold(LevelFilter::Off);
        Arc::new(reporter)
    }

    fn names(route: &[Arc<dyn Appender>]) -> Vec<&str> {
        route.iter().map(|a| a.name()).collect()
    }

    fn consoles(extra: &[(&str, &str)]) -> ConfigSpec {
        let mut props: Properties = [
            ("appender.a.type", "Console"),
            ("appender.b.type", "Console"),
            ("appender.c.type", "Console"),
        ]
        .into_iter()
        .collect();
        for (k, v) in extra {
            props.insert(*k, *v);
        }
        ConfigSpec::from_properties(&props).expect("valid configuration")
    }

    #[test]
    fn test_additive_routes() {
        let spec = consoles(&[
            ("rootLogger", "info, a"),
            ("logger.app.name", "app"),
            ("logger.app.appenderRef.r.ref", "b"),
            ("logger.db.name", "app.db"),
            ("logger.db.appenderRef.r.ref", "c"),
        ]);
        let config = Configuration::build(&spec, 1, &reporter());

        assert_eq!(names(config.route("app.db.pool")), vec!["c", "b", "a"]);
        assert_eq!(names(config.route("app.web")), vec!["b", "a"]);
        assert_eq!(names(config.route("other")), vec!["a"]);
    }

    #[test]
    fn test_non_additive_stops_propagation() {
        let spec = consoles(&[
            ("rootLogger", "info, a"),
            ("logger.app.name", "app"),
            ("logger.app.additivity", "false"),
            ("logger.app.appenderRef.r.ref", "b"),
            ("logger.db.name", "app.db"),
            ("logger.db.appenderRef.r.ref", "c"),
        ]);
        let config = Configuration::build(&spec, 1, &reporter());

        assert_eq!(names(config.route("app.db")), vec!["c", "b"]);
        assert_eq!(names(config.route("app")), vec!["b"]);
    }

    #[test]
    fn test_levels_follow_spec() {
        let spec = consoles(&[("rootLogger.level", "warn"), ("logger.x", "debug"), ("logger.x.name", "x")]);
        let config = Configuration::build(&spec, 7, &reporter());

        assert_eq!(config.generation(), 7);
        assert!(config.is_enabled("x.y", LogLevel::Debug));
        assert!(!config.is_enabled("y", LogLevel::Info));
        assert_eq!(config.levels().root(), LevelFilter::Level(LogLevel::Warn));
    }

    #[test]
    fn test_disabled_configuration() {
        let config = Configuration::build(&ConfigSpec::disabled(), 3, &Arc::new(StatusReporter::new()));
        assert_eq!(config.generation(), 3);
        assert!(config.route("anything").is_empty());
        assert!(!config.is_enabled("anything", LogLevel::Fatal));
    }

    #[test]
    fn test_unopenable_file_yields_failed_appender() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, "").expect("create blocker");

        let props: Properties = [
            ("appender.f.type", "File".to_string()),
            ("appender.f.fileName", blocker.join("x.log").display().to_string()),
            ("rootLogger", "info, f".to_string()),
        ]
        .into_iter()
        .collect();
        let spec = ConfigSpec::from_properties(&props).expect("valid configuration");

        let reporter = reporter();
        let status = reporter.subscribe();
        let config = Configuration::build(&spec, 1, &reporter);

        let appender = config.appender("f").expect("appender present");
        assert!(appender.is_failed());
        assert!(appender.append(&LogEvent::new("a", LogLevel::Info, "m")).is_err());
        assert_eq!(status.try_iter().count(), 1);
    }

    #[test]
    fn test_flush_reports_nothing_when_healthy() {
        let reporter = reporter();
        let status = reporter.subscribe();
        let config = Configuration::build(&consoles(&[]), 1, &reporter);
        config.flush(&reporter);
        assert_eq!(status.try_iter().count(), 0);
    }
}
