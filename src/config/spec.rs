//! Validated configuration
//!
//! [`ConfigSpec::from_properties`] turns a flat key/value map into a typed
//! description of appenders, root logger and category loggers. Parsing is
//! all-or-nothing: the first violation (in key order) is returned and the
//! caller keeps whatever configuration it had before.

use super::properties::Properties;
use crate::appenders::{ConsoleAppender, ConsoleTarget, FileAppender, FileOptions};
use crate::core::{Appender, LevelConfig, LevelFilter, LogLevel, LoggerError, Result, StatusReporter};
use crate::layouts::{JsonLayout, Layout, PatternLayout, DEFAULT_PATTERN};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

/// Console pattern of the built-in configuration.
pub const DEFAULT_CONSOLE_PATTERN: &str = "%d{%H:%M:%S%.3f} [%t] %-5p %c - %m%n";

/// Root level when `rootLogger.level` is absent.
pub const DEFAULT_ROOT_LEVEL: LogLevel = LogLevel::Error;

const ROOT_LOGGER: &str = "root logger";

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSpec {
    Pattern(String),
    Json,
}

impl LayoutSpec {
    pub fn build(&self) -> Layout {
        match self {
            LayoutSpec::Pattern(pattern) => PatternLayout::new(pattern.as_str()).into(),
            LayoutSpec::Json => JsonLayout::new().into(),
        }
    }
}

impl Default for LayoutSpec {
    fn default() -> Self {
        LayoutSpec::Pattern(DEFAULT_PATTERN.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppenderKind {
    File { path: PathBuf, options: FileOptions },
    Console { target: ConsoleTarget },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppenderSpec {
    /// Key segment in `appender.<id>.*`
    pub id: String,
    /// Name used by `appenderRef` entries
    pub name: String,
    pub kind: AppenderKind,
    pub layout: LayoutSpec,
    pub threshold: LevelFilter,
}

impl AppenderSpec {
    /// Open the appender. A sink that cannot be opened yields a failed
    /// appender and a status diagnostic instead of an error.
    pub fn build(&self, reporter: &Arc<StatusReporter>) -> Arc<dyn Appender> {
        let layout = self.layout.build();
        match &self.kind {
            AppenderKind::File { path, options } => {
                let appender = match FileAppender::open(&self.name, path, *options) {
                    Ok(appender) => appender,
                    Err(e) => {
                        reporter.error(
                            format!("appender '{}'", self.name),
                            format!("{}; events for this appender will be dropped", e),
                        );
                        FileAppender::failed(&self.name, path)
                    }
                };
                Arc::new(
                    appender
                        .with_layout(layout)
                        .with_threshold(self.threshold)
                        .with_reporter(Arc::clone(reporter)),
                )
            }
            AppenderKind::Console { target } => Arc::new(
                ConsoleAppender::new(&self.name, *target)
                    .with_layout(layout)
                    .with_threshold(self.threshold)
                    .with_reporter(Arc::clone(reporter)),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootSpec {
    pub level: LevelFilter,
    pub appender_refs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggerSpec {
    /// Key segment in `logger.<id>.*`
    pub id: String,
    pub category: String,
    /// `None` inherits from the nearest configured ancestor.
    pub level: Option<LevelFilter>,
    pub additive: bool,
    pub appender_refs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSpec {
    pub appenders: Vec<AppenderSpec>,
    pub root: RootSpec,
    pub loggers: Vec<LoggerSpec>,
    /// Threshold for echoing status events to stderr.
    pub status: Option<LevelFilter>,
}

impl ConfigSpec {
    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let props = properties.normalized();

        let mut appenders = Vec::new();
        let mut names = HashSet::new();
        for (id, section) in sections(&props, "appender.") {
            if section.keys.is_empty() {
                continue;
            }
            let appender = parse_appender(id, &section)?;
            if !names.insert(appender.name.clone()) {
                return Err(LoggerError::config(
                    format!("appender.{}", id),
                    format!("duplicate appender name '{}'", appender.name),
                ));
            }
            appenders.push(appender);
        }

        let mut loggers = Vec::new();
        let mut categories = HashSet::new();
        for (id, section) in sections(&props, "logger.") {
            let logger = parse_logger(id, &section)?;
            check_refs(&format!("logger '{}'", logger.category), &logger.appender_refs, &names)?;
            if !categories.insert(logger.category.clone()) {
                return Err(LoggerError::config(
                    format!("logger.{}", id),
                    format!("category '{}' is configured twice", logger.category),
                ));
            }
            loggers.push(logger);
        }

        let root = parse_root(&props)?;
        check_refs(ROOT_LOGGER, &root.appender_refs, &names)?;

        let status = props
            .get("status")
            .map(|value| parse_level("status", value))
            .transpose()?;

        Ok(Self {
            appenders,
            root,
            loggers,
            status,
        })
    }

    /// Console on stdout, root at `error`.
    pub fn default_console() -> Self {
        Self {
            appenders: vec![AppenderSpec {
                id: "console".to_string(),
                name: "console".to_string(),
                kind: AppenderKind::Console {
                    target: ConsoleTarget::Stdout,
                },
                layout: LayoutSpec::Pattern(DEFAULT_CONSOLE_PATTERN.to_string()),
                threshold: LevelFilter::Level(LogLevel::Trace),
            }],
            root: RootSpec {
                level: LevelFilter::Level(DEFAULT_ROOT_LEVEL),
                appender_refs: vec!["console".to_string()],
            },
            loggers: Vec::new(),
            status: None,
        }
    }

    /// No appenders, every category off.
    pub fn disabled() -> Self {
        Self {
            appenders: Vec::new(),
            root: RootSpec {
                level: LevelFilter::Off,
                appender_refs: Vec::new(),
            },
            loggers: Vec::new(),
            status: None,
        }
    }

    pub fn appender(&self, name: &str) -> Option<&AppenderSpec> {
        self.appenders.iter().find(|a| a.name == name)
    }

    pub fn logger(&self, category: &str) -> Option<&LoggerSpec> {
        self.loggers.iter().find(|l| l.category == category)
    }

    pub fn level_config(&self) -> LevelConfig {
        let mut levels = LevelConfig::new(self.root.level);
        for logger in &self.loggers {
            if let Some(level) = logger.level {
                levels.set_override(logger.category.clone(), level);
            }
        }
        levels
    }
}

impl Default for ConfigSpec {
    fn default() -> Self {
        Self::default_console()
    }
}

/// Keys sharing one `<prefix><id>` head: the bare value plus sub-keys.
#[derive(Default)]
struct Section<'a> {
    value: Option<&'a str>,
    keys: BTreeMap<&'a str, &'a str>,
}

impl<'a> Section<'a> {
    fn get(&self, key: &str) -> Option<&'a str> {
        self.keys.get(key).copied()
    }

    /// `appenderRef.<r>.ref` values in key order.
    fn appender_refs(&self) -> Vec<String> {
        self.keys
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix("appenderRef.")
                    .and_then(|rest| rest.strip_suffix(".ref"))
                    .map(|_| value.to_string())
            })
            .collect()
    }
}

fn sections<'a>(props: &'a Properties, prefix: &str) -> BTreeMap<&'a str, Section<'a>> {
    let mut sections: BTreeMap<&'a str, Section<'a>> = BTreeMap::new();
    for (key, value) in props.iter() {
        let Some(rest) = key.strip_prefix(prefix) else {
            continue;
        };
        match rest.split_once('.') {
            Some((id, sub)) => {
                sections.entry(id).or_default().keys.insert(sub, value);
            }
            None => sections.entry(rest).or_default().value = Some(value),
        }
    }
    sections
}

fn parse_appender(id: &str, section: &Section<'_>) -> Result<AppenderSpec> {
    let component = format!("appender.{}", id);
    let key = |sub: &str| format!("{}.{}", component, sub);

    let type_name = section
        .get("type")
        .ok_or_else(|| LoggerError::config(&component, "missing 'type'"))?;
    let name = section.get("name").unwrap_or(id).to_string();
    if name.is_empty() {
        return Err(LoggerError::config(&component, "appender name is empty"));
    }

    let kind = if type_name.eq_ignore_ascii_case("File") {
        let path = section
            .get("fileName")
            .filter(|path| !path.is_empty())
            .ok_or_else(|| LoggerError::config(&component, "File appender requires 'fileName'"))?;
        let mut options = FileOptions::default();
        if let Some(value) = section.get("append") {
            options.append = parse_bool(&key("append"), value)?;
        }
        if let Some(value) = section.get("immediateFlush") {
            options.immediate_flush = parse_bool(&key("immediateFlush"), value)?;
        }
        AppenderKind::File {
            path: PathBuf::from(path),
            options,
        }
    } else if type_name.eq_ignore_ascii_case("Console") {
        let target = match section.get("target") {
            Some(value) => value
                .parse()
                .map_err(|e: String| LoggerError::config(key("target"), e))?,
            None => ConsoleTarget::Stdout,
        };
        AppenderKind::Console { target }
    } else {
        return Err(LoggerError::unsupported_type("appender", type_name));
    };

    let layout = match section.get("layout.type") {
        Some(t) if t.eq_ignore_ascii_case("JsonLayout") => LayoutSpec::Json,
        Some(t) if !t.eq_ignore_ascii_case("PatternLayout") => {
            return Err(LoggerError::unsupported_type("layout", t));
        }
        _ => LayoutSpec::Pattern(section.get("layout.pattern").unwrap_or(DEFAULT_PATTERN).to_string()),
    };

    let threshold = section
        .get("filter.threshold.level")
        .map(|value| parse_level(&key("filter.threshold.level"), value))
        .transpose()?
        .unwrap_or(LevelFilter::Level(LogLevel::Trace));

    Ok(AppenderSpec {
        id: id.to_string(),
        name,
        kind,
        layout,
        threshold,
    })
}

fn parse_root(props: &Properties) -> Result<RootSpec> {
    let mut section = Section {
        value: props.get("rootLogger"),
        keys: BTreeMap::new(),
    };
    for (key, value) in props.iter() {
        if let Some(sub) = key.strip_prefix("rootLogger.") {
            section.keys.insert(sub, value);
        }
    }

    let (mut level, mut refs) = match section.value {
        Some(value) => parse_shorthand("rootLogger", value)?,
        None => (None, Vec::new()),
    };
    if let Some(value) = section.get("level") {
        level = Some(parse_level("rootLogger.level", value)?);
    }
    merge_refs(&mut refs, section.appender_refs());

    Ok(RootSpec {
        level: level.unwrap_or(LevelFilter::Level(DEFAULT_ROOT_LEVEL)),
        appender_refs: refs,
    })
}

fn parse_logger(id: &str, section: &Section<'_>) -> Result<LoggerSpec> {
    let component = format!("logger.{}", id);

    let category = section
        .get("name")
        .filter(|name| !name.is_empty())
        .ok_or_else(|| LoggerError::config(&component, "missing 'name'"))?;

    let (mut level, mut refs) = match section.value {
        Some(value) => parse_shorthand(&component, value)?,
        None => (None, Vec::new()),
    };
    if let Some(value) = section.get("level") {
        level = Some(parse_level(&format!("{}.level", component), value)?);
    }
    merge_refs(&mut refs, section.appender_refs());

    let additive = match section.get("additivity") {
        Some(value) => parse_bool(&format!("{}.additivity", component), value)?,
        None => true,
    };

    Ok(LoggerSpec {
        id: id.to_string(),
        category: category.to_string(),
        level,
        additive,
        appender_refs: refs,
    })
}

/// `<level>[, <ref>...]`
fn parse_shorthand(key: &str, value: &str) -> Result<(Option<LevelFilter>, Vec<String>)> {
    let mut parts = value.split(',').map(str::trim);
    let level = match parts.next() {
        Some(first) if !first.is_empty() => Some(parse_level(key, first)?),
        _ => None,
    };
    let refs = parts.filter(|r| !r.is_empty()).map(String::from).collect();
    Ok((level, refs))
}

fn merge_refs(refs: &mut Vec<String>, more: Vec<String>) {
    for r in more {
        if !refs.contains(&r) {
            refs.push(r);
        }
    }
}

fn check_refs(owner: &str, refs: &[String], names: &HashSet<String>) -> Result<()> {
    match refs.iter().find(|r| !names.contains(r.as_str())) {
        Some(missing) => Err(LoggerError::unknown_appender_ref(owner, missing.as_str())),
        None => Ok(()),
    }
}

fn parse_level(key: &str, value: &str) -> Result<LevelFilter> {
    value
        .parse()
        .map_err(|_| LoggerError::invalid_level(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(LoggerError::config(
            key,
            format!("expected 'true' or 'false', got '{}'", value),
        )),
    }
}
