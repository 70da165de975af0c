//! Category level resolution
//!
//! Categories are dot-separated names. An override for `a.b` covers `a.b`
//! and every descendant (`a.b.c`), but not a sibling that merely shares a
//! textual prefix (`a.bc`). The longest matching override wins; the root
//! level applies when nothing matches.

use super::log_level::{LevelFilter, LogLevel};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    root: LevelFilter,
    overrides: HashMap<String, LevelFilter>,
}

impl LevelConfig {
    pub fn new(root: LevelFilter) -> Self {
        Self {
            root,
            overrides: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_override(mut self, category: impl Into<String>, level: LevelFilter) -> Self {
        self.set_override(category, level);
        self
    }

    pub fn set_override(&mut self, category: impl Into<String>, level: LevelFilter) {
        self.overrides.insert(category.into(), level);
    }

    pub fn root(&self) -> LevelFilter {
        self.root
    }

    pub fn overrides(&self) -> &HashMap<String, LevelFilter> {
        &self.overrides
    }

    pub fn effective_level(&self, category: &str) -> LevelFilter {
        if self.overrides.is_empty() {
            return self.root;
        }
        hierarchy(category)
            .find_map(|name| self.overrides.get(name).copied())
            .unwrap_or(self.root)
    }

    #[inline]
    pub fn is_enabled(&self, category: &str, level: LogLevel) -> bool {
        self.effective_level(category).enables(level)
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::new(LevelFilter::Level(LogLevel::Error))
    }
}

/// The category itself, then each ancestor from nearest to farthest:
/// `a.b.c`, `a.b`, `a`.
pub(crate) fn hierarchy(category: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(category), |name| name.rfind('.').map(|i| &name[..i]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(l: LogLevel) -> LevelFilter {
        LevelFilter::Level(l)
    }

    #[test]
    fn test_hierarchy_order() {
        let names: Vec<_> = hierarchy("org.example.app").collect();
        assert_eq!(names, vec!["org.example.app", "org.example", "org"]);
        assert_eq!(hierarchy("flat").collect::<Vec<_>>(), vec!["flat"]);
    }

    #[test]
    fn test_root_applies_without_overrides() {
        let config = LevelConfig::new(level(LogLevel::Warn));
        assert!(config.is_enabled("any.thing", LogLevel::Error));
        assert!(!config.is_enabled("any.thing", LogLevel::Info));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let config = LevelConfig::new(level(LogLevel::Error))
            .with_override("com", level(LogLevel::Info))
            .with_override("com.acme.db", level(LogLevel::Trace));

        assert_eq!(config.effective_level("com.acme.db.pool"), level(LogLevel::Trace));
        assert_eq!(config.effective_level("com.acme.web"), level(LogLevel::Info));
        assert_eq!(config.effective_level("org.other"), level(LogLevel::Error));
    }

    #[test]
    fn test_prefix_matches_on_segment_boundary() {
        let config =
            LevelConfig::new(level(LogLevel::Error)).with_override("a.b", level(LogLevel::Debug));

        assert!(config.is_enabled("a.b", LogLevel::Debug));
        assert!(config.is_enabled("a.b.c", LogLevel::Debug));
        assert!(!config.is_enabled("a.bc", LogLevel::Debug));
    }

    #[test]
    fn test_off_override() {
        let config = LevelConfig::new(level(LogLevel::Trace)).with_override("noisy", LevelFilter::Off);
        assert!(!config.is_enabled("noisy.child", LogLevel::Fatal));
        assert!(config.is_enabled("quiet", LogLevel::Trace));
        assert!(!LevelConfig::new(LevelFilter::Off).is_enabled("x", LogLevel::Fatal));
    }
}
