//! Named logger entries
//!
//! One entry per category name for the lifetime of a context. Entries are
//! never removed; handles acquired for the same name share the entry.

use super::context::ContextShared;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) struct LoggerEntry {
    pub(crate) name: String,
    pub(crate) context: Arc<ContextShared>,
}

#[derive(Default)]
pub(crate) struct LoggerRegistry {
    entries: RwLock<HashMap<String, Arc<LoggerEntry>>>,
}

impl LoggerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Existing entry for `name`, or a new one bound to `context`.
    pub(crate) fn get_or_create(&self, name: &str, context: &Arc<ContextShared>) -> Arc<LoggerEntry> {
        if let Some(entry) = self.entries.read().get(name) {
            return Arc::clone(entry);
        }

        let mut entries = self.entries.write();
        Arc::clone(entries.entry(name.to_string()).or_insert_with(|| {
            Arc::new(LoggerEntry {
                name: name.to_string(),
                context: Arc::clone(context),
            })
        }))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Registered names in sorted order.
    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }
}
