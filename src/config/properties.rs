//! Flat key/value configuration
//!
//! The host hands the engine a flat string map. Keys may carry the
//! `log4j2.` prefix used by the host's configuration store; it is stripped
//! by [`Properties::normalized`].

use crate::core::{LoggerError, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const KEY_PREFIX: &str = "log4j2.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy with the `log4j2.` prefix removed from keys and values trimmed.
    /// A prefixed key wins over the same key given without the prefix.
    pub fn normalized(&self) -> Properties {
        let mut plain = BTreeMap::new();
        let mut prefixed = BTreeMap::new();
        for (key, value) in &self.entries {
            match key.strip_prefix(KEY_PREFIX) {
                Some(stripped) => prefixed.insert(stripped.to_string(), value.trim().to_string()),
                None => plain.insert(key.clone(), value.trim().to_string()),
            };
        }
        plain.extend(prefixed);
        Properties { entries: plain }
    }

    /// Read `.properties` text: `#`/`!` comments, `=`, `:` or whitespace
    /// separators, backslash line continuations and escapes.
    pub fn parse(text: &str) -> Self {
        let mut properties = Properties::new();
        let mut logical = String::new();

        for raw in text.lines() {
            let line = raw.trim_start();

            if logical.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
                continue;
            }

            let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
            if trailing % 2 == 1 {
                logical.push_str(&line[..line.len() - 1]);
                continue;
            }
            logical.push_str(line);

            let (key, value) = split_entry(&logical);
            properties.insert(key, value);
            logical.clear();
        }

        if !logical.is_empty() {
            let (key, value) = split_entry(&logical);
            properties.insert(key, value);
        }

        properties
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LoggerError::io_operation(format!("reading '{}'", path.display()), &e))?;
        Ok(Self::parse(&text))
    }
}

fn split_entry(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    push_escape(&mut key, escaped, &mut chars);
                }
            }
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                if matches!(chars.peek(), Some('=') | Some(':')) {
                    chars.next();
                }
                break;
            }
            c => key.push(c),
        }
    }

    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }

    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                push_escape(&mut value, escaped, &mut chars);
            }
        } else {
            value.push(c);
        }
    }

    (key, value)
}

fn push_escape(out: &mut String, escaped: char, chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    match escaped {
        't' => out.push('\t'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        'f' => out.push('\u{c}'),
        'u' => {
            let hex: String = (0..4).filter_map(|_| chars.next()).collect();
            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                Some(c) => out.push(c),
                None => {
                    out.push('u');
                    out.push_str(&hex);
                }
            }
        }
        other => out.push(other),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Properties {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl From<HashMap<String, String>> for Properties {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Properties { entries }
    }
}
