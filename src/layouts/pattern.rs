//! Pattern layout
//!
//! Compiles a conversion pattern such as `%d [%t] %-5p %c - %m%n` once and
//! renders events against it. Parsing never fails: anything that is not a
//! recognised conversion is emitted literally.
//!
//! | Conversion                          | Output                                  |
//! |-------------------------------------|-----------------------------------------|
//! | `%c`, `%logger`, `%c{N}`            | category, optionally last N segments    |
//! | `%p`, `%level`                      | level name                              |
//! | `%m`, `%msg`, `%message`            | rendered message                        |
//! | `%n`                                | newline                                 |
//! | `%ex`, `%exception`, `%throwable`   | attached error chain                    |
//! | `%d`, `%date`, `%d{fmt}`            | timestamp                               |
//! | `%t`, `%thread`                     | thread name                             |
//! | `%highlight{pattern}`               | `pattern` coloured by the event level   |
//! | `%%`                                | a literal `%`                           |
//!
//! Format modifiers between `%` and the conversion: `-` left-aligns,
//! a number sets the minimum width, `.N` sets a maximum width (truncating
//! from the left).

use crate::core::{LogEvent, ThrowableInfo, TimestampFormat};
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThrowableDepth {
    None,
    Short,
    Full,
}

#[derive(Debug, Clone, PartialEq)]
enum Converter {
    Literal(String),
    Category { segments: Option<usize> },
    Level,
    Message,
    Newline,
    Throwable(ThrowableDepth),
    Date(TimestampFormat),
    Thread,
    Highlight(Vec<PatternElement>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FormatModifier {
    left_align: bool,
    min_width: usize,
    max_width: Option<usize>,
}

impl FormatModifier {
    fn is_noop(&self) -> bool {
        self.min_width == 0 && self.max_width.is_none()
    }

    fn apply(&self, out: &mut String, text: &str) {
        let len = text.chars().count();
        let text = match self.max_width {
            Some(max) if len > max => {
                let skip = len - max;
                match text.char_indices().nth(skip) {
                    Some((at, _)) => &text[at..],
                    None => "",
                }
            }
            _ => text,
        };
        let len = text.chars().count();
        let fill = self.min_width.saturating_sub(len);

        if self.left_align {
            out.push_str(text);
            out.extend(std::iter::repeat(' ').take(fill));
        } else {
            out.extend(std::iter::repeat(' ').take(fill));
            out.push_str(text);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PatternElement {
    converter: Converter,
    modifier: FormatModifier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternLayout {
    pattern: String,
    elements: Vec<PatternElement>,
    handles_throwable: bool,
}

pub const DEFAULT_PATTERN: &str = "%m%n";

impl PatternLayout {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let elements = parse(&pattern);
        let handles_throwable = mentions_throwable(&elements);
        Self {
            pattern,
            elements,
            handles_throwable,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, event: &LogEvent) -> String {
        let mut out = String::with_capacity(self.pattern.len() + event.message.len() + 32);
        self.format_into(&mut out, event);
        out
    }

    pub fn format_into(&self, out: &mut String, event: &LogEvent) {
        render_all(out, &self.elements, event);

        // Errors are always written, even when the pattern does not ask for them
        if !self.handles_throwable {
            if let Some(ref throwable) = event.throwable {
                start_line(out);
                for line in throwable.lines() {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
    }
}

impl Default for PatternLayout {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

fn mentions_throwable(elements: &[PatternElement]) -> bool {
    elements.iter().any(|e| match e.converter {
        Converter::Throwable(_) => true,
        Converter::Highlight(ref inner) => mentions_throwable(inner),
        _ => false,
    })
}

fn render_all(out: &mut String, elements: &[PatternElement], event: &LogEvent) {
    let mut scratch = String::new();
    for element in elements {
        if element.modifier.is_noop() {
            render(out, &element.converter, event);
        } else {
            scratch.clear();
            render(&mut scratch, &element.converter, event);
            element.modifier.apply(out, &scratch);
        }
    }
}

fn start_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn render(out: &mut String, converter: &Converter, event: &LogEvent) {
    match converter {
        Converter::Literal(text) => out.push_str(text),
        Converter::Category { segments } => out.push_str(abbreviate(&event.category, *segments)),
        Converter::Level => out.push_str(event.level.to_str()),
        Converter::Message => out.push_str(&event.message),
        Converter::Newline => out.push('\n'),
        Converter::Throwable(depth) => {
            if let Some(ref throwable) = event.throwable {
                write_throwable(out, throwable, *depth);
            }
        }
        Converter::Date(format) => format.write_to(out, &event.timestamp),
        Converter::Thread => out.push_str(event.thread()),
        Converter::Highlight(inner) => {
            let mut text = String::new();
            render_all(&mut text, inner, event);
            out.push_str(&text.color(event.level.color()).to_string());
        }
    }
}

fn write_throwable(out: &mut String, throwable: &ThrowableInfo, depth: ThrowableDepth) {
    let limit = match depth {
        ThrowableDepth::None => return,
        ThrowableDepth::Short => 1,
        ThrowableDepth::Full => usize::MAX,
    };
    start_line(out);
    for (i, line) in throwable.lines().take(limit).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&line);
    }
}

/// Keep the rightmost `segments` dot-separated parts of a category.
fn abbreviate(category: &str, segments: Option<usize>) -> &str {
    let Some(keep) = segments else {
        return category;
    };
    let mut cut = category.len();
    for _ in 0..keep {
        match category[..cut].rfind('.') {
            Some(dot) => cut = dot,
            None => return category,
        }
    }
    &category[cut + 1..]
}

/// Longest known conversion name at the start of `word`.
fn lookup(word: &str) -> Option<&'static str> {
    const KEYS: &[&str] = &[
        "c", "logger", "p", "level", "m", "msg", "message", "n", "ex", "exception",
        "throwable", "d", "date", "t", "thread", "highlight",
    ];
    (1..=word.len())
        .rev()
        .find_map(|len| KEYS.iter().copied().find(|key| *key == &word[..len]))
}

fn build(key: &str, option: Option<&str>) -> Option<Converter> {
    let converter = match key {
        "c" | "logger" => Converter::Category {
            segments: option
                .and_then(|o| o.trim().parse::<usize>().ok())
                .filter(|n| *n > 0),
        },
        "p" | "level" => Converter::Level,
        "m" | "msg" | "message" => Converter::Message,
        "n" => Converter::Newline,
        "ex" | "exception" | "throwable" => {
            let depth = match option.map(|o| o.trim().to_lowercase()).as_deref() {
                Some("none") | Some("0") => ThrowableDepth::None,
                Some("short") | Some("1") => ThrowableDepth::Short,
                _ => ThrowableDepth::Full,
            };
            Converter::Throwable(depth)
        }
        "d" | "date" => Converter::Date(TimestampFormat::from_option(option.unwrap_or(""))?),
        "t" | "thread" => Converter::Thread,
        "highlight" => Converter::Highlight(parse(option?)),
        _ => return None,
    };
    Some(converter)
}

/// Offset of the `}` closing the `{` that starts `text`.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (at, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(at);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse(pattern: &str) -> Vec<PatternElement> {
    let bytes = pattern.as_bytes();
    let mut elements = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    let flush = |literal: &mut String, elements: &mut Vec<PatternElement>| {
        if !literal.is_empty() {
            elements.push(PatternElement {
                converter: Converter::Literal(std::mem::take(literal)),
                modifier: FormatModifier::default(),
            });
        }
    };

    while i < bytes.len() {
        let Some(pct) = pattern[i..].find('%') else {
            literal.push_str(&pattern[i..]);
            break;
        };
        literal.push_str(&pattern[i..i + pct]);
        let start = i + pct;
        i = start + 1;

        if i >= bytes.len() {
            literal.push('%');
            break;
        }
        if bytes[i] == b'%' {
            literal.push('%');
            i += 1;
            continue;
        }

        let mut modifier = FormatModifier::default();
        if bytes[i] == b'-' {
            modifier.left_align = true;
            i += 1;
        }
        let digits_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        modifier.min_width = pattern[digits_start..i].parse().unwrap_or(0);
        if i < bytes.len() && bytes[i] == b'.' {
            let max_start = i + 1;
            let mut j = max_start;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > max_start {
                modifier.max_width = pattern[max_start..j].parse().ok();
                i = j;
            }
        }

        let word_start = i;
        while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        let word = &pattern[word_start..i];

        let Some(key) = lookup(word) else {
            // Unknown conversion: keep the text as written
            literal.push_str(&pattern[start..i]);
            continue;
        };
        let leftover = &word[key.len()..];

        let mut option = None;
        if leftover.is_empty() && pattern[i..].starts_with('{') {
            if let Some(close) = matching_brace(&pattern[i..]) {
                option = Some(&pattern[i + 1..i + close]);
                i += close + 1;
            }
        }

        match build(key, option) {
            Some(converter) => {
                flush(&mut literal, &mut elements);
                elements.push(PatternElement {
                    converter,
                    modifier,
                });
                literal.push_str(leftover);
            }
            None => literal.push_str(&pattern[start..i]),
        }
    }

    flush(&mut literal, &mut elements);
    elements
}
