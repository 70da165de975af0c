//! Message rendering for the two logger calling conventions
//!
//! A logger handle carries a [`FormatStyle`]; every call funnels through
//! [`format_message`], which extracts a trailing error argument and renders
//! the template in the requested style.

use super::error::LoggerError;
use super::log_arg::{split_throwable, LogArg};
use super::printf;
use super::throwable::ThrowableInfo;
use std::fmt::Write;

/// How a message template is combined with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatStyle {
    /// `{}` placeholders, substituted positionally.
    #[default]
    Brace,
    /// printf-style conversions (`%s`, `%d`, ...).
    Printf,
}

/// Result of rendering a template.
#[derive(Debug, Clone)]
pub struct FormattedMessage {
    pub text: String,
    pub throwable: Option<ThrowableInfo>,
    /// Set when the template could not be applied; `text` then holds the
    /// literal template.
    pub error: Option<LoggerError>,
}

pub fn format_message(style: FormatStyle, template: &str, args: &[LogArg]) -> FormattedMessage {
    let (args, throwable) = split_throwable(args);
    let throwable = throwable.cloned();

    match style {
        FormatStyle::Brace => FormattedMessage {
            text: format_brace(template, args),
            throwable,
            error: None,
        },
        FormatStyle::Printf => match printf::sprintf(template, args) {
            Ok(text) => FormattedMessage {
                text,
                throwable,
                error: None,
            },
            Err(e) => FormattedMessage {
                text: template.to_string(),
                throwable,
                error: Some(e),
            },
        },
    }
}

/// Substitute `{}` placeholders left to right.
///
/// `\{}` renders a literal `{}`; `\\{}` renders a backslash followed by the
/// argument. Placeholders without a matching argument are left as `{}` and
/// surplus arguments are ignored.
pub fn format_brace(template: &str, args: &[LogArg]) -> String {
    if args.is_empty() && !template.contains('\\') {
        return template.to_string();
    }

    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut args = args.iter();
    let mut cursor = 0;
    let mut copied = 0;

    while let Some(found) = template[cursor..].find("{}") {
        let at = cursor + found;
        let escaped = at >= 1 && bytes[at - 1] == b'\\';
        let double_escaped = escaped && at >= 2 && bytes[at - 2] == b'\\';

        if escaped && !double_escaped {
            out.push_str(&template[copied..at - 1]);
            out.push_str("{}");
        } else {
            let end = if double_escaped { at - 1 } else { at };
            out.push_str(&template[copied..end]);
            match args.next() {
                Some(arg) => {
                    let _ = write!(out, "{}", arg);
                }
                None => out.push_str("{}"),
            }
        }

        cursor = at + 2;
        copied = cursor;
    }

    out.push_str(&template[copied..]);
    out
}
