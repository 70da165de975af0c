//! printf-style message formatting
//!
//! Implements the conversion syntax callers of a formatter logger expect:
//! `%[argument_index$][flags][width][.precision]conversion`.
//!
//! Supported conversions: `s S b B c C d o x X e E f g G h H n %`.
//! Supported flags: `-` (left justify), `#` (alternate form), `+`, space,
//! `0` (zero pad) and `,` (grouping).
//!
//! Any mismatch between the template and the arguments is reported as a
//! [`LoggerError::FormatterError`]; callers decide how to degrade.

use super::error::{LoggerError, Result};
use super::log_arg::LogArg;
use std::fmt::Write;

const FORMAT_TYPE: &str = "printf";

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    left: bool,
    alternate: bool,
    plus: bool,
    space: bool,
    zero: bool,
    grouping: bool,
}

#[derive(Debug, Clone, Copy)]
struct Spec {
    index: Option<usize>,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Format `template` with `args` using printf semantics.
pub fn sprintf(template: &str, args: &[LogArg]) -> Result<String> {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.char_indices().peekable();
    let mut next_arg = 0usize;

    while let Some((_, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let spec = parse_spec(template, &mut chars)?;
        match spec.conversion {
            'n' => out.push('\n'),
            '%' => pad_into(&mut out, "%", &spec, false),
            _ => {
                let arg = match spec.index {
                    Some(index) => args.get(index - 1),
                    None => {
                        next_arg += 1;
                        args.get(next_arg - 1)
                    }
                };
                let arg = arg.ok_or_else(|| {
                    LoggerError::formatter(
                        FORMAT_TYPE,
                        format!("missing argument for format specifier '%{}'", spec.conversion),
                    )
                })?;
                convert(&mut out, arg, &spec)?;
            }
        }
    }

    Ok(out)
}

fn parse_spec(
    template: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<Spec> {
    let mut digits = String::new();
    let mut index = None;

    // A run of digits followed by '$' is an explicit argument index
    let start = chars.peek().map(|(i, _)| *i).unwrap_or(template.len());
    let rest = &template[start..];
    let run: usize = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if run > 0 && rest[run..].starts_with('$') {
        for _ in 0..=run {
            if let Some((_, d)) = chars.next() {
                digits.push(d);
            }
        }
        digits.pop();
        let parsed: usize = digits.parse().unwrap_or(0);
        if parsed == 0 {
            return Err(LoggerError::formatter(FORMAT_TYPE, "argument index must be >= 1"));
        }
        index = Some(parsed);
        digits.clear();
    }

    let mut flags = Flags::default();
    while let Some(&(_, c)) = chars.peek() {
        match c {
            '-' => flags.left = true,
            '#' => flags.alternate = true,
            '+' => flags.plus = true,
            ' ' => flags.space = true,
            '0' => flags.zero = true,
            ',' => flags.grouping = true,
            _ => break,
        }
        chars.next();
    }

    while let Some(&(_, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    let width = if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    };

    let mut precision = None;
    if let Some(&(_, '.')) = chars.peek() {
        chars.next();
        digits.clear();
        while let Some(&(_, c)) = chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            chars.next();
        }
        if digits.is_empty() {
            return Err(LoggerError::formatter(FORMAT_TYPE, "precision expected after '.'"));
        }
        precision = digits.parse().ok();
    }

    let conversion = match chars.next() {
        Some((_, c)) => c,
        None => {
            return Err(LoggerError::formatter(
                FORMAT_TYPE,
                "format specifier ends the template",
            ))
        }
    };

    Ok(Spec {
        index,
        flags,
        width,
        precision,
        conversion,
    })
}

fn mismatch(spec: &Spec, arg: &LogArg) -> LoggerError {
    LoggerError::formatter(
        FORMAT_TYPE,
        format!("'%{}' cannot format argument {:?}", spec.conversion, arg),
    )
}

fn convert(out: &mut String, arg: &LogArg, spec: &Spec) -> Result<()> {
    let upper = spec.conversion.is_ascii_uppercase();
    match spec.conversion.to_ascii_lowercase() {
        's' => {
            let mut text = arg.to_string();
            if let Some(precision) = spec.precision {
                text = text.chars().take(precision).collect();
            }
            if upper {
                text = text.to_uppercase();
            }
            pad_into(out, &text, spec, false);
        }
        'b' => {
            let value = match arg {
                LogArg::Null => false,
                LogArg::Bool(b) => *b,
                _ => true,
            };
            let text = if upper {
                value.to_string().to_uppercase()
            } else {
                value.to_string()
            };
            pad_into(out, &text, spec, false);
        }
        'h' => {
            let text = match arg {
                LogArg::Null => "null".to_string(),
                other => format!("{:x}", java_hash(&other.to_string()) as u32),
            };
            let text = if upper { text.to_uppercase() } else { text };
            pad_into(out, &text, spec, false);
        }
        'c' => {
            let ch = match arg {
                LogArg::Char(c) => *c,
                LogArg::Int(i) => u32::try_from(*i)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| mismatch(spec, arg))?,
                LogArg::UInt(u) => u32::try_from(*u)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| mismatch(spec, arg))?,
                _ => return Err(mismatch(spec, arg)),
            };
            let text = if upper {
                ch.to_uppercase().to_string()
            } else {
                ch.to_string()
            };
            pad_into(out, &text, spec, false);
        }
        'd' => {
            let (negative, magnitude) = match arg {
                LogArg::Int(i) => (*i < 0, i.unsigned_abs().to_string()),
                LogArg::UInt(u) => (false, u.to_string()),
                _ => return Err(mismatch(spec, arg)),
            };
            let digits = if spec.flags.grouping {
                group_thousands(&magnitude)
            } else {
                magnitude
            };
            let text = signed(negative, &digits, &spec.flags);
            pad_into(out, &text, spec, true);
        }
        'x' | 'o' => {
            let bits = match arg {
                LogArg::Int(i) => *i as u64,
                LogArg::UInt(u) => *u,
                _ => return Err(mismatch(spec, arg)),
            };
            let mut text = String::new();
            let octal = spec.conversion == 'o';
            if spec.flags.alternate {
                text.push_str(if octal { "0" } else { "0x" });
            }
            if octal {
                let _ = write!(text, "{:o}", bits);
            } else {
                let _ = write!(text, "{:x}", bits);
            }
            if upper {
                text = text.to_uppercase();
            }
            pad_into(out, &text, spec, true);
        }
        'f' | 'e' | 'g' => {
            let value = match arg {
                LogArg::Float(f) => *f,
                _ => return Err(mismatch(spec, arg)),
            };
            let text = if value.is_nan() {
                "NaN".to_string()
            } else if value.is_infinite() {
                signed(value < 0.0, "Infinity", &spec.flags)
            } else {
                let precision = spec.precision.unwrap_or(6);
                let body = match spec.conversion.to_ascii_lowercase() {
                    'f' => {
                        let fixed = format!("{:.*}", precision, value.abs());
                        if spec.flags.grouping {
                            group_fixed(&fixed)
                        } else {
                            fixed
                        }
                    }
                    'e' => scientific(value.abs(), precision),
                    _ => general(value.abs(), precision),
                };
                signed(value.is_sign_negative() && value != 0.0, &body, &spec.flags)
            };
            let text = if upper { text.to_uppercase() } else { text };
            pad_into(out, &text, spec, value.is_finite());
        }
        other => {
            return Err(LoggerError::formatter(
                FORMAT_TYPE,
                format!("unknown format conversion '%{}'", other),
            ))
        }
    }
    Ok(())
}

fn signed(negative: bool, body: &str, flags: &Flags) -> String {
    if negative {
        format!("-{}", body)
    } else if flags.plus {
        format!("+{}", body)
    } else if flags.space {
        format!(" {}", body)
    } else {
        body.to_string()
    }
}

/// Pad to the requested width. Zero padding goes after any sign or radix
/// prefix and only applies to numeric conversions.
fn pad_into(out: &mut String, text: &str, spec: &Spec, numeric: bool) {
    let len = text.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        out.push_str(text);
        return;
    }
    let fill = width - len;

    if spec.flags.left {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.flags.zero && numeric {
        let prefix_len = text
            .char_indices()
            .take_while(|(_, c)| matches!(c, '-' | '+' | ' '))
            .count();
        let (sign, rest) = text.split_at(prefix_len);
        let (radix, digits) = if rest.starts_with("0x") || rest.starts_with("0X") {
            rest.split_at(2)
        } else {
            ("", rest)
        };
        out.push_str(sign);
        out.push_str(radix);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(text);
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn group_fixed(fixed: &str) -> String {
    match fixed.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
        None => group_thousands(fixed),
    }
}

/// `1.234560e+02` style: at least two exponent digits, explicit sign.
fn scientific(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => raw,
    }
}

fn general(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return format!("{:.*}", precision - 1, 0.0);
    }
    // Decide on the exponent after rounding to the requested significant digits
    let rounded: f64 = format!("{:.*e}", precision - 1, value)
        .parse()
        .unwrap_or(value);
    if (1e-4..10f64.powi(precision as i32)).contains(&rounded) {
        let exponent = rounded.log10().floor() as i32;
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, value)
    } else {
        scientific(value, precision - 1)
    }
}

fn java_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &str, args: &[LogArg]) -> String {
        sprintf(template, args).expect("format succeeds")
    }

    #[test]
    fn test_string_substitution() {
        assert_eq!(fmt("X %s Y", &["z".into()]), "X z Y");
        assert_eq!(fmt("%S!", &["loud".into()]), "LOUD!");
        assert_eq!(fmt("[%5s][%-5s]", &["ab".into(), "cd".into()]), "[   ab][cd   ]");
        assert_eq!(fmt("%.3s", &["abcdef".into()]), "abc");
    }

    #[test]
    fn test_integers() {
        assert_eq!(fmt("%d", &[42.into()]), "42");
        assert_eq!(fmt("%05d", &[(-42).into()]), "-0042");
        assert_eq!(fmt("%+d", &[7.into()]), "+7");
        assert_eq!(fmt("%,d", &[1234567.into()]), "1,234,567");
        assert_eq!(fmt("%x %X %#x %o", &[255.into(), 255.into(), 255.into(), 8.into()]), "ff FF 0xff 10");
        assert_eq!(fmt("%#06x", &[255.into()]), "0x00ff");
    }

    #[test]
    fn test_floats() {
        assert_eq!(fmt("%.2f", &[3.14159.into()]), "3.14");
        assert_eq!(fmt("%f", &[1.5.into()]), "1.500000");
        assert_eq!(fmt("%e", &[123.456.into()]), "1.234560e+02");
        assert_eq!(fmt("%.3E", &[0.000123.into()]), "1.230E-04");
        assert_eq!(fmt("%g", &[123.456.into()]), "123.456");
        assert_eq!(fmt("%08.2f", &[(-3.5).into()]), "-0003.50");
    }

    #[test]
    fn test_misc_conversions() {
        assert_eq!(fmt("%b %b %B", &[LogArg::Null, true.into(), "x".into()]), "false true TRUE");
        assert_eq!(fmt("%c%c", &['h'.into(), 105.into()]), "hi");
        assert_eq!(fmt("100%% done%n", &[]), "100% done\n");
        assert_eq!(fmt("%h", &["hello".into()]), "5e918d2");
    }

    #[test]
    fn test_explicit_index() {
        assert_eq!(fmt("%2$s %1$s %s", &["a".into(), "b".into()]), "b a a");
    }

    #[test]
    fn test_excess_arguments_ignored() {
        assert_eq!(fmt("only %s", &["one".into(), "two".into()]), "only one");
    }

    #[test]
    fn test_mismatches_are_errors() {
        assert!(matches!(
            sprintf("%d", &["text".into()]),
            Err(LoggerError::FormatterError { .. })
        ));
        assert!(sprintf("%s %s", &["one".into()]).is_err());
        assert!(sprintf("%q", &["x".into()]).is_err());
        assert!(sprintf("trailing %", &[]).is_err());
        assert!(sprintf("%0$s", &["x".into()]).is_err());
    }
}
