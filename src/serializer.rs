//! Compact text output for [JsonValue]s
//!
//! Output carries no insignificant whitespace. Map members come out in ascending key order,
//! floats in six-digit fixed notation.
use std::borrow::Cow;
use std::fmt::{Display, Formatter, Write};

use crate::value::JsonValue;

impl JsonValue {
    /// Render the value as compact JSON text
    pub fn stringify(&self) -> String {
        self.to_string()
    }
}

impl Display for JsonValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_value(f, self)
    }
}

fn write_value<W: Write>(out: &mut W, value: &JsonValue) -> std::fmt::Result {
    match value {
        JsonValue::Null => out.write_str("null"),
        JsonValue::Bool(b) => write!(out, "{}", b),
        JsonValue::Int(i) => write!(out, "{}", i),
        JsonValue::Float(x) => write!(out, "{:.6}", x),
        JsonValue::String(s) => write_string(out, s),
        JsonValue::Array(array) => {
            out.write_char('[')?;
            for (i, element) in array.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_value(out, element)?;
            }
            out.write_char(']')
        }
        JsonValue::Map(map) => {
            out.write_char('{')?;
            for (i, (key, member)) in map.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_string(out, key)?;
                out.write_char(':')?;
                write_value(out, member)?;
            }
            out.write_char('}')
        }
    }
}

fn write_string<W: Write>(out: &mut W, s: &str) -> std::fmt::Result {
    out.write_char('"')?;
    out.write_str(&escape(s))?;
    out.write_char('"')
}

/// Escape the characters that get a backslash on output. Everything else, including other
/// control characters, passes through untouched.
pub(crate) fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '"', '\r', '\t', '/', '\u{8}']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '/' => escaped.push_str("\\/"),
            '\u{8}' => escaped.push_str("\\b"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
