//! A representation of a JSON Pointer with associated operations, as per RFC 6901
//!
//! A pointer is held as its textual form. Resolution splits the text on `/`, unescapes each
//! reference token and then hands the tokens to the document parser to decide which are array
//! indices and which are member names. Only tokens made up entirely of digits ever become
//! indices.
use std::fmt::Display;
use std::ops::Index;
use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use crate::errors::{Details, Error, JsonResult};
use crate::parser::{parse, ParseOptions};
use crate::range_error;
use crate::serializer::escape;
use crate::value::{JsonValue, Selector, EMPTY_VALUE};

/// Each pointer is a series of segments delineated by a separator char
const PATH_SEPARATOR: char = '/';
/// As per the RFC, we need to encode any tilde characters as ~0
const ENCODED_TILDE: &str = "~0";
/// As per the RFC, we need to encode any slash characters as ~1
const ENCODED_SLASH: &str = "~1";

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("digit expression is valid"));

/// A single resolved step of a pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A member name within a map
    Name(String),
    /// An element index within an array
    Index(usize),
}

impl Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(s) => write!(
                f,
                "{}",
                s.replace('~', ENCODED_TILDE).replace('/', ENCODED_SLASH)
            ),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

impl Selector for Segment {
    fn select<'v>(&self, value: &'v JsonValue) -> JsonResult<&'v JsonValue> {
        match self {
            Self::Name(name) => name.select(value),
            Self::Index(index) => index.select(value),
        }
    }

    fn select_mut<'v>(&self, value: &'v mut JsonValue) -> JsonResult<&'v mut JsonValue> {
        match self {
            Self::Name(name) => name.select_mut(value),
            Self::Index(index) => index.select_mut(value),
        }
    }
}

/// A JSON pointer in its RFC 6901 textual form. The empty pointer addresses the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    text: String,
}

impl Pointer {
    /// Wrap pointer text. The text isn't checked until the pointer is resolved.
    pub fn new(text: impl Into<String>) -> Self {
        Pointer { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Checks whether this is the empty pointer, addressing the document root
    pub fn is_root(&self) -> bool {
        self.text.is_empty()
    }

    /// Push a new member name onto the end of the pointer, escaping it as required
    pub fn push_name(&mut self, name: &str) {
        self.text.push(PATH_SEPARATOR);
        self.text
            .push_str(&Segment::Name(name.to_string()).to_string());
    }

    /// Push a new array index onto the end of the pointer
    pub fn push_index(&mut self, index: usize) {
        self.text.push(PATH_SEPARATOR);
        self.text.push_str(&index.to_string());
    }

    /// Pop the last reference token off the back of the pointer, returning it still escaped
    pub fn pop(&mut self) -> Option<String> {
        let at = self.text.rfind(PATH_SEPARATOR)?;
        let token = self.text[at + 1..].to_string();
        self.text.truncate(at);
        Some(token)
    }

    /// Split the pointer into its unescaped reference tokens. The first token is whatever
    /// precedes the first separator, which for a well-formed pointer is the empty string.
    pub fn tokens(&self) -> Vec<String> {
        self.text
            .split(PATH_SEPARATOR)
            .map(|t| t.replace(ENCODED_SLASH, "/").replace(ENCODED_TILDE, "~"))
            .collect()
    }

    /// Work out the [Segment]s this pointer steps through, outermost first
    pub fn segments(&self) -> JsonResult<Vec<Segment>> {
        if self.is_root() {
            return Ok(vec![]);
        }
        let tokens = self.tokens();
        match tokens.first() {
            Some(first) if first.is_empty() => (),
            _ => return range_error!(Details::InvalidPointer(self.text.clone())),
        }
        classify_segments(&tokens[1..])
            .map_err(|_| Error::range(Details::InvalidPointer(self.text.clone())))?
            .into_iter()
            .zip(&tokens[1..])
            .map(|(classified, token)| match classified {
                JsonValue::Int(i) => match usize::try_from(i) {
                    Ok(index) => Ok(Segment::Index(index)),
                    Err(_) => range_error!(Details::InvalidPointerSegment(token.clone())),
                },
                JsonValue::String(name) => Ok(Segment::Name(name)),
                _ => range_error!(Details::InvalidPointerSegment(token.clone())),
            })
            .collect()
    }

    /// Resolve the pointer against `root`
    pub fn resolve<'v>(&self, root: &'v JsonValue) -> JsonResult<&'v JsonValue> {
        let mut current = root;
        for segment in self.segments()? {
            trace!("resolving {:?} of {}", segment, self);
            current = segment.select(current)?;
        }
        Ok(current)
    }

    /// Resolve the pointer against `root`, handing back a mutable reference. Nothing is
    /// created along the way.
    pub fn resolve_mut<'v>(&self, root: &'v mut JsonValue) -> JsonResult<&'v mut JsonValue> {
        let mut current = root;
        for segment in self.segments()? {
            trace!("resolving {:?} of {}", segment, self);
            current = segment.select_mut(current)?;
        }
        Ok(current)
    }
}

/// Classify raw reference tokens by running them through the document parser as the elements
/// of a single array. Digit-only tokens go in bare and come back as [JsonValue::Int] (or
/// [JsonValue::Float] if they overflow), everything else comes back as a [JsonValue::String].
pub fn classify_segments(tokens: &[String]) -> JsonResult<Vec<JsonValue>> {
    let elements: Vec<String> = tokens
        .iter()
        .map(|t| {
            if DIGITS.is_match(t) {
                t.clone()
            } else {
                format!("\"{}\"", escape(t))
            }
        })
        .collect();
    let text = format!("[{}]", elements.join(","));
    match parse(&text, &ParseOptions::default())? {
        JsonValue::Array(classified) => Ok(classified),
        _ => range_error!(Details::InvalidPointer(text)),
    }
}

impl Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for Pointer {
    fn from(text: &str) -> Self {
        Pointer::new(text)
    }
}

impl Selector for Pointer {
    fn select<'v>(&self, value: &'v JsonValue) -> JsonResult<&'v JsonValue> {
        self.resolve(value)
    }

    fn select_mut<'v>(&self, value: &'v mut JsonValue) -> JsonResult<&'v mut JsonValue> {
        self.resolve_mut(value)
    }
}

impl Index<&Pointer> for JsonValue {
    type Output = JsonValue;

    /// Unresolvable pointers yield the empty sentinel
    fn index(&self, pointer: &Pointer) -> &JsonValue {
        pointer.resolve(self).unwrap_or(&EMPTY_VALUE)
    }
}
