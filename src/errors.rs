//! General error types for parsing and checked navigation

use std::fmt::{Display, Formatter};

use crate::coords::Coords;

/// Global result type used throughout the crate
pub type JsonResult<T> = Result<T, Error>;

/// Maximum number of bytes of remaining input captured alongside a parse error
pub const SNIPPET_LENGTH: usize = 16;

/// The two families of failure the crate can produce
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input found during a parse
    Parse,
    /// A checked lookup (`at` and friends) didn't find what it was asked for
    Range,
}

/// A global enumeration of error details
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    ZeroLengthInput,
    NonUtf8InputDetected,
    NonAsciiInputDetected,
    EndOfInput,
    UnexpectedToken,
    MisplacedValue,
    UnterminatedString,
    UnterminatedComment,
    InvalidEscapeSequence(String),
    InvalidUnicodeEscapeSequence(String),
    InvalidNumericRepresentation(String),
    MaxDepthExceeded(usize),
    NotAMap,
    NotAnArray,
    KeyNotFound(String),
    IndexOutOfRange(usize),
    InvalidPointer(String),
    InvalidPointerSegment(String),
}

impl Display for Details {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Details::ZeroLengthInput => write!(f, "zero length input"),
            Details::NonUtf8InputDetected => write!(f, "non-UTF8 input"),
            Details::NonAsciiInputDetected => write!(f, "non-ASCII input"),
            Details::EndOfInput => write!(f, "unexpected end of input"),
            Details::UnexpectedToken => write!(f, "unexpected token"),
            Details::MisplacedValue => write!(f, "value found where none is allowed"),
            Details::UnterminatedString => write!(f, "unterminated string"),
            Details::UnterminatedComment => write!(f, "unterminated block comment"),
            Details::InvalidEscapeSequence(s) => write!(f, "invalid escape sequence '{}'", s),
            Details::InvalidUnicodeEscapeSequence(s) => {
                write!(f, "invalid unicode escape sequence '{}'", s)
            }
            Details::InvalidNumericRepresentation(s) => {
                write!(f, "invalid numeric representation '{}'", s)
            }
            Details::MaxDepthExceeded(depth) => {
                write!(f, "maximum nesting depth of {} exceeded", depth)
            }
            Details::NotAMap => write!(f, "not map"),
            Details::NotAnArray => write!(f, "not array"),
            Details::KeyNotFound(key) => write!(f, "invalid key '{}'", key),
            Details::IndexOutOfRange(index) => write!(f, "invalid index {}", index),
            Details::InvalidPointer(p) => write!(f, "invalid pointer '{}'", p),
            Details::InvalidPointerSegment(s) => write!(f, "invalid pointer segment '{}'", s),
        }
    }
}

/// The general error structure
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Which family the error belongs to
    pub kind: ErrorKind,
    /// The global error code for the error
    pub details: Details,
    /// Position within the input, only present for parse errors
    pub coords: Option<Coords>,
    /// Up to [SNIPPET_LENGTH] bytes of the input remaining at the point of failure
    pub snippet: Option<String>,
}

impl Error {
    /// Build a parse error positioned at byte `offset` of `input`
    pub fn parse(details: Details, input: &str, offset: usize) -> Self {
        let coords = Coords::locate(input, offset);
        let rest = &input[coords.absolute..];
        let mut end = rest.len().min(SNIPPET_LENGTH);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        Error {
            kind: ErrorKind::Parse,
            details,
            coords: Some(coords),
            snippet: Some(rest[..end].to_string()),
        }
    }

    /// Build a range error
    pub fn range(details: Details) -> Self {
        Error {
            kind: ErrorKind::Range,
            details,
            coords: None,
            snippet: None,
        }
    }

    /// Byte offset into the input at which a parse error was raised
    pub fn offset(&self) -> Option<usize> {
        self.coords.map(|c| c.absolute)
    }

    pub fn is_parse(&self) -> bool {
        self.kind == ErrorKind::Parse
    }

    pub fn is_range(&self) -> bool {
        self.kind == ErrorKind::Range
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::Parse => write!(f, "parse error: {}", self.details)?,
            ErrorKind::Range => write!(f, "out of range: {}", self.details)?,
        }
        if let Some(coords) = self.coords {
            write!(f, " at {}", coords)?;
        }
        if let Some(snippet) = &self.snippet {
            write!(f, " near {:?}", snippet)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! parser_error {
    ($details: expr, $input: expr, $offset: expr) => {
        Err($crate::errors::Error::parse($details, $input, $offset))
    };
}

#[macro_export]
macro_rules! range_error {
    ($details: expr) => {
        Err($crate::errors::Error::range($details))
    };
}
