//! Context-driven lexer.
//!
//! The lexer never decides on its own what may come next. The parser hands it an [Expect] flag
//! set describing exactly which token categories are legal at the cursor, and the lexer matches
//! the remainder of the current line against a regular expression built from just those
//! categories. Compiled expressions for every reachable flag set are held in a process-wide
//! registry, built once on first use.
use std::collections::HashMap;
use std::sync::LazyLock;

use log::trace;
use regex::{Captures, Regex};

use crate::errors::{Details, JsonResult};
use crate::parser_error;

/// Which closing tokens are legal
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Closer {
    None,
    /// `}`
    Object,
    /// `}` or `,`
    ObjectOrComma,
    /// `]`
    Array,
    /// `]` or `,`
    ArrayOrComma,
}

/// Where we are with respect to an object key
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KeyState {
    None,
    /// The opening quote of a key
    Key,
    /// The colon following a key
    Colon,
}

/// Where a value, if one is legal, will end up
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    None,
    /// The value of an object member
    Member,
    /// The next element of an array
    Element,
    /// The whole document
    TopLevel,
}

/// The set of token categories legal at the current position
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Expect {
    /// The document is complete, only trailing whitespace and comments may follow
    pub finish: bool,
    /// `{` or `[`
    pub begin: bool,
    pub end: Closer,
    pub key: KeyState,
    pub value: Slot,
}

impl Expect {
    pub const NOTHING: Expect = Expect {
        finish: false,
        begin: false,
        end: Closer::None,
        key: KeyState::None,
        value: Slot::None,
    };
    pub const DOCUMENT: Expect = Expect {
        begin: true,
        value: Slot::TopLevel,
        ..Expect::NOTHING
    };
    pub const FINISHED: Expect = Expect {
        finish: true,
        ..Expect::NOTHING
    };
    pub const OBJECT_START: Expect = Expect {
        key: KeyState::Key,
        end: Closer::Object,
        ..Expect::NOTHING
    };
    pub const MEMBER_KEY: Expect = Expect {
        key: KeyState::Key,
        ..Expect::NOTHING
    };
    pub const COLON: Expect = Expect {
        key: KeyState::Colon,
        ..Expect::NOTHING
    };
    pub const MEMBER_VALUE: Expect = Expect {
        begin: true,
        value: Slot::Member,
        ..Expect::NOTHING
    };
    pub const ARRAY_START: Expect = Expect {
        begin: true,
        value: Slot::Element,
        end: Closer::Array,
        ..Expect::NOTHING
    };
    pub const ELEMENT: Expect = Expect {
        begin: true,
        value: Slot::Element,
        ..Expect::NOTHING
    };
    pub const AFTER_MEMBER: Expect = Expect {
        end: Closer::ObjectOrComma,
        ..Expect::NOTHING
    };
    pub const AFTER_ELEMENT: Expect = Expect {
        end: Closer::ArrayOrComma,
        ..Expect::NOTHING
    };

    /// Every flag set the parser can move into
    pub const REACHABLE: [Expect; 11] = [
        Expect::DOCUMENT,
        Expect::FINISHED,
        Expect::OBJECT_START,
        Expect::MEMBER_KEY,
        Expect::COLON,
        Expect::MEMBER_VALUE,
        Expect::ARRAY_START,
        Expect::ELEMENT,
        Expect::AFTER_MEMBER,
        Expect::AFTER_ELEMENT,
        Expect::NOTHING,
    ];

    pub fn is_empty(&self) -> bool {
        *self == Expect::NOTHING
    }

    /// The regex alternation matching only the legal tokens, or [None] if nothing but
    /// whitespace may follow
    pub fn alternation(&self, comments: bool) -> Option<String> {
        let mut alternatives: Vec<&str> = vec![];
        if comments {
            alternatives.push(r"//|/\*");
        }
        if self.begin {
            alternatives.push(r"\{|\[");
        }
        match self.end {
            Closer::None => (),
            Closer::Object => alternatives.push(r"\}"),
            Closer::ObjectOrComma => alternatives.push(r"\}|,"),
            Closer::Array => alternatives.push(r"\]"),
            Closer::ArrayOrComma => alternatives.push(r"\]|,"),
        }
        match self.key {
            KeyState::None => (),
            KeyState::Key => alternatives.push("\""),
            KeyState::Colon => alternatives.push(":"),
        }
        if self.value != Slot::None {
            // a leading '+' is deliberately not matched
            alternatives.push(r#""|true|false|null|-?[0-9]+(?:\.[0-9]*)?(?:[eE][+-]?[0-9]+)?"#);
        }
        if alternatives.is_empty() {
            None
        } else {
            Some(alternatives.join("|"))
        }
    }
}

/// Insignificant whitespace. Other Unicode spaces are not skipped.
pub const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

/// Compiled token matchers, keyed on flag set and whether comments are enabled
static TOKEN_PATTERNS: LazyLock<HashMap<(Expect, bool), Regex>> = LazyLock::new(|| {
    let mut patterns = HashMap::new();
    for expect in Expect::REACHABLE {
        for comments in [true, false] {
            if let Some(alternation) = expect.alternation(comments) {
                let re = Regex::new(&format!(r"^[ \t\r\n]*({})", alternation))
                    .expect("token alternations are valid expressions");
                patterns.insert((expect, comments), re);
            }
        }
    }
    patterns
});

/// The body of a string up to (and including) the next escape sequence or closing quote.
/// Groups: 1 literal text, 2 terminator, 3/4 surrogate pair halves, 5 single code unit.
static STRING_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)^(.*?)(",
        r"\\u([dD][89abAB][0-9a-fA-F]{2})\\u([dD][c-fC-F][0-9a-fA-F]{2})",
        r"|\\u([0-9a-fA-F]{4})",
        r#"|\\["\\/bfnrt]"#,
        r"|\\",
        r#"|")"#
    ))
    .expect("string segment expression is valid")
});

static INTEGER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("integer expression is valid"));

/// Enumeration of valid JSON tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A line or block comment, already skipped
    Comment,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Colon,
    Comma,
    Str(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// A packed token consists of a [Token] and the byte offset it started at
pub type PackedToken = (Token, usize);

/// Lexer over an in-memory document
pub struct Lexer<'a> {
    input: &'a str,
    cursor: usize,
    /// Offset just past the end of the line holding the cursor, valid while `cursor < line_end`
    line_end: usize,
    comments: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, comments: bool) -> Self {
        Lexer {
            input,
            cursor: 0,
            line_end: 0,
            comments,
        }
    }

    /// The input being lexed
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset into the input
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.input.len()
    }

    /// Offset just past the next newline, or the end of input. Only rescans once the cursor
    /// has left the line found last time.
    fn line_end(&mut self) -> usize {
        if self.cursor >= self.line_end {
            self.line_end = self.input[self.cursor..]
                .find('\n')
                .map_or(self.input.len(), |nl| self.cursor + nl + 1);
        }
        self.line_end
    }

    /// If nothing but whitespace remains on the current line, move to the next one
    pub fn skip_blank_line(&mut self) -> bool {
        let line_end = self.line_end();
        if self.input[self.cursor..line_end]
            .trim_matches(WHITESPACE)
            .is_empty()
        {
            self.cursor = line_end;
            true
        } else {
            false
        }
    }

    /// Consume the next token, which must be one of those allowed by `expect`
    pub fn consume(&mut self, expect: Expect) -> JsonResult<PackedToken> {
        let input = self.input;
        let line_end = self.line_end();
        let line = &input[self.cursor..line_end];
        let start = self.cursor + (line.len() - line.trim_start_matches(WHITESPACE).len());
        let lexeme = TOKEN_PATTERNS
            .get(&(expect, self.comments))
            .and_then(|re| re.captures(line))
            .and_then(|caps| Some((caps.get(0)?.end(), caps.get(1)?.as_str())));
        let Some((matched, lexeme)) = lexeme else {
            return parser_error!(Details::UnexpectedToken, input, start);
        };
        self.cursor += matched;
        trace!("lexeme {:?} at {}", lexeme, start);
        let token = match lexeme {
            "//" => {
                self.skip_line_comment();
                Token::Comment
            }
            "/*" => {
                self.skip_block_comment(start)?;
                Token::Comment
            }
            "{" => Token::StartObject,
            "}" => Token::EndObject,
            "[" => Token::StartArray,
            "]" => Token::EndArray,
            ":" => Token::Colon,
            "," => Token::Comma,
            "\"" => Token::Str(self.match_string(start)?),
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            "null" => Token::Null,
            number => self.match_number(number, start)?,
        };
        Ok((token, start))
    }

    fn skip_line_comment(&mut self) {
        self.cursor = self.line_end();
    }

    fn skip_block_comment(&mut self, start: usize) -> JsonResult<()> {
        match self.input[self.cursor..].find("*/") {
            Some(close) => {
                self.cursor += close + 2;
                Ok(())
            }
            None => parser_error!(Details::UnterminatedComment, self.input, start),
        }
    }

    /// Decode the body of a string literal, the opening quote having already been consumed.
    /// Strings may span lines.
    fn match_string(&mut self, start: usize) -> JsonResult<String> {
        let input = self.input;
        let mut result = String::new();
        loop {
            let rest = &input[self.cursor..];
            let Some(caps) = STRING_SEGMENT.captures(rest) else {
                return parser_error!(Details::UnterminatedString, self.input, start);
            };
            let literal = caps.get(1).map_or("", |m| m.as_str());
            let escape_at = self.cursor + literal.len();
            result.push_str(literal);
            self.cursor += caps.get(0).map_or(rest.len(), |m| m.end());
            match caps.get(2).map_or("", |m| m.as_str()) {
                "\"" => return Ok(result),
                "\\\"" => result.push('"'),
                "\\\\" => result.push('\\'),
                "\\/" => result.push('/'),
                "\\b" => result.push('\u{8}'),
                "\\f" => result.push('\u{c}'),
                "\\n" => result.push('\n'),
                "\\r" => result.push('\r'),
                "\\t" => result.push('\t'),
                escape if escape.starts_with("\\u") => {
                    result.push(decode_utf16_escape(&caps, escape, self.input, escape_at)?)
                }
                escape => {
                    let sequence: String = self.input[escape_at..].chars().take(2).collect();
                    trace!("bad escape {:?}", escape);
                    return parser_error!(
                        Details::InvalidEscapeSequence(sequence),
                        self.input,
                        escape_at
                    );
                }
            }
        }
    }

    /// Integer-only literals become [Token::Integer] unless they overflow, everything else
    /// (and any overflow) becomes [Token::Float]
    fn match_number(&self, literal: &str, start: usize) -> JsonResult<Token> {
        if INTEGER_LITERAL.is_match(literal) {
            if let Some(value) = parse_integer(literal) {
                return Ok(Token::Integer(value));
            }
        }
        match fast_float::parse::<f64, _>(literal) {
            Ok(value) if value.is_finite() => Ok(Token::Float(value)),
            _ => parser_error!(
                Details::InvalidNumericRepresentation(literal.to_string()),
                self.input,
                start
            ),
        }
    }
}

/// Turn a `\uXXXX` (or `\uXXXX\uXXXX` surrogate pair) escape into a char. Lone surrogates are
/// rejected.
fn decode_utf16_escape(
    caps: &Captures,
    escape: &str,
    input: &str,
    offset: usize,
) -> JsonResult<char> {
    let hex = |group: usize| {
        caps.get(group)
            .and_then(|m| u32::from_str_radix(m.as_str(), 16).ok())
    };
    let code = match (hex(3), hex(4), hex(5)) {
        (Some(high), Some(low), _) => Some(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)),
        (_, _, single) => single,
    };
    match code.and_then(char::from_u32) {
        Some(c) => Ok(c),
        None => parser_error!(
            Details::InvalidUnicodeEscapeSequence(escape.to_string()),
            input,
            offset
        ),
    }
}

#[cfg(feature = "mixed_numerics")]
fn parse_integer(literal: &str) -> Option<i64> {
    lexical::parse::<i64, _>(literal).ok()
}

#[cfg(not(feature = "mixed_numerics"))]
fn parse_integer(literal: &str) -> Option<i64> {
    literal.parse::<i64>().ok()
}
