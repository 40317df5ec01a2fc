//! The DOM parser
//!
//! Parsing is driven by an [Expect] flag set rather than a grammar: every handler leaves behind
//! the set of tokens that may legally follow, and the lexer only ever looks for those. Open
//! containers are kept on an ancestor stack of [Frame]s, innermost on top, and are folded into
//! their parent as they close. Nothing is handed back unless the whole input parses.
use log::{debug, trace};

use crate::decoders::{DecoderSelector, Encoding};
use crate::errors::{Details, JsonResult};
use crate::lexer::{Expect, KeyState, Lexer, Slot, Token, WHITESPACE};
use crate::parser_error;
use crate::value::{JsonValue, Kind};

/// Default ceiling on the nesting depth of arrays and objects
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options controlling a parse
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Skip `//` and `/* */` comments. When disabled a comment is an unexpected token.
    pub comment: bool,
    /// Maximum number of nested arrays/objects
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            comment: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn with_comments(mut self, comment: bool) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parse a complete document
pub fn parse(text: &str, options: &ParseOptions) -> JsonResult<JsonValue> {
    State::new(text, options).run()
}

impl JsonValue {
    /// Parse a document using the default [ParseOptions]
    pub fn parse(text: &str) -> JsonResult<JsonValue> {
        parse(text, &ParseOptions::default())
    }

    pub fn parse_with(text: &str, options: &ParseOptions) -> JsonResult<JsonValue> {
        parse(text, options)
    }
}

/// Main JSON parser struct
#[derive(Debug, Default, Copy, Clone)]
pub struct Parser {
    decoders: DecoderSelector,
    encoding: Encoding,
    options: ParseOptions,
}

impl Parser {
    /// Create a new instance of the parser using a specific [Encoding] for byte input
    pub fn with_encoding(encoding: Encoding) -> Self {
        Self {
            encoding,
            ..Default::default()
        }
    }

    /// Create a new instance of the parser using a specific set of [ParseOptions]
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn parse_str(&self, str: &str) -> JsonResult<JsonValue> {
        parse(str, &self.options)
    }

    /// Decode `bytes` using the configured [Encoding] and parse the result. Bytes that aren't
    /// valid in the encoding fail the whole parse.
    pub fn parse_bytes(&self, bytes: &[u8]) -> JsonResult<JsonValue> {
        let text = self.decoders.decode(bytes, self.encoding)?;
        self.parse_str(&text)
    }
}

/// An open slot on the ancestor stack. A frame either holds a container that is still being
/// filled, or (for object members) a fresh slot waiting for its value.
#[derive(Debug)]
struct Frame {
    value: JsonValue,
    /// Set when the frame is the value of an object member
    key: Option<String>,
}

impl Frame {
    fn new(value: JsonValue, key: Option<String>) -> Self {
        Frame { value, key }
    }
}

/// Private per-parse state
struct State<'a> {
    lexer: Lexer<'a>,
    expect: Expect,
    /// Ancestor stack; the bottom frame is the document itself
    frames: Vec<Frame>,
    depth: usize,
    max_depth: usize,
}

impl<'a> State<'a> {
    fn new(text: &'a str, options: &ParseOptions) -> Self {
        State {
            lexer: Lexer::new(text, options.comment),
            expect: Expect::DOCUMENT,
            frames: vec![Frame::new(JsonValue::Null, None)],
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    fn input(&self) -> &'a str {
        self.lexer.input()
    }

    fn run(mut self) -> JsonResult<JsonValue> {
        debug!("parsing {} bytes", self.input().len());
        let result = self.drive();
        match &result {
            Ok(value) => debug!("parsed a {} from {} bytes", value.kind(), self.input().len()),
            Err(err) => debug!("parse failed: {}", err),
        }
        result
    }

    fn drive(&mut self) -> JsonResult<JsonValue> {
        if self.input().trim_matches(WHITESPACE).is_empty() {
            return parser_error!(Details::ZeroLengthInput, self.input(), self.input().len());
        }
        loop {
            if self.expect.is_empty() || self.frames.is_empty() {
                return parser_error!(Details::UnexpectedToken, self.input(), self.lexer.position());
            }
            if self.lexer.at_end() {
                if !self.expect.finish {
                    return parser_error!(Details::EndOfInput, self.input(), self.lexer.position());
                }
                break;
            }
            if self.lexer.skip_blank_line() {
                continue;
            }
            let (token, offset) = self.lexer.consume(self.expect)?;
            trace!("{:?} at {} with {:?}", token, offset, self.expect);
            self.dispatch(token, offset)?;
        }
        match self.frames.pop() {
            Some(frame) if self.frames.is_empty() => Ok(frame.value),
            _ => parser_error!(Details::EndOfInput, self.input(), self.lexer.position()),
        }
    }

    fn dispatch(&mut self, token: Token, offset: usize) -> JsonResult<()> {
        match token {
            Token::Comment => Ok(()),
            Token::StartObject => {
                self.open(JsonValue::Map(Default::default()), offset)?;
                self.expect = Expect::OBJECT_START;
                Ok(())
            }
            Token::StartArray => {
                self.open(JsonValue::Array(Default::default()), offset)?;
                self.expect = Expect::ARRAY_START;
                Ok(())
            }
            Token::EndObject if self.top_kind() == Some(Kind::Map) => self.close(offset),
            Token::EndArray if self.top_kind() == Some(Kind::Array) => self.close(offset),
            Token::Comma if self.expect == Expect::AFTER_MEMBER => {
                self.expect = Expect::MEMBER_KEY;
                Ok(())
            }
            Token::Comma if self.expect == Expect::AFTER_ELEMENT => {
                self.expect = Expect::ELEMENT;
                Ok(())
            }
            // closers and commas that don't fit are never offered by the alternation
            Token::EndObject | Token::EndArray | Token::Comma => {
                parser_error!(Details::UnexpectedToken, self.input(), offset)
            }
            Token::Colon => {
                self.expect = Expect::MEMBER_VALUE;
                Ok(())
            }
            Token::Str(text) if self.expect.key == KeyState::Key => {
                // a repeated key starts from a fresh slot, so the last declaration wins
                self.frames.push(Frame::new(JsonValue::Null, Some(text)));
                self.expect = Expect::COLON;
                Ok(())
            }
            Token::Str(text) => self.set_value(JsonValue::String(text), offset),
            Token::Integer(value) => self.set_value(JsonValue::Int(value), offset),
            Token::Float(value) => self.set_value(JsonValue::Float(value), offset),
            Token::Bool(value) => self.set_value(JsonValue::Bool(value), offset),
            Token::Null => self.set_value(JsonValue::Null, offset),
        }
    }

    fn top_kind(&self) -> Option<Kind> {
        self.frames.last().map(|frame| frame.value.kind())
    }

    fn top_mut(&mut self) -> Option<&mut JsonValue> {
        self.frames.last_mut().map(|frame| &mut frame.value)
    }

    /// Start a new container: appended to an enclosing array, or installed into a fresh slot
    fn open(&mut self, container: JsonValue, offset: usize) -> JsonResult<()> {
        if self.depth >= self.max_depth {
            return parser_error!(Details::MaxDepthExceeded(self.max_depth), self.input(), offset);
        }
        match self.top_kind() {
            Some(Kind::Array) => self.frames.push(Frame::new(container, None)),
            Some(Kind::Null) => {
                if let Some(slot) = self.top_mut() {
                    *slot = container
                }
            }
            _ => return parser_error!(Details::MisplacedValue, self.input(), offset),
        }
        self.depth += 1;
        Ok(())
    }

    /// Pop the innermost container, folding it into its parent
    fn close(&mut self, offset: usize) -> JsonResult<()> {
        self.depth = self.depth.saturating_sub(1);
        if self.frames.len() <= 1 {
            self.expect = Expect::FINISHED;
            return Ok(());
        }
        match self.frames.pop() {
            Some(frame) => self.fold(frame, offset),
            None => parser_error!(Details::UnexpectedToken, self.input(), offset),
        }
    }

    /// Place a completed frame into the frame beneath it and work out what may follow
    fn fold(&mut self, frame: Frame, offset: usize) -> JsonResult<()> {
        let Frame { value, key } = frame;
        let next = match key {
            Some(key) => match self.top_mut() {
                Some(JsonValue::Map(map)) => {
                    map.insert(key, value);
                    Expect::AFTER_MEMBER
                }
                _ => return parser_error!(Details::MisplacedValue, self.input(), offset),
            },
            None => match self.top_mut() {
                Some(JsonValue::Array(array)) => {
                    array.push(value);
                    Expect::AFTER_ELEMENT
                }
                _ => return parser_error!(Details::MisplacedValue, self.input(), offset),
            },
        };
        self.expect = next;
        Ok(())
    }

    /// Route a scalar to wherever the current flags say values go
    fn set_value(&mut self, value: JsonValue, offset: usize) -> JsonResult<()> {
        let input = self.input();
        match self.expect.value {
            Slot::Member => match self.frames.pop() {
                Some(frame) if frame.key.is_some() && frame.value.is_null() => {
                    self.fold(Frame::new(value, frame.key), offset)
                }
                _ => parser_error!(Details::MisplacedValue, input, offset),
            },
            Slot::Element => match self.top_mut() {
                Some(JsonValue::Array(array)) => {
                    array.push(value);
                    self.expect = Expect::AFTER_ELEMENT;
                    Ok(())
                }
                _ => parser_error!(Details::MisplacedValue, input, offset),
            },
            Slot::TopLevel => match self.top_mut() {
                Some(slot) => {
                    *slot = value;
                    self.expect = Expect::FINISHED;
                    Ok(())
                }
                None => parser_error!(Details::MisplacedValue, input, offset),
            },
            Slot::None => parser_error!(Details::MisplacedValue, input, offset),
        }
    }
}
