//! Documents handed over as raw bytes are first run through a decoder, turning a stream of bytes
//! into a stream of `char`s which is then collected into the text the parser works over.
//!
//! The [DecoderSelector] implemented within this module is used to instantiate new `char`
//! iterators, based on different encodings. (Currently only ASCII and UTF-8 are supported).
use chisel_decoders::{ascii::AsciiDecoder, utf8::Utf8Decoder};
use std::io::{BufRead, BufReader};

use crate::errors::{Details, JsonResult};
use crate::parser_error;

/// Enumeration of different supported encoding types
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
}

impl Default for Encoding {
    #[cfg(feature = "default_utf8_encoding")]
    fn default() -> Self {
        Self::Utf8
    }

    #[cfg(not(feature = "default_utf8_encoding"))]
    fn default() -> Self {
        Self::Ascii
    }
}

/// A struct that is essentially a factory for creating new instances of [char] iterators,
/// based on a specified encoding type
#[derive(Debug, Default, Copy, Clone)]
pub(crate) struct DecoderSelector {}

impl DecoderSelector {
    /// Create and return an instance of a given byte decoder / char iterator based on a specific
    /// encoding
    pub fn new_decoder<'a, Buffer: BufRead>(
        &'a self,
        buffer: &'a mut Buffer,
        encoding: Encoding,
    ) -> Box<dyn Iterator<Item = char> + 'a> {
        match encoding {
            Encoding::Ascii => Box::new(AsciiDecoder::new(buffer)),
            Encoding::Utf8 => Box::new(Utf8Decoder::new(buffer)),
        }
    }

    /// Decode a complete byte slice into text. The decoders stop at the first byte they can't
    /// handle, so anything short of the whole slice is an error, positioned at the bad byte.
    pub fn decode(&self, bytes: &[u8], encoding: Encoding) -> JsonResult<String> {
        if encoding == Encoding::Utf8 {
            if let Err(err) = std::str::from_utf8(bytes) {
                let valid = std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default();
                return parser_error!(Details::NonUtf8InputDetected, valid, valid.len());
            }
        }
        let mut reader = BufReader::new(bytes);
        let decoded: String = self.new_decoder(&mut reader, encoding).collect();
        if decoded.len() < bytes.len() {
            let details = match encoding {
                Encoding::Utf8 => Details::NonUtf8InputDetected,
                Encoding::Ascii => Details::NonAsciiInputDetected,
            };
            return parser_error!(details, &decoded, decoded.len());
        }
        Ok(decoded)
    }
}
