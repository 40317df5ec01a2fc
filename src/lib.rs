//! An in-memory JSON document model.
//!
//! Documents are parsed from text (or bytes, via [Parser::parse_bytes]) into a [JsonValue] tree,
//! which can be navigated, modified and written back out in compact form. Members of the tree
//! can also be addressed with RFC 6901 [Pointer]s.
//!
//! ```
//! use chisel_dom::{JsonValue, Pointer};
//!
//! let mut doc = JsonValue::parse(r#"{"n":-12345.6,"list":[32,"ABC"],"b":true,"c":null}"#).unwrap();
//! assert_eq!(doc["list"][1].get::<&str>(), "ABC");
//! assert_eq!(doc.at(&Pointer::new("/list/0")).unwrap().get::<i64>(), 32);
//! doc["list"][3] = JsonValue::from("D");
//! assert_eq!(doc["list"].stringify(), r#"[32,"ABC",null,"D"]"#);
//! ```
pub mod coords;
pub mod decoders;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod pointer;
pub mod serializer;
pub mod value;

pub use decoders::Encoding;
pub use errors::{Details, Error, ErrorKind, JsonResult};
pub use parser::{parse, ParseOptions, Parser};
pub use pointer::Pointer;
pub use value::{Array, Erase, Extract, JsonValue, Kind, Map, Selector};

/// The version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
