//! KDL document parser.
//!
//! KDL is a node-based document format: every line holds a node with a name,
//! positional arguments, `key=value` properties and an optional `{ }` block
//! of child nodes. Values are strings, arbitrary-precision numbers, booleans
//! and null, each with an optional `(type)` hint.
//!
//! # Parsing Pipeline
//!
//! The parser is a single recursive-descent pass:
//!
//! 1. **Reader**: decodes UTF-8 from a buffered byte stream, tracking line
//!    and column for error messages.
//!
//! 2. **Scanners**: recognize one lexeme each (identifiers, strings, numbers,
//!    keywords, type hints) and skip comments and whitespace.
//!
//! 3. **Node Parser**: drives the scanners to build nodes, handling
//!    slashdash comments, line continuations and children blocks.

mod chars;
mod error;
mod node;
mod parser;
mod reader;
mod scanner;
mod value;

use std::io::BufRead;

use log::debug;

pub use error::{ErrorKind, ParseContext, ParseError, Result, DEFAULT_MAX_DEPTH};
pub use node::{Document, Node};
pub use reader::PositionedReader;
pub use value::{Decimal, Identifier, Scalar, Value};

/// Parse a KDL document from a string.
///
/// # Example
///
/// ```
/// use libkdl::parse;
///
/// let doc = parse("node 1 key=\"val\" { child; }").unwrap();
/// assert_eq!(doc.nodes()[0].get("key").and_then(|v| v.as_str()), Some("val"));
/// ```
pub fn parse(input: &str) -> Result<Document> {
    parse_with_filename(input, None)
}

/// Parse a KDL document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Document> {
    let ctx = ParseContext::new(filename);
    parse_reader_with_context(input.as_bytes(), &ctx)
}

/// Parse a KDL document from a buffered byte stream.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Document> {
    parse_reader_with_context(reader, &ParseContext::default())
}

/// Parse a KDL document from a buffered byte stream with explicit settings.
pub fn parse_reader_with_context<R: BufRead>(reader: R, ctx: &ParseContext) -> Result<Document> {
    let mut r = PositionedReader::new(reader);
    match parser::parse_document(&mut r, ctx) {
        Ok(doc) => {
            debug!(
                "parsed {} top-level nodes over {} lines",
                doc.len(),
                r.line()
            );
            Ok(doc)
        }
        Err(err) => {
            let err = err.with_context(ctx);
            debug!("parse failed: {}", err);
            Err(err)
        }
    }
}
