//! Error types for KDL parsing.

use thiserror::Error;

/// Result type for KDL parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Default bound on children-block nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parse context carrying configuration for a single parse call.
#[derive(Clone, Debug)]
pub struct ParseContext {
    /// Name of the source, used only to decorate error messages.
    pub filename: Option<String>,
    /// Maximum nesting depth of children blocks.
    pub max_depth: usize,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Bound the nesting depth of children blocks.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Category of a parse failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Generic grammar violation.
    #[error("Invalid syntax")]
    InvalidSyntax,

    /// Character not allowed inside an identifier.
    #[error("Invalid character for key")]
    InvalidKeyChar,

    /// Bare identifier that reads as a number or keyword.
    #[error("Invalid bare identifier")]
    InvalidBareIdentifier,

    /// Bare identifier starting with a digit or a non-identifier character.
    #[error("Invalid initial character in bare identifier")]
    InvalidInitialChar,

    /// Digits missing or malformed in a number.
    #[error("Invalid numeric value")]
    InvalidNumericValue,

    /// Input ended where more content was required.
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    /// Input is not valid UTF-8.
    #[error("Invalid UTF-8")]
    InvalidUtf8,

    /// The underlying stream failed.
    #[error("I/O error")]
    Io,

    /// Children blocks nested beyond the configured depth.
    #[error("Nesting too deep")]
    NestingTooDeep,
}

/// Error type for KDL parsing.
///
/// Carries the position of the reader at the moment of failure: `line` is
/// 1-based, `column` counts the characters already consumed on that line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}{}", location(.line, .column, .filename))]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub filename: Option<String>,
}

fn location(line: &usize, column: &usize, filename: &Option<String>) -> String {
    match filename {
        Some(name) => format!(" at {}:{} of <{}>", line, column, name),
        None => format!(" at {}:{}", line, column),
    }
}

impl ParseError {
    /// Create an error with no position attached yet.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: 0,
            column: 0,
            filename: None,
        }
    }

    /// Attach a position.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Attach the filename from a parse context.
    pub fn with_context(mut self, ctx: &ParseContext) -> Self {
        self.filename = ctx.filename.clone();
        self
    }

    /// Wrap a failure of the underlying stream.
    pub fn io(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}
