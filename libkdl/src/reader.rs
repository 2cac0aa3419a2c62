//! Positioned reader
//!
//! A cursor over a buffered byte stream that decodes UTF-8 one character at a
//! time. It keeps a small lookahead window so the scanners can test fixed byte
//! sequences (`/-`, `//`, `r#`, ...) and peek a character without consuming it,
//! and it tracks the line and column of the next unread character.

use std::collections::VecDeque;
use std::io::{BufRead, ErrorKind as IoErrorKind};

use crate::chars::is_newline;
use crate::error::{ErrorKind, ParseContext, ParseError, Result};

/// Buffered cursor with line/column bookkeeping.
///
/// End of input is reported as `None` from the peek/read methods; only real
/// failures (decoding, I/O) are errors.
pub struct PositionedReader<R> {
    inner: R,
    lookahead: VecDeque<u8>,
    line: usize,
    column: usize,
    depth: usize,
}

impl<R: BufRead> PositionedReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookahead: VecDeque::new(),
            line: 1,
            column: 0,
            depth: 0,
        }
    }

    /// Current line, 1-based.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Characters consumed on the current line.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of children blocks currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Record entry into a children block.
    pub fn enter_block(&mut self, ctx: &ParseContext) -> Result<()> {
        if self.depth >= ctx.max_depth {
            return Err(self.error(
                ErrorKind::NestingTooDeep,
                format!("more than {} nested children blocks", ctx.max_depth),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Record exit from a children block.
    pub fn leave_block(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Build an error stamped with the current position.
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message).at(self.line, self.column)
    }

    /// Make sure at least `n` bytes are buffered. Returns `false` if the
    /// stream ends first.
    fn fill(&mut self, n: usize) -> Result<bool> {
        while self.lookahead.len() < n {
            let (line, column) = (self.line, self.column);
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
                Err(e) => return Err(ParseError::io(e).at(line, column)),
            };
            if buf.is_empty() {
                return Ok(false);
            }
            let take = buf.len().min(n - self.lookahead.len());
            self.lookahead.extend(&buf[..take]);
            self.inner.consume(take);
        }
        Ok(true)
    }

    /// Test whether the next bytes equal `expected`, without advancing.
    pub fn is_next(&mut self, expected: &[u8]) -> Result<bool> {
        if !self.fill(expected.len())? {
            return Ok(false);
        }
        Ok(self.lookahead.iter().take(expected.len()).eq(expected.iter()))
    }

    /// Decode the next character without advancing.
    pub fn peek_rune(&mut self) -> Result<Option<char>> {
        self.peek_rune_at(0)
    }

    /// Decode the character starting `offset` bytes ahead, without advancing.
    pub fn peek_rune_at(&mut self, offset: usize) -> Result<Option<char>> {
        if !self.fill(offset + 1)? {
            return Ok(None);
        }
        let width = match utf8_width(self.lookahead[offset]) {
            Some(width) => width,
            None => return Err(self.error(ErrorKind::InvalidUtf8, "invalid leading byte")),
        };
        if !self.fill(offset + width)? {
            return Err(self.error(ErrorKind::InvalidUtf8, "truncated character"));
        }
        let mut bytes = [0u8; 4];
        for (i, b) in bytes.iter_mut().take(width).enumerate() {
            *b = self.lookahead[offset + i];
        }
        match std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
        {
            Some(ch) => Ok(Some(ch)),
            None => Err(self.error(ErrorKind::InvalidUtf8, "invalid character encoding")),
        }
    }

    /// Decode and consume the next character.
    pub fn read_rune(&mut self) -> Result<Option<char>> {
        let ch = match self.peek_rune()? {
            Some(ch) => ch,
            None => return Ok(None),
        };
        for _ in 0..ch.len_utf8() {
            self.lookahead.pop_front();
        }
        self.advance(ch)?;
        Ok(Some(ch))
    }

    /// Consume `n` bytes. Callers only discard whole characters, so the
    /// bookkeeping is the same as for `read_rune`.
    pub fn discard(&mut self, n: usize) -> Result<()> {
        let mut consumed = 0;
        while consumed < n {
            match self.read_rune()? {
                Some(ch) => consumed += ch.len_utf8(),
                None => break,
            }
        }
        Ok(())
    }

    /// Consume `n` characters.
    pub fn discard_runes(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            if self.read_rune()?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Consume one line break, treating CRLF as a single break.
    pub fn discard_newline(&mut self) -> Result<()> {
        if self.is_next(b"\r\n")? {
            self.discard(2)
        } else {
            self.discard_runes(1)
        }
    }

    fn advance(&mut self, ch: char) -> Result<()> {
        // The LF of a CRLF pair does the line bump.
        if ch == '\r' && self.is_next(b"\n")? {
            return Ok(());
        }
        if is_newline(ch) {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Ok(())
    }
}

/// Width of a UTF-8 sequence from its leading byte.
fn utf8_width(b: u8) -> Option<usize> {
    match b {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}
