//! Lexical scanners
//!
//! Each scanner recognizes one lexical class starting at the reader's cursor
//! and leaves the cursor immediately after the lexeme:
//! - identifiers: bare, quoted (`"..."`) and raw (`r#"..."#`)
//! - quoted strings with escapes, raw strings without
//! - numbers in decimal, hex, octal and binary, with `_` separators
//! - the keywords `true`, `false` and `null`
//! - type hints: `(identifier)`
//! - insignificant content: whitespace, `//` and nested `/* */` comments,
//!   and line continuations
//!
//! Scanners never look further ahead than a delimiter needs and never call
//! back into the node parser.

use std::io::BufRead;

use num_bigint::BigInt;

use crate::chars::{ends_identifier, is_identifier_char, is_newline, is_whitespace, KEYWORDS};
use crate::error::{ErrorKind, Result};
use crate::reader::PositionedReader;
use crate::value::{Decimal, Identifier, Scalar, Value};

/// Where a bare identifier stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Node names and type hints; `=` is not allowed.
    Freestanding,
    /// Property keys; `=` ends the identifier.
    Equals,
}

/// An identifier together with how it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedIdent {
    pub ident: Identifier,
    /// Written as a quoted or raw string.
    pub quoted: bool,
}

// ============================================================================
// Identifiers
// ============================================================================

/// Read a quoted, raw or bare identifier.
pub fn read_identifier<R: BufRead>(
    r: &mut PositionedReader<R>,
    mode: StopMode,
) -> Result<ScannedIdent> {
    if r.is_next(b"\"")? {
        let text = read_quoted_string(r)?;
        return Ok(ScannedIdent {
            ident: Identifier::new(text),
            quoted: true,
        });
    }
    if is_raw_start(r)? {
        let text = read_raw_string(r)?;
        return Ok(ScannedIdent {
            ident: Identifier::new(text),
            quoted: true,
        });
    }
    let ident = read_bare_identifier(r, mode)?;
    Ok(ScannedIdent {
        ident,
        quoted: false,
    })
}

/// Read a bare identifier.
///
/// Nothing is consumed when the first character already rules the
/// identifier out.
pub fn read_bare_identifier<R: BufRead>(
    r: &mut PositionedReader<R>,
    mode: StopMode,
) -> Result<Identifier> {
    let first = match r.peek_rune()? {
        Some(ch) => ch,
        None => return Err(r.error(ErrorKind::UnexpectedEndOfInput, "expected an identifier")),
    };
    if first.is_ascii_digit() || !is_identifier_char(first) {
        return Err(r.error(
            ErrorKind::InvalidInitialChar,
            format!("identifier cannot start with '{}'", first.escape_debug()),
        ));
    }
    if (first == '-' || first == '+') && next_is_digit(r, 1)? {
        return Err(r.error(
            ErrorKind::InvalidBareIdentifier,
            "identifier cannot look like a number",
        ));
    }

    let mut text = String::new();
    while let Some(ch) = r.peek_rune()? {
        if ends_identifier(ch) || (mode == StopMode::Equals && ch == '=') {
            break;
        }
        if !is_identifier_char(ch) {
            return Err(r.error(
                ErrorKind::InvalidKeyChar,
                format!("'{}' is not allowed in an identifier", ch.escape_debug()),
            ));
        }
        text.push(ch);
        r.discard_runes(1)?;
    }

    if KEYWORDS.contains(&text.as_str()) {
        return Err(r.error(
            ErrorKind::InvalidBareIdentifier,
            format!("'{}' is a keyword, not an identifier", text),
        ));
    }
    Ok(Identifier::new(text))
}

/// Whether the next token reads as an identifier rather than a value.
/// Does not advance.
pub fn at_identifier<R: BufRead>(r: &mut PositionedReader<R>) -> Result<bool> {
    let ch = match r.peek_rune()? {
        Some(ch) => ch,
        None => return Ok(false),
    };
    if ch == '"' || is_raw_start(r)? {
        return Ok(true);
    }
    if ch.is_ascii_digit() || !is_identifier_char(ch) {
        return Ok(false);
    }
    if (ch == '-' || ch == '+') && next_is_digit(r, 1)? {
        return Ok(false);
    }
    for keyword in KEYWORDS {
        if r.is_next(keyword.as_bytes())? {
            let after = r.peek_rune_at(keyword.len())?;
            if after.map_or(true, |c| !is_identifier_char(c)) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// `r`, any run of `#`, then `"`. Anything else starting with `r` is a bare
/// identifier.
fn is_raw_start<R: BufRead>(r: &mut PositionedReader<R>) -> Result<bool> {
    if !r.is_next(b"r")? {
        return Ok(false);
    }
    let mut offset = 1;
    while r.peek_rune_at(offset)? == Some('#') {
        offset += 1;
    }
    Ok(r.peek_rune_at(offset)? == Some('"'))
}

fn next_is_digit<R: BufRead>(r: &mut PositionedReader<R>, offset: usize) -> Result<bool> {
    Ok(matches!(r.peek_rune_at(offset)?, Some(c) if c.is_ascii_digit()))
}

// ============================================================================
// Strings
// ============================================================================

/// Read a quoted or raw string.
pub fn read_string<R: BufRead>(r: &mut PositionedReader<R>) -> Result<String> {
    if is_raw_start(r)? {
        read_raw_string(r)
    } else {
        read_quoted_string(r)
    }
}

/// Read a `"`-delimited string, processing escapes.
pub fn read_quoted_string<R: BufRead>(r: &mut PositionedReader<R>) -> Result<String> {
    match r.peek_rune()? {
        Some('"') => r.discard(1)?,
        Some(ch) => {
            return Err(r.error(
                ErrorKind::InvalidSyntax,
                format!("expected '\"' to open a string, found '{}'", ch.escape_debug()),
            ))
        }
        None => return Err(r.error(ErrorKind::UnexpectedEndOfInput, "expected a string")),
    }

    let mut out = String::new();
    loop {
        match r.read_rune()? {
            Some('"') => return Ok(out),
            Some('\\') => out.push(read_escape(r)?),
            Some(ch) => out.push(ch),
            None => return Err(r.error(ErrorKind::InvalidSyntax, "unterminated string")),
        }
    }
}

/// Read the escape following a backslash.
fn read_escape<R: BufRead>(r: &mut PositionedReader<R>) -> Result<char> {
    let ch = match r.read_rune()? {
        Some(ch) => ch,
        None => return Err(r.error(ErrorKind::InvalidSyntax, "unterminated string")),
    };
    match ch {
        '"' => Ok('"'),
        '\\' => Ok('\\'),
        '/' => Ok('/'),
        'b' => Ok('\u{8}'),
        'f' => Ok('\u{C}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'u' => read_unicode_escape(r),
        _ => Err(r.error(
            ErrorKind::InvalidSyntax,
            format!("invalid escape '\\{}'", ch.escape_debug()),
        )),
    }
}

/// Read the `{XXXXXX}` part of a `\u{XXXXXX}` escape.
fn read_unicode_escape<R: BufRead>(r: &mut PositionedReader<R>) -> Result<char> {
    if r.read_rune()? != Some('{') {
        return Err(r.error(ErrorKind::InvalidSyntax, "expected '{' after '\\u'"));
    }
    let mut hex = String::new();
    loop {
        match r.read_rune()? {
            Some('}') => break,
            Some(ch) if ch.is_ascii_hexdigit() && hex.len() < 6 => hex.push(ch),
            Some(_) => return Err(r.error(ErrorKind::InvalidSyntax, "bad unicode escape")),
            None => return Err(r.error(ErrorKind::InvalidSyntax, "unterminated string")),
        }
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| r.error(ErrorKind::InvalidSyntax, "bad unicode escape"))
}

/// Read an `r#"..."#` string. The closing quote must be followed by as many
/// `#` as the opening one; no escapes are processed.
pub fn read_raw_string<R: BufRead>(r: &mut PositionedReader<R>) -> Result<String> {
    if !r.is_next(b"r")? {
        return Err(r.error(ErrorKind::InvalidSyntax, "expected 'r' to open a raw string"));
    }
    r.discard(1)?;

    let mut hashes = 0;
    while r.is_next(b"#")? {
        r.discard(1)?;
        hashes += 1;
    }
    match r.read_rune()? {
        Some('"') => {}
        Some(_) => return Err(r.error(ErrorKind::InvalidSyntax, "expected '\"' in raw string")),
        None => {
            return Err(r.error(ErrorKind::UnexpectedEndOfInput, "unterminated raw string"))
        }
    }

    let closing = "#".repeat(hashes);
    let mut out = String::new();
    loop {
        match r.read_rune()? {
            Some('"') => {
                if r.is_next(closing.as_bytes())? {
                    r.discard(hashes)?;
                    return Ok(out);
                }
                out.push('"');
            }
            Some(ch) => out.push(ch),
            None => {
                return Err(r.error(ErrorKind::UnexpectedEndOfInput, "unterminated raw string"))
            }
        }
    }
}

// ============================================================================
// Keywords
// ============================================================================

/// Read `true` or `false`.
pub fn read_bool<R: BufRead>(r: &mut PositionedReader<R>) -> Result<bool> {
    if r.is_next(b"true")? {
        r.discard(4)?;
        Ok(true)
    } else if r.is_next(b"false")? {
        r.discard(5)?;
        Ok(false)
    } else {
        Err(r.error(ErrorKind::InvalidSyntax, "expected 'true' or 'false'"))
    }
}

/// Read `null`.
pub fn read_null<R: BufRead>(r: &mut PositionedReader<R>) -> Result<()> {
    if r.is_next(b"null")? {
        r.discard(4)
    } else {
        Err(r.error(ErrorKind::InvalidSyntax, "expected 'null'"))
    }
}

// ============================================================================
// Numbers
// ============================================================================

/// Read a number: an optional sign, then either a `0x`/`0o`/`0b` integer or
/// a decimal with optional fraction and exponent.
pub fn read_number<R: BufRead>(r: &mut PositionedReader<R>) -> Result<Scalar> {
    let negative = match r.peek_rune()? {
        Some('-') => {
            r.discard(1)?;
            true
        }
        Some('+') => {
            r.discard(1)?;
            false
        }
        _ => false,
    };

    let radix = if r.is_next(b"0x")? {
        Some(16)
    } else if r.is_next(b"0o")? {
        Some(8)
    } else if r.is_next(b"0b")? {
        Some(2)
    } else {
        None
    };

    match radix {
        Some(radix) => {
            r.discard(2)?;
            let digits = read_digits(r, radix)?;
            if digits.is_empty() {
                return Err(r.error(
                    ErrorKind::InvalidNumericValue,
                    "expected digits after radix prefix",
                ));
            }
            let n = parse_bigint(r, &digits, radix)?;
            Ok(Scalar::Integer(if negative { -n } else { n }))
        }
        None => read_decimal(r, negative),
    }
}

fn read_decimal<R: BufRead>(r: &mut PositionedReader<R>, negative: bool) -> Result<Scalar> {
    let mut digits = read_digits(r, 10)?;
    if digits.is_empty() {
        return Err(r.error(ErrorKind::InvalidNumericValue, "expected digits"));
    }

    let mut is_float = false;
    let mut fraction_len = 0;
    if r.is_next(b".")? {
        r.discard(1)?;
        let fraction = read_digits(r, 10)?;
        if fraction.is_empty() {
            return Err(r.error(ErrorKind::InvalidSyntax, "expected a digit after '.'"));
        }
        fraction_len = fraction.len();
        digits.push_str(&fraction);
        is_float = true;
    }

    let mut exponent: i64 = 0;
    if matches!(r.peek_rune()?, Some('e') | Some('E')) {
        r.discard(1)?;
        let exp_negative = match r.peek_rune()? {
            Some('-') => {
                r.discard(1)?;
                true
            }
            Some('+') => {
                r.discard(1)?;
                false
            }
            _ => false,
        };
        let exp_digits = read_digits(r, 10)?;
        if exp_digits.is_empty() {
            return Err(r.error(ErrorKind::InvalidSyntax, "expected a digit in exponent"));
        }
        exponent = exp_digits
            .parse::<i64>()
            .map_err(|_| r.error(ErrorKind::InvalidNumericValue, "exponent out of range"))?;
        if exp_negative {
            exponent = -exponent;
        }
        is_float = true;
    }

    let mut mantissa = parse_bigint(r, &digits, 10)?;
    if negative {
        mantissa = -mantissa;
    }
    if !is_float {
        return Ok(Scalar::Integer(mantissa));
    }

    let scale = i64::try_from(fraction_len)
        .ok()
        .and_then(|len| exponent.checked_sub(len))
        .ok_or_else(|| r.error(ErrorKind::InvalidNumericValue, "exponent out of range"))?;
    Decimal::new(mantissa, scale)
        .map(Scalar::Float)
        .ok_or_else(|| r.error(ErrorKind::InvalidNumericValue, "exponent out of range"))
}

/// Digits of `radix` with `_` separators dropped. A separator may not come
/// first.
fn read_digits<R: BufRead>(r: &mut PositionedReader<R>, radix: u32) -> Result<String> {
    let mut digits = String::new();
    while let Some(ch) = r.peek_rune()? {
        if ch.is_digit(radix) {
            digits.push(ch);
        } else if ch != '_' || digits.is_empty() {
            break;
        }
        r.discard_runes(1)?;
    }
    Ok(digits)
}

fn parse_bigint<R: BufRead>(r: &PositionedReader<R>, digits: &str, radix: u32) -> Result<BigInt> {
    BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| r.error(ErrorKind::InvalidNumericValue, "malformed digits"))
}

// ============================================================================
// Type hints and values
// ============================================================================

/// Read an optional `(identifier)` type hint.
pub fn read_type_hint<R: BufRead>(r: &mut PositionedReader<R>) -> Result<Option<Identifier>> {
    if !r.is_next(b"(")? {
        return Ok(None);
    }
    r.discard(1)?;

    match r.peek_rune()? {
        None => return Err(r.error(ErrorKind::UnexpectedEndOfInput, "unterminated type hint")),
        Some(')') => return Err(r.error(ErrorKind::InvalidSyntax, "empty type hint")),
        Some(_) => {}
    }

    let scanned = read_identifier(r, StopMode::Freestanding)?;
    match r.peek_rune()? {
        Some(')') => {
            r.discard(1)?;
            Ok(Some(scanned.ident))
        }
        Some(_) => Err(r.error(
            ErrorKind::InvalidSyntax,
            "type hint must be a single identifier",
        )),
        None => Err(r.error(ErrorKind::UnexpectedEndOfInput, "unterminated type hint")),
    }
}

/// Read a value with its optional type hint.
pub fn read_value<R: BufRead>(r: &mut PositionedReader<R>) -> Result<Value> {
    let type_hint = read_type_hint(r)?;
    let scalar = read_scalar(r)?;
    Ok(Value { scalar, type_hint })
}

/// Read a bare scalar, dispatching on its first character.
pub fn read_scalar<R: BufRead>(r: &mut PositionedReader<R>) -> Result<Scalar> {
    let ch = match r.peek_rune()? {
        Some(ch) => ch,
        None => return Err(r.error(ErrorKind::UnexpectedEndOfInput, "expected a value")),
    };

    if ch.is_ascii_digit() || ((ch == '-' || ch == '+') && next_is_digit(r, 1)?) {
        read_number(r)
    } else if ch == '"' {
        read_quoted_string(r).map(Scalar::String)
    } else if ch == 'r' && is_raw_start(r)? {
        read_raw_string(r).map(Scalar::String)
    } else if ch == 't' || ch == 'f' {
        read_bool(r).map(Scalar::Bool)
    } else if ch == 'n' {
        read_null(r).map(|()| Scalar::Null)
    } else {
        Err(r.error(
            ErrorKind::InvalidSyntax,
            format!("unexpected '{}' where a value was expected", ch.escape_debug()),
        ))
    }
}

/// Whether the cursor sits on something that may follow a value: end of
/// input, whitespace, a newline, `;`, `}`, a comment or a `\` line
/// continuation. Does not advance.
pub fn at_value_terminator<R: BufRead>(r: &mut PositionedReader<R>) -> Result<bool> {
    Ok(match r.peek_rune()? {
        None => true,
        Some(ch) if is_whitespace(ch) || is_newline(ch) => true,
        Some(';') | Some('}') | Some('\\') => true,
        Some('/') => r.is_next(b"//")? || r.is_next(b"/*")?,
        Some(_) => false,
    })
}

// ============================================================================
// Whitespace and comments
// ============================================================================

/// Skip whitespace and comments and return the next significant character
/// without consuming it, or `None` at end of input.
///
/// Newlines are significant. Inside a node a `\` starts a line continuation:
/// the following newline is swallowed, and anything other than whitespace or
/// comments before it is an error.
pub fn skip_insignificant<R: BufRead>(
    r: &mut PositionedReader<R>,
    inside_node: bool,
) -> Result<Option<char>> {
    let mut escaped_line = false;

    loop {
        let ch = match r.peek_rune()? {
            Some(ch) => ch,
            None => return Ok(None),
        };

        if is_whitespace(ch) {
            r.discard_runes(1)?;
            continue;
        }

        if r.is_next(b"//")? {
            r.discard(2)?;
            skip_line(r, escaped_line)?;
            escaped_line = false;
            continue;
        }

        if r.is_next(b"/*")? {
            skip_block_comment(r)?;
            continue;
        }

        if ch == '\\' && inside_node && !escaped_line {
            r.discard(1)?;
            escaped_line = true;
            continue;
        }

        if escaped_line {
            if is_newline(ch) {
                r.discard_newline()?;
                escaped_line = false;
                continue;
            }
            return Err(r.error(
                ErrorKind::InvalidSyntax,
                "unexpected significant token in escline",
            ));
        }

        return Ok(Some(ch));
    }
}

/// Discard up to the next newline or end of input. With `after_break` the
/// newline itself is consumed too.
pub fn skip_line<R: BufRead>(r: &mut PositionedReader<R>, after_break: bool) -> Result<()> {
    while let Some(ch) = r.peek_rune()? {
        if is_newline(ch) {
            if after_break {
                r.discard_newline()?;
            }
            return Ok(());
        }
        r.discard_runes(1)?;
    }
    Ok(())
}

/// Discard a `/* */` comment; comments nest.
fn skip_block_comment<R: BufRead>(r: &mut PositionedReader<R>) -> Result<()> {
    r.discard(2)?;
    let mut depth = 1;
    while depth > 0 {
        if r.is_next(b"/*")? {
            r.discard(2)?;
            depth += 1;
        } else if r.is_next(b"*/")? {
            r.discard(2)?;
            depth -= 1;
        } else if r.read_rune()?.is_none() {
            return Err(r.error(
                ErrorKind::UnexpectedEndOfInput,
                "unterminated block comment",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;
    use test_log::test;

    fn reader(s: &str) -> PositionedReader<&[u8]> {
        PositionedReader::new(s.as_bytes())
    }

    fn expect_int(r: &mut PositionedReader<&[u8]>, expected: i64) {
        skip_insignificant(r, true).unwrap();
        match read_number(r).unwrap() {
            Scalar::Integer(n) => assert_eq!(n.to_i64(), Some(expected)),
            other => panic!("expected integer {}, got {:?}", expected, other),
        }
    }

    fn expect_float(r: &mut PositionedReader<&[u8]>, expected: f64) {
        skip_insignificant(r, true).unwrap();
        match read_number(r).unwrap() {
            Scalar::Float(d) => assert!((d.to_f64() - expected).abs() < 1e-9),
            other => panic!("expected float {}, got {:?}", expected, other),
        }
    }

    #[test]
    fn test_quoted_string() {
        let mut r = reader("\"Hi!\"\"Why, \\\"hello \\nthere!\"\"foo\n\t\\n\\\"bar\"extra");
        assert_eq!(read_quoted_string(&mut r).unwrap(), "Hi!");
        assert_eq!(read_quoted_string(&mut r).unwrap(), "Why, \"hello \nthere!");
        assert_eq!(read_quoted_string(&mut r).unwrap(), "foo\n\t\n\"bar");
        let err = read_quoted_string(&mut r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSyntax);
    }

    #[test]
    fn test_quoted_string_escapes() {
        let mut r = reader(r#""a\/b\\c\u{1F603}\u{e9}""#);
        assert_eq!(read_quoted_string(&mut r).unwrap(), "a/b\\c😃é");

        let mut r = reader(r#""bad \q""#);
        assert_eq!(read_quoted_string(&mut r).unwrap_err().kind(), ErrorKind::InvalidSyntax);

        let mut r = reader(r#""\u{D800}""#);
        assert_eq!(read_quoted_string(&mut r).unwrap_err().kind(), ErrorKind::InvalidSyntax);
    }

    #[test]
    fn test_unterminated_quoted_string() {
        let mut r = reader("\"never ends");
        let err = read_quoted_string(&mut r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSyntax);
        assert_eq!(err.message(), "unterminated string");
    }

    #[test]
    fn test_raw_string() {
        let mut r = reader("r###\"oh\n\tHi\"##there##!\n\"###r\"extra data");
        assert_eq!(read_raw_string(&mut r).unwrap(), "oh\n\tHi\"##there##!\n");
        let err = read_raw_string(&mut r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);

        let mut r = reader("r#\"one pound\"#");
        assert_eq!(read_raw_string(&mut r).unwrap(), "one pound");

        let mut r = reader("r\"no pounds\"");
        assert_eq!(read_raw_string(&mut r).unwrap(), "no pounds");

        let mut r = reader(r#"r"C:\path\n""#);
        assert_eq!(read_raw_string(&mut r).unwrap(), "C:\\path\\n");
    }

    #[test]
    fn test_string_dispatch() {
        let mut r = reader(r###"r##"foo"##"bar""###);
        assert_eq!(read_string(&mut r).unwrap(), "foo");
        assert_eq!(read_string(&mut r).unwrap(), "bar");
    }

    #[test]
    fn test_bool() {
        let mut r = reader("truefalsetent");
        assert!(read_bool(&mut r).unwrap());
        assert!(!read_bool(&mut r).unwrap());
        assert_eq!(read_bool(&mut r).unwrap_err().kind(), ErrorKind::InvalidSyntax);
    }

    #[test]
    fn test_null() {
        let mut r = reader("null, or not");
        read_null(&mut r).unwrap();
        assert_eq!(read_null(&mut r).unwrap_err().kind(), ErrorKind::InvalidSyntax);
    }

    #[test]
    fn test_number_decimal() {
        let mut r = reader("0.0 0 4 +2 -6 1_33_7 7e-2 -1.1e-2 2E+3");
        expect_float(&mut r, 0.0);
        expect_int(&mut r, 0);
        expect_int(&mut r, 4);
        expect_int(&mut r, 2);
        expect_int(&mut r, -6);
        expect_int(&mut r, 1337);
        expect_float(&mut r, 0.07);
        expect_float(&mut r, -0.011);
        expect_float(&mut r, 2000.0);
    }

    #[test]
    fn test_exponent_makes_float() {
        let mut r = reader("4e3");
        assert_eq!(
            read_number(&mut r).unwrap(),
            Scalar::Float(Decimal::new(BigInt::from(4000), 0).unwrap())
        );
    }

    #[test]
    fn test_number_hex_octal_binary() {
        let mut r = reader("0xc 0xa_0_f -0xD2 0o1_0 -0o26 0b1 -0b1000_0001");
        expect_int(&mut r, 12);
        expect_int(&mut r, 2575);
        expect_int(&mut r, -210);
        expect_int(&mut r, 8);
        expect_int(&mut r, -22);
        expect_int(&mut r, 1);
        expect_int(&mut r, -129);
    }

    #[test]
    fn test_number_beyond_fixed_width() {
        let mut r = reader("123456789012345678901234567890 1.000000000000000000000000001");
        let big = read_number(&mut r).unwrap();
        assert_eq!(
            big,
            Scalar::Integer("123456789012345678901234567890".parse::<BigInt>().unwrap())
        );
        skip_insignificant(&mut r, true).unwrap();
        match read_number(&mut r).unwrap() {
            Scalar::Float(d) => {
                assert_eq!(d.exponent(), -27);
                assert_eq!(d.mantissa().to_string(), "1000000000000000000000000001");
            }
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_number_errors() {
        for (input, kind) in [
            ("0x", ErrorKind::InvalidNumericValue),
            ("0b_1", ErrorKind::InvalidNumericValue),
            ("-_1", ErrorKind::InvalidNumericValue),
            ("1.", ErrorKind::InvalidSyntax),
            ("1e", ErrorKind::InvalidSyntax),
            ("1e+", ErrorKind::InvalidSyntax),
        ] {
            let mut r = reader(input);
            assert_eq!(read_number(&mut r).unwrap_err().kind(), kind, "{}", input);
        }
    }

    #[test]
    fn test_exponent_at_the_limit() {
        let mut r = reader("10e9223372036854775807");
        let err = read_number(&mut r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumericValue);
        assert_eq!(err.message(), "exponent out of range");

        let mut r = reader("1e9223372036854775807");
        match read_number(&mut r).unwrap() {
            Scalar::Float(d) => assert_eq!(d.exponent(), i64::MAX),
            other => panic!("expected float, got {:?}", other),
        }

        let mut r = reader("1.0e9223372036854775807");
        match read_number(&mut r).unwrap() {
            Scalar::Float(d) => assert_eq!(d.exponent(), i64::MAX),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_identifier() {
        let mut r = reader("abc");
        assert_eq!(read_bare_identifier(&mut r, StopMode::Freestanding).unwrap(), "abc");

        let mut r = reader("def ");
        assert_eq!(read_bare_identifier(&mut r, StopMode::Freestanding).unwrap(), "def");

        let mut r = reader("012");
        let err = read_bare_identifier(&mut r, StopMode::Freestanding).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInitialChar);

        let mut r = reader("-cool");
        assert_eq!(read_bare_identifier(&mut r, StopMode::Freestanding).unwrap(), "-cool");

        let mut r = reader("-12");
        let err = read_bare_identifier(&mut r, StopMode::Freestanding).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBareIdentifier);

        let mut r = reader("\" ");
        let err = read_bare_identifier(&mut r, StopMode::Freestanding).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInitialChar);
    }

    #[test]
    fn test_bare_identifier_stop_modes() {
        let mut r = reader("key=1");
        assert_eq!(read_bare_identifier(&mut r, StopMode::Equals).unwrap(), "key");
        assert!(r.is_next(b"=").unwrap());

        let mut r = reader("key=1");
        let err = read_bare_identifier(&mut r, StopMode::Freestanding).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyChar);

        let mut r = reader("a[b]");
        let err = read_bare_identifier(&mut r, StopMode::Freestanding).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidKeyChar);

        let mut r = reader("null");
        let err = read_bare_identifier(&mut r, StopMode::Freestanding).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBareIdentifier);
    }

    #[test]
    fn test_identifier() {
        fn read(r: &mut PositionedReader<&[u8]>) -> ScannedIdent {
            skip_insignificant(r, true).unwrap();
            read_identifier(r, StopMode::Freestanding).unwrap()
        }

        let mut r = reader("foo \"bar baz\" radio r#\"gaga\"# 😃 \"😃\" ");
        let foo = read(&mut r);
        assert_eq!(foo.ident, "foo");
        assert!(!foo.quoted);
        let bar = read(&mut r);
        assert_eq!(bar.ident, "bar baz");
        assert!(bar.quoted);
        assert_eq!(read(&mut r).ident, "radio");
        let gaga = read(&mut r);
        assert_eq!(gaga.ident, "gaga");
        assert!(gaga.quoted);
        assert_eq!(read(&mut r).ident, "😃");
        assert_eq!(read(&mut r).ident, "😃");
    }

    #[test]
    fn test_hash_after_r_is_not_always_raw() {
        let mut r = reader("r#x r## r#\"raw\"#");
        let bare = read_identifier(&mut r, StopMode::Freestanding).unwrap();
        assert_eq!(bare.ident, "r#x");
        assert!(!bare.quoted);
        skip_insignificant(&mut r, true).unwrap();
        assert_eq!(read_identifier(&mut r, StopMode::Freestanding).unwrap().ident, "r##");
        skip_insignificant(&mut r, true).unwrap();
        let raw = read_identifier(&mut r, StopMode::Freestanding).unwrap();
        assert_eq!(raw.ident, "raw");
        assert!(raw.quoted);
    }

    #[test]
    fn test_at_identifier() {
        for (input, expected) in [
            ("foo", true),
            ("\"foo\"", true),
            ("r#\"foo\"#", true),
            ("r#foo", true),
            ("-cool", true),
            ("nullable", true),
            ("true", false),
            ("null;", false),
            ("-1", false),
            ("12", false),
            ("(", false),
        ] {
            let mut r = reader(input);
            assert_eq!(at_identifier(&mut r).unwrap(), expected, "{}", input);
            assert_eq!(r.column(), 0);
        }
    }

    #[test]
    fn test_type_hint() {
        let mut r = reader("(foo)");
        assert_eq!(read_type_hint(&mut r).unwrap().unwrap(), "foo");

        let mut r = reader("(bar baz)");
        assert_eq!(read_type_hint(&mut r).unwrap_err().kind(), ErrorKind::InvalidSyntax);

        let mut r = reader("(\"hello world\")");
        assert_eq!(read_type_hint(&mut r).unwrap().unwrap(), "hello world");

        let mut r = reader("(aaaaa");
        assert_eq!(
            read_type_hint(&mut r).unwrap_err().kind(),
            ErrorKind::UnexpectedEndOfInput
        );

        let mut r = reader("(");
        assert_eq!(
            read_type_hint(&mut r).unwrap_err().kind(),
            ErrorKind::UnexpectedEndOfInput
        );

        let mut r = reader("plain");
        assert_eq!(read_type_hint(&mut r).unwrap(), None);
        assert_eq!(r.column(), 0);
    }

    #[test]
    fn test_value() {
        let mut r = reader("true (temp)-3.5 (\"hey\")null \"foo\" what");

        let value = read_value(&mut r).unwrap();
        assert_eq!(value, Value::from(true));

        skip_insignificant(&mut r, true).unwrap();
        let value = read_value(&mut r).unwrap();
        assert_eq!(value.type_hint().unwrap(), "temp");
        assert_eq!(value.as_f64(), Some(-3.5));

        skip_insignificant(&mut r, true).unwrap();
        let value = read_value(&mut r).unwrap();
        assert!(value.is_null());
        assert_eq!(value.type_hint().unwrap(), "hey");

        skip_insignificant(&mut r, true).unwrap();
        assert_eq!(read_value(&mut r).unwrap(), Value::from("foo"));

        skip_insignificant(&mut r, true).unwrap();
        assert_eq!(read_value(&mut r).unwrap_err().kind(), ErrorKind::InvalidSyntax);
    }

    #[test]
    fn test_skip_comments() {
        let mut r = reader("  /* a /* nested */ comment */ // rest\nnext");
        assert_eq!(skip_insignificant(&mut r, false).unwrap(), Some('\n'));
        r.discard_newline().unwrap();
        assert_eq!(skip_insignificant(&mut r, false).unwrap(), Some('n'));

        let mut r = reader("/* /* */ never closed");
        let err = skip_insignificant(&mut r, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_line_continuation() {
        let mut r = reader("\\   // comment\r\n  next");
        assert_eq!(skip_insignificant(&mut r, true).unwrap(), Some('n'));
        assert_eq!(r.line(), 2);

        let mut r = reader("\\ oops\n");
        let err = skip_insignificant(&mut r, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSyntax);
        assert_eq!(err.message(), "unexpected significant token in escline");

        let mut r = reader("\\\n");
        assert_eq!(skip_insignificant(&mut r, false).unwrap(), Some('\\'));
    }

    #[test]
    fn test_value_terminator() {
        for (input, expected) in [
            ("", true),
            (" ", true),
            ("\n", true),
            (";", true),
            ("}", true),
            ("// c", true),
            ("/* c */", true),
            ("\\\n", true),
            ("/-", false),
            ("=", false),
            ("x", false),
        ] {
            let mut r = reader(input);
            assert_eq!(at_value_terminator(&mut r).unwrap(), expected, "{:?}", input);
        }
    }
}
