//! Character classes of the KDL grammar.

/// Unicode space separators, including the BOM.
pub fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\u{9}'
            | '\u{20}'
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Line breaks. CRLF is treated as one break by the reader.
pub fn is_newline(ch: char) -> bool {
    matches!(
        ch,
        '\r' | '\n' | '\u{85}' | '\u{C}' | '\u{2028}' | '\u{2029}'
    )
}

/// Characters that may appear inside a bare identifier.
pub fn is_identifier_char(ch: char) -> bool {
    !(is_whitespace(ch)
        || is_newline(ch)
        || ch.is_ascii_control()
        || matches!(
            ch,
            '\\' | '/' | '(' | ')' | '{' | '}' | '<' | '>' | ';' | '[' | ']' | '=' | ',' | '"'
        ))
}

/// Characters that end a bare identifier without being part of it.
pub fn ends_identifier(ch: char) -> bool {
    is_whitespace(ch)
        || is_newline(ch)
        || matches!(ch, '\\' | '/' | ')' | '{' | '}' | ';')
}

/// Keywords that can never be bare identifiers.
pub const KEYWORDS: [&str; 3] = ["true", "false", "null"];
