//! Character cursor for traversing source code.
//!
//! This module provides the `Cursor` struct which maintains position state
//! while the scanner walks the source. It handles UTF-8 correctly and tracks
//! line/column information using JavaScript's definition of a line
//! terminator: `\n`, `\r` (with `\r\n` counting once), U+2028 LINE SEPARATOR
//! and U+2029 PARAGRAPH SEPARATOR.

/// JavaScript line terminator test.
#[inline]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// JavaScript whitespace test (excluding line terminators).
#[inline]
pub fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}'
    ) || (c.is_whitespace() && !is_line_terminator(c))
}

/// True for characters that may start an identifier.
///
/// ASCII letters, `_`, `$`, and any non-ASCII alphabetic character. The full
/// Unicode ID_Start tables are deliberately approximated; the printer's
/// adjacency rules only depend on the ASCII subset.
#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || (!c.is_ascii() && c.is_alphabetic())
}

/// True for characters that may continue an identifier.
#[inline]
pub fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '$'
        || (!c.is_ascii() && (c.is_alphanumeric() || c == '\u{200C}' || c == '\u{200D}'))
}

/// A cursor for traversing source code character by character.
///
/// The cursor maintains the current byte position in the source and provides
/// methods for advancing, peeking ahead, and checking conditions. Cloning a
/// cursor snapshots its position; the scanner relies on this for lookahead
/// and for regex re-scanning.
///
/// # Example
///
/// ```
/// use minjs_lex::cursor::Cursor;
///
/// let mut cursor = Cursor::new("var x;");
/// assert_eq!(cursor.current_char(), 'v');
/// cursor.advance();
/// assert_eq!(cursor.current_char(), 'a');
/// ```
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The source text being traversed.
    source: &'a str,

    /// Current byte position in the source.
    position: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (0-based, in characters).
    column: u32,

    /// Previous character was `\r`; the following `\n` must not count as a
    /// second terminator.
    after_cr: bool,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 0,
            after_cr: false,
        }
    }

    /// Creates a cursor at a known position, used when re-scanning a slice
    /// whose location was recorded earlier (regex re-scan).
    pub fn at(source: &'a str, position: usize, line: u32, column: u32) -> Self {
        Self {
            source,
            position,
            line,
            column,
            after_cr: false,
        }
    }

    /// Returns the character at the cursor, or `'\0'` at end of input.
    #[inline]
    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    /// Returns the character at the given byte offset from the current
    /// position, or `'\0'` past the end.
    #[inline]
    pub fn char_at(&self, offset: usize) -> char {
        let pos = self.position + offset;
        if pos >= self.source.len() {
            return '\0';
        }

        // Fast path for ASCII (most common case)
        let b = self.source.as_bytes()[pos];
        if b < 128 {
            return b as char;
        }

        // Slow path for UTF-8
        self.source[pos..].chars().next().unwrap_or('\0')
    }

    /// Peeks at the byte at `offset` from the current position when it is
    /// ASCII.
    #[inline]
    pub fn peek_byte(&self, offset: usize) -> Option<u8> {
        let pos = self.position + offset;
        if pos >= self.source.len() {
            return None;
        }
        let b = self.source.as_bytes()[pos];
        (b < 128).then_some(b)
    }

    /// Advances the cursor to the next character, updating line/column
    /// tracking. Does nothing at end of input.
    pub fn advance(&mut self) {
        if self.position >= self.source.len() {
            return;
        }

        // Fast path for ASCII (most common)
        let b = self.source.as_bytes()[self.position];
        if b < 128 {
            self.position += 1;
            match b {
                b'\r' => {
                    self.line += 1;
                    self.column = 0;
                    self.after_cr = true;
                }
                b'\n' => {
                    if self.after_cr {
                        // second half of \r\n, line already counted
                        self.after_cr = false;
                    } else {
                        self.line += 1;
                    }
                    self.column = 0;
                }
                _ => {
                    self.column += 1;
                    self.after_cr = false;
                }
            }
            return;
        }

        // Slow path for UTF-8 multi-byte characters
        if let Some(c) = self.source[self.position..].chars().next() {
            self.position += c.len_utf8();
            if is_line_terminator(c) {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
            self.after_cr = false;
        }
    }

    /// Advances if the current character equals `expected`; returns whether
    /// it did.
    #[inline]
    pub fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True when the cursor is at or past the end of the source.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Current byte position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current line (1-based).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column (0-based).
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// The source slice from `start` up to the current position.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    /// True when the remaining input starts with `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.position..].starts_with(prefix)
    }

    /// Rebase line numbering, used by `///#source` directives.
    #[inline]
    pub fn rebase_line(&mut self, line: u32) {
        self.line = line;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines() {
        let mut c = Cursor::new("a\nb");
        assert_eq!(c.line(), 1);
        c.advance();
        c.advance();
        assert_eq!(c.line(), 2);
        assert_eq!(c.column(), 0);
        assert_eq!(c.current_char(), 'b');
    }

    #[test]
    fn test_crlf_counts_once() {
        let mut c = Cursor::new("a\r\nb");
        for _ in 0..3 {
            c.advance();
        }
        assert_eq!(c.line(), 2);
        assert_eq!(c.current_char(), 'b');
    }

    #[test]
    fn test_unicode_line_separator() {
        let mut c = Cursor::new("a\u{2028}b");
        c.advance();
        c.advance();
        assert_eq!(c.line(), 2);
        assert_eq!(c.current_char(), 'b');
    }

    #[test]
    fn test_peek_does_not_move() {
        let c = Cursor::new("abc");
        assert_eq!(c.char_at(2), 'c');
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn test_slice_from() {
        let mut c = Cursor::new("hello world");
        let start = c.position();
        for _ in 0..5 {
            c.advance();
        }
        assert_eq!(c.slice_from(start), "hello");
    }

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('_'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(is_identifier_start('\u{00e9}'));
    }

    #[test]
    fn test_match_char() {
        let mut c = Cursor::new("ab");
        assert!(c.match_char('a'));
        assert!(!c.match_char('x'));
        assert_eq!(c.current_char(), 'b');
    }
}
