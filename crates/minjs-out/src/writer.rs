//! Character-level output state machine.
//!
//! The writer owns every rule that depends on the previously emitted
//! character: identifier adjacency (`typeof x` must not fuse into
//! `typeofx`), sign runs (`a+ ++b` must not fuse into `a+++b`), accidental
//! line comments (`a/ /re/` must not fuse into `a//re/`), indentation, and
//! the no-line-breaks guard for restricted productions.

use crate::{OutputMode, OutputSettings};

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '@' || !c.is_ascii()
}

/// Streams characters into a `String`, tracking adjacency state.
pub struct OutputWriter {
    out: String,
    /// Last character emitted, `'\0'` before any output.
    last_char: char,
    at_line_start: bool,
    indent_level: usize,
    line_length: usize,
    line_count: usize,
    /// Length of the trailing run of `+` or `-` characters; an odd run
    /// means one more same-sign character would fuse into `++`/`--`.
    sign_run: usize,
    /// Line breaks are forbidden (label operands, postfix operators,
    /// `return`/`throw` operands).
    no_line_breaks: bool,
    multiline: bool,
    indent_size: usize,
    line_break_threshold: usize,
}

impl OutputWriter {
    pub fn new(settings: &OutputSettings) -> Self {
        Self {
            out: String::new(),
            last_char: '\0',
            at_line_start: true,
            indent_level: 0,
            line_length: 0,
            line_count: 1,
            sign_run: 0,
            no_line_breaks: false,
            multiline: settings.output_mode == OutputMode::MultipleLines,
            indent_size: settings.indent_size,
            line_break_threshold: settings.line_break_threshold,
        }
    }

    /// The finished output.
    pub fn into_inner(self) -> String {
        self.out
    }

    pub fn last_char(&self) -> char {
        self.last_char
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn line_length(&self) -> usize {
        self.line_length
    }

    /// Raw emission; adjacency rules are the caller's problem.
    pub fn write_str(&mut self, text: &str) {
        for c in text.chars() {
            self.write_char(c);
        }
    }

    pub fn write_char(&mut self, c: char) {
        if self.at_line_start && c != '\n' && self.multiline {
            let pad = self.indent_level * self.indent_size;
            for _ in 0..pad {
                self.out.push(' ');
            }
            self.line_length += pad;
        }
        self.at_line_start = false;
        self.out.push(c);
        if c == '\n' {
            self.line_count += 1;
            self.line_length = 0;
            self.at_line_start = true;
        } else {
            self.line_length += 1;
        }
        if (c == '+' || c == '-') && c == self.last_char {
            self.sign_run += 1;
        } else if c == '+' || c == '-' {
            self.sign_run = 1;
        } else {
            self.sign_run = 0;
        }
        self.last_char = c;
    }

    /// Emit text that begins a word (identifier, number, keyword),
    /// inserting a separating space when the previous character could
    /// continue an identifier.
    pub fn write_word(&mut self, text: &str) {
        if let Some(first) = text.chars().next() {
            if is_ident_char(first) && is_ident_char(self.last_char) {
                self.write_char(' ');
            }
        }
        self.write_str(text);
    }

    /// Emit an operator, keeping same-sign characters apart where they
    /// would fuse into `++`/`--`, and preventing `/`-`/` from forming a
    /// line comment. An even-length sign run ends in a complete `++`/`--`,
    /// so another sign character is safe; only an odd run needs a space.
    pub fn write_operator(&mut self, text: &str) {
        if let Some(first) = text.chars().next() {
            let clash = match first {
                '+' | '-' => first == self.last_char && self.sign_run % 2 == 1,
                '/' => self.last_char == '/',
                _ => false,
            };
            if clash {
                self.write_char(' ');
            }
        }
        self.write_str(text);
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn unindent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// A cosmetic line break: emitted only in multi-line mode and only
    /// outside no-line-break regions.
    pub fn newline(&mut self) {
        if self.multiline && !self.no_line_breaks && !self.at_line_start {
            self.write_char('\n');
        }
    }

    /// An unconditional break, required after important comments in every
    /// output mode.
    pub fn force_newline(&mut self) {
        if !self.at_line_start {
            self.write_char('\n');
        }
    }

    /// Emit a terminating semicolon unless the current line has grown past
    /// the break threshold, in which case the caller relies on automatic
    /// semicolon insertion at the following line break. Returns whether the
    /// semicolon was emitted.
    pub fn replaceable_semicolon(&mut self) -> bool {
        if self.multiline && self.line_length >= self.line_break_threshold {
            self.force_newline();
            false
        } else {
            self.write_char(';');
            true
        }
    }

    /// Toggle the no-line-breaks guard, returning the previous state so
    /// the caller can restore it.
    pub fn set_no_line_breaks(&mut self, on: bool) -> bool {
        std::mem::replace(&mut self.no_line_breaks, on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputSettings;

    fn writer() -> OutputWriter {
        OutputWriter::new(&OutputSettings::default())
    }

    #[test]
    fn test_word_adjacency() {
        let mut w = writer();
        w.write_word("typeof");
        w.write_word("x");
        assert_eq!(w.into_inner(), "typeof x");
    }

    #[test]
    fn test_word_after_punctuation_needs_no_space() {
        let mut w = writer();
        w.write_str("(");
        w.write_word("a");
        assert_eq!(w.into_inner(), "(a");
    }

    #[test]
    fn test_plus_runs_kept_apart() {
        let mut w = writer();
        w.write_word("a");
        w.write_operator("+");
        w.write_operator("+");
        w.write_word("b");
        assert_eq!(w.into_inner(), "a+ +b");
    }

    #[test]
    fn test_even_sign_run_needs_no_space() {
        // a-- followed by -b: the -- is complete, --- lexes as -- then -
        let mut w = writer();
        w.write_word("a");
        w.write_operator("--");
        w.write_operator("-");
        w.write_word("b");
        assert_eq!(w.into_inner(), "a---b");
    }

    #[test]
    fn test_odd_sign_run_spaced() {
        let mut w = writer();
        w.write_word("a");
        w.write_operator("-");
        w.write_operator("-");
        w.write_word("b");
        assert_eq!(w.into_inner(), "a- -b");
    }

    #[test]
    fn test_slash_slash_kept_apart() {
        let mut w = writer();
        w.write_word("a");
        w.write_operator("/");
        w.write_operator("/re/");
        assert_eq!(w.into_inner(), "a/ /re/");
    }

    #[test]
    fn test_multiline_indent() {
        let settings = OutputSettings {
            output_mode: OutputMode::MultipleLines,
            indent_size: 2,
            ..Default::default()
        };
        let mut w = OutputWriter::new(&settings);
        w.write_str("{");
        w.indent();
        w.newline();
        w.write_word("a");
        w.unindent();
        w.newline();
        w.write_str("}");
        assert_eq!(w.into_inner(), "{\n  a\n}");
    }

    #[test]
    fn test_replaceable_semicolon_threshold() {
        let settings = OutputSettings {
            output_mode: OutputMode::MultipleLines,
            line_break_threshold: 4,
            ..Default::default()
        };
        let mut w = OutputWriter::new(&settings);
        w.write_str("abcdef");
        assert!(!w.replaceable_semicolon());
        assert_eq!(w.line_length(), 0);

        let mut w = writer();
        w.write_str("ab");
        assert!(w.replaceable_semicolon());
    }
}
