//! The scanner: source text in, significant tokens out.
//!
//! The scanner is the only component that reads raw source. It absorbs
//! whitespace, line terminators, comments and preprocessor directives, and
//! surfaces what the parser needs to know about the gap before each token
//! through side channels:
//!
//! - [`Scanner::found_newline`]: a line terminator was crossed since the
//!   previous token (drives automatic semicolon insertion)
//! - [`Scanner::take_important_comments`]: comments starting with `!` or
//!   containing `@preserve`/`@license`, queued in source order
//! - [`Scanner::take_new_module`]: a `///#source` directive was crossed
//!
//! Lexical errors are reported through the [`Handler`] and never abort the
//! scan; a best-effort token is synthesized and scanning continues.
//!
//! Regular-expression literals are never produced spontaneously. The parser
//! asks for one with [`Scanner::scan_regex`] when it sees a `/` where a
//! primary expression is expected; a failed attempt leaves the scanner
//! where the divide token left it.

use rustc_hash::FxHashSet;

use minjs_util::{Document, ErrorKind, Handler, Span, Symbol};

use crate::cursor::{
    is_identifier_part, is_identifier_start, is_js_whitespace, is_line_terminator, Cursor,
};
use crate::token::{keyword_from_ident, Token, TokenKind};

/// Scanner behavior toggles, a subset of the parse settings.
#[derive(Clone, Debug)]
pub struct ScannerSettings {
    /// Treat conditional-compilation comments as plain comments
    pub ignore_conditional_compilation: bool,
    /// Recognize `<% … %>` blocks as single opaque tokens
    pub allow_embedded_asp_net_blocks: bool,
    /// Skip `///#DEBUG` … `///#ENDDEBUG` regions entirely
    pub strip_debug_statements: bool,
    /// Queue important comments for the parser
    pub collect_important_comments: bool,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            ignore_conditional_compilation: false,
            allow_embedded_asp_net_blocks: false,
            strip_debug_statements: false,
            collect_important_comments: true,
        }
    }
}

/// An important comment crossed between two tokens, kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportantComment {
    /// Raw comment text including delimiters
    pub text: String,
    pub span: Span,
}

/// Decoded form of the most recent string literal token.
#[derive(Clone, Debug, Default)]
pub struct StringLiteral {
    /// The string value with escapes processed
    pub value: String,
    /// Re-emitting from the decoded value may lose information (octal
    /// escapes, malformed escapes, unterminated literal)
    pub may_have_issues: bool,
}

/// The lexer. Produces one token per [`Scanner::next_token`] call.
///
/// Cloning a scanner snapshots its complete state; the parser clones for
/// one-token lookahead without committing.
#[derive(Clone)]
pub struct Scanner<'a> {
    /// Character cursor over the document text.
    cursor: Cursor<'a>,

    /// The document being scanned.
    document: &'a Document,

    /// Diagnostic sink shared with the parser.
    handler: &'a Handler,

    settings: ScannerSettings,

    /// Names defined for `///#IF` directives (`///#DEFINE`, settings).
    defined_names: FxHashSet<Symbol>,

    /// Start position of the current token.
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,

    /// A line terminator was crossed in the gap before the current token.
    found_newline: bool,

    /// Important comments crossed since the parser last drained the queue.
    important_comments: Vec<ImportantComment>,

    /// A `///#source` directive was crossed.
    new_module: bool,

    /// Decoded value of the most recent string literal.
    string_literal: Option<StringLiteral>,

    /// Decoded text of the most recent identifier, when it contained
    /// unicode escapes and the span slice is not the name.
    identifier_text: Option<String>,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `document` reporting through `handler`.
    pub fn new(document: &'a Document, handler: &'a Handler, settings: ScannerSettings) -> Self {
        Self {
            cursor: Cursor::new(document.text()),
            document,
            handler,
            settings,
            defined_names: FxHashSet::default(),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 0,
            found_newline: false,
            important_comments: Vec::new(),
            new_module: false,
            string_literal: None,
            identifier_text: None,
        }
    }

    /// Pre-define a preprocessor name for `///#IF` evaluation.
    pub fn define_name(&mut self, name: Symbol) {
        self.defined_names.insert(name);
    }

    /// A line terminator was crossed in the gap before the last token.
    #[inline]
    pub fn found_newline(&self) -> bool {
        self.found_newline
    }

    /// Drain the queued important comments, in source order.
    pub fn take_important_comments(&mut self) -> Vec<ImportantComment> {
        std::mem::take(&mut self.important_comments)
    }

    /// Discard queued important comments without emitting them.
    pub fn discard_important_comments(&mut self) {
        self.important_comments.clear();
    }

    /// Consume and reset the `new_module` flag.
    pub fn take_new_module(&mut self) -> bool {
        std::mem::replace(&mut self.new_module, false)
    }

    /// Decoded value of the most recent string literal token.
    pub fn take_string_literal(&mut self) -> StringLiteral {
        self.string_literal.take().unwrap_or_default()
    }

    /// Decoded text of the most recent identifier token, when it contained
    /// escapes. `None` means the span slice is the name.
    pub fn take_identifier_text(&mut self) -> Option<String> {
        self.identifier_text.take()
    }

    /// The document this scanner reads.
    #[inline]
    pub fn document(&self) -> &'a Document {
        self.document
    }

    fn span_from_start(&self) -> Span {
        Span {
            start: self.token_start,
            end: self.cursor.position(),
            start_line: self.token_start_line,
            start_column: self.token_start_column,
            end_line: self.cursor.line(),
            end_column: self.cursor.column(),
            file_id: self.document.file_id(),
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.span_from_start())
    }

    fn report(&self, kind: ErrorKind) {
        let span = self.span_from_start();
        let excerpt = self.document.snippet(&span).unwrap_or("").to_owned();
        self.handler.report(kind, span, excerpt);
    }

    /// Scan and return the next syntactically significant token.
    pub fn next_token(&mut self) -> Token {
        self.found_newline = false;
        // side channels describe the token about to be scanned
        self.identifier_text = None;
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.token(TokenKind::EndOfFile);
        }

        match self.cursor.current_char() {
            '(' => self.punct(TokenKind::LeftParenthesis),
            ')' => self.punct(TokenKind::RightParenthesis),
            '[' => self.punct(TokenKind::LeftBracket),
            ']' => self.punct(TokenKind::RightBracket),
            '{' => self.punct(TokenKind::LeftCurly),
            '}' => self.punct(TokenKind::RightCurly),
            ';' => self.punct(TokenKind::Semicolon),
            ',' => self.punct(TokenKind::Comma),
            ':' => self.punct(TokenKind::Colon),
            '?' => self.punct(TokenKind::ConditionalIf),
            '~' => self.punct(TokenKind::BitwiseNot),

            '.' => {
                if self.cursor.char_at(1).is_ascii_digit() {
                    self.scan_number()
                } else {
                    self.punct(TokenKind::AccessField)
                }
            }

            '+' => self.scan_plus(),
            '-' => self.scan_minus(),
            '*' => self.scan_star(),
            '/' => self.scan_slash(),
            '%' => self.scan_percent(),
            '=' => self.scan_equals(),
            '!' => self.scan_bang(),
            '<' => self.scan_less(),
            '>' => self.scan_greater(),
            '&' => self.scan_ampersand(),
            '|' => self.scan_pipe(),
            '^' => self.scan_caret(),

            '"' | '\'' => self.scan_string(),

            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            '\\' if self.cursor.char_at(1) == 'u' => self.scan_identifier(),

            _ => {
                self.cursor.advance();
                self.report(ErrorKind::IllegalChar);
                self.token(TokenKind::Error)
            }
        }
    }

    fn punct(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.token(kind)
    }

    // ---- operators ----

    fn scan_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('+') {
            self.token(TokenKind::Increment)
        } else if self.cursor.match_char('=') {
            self.token(TokenKind::PlusAssign)
        } else {
            self.token(TokenKind::Plus)
        }
    }

    fn scan_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('-') {
            self.token(TokenKind::Decrement)
        } else if self.cursor.match_char('=') {
            self.token(TokenKind::MinusAssign)
        } else {
            self.token(TokenKind::Minus)
        }
    }

    fn scan_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.token(TokenKind::MultiplyAssign)
        } else {
            self.token(TokenKind::Multiply)
        }
    }

    fn scan_slash(&mut self) -> Token {
        // Comments were consumed by the skip phase; a conditional-compilation
        // comment may have been left for us to tokenize.
        if !self.settings.ignore_conditional_compilation
            && (self.cursor.starts_with("/*@") || self.cursor.starts_with("//@"))
        {
            return self.scan_conditional_comment();
        }
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.token(TokenKind::DivideAssign)
        } else {
            self.token(TokenKind::Divide)
        }
    }

    fn scan_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.token(TokenKind::ModuloAssign)
        } else {
            self.token(TokenKind::Modulo)
        }
    }

    fn scan_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            if self.cursor.match_char('=') {
                self.token(TokenKind::StrictEqual)
            } else {
                self.token(TokenKind::Equal)
            }
        } else {
            self.token(TokenKind::Assign)
        }
    }

    fn scan_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            if self.cursor.match_char('=') {
                self.token(TokenKind::StrictNotEqual)
            } else {
                self.token(TokenKind::NotEqual)
            }
        } else {
            self.token(TokenKind::LogicalNot)
        }
    }

    fn scan_less(&mut self) -> Token {
        if self.settings.allow_embedded_asp_net_blocks && self.cursor.starts_with("<%") {
            return self.scan_asp_net_block();
        }
        self.cursor.advance();
        if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                self.token(TokenKind::LeftShiftAssign)
            } else {
                self.token(TokenKind::LeftShift)
            }
        } else if self.cursor.match_char('=') {
            self.token(TokenKind::LessThanEqual)
        } else {
            self.token(TokenKind::LessThan)
        }
    }

    fn scan_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            if self.cursor.match_char('>') {
                if self.cursor.match_char('=') {
                    self.token(TokenKind::UnsignedRightShiftAssign)
                } else {
                    self.token(TokenKind::UnsignedRightShift)
                }
            } else if self.cursor.match_char('=') {
                self.token(TokenKind::RightShiftAssign)
            } else {
                self.token(TokenKind::RightShift)
            }
        } else if self.cursor.match_char('=') {
            self.token(TokenKind::GreaterThanEqual)
        } else {
            self.token(TokenKind::GreaterThan)
        }
    }

    fn scan_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            self.token(TokenKind::LogicalAnd)
        } else if self.cursor.match_char('=') {
            self.token(TokenKind::BitwiseAndAssign)
        } else {
            self.token(TokenKind::BitwiseAnd)
        }
    }

    fn scan_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('|') {
            self.token(TokenKind::LogicalOr)
        } else if self.cursor.match_char('=') {
            self.token(TokenKind::BitwiseOrAssign)
        } else {
            self.token(TokenKind::BitwiseOr)
        }
    }

    fn scan_caret(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.token(TokenKind::BitwiseXorAssign)
        } else {
            self.token(TokenKind::BitwiseXor)
        }
    }

    // ---- identifiers ----

    fn scan_identifier(&mut self) -> Token {
        let mut decoded = String::new();
        let mut has_escape = false;

        loop {
            let c = self.cursor.current_char();
            if c == '\\' && self.cursor.char_at(1) == 'u' {
                has_escape = true;
                self.cursor.advance(); // backslash
                self.cursor.advance(); // u
                match self.scan_hex_digits(4) {
                    Some(value) => match char::from_u32(value) {
                        Some(ch) if is_identifier_part(ch) || is_identifier_start(ch) => {
                            decoded.push(ch);
                        }
                        _ => {
                            self.report(ErrorKind::BadEscapeSequence);
                            decoded.push('\u{FFFD}');
                        }
                    },
                    None => {
                        self.report(ErrorKind::BadEscapeSequence);
                        decoded.push('\u{FFFD}');
                    }
                }
            } else if is_identifier_part(c) {
                decoded.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }

        if has_escape {
            // Escaped keywords do not act as keywords.
            self.identifier_text = Some(decoded);
            return self.token(TokenKind::Identifier);
        }

        let text = self.cursor.slice_from(self.token_start);
        match keyword_from_ident(text) {
            Some(kind) => self.token(kind),
            None => self.token(TokenKind::Identifier),
        }
    }

    fn scan_hex_digits(&mut self, count: u32) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let d = self.cursor.current_char().to_digit(16)?;
            value = value * 16 + d;
            self.cursor.advance();
        }
        Some(value)
    }

    // ---- numbers ----

    fn scan_number(&mut self) -> Token {
        let mut is_integer = true;

        if self.cursor.current_char() == '0'
            && matches!(self.cursor.char_at(1), 'x' | 'X' | 'o' | 'O' | 'b' | 'B')
        {
            let radix_char = self.cursor.char_at(1);
            self.cursor.advance();
            self.cursor.advance();
            let radix = match radix_char {
                'x' | 'X' => 16,
                'o' | 'O' => 8,
                _ => 2,
            };
            let digits_start = self.cursor.position();
            while self.cursor.current_char().to_digit(radix).is_some() {
                self.cursor.advance();
            }
            if self.cursor.position() == digits_start {
                self.report(ErrorKind::BadNumericLiteral);
            }
            return self.token(TokenKind::IntegerLiteral);
        }

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        if self.cursor.current_char() == '.' && self.cursor.char_at(1).is_ascii_digit() {
            is_integer = false;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        } else if self.cursor.current_char() == '.' && self.token_start < self.cursor.position() {
            // trailing dot: `1.` is a numeric literal
            is_integer = false;
            self.cursor.advance();
        }
        if matches!(self.cursor.current_char(), 'e' | 'E') {
            let next = self.cursor.char_at(1);
            let after_sign = self.cursor.char_at(2);
            if next.is_ascii_digit() || (matches!(next, '+' | '-') && after_sign.is_ascii_digit()) {
                is_integer = false;
                self.cursor.advance(); // e
                if matches!(self.cursor.current_char(), '+' | '-') {
                    self.cursor.advance();
                }
                while self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
            } else {
                // `1e` with no exponent digits
                is_integer = false;
                self.cursor.advance();
                self.report(ErrorKind::BadNumericLiteral);
            }
        }

        if is_integer {
            self.token(TokenKind::IntegerLiteral)
        } else {
            self.token(TokenKind::NumericLiteral)
        }
    }

    // ---- strings ----

    fn scan_string(&mut self) -> Token {
        let quote = self.cursor.current_char();
        self.cursor.advance();

        let mut value = String::new();
        let mut may_have_issues = false;

        loop {
            let c = self.cursor.current_char();
            if self.cursor.is_at_end() || is_line_terminator(c) {
                self.report(ErrorKind::UnterminatedString);
                may_have_issues = true;
                break;
            }
            if c == quote {
                self.cursor.advance();
                break;
            }
            if c == '\\' {
                self.cursor.advance();
                let esc = self.cursor.current_char();
                if is_line_terminator(esc) {
                    // line continuation contributes nothing to the value
                    self.cursor.advance();
                    if esc == '\r' && self.cursor.current_char() == '\n' {
                        self.cursor.advance();
                    }
                    continue;
                }
                match esc {
                    'b' => {
                        value.push('\u{0008}');
                        self.cursor.advance();
                    }
                    't' => {
                        value.push('\t');
                        self.cursor.advance();
                    }
                    'n' => {
                        value.push('\n');
                        self.cursor.advance();
                    }
                    'v' => {
                        value.push('\u{000B}');
                        self.cursor.advance();
                    }
                    'f' => {
                        value.push('\u{000C}');
                        self.cursor.advance();
                    }
                    'r' => {
                        value.push('\r');
                        self.cursor.advance();
                    }
                    'x' => {
                        self.cursor.advance();
                        match self.scan_hex_digits(2) {
                            Some(v) => value.push(char::from_u32(v).unwrap_or('\u{FFFD}')),
                            None => {
                                self.report(ErrorKind::BadEscapeSequence);
                                may_have_issues = true;
                                value.push('x');
                            }
                        }
                    }
                    'u' => {
                        self.cursor.advance();
                        match self.scan_hex_digits(4) {
                            Some(v) => match char::from_u32(v) {
                                Some(ch) => value.push(ch),
                                None => {
                                    may_have_issues = true;
                                    value.push('\u{FFFD}');
                                }
                            },
                            None => {
                                self.report(ErrorKind::BadEscapeSequence);
                                may_have_issues = true;
                                value.push('u');
                            }
                        }
                    }
                    '0'..='7' => {
                        // legacy octal escape, up to three digits
                        let mut v = 0u32;
                        let mut digits = 0;
                        while digits < 3 {
                            match self.cursor.current_char().to_digit(8) {
                                Some(d) if v * 8 + d < 256 => {
                                    v = v * 8 + d;
                                    digits += 1;
                                    self.cursor.advance();
                                }
                                _ => break,
                            }
                        }
                        value.push(char::from_u32(v).unwrap_or('\u{FFFD}'));
                        if !(v == 0 && digits == 1 && !self.cursor.current_char().is_ascii_digit())
                        {
                            // anything beyond a lone \0 is octal, illegal in
                            // strict code and unreproducible from the value
                            may_have_issues = true;
                        }
                    }
                    _ => {
                        // unknown escapes collapse to the escaped character
                        value.push(esc);
                        self.cursor.advance();
                    }
                }
            } else {
                value.push(c);
                self.cursor.advance();
            }
        }

        self.string_literal = Some(StringLiteral {
            value,
            may_have_issues,
        });
        self.token(TokenKind::StringLiteral)
    }

    // ---- regular expressions ----

    /// Attempt to re-scan a regex literal starting at the divide token the
    /// parser is holding. On success the scanner is positioned after the
    /// closing `/` and the pattern body is returned; on failure the scanner
    /// is restored to just after the divide token and `None` is returned.
    pub fn scan_regex(&mut self, divide_span: Span) -> Option<(String, Span)> {
        let saved = self.cursor.clone();
        self.rewind_to(&divide_span);

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        debug_assert_eq!(self.cursor.current_char(), '/');
        self.cursor.advance();

        let body_start = self.cursor.position();
        let mut in_class = false;
        loop {
            let c = self.cursor.current_char();
            if self.cursor.is_at_end() || is_line_terminator(c) {
                self.cursor = saved;
                return None;
            }
            match c {
                '\\' => {
                    self.cursor.advance();
                    if self.cursor.is_at_end() || is_line_terminator(self.cursor.current_char()) {
                        self.cursor = saved;
                        return None;
                    }
                    self.cursor.advance();
                }
                '[' => {
                    in_class = true;
                    self.cursor.advance();
                }
                ']' => {
                    in_class = false;
                    self.cursor.advance();
                }
                '/' if !in_class => {
                    let body = self.cursor.slice_from(body_start).to_owned();
                    if body.is_empty() {
                        // `//` is a comment, never an empty regex
                        self.cursor = saved;
                        return None;
                    }
                    self.cursor.advance();
                    return Some((body, self.span_from_start()));
                }
                _ => self.cursor.advance(),
            }
        }
    }

    /// Scan the identifier-continuation characters following a successful
    /// [`Scanner::scan_regex`] call.
    pub fn scan_regex_flags(&mut self) -> (String, Span) {
        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();
        let start = self.cursor.position();
        while is_identifier_part(self.cursor.current_char()) {
            self.cursor.advance();
        }
        (self.cursor.slice_from(start).to_owned(), self.span_from_start())
    }

    fn rewind_to(&mut self, span: &Span) {
        self.cursor = Cursor::at(
            self.document.text(),
            span.start,
            span.start_line,
            span.start_column,
        );
    }

    // ---- embedded blocks ----

    fn scan_asp_net_block(&mut self) -> Token {
        // consume "<%"
        self.cursor.advance();
        self.cursor.advance();
        loop {
            if self.cursor.is_at_end() {
                self.report(ErrorKind::UnterminatedAspNetBlock);
                break;
            }
            if self.cursor.starts_with("%>") {
                self.cursor.advance();
                self.cursor.advance();
                break;
            }
            self.cursor.advance();
        }
        self.token(TokenKind::AspNetBlock)
    }

    fn scan_conditional_comment(&mut self) -> Token {
        if self.cursor.starts_with("//@") {
            while !self.cursor.is_at_end() && !is_line_terminator(self.cursor.current_char()) {
                self.cursor.advance();
            }
            return self.token(TokenKind::ConditionalComment);
        }
        // "/*@" … "@*/" (a plain "*/" also terminates)
        self.cursor.advance();
        self.cursor.advance();
        loop {
            if self.cursor.is_at_end() {
                self.report(ErrorKind::UnterminatedComment);
                break;
            }
            if self.cursor.starts_with("*/") {
                self.cursor.advance();
                self.cursor.advance();
                break;
            }
            self.cursor.advance();
        }
        self.token(TokenKind::ConditionalComment)
    }

    // ---- whitespace, comments, directives ----

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let c = self.cursor.current_char();
            if self.cursor.is_at_end() {
                return;
            }
            if is_line_terminator(c) {
                self.found_newline = true;
                self.cursor.advance();
            } else if is_js_whitespace(c) {
                self.cursor.advance();
            } else if c == '/' && self.cursor.char_at(1) == '/' {
                if !self.settings.ignore_conditional_compilation && self.cursor.starts_with("//@") {
                    // conditional-compilation comment: tokenized, not skipped
                    return;
                }
                if self.cursor.starts_with("///#") {
                    self.handle_directive();
                } else {
                    self.skip_line_comment();
                }
            } else if c == '/' && self.cursor.char_at(1) == '*' {
                if !self.settings.ignore_conditional_compilation && self.cursor.starts_with("/*@") {
                    return;
                }
                self.skip_block_comment();
            } else {
                return;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        let start = self.cursor.position();
        let line = self.cursor.line();
        let column = self.cursor.column();
        while !self.cursor.is_at_end() && !is_line_terminator(self.cursor.current_char()) {
            self.cursor.advance();
        }
        self.classify_comment(start, line, column);
    }

    fn skip_block_comment(&mut self) {
        let start = self.cursor.position();
        let line = self.cursor.line();
        let column = self.cursor.column();
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        loop {
            if self.cursor.is_at_end() {
                self.token_start = start;
                self.token_start_line = line;
                self.token_start_column = column;
                self.report(ErrorKind::UnterminatedComment);
                return;
            }
            if self.cursor.starts_with("*/") {
                self.cursor.advance();
                self.cursor.advance();
                break;
            }
            if is_line_terminator(self.cursor.current_char()) {
                self.found_newline = true;
            }
            self.cursor.advance();
        }
        self.classify_comment(start, line, column);
    }

    /// Queue the comment just skipped when it is important: text begins with
    /// `!`, or contains `@preserve` / `@license` (case-insensitive).
    fn classify_comment(&mut self, start: usize, line: u32, column: u32) {
        if !self.settings.collect_important_comments {
            return;
        }
        let text = self.cursor.slice_from(start);
        let body = text
            .trim_start_matches("//")
            .trim_start_matches("/*")
            .trim_start();
        let important = body.starts_with('!') || {
            let lower = text.to_ascii_lowercase();
            lower.contains("@preserve") || lower.contains("@license")
        };
        if important {
            self.important_comments.push(ImportantComment {
                text: text.to_owned(),
                span: Span {
                    start,
                    end: self.cursor.position(),
                    start_line: line,
                    start_column: column,
                    end_line: self.cursor.line(),
                    end_column: self.cursor.column(),
                    file_id: self.document.file_id(),
                },
            });
        }
    }

    /// Handle a `///#` preprocessor directive.
    fn handle_directive(&mut self) {
        let start = self.cursor.position();
        while !self.cursor.is_at_end() && !is_line_terminator(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        let rest = &text[4..]; // after "///#"
        let mut words = rest.split_whitespace();
        let Some(directive) = words.next() else {
            return;
        };

        match directive.to_ascii_uppercase().as_str() {
            "SOURCE" => {
                // ///#source <line> <col> <file> — acts as a line terminator
                // and starts a new module
                self.found_newline = true;
                self.new_module = true;
                if let Some(line) = words.next().and_then(|w| w.parse::<u32>().ok()) {
                    // consume the terminator so the rebased line number
                    // applies to the directive's successor line
                    if !self.cursor.is_at_end() {
                        self.cursor.advance();
                    }
                    self.cursor.rebase_line(line);
                }
            }
            "DEBUG" => {
                if self.settings.strip_debug_statements {
                    self.skip_until_directive("ENDDEBUG");
                }
            }
            "ENDDEBUG" => {}
            "DEFINE" => {
                if let Some(name) = words.next() {
                    self.defined_names.insert(Symbol::intern(name));
                }
            }
            "UNDEF" => {
                if let Some(name) = words.next() {
                    self.defined_names.remove(&Symbol::intern(name));
                }
            }
            "IF" => {
                let defined = words
                    .next()
                    .map(|name| self.defined_names.contains(&Symbol::intern(name)))
                    .unwrap_or(false);
                if !defined {
                    self.skip_conditional_region();
                }
            }
            "ELSE" => {
                // reached only when the #IF branch was included
                self.skip_until_directive("ENDIF");
            }
            "ENDIF" => {}
            _ => {}
        }
    }

    /// Skip forward until the named `///#` directive, consuming it.
    fn skip_until_directive(&mut self, name: &str) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }
            if is_line_terminator(self.cursor.current_char()) {
                self.found_newline = true;
            }
            if self.cursor.starts_with("///#") {
                let start = self.cursor.position();
                while !self.cursor.is_at_end() && !is_line_terminator(self.cursor.current_char()) {
                    self.cursor.advance();
                }
                let text = self.cursor.slice_from(start);
                if text[4..]
                    .trim_start()
                    .to_ascii_uppercase()
                    .starts_with(name)
                {
                    return;
                }
            } else {
                self.cursor.advance();
            }
        }
    }

    /// Skip a false `///#IF` region to its `///#ELSE` (inclusive) or
    /// matching `///#ENDIF`, honoring nesting.
    fn skip_conditional_region(&mut self) {
        let mut depth = 0u32;
        loop {
            if self.cursor.is_at_end() {
                return;
            }
            if is_line_terminator(self.cursor.current_char()) {
                self.found_newline = true;
            }
            if self.cursor.starts_with("///#") {
                let start = self.cursor.position();
                while !self.cursor.is_at_end() && !is_line_terminator(self.cursor.current_char()) {
                    self.cursor.advance();
                }
                let upper = self.cursor.slice_from(start)[4..]
                    .trim_start()
                    .to_ascii_uppercase();
                if upper.starts_with("IF") {
                    depth += 1;
                } else if upper.starts_with("ENDIF") {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                } else if upper.starts_with("ELSE") && depth == 0 {
                    return;
                }
            } else {
                self.cursor.advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_kinds(source: &str) -> Vec<TokenKind> {
        let doc = Document::new("test.js", source);
        let handler = Handler::new();
        let mut scanner = Scanner::new(&doc, &handler, ScannerSettings::default());
        let mut kinds = Vec::new();
        loop {
            let t = scanner.next_token();
            if t.kind == TokenKind::EndOfFile {
                break;
            }
            kinds.push(t.kind);
        }
        kinds
    }

    #[test]
    fn test_basic_statement() {
        use TokenKind::*;
        assert_eq!(
            scan_kinds("var x = 1;"),
            vec![Var, Identifier, Assign, IntegerLiteral, Semicolon]
        );
    }

    #[test]
    fn test_compound_operators() {
        use TokenKind::*;
        assert_eq!(
            scan_kinds("a >>>= b !== c <<= d"),
            vec![
                Identifier,
                UnsignedRightShiftAssign,
                Identifier,
                StrictNotEqual,
                Identifier,
                LeftShiftAssign,
                Identifier
            ]
        );
    }

    #[test]
    fn test_numeric_kinds() {
        use TokenKind::*;
        assert_eq!(
            scan_kinds("1 1.5 .5 1e3 0x10 1."),
            vec![
                IntegerLiteral,
                NumericLiteral,
                NumericLiteral,
                NumericLiteral,
                IntegerLiteral,
                NumericLiteral
            ]
        );
    }

    #[test]
    fn test_found_newline_flag() {
        let doc = Document::new("t.js", "a\nb c");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        s.next_token();
        assert!(!s.found_newline());
        s.next_token();
        assert!(s.found_newline());
        s.next_token();
        assert!(!s.found_newline());
    }

    #[test]
    fn test_comment_sets_newline_flag() {
        let doc = Document::new("t.js", "a /* x \n y */ b");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        s.next_token();
        s.next_token();
        assert!(s.found_newline());
    }

    #[test]
    fn test_string_decoding() {
        let doc = Document::new("t.js", r#"'a\tb\x41B'"#);
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let t = s.next_token();
        assert_eq!(t.kind, TokenKind::StringLiteral);
        let lit = s.take_string_literal();
        assert_eq!(lit.value, "a\tbAB");
        assert!(!lit.may_have_issues);
    }

    #[test]
    fn test_octal_escape_flags_issues() {
        let doc = Document::new("t.js", r"'\101'");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        s.next_token();
        let lit = s.take_string_literal();
        assert_eq!(lit.value, "A");
        assert!(lit.may_have_issues);
    }

    #[test]
    fn test_unterminated_string() {
        let doc = Document::new("t.js", "'abc\nx");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let t = s.next_token();
        assert_eq!(t.kind, TokenKind::StringLiteral);
        assert!(handler.has_errors());
        assert!(s.take_string_literal().may_have_issues);
    }

    #[test]
    fn test_important_comment_queue() {
        let doc = Document::new("t.js", "/*! keep me */ var x;");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let t = s.next_token();
        assert_eq!(t.kind, TokenKind::Var);
        let comments = s.take_important_comments();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "/*! keep me */");
    }

    #[test]
    fn test_preserve_comment_detected() {
        let doc = Document::new("t.js", "/* @PRESERVE legal */ x");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        s.next_token();
        assert_eq!(s.take_important_comments().len(), 1);
    }

    #[test]
    fn test_plain_comments_skipped() {
        use TokenKind::*;
        assert_eq!(scan_kinds("a // plain\n/* also */ b"), vec![Identifier, Identifier]);
    }

    #[test]
    fn test_regex_rescan() {
        let doc = Document::new("t.js", "/ab+c/gi");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let divide = s.next_token();
        assert_eq!(divide.kind, TokenKind::Divide);
        let (body, _) = s.scan_regex(divide.span).expect("regex should scan");
        assert_eq!(body, "ab+c");
        let (flags, _) = s.scan_regex_flags();
        assert_eq!(flags, "gi");
        assert_eq!(s.next_token().kind, TokenKind::EndOfFile);
    }

    #[test]
    fn test_regex_with_class_and_escape() {
        let doc = Document::new("t.js", r"/[/\]]\//");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let divide = s.next_token();
        let (body, _) = s.scan_regex(divide.span).expect("regex should scan");
        assert_eq!(body, r"[/\]]\/");
    }

    #[test]
    fn test_regex_failure_restores_position() {
        let doc = Document::new("t.js", "/ 2");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let divide = s.next_token();
        assert!(s.scan_regex(divide.span).is_none());
        assert_eq!(s.next_token().kind, TokenKind::IntegerLiteral);
    }

    #[test]
    fn test_conditional_comment_token() {
        let doc = Document::new("t.js", "/*@cc_on @*/ x");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let t = s.next_token();
        assert_eq!(t.kind, TokenKind::ConditionalComment);
        assert_eq!(s.next_token().kind, TokenKind::Identifier);
    }

    #[test]
    fn test_conditional_comment_ignored_when_configured() {
        let doc = Document::new("t.js", "/*@cc_on @*/ x");
        let handler = Handler::new();
        let settings = ScannerSettings {
            ignore_conditional_compilation: true,
            ..Default::default()
        };
        let mut s = Scanner::new(&doc, &handler, settings);
        assert_eq!(s.next_token().kind, TokenKind::Identifier);
    }

    #[test]
    fn test_source_directive() {
        let doc = Document::new("t.js", "a\n///#source 1 1 other.js\nb");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        s.next_token();
        let t = s.next_token();
        assert_eq!(t.kind, TokenKind::Identifier);
        assert!(s.found_newline());
        assert!(s.take_new_module());
        assert_eq!(t.span.start_line, 1);
    }

    #[test]
    fn test_if_directive_excludes_region() {
        use TokenKind::*;
        let doc = Document::new("t.js", "a\n///#IF MISSING\nb\n///#ENDIF\nc");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let mut kinds = Vec::new();
        loop {
            let t = s.next_token();
            if t.kind == EndOfFile {
                break;
            }
            kinds.push(t.kind);
        }
        assert_eq!(kinds, vec![Identifier, Identifier]);
    }

    #[test]
    fn test_debug_region_stripped() {
        use TokenKind::*;
        let doc = Document::new("t.js", "a\n///#DEBUG\nbad bad\n///#ENDDEBUG\nb");
        let handler = Handler::new();
        let settings = ScannerSettings {
            strip_debug_statements: true,
            ..std::default::Default::default()
        };
        let mut s = Scanner::new(&doc, &handler, settings);
        let mut kinds = Vec::new();
        loop {
            let t = s.next_token();
            if t.kind == EndOfFile {
                break;
            }
            kinds.push(t.kind);
        }
        assert_eq!(kinds, vec![Identifier, Identifier]);
    }

    #[test]
    fn test_asp_net_block() {
        let doc = Document::new("t.js", "x = <% Server.Thing %>;");
        let handler = Handler::new();
        let settings = ScannerSettings {
            allow_embedded_asp_net_blocks: true,
            ..Default::default()
        };
        let mut s = Scanner::new(&doc, &handler, settings);
        s.next_token();
        s.next_token();
        let t = s.next_token();
        assert_eq!(t.kind, TokenKind::AspNetBlock);
        assert_eq!(s.next_token().kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_clone_is_independent() {
        let doc = Document::new("t.js", "a b c");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        s.next_token();
        let mut peek = s.clone();
        let t1 = peek.next_token();
        let t2 = s.next_token();
        assert_eq!(t1, t2);
        assert_eq!(peek.next_token().kind, TokenKind::Identifier);
    }

    #[test]
    fn test_illegal_char_recovers() {
        use TokenKind::*;
        let doc = Document::new("t.js", "a # b");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        assert_eq!(s.next_token().kind, Identifier);
        assert_eq!(s.next_token().kind, Error);
        assert_eq!(s.next_token().kind, Identifier);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_escaped_identifier() {
        let doc = Document::new("t.js", "\\u0061bc");
        let handler = Handler::new();
        let mut s = Scanner::new(&doc, &handler, ScannerSettings::default());
        let t = s.next_token();
        assert_eq!(t.kind, TokenKind::Identifier);
        assert_eq!(s.take_identifier_text().as_deref(), Some("abc"));
    }
}
