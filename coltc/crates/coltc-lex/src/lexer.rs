//! Main lexer implementation for the Colt language.
//!
//! The lexer transforms source text into a stream of [`Token`]s, one call
//! to [`Lexer::next_token`] at a time. Between calls it exposes the current
//! lexeme as a view into the source, the parsed identifier, the decoded
//! literal payload, the current line, and the amount of whitespace skipped
//! before the lexeme. Lexical errors are reported through the shared
//! [`Handler`] and recovered locally; the lexer never panics on user input
//! and returns [`Token::Eof`] indefinitely once past the end.

use coltc_util::{ByteRange, Handler, Qword, SourceSpan, Symbol};

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, Token};

/// Line and lexeme information for the current token.
///
/// Captured by the parser to build [`SourceSpan`]s covering whole
/// expressions.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineInfo {
    /// Line the lexeme starts on (1-based).
    pub line_nb: u32,
    /// Byte range of that line (without its terminating newline).
    pub line: ByteRange,
    /// Byte range of the lexeme itself.
    pub lexeme: ByteRange,
}

/// The Colt lexer.
///
/// # Example
///
/// ```
/// use coltc_lex::{Lexer, Token};
/// use coltc_util::Handler;
///
/// let handler = Handler::new();
/// let mut lexer = Lexer::new("var x = 42;", &handler);
///
/// assert_eq!(lexer.next_token(), Token::KeywordVar);
/// assert_eq!(lexer.next_token(), Token::Identifier);
/// assert_eq!(lexer.parsed_identifier().as_str(), "x");
/// ```
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Diagnostic sink shared with the parser.
    handler: &'a Handler,

    /// When false, lexical errors still produce recovery tokens but no
    /// diagnostics.
    report_errors: bool,

    /// Start offset of the current lexeme.
    lexeme_start: usize,

    /// Line the current lexeme starts on.
    lexeme_line: u32,

    /// Start offset of the line the current lexeme starts on.
    lexeme_line_start: usize,

    /// Whitespace (and comment) bytes skipped before the current lexeme.
    leading_ws: usize,

    /// Identifier of the last `Identifier`/keyword token.
    parsed_identifier: Symbol,

    /// Decoded payload of the last literal token.
    parsed_value: Qword,

    /// Decoded payload of the last string literal.
    parsed_string: String,

    /// Line number the cached line view belongs to.
    cached_line_nb: u32,

    /// Cached current-line byte range.
    cached_line: ByteRange,
}

impl<'a> Lexer<'a> {
    /// Create a lexer reporting errors through `handler`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self::with_reporting(source, handler, true)
    }

    /// Create a lexer, optionally muting diagnostics.
    pub fn with_reporting(source: &'a str, handler: &'a Handler, report_errors: bool) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            report_errors,
            lexeme_start: 0,
            lexeme_line: 1,
            lexeme_line_start: 0,
            leading_ws: 0,
            parsed_identifier: Symbol::EMPTY,
            parsed_value: Qword::ZERO,
            parsed_string: String::new(),
            cached_line_nb: 0,
            cached_line: ByteRange::new(0, 0),
        }
    }

    /// The source text being scanned.
    #[inline]
    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// The current lexeme, as a view into the source.
    #[inline]
    pub fn lexeme(&self) -> &'a str {
        self.cursor.slice_from(self.lexeme_start)
    }

    /// Byte range of the current lexeme.
    #[inline]
    pub fn lexeme_range(&self) -> ByteRange {
        ByteRange::new(self.lexeme_start, self.cursor.position())
    }

    /// Line the current lexeme starts on (1-based).
    #[inline]
    pub fn line_number(&self) -> u32 {
        self.lexeme_line
    }

    /// Whitespace bytes skipped before the current lexeme.
    #[inline]
    pub fn leading_whitespace(&self) -> usize {
        self.leading_ws
    }

    /// Identifier payload of the last `Identifier` or keyword token.
    #[inline]
    pub fn parsed_identifier(&self) -> Symbol {
        self.parsed_identifier
    }

    /// Literal payload of the last literal token.
    #[inline]
    pub fn parsed_value(&self) -> Qword {
        self.parsed_value
    }

    /// String payload of the last `StringLit` token.
    #[inline]
    pub fn parsed_string(&self) -> &str {
        &self.parsed_string
    }

    /// View over the line the current lexeme starts on, cached against the
    /// line number.
    pub fn current_line(&mut self) -> &'a str {
        let range = self.line_range();
        self.cursor.slice(range)
    }

    /// Line and lexeme information for the current token.
    pub fn line_info(&mut self) -> LineInfo {
        LineInfo {
            line_nb: self.lexeme_line,
            line: self.line_range(),
            lexeme: self.lexeme_range(),
        }
    }

    /// Span of the current lexeme, clipped to its starting line.
    pub fn lexeme_span(&mut self) -> SourceSpan {
        let line = self.line_range();
        let start = self.lexeme_start.min(line.end);
        let end = self.cursor.position().clamp(start, line.end);
        SourceSpan::single_line(self.lexeme_line, line, ByteRange::new(start, end))
    }

    fn line_range(&mut self) -> ByteRange {
        if self.cached_line_nb == self.lexeme_line {
            return self.cached_line;
        }
        let source = self.cursor.source();
        let start = self.lexeme_line_start;
        let end = source[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(source.len());
        self.cached_line = ByteRange::new(start, end);
        self.cached_line_nb = self.lexeme_line;
        self.cached_line
    }

    fn error(&mut self, message: impl Into<String>) {
        if self.report_errors {
            let span = self.lexeme_span();
            self.handler.error(message, span);
        }
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and comments, then dispatches on the first
    /// character. Returns [`Token::Eof`] forever once the input is
    /// exhausted.
    pub fn next_token(&mut self) -> Token {
        let skip_start = self.cursor.position();
        if let Some(tkn) = self.skip_whitespace_and_comments() {
            // unterminated block comment is fatal
            return tkn;
        }
        self.leading_ws = self.cursor.position() - skip_start;

        self.lexeme_start = self.cursor.position();
        self.lexeme_line = self.cursor.line();
        self.lexeme_line_start = self.cursor.line_start();

        if self.cursor.is_at_end() {
            return Token::Eof;
        }

        let c = self.cursor.current_char();
        if c.is_ascii_alphabetic() || c == '_' {
            return self.lex_identifier();
        }
        if c.is_ascii_digit() {
            return self.lex_number();
        }

        match c {
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_equal(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_great(),
            '&' => self.lex_amp(),
            '|' => self.lex_pipe(),
            '^' => self.lex_caret(),
            '.' => self.lex_dot(),
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            ':' => self.single(Token::Colon),
            '~' => self.single(Token::Tilde),
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            '{' => self.single(Token::LeftCurly),
            '}' => self.single(Token::RightCurly),
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            '[' => self.single(Token::LeftSquare),
            ']' => self.single(Token::RightSquare),
            _ => {
                self.cursor.advance();
                self.error("Unexpected character!");
                Token::Error
            }
        }
    }

    fn single(&mut self, tkn: Token) -> Token {
        self.cursor.advance();
        tkn
    }

    /// Skip whitespace and comments. Returns `Some(Eof)` on an unterminated
    /// block comment, which is fatal.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                '/' if self.cursor.peek_char(1) == '*' => {
                    // Point the diagnostic at the opening of the comment
                    self.lexeme_start = self.cursor.position();
                    self.lexeme_line = self.cursor.line();
                    self.lexeme_line_start = self.cursor.line_start();
                    self.cursor.advance();
                    self.cursor.advance();
                    loop {
                        if self.cursor.is_at_end() {
                            self.error("Unterminated multi-line comment!");
                            return Some(Token::Eof);
                        }
                        if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        self.cursor.advance();
                    }
                }
                _ => return None,
            }
        }
    }

    // =========================================================================
    // IDENTIFIERS AND KEYWORDS
    // =========================================================================

    fn lex_identifier(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_alphanumeric() || self.cursor.current_char() == '_'
        {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.lexeme_start);
        self.parsed_identifier = Symbol::intern(text);

        match text {
            "true" => {
                self.parsed_value = Qword::from(true);
                Token::BoolLit
            }
            "false" => {
                self.parsed_value = Qword::from(false);
                Token::BoolLit
            }
            _ => keyword_from_ident(text).unwrap_or(Token::Identifier),
        }
    }

    // =========================================================================
    // NUMBERS
    // =========================================================================

    fn lex_number(&mut self) -> Token {
        self.parsed_value = Qword::ZERO;

        if self.cursor.current_char() == '0'
            && matches!(self.cursor.peek_char(1), 'x' | 'b' | 'o')
        {
            return self.lex_based_integer();
        }

        // Decimal integer part
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_float = false;
        // [0-9]+ followed by .[0-9] is a float
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        // [0-9]+(.[0-9]+)?e[+-]?[0-9]+ is a float
        if self.cursor.current_char() == 'e'
            && matches!(self.cursor.peek_char(1), '+' | '-' | '0'..='9')
        {
            is_float = true;
            self.cursor.advance();
            if matches!(self.cursor.current_char(), '+' | '-') {
                self.cursor.advance();
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        if is_float {
            self.lex_float_suffix()
        } else {
            let text = self.cursor.slice_from(self.lexeme_start);
            let tkn = self.lex_integral_suffix();
            match text.parse::<u64>() {
                Ok(value) => {
                    self.parsed_value = Qword::from(value);
                    tkn
                }
                Err(_) => {
                    self.error("Invalid integral literal!");
                    Token::Error
                }
            }
        }
    }

    fn lex_based_integer(&mut self) -> Token {
        self.cursor.advance(); // 0
        let base_char = self.cursor.current_char();
        self.cursor.advance(); // x | b | o
        let (base, range_str) = match base_char {
            'x' => (16, "[0-9a-f]"),
            'b' => (2, "[0-1]"),
            _ => (8, "[0-7]"),
        };

        let digit_start = self.cursor.position();
        while self.cursor.current_char().is_ascii_alphanumeric() {
            self.cursor.advance();
        }

        if self.cursor.position() == digit_start {
            self.error(format!(
                "Integral literals starting with 0{} should be followed by characters in range {}!",
                base_char, range_str
            ));
            return Token::Error;
        }

        let digits = self
            .cursor
            .slice(ByteRange::new(digit_start, self.cursor.position()));
        match u64::from_str_radix(digits, base) {
            Ok(value) => {
                self.parsed_value = Qword::from(value);
                Token::U64Lit
            }
            Err(_) => {
                self.error("Invalid integral literal!");
                Token::Error
            }
        }
    }

    fn lex_float_suffix(&mut self) -> Token {
        let text = self.cursor.slice_from(self.lexeme_start);
        match self.cursor.current_char().to_ascii_lowercase() {
            'f' => {
                self.cursor.advance();
                match text.parse::<f32>() {
                    Ok(value) => {
                        self.parsed_value = Qword::from(value);
                        Token::FloatLit
                    }
                    Err(_) => {
                        self.error("Invalid float literal!");
                        Token::Error
                    }
                }
            }
            c => {
                if c == 'd' {
                    self.cursor.advance();
                }
                match text.parse::<f64>() {
                    Ok(value) => {
                        self.parsed_value = Qword::from(value);
                        Token::DoubleLit
                    }
                    Err(_) => {
                        self.error("Invalid double literal!");
                        Token::Error
                    }
                }
            }
        }
    }

    /// Recognise an `[iIuU](8|16|32|64)` suffix, consuming it only on a
    /// full match. Defaults to the 64-bit signed literal.
    fn lex_integral_suffix(&mut self) -> Token {
        let signed = match self.cursor.current_char().to_ascii_lowercase() {
            'i' => true,
            'u' => false,
            _ => return Token::I64Lit,
        };
        let (tkn, width) = match (self.cursor.peek_char(1), self.cursor.peek_char(2)) {
            ('8', _) => (if signed { Token::I8Lit } else { Token::U8Lit }, 2),
            ('1', '6') => (if signed { Token::I16Lit } else { Token::U16Lit }, 3),
            ('3', '2') => (if signed { Token::I32Lit } else { Token::U32Lit }, 3),
            ('6', '4') => (if signed { Token::I64Lit } else { Token::U64Lit }, 3),
            _ => return Token::I64Lit,
        };
        for _ in 0..width {
            self.cursor.advance();
        }
        tkn
    }

    // =========================================================================
    // STRING AND CHAR LITERALS
    // =========================================================================

    fn lex_string(&mut self) -> Token {
        self.parsed_string.clear();
        self.cursor.advance(); // consume "

        loop {
            let c = self.cursor.current_char();
            if c == '"' || c == '\n' || self.cursor.is_at_end() {
                break;
            }
            if c == '\\' {
                match self.lex_escape() {
                    Some(escaped) => self.parsed_string.push(escaped),
                    None => {
                        // skip the offending character itself
                        self.cursor.advance();
                        self.recover_to(&[';', '\'', '\n']);
                        self.error("Invalid escape sequence!");
                        return Token::Error;
                    }
                }
            } else {
                self.parsed_string.push(c);
                self.cursor.advance();
            }
        }

        if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
            self.error("Unterminated string literal!");
            return Token::Error;
        }
        self.cursor.advance(); // consume closing "
        Token::StringLit
    }

    fn lex_char(&mut self) -> Token {
        self.parsed_value = Qword::ZERO;
        self.cursor.advance(); // consume '

        let c = self.cursor.current_char();
        if c == '\'' {
            self.cursor.advance();
            self.error("A char literal should at least contain a character!");
            return Token::Error;
        }

        let value = if c == '\\' {
            match self.lex_escape() {
                Some(escaped) => escaped,
                None => {
                    // skip the offending character itself
                    self.cursor.advance();
                    self.recover_to(&[';', ')', '\n']);
                    self.error("Invalid escape sequence!");
                    return Token::Error;
                }
            }
        } else {
            self.cursor.advance();
            c
        };
        self.parsed_value = Qword::from(value);

        if self.cursor.is_at_end() || self.cursor.current_char() != '\'' {
            self.recover_to(&[';', '\n', '\'']);
            self.error("Invalid char literal!");
            return Token::Error;
        }
        self.cursor.advance(); // consume closing '
        Token::CharLit
    }

    /// Decode an escape sequence. The cursor sits on the backslash; on
    /// success it ends past the escape, on failure it sits on the bad
    /// character.
    fn lex_escape(&mut self) -> Option<char> {
        self.cursor.advance(); // consume backslash
        let escaped = match self.cursor.current_char() {
            '\'' => '\'',
            '"' => '"',
            '\\' => '\\',
            '0' => '\0',
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0B',
            _ => return None,
        };
        self.cursor.advance();
        Some(escaped)
    }

    /// Consume everything up to (excluding) one of `sync` or the end of
    /// input.
    fn recover_to(&mut self, sync: &[char]) {
        while !self.cursor.is_at_end() && !sync.contains(&self.cursor.current_char()) {
            self.cursor.advance();
        }
    }

    // =========================================================================
    // OPERATORS (maximal munch)
    // =========================================================================

    fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::PlusEqual),
            '+' => self.single(Token::PlusPlus),
            _ => Token::Plus,
        }
    }

    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::MinusEqual),
            '-' => self.single(Token::MinusMinus),
            '>' => self.single(Token::MinusGreat),
            _ => Token::Minus,
        }
    }

    fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::StarEqual),
            _ => Token::Star,
        }
    }

    fn lex_slash(&mut self) -> Token {
        // comments were consumed while skipping whitespace
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::SlashEqual),
            _ => Token::Slash,
        }
    }

    fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::PercentEqual),
            _ => Token::Percent,
        }
    }

    fn lex_equal(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::EqualEqual),
            '>' => self.single(Token::EqualGreat),
            _ => Token::Equal,
        }
    }

    fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::BangEqual),
            _ => Token::Bang,
        }
    }

    fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::LessEqual),
            '<' => {
                self.cursor.advance();
                match self.cursor.current_char() {
                    '=' => self.single(Token::LessLessEqual),
                    _ => Token::LessLess,
                }
            }
            _ => Token::Less,
        }
    }

    fn lex_great(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::GreatEqual),
            '>' => {
                self.cursor.advance();
                match self.cursor.current_char() {
                    '=' => self.single(Token::GreatGreatEqual),
                    _ => Token::GreatGreat,
                }
            }
            _ => Token::Great,
        }
    }

    fn lex_amp(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::AmpEqual),
            '&' => self.single(Token::AmpAmp),
            _ => Token::Amp,
        }
    }

    fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::PipeEqual),
            '|' => self.single(Token::PipePipe),
            _ => Token::Pipe,
        }
    }

    fn lex_caret(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '=' => self.single(Token::CaretEqual),
            _ => Token::Caret,
        }
    }

    fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if !self.cursor.current_char().is_ascii_digit() {
            return Token::Dot;
        }

        // .5 starts a float
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        if self.cursor.current_char() == 'e'
            && matches!(self.cursor.peek_char(1), '+' | '-' | '0'..='9')
        {
            self.cursor.advance();
            if matches!(self.cursor.current_char(), '+' | '-') {
                self.cursor.advance();
            }
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        self.lex_float_suffix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> (Vec<Token>, Handler) {
        let handler = Handler::new();
        let mut tokens = Vec::new();
        {
            let mut lexer = Lexer::new(source, &handler);
            loop {
                let tkn = lexer.next_token();
                if tkn == Token::Eof {
                    break;
                }
                tokens.push(tkn);
                assert!(tokens.len() < 10_000, "lexer failed to make progress");
            }
        }
        (tokens, handler)
    }

    fn lex_one(source: &str) -> (Token, Qword, Handler) {
        let handler = Handler::new();
        let (tkn, value) = {
            let mut lexer = Lexer::new(source, &handler);
            let tkn = lexer.next_token();
            (tkn, lexer.parsed_value())
        };
        (tkn, value, handler)
    }

    // =========================================================================
    // IDENTIFIERS AND KEYWORDS
    // =========================================================================

    #[test]
    fn test_identifier() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("some_name2", &handler);
        assert_eq!(lexer.next_token(), Token::Identifier);
        assert_eq!(lexer.parsed_identifier().as_str(), "some_name2");
        assert_eq!(lexer.lexeme(), "some_name2");
    }

    #[test]
    fn test_keywords() {
        let (tokens, handler) = lex_all("fn var if elif else return mut PTR typeof extern");
        assert!(!handler.has_errors());
        assert_eq!(
            tokens,
            vec![
                Token::KeywordFn,
                Token::KeywordVar,
                Token::KeywordIf,
                Token::KeywordElif,
                Token::KeywordElse,
                Token::KeywordReturn,
                Token::KeywordMut,
                Token::KeywordPtr,
                Token::KeywordTypeof,
                Token::KeywordExtern,
            ]
        );
    }

    #[test]
    fn test_word_operators() {
        let (tokens, _) = lex_all("a and b or c");
        assert_eq!(
            tokens,
            vec![
                Token::Identifier,
                Token::AmpAmp,
                Token::Identifier,
                Token::PipePipe,
                Token::Identifier,
            ]
        );
    }

    #[test]
    fn test_bool_literals() {
        let (tkn, value, _) = lex_one("true");
        assert_eq!(tkn, Token::BoolLit);
        assert!(value.as_bool());

        let (tkn, value, _) = lex_one("false");
        assert_eq!(tkn, Token::BoolLit);
        assert!(!value.as_bool());
    }

    // =========================================================================
    // NUMBERS
    // =========================================================================

    #[test]
    fn test_default_integer_is_i64() {
        let (tkn, value, handler) = lex_one("1234");
        assert!(!handler.has_errors());
        assert_eq!(tkn, Token::I64Lit);
        assert_eq!(value.as_u64(), 1234);
    }

    #[test]
    fn test_integer_suffixes() {
        for (src, expected) in [
            ("10i8", Token::I8Lit),
            ("10u8", Token::U8Lit),
            ("10i16", Token::I16Lit),
            ("10u16", Token::U16Lit),
            ("10i32", Token::I32Lit),
            ("10u32", Token::U32Lit),
            ("10i64", Token::I64Lit),
            ("10u64", Token::U64Lit),
            ("10I8", Token::I8Lit),
            ("10U32", Token::U32Lit),
        ] {
            let (tkn, value, handler) = lex_one(src);
            assert!(!handler.has_errors(), "{}", src);
            assert_eq!(tkn, expected, "{}", src);
            assert_eq!(value.as_u64(), 10, "{}", src);
        }
    }

    #[test]
    fn test_partial_suffix_is_not_consumed() {
        // 10u1 is the integer 10 followed by the identifier u1
        let (tokens, _) = lex_all("10u1");
        assert_eq!(tokens, vec![Token::I64Lit, Token::Identifier]);
    }

    #[test]
    fn test_based_literals() {
        let (tkn, value, handler) = lex_one("0xFF");
        assert!(!handler.has_errors());
        assert_eq!(tkn, Token::U64Lit);
        assert_eq!(value.as_u64(), 0xFF);

        let (tkn, value, _) = lex_one("0b1010");
        assert_eq!(tkn, Token::U64Lit);
        assert_eq!(value.as_u64(), 10);

        let (tkn, value, _) = lex_one("0o777");
        assert_eq!(tkn, Token::U64Lit);
        assert_eq!(value.as_u64(), 0o777);
    }

    #[test]
    fn test_empty_hex_literal_is_an_error() {
        let (tkn, _, handler) = lex_one("0x");
        assert_eq!(tkn, Token::Error);
        assert_eq!(handler.error_count(), 1);
        let diags = handler.diagnostics();
        assert_eq!(
            diags[0].message,
            "Integral literals starting with 0x should be followed by characters in range [0-9a-f]!"
        );
    }

    #[test]
    fn test_bad_base_digits() {
        let (tkn, _, handler) = lex_one("0b210");
        assert_eq!(tkn, Token::Error);
        assert_eq!(handler.diagnostics()[0].message, "Invalid integral literal!");
    }

    #[test]
    fn test_float_literals() {
        let (tkn, value, handler) = lex_one("3.5");
        assert!(!handler.has_errors());
        assert_eq!(tkn, Token::DoubleLit);
        assert_eq!(value.as_f64(), 3.5);

        let (tkn, value, _) = lex_one("3.5f");
        assert_eq!(tkn, Token::FloatLit);
        assert_eq!(value.as_f32(), 3.5);

        let (tkn, value, _) = lex_one("3.5d");
        assert_eq!(tkn, Token::DoubleLit);
        assert_eq!(value.as_f64(), 3.5);

        let (tkn, value, _) = lex_one("2e3");
        assert_eq!(tkn, Token::DoubleLit);
        assert_eq!(value.as_f64(), 2000.0);

        let (tkn, value, _) = lex_one("2.5e-1");
        assert_eq!(tkn, Token::DoubleLit);
        assert_eq!(value.as_f64(), 0.25);

        let (tkn, value, _) = lex_one(".5");
        assert_eq!(tkn, Token::DoubleLit);
        assert_eq!(value.as_f64(), 0.5);
    }

    #[test]
    fn test_integer_dot_identifier_is_not_a_float() {
        let (tokens, _) = lex_all("10.to_string");
        assert_eq!(tokens, vec![Token::I64Lit, Token::Dot, Token::Identifier]);
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let (tkn, _, handler) = lex_one("99999999999999999999999999");
        assert_eq!(tkn, Token::Error);
        assert!(handler.has_errors());
    }

    // =========================================================================
    // STRINGS AND CHARS
    // =========================================================================

    #[test]
    fn test_string_literal() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("\"hello\\tworld\\n\"", &handler);
        assert_eq!(lexer.next_token(), Token::StringLit);
        assert_eq!(lexer.parsed_string(), "hello\tworld\n");
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_unterminated_string() {
        let (tkn, _, handler) = lex_one("\"abc");
        assert_eq!(tkn, Token::Error);
        assert_eq!(handler.diagnostics()[0].message, "Unterminated string literal!");
    }

    #[test]
    fn test_string_with_raw_newline() {
        let (tkn, _, handler) = lex_one("\"abc\ndef\"");
        assert_eq!(tkn, Token::Error);
        assert_eq!(handler.diagnostics()[0].message, "Unterminated string literal!");
    }

    #[test]
    fn test_bad_escape_in_string() {
        let (tkn, _, handler) = lex_one("\"ab\\q cd\";");
        assert_eq!(tkn, Token::Error);
        assert_eq!(handler.diagnostics()[0].message, "Invalid escape sequence!");
    }

    #[test]
    fn test_char_literal() {
        let (tkn, value, handler) = lex_one("'a'");
        assert!(!handler.has_errors());
        assert_eq!(tkn, Token::CharLit);
        assert_eq!(value.as_char(), 'a');

        let (tkn, value, _) = lex_one("'\\n'");
        assert_eq!(tkn, Token::CharLit);
        assert_eq!(value.as_char(), '\n');

        let (tkn, value, _) = lex_one("'\\0'");
        assert_eq!(tkn, Token::CharLit);
        assert_eq!(value.as_char(), '\0');
    }

    #[test]
    fn test_empty_char_literal() {
        let (tkn, _, handler) = lex_one("''");
        assert_eq!(tkn, Token::Error);
        assert_eq!(
            handler.diagnostics()[0].message,
            "A char literal should at least contain a character!"
        );
    }

    #[test]
    fn test_multi_char_literal() {
        let (tkn, _, handler) = lex_one("'ab'");
        assert_eq!(tkn, Token::Error);
        assert_eq!(handler.diagnostics()[0].message, "Invalid char literal!");
    }

    // =========================================================================
    // OPERATORS
    // =========================================================================

    #[test]
    fn test_maximal_munch() {
        let cases: &[(&str, &[Token])] = &[
            ("+ += ++", &[Token::Plus, Token::PlusEqual, Token::PlusPlus]),
            (
                "- -= -- ->",
                &[Token::Minus, Token::MinusEqual, Token::MinusMinus, Token::MinusGreat],
            ),
            ("* *=", &[Token::Star, Token::StarEqual]),
            ("/ /=", &[Token::Slash, Token::SlashEqual]),
            ("% %=", &[Token::Percent, Token::PercentEqual]),
            ("= == =>", &[Token::Equal, Token::EqualEqual, Token::EqualGreat]),
            ("! !=", &[Token::Bang, Token::BangEqual]),
            (
                "< <= << <<=",
                &[Token::Less, Token::LessEqual, Token::LessLess, Token::LessLessEqual],
            ),
            (
                "> >= >> >>=",
                &[Token::Great, Token::GreatEqual, Token::GreatGreat, Token::GreatGreatEqual],
            ),
            ("& &= &&", &[Token::Amp, Token::AmpEqual, Token::AmpAmp]),
            ("| |= ||", &[Token::Pipe, Token::PipeEqual, Token::PipePipe]),
            ("^ ^=", &[Token::Caret, Token::CaretEqual]),
            ("~ . ,", &[Token::Tilde, Token::Dot, Token::Comma]),
        ];
        for (src, expected) in cases {
            let (tokens, handler) = lex_all(src);
            assert!(!handler.has_errors(), "{}", src);
            assert_eq!(tokens.as_slice(), *expected, "{}", src);
        }
    }

    #[test]
    fn test_delimiters() {
        let (tokens, _) = lex_all("( ) { } [ ] ; : ,");
        assert_eq!(
            tokens,
            vec![
                Token::LeftParen,
                Token::RightParen,
                Token::LeftCurly,
                Token::RightCurly,
                Token::LeftSquare,
                Token::RightSquare,
                Token::Semicolon,
                Token::Colon,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, handler) = lex_all("a @ b");
        assert_eq!(tokens, vec![Token::Identifier, Token::Error, Token::Identifier]);
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.diagnostics()[0].message, "Unexpected character!");
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    #[test]
    fn test_line_comment() {
        let (tokens, handler) = lex_all("a // comment\nb");
        assert!(!handler.has_errors());
        assert_eq!(tokens, vec![Token::Identifier, Token::Identifier]);
    }

    #[test]
    fn test_block_comment() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("a /* one\ntwo\nthree */ b", &handler);
        assert_eq!(lexer.next_token(), Token::Identifier);
        assert_eq!(lexer.next_token(), Token::Identifier);
        // interior newlines were tracked
        assert_eq!(lexer.line_number(), 3);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (tkn, _, handler) = lex_one("/* unterminated");
        assert_eq!(tkn, Token::Eof);
        assert_eq!(handler.error_count(), 1);
        assert_eq!(
            handler.diagnostics()[0].message,
            "Unterminated multi-line comment!"
        );
    }

    // =========================================================================
    // LEXER STATE
    // =========================================================================

    #[test]
    fn test_eof_forever() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("x", &handler);
        assert_eq!(lexer.next_token(), Token::Identifier);
        for _ in 0..5 {
            assert_eq!(lexer.next_token(), Token::Eof);
        }
    }

    #[test]
    fn test_empty_source() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("", &handler);
        assert_eq!(lexer.next_token(), Token::Eof);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_line_numbers() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("a\nb\n\nc", &handler);
        lexer.next_token();
        assert_eq!(lexer.line_number(), 1);
        lexer.next_token();
        assert_eq!(lexer.line_number(), 2);
        lexer.next_token();
        assert_eq!(lexer.line_number(), 4);
    }

    #[test]
    fn test_current_line_view() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("first line\nsecond line", &handler);
        lexer.next_token();
        assert_eq!(lexer.current_line(), "first line");
        lexer.next_token(); // "line"
        assert_eq!(lexer.current_line(), "first line");
        lexer.next_token(); // "second"
        assert_eq!(lexer.current_line(), "second line");
    }

    #[test]
    fn test_leading_whitespace_count() {
        let handler = Handler::new();
        let mut lexer = Lexer::new("a   b", &handler);
        lexer.next_token();
        assert_eq!(lexer.leading_whitespace(), 0);
        lexer.next_token();
        assert_eq!(lexer.leading_whitespace(), 3);
    }

    #[test]
    fn test_lexeme_roundtrip() {
        let source = "fn main ( ) -> i64 { return 0x2A ; }";
        let handler = Handler::new();
        let mut lexer = Lexer::new(source, &handler);
        loop {
            let tkn = lexer.next_token();
            if tkn == Token::Eof {
                break;
            }
            let range = lexer.lexeme_range();
            assert_eq!(&source[range.start..range.end], lexer.lexeme());
        }
    }

    #[test]
    fn test_silent_lexer_reports_nothing() {
        let handler = Handler::new();
        let mut lexer = Lexer::with_reporting("0x", &handler, false);
        assert_eq!(lexer.next_token(), Token::Error);
        assert!(!handler.has_errors());
    }
}
