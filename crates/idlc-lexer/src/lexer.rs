//! A hand-written scanner for Mojom-like interface description files.
//!
//! The scanner has no knowledge of the grammar beyond the shape of
//! individual lexemes: keywords are just identifiers to it, and it is the
//! parser's job to recognize `struct`, `int32`, `array`, and so on by text.

use idlc_common::Span;

use crate::token::{SyntaxKind, Token};

/// Scans a complete token stream from a source string.
///
/// `Lexer` is not an iterator because a handful of tokens (unterminated
/// comments, illegal characters) need to report a diagnostic `&'static str`
/// in addition to the token; callers use [`Lexer::tokenize`] to obtain the
/// whole stream up front, which is what the parser driver does.
pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Scan the entire source into a token stream, terminated by `Eof`.
    #[must_use]
    pub fn tokenize(source: &'a str) -> Vec<Token> {
        let mut lexer = Self::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == SyntaxKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn next_token(&mut self) -> Token {
        if let Some(start) = self.scan_trivia_tracking_comment() {
            return Token::new(
                SyntaxKind::ErrorUnterminatedComment,
                Span::new(start as u32, self.pos as u32),
            );
        }

        let start = self.pos;
        let Some(b) = self.peek() else {
            return Token::new(SyntaxKind::Eof, Span::at(start as u32));
        };

        match b {
            b'{' => self.single(SyntaxKind::LBrace),
            b'}' => self.single(SyntaxKind::RBrace),
            b'(' => self.single(SyntaxKind::LParen),
            b')' => self.single(SyntaxKind::RParen),
            b'[' => self.single(SyntaxKind::LBracket),
            b']' => self.single(SyntaxKind::RBracket),
            b'<' => self.single(SyntaxKind::LAngle),
            b'>' => self.single(SyntaxKind::RAngle),
            b';' => self.single(SyntaxKind::Semicolon),
            b',' => self.single(SyntaxKind::Comma),
            b'.' => self.single(SyntaxKind::Dot),
            b'?' => self.single(SyntaxKind::Question),
            b'=' if self.peek_at(1) == Some(b'>') => {
                self.pos += 2;
                Token::new(SyntaxKind::FatArrow, Span::new(start as u32, self.pos as u32))
            }
            b'=' => self.single(SyntaxKind::Equals),
            b'-' => self.single(SyntaxKind::Minus),
            b'@' => self.scan_ordinal(start),
            b'"' => self.scan_string(start),
            b'0'..=b'9' => self.scan_number(start),
            b'_' | b'a'..=b'z' | b'A'..=b'Z' => self.scan_identifier(start),
            _ if b >= 0x80 => self.scan_identifier(start),
            _ => {
                self.pos += 1;
                Token::new(
                    SyntaxKind::ErrorIllegalChar,
                    Span::new(start as u32, self.pos as u32),
                )
            }
        }
    }

    /// Skips whitespace and comments, returning `Some(start_offset)` if an
    /// unterminated block comment consumed the rest of the file.
    fn scan_trivia_tracking_comment(&mut self) -> Option<usize> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.pos += 1;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let comment_start = self.pos;
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => return Some(comment_start),
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            _ => self.pos += 1,
                        }
                    }
                }
                _ => return None,
            }
        }
    }

    fn single(&mut self, kind: SyntaxKind) -> Token {
        let start = self.pos;
        self.pos += 1;
        Token::new(kind, Span::new(start as u32, self.pos as u32))
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        while matches!(self.peek(), Some(b) if is_identifier_byte(b)) {
            self.pos += 1;
        }
        Token::new(SyntaxKind::Identifier, Span::new(start as u32, self.pos as u32))
    }

    fn scan_ordinal(&mut self, start: usize) -> Token {
        self.pos += 1; // consume '@'
        let digits_start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        // Any further identifier characters right after the digits (or no
        // digits at all) mean the ordinal was not a plain decimal integer.
        let trailing_alpha = matches!(self.peek(), Some(b'_' | b'a'..=b'z' | b'A'..=b'Z'));
        let digits = &self.source[digits_start..self.pos];
        let span = Span::new(start as u32, self.pos as u32);
        if digits.is_empty() || trailing_alpha {
            while matches!(self.peek(), Some(b'_' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9')) {
                self.pos += 1;
            }
            return Token::new(
                SyntaxKind::ErrorInvalidOrdinal,
                Span::new(start as u32, self.pos as u32),
            );
        }
        match digits.parse::<u64>() {
            Ok(value) if value <= 4_294_967_294 => Token::new(SyntaxKind::Ordinal, span),
            _ => Token::new(SyntaxKind::ErrorInvalidOrdinal, span),
        }
    }

    fn scan_string(&mut self, start: usize) -> Token {
        self.pos += 1; // opening quote
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    return Token::new(
                        SyntaxKind::ErrorUnterminatedString,
                        Span::new(start as u32, self.pos as u32),
                    );
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_some() {
                        self.pos += 1;
                    }
                }
                Some(b'"') => {
                    self.pos += 1;
                    return Token::new(
                        SyntaxKind::StringLiteral,
                        Span::new(start as u32, self.pos as u32),
                    );
                }
                _ => self.pos += 1,
            }
        }
    }

    fn scan_number(&mut self, start: usize) -> Token {
        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.pos += 2;
            let digits_start = self.pos;
            while matches!(self.peek(), Some(b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F')) {
                self.pos += 1;
            }
            let span = Span::new(start as u32, self.pos as u32);
            let digits = &self.source[digits_start..self.pos];
            return match u128::from_str_radix(digits, 16) {
                Ok(value) if value <= u128::from(u64::MAX) => {
                    Token::new(SyntaxKind::IntegerLiteral, span)
                }
                _ => Token::new(SyntaxKind::ErrorIntegerOutOfRange, span),
            };
        }

        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }

        let mut is_float = false;
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b'0'..=b'9')) {
            is_float = true;
            self.pos += 1;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let save = self.pos;
            let mut cursor = self.pos + 1;
            if matches!(self.bytes.get(cursor), Some(b'+' | b'-')) {
                cursor += 1;
            }
            if matches!(self.bytes.get(cursor), Some(b'0'..=b'9')) {
                is_float = true;
                self.pos = cursor;
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    self.pos += 1;
                }
            } else {
                self.pos = save;
            }
        }

        let span = Span::new(start as u32, self.pos as u32);
        let text = &self.source[start..self.pos];
        if is_float {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Token::new(SyntaxKind::FloatLiteral, span),
                _ => Token::new(SyntaxKind::ErrorFloatOutOfRange, span),
            }
        } else {
            match text.parse::<u128>() {
                Ok(value) if value <= u128::from(u64::MAX) => {
                    Token::new(SyntaxKind::IntegerLiteral, span)
                }
                _ => Token::new(SyntaxKind::ErrorIntegerOutOfRange, span),
            }
        }
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric() || b >= 0x80
}

/// Interpret the escape sequences inside a scanned string literal's text
/// (including the surrounding quotes) and return the literal's value.
#[must_use]
pub fn unescape_string_literal(raw: &str) -> String {
    let inner = raw.strip_prefix('"').unwrap_or(raw);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
