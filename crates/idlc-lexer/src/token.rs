//! Token kinds produced by the lexer.

use idlc_common::Span;

/// The kind of a single token. Keywords are not distinguished from ordinary
/// identifiers here — the parser recognizes keywords by comparing the
/// lexeme text, since a Mojom-like grammar has very few reserved words and
/// most of them (`bool`, `int32`, `array`, ...) are only special in type
/// position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxKind {
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    /// An `@123` ordinal annotation. Already range-checked by the lexer.
    Ordinal,

    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Semicolon,
    Comma,
    Dot,
    Equals,
    Question,
    Minus,
    /// `=>`, separating a method's parameters from its response parameters.
    FatArrow,

    Eof,

    /// `/* ...` reached end of file without a closing `*/`.
    ErrorUnterminatedComment,
    /// A string literal reached end of line or file without a closing quote.
    ErrorUnterminatedString,
    /// A byte that cannot start any valid token.
    ErrorIllegalChar,
    /// `@` followed by a non-decimal token, or a decimal value outside
    /// `0..=4294967294`.
    ErrorInvalidOrdinal,
    /// An integer literal whose magnitude does not fit in any integer
    /// representation (wider than `u64`).
    ErrorIntegerOutOfRange,
    /// A float literal whose magnitude overflows `f64` (becomes infinite).
    ErrorFloatOutOfRange,
}

impl SyntaxKind {
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::ErrorUnterminatedComment
                | Self::ErrorUnterminatedString
                | Self::ErrorIllegalChar
                | Self::ErrorInvalidOrdinal
                | Self::ErrorIntegerOutOfRange
                | Self::ErrorFloatOutOfRange
        )
    }
}

/// A single lexical token: its kind and the byte span it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: SyntaxKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Slice the source text this token covers.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}
