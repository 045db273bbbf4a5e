//! Tokenizer for Mojom-like interface description files.
//!
//! This crate is an external collaborator of the semantic core: it produces
//! a flat token stream, including error tokens for unterminated comments and
//! strings, illegal characters, and out-of-range literals. It has no
//! knowledge of declarations, scopes, or types.

pub mod lexer;
pub mod token;

pub use lexer::{Lexer, unescape_string_literal};
pub use token::{SyntaxKind, Token};

#[cfg(test)]
#[path = "../tests/lexer_tests.rs"]
mod tests;
