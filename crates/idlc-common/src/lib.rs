//! Common types and utilities shared by every crate of the idlc frontend.
//!
//! This crate provides foundational types used by the lexer, parser and
//! semantic core alike:
//! - Source spans (`Span`)
//! - Position/Range types for user-facing diagnostics (`LineMap`, `Position`)
//! - Diagnostics and the `user_error_message` formatter

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, Range};

// Diagnostics and user-facing error message formatting
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
