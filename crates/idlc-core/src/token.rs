//! A source location pinned to the file it came from, used by every
//! declaration and reference for error reporting.

use idlc_common::Span;

use crate::ids::FileId;

/// The (file, byte span) pair attached to every declaration and reference so
/// diagnostics can always be rendered via `user_error_message` without extra
/// plumbing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceToken {
    pub file: FileId,
    pub span: Span,
}

impl SourceToken {
    #[must_use]
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }
}
