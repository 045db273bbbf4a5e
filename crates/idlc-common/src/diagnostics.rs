//! Diagnostic types and the `user_error_message` renderer.
//!
//! Every diagnostic produced by the frontend pins a file, a 1-based line and
//! column, and (where applicable) the offending lexeme. Diagnostics reached
//! through a chain of imports also carry a bounded "imported from" trail so
//! the user can see why an unrelated file ended up in the compilation.

use crate::position::{LineMap, Position};

/// The kind of problem a diagnostic reports. Mirrors the error taxonomy of
/// the frontend: lexical and syntactic errors abort the current file's
/// parse, the rest are collected and reported together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unterminated comment/string, illegal character.
    Lexical,
    /// Unexpected token, missing punctuation, misplaced attribute block.
    Syntax,
    /// Non-numeric or out-of-range ordinal.
    Ordinal,
    /// Integer/float literal out of its inferred type's range.
    LiteralRange,
    /// Two declarations share a container-local name or fully-qualified name.
    DuplicateName,
    /// Type-incompatible assignment.
    IllegalAssignment,
    /// A type used where its shape does not permit, e.g. `bool?`, `array<..>` as a constant type.
    InvalidType,
    /// Undefined type, undefined value, or use of an unresolved value (cycle).
    UnresolvedReference,
    /// A resolved type was used in a way its kind does not permit.
    PostResolution,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic, already formatted as the user-facing multi-line
/// message described by `user_error_message`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub rendered: String,
}

impl Diagnostic {
    #[must_use]
    pub fn error(kind: DiagnosticKind, rendered: String) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            rendered,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rendered)
    }
}

/// Maximum depth of the "imported from" chain rendered in a message. Mirrors
/// the bound used by the original frontend to guarantee termination on
/// cyclic import graphs.
pub const MAX_IMPORT_CHAIN_DEPTH: usize = 100;

/// Render `path` relative to the current working directory when that is
/// shorter than the path as given; otherwise return it unchanged.
#[must_use]
pub fn rel_path_if_shorter(path: &str) -> String {
    let Ok(cwd) = std::env::current_dir() else {
        return path.to_string();
    };
    let Some(cwd) = cwd.to_str() else {
        return path.to_string();
    };
    let candidate = path
        .strip_prefix(cwd)
        .map(|rest| rest.trim_start_matches(['/', '\\']))
        .unwrap_or(path);
    if candidate.len() < path.len() {
        candidate.to_string()
    } else {
        path.to_string()
    }
}

/// Build the human-readable, multi-line message described in the frontend's
/// external interface: file path, 1-based line/column, the offending
/// lexeme (when present), the message text, and a bounded import chain.
///
/// `imported_from_chain` lists the files that pulled this one into the
/// compilation, nearest first; it is truncated to `MAX_IMPORT_CHAIN_DEPTH`
/// entries.
#[must_use]
pub fn user_error_message(
    file_path: &str,
    source: &str,
    offset: u32,
    lexeme: Option<&str>,
    message: &str,
    imported_from_chain: &[String],
) -> String {
    let line_map = LineMap::build(source);
    let Position { line, character } = line_map.offset_to_position(offset, source);

    let mut out = format!(
        "{}:{}:{}: {}",
        rel_path_if_shorter(file_path),
        line + 1,
        character + 1,
        message
    );
    if let Some(lexeme) = lexeme {
        if !lexeme.is_empty() {
            out.push_str(&format!(" (at {lexeme:?})"));
        }
    }
    for imported_from in imported_from_chain.iter().take(MAX_IMPORT_CHAIN_DEPTH) {
        out.push_str(&format!(
            "\n... imported from {}",
            rel_path_if_shorter(imported_from)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_line_and_column() {
        let source = "struct Foo {\n  int32 x = \"hello\";\n};\n";
        let msg = user_error_message(
            "a/b/foo.mojom",
            source,
            source.find("\"hello\"").unwrap() as u32,
            Some("\"hello\""),
            "Field x of type int32 may not be assigned the value \"hello\" of type string.",
            &[],
        );
        assert!(msg.contains("2:13:"));
        assert!(msg.contains("may not be assigned"));
        assert!(msg.contains("\"\\\"hello\\\"\""));
    }

    #[test]
    fn renders_bounded_import_chain() {
        let chain: Vec<String> = (0..150).map(|i| format!("file{i}.mojom")).collect();
        let msg = user_error_message("top.mojom", "", 0, None, "Undefined type", &chain);
        assert_eq!(msg.matches("imported from").count(), MAX_IMPORT_CHAIN_DEPTH);
    }
}
