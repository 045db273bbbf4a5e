//! Recursive-descent parser for Mojom-like interface description files.
//!
//! This crate has no semantic knowledge of its own: every declaration it
//! recognizes is handed straight to `idlc_core::builders`, and every
//! identifier that names a type or value becomes an unresolved reference
//! registered with the [`idlc_core::Descriptor`]. Resolving those references
//! is [`idlc_core::resolver::resolve`]'s job, run once by the driver after
//! every file has been parsed.

mod parser;

pub use parser::parse_mojom_file;

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod tests;
