//! Semantic model for Mojom-like interface description files: the scope
//! graph, declaration arena, reference resolver, and assignment validator.
//!
//! This crate has no knowledge of surface syntax — it is driven by a parser
//! that calls the builder API in [`builders`] in file order, then by
//! [`resolver::resolve`] once every file has been built.

pub mod assignment;
pub mod builders;
pub mod builtins;
pub mod decl;
pub mod descriptor;
pub mod ids;
pub mod literal;
pub mod refs;
pub mod resolver;
pub mod scope;
pub mod token;
pub mod types;

pub use decl::{ContainerKind, UserDefinedType, UserDefinedValue, ValueExpr};
pub use descriptor::Descriptor;
pub use ids::{FileId, ScopeId, TypeId, TypeRefId, ValueId, ValueRefId};
pub use literal::LiteralValue;
pub use refs::{AssigneeKind, AssigneeSpec};
pub use scope::ScopeKind;
pub use token::SourceToken;
pub use types::TypeExpr;
