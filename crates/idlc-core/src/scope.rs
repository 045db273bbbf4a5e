//! The scope graph (C4): lexical scopes and abstract module scopes.
//!
//! Registration and lookup logic lives on [`crate::descriptor::Descriptor`],
//! since both need to walk the parent chain across scope boundaries and
//! consult the type/value arenas; this module only defines the scope
//! record itself.

use rustc_hash::FxHashMap;

use crate::ids::{FileId, ScopeId, TypeId, ValueId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    FileModule,
    AbstractModule,
    Struct,
    Union,
    Interface,
    Enum,
}

/// A node in the scope graph. The scope tree is distinct from the
/// declaration ownership tree: an enum declared inside a struct has a
/// scope whose *parent* is the struct's scope, even though the enum
/// itself is a field of the struct's own declaration list.
#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub short_name: String,
    pub fqn: String,
    pub parent: Option<ScopeId>,
    pub types: FxHashMap<String, TypeId>,
    pub values: FxHashMap<String, ValueId>,
    /// The file this scope is reported against in diagnostics. `None` for
    /// abstract module scopes, which are not owned by any one file.
    pub file: Option<FileId>,
}

impl Scope {
    #[must_use]
    pub fn new(kind: ScopeKind, short_name: String, fqn: String, parent: Option<ScopeId>, file: Option<FileId>) -> Self {
        Self {
            kind,
            short_name,
            fqn,
            parent,
            types: FxHashMap::default(),
            values: FxHashMap::default(),
            file,
        }
    }
}
