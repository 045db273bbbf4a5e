//! The descriptor (C5): process-wide registry tying files, scopes, types,
//! and values together, plus the scope-graph registration and lookup logic
//! from §4.1 (split out of [`crate::scope`] because it needs access to
//! every arena the descriptor owns).

use rustc_hash::FxHashMap;

use idlc_common::diagnostics::{Diagnostic, DiagnosticKind, MAX_IMPORT_CHAIN_DEPTH};

use crate::decl::{DeclData, UserDefinedType, UserDefinedValue};
use crate::ids::{FileId, ScopeId, TypeId, TypeRefId, ValueId, ValueRefId};
use crate::refs::UserValueRef;
use crate::scope::{Scope, ScopeKind};
use crate::token::SourceToken;
use crate::types::UserTypeRef;

/// A single `import "other.mojom";` declaration.
#[derive(Clone, Debug)]
pub struct Import {
    pub specified_name: String,
    pub canonical_name: Option<String>,
    pub token: SourceToken,
}

/// One source file's declarations (§3 "MojomFile").
#[derive(Clone, Debug)]
pub struct MojomFile {
    pub canonical_name: String,
    pub source: String,
    pub module_namespace: Option<String>,
    pub attributes: Vec<crate::decl::Attribute>,
    pub imports: Vec<Import>,
    /// The first file discovered to import this one, if any, used to
    /// reconstruct the "imported from" chain in diagnostics.
    pub imported_from: Option<String>,
    pub file_scope: Option<ScopeId>,
    pub structs: Vec<TypeId>,
    pub unions: Vec<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub enums: Vec<TypeId>,
    pub constants: Vec<ValueId>,
    pub errors: Vec<Diagnostic>,
}

impl MojomFile {
    fn new(canonical_name: String, source: String, imported_from: Option<String>) -> Self {
        Self {
            canonical_name,
            source,
            module_namespace: None,
            attributes: Vec::new(),
            imports: Vec::new(),
            imported_from,
            file_scope: None,
            structs: Vec::new(),
            unions: Vec::new(),
            interfaces: Vec::new(),
            enums: Vec::new(),
            constants: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Why a registration failed: the previously-registered declaration's
/// fully-qualified name, the file it lives in, and whether it was a type
/// or a value (for the exact §8 scenario-5 message).
#[derive(Clone, Debug)]
pub struct DuplicateNameError {
    pub existing_fqn: String,
    pub existing_file: String,
    pub existing_kind_noun: &'static str,
}

/// The root of the arena (§9 "Cyclic data"): every scope, type, value, and
/// reference is owned here and addressed by the other modules through
/// [`crate::ids`] indices.
pub struct Descriptor {
    pub files: Vec<MojomFile>,
    files_by_name: FxHashMap<String, FileId>,

    pub scopes: Vec<Scope>,
    abstract_scopes_by_fqn: FxHashMap<String, ScopeId>,

    pub types: Vec<UserDefinedType>,
    types_by_key: FxHashMap<String, TypeId>,

    pub values: Vec<UserDefinedValue>,
    values_by_key: FxHashMap<String, ValueId>,

    /// FQN → (kind noun, owning file): the cross-kind uniqueness check from
    /// invariant 3 (a type and a value cannot share an FQN), checked before
    /// any scope-map insertion since scope maps alone can't see across the
    /// type/value split.
    fqn_registry: FxHashMap<String, (&'static str, FileId)>,

    pub type_refs: Vec<UserTypeRef>,
    pub value_refs: Vec<UserValueRef>,

    unresolved_type_refs: Vec<TypeRefId>,
    unresolved_value_refs: Vec<ValueRefId>,

    /// Literal default values assigned to a field/constant whose declared
    /// type is still an unresolved `UserTypeRef` at build time (so the
    /// assignment validator cannot yet tell whether the assignee is an enum,
    /// which rejects bare literals, or a struct/union/interface, which
    /// accepts only `default`). Checked by the resolver once the type pass
    /// resolves the reference; see `idlc_core::resolver`.
    pending_literal_checks: Vec<PendingLiteralCheck>,
}

/// A deferred literal-assignment check; see `pending_literal_checks`.
pub struct PendingLiteralCheck {
    pub type_ref: TypeRefId,
    pub literal: crate::literal::LiteralValue,
    pub assignee: crate::refs::AssigneeSpec,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Descriptor {
    #[must_use]
    pub fn new() -> Self {
        let mut descriptor = Self {
            files: Vec::new(),
            files_by_name: FxHashMap::default(),
            scopes: Vec::new(),
            abstract_scopes_by_fqn: FxHashMap::default(),
            types: Vec::new(),
            types_by_key: FxHashMap::default(),
            values: Vec::new(),
            values_by_key: FxHashMap::default(),
            fqn_registry: FxHashMap::default(),
            type_refs: Vec::new(),
            value_refs: Vec::new(),
            unresolved_type_refs: Vec::new(),
            unresolved_value_refs: Vec::new(),
            pending_literal_checks: Vec::new(),
        };
        // The global abstract scope, always present per invariant 5.
        let global = Scope::new(ScopeKind::AbstractModule, String::new(), String::new(), None, None);
        let id = ScopeId(descriptor.scopes.len() as u32);
        descriptor.scopes.push(global);
        descriptor.abstract_scopes_by_fqn.insert(String::new(), id);
        descriptor
    }

    // ---- Files -----------------------------------------------------

    /// Adds a new source file. Fails if `canonical_name` is already
    /// present (§3 "Lifecycle": adding the same canonical name twice is a
    /// programming error, surfaced here as a recoverable error instead of a
    /// panic since the driver controls canonical-name assignment).
    pub fn add_mojom_file(&mut self, canonical_name: &str, imported_from: Option<&str>, contents: &str) -> Result<FileId, String> {
        if self.files_by_name.contains_key(canonical_name) {
            return Err(format!("file \"{canonical_name}\" was already added to this descriptor"));
        }
        let file = MojomFile::new(canonical_name.to_string(), contents.to_string(), imported_from.map(str::to_string));
        let id = FileId(self.files.len() as u32);
        self.files.push(file);
        self.files_by_name.insert(canonical_name.to_string(), id);
        Ok(id)
    }

    #[must_use]
    pub fn file(&self, id: FileId) -> &MojomFile {
        &self.files[id.index()]
    }

    fn file_mut(&mut self, id: FileId) -> &mut MojomFile {
        &mut self.files[id.index()]
    }

    #[must_use]
    pub fn find_file(&self, canonical_name: &str) -> Option<FileId> {
        self.files_by_name.get(canonical_name).copied()
    }

    /// Fills in a previously recorded import's canonical name once the
    /// driver has canonicalized it (§6 "Import resolution").
    pub fn set_canonical_import_name(&mut self, file: FileId, specified_name: &str, canonical_name: &str) {
        if let Some(import) = self.file_mut(file).imports.iter_mut().find(|i| i.specified_name == specified_name) {
            import.canonical_name = Some(canonical_name.to_string());
        }
    }

    pub fn add_import(&mut self, file: FileId, specified_name: &str, token: SourceToken) {
        self.file_mut(file).imports.push(Import {
            specified_name: specified_name.to_string(),
            canonical_name: None,
            token,
        });
    }

    /// Initializes a file's scope under the abstract module scope matching
    /// `module_namespace` (or the global scope, for files with no `module`
    /// declaration). Must be called before any declaration is added to the
    /// file (§3 "Lifecycle").
    pub fn initialize_file_scope(&mut self, file: FileId, module_namespace: Option<&str>) -> ScopeId {
        let fqn = module_namespace.unwrap_or("").to_string();
        let parent = self.get_abstract_module_scope(&fqn);
        let short_name = module_namespace.and_then(|ns| ns.rsplit('.').next()).unwrap_or("").to_string();
        let scope = Scope::new(ScopeKind::FileModule, short_name, fqn, Some(parent), Some(file));
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        self.file_mut(file).module_namespace = module_namespace.map(str::to_string);
        self.file_mut(file).file_scope = Some(id);
        id
    }

    // ---- Scopes ------------------------------------------------------

    #[must_use]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    /// Lazily creates (and memoizes) the abstract module scope chain for
    /// `fqn`, per invariant 5: `AbstractModuleScope("x.y")` parents to
    /// `AbstractModuleScope("x")`, which parents to the global `""` scope.
    pub fn get_abstract_module_scope(&mut self, fqn: &str) -> ScopeId {
        if let Some(id) = self.abstract_scopes_by_fqn.get(fqn) {
            return *id;
        }
        let parent_fqn = match fqn.rsplit_once('.') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };
        let parent = self.get_abstract_module_scope(&parent_fqn);
        let short_name = fqn.rsplit('.').next().unwrap_or("").to_string();
        let scope = Scope::new(ScopeKind::AbstractModule, short_name, fqn.to_string(), Some(parent), None);
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        self.abstract_scopes_by_fqn.insert(fqn.to_string(), id);
        id
    }

    /// Creates a child scope for a struct/interface/enum, parented to the
    /// scope it was declared in.
    pub fn new_container_scope(&mut self, kind: ScopeKind, short_name: &str, fqn: &str, parent: ScopeId) -> ScopeId {
        let file = self.scope(parent).file;
        let scope = Scope::new(kind, short_name.to_string(), fqn.to_string(), Some(parent), file);
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    // ---- Registration (§4.1) -----------------------------------------

    fn check_fqn_available(&self, fqn: &str, kind_noun: &'static str, file: FileId) -> Result<(), DuplicateNameError> {
        if let Some((existing_kind, existing_file)) = self.fqn_registry.get(fqn) {
            return Err(DuplicateNameError {
                existing_fqn: fqn.to_string(),
                existing_file: self.file(*existing_file).canonical_name.clone(),
                existing_kind_noun: existing_kind,
            });
        }
        let _ = (kind_noun, file);
        Ok(())
    }

    /// Registers a type into `common.container_scope`'s type map and, if
    /// that scope is a file-module or abstract-module scope, also into the
    /// matching abstract module scope (§4.1 "Registration").
    pub fn register_type(&mut self, common: &DeclData, type_id: TypeId) -> Result<(), DuplicateNameError> {
        let file = self.scope(common.container_scope).file.unwrap_or(FileId(0));
        self.check_fqn_available(&common.fqn, "type", file)?;
        self.fqn_registry.insert(common.fqn.clone(), ("type", file));
        self.types_by_key.insert(common.type_key(), type_id);
        self.insert_type_into_scope_and_abstract_parent(common.container_scope, &common.simple_name, type_id);
        Ok(())
    }

    /// Registers a value analogously to [`Self::register_type`].
    pub fn register_value(&mut self, common: &DeclData, value_id: ValueId) -> Result<(), DuplicateNameError> {
        let file = self.scope(common.container_scope).file.unwrap_or(FileId(0));
        self.check_fqn_available(&common.fqn, "value", file)?;
        self.fqn_registry.insert(common.fqn.clone(), ("value", file));
        self.values_by_key.insert(format!("VALUE_KEY:{}", common.fqn), value_id);
        self.insert_value_into_scope_and_abstract_parent(common.container_scope, &common.simple_name, value_id);
        Ok(())
    }

    fn insert_type_into_scope_and_abstract_parent(&mut self, scope: ScopeId, simple_name: &str, type_id: TypeId) {
        let kind = self.scope(scope).kind;
        self.scope_mut(scope).types.insert(simple_name.to_string(), type_id);
        if matches!(kind, ScopeKind::FileModule) {
            if let Some(parent) = self.scope(scope).parent {
                self.scope_mut(parent).types.insert(simple_name.to_string(), type_id);
            }
        }
    }

    fn insert_value_into_scope_and_abstract_parent(&mut self, scope: ScopeId, simple_name: &str, value_id: ValueId) {
        let kind = self.scope(scope).kind;
        self.scope_mut(scope).values.insert(simple_name.to_string(), value_id);
        if matches!(kind, ScopeKind::FileModule) {
            if let Some(parent) = self.scope(scope).parent {
                self.scope_mut(parent).values.insert(simple_name.to_string(), value_id);
            }
        }
    }

    // ---- Lookup (§4.1) -------------------------------------------------

    /// Walks `scope` and its ancestors innermost-to-outermost, resolving a
    /// (possibly dotted) identifier by descending into child scopes formed
    /// from each resolved type's own scope.
    #[must_use]
    pub fn lookup_type(&self, scope: ScopeId, identifier: &str) -> Option<TypeId> {
        let mut components = identifier.split('.');
        let head = components.next()?;
        let rest: Vec<&str> = components.collect();

        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(found) = self.resolve_from_scope_types(s, head, &rest) {
                return Some(found);
            }
            current = self.scope(s).parent;
        }
        None
    }

    fn resolve_from_scope_types(&self, scope: ScopeId, head: &str, rest: &[&str]) -> Option<TypeId> {
        let mut type_id = *self.scope(scope).types.get(head)?;
        for component in rest {
            let own_scope = self.types[type_id.index()].own_scope();
            type_id = *self.scope(own_scope).types.get(*component)?;
        }
        Some(type_id)
    }

    /// As [`Self::lookup_type`], but for values; additionally applies the
    /// enum-scope shortcut (§4.1 step 3): if `assignee_enum` names an enum
    /// type, its own scope is also tried so an unqualified enum-value name
    /// resolves both inside the enum body and from outside it.
    #[must_use]
    pub fn lookup_value(&self, scope: ScopeId, identifier: &str, assignee_enum: Option<TypeId>) -> Option<ValueId> {
        let mut components = identifier.split('.');
        let head = components.next()?;
        let rest: Vec<&str> = components.collect();

        if let Some(enum_type) = assignee_enum {
            let enum_scope = self.types[enum_type.index()].own_scope();
            if let Some(found) = self.resolve_from_scope_values(enum_scope, head, &rest) {
                return Some(found);
            }
        }

        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(found) = self.resolve_from_scope_values(s, head, &rest) {
                return Some(found);
            }
            current = self.scope(s).parent;
        }
        None
    }

    fn resolve_from_scope_values(&self, scope: ScopeId, head: &str, rest: &[&str]) -> Option<ValueId> {
        if rest.is_empty() {
            return self.scope(scope).values.get(head).copied();
        }
        let mut type_id = *self.scope(scope).types.get(head)?;
        let (last, middle) = rest.split_last()?;
        for component in middle {
            let own_scope = self.types[type_id.index()].own_scope();
            type_id = *self.scope(own_scope).types.get(*component)?;
        }
        let own_scope = self.types[type_id.index()].own_scope();
        self.scope(own_scope).values.get(*last).copied()
    }

    // ---- Types & values ------------------------------------------------

    pub fn push_type(&mut self, ty: UserDefinedType) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn push_value(&mut self, value: UserDefinedValue) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(value);
        id
    }

    #[must_use]
    pub fn ty(&self, id: TypeId) -> &UserDefinedType {
        &self.types[id.index()]
    }

    #[must_use]
    pub fn value(&self, id: ValueId) -> &UserDefinedValue {
        &self.values[id.index()]
    }

    #[must_use]
    pub fn find_type_by_key(&self, type_key: &str) -> Option<TypeId> {
        self.types_by_key.get(type_key).copied()
    }

    #[must_use]
    pub fn find_value_by_key(&self, value_key: &str) -> Option<ValueId> {
        self.values_by_key.get(value_key).copied()
    }

    // ---- References & work queues (§4.2) -------------------------------

    pub fn register_unresolved_type_reference(&mut self, reference: UserTypeRef) -> TypeRefId {
        let id = TypeRefId(self.type_refs.len() as u32);
        self.type_refs.push(reference);
        self.unresolved_type_refs.push(id);
        id
    }

    pub fn register_unresolved_value_reference(&mut self, reference: UserValueRef) -> ValueRefId {
        let id = ValueRefId(self.value_refs.len() as u32);
        self.value_refs.push(reference);
        self.unresolved_value_refs.push(id);
        id
    }

    #[must_use]
    pub fn unresolved_type_refs(&self) -> &[TypeRefId] {
        &self.unresolved_type_refs
    }

    #[must_use]
    pub fn unresolved_value_refs(&self) -> &[ValueRefId] {
        &self.unresolved_value_refs
    }

    pub(crate) fn set_unresolved_type_refs(&mut self, refs: Vec<TypeRefId>) {
        self.unresolved_type_refs = refs;
    }

    pub(crate) fn set_unresolved_value_refs(&mut self, refs: Vec<ValueRefId>) {
        self.unresolved_value_refs = refs;
    }

    pub fn type_ref(&self, id: TypeRefId) -> &UserTypeRef {
        &self.type_refs[id.index()]
    }

    pub fn type_ref_mut(&mut self, id: TypeRefId) -> &mut UserTypeRef {
        &mut self.type_refs[id.index()]
    }

    pub fn value_ref(&self, id: ValueRefId) -> &UserValueRef {
        &self.value_refs[id.index()]
    }

    pub fn value_ref_mut(&mut self, id: ValueRefId) -> &mut UserValueRef {
        &mut self.value_refs[id.index()]
    }

    pub fn register_pending_literal_check(&mut self, type_ref: TypeRefId, literal: crate::literal::LiteralValue, assignee: crate::refs::AssigneeSpec) {
        self.pending_literal_checks.push(PendingLiteralCheck { type_ref, literal, assignee });
    }

    #[must_use]
    pub fn pending_literal_checks(&self) -> &[PendingLiteralCheck] {
        &self.pending_literal_checks
    }

    // ---- Diagnostics ----------------------------------------------------

    /// Builds a fully rendered diagnostic pinned at `token`, reconstructing
    /// the bounded "imported from" chain via each file's `imported_from`
    /// back-pointer (§6 "Error message format").
    #[must_use]
    pub fn error_at(&self, token: SourceToken, lexeme: Option<&str>, message: &str, kind: DiagnosticKind) -> Diagnostic {
        let file = self.file(token.file);
        let mut chain = Vec::new();
        let mut cursor = file.imported_from.clone();
        while let Some(importer) = cursor {
            if chain.len() >= MAX_IMPORT_CHAIN_DEPTH {
                break;
            }
            chain.push(importer.clone());
            cursor = self.find_file(&importer).and_then(|id| self.file(id).imported_from.clone());
        }
        let rendered = idlc_common::diagnostics::user_error_message(&file.canonical_name, &file.source, token.span.start, lexeme, message, &chain);
        Diagnostic::error(kind, rendered)
    }

    pub fn push_file_error(&mut self, file: FileId, diagnostic: Diagnostic) {
        self.file_mut(file).errors.push(diagnostic);
    }
}

pub use crate::decl::type_key_for_fqn as compute_type_key;
