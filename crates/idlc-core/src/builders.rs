//! Declaration builders (C3/C4.5): the parser-facing API for populating a
//! file's declarations. Each `begin_*` function creates a declaration,
//! registers it (§4.1), and returns its [`TypeId`]/[`ValueId`]; `add_*`
//! functions then populate its members, running the per-container
//! duplicate check described in §4.5.

use idlc_common::diagnostics::DiagnosticKind;

use crate::assignment;
use crate::decl::{
    Attribute, ConstantDecl, ContainerKind, DeclData, EnumDecl, EnumValueDecl, EnumValueInit, InterfaceDecl, Method, Parameter, StructDecl, StructField,
    UnionDecl, UnionField, UserDefinedType, UserDefinedValue, ValueExpr,
};
use crate::descriptor::{DuplicateNameError, Descriptor};
use crate::ids::{ScopeId, TypeId, ValueId};
use crate::literal::LiteralValue;
use crate::refs::{AssigneeKind, AssigneeSpec, UserValueRef};
use crate::scope::ScopeKind;
use crate::token::SourceToken;
use crate::types::TypeExpr;

/// A not-yet-resolved right-hand side as the parser hands it to a builder:
/// either a literal spelled out directly, or an identifier that must be
/// looked up.
pub enum InitializerInput {
    Literal(LiteralValue),
    Identifier(String),
}

/// A structured diagnostic-or-success result from a builder call, using
/// [`idlc_common::diagnostics::Diagnostic`] directly since builders run
/// during parsing and the driver collects these per §7's propagation
/// policy ("duplicate and invalid-type errors at declaration time are
/// collected into the file's error record").
pub type BuildResult<T> = Result<T, idlc_common::diagnostics::Diagnostic>;

fn compose_fqn(descriptor: &Descriptor, container_scope: ScopeId, name: &str) -> String {
    let prefix = &descriptor.scope(container_scope).fqn;
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn duplicate_name_diagnostic(descriptor: &Descriptor, token: SourceToken, err: DuplicateNameError) -> idlc_common::diagnostics::Diagnostic {
    let message = format!(
        "Duplicate definition for \"{}\". Previous definition of this {} with the same fully-qualified name in {}.",
        err.existing_fqn, err.existing_kind_noun, err.existing_file
    );
    descriptor.error_at(token, None, &message, DiagnosticKind::DuplicateName)
}

fn per_container_duplicate(descriptor: &Descriptor, token: SourceToken, member_name: &str, member_noun: &str, container: ContainerKind, container_name: &str) -> idlc_common::diagnostics::Diagnostic {
    let message = format!(
        "Duplicate definition of '{member_name}'. There is already a {member_noun} with that name in {} {container_name}.",
        container.noun()
    );
    descriptor.error_at(token, Some(member_name), &message, DiagnosticKind::DuplicateName)
}

/// Resolves a builder's initializer input into a [`ValueExpr`], running the
/// immediate assignment check for literals whose assignee type is already
/// fully known, or deferring it via a pending check when the assignee is an
/// unresolved `UserRef` (see [`crate::descriptor::Descriptor::register_pending_literal_check`]).
fn resolve_initializer(descriptor: &mut Descriptor, lookup_scope: ScopeId, declared_type: &TypeExpr, assignee: AssigneeSpec, token: SourceToken, input: InitializerInput) -> BuildResult<ValueExpr> {
    match input {
        InitializerInput::Literal(lit) => {
            match declared_type.accepts_default_keyword_without_resolution() {
                Some(_) => {
                    if let Err(rejection) = assignment::check_known_type(declared_type, &lit) {
                        let type_name = display_known_type(declared_type);
                        let message = assignment::render_rejection(&assignee, &type_name, &rejection);
                        return Err(descriptor.error_at(token, None, &message, DiagnosticKind::IllegalAssignment));
                    }
                }
                None => {
                    if let TypeExpr::UserRef(type_ref_id) = declared_type {
                        descriptor.register_pending_literal_check(*type_ref_id, lit.clone(), assignee);
                    }
                }
            }
            Ok(ValueExpr::Literal(lit))
        }
        InitializerInput::Identifier(identifier) => {
            let value_ref = UserValueRef::new(identifier, lookup_scope, token, assignee);
            let ref_id = descriptor.register_unresolved_value_reference(value_ref);
            Ok(ValueExpr::Reference(ref_id))
        }
    }
}

/// Renders a declared type's name for diagnostics when it is not (or is
/// not yet known to be) a `UserRef` — those go through the resolver's
/// `TypeId`-aware renderer once resolved.
fn display_known_type(t: &TypeExpr) -> String {
    match t {
        TypeExpr::Simple(s) => s.to_string(),
        TypeExpr::String { nullable } => if *nullable { "string?" } else { "string" }.to_string(),
        TypeExpr::Handle { kind, .. } => kind.to_string(),
        TypeExpr::Array { .. } => "array".to_string(),
        TypeExpr::Map { .. } => "map".to_string(),
        TypeExpr::UserRef(_) => "<unresolved>".to_string(),
    }
}

// ---- Struct ------------------------------------------------------------

pub fn begin_struct(descriptor: &mut Descriptor, container_scope: ScopeId, name: &str, attributes: Vec<Attribute>, token: SourceToken) -> BuildResult<TypeId> {
    let fqn = compose_fqn(descriptor, container_scope, name);
    let own_scope = descriptor.new_container_scope(ScopeKind::Struct, name, &fqn, container_scope);
    let common = DeclData {
        simple_name: name.to_string(),
        fqn,
        attributes,
        container_scope,
        token,
    };
    let type_id = descriptor.push_type(UserDefinedType::Struct(StructDecl {
        common: common.clone(),
        own_scope,
        fields: Vec::new(),
    }));
    if let Err(err) = descriptor.register_type(&common, type_id) {
        return Err(duplicate_name_diagnostic(descriptor, token, err));
    }
    Ok(type_id)
}

/// Adds a field shape (no default value yet — see [`set_default_value`]).
/// Returns the field's index within the struct for a subsequent
/// `set_default_value` call.
pub fn add_field(descriptor: &mut Descriptor, struct_id: TypeId, name: &str, ordinal: Option<u32>, attributes: Vec<Attribute>, field_type: TypeExpr, token: SourceToken) -> BuildResult<usize> {
    let UserDefinedType::Struct(decl) = &descriptor.types[struct_id.index()] else {
        panic!("add_field called on a non-struct TypeId");
    };
    if decl.fields.iter().any(|f| f.name == name) {
        let fqn = decl.common.fqn.clone();
        return Err(per_container_duplicate(descriptor, token, name, "field", ContainerKind::Struct, &fqn));
    }
    let UserDefinedType::Struct(decl) = &mut descriptor.types[struct_id.index()] else {
        unreachable!()
    };
    decl.fields.push(StructField {
        name: name.to_string(),
        ordinal,
        attributes,
        field_type,
        default_value: None,
        token,
    });
    Ok(decl.fields.len() - 1)
}

/// Attaches a default value to a previously added field (§4.5
/// "SetDefaultValue").
pub fn set_default_value(descriptor: &mut Descriptor, struct_id: TypeId, field_index: usize, input: InitializerInput) -> BuildResult<()> {
    let UserDefinedType::Struct(decl) = &descriptor.types[struct_id.index()] else {
        panic!("set_default_value called on a non-struct TypeId");
    };
    let field = &decl.fields[field_index];
    let assignee = AssigneeSpec {
        kind: AssigneeKind::Field,
        name: field.name.clone(),
        declared_type: field.field_type.clone(),
        owning_enum: None,
    };
    let token = field.token;
    let field_type = field.field_type.clone();
    let container_scope = decl.common.container_scope;

    let value = resolve_initializer(descriptor, container_scope, &field_type, assignee, token, input)?;

    let UserDefinedType::Struct(decl) = &mut descriptor.types[struct_id.index()] else {
        unreachable!()
    };
    decl.fields[field_index].default_value = Some(value);
    Ok(())
}

// ---- Union ---------------------------------------------------------------

pub fn begin_union(descriptor: &mut Descriptor, container_scope: ScopeId, name: &str, attributes: Vec<Attribute>, token: SourceToken) -> BuildResult<TypeId> {
    let fqn = compose_fqn(descriptor, container_scope, name);
    let own_scope = descriptor.new_container_scope(ScopeKind::Union, name, &fqn, container_scope);
    let common = DeclData {
        simple_name: name.to_string(),
        fqn,
        attributes,
        container_scope,
        token,
    };
    let type_id = descriptor.push_type(UserDefinedType::Union(UnionDecl {
        common: common.clone(),
        own_scope,
        fields: Vec::new(),
    }));
    if let Err(err) = descriptor.register_type(&common, type_id) {
        return Err(duplicate_name_diagnostic(descriptor, token, err));
    }
    Ok(type_id)
}

pub fn add_union_field(descriptor: &mut Descriptor, union_id: TypeId, name: &str, ordinal: Option<u32>, field_type: TypeExpr, token: SourceToken) -> BuildResult<()> {
    let UserDefinedType::Union(decl) = &mut descriptor.types[union_id.index()] else {
        panic!("add_union_field called on a non-union TypeId");
    };
    if decl.fields.iter().any(|f| f.name == name) {
        let fqn = decl.common.fqn.clone();
        return Err(per_container_duplicate(descriptor, token, name, "field", ContainerKind::Union, &fqn));
    }
    let UserDefinedType::Union(decl) = &mut descriptor.types[union_id.index()] else {
        unreachable!()
    };
    decl.fields.push(UnionField {
        name: name.to_string(),
        ordinal,
        field_type,
        token,
    });
    Ok(())
}

// ---- Interface -------------------------------------------------------------

pub fn begin_interface(descriptor: &mut Descriptor, container_scope: ScopeId, name: &str, attributes: Vec<Attribute>, token: SourceToken) -> BuildResult<TypeId> {
    let fqn = compose_fqn(descriptor, container_scope, name);
    let own_scope = descriptor.new_container_scope(ScopeKind::Interface, name, &fqn, container_scope);
    let common = DeclData {
        simple_name: name.to_string(),
        fqn,
        attributes,
        container_scope,
        token,
    };
    let type_id = descriptor.push_type(UserDefinedType::Interface(InterfaceDecl {
        common: common.clone(),
        own_scope,
        methods: Vec::new(),
    }));
    if let Err(err) = descriptor.register_type(&common, type_id) {
        return Err(duplicate_name_diagnostic(descriptor, token, err));
    }
    Ok(type_id)
}

pub fn add_method(
    descriptor: &mut Descriptor,
    interface_id: TypeId,
    name: &str,
    ordinal: Option<u32>,
    attributes: Vec<Attribute>,
    params: Vec<Parameter>,
    response: Option<Vec<Parameter>>,
    token: SourceToken,
) -> BuildResult<()> {
    let UserDefinedType::Interface(decl) = &descriptor.types[interface_id.index()] else {
        panic!("add_method called on a non-interface TypeId");
    };
    if decl.methods.iter().any(|m| m.name == name) {
        let fqn = decl.common.fqn.clone();
        return Err(per_container_duplicate(descriptor, token, name, "method", ContainerKind::Interface, &fqn));
    }
    let empty: Vec<Parameter> = Vec::new();
    for dup_check in [&params, response.as_ref().unwrap_or(&empty)] {
        let mut seen: Vec<&str> = Vec::new();
        for p in dup_check {
            if seen.contains(&p.name.as_str()) {
                return Err(per_container_duplicate(descriptor, p.token, &p.name, "parameter", ContainerKind::Method, name));
            }
            seen.push(&p.name);
        }
    }
    let UserDefinedType::Interface(decl) = &mut descriptor.types[interface_id.index()] else {
        unreachable!()
    };
    decl.methods.push(Method {
        name: name.to_string(),
        ordinal,
        attributes,
        params,
        response,
        token,
    });
    Ok(())
}

// ---- Enum ------------------------------------------------------------------

pub fn begin_enum(descriptor: &mut Descriptor, container_scope: ScopeId, name: &str, attributes: Vec<Attribute>, token: SourceToken) -> BuildResult<TypeId> {
    let fqn = compose_fqn(descriptor, container_scope, name);
    let own_scope = descriptor.new_container_scope(ScopeKind::Enum, name, &fqn, container_scope);
    let common = DeclData {
        simple_name: name.to_string(),
        fqn,
        attributes,
        container_scope,
        token,
    };
    let type_id = descriptor.push_type(UserDefinedType::Enum(EnumDecl {
        common: common.clone(),
        own_scope,
        values: Vec::new(),
    }));
    if let Err(err) = descriptor.register_type(&common, type_id) {
        return Err(duplicate_name_diagnostic(descriptor, token, err));
    }
    Ok(type_id)
}

pub fn add_enum_value(descriptor: &mut Descriptor, enum_id: TypeId, name: &str, initializer: Option<InitializerInput>, token: SourceToken) -> BuildResult<ValueId> {
    let (own_scope, fqn, index_in_enum) = {
        let UserDefinedType::Enum(decl) = &descriptor.types[enum_id.index()] else {
            panic!("add_enum_value called on a non-enum TypeId");
        };
        (decl.own_scope, format!("{}.{}", decl.common.fqn, name), decl.values.len())
    };
    let common = DeclData {
        simple_name: name.to_string(),
        fqn,
        attributes: Vec::new(),
        container_scope: own_scope,
        token,
    };

    let init = match initializer {
        None => EnumValueInit::Implicit,
        Some(input) => {
            let assignee = AssigneeSpec {
                kind: AssigneeKind::EnumValue,
                name: name.to_string(),
                declared_type: TypeExpr::Simple(crate::types::SimpleType::Int32),
                owning_enum: Some(enum_id),
            };
            let value = resolve_initializer(descriptor, own_scope, &TypeExpr::Simple(crate::types::SimpleType::Int32), assignee, token, input)?;
            EnumValueInit::Explicit(value)
        }
    };

    let value_id = descriptor.push_value(UserDefinedValue::EnumValue(EnumValueDecl {
        common: common.clone(),
        enum_type: enum_id,
        index_in_enum,
        init,
    }));
    if let Err(err) = descriptor.register_value(&common, value_id) {
        return Err(duplicate_name_diagnostic(descriptor, token, err));
    }
    let UserDefinedType::Enum(decl) = &mut descriptor.types[enum_id.index()] else {
        unreachable!()
    };
    decl.values.push(value_id);
    Ok(value_id)
}

// ---- Constant ----------------------------------------------------------------

pub fn add_constant(descriptor: &mut Descriptor, container_scope: ScopeId, name: &str, declared_type: TypeExpr, initializer: InitializerInput, attributes: Vec<Attribute>, token: SourceToken) -> BuildResult<ValueId> {
    let fqn = compose_fqn(descriptor, container_scope, name);
    let common = DeclData {
        simple_name: name.to_string(),
        fqn,
        attributes,
        container_scope,
        token,
    };
    let assignee = AssigneeSpec {
        kind: AssigneeKind::Constant,
        name: name.to_string(),
        declared_type: declared_type.clone(),
        owning_enum: None,
    };
    let value = resolve_initializer(descriptor, container_scope, &declared_type, assignee, token, initializer)?;
    let value_id = descriptor.push_value(UserDefinedValue::Constant(ConstantDecl {
        common: common.clone(),
        declared_type,
        value,
    }));
    if let Err(err) = descriptor.register_value(&common, value_id) {
        return Err(duplicate_name_diagnostic(descriptor, token, err));
    }
    Ok(value_id)
}
