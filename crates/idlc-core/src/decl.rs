//! Declarations (C3): structs, unions, interfaces, methods, enums, and
//! constants, plus the value-expression and reference types used for their
//! initializers.

use crate::ids::{ScopeId, TypeId, ValueId, ValueRefId};
use crate::literal::LiteralValue;
use crate::token::SourceToken;
use crate::types::TypeExpr;

/// Data shared by every top-level declaration: its name, where it lives,
/// and the attributes attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclData {
    pub simple_name: String,
    pub fqn: String,
    pub attributes: Vec<Attribute>,
    /// The scope this declaration is registered *in* (its container), not
    /// the child scope it may itself define.
    pub container_scope: ScopeId,
    pub token: SourceToken,
}

impl DeclData {
    /// The stable type key used by `TypesByKey`: `"TYPE_KEY:" + fqn`.
    #[must_use]
    pub fn type_key(&self) -> String {
        type_key_for_fqn(&self.fqn)
    }
}

#[must_use]
pub fn type_key_for_fqn(fqn: &str) -> String {
    format!("TYPE_KEY:{fqn}")
}

#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: Option<LiteralValue>,
}

/// What appears on the right-hand side of a field/constant/enum-value
/// initializer: either a literal spelled out directly, or an identifier
/// that must be resolved.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueExpr {
    Literal(LiteralValue),
    Reference(ValueRefId),
}

/// The kind of container a name collision is reported against, used to
/// render the per-container duplicate-name message (§4.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Struct,
    Union,
    Interface,
    Enum,
    Method,
}

impl ContainerKind {
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Method => "method",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ordinal: Option<u32>,
    pub attributes: Vec<Attribute>,
    pub field_type: TypeExpr,
    pub default_value: Option<ValueExpr>,
    pub token: SourceToken,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructDecl {
    pub common: DeclData,
    pub own_scope: ScopeId,
    pub fields: Vec<StructField>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionField {
    pub name: String,
    pub ordinal: Option<u32>,
    pub field_type: TypeExpr,
    pub token: SourceToken,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionDecl {
    pub common: DeclData,
    pub own_scope: ScopeId,
    pub fields: Vec<UnionField>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ordinal: Option<u32>,
    pub param_type: TypeExpr,
    pub token: SourceToken,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Method {
    pub name: String,
    pub ordinal: Option<u32>,
    pub attributes: Vec<Attribute>,
    pub params: Vec<Parameter>,
    pub response: Option<Vec<Parameter>>,
    pub token: SourceToken,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceDecl {
    pub common: DeclData,
    pub own_scope: ScopeId,
    pub methods: Vec<Method>,
}

/// How an enum value's underlying integer is determined.
#[derive(Clone, Debug, PartialEq)]
pub enum EnumValueInit {
    /// One more than the previous value in the enum (or zero, if first).
    Implicit,
    Explicit(ValueExpr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValueDecl {
    pub common: DeclData,
    pub enum_type: TypeId,
    pub index_in_enum: usize,
    pub init: EnumValueInit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDecl {
    pub common: DeclData,
    pub own_scope: ScopeId,
    pub values: Vec<ValueId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstantDecl {
    pub common: DeclData,
    pub declared_type: TypeExpr,
    pub value: ValueExpr,
}

/// C3's polymorphic `UserDefinedType`.
#[derive(Clone, Debug, PartialEq)]
pub enum UserDefinedType {
    Struct(StructDecl),
    Union(UnionDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
}

impl UserDefinedType {
    #[must_use]
    pub fn common(&self) -> &DeclData {
        match self {
            Self::Struct(d) => &d.common,
            Self::Union(d) => &d.common,
            Self::Interface(d) => &d.common,
            Self::Enum(d) => &d.common,
        }
    }

    #[must_use]
    pub fn own_scope(&self) -> ScopeId {
        match self {
            Self::Struct(d) => d.own_scope,
            Self::Union(d) => d.own_scope,
            Self::Interface(d) => d.own_scope,
            Self::Enum(d) => d.own_scope,
        }
    }

    #[must_use]
    pub fn kind_noun(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Union(_) => "union",
            Self::Interface(_) => "interface",
            Self::Enum(_) => "enum",
        }
    }

    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumDecl> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }
}

/// C3's polymorphic `UserDefinedValue`: user constants and enum values.
/// Built-in constants (`double.INFINITY` and friends) are a separate fixed
/// table (see [`crate::builtins`]) rather than descriptor-registered
/// instances, since they are never subject to duplicate-name checks or
/// scope lookup in the ordinary sense — `LookupBuiltInConstantValue` is a
/// distinct fallback path (§4.1 step 4).
#[derive(Clone, Debug, PartialEq)]
pub enum UserDefinedValue {
    Constant(ConstantDecl),
    EnumValue(EnumValueDecl),
}

impl UserDefinedValue {
    #[must_use]
    pub fn common(&self) -> &DeclData {
        match self {
            Self::Constant(d) => &d.common,
            Self::EnumValue(d) => &d.common,
        }
    }

    #[must_use]
    pub fn kind_noun(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant",
            Self::EnumValue(_) => "enum value",
        }
    }
}
