//! Type expressions (C2): the tagged union of simple types, strings,
//! handles, arrays, maps, and references to user-defined types.

use std::fmt;

use crate::ids::{ScopeId, TypeId};
use crate::token::SourceToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimpleType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
}

impl fmt::Display for SimpleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
        };
        f.write_str(name)
    }
}

impl SimpleType {
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::UInt8,
            "uint16" => Self::UInt16,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        })
    }

    #[must_use]
    pub fn is_signed_integer(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    #[must_use]
    pub fn is_unsigned_integer(self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
    Generic,
    MessagePipe,
    DataPipeProducer,
    DataPipeConsumer,
    SharedBuffer,
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generic => "handle",
            Self::MessagePipe => "handle<message_pipe>",
            Self::DataPipeProducer => "handle<data_pipe_producer>",
            Self::DataPipeConsumer => "handle<data_pipe_consumer>",
            Self::SharedBuffer => "handle<shared_buffer>",
        };
        f.write_str(name)
    }
}

impl HandleKind {
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "message_pipe" => Self::MessagePipe,
            "data_pipe_producer" => Self::DataPipeProducer,
            "data_pipe_consumer" => Self::DataPipeConsumer,
            "shared_buffer" => Self::SharedBuffer,
            _ => return None,
        })
    }
}

/// The key type of a `map<K, V>`: mojom restricts map keys to simple types
/// or strings (no nested maps/arrays/user types as keys).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapKeyType {
    Simple(SimpleType),
    String,
}

impl fmt::Display for MapKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(s) => write!(f, "{s}"),
            Self::String => f.write_str("string"),
        }
    }
}

/// Resolution state of a reference to a user-defined type. `Unresolved`
/// until the resolver's type pass finds a match; never reverts once
/// resolved (see the monotonic state machine design note).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeRefState {
    Unresolved,
    Resolved(TypeId),
}

/// A reference to a user-defined type, either still textual (`Unresolved`)
/// or pointing at the declaration it names. Doubles as the unresolved-type
/// work item the resolver's type pass consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct UserTypeRef {
    pub identifier: String,
    pub nullable: bool,
    /// `true` if this reference appears in "interface request" position
    /// (`SomeInterface&` in the surface syntax): the resolved type must be
    /// an interface, not merely nameable.
    pub interface_request: bool,
    pub scope: ScopeId,
    pub token: SourceToken,
    pub state: TypeRefState,
}

impl UserTypeRef {
    #[must_use]
    pub fn new(identifier: String, nullable: bool, interface_request: bool, scope: ScopeId, token: SourceToken) -> Self {
        Self {
            identifier,
            nullable,
            interface_request,
            scope,
            token,
            state: TypeRefState::Unresolved,
        }
    }

    #[must_use]
    pub fn resolved_type(&self) -> Option<TypeId> {
        match self.state {
            TypeRefState::Resolved(id) => Some(id),
            TypeRefState::Unresolved => None,
        }
    }
}

/// A type expression as it appears in a field, parameter, or constant
/// declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    Simple(SimpleType),
    String {
        nullable: bool,
    },
    Handle {
        kind: HandleKind,
        nullable: bool,
    },
    Array {
        element: Box<TypeExpr>,
        fixed_length: Option<u32>,
        nullable: bool,
    },
    Map {
        key: MapKeyType,
        value: Box<TypeExpr>,
        nullable: bool,
    },
    /// A reference to a struct/union/interface/enum, identified by an arena
    /// index into the owning [`crate::descriptor::Descriptor`]'s type-ref
    /// arena (not the resolved [`TypeId`] itself, since the reference may
    /// still be unresolved at the point a [`TypeExpr`] is constructed).
    UserRef(crate::ids::TypeRefId),
}

impl TypeExpr {
    /// Whether `default` is a legal initializer for a field/constant of this
    /// declared type, for the assignee kinds whose default-acceptability
    /// does not depend on resolving a [`UserTypeRef`] (`Simple`, `String`,
    /// `Handle`, `Array`, `Map`: only nullable variants accept it). A
    /// `UserRef` assignee's acceptability depends on whether it resolves to
    /// a struct/union/interface (accepts) or an enum (rejects), so that
    /// case is decided by the assignment validator once resolution has run,
    /// not here.
    #[must_use]
    pub fn accepts_default_keyword_without_resolution(&self) -> Option<bool> {
        match self {
            Self::String { nullable } | Self::Handle { nullable, .. } | Self::Array { nullable, .. } | Self::Map { nullable, .. } => Some(*nullable),
            Self::UserRef(_) => None,
            Self::Simple(_) => Some(false),
        }
    }
}
