//! Value references: the unresolved-value work item the resolver's value
//! pass consumes, plus the assignee spec and concrete-value types it needs.

use crate::builtins::BuiltInConstant;
use crate::ids::{ScopeId, TypeId, ValueId};
use crate::literal::LiteralValue;
use crate::token::SourceToken;
use crate::types::TypeExpr;

/// Which kind of declaration a value is being assigned into, for the
/// "Field"/"Constant" wording in assignment error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssigneeKind {
    Field,
    Constant,
    EnumValue,
}

impl AssigneeKind {
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            Self::Field => "Field",
            Self::Constant => "Constant",
            Self::EnumValue => "Enum value",
        }
    }
}

/// The (name, declared type) pair describing an assignment's target.
/// Threaded through value-reference lookup so the enum-scope lookup rule
/// (§4.1 step 3) and the assignment validator both have what they need.
#[derive(Clone, Debug, PartialEq)]
pub struct AssigneeSpec {
    pub kind: AssigneeKind,
    pub name: String,
    pub declared_type: TypeExpr,
    /// For an `EnumValue` assignee, the enum it belongs to — used for the
    /// enum-scope lookup shortcut (§4.1 step 3) so an explicit initializer
    /// can reference a sibling value unqualified. `declared_type` for an
    /// enum value's own initializer is a plain `int32`, not a `UserRef` to
    /// the enum, so that shortcut can't be derived from `declared_type`
    /// alone the way it can for a field/constant of enum type.
    pub owning_enum: Option<TypeId>,
}

/// The declaration a resolved value reference points at: a user constant,
/// an enum value, or one of the fixed built-ins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclaredValueRef {
    UserValue(ValueId),
    BuiltIn(BuiltInConstant),
}

/// The value at the leaf of a chain of constant references (glossary:
/// "Concrete value"): always either a literal or a specific enum value,
/// never another constant.
#[derive(Clone, Debug, PartialEq)]
pub enum ConcreteValue {
    Literal(LiteralValue),
    EnumValue(ValueId),
}

/// Monotonic resolution state of a value reference (design note: "Mutable
/// reference fields"). Never reverts once advanced.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueRefState {
    Unresolved,
    ResolvedDeclared { declared: DeclaredValueRef },
    ResolvedConcrete {
        declared: DeclaredValueRef,
        concrete: ConcreteValue,
    },
}

/// A reference to a value, either still textual or resolved to a concrete
/// value. Doubles as the unresolved-value work item the resolver's value
/// pass consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct UserValueRef {
    pub identifier: String,
    pub scope: ScopeId,
    pub token: SourceToken,
    pub assignee: AssigneeSpec,
    pub state: ValueRefState,
}

impl UserValueRef {
    #[must_use]
    pub fn new(identifier: String, scope: ScopeId, token: SourceToken, assignee: AssigneeSpec) -> Self {
        Self {
            identifier,
            scope,
            token,
            assignee,
            state: ValueRefState::Unresolved,
        }
    }

    #[must_use]
    pub fn concrete_value(&self) -> Option<&ConcreteValue> {
        match &self.state {
            ValueRefState::ResolvedConcrete { concrete, .. } => Some(concrete),
            _ => None,
        }
    }

    #[must_use]
    pub fn declared_value(&self) -> Option<&DeclaredValueRef> {
        match &self.state {
            ValueRefState::ResolvedDeclared { declared } | ValueRefState::ResolvedConcrete { declared, .. } => Some(declared),
            ValueRefState::Unresolved => None,
        }
    }
}
