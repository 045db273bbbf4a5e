//! The assignment validator (C6): the compatibility table of §4.3.

use crate::decl::{UserDefinedType, UserDefinedValue};
use crate::descriptor::Descriptor;
use crate::ids::TypeId;
use crate::literal::LiteralValue;
use crate::refs::{AssigneeSpec, ConcreteValue};
use crate::types::{SimpleType, TypeExpr};

/// What is being assigned: a bare literal, or the concrete value a
/// reference resolved to (carrying the declared type of whatever declared
/// it, needed for the "compatible integer/unsigned type" and "enum value of
/// E" rules).
pub enum AssignedValue<'a> {
    Literal(&'a LiteralValue),
    Concrete(&'a ConcreteValue),
}

/// The outcome of a failed compatibility check: enough information to
/// render either of the two exact error message shapes from §4.3.
pub enum Rejection {
    IllegalAssignment { assigned_type_name: String, assigned_value_render: String },
    DefaultNotAllowed,
}

fn integer_fits_signed(magnitude_or_value: &LiteralValue, max: i64, min: i64) -> bool {
    match magnitude_or_value {
        LiteralValue::Int8(v) => i64::from(*v) >= min && i64::from(*v) <= max,
        LiteralValue::Int16(v) => i64::from(*v) >= min && i64::from(*v) <= max,
        LiteralValue::Int32(v) => i64::from(*v) >= min && i64::from(*v) <= max,
        LiteralValue::Int64(v) => *v >= min && *v <= max,
        _ => false,
    }
}

fn integer_fits_unsigned(lit: &LiteralValue, max: u64) -> bool {
    match lit {
        LiteralValue::UInt8(v) => u64::from(*v) <= max,
        LiteralValue::UInt16(v) => u64::from(*v) <= max,
        LiteralValue::UInt32(v) => u64::from(*v) <= max,
        LiteralValue::UInt64(v) => *v <= max,
        // Non-negative values spelled without a sign still infer to a
        // signed literal type (see `LiteralValue::infer_integer`), so a
        // plain `5` assigned to a `uint8` field arrives here as `Int8(5)`.
        LiteralValue::Int8(v) => *v >= 0 && u64::from(*v as u8) <= max,
        LiteralValue::Int16(v) => *v >= 0 && u64::from(*v as u16) <= max,
        LiteralValue::Int32(v) => *v >= 0 && u64::from(*v as u32) <= max,
        LiteralValue::Int64(v) => *v >= 0 && (*v as u64) <= max,
        _ => false,
    }
}

fn simple_type_accepts_literal(simple: SimpleType, lit: &LiteralValue) -> bool {
    match simple {
        SimpleType::Bool => matches!(lit, LiteralValue::Bool(_)),
        SimpleType::Int8 => integer_fits_signed(lit, i64::from(i8::MAX), i64::from(i8::MIN)),
        SimpleType::Int16 => integer_fits_signed(lit, i64::from(i16::MAX), i64::from(i16::MIN)),
        SimpleType::Int32 => integer_fits_signed(lit, i64::from(i32::MAX), i64::from(i32::MIN)),
        SimpleType::Int64 => integer_fits_signed(lit, i64::MAX, i64::MIN),
        SimpleType::UInt8 => integer_fits_unsigned(lit, u64::from(u8::MAX)),
        SimpleType::UInt16 => integer_fits_unsigned(lit, u64::from(u16::MAX)),
        SimpleType::UInt32 => integer_fits_unsigned(lit, u64::from(u32::MAX)),
        SimpleType::UInt64 => integer_fits_unsigned(lit, u64::MAX),
        SimpleType::Float => lit.as_f64().is_some_and(|v| v.abs() <= f64::from(f32::MAX) || !v.is_finite()),
        SimpleType::Double => lit.as_f64().is_some(),
    }
}

/// Checks whether `value` may flow into an assignee of `declared_type`,
/// for the cases decidable without resolving a [`crate::types::UserTypeRef`]
/// (everything except struct/union/interface/enum assignees — see
/// [`crate::types::TypeExpr::accepts_default_keyword_without_resolution`]
/// for why those are handled separately, in
/// [`check_against_resolved_user_type`]).
#[must_use]
pub fn check_known_type(declared_type: &TypeExpr, value: &LiteralValue) -> Result<(), Rejection> {
    if matches!(value, LiteralValue::Default) {
        return if declared_type.accepts_default_keyword_without_resolution() == Some(true) {
            Ok(())
        } else {
            Err(Rejection::DefaultNotAllowed)
        };
    }

    let ok = match declared_type {
        TypeExpr::Simple(simple) => simple_type_accepts_literal(*simple, value),
        TypeExpr::String { .. } => matches!(value, LiteralValue::String(_)),
        TypeExpr::Handle { .. } | TypeExpr::Array { .. } | TypeExpr::Map { .. } => false,
        TypeExpr::UserRef(_) => return Ok(()), // deferred; see module doc
    };

    if ok {
        Ok(())
    } else {
        Err(Rejection::IllegalAssignment {
            assigned_type_name: value.inferred_type().to_string(),
            assigned_value_render: value.render(),
        })
    }
}

/// Checks a `ConcreteValue` (the outcome of resolving a value reference)
/// against a declared type that is *not* a `UserRef` (i.e. its category is
/// already known without resolution). An enum value concrete result is
/// always a rejection here, since a non-`UserRef` assignee can never be an
/// enum.
#[must_use]
pub fn check_known_type_against_concrete(declared_type: &TypeExpr, value: &ConcreteValue) -> Result<(), Rejection> {
    match value {
        ConcreteValue::Literal(lit) => check_known_type(declared_type, lit),
        ConcreteValue::EnumValue(_) => Err(Rejection::IllegalAssignment {
            assigned_type_name: "enum value".to_string(),
            assigned_value_render: String::new(),
        }),
    }
}

/// Checks a resolved `UserRef` assignee (struct/union/interface/enum)
/// against an assigned literal or concrete value, once the reference has
/// been resolved by the type pass. `assignee_type` is the `TypeId` the
/// reference resolved to.
#[must_use]
pub fn check_against_resolved_user_type(descriptor: &Descriptor, assignee_type: TypeId, assigned: &AssignedValue<'_>) -> Result<(), Rejection> {
    match descriptor.ty(assignee_type) {
        UserDefinedType::Enum(_) => match assigned {
            AssignedValue::Literal(LiteralValue::Default) => Err(Rejection::DefaultNotAllowed),
            AssignedValue::Literal(other) => Err(Rejection::IllegalAssignment {
                assigned_type_name: other.inferred_type().to_string(),
                assigned_value_render: other.render(),
            }),
            AssignedValue::Concrete(value) => match value {
                ConcreteValue::EnumValue(value_id) => {
                    let UserDefinedValue::EnumValue(decl) = descriptor.value(*value_id) else {
                        unreachable!("ConcreteValue::EnumValue must point at an EnumValueDecl")
                    };
                    if decl.enum_type == assignee_type {
                        Ok(())
                    } else {
                        Err(Rejection::IllegalAssignment {
                            assigned_type_name: "enum value".to_string(),
                            assigned_value_render: decl.common.fqn.clone(),
                        })
                    }
                }
                ConcreteValue::Literal(lit) => Err(Rejection::IllegalAssignment {
                    assigned_type_name: lit.inferred_type().to_string(),
                    assigned_value_render: lit.render(),
                }),
            },
        },
        UserDefinedType::Struct(_) | UserDefinedType::Union(_) | UserDefinedType::Interface(_) => match assigned {
            AssignedValue::Literal(LiteralValue::Default) => Ok(()),
            AssignedValue::Literal(other) => Err(Rejection::IllegalAssignment {
                assigned_type_name: other.inferred_type().to_string(),
                assigned_value_render: other.render(),
            }),
            AssignedValue::Concrete(_) => Err(Rejection::IllegalAssignment {
                assigned_type_name: "reference".to_string(),
                assigned_value_render: String::new(),
            }),
        },
    }
}

/// Checks an enum value's explicit initializer (`GREEN = RED` or
/// `GREEN = 5`): an int32-range literal, or a reference to a sibling value
/// of the *same* enum. A reference to a value of a different enum is
/// rejected even though both are `ConcreteValue::EnumValue`.
#[must_use]
pub fn check_enum_value_explicit_init(descriptor: &Descriptor, owning_enum: TypeId, concrete: &ConcreteValue) -> Result<(), Rejection> {
    match concrete {
        ConcreteValue::Literal(lit) => check_known_type(&TypeExpr::Simple(SimpleType::Int32), lit),
        ConcreteValue::EnumValue(value_id) => {
            let UserDefinedValue::EnumValue(decl) = descriptor.value(*value_id) else {
                unreachable!("ConcreteValue::EnumValue must point at an EnumValueDecl")
            };
            if decl.enum_type == owning_enum {
                Ok(())
            } else {
                Err(Rejection::IllegalAssignment {
                    assigned_type_name: "enum value".to_string(),
                    assigned_value_render: decl.common.fqn.clone(),
                })
            }
        }
    }
}

/// Renders the exact §4.3 error text for a rejected assignment.
#[must_use]
pub fn render_rejection(assignee: &AssigneeSpec, declared_type_name: &str, rejection: &Rejection) -> String {
    match rejection {
        Rejection::IllegalAssignment { assigned_type_name, assigned_value_render } => {
            format!(
                "{} {} of type {} may not be assigned the value {} of type {}.",
                assignee.kind.noun(),
                assignee.name,
                declared_type_name,
                assigned_value_render,
                assigned_type_name
            )
        }
        Rejection::DefaultNotAllowed => {
            format!(
                "The 'default' keyword may not be used with the field/constant `{}` of type {}.",
                assignee.name, declared_type_name
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accepts_only_bool_literal() {
        assert!(check_known_type(&TypeExpr::Simple(SimpleType::Bool), &LiteralValue::Bool(true)).is_ok());
        assert!(check_known_type(&TypeExpr::Simple(SimpleType::Bool), &LiteralValue::Int8(1)).is_err());
    }

    #[test]
    fn negative_one_rejected_for_uint8() {
        let lit = LiteralValue::infer_integer(1, true);
        assert!(check_known_type(&TypeExpr::Simple(SimpleType::UInt8), &lit).is_err());
    }

    #[test]
    fn string_rejects_default() {
        let err = check_known_type(&TypeExpr::String { nullable: false }, &LiteralValue::Default).unwrap_err();
        assert!(matches!(err, Rejection::DefaultNotAllowed));
    }

    #[test]
    fn float_rejects_double_magnitude_literal() {
        let huge = LiteralValue::Double(1e300);
        assert!(check_known_type(&TypeExpr::Simple(SimpleType::Float), &huge).is_err());
    }
}
