//! The resolver (C7): two-pass type resolution and fixpoint value
//! resolution (§4.4).

use idlc_common::diagnostics::{Diagnostic, DiagnosticKind};

use crate::assignment::{self, AssignedValue};
use crate::builtins::BuiltInConstant;
use crate::decl::{UserDefinedType, UserDefinedValue, ValueExpr};
use crate::descriptor::Descriptor;
use crate::ids::{TypeId, TypeRefId, ValueRefId};
use crate::refs::{ConcreteValue, DeclaredValueRef, ValueRefState};
use crate::types::{TypeExpr, TypeRefState};

/// Runs the full resolver to completion (§4.4's pseudocode). On success,
/// every `UserTypeRef` and `UserValueRef` registered with `descriptor` has a
/// concrete resolved value (invariant 4). On failure, returns the first
/// fatal `PostResolutionError` encountered, or an aggregated
/// `UnresolvedReferenceError` naming every reference left unresolved.
pub fn resolve(descriptor: &mut Descriptor) -> Result<(), Diagnostic> {
    let remaining_types = run_type_pass(descriptor)?;
    descriptor.set_unresolved_type_refs(remaining_types);

    run_pending_literal_checks(descriptor)?;

    let (mut remaining_values, first_pass_error) = run_value_pass(descriptor, &descriptor.unresolved_value_refs().to_vec());
    if let Some(diagnostic) = first_pass_error {
        return Err(diagnostic);
    }
    loop {
        if remaining_values.is_empty() {
            break;
        }
        // Later passes only exist to propagate transitive constant values to
        // a fixpoint; a post-resolution validation error here is discarded,
        // matching the original resolver, which keeps only the first pass's
        // validation result and ignores the rest.
        let (next, _) = run_value_pass(descriptor, &remaining_values);
        let progressed = next.len() < remaining_values.len();
        remaining_values = next;
        if !progressed {
            break;
        }
    }
    descriptor.set_unresolved_value_refs(remaining_values);

    if descriptor.unresolved_type_refs().is_empty() && descriptor.unresolved_value_refs().is_empty() {
        return Ok(());
    }
    Err(aggregate_unresolved_errors(descriptor))
}

fn run_type_pass(descriptor: &mut Descriptor) -> Result<Vec<TypeRefId>, Diagnostic> {
    let ids: Vec<TypeRefId> = descriptor.unresolved_type_refs().to_vec();
    let mut remaining = Vec::new();
    for id in ids {
        let type_ref = descriptor.type_ref(id).clone();
        if !matches!(type_ref.state, TypeRefState::Unresolved) {
            continue;
        }
        let Some(found) = descriptor.lookup_type(type_ref.scope, &type_ref.identifier) else {
            remaining.push(id);
            continue;
        };
        if type_ref.interface_request && !matches!(descriptor.ty(found), UserDefinedType::Interface(_)) {
            let message = format!("{} is not an interface.", type_ref.identifier);
            return Err(descriptor.error_at(type_ref.token, Some(&type_ref.identifier), &message, DiagnosticKind::PostResolution));
        }
        descriptor.type_ref_mut(id).state = TypeRefState::Resolved(found);
    }
    Ok(remaining)
}

fn run_pending_literal_checks(descriptor: &mut Descriptor) -> Result<(), Diagnostic> {
    let checks: Vec<usize> = (0..descriptor.pending_literal_checks().len()).collect();
    for index in checks {
        let check = {
            let c = &descriptor.pending_literal_checks()[index];
            (c.type_ref, c.literal.clone(), c.assignee.clone())
        };
        let (type_ref_id, literal, assignee) = check;
        let Some(resolved_type) = descriptor.type_ref(type_ref_id).resolved_type() else {
            // The type itself is undefined; that is already reported by the
            // aggregated "Undefined type" error, so this check is skipped
            // rather than double-reported.
            continue;
        };
        let declared_type_name = type_name_for_diagnostics(descriptor, resolved_type);
        if let Err(rejection) = assignment::check_against_resolved_user_type(descriptor, resolved_type, &AssignedValue::Literal(&literal)) {
            let message = assignment::render_rejection(&assignee, &declared_type_name, &rejection);
            let token = descriptor.type_ref(type_ref_id).token;
            return Err(descriptor.error_at(token, None, &message, DiagnosticKind::IllegalAssignment));
        }
    }
    Ok(())
}

fn assignee_enum_type(descriptor: &Descriptor, assignee: &crate::refs::AssigneeSpec) -> Option<TypeId> {
    if let Some(owning_enum) = assignee.owning_enum {
        return Some(owning_enum);
    }
    let TypeExpr::UserRef(type_ref_id) = &assignee.declared_type else {
        return None;
    };
    let resolved = descriptor.type_ref(*type_ref_id).resolved_type()?;
    if matches!(descriptor.ty(resolved), UserDefinedType::Enum(_)) {
        Some(resolved)
    } else {
        None
    }
}

/// One pass over `ids`: resolves as many declared/concrete values as
/// possible, returning the ids still lacking a concrete value. Stops at the
/// first post-resolution validation failure (like the original resolver)
/// and returns it alongside whatever remained unresolved up to that point;
/// the caller decides whether that error is fatal for this pass.
fn run_value_pass(descriptor: &mut Descriptor, ids: &[ValueRefId]) -> (Vec<ValueRefId>, Option<Diagnostic>) {
    let mut remaining = Vec::new();
    for &id in ids {
        let value_ref = descriptor.value_ref(id).clone();

        let declared = match value_ref.state {
            ValueRefState::ResolvedConcrete { .. } => continue,
            ValueRefState::ResolvedDeclared { declared } => Some(declared),
            ValueRefState::Unresolved => {
                let assignee_enum = assignee_enum_type(descriptor, &value_ref.assignee);
                match descriptor.lookup_value(value_ref.scope, &value_ref.identifier, assignee_enum) {
                    Some(value_id) => Some(DeclaredValueRef::UserValue(value_id)),
                    None => BuiltInConstant::lookup(&value_ref.identifier).map(DeclaredValueRef::BuiltIn),
                }
            }
        };

        let Some(declared) = declared else {
            remaining.push(id);
            continue;
        };
        descriptor.value_ref_mut(id).state = ValueRefState::ResolvedDeclared { declared };

        let Some(concrete) = concrete_value_for(descriptor, declared) else {
            remaining.push(id);
            continue;
        };

        let validation = match value_ref.assignee.owning_enum {
            Some(owning_enum) => assignment::check_enum_value_explicit_init(descriptor, owning_enum, &concrete),
            None => validate_value_assignment(descriptor, &value_ref.assignee.declared_type, &concrete),
        };
        if let Err(rejection) = validation {
            let declared_type_name = declared_type_name_for(descriptor, &value_ref.assignee.declared_type);
            let message = assignment::render_rejection(&value_ref.assignee, &declared_type_name, &rejection);
            let diagnostic = descriptor.error_at(value_ref.token, Some(&value_ref.identifier), &message, DiagnosticKind::PostResolution);
            return (remaining, Some(diagnostic));
        }

        descriptor.value_ref_mut(id).state = ValueRefState::ResolvedConcrete { declared, concrete };
    }
    (remaining, None)
}

fn concrete_value_for(descriptor: &Descriptor, declared: DeclaredValueRef) -> Option<ConcreteValue> {
    match declared {
        DeclaredValueRef::BuiltIn(b) => Some(ConcreteValue::Literal(b.concrete_value())),
        DeclaredValueRef::UserValue(value_id) => match descriptor.value(value_id) {
            UserDefinedValue::EnumValue(_) => Some(ConcreteValue::EnumValue(value_id)),
            UserDefinedValue::Constant(c) => match &c.value {
                ValueExpr::Literal(lit) => Some(ConcreteValue::Literal(lit.clone())),
                ValueExpr::Reference(ref_id) => descriptor.value_ref(*ref_id).concrete_value().cloned(),
            },
        },
    }
}

fn validate_value_assignment(descriptor: &Descriptor, declared_type: &TypeExpr, concrete: &ConcreteValue) -> Result<(), assignment::Rejection> {
    match declared_type {
        TypeExpr::UserRef(type_ref_id) => {
            let resolved = descriptor
                .type_ref(*type_ref_id)
                .resolved_type()
                .expect("value assignment validated only after the assignee's type has been resolved");
            assignment::check_against_resolved_user_type(descriptor, resolved, &AssignedValue::Concrete(concrete))
        }
        _ => assignment::check_known_type_against_concrete(declared_type, concrete),
    }
}

fn declared_type_name_for(descriptor: &Descriptor, declared_type: &TypeExpr) -> String {
    match declared_type {
        TypeExpr::Simple(s) => s.to_string(),
        TypeExpr::String { nullable } => {
            if *nullable {
                "string?".to_string()
            } else {
                "string".to_string()
            }
        }
        TypeExpr::Handle { kind, .. } => kind.to_string(),
        TypeExpr::Array { .. } => "array".to_string(),
        TypeExpr::Map { .. } => "map".to_string(),
        TypeExpr::UserRef(type_ref_id) => match descriptor.type_ref(*type_ref_id).resolved_type() {
            Some(resolved) => type_name_for_diagnostics(descriptor, resolved),
            None => descriptor.type_ref(*type_ref_id).identifier.clone(),
        },
    }
}

fn type_name_for_diagnostics(descriptor: &Descriptor, type_id: TypeId) -> String {
    descriptor.ty(type_id).common().fqn.clone()
}

fn aggregate_unresolved_errors(descriptor: &Descriptor) -> Diagnostic {
    let mut lines = Vec::new();
    for &id in descriptor.unresolved_type_refs() {
        let r = descriptor.type_ref(id);
        lines.push(format!("Undefined type \"{}\".", r.identifier));
    }
    for &id in descriptor.unresolved_value_refs() {
        let r = descriptor.value_ref(id);
        if r.declared_value().is_some() {
            lines.push(format!("Use of unresolved value \"{}\".", r.identifier));
        } else {
            lines.push(format!("Undefined value \"{}\".", r.identifier));
        }
    }
    let message = lines.join("\n");
    let token = descriptor
        .unresolved_type_refs()
        .first()
        .map(|id| descriptor.type_ref(*id).token)
        .or_else(|| descriptor.unresolved_value_refs().first().map(|id| descriptor.value_ref(*id).token))
        .expect("aggregation only runs when at least one reference remains unresolved");
    descriptor.error_at(token, None, &message, DiagnosticKind::UnresolvedReference)
}
