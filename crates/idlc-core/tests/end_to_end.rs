//! Integration tests driving the descriptor through its builder API
//! directly, the way a parser would, then running the resolver. These
//! exercise the end-to-end scenarios and invariants without needing a real
//! source-text parser.

use idlc_common::Span;
use idlc_core::builders::{self, InitializerInput};
use idlc_core::descriptor::Descriptor;
use idlc_core::literal::LiteralValue;
use idlc_core::resolver;
use idlc_core::types::{SimpleType, TypeExpr};
use idlc_core::{FileId, SourceToken};

fn tok(file: FileId, at: u32) -> SourceToken {
    SourceToken::new(file, Span::new(at, at + 1))
}

fn new_file(descriptor: &mut Descriptor, name: &str, source: &str) -> FileId {
    let file = descriptor.add_mojom_file(name, None, source).unwrap();
    descriptor.initialize_file_scope(file, None);
    file
}

/// Scenario 1: `struct Foo { int32 x = "hello"; };`
#[test]
fn rejects_string_literal_for_int32_field() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "foo.mojom", "struct Foo { int32 x = \"hello\"; };");
    let scope = d.file(file).file_scope.unwrap();
    let struct_id = builders::begin_struct(&mut d, scope, "Foo", Vec::new(), tok(file, 0)).unwrap();
    let field_idx = builders::add_field(&mut d, struct_id, "x", None, Vec::new(), TypeExpr::Simple(SimpleType::Int32), tok(file, 1)).unwrap();
    let err = builders::set_default_value(&mut d, struct_id, field_idx, InitializerInput::Literal(LiteralValue::String("hello".to_string()))).unwrap_err();
    assert!(err.rendered.contains("Field x of type int32 may not be assigned the value \"hello\" of type string."), "{}", err.rendered);
}

/// Scenario 2: `struct Foo { uint8 x = -1; };`
#[test]
fn rejects_negative_one_for_uint8_field() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "foo.mojom", "struct Foo { uint8 x = -1; };");
    let scope = d.file(file).file_scope.unwrap();
    let struct_id = builders::begin_struct(&mut d, scope, "Foo", Vec::new(), tok(file, 0)).unwrap();
    let field_idx = builders::add_field(&mut d, struct_id, "x", None, Vec::new(), TypeExpr::Simple(SimpleType::UInt8), tok(file, 1)).unwrap();
    let lit = LiteralValue::infer_integer(1, true);
    let err = builders::set_default_value(&mut d, struct_id, field_idx, InitializerInput::Literal(lit)).unwrap_err();
    assert!(err.rendered.contains("Field x of type uint8 may not be assigned the value -1 of type int8."), "{}", err.rendered);
}

/// Scenario 5 (same module, both top-level): duplicate FQN across two files.
#[test]
fn duplicate_fqn_across_files_in_same_module_is_rejected() {
    let mut d = Descriptor::new();

    let file_a = d.add_mojom_file("a.mojom", None, "module a.b.c;\nstruct Foo{};\n").unwrap();
    let scope_a = d.initialize_file_scope(file_a, Some("a.b.c"));
    builders::begin_struct(&mut d, scope_a, "Foo", Vec::new(), tok(file_a, 0)).unwrap();

    let file_b = d.add_mojom_file("b.mojom", None, "module a.b.c;\nconst int32 Foo = 42;\n").unwrap();
    let scope_b = d.initialize_file_scope(file_b, Some("a.b.c"));
    let err = builders::add_constant(
        &mut d,
        scope_b,
        "Foo",
        TypeExpr::Simple(SimpleType::Int32),
        InitializerInput::Literal(LiteralValue::infer_integer(42, false)),
        Vec::new(),
        tok(file_b, 0),
    )
    .unwrap_err();
    assert!(err.rendered.contains("a.b.c.Foo"), "{}", err.rendered);
    assert!(err.rendered.contains("a.mojom"), "{}", err.rendered);
    assert!(err.rendered.contains("struct"), "{}", err.rendered);
}

/// A struct declared under `module mojom.test;` gets the module-qualified
/// FQN, and its scope's parent chain reaches the global abstract scope.
#[test]
fn module_namespace_qualifies_fqn_and_scope_chain() {
    let mut d = Descriptor::new();
    let file = d.add_mojom_file("foo.mojom", None, "module mojom.test;\nstruct Foo{};\n").unwrap();
    let scope = d.initialize_file_scope(file, Some("mojom.test"));
    let struct_id = builders::begin_struct(&mut d, scope, "Foo", Vec::new(), tok(file, 0)).unwrap();

    assert_eq!(d.ty(struct_id).common().fqn, "mojom.test.Foo");

    let mut cursor = d.scope(scope).parent;
    let mut fqns = Vec::new();
    while let Some(s) = cursor {
        fqns.push(d.scope(s).fqn.clone());
        cursor = d.scope(s).parent;
    }
    assert_eq!(fqns, vec!["mojom.test".to_string(), "mojom".to_string(), String::new()]);
}

/// Scenario 6: a struct and an interface whose method response references
/// the struct via an array and a nullable singular reference.
#[test]
fn resolves_interface_method_referencing_struct() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "doer.mojom", "module mojom.test;\nstruct Foo{int32 x;};\ninterface Doer { DoIt(int8 lemon, handle<message_pipe> pipe) => (array<Foo> someFoos, Foo? anotherFoo); };");
    let scope = d.file(file).file_scope.unwrap();

    let struct_id = builders::begin_struct(&mut d, scope, "Foo", Vec::new(), tok(file, 0)).unwrap();
    builders::add_field(&mut d, struct_id, "x", None, Vec::new(), TypeExpr::Simple(SimpleType::Int32), tok(file, 1)).unwrap();

    let interface_id = builders::begin_interface(&mut d, scope, "Doer", Vec::new(), tok(file, 2)).unwrap();

    let array_ref = d.register_unresolved_type_reference(idlc_core::types::UserTypeRef::new("Foo".to_string(), false, false, scope, tok(file, 3)));
    let nullable_ref = d.register_unresolved_type_reference(idlc_core::types::UserTypeRef::new("Foo".to_string(), true, false, scope, tok(file, 4)));

    let params = vec![
        idlc_core::decl::Parameter {
            name: "lemon".to_string(),
            ordinal: None,
            param_type: TypeExpr::Simple(SimpleType::Int8),
            token: tok(file, 5),
        },
        idlc_core::decl::Parameter {
            name: "pipe".to_string(),
            ordinal: None,
            param_type: TypeExpr::Handle { kind: idlc_core::types::HandleKind::MessagePipe, nullable: false },
            token: tok(file, 6),
        },
    ];
    let response = vec![
        idlc_core::decl::Parameter {
            name: "someFoos".to_string(),
            ordinal: None,
            param_type: TypeExpr::Array {
                element: Box::new(TypeExpr::UserRef(array_ref)),
                fixed_length: None,
                nullable: false,
            },
            token: tok(file, 7),
        },
        idlc_core::decl::Parameter {
            name: "anotherFoo".to_string(),
            ordinal: None,
            param_type: TypeExpr::UserRef(nullable_ref),
            token: tok(file, 8),
        },
    ];
    builders::add_method(&mut d, interface_id, "DoIt", None, Vec::new(), params, Some(response), tok(file, 9)).unwrap();

    resolver::resolve(&mut d).expect("resolution should succeed");

    assert_eq!(d.type_ref(array_ref).resolved_type(), Some(struct_id));
    assert_eq!(d.type_ref(nullable_ref).resolved_type(), Some(struct_id));
}

/// Invariant (FQN uniqueness): a struct and an enum cannot share an FQN
/// even though they are different kinds.
#[test]
fn type_and_value_cannot_share_fqn() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "x.mojom", "struct X{}; const int32 X = 1;");
    let scope = d.file(file).file_scope.unwrap();
    builders::begin_struct(&mut d, scope, "X", Vec::new(), tok(file, 0)).unwrap();
    let err = builders::add_constant(&mut d, scope, "X", TypeExpr::Simple(SimpleType::Int32), InitializerInput::Literal(LiteralValue::infer_integer(1, false)), Vec::new(), tok(file, 1)).unwrap_err();
    assert!(err.rendered.contains('X'));
}

/// Per-container duplicate check: two fields with the same name in one
/// struct, distinct from the FQN check (fields are never FQN-registered).
#[test]
fn duplicate_field_name_in_same_struct_is_rejected() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "x.mojom", "struct Foo { int32 x; int32 x; };");
    let scope = d.file(file).file_scope.unwrap();
    let struct_id = builders::begin_struct(&mut d, scope, "Foo", Vec::new(), tok(file, 0)).unwrap();
    builders::add_field(&mut d, struct_id, "x", None, Vec::new(), TypeExpr::Simple(SimpleType::Int32), tok(file, 1)).unwrap();
    let err = builders::add_field(&mut d, struct_id, "x", None, Vec::new(), TypeExpr::Simple(SimpleType::Int32), tok(file, 2)).unwrap_err();
    assert!(err.rendered.contains("There is already a field with that name in struct Foo."), "{}", err.rendered);
}

/// Invariant (fixpoint correctness): a constant chain `c1 = c2 = c3 = 5`
/// resolves fully even though `c1`'s reference is registered before `c2`
/// and `c3` exist.
#[test]
fn resolves_transitive_constant_chain() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "x.mojom", "const int32 c3 = 5;\nconst int32 c2 = c3;\nconst int32 c1 = c2;\n");
    let scope = d.file(file).file_scope.unwrap();

    // Declared in dependency order; see `resolves_constant_chain_declared_out_of_order`
    // for the harder case that actually forces multiple fixpoint passes.
    builders::add_constant(&mut d, scope, "c3", TypeExpr::Simple(SimpleType::Int32), InitializerInput::Literal(LiteralValue::infer_integer(5, false)), Vec::new(), tok(file, 0)).unwrap();
    builders::add_constant(&mut d, scope, "c2", TypeExpr::Simple(SimpleType::Int32), InitializerInput::Identifier("c3".to_string()), Vec::new(), tok(file, 1)).unwrap();
    builders::add_constant(&mut d, scope, "c1", TypeExpr::Simple(SimpleType::Int32), InitializerInput::Identifier("c2".to_string()), Vec::new(), tok(file, 2)).unwrap();

    resolver::resolve(&mut d).expect("constant chain should fully resolve");
    assert!(d.unresolved_value_refs().is_empty());
}

/// The harder case: `c1` is *declared before* `c2`/`c3` exist, so its
/// reference cannot be resolved on the first value pass — this is exactly
/// what the fixpoint loop exists for.
#[test]
fn resolves_constant_chain_declared_out_of_order() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "x.mojom", "const int32 c1 = c2;\nconst int32 c2 = c3;\nconst int32 c3 = 5;\n");
    let scope = d.file(file).file_scope.unwrap();

    builders::add_constant(&mut d, scope, "c1", TypeExpr::Simple(SimpleType::Int32), InitializerInput::Identifier("c2".to_string()), Vec::new(), tok(file, 0)).unwrap();
    builders::add_constant(&mut d, scope, "c2", TypeExpr::Simple(SimpleType::Int32), InitializerInput::Identifier("c3".to_string()), Vec::new(), tok(file, 1)).unwrap();
    builders::add_constant(&mut d, scope, "c3", TypeExpr::Simple(SimpleType::Int32), InitializerInput::Literal(LiteralValue::infer_integer(5, false)), Vec::new(), tok(file, 2)).unwrap();

    resolver::resolve(&mut d).expect("out-of-order constant chain should still fully resolve");
    assert!(d.unresolved_value_refs().is_empty());
}

/// A genuinely undefined identifier is reported, and does not cause the
/// fixpoint loop to spin.
#[test]
fn undefined_constant_reference_is_reported() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "x.mojom", "const int32 c1 = DoesNotExist;\n");
    let scope = d.file(file).file_scope.unwrap();
    builders::add_constant(&mut d, scope, "c1", TypeExpr::Simple(SimpleType::Int32), InitializerInput::Identifier("DoesNotExist".to_string()), Vec::new(), tok(file, 0)).unwrap();

    let err = resolver::resolve(&mut d).unwrap_err();
    assert!(err.rendered.contains("Undefined value \"DoesNotExist\""), "{}", err.rendered);
}

/// Enum values can reference a sibling by its unqualified name.
#[test]
fn enum_value_explicit_init_references_sibling() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "x.mojom", "enum Color { RED, GREEN = RED };");
    let scope = d.file(file).file_scope.unwrap();
    let enum_id = builders::begin_enum(&mut d, scope, "Color", Vec::new(), tok(file, 0)).unwrap();
    builders::add_enum_value(&mut d, enum_id, "RED", None, tok(file, 1)).unwrap();
    builders::add_enum_value(&mut d, enum_id, "GREEN", Some(InitializerInput::Identifier("RED".to_string())), tok(file, 2)).unwrap();

    resolver::resolve(&mut d).expect("sibling enum-value reference should resolve");
}

/// A struct field typed `Foo?` (nullable struct reference) may default to
/// `default`, but a literal default is deferred until the type resolves
/// and then rejected if `Foo` turns out to be an enum.
#[test]
fn deferred_literal_default_against_enum_type_is_rejected() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "x.mojom", "enum Color { RED };\nstruct Foo { Color c = 5; };\n");
    let scope = d.file(file).file_scope.unwrap();

    let enum_id = builders::begin_enum(&mut d, scope, "Color", Vec::new(), tok(file, 0)).unwrap();
    builders::add_enum_value(&mut d, enum_id, "RED", None, tok(file, 1)).unwrap();

    let struct_id = builders::begin_struct(&mut d, scope, "Foo", Vec::new(), tok(file, 2)).unwrap();
    let type_ref = d.register_unresolved_type_reference(idlc_core::types::UserTypeRef::new("Color".to_string(), false, false, scope, tok(file, 3)));
    let field_idx = builders::add_field(&mut d, struct_id, "c", None, Vec::new(), TypeExpr::UserRef(type_ref), tok(file, 4)).unwrap();
    builders::set_default_value(&mut d, struct_id, field_idx, InitializerInput::Literal(LiteralValue::infer_integer(5, false))).unwrap();

    let err = resolver::resolve(&mut d).unwrap_err();
    assert!(err.rendered.contains("may not be assigned"), "{}", err.rendered);
}

/// A bare `default` keyword initializer on a field typed as a nullable
/// reference to a struct resolves cleanly once the type pass completes.
#[test]
fn deferred_default_keyword_against_struct_type_is_accepted() {
    let mut d = Descriptor::new();
    let file = new_file(&mut d, "x.mojom", "struct Bar{};\nstruct Foo { Bar? b = default; };\n");
    let scope = d.file(file).file_scope.unwrap();

    let bar_id = builders::begin_struct(&mut d, scope, "Bar", Vec::new(), tok(file, 0)).unwrap();
    let struct_id = builders::begin_struct(&mut d, scope, "Foo", Vec::new(), tok(file, 1)).unwrap();
    let type_ref = d.register_unresolved_type_reference(idlc_core::types::UserTypeRef::new("Bar".to_string(), true, false, scope, tok(file, 2)));
    let field_idx = builders::add_field(&mut d, struct_id, "b", None, Vec::new(), TypeExpr::UserRef(type_ref), tok(file, 3)).unwrap();
    builders::set_default_value(&mut d, struct_id, field_idx, InitializerInput::Literal(LiteralValue::Default)).unwrap();

    resolver::resolve(&mut d).expect("default against a struct type should resolve cleanly");
    assert_eq!(d.type_ref(type_ref).resolved_type(), Some(bar_id));
}
