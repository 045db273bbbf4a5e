use idlc_core::{resolver, Descriptor};

use crate::parse_mojom_file;

fn parse(descriptor: &mut Descriptor, name: &str, source: &str) -> idlc_core::FileId {
    parse_mojom_file(descriptor, name, None, source).expect("source should parse")
}

#[test]
fn parses_and_resolves_a_struct_with_a_field_reference() {
    let mut descriptor = Descriptor::new();
    parse(
        &mut descriptor,
        "a.mojom",
        r#"
        module shapes;

        struct Point {
          int32 x = 0;
          int32 y = 0;
        };

        struct Line {
          Point start;
          Point end;
        };
        "#,
    );
    resolver::resolve(&mut descriptor).expect("no unresolved references");
}

#[test]
fn parses_interface_with_response_and_const() {
    let mut descriptor = Descriptor::new();
    parse(
        &mut descriptor,
        "a.mojom",
        r#"
        module net;

        interface Fetcher {
          const int32 kMaxRetries = 3;
          Fetch(string url) => (bool ok, array<uint8> body);
        };
        "#,
    );
    resolver::resolve(&mut descriptor).expect("no unresolved references");
}

#[test]
fn parses_enum_with_explicit_and_implicit_values() {
    let mut descriptor = Descriptor::new();
    parse(
        &mut descriptor,
        "a.mojom",
        r#"
        enum Color {
          RED = 1,
          GREEN,
          BLUE = RED,
        };
        "#,
    );
    resolver::resolve(&mut descriptor).expect("no unresolved references");
}

#[test]
fn parses_union_and_nested_const() {
    let mut descriptor = Descriptor::new();
    parse(
        &mut descriptor,
        "a.mojom",
        r#"
        union Value {
          int32 int_value;
          string string_value;
        };

        struct Holder {
          const int32 kDefault = -1;
          Value payload;
        };
        "#,
    );
    resolver::resolve(&mut descriptor).expect("no unresolved references");
}

#[test]
fn rejects_undefined_type_reference() {
    let mut descriptor = Descriptor::new();
    parse(
        &mut descriptor,
        "a.mojom",
        r#"
        struct Foo {
          Bar b;
        };
        "#,
    );
    let err = resolver::resolve(&mut descriptor).unwrap_err();
    assert!(err.rendered.contains("Undefined type"));
}

#[test]
fn duplicate_field_name_is_collected_without_aborting_the_rest_of_the_file() {
    let mut descriptor = Descriptor::new();
    let file = parse(
        &mut descriptor,
        "a.mojom",
        r#"
        struct Foo {
          int32 x;
          int32 x;
        };

        struct Bar {
          int32 y;
        };
        "#,
    );
    assert_eq!(descriptor.file(file).errors.len(), 1);
    assert_eq!(descriptor.file(file).structs.len(), 2);
    resolver::resolve(&mut descriptor).expect("no unresolved references remain after a collected duplicate-name error");
}

#[test]
fn malformed_declaration_is_a_fatal_syntax_error() {
    let mut descriptor = Descriptor::new();
    let err = parse_mojom_file(&mut descriptor, "a.mojom", None, "struct Foo { int32 x }").unwrap_err();
    assert!(err.rendered.contains("Expected"));
}

#[test]
fn attributes_and_ordinals_are_accepted() {
    let mut descriptor = Descriptor::new();
    parse(
        &mut descriptor,
        "a.mojom",
        r#"
        [Stable]
        struct Foo {
          [MinVersion=1] int32 x@0;
          int32 y@1;
        };
        "#,
    );
    resolver::resolve(&mut descriptor).expect("no unresolved references");
}

#[test]
fn nullable_and_array_and_map_types_parse() {
    let mut descriptor = Descriptor::new();
    parse(
        &mut descriptor,
        "a.mojom",
        r#"
        struct Foo {
          string? name;
          array<int32> list;
          array<int32, 4> fixed_list;
          map<string, int32> table;
          handle<message_pipe>? pipe;
        };
        "#,
    );
    resolver::resolve(&mut descriptor).expect("no unresolved references");
}

#[test]
fn import_declarations_are_recorded() {
    let mut descriptor = Descriptor::new();
    let file = parse(
        &mut descriptor,
        "a.mojom",
        r#"
        import "other.mojom";
        import "third.mojom";

        struct Foo {
          int32 x;
        };
        "#,
    );
    assert_eq!(descriptor.file(file).imports.len(), 2);
    assert_eq!(descriptor.file(file).imports[0].specified_name, "other.mojom");
}
