use super::*;

fn kinds(source: &str) -> Vec<SyntaxKind> {
    Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn scans_struct_declaration() {
    let source = "struct Foo {\n  int32 x;\n};\n";
    let tokens = Lexer::tokenize(source);
    let texts: Vec<&str> = tokens.iter().map(|t| t.text(source)).collect();
    assert_eq!(
        texts,
        vec!["struct", "Foo", "{", "int32", "x", ";", "}", ";", ""]
    );
}

#[test]
fn scans_ordinal() {
    let tokens = Lexer::tokenize("M@4() => ();");
    assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
    assert_eq!(tokens[1].kind, SyntaxKind::Ordinal);
    assert_eq!(tokens[3].kind, SyntaxKind::RParen);
    assert_eq!(tokens[4].kind, SyntaxKind::FatArrow);
}

#[test]
fn rejects_ordinal_above_max() {
    let tokens = Lexer::tokenize("@4294967295");
    assert_eq!(tokens[0].kind, SyntaxKind::ErrorInvalidOrdinal);
}

#[test]
fn rejects_non_decimal_ordinal() {
    let tokens = Lexer::tokenize("@0x1");
    assert_eq!(tokens[0].kind, SyntaxKind::ErrorInvalidOrdinal);
}

#[test]
fn unterminated_block_comment_is_an_error_token() {
    let source = "/* this never ends";
    let tokens = Lexer::tokenize(source);
    assert_eq!(tokens[0].kind, SyntaxKind::ErrorUnterminatedComment);
}

#[test]
fn unterminated_string_is_an_error_token() {
    let tokens = Lexer::tokenize("\"oops");
    assert_eq!(tokens[0].kind, SyntaxKind::ErrorUnterminatedString);
}

#[test]
fn illegal_char_is_reported() {
    let tokens = Lexer::tokenize("struct $");
    assert_eq!(tokens[1].kind, SyntaxKind::ErrorIllegalChar);
}

#[test]
fn integer_literal_wider_than_u64_is_out_of_range() {
    let tokens = Lexer::tokenize("99999999999999999999");
    assert_eq!(tokens[0].kind, SyntaxKind::ErrorIntegerOutOfRange);
}

#[test]
fn scans_float_with_exponent() {
    assert_eq!(kinds("3.14159E40"), vec![SyntaxKind::FloatLiteral, SyntaxKind::Eof]);
}

#[test]
fn string_literal_round_trips_escapes() {
    let source = "\"hello\\nworld\"";
    let tokens = Lexer::tokenize(source);
    assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(
        unescape_string_literal(tokens[0].text(source)),
        "hello\nworld"
    );
}

#[test]
fn line_comments_are_skipped() {
    let source = "// a comment\nstruct Foo {};";
    assert_eq!(
        kinds(source),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::LBrace,
            SyntaxKind::RBrace,
            SyntaxKind::Semicolon,
            SyntaxKind::Eof,
        ]
    );
}
