//! The parser itself: a hand-written recursive-descent reader over
//! `idlc_lexer`'s flat token stream, calling into `idlc_core::builders` in
//! file order.

use idlc_common::diagnostics::{Diagnostic, DiagnosticKind};
use idlc_lexer::{unescape_string_literal, Lexer, SyntaxKind, Token};

use idlc_core::builders::{self, InitializerInput};
use idlc_core::decl::{Attribute, Parameter};
use idlc_core::types::{HandleKind, MapKeyType, SimpleType, UserTypeRef};
use idlc_core::{Descriptor, FileId, LiteralValue, ScopeId, SourceToken, TypeExpr, TypeId};

/// Parses one source file, driving `descriptor`'s builder API, and returns
/// its [`FileId`]. A lexical error or a grammar error aborts the file's
/// parse immediately (§7); duplicate-name and illegal-assignment errors
/// raised by the builders are instead collected into the file's error
/// record and parsing continues, since the declarations around them are
/// still syntactically well-formed.
pub fn parse_mojom_file(descriptor: &mut Descriptor, canonical_name: &str, imported_from: Option<&str>, source: &str) -> Result<FileId, Diagnostic> {
    let file = descriptor
        .add_mojom_file(canonical_name, imported_from, source)
        .map_err(|message| Diagnostic::error(DiagnosticKind::Syntax, message))?;

    let mut parser = Parser::new(source, file);

    if let Some(bad) = parser.tokens.iter().find(|t| t.kind.is_error()) {
        let message = lexical_error_message(bad.kind);
        let diag = descriptor.error_at(SourceToken::new(file, bad.span), Some(bad.text(source)), message, DiagnosticKind::Lexical);
        descriptor.push_file_error(file, diag.clone());
        return Err(diag);
    }

    match parser.parse_file_body(descriptor, file) {
        Ok(()) => Ok(file),
        Err(diag) => {
            descriptor.push_file_error(file, diag.clone());
            Err(diag)
        }
    }
}

fn lexical_error_message(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::ErrorUnterminatedComment => "Unterminated block comment.",
        SyntaxKind::ErrorUnterminatedString => "Unterminated string literal.",
        SyntaxKind::ErrorIllegalChar => "Unexpected character.",
        SyntaxKind::ErrorInvalidOrdinal => "Ordinals must be decimal integers between 0 and 4294967294.",
        SyntaxKind::ErrorIntegerOutOfRange => "Integer literal value out of range.",
        SyntaxKind::ErrorFloatOutOfRange => "Floating point literal out of range.",
        _ => "Lexical error.",
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    source: &'a str,
    pos: usize,
    file: FileId,
    /// Disambiguates the throwaway names given to a duplicate declaration so
    /// parsing can continue past it; see [`Self::begin_struct_recovering`]
    /// and its siblings.
    dup_counter: u32,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, file: FileId) -> Self {
        Self {
            tokens: Lexer::tokenize(source),
            source,
            pos: 0,
            file,
            dup_counter: 0,
        }
    }

    fn peek(&self) -> Token {
        self.tokens[self.pos]
    }

    fn kind(&self) -> SyntaxKind {
        self.peek().kind
    }

    fn peek_text(&self) -> &'a str {
        self.peek().text(self.source)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek();
        if !matches!(tok.kind, SyntaxKind::Eof) {
            self.pos += 1;
        }
        tok
    }

    fn token_at(&self, tok: Token) -> SourceToken {
        SourceToken::new(self.file, tok.span)
    }

    fn current_source_token(&self) -> SourceToken {
        self.token_at(self.peek())
    }

    fn is_keyword(&self, kw: &str) -> bool {
        self.kind() == SyntaxKind::Identifier && self.peek_text() == kw
    }

    fn error(&self, descriptor: &Descriptor, message: impl Into<String>, kind: DiagnosticKind) -> Diagnostic {
        let lexeme = self.peek_text();
        let lexeme = if lexeme.is_empty() { None } else { Some(lexeme) };
        descriptor.error_at(self.current_source_token(), lexeme, &message.into(), kind)
    }

    fn expect_kind(&mut self, descriptor: &Descriptor, want: SyntaxKind, what: &str) -> Result<Token, Diagnostic> {
        if self.kind() == want {
            Ok(self.advance())
        } else {
            Err(self.error(descriptor, format!("Expected {what}."), DiagnosticKind::Syntax))
        }
    }

    fn expect_identifier(&mut self, descriptor: &Descriptor) -> Result<(String, Token), Diagnostic> {
        if self.kind() == SyntaxKind::Identifier {
            let tok = self.advance();
            Ok((tok.text(self.source).to_string(), tok))
        } else {
            Err(self.error(descriptor, "Expected an identifier.", DiagnosticKind::Syntax))
        }
    }

    fn parse_dotted_name_with_token(&mut self, descriptor: &Descriptor) -> Result<(String, Token), Diagnostic> {
        let (first, first_tok) = self.expect_identifier(descriptor)?;
        let mut name = first;
        while self.kind() == SyntaxKind::Dot {
            self.advance();
            let (part, _) = self.expect_identifier(descriptor)?;
            name.push('.');
            name.push_str(&part);
        }
        Ok((name, first_tok))
    }

    fn parse_dotted_name(&mut self, descriptor: &Descriptor) -> Result<String, Diagnostic> {
        Ok(self.parse_dotted_name_with_token(descriptor)?.0)
    }

    fn consume_question(&mut self) -> bool {
        if self.kind() == SyntaxKind::Question {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_optional_ordinal(&mut self, descriptor: &Descriptor) -> Result<Option<u32>, Diagnostic> {
        if self.kind() != SyntaxKind::Ordinal {
            return Ok(None);
        }
        let tok = self.advance();
        let digits = &tok.text(self.source)[1..];
        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| {
                descriptor.error_at(
                    self.token_at(tok),
                    Some(tok.text(self.source)),
                    "Ordinals must be decimal integers between 0 and 4294967294.",
                    DiagnosticKind::Ordinal,
                )
            })
    }

    // ---- Types -------------------------------------------------------

    fn parse_type(&mut self, descriptor: &mut Descriptor, scope: ScopeId) -> Result<TypeExpr, Diagnostic> {
        if self.kind() != SyntaxKind::Identifier {
            return Err(self.error(descriptor, "Expected a type.", DiagnosticKind::Syntax));
        }
        let text = self.peek_text();
        if let Some(simple) = SimpleType::from_keyword(text) {
            let tok = self.advance();
            if self.consume_question() {
                let message = format!("The type {simple}? is invalid because the type {simple} may not be made nullable.");
                return Err(descriptor.error_at(self.token_at(tok), Some(text), &message, DiagnosticKind::InvalidType));
            }
            return Ok(TypeExpr::Simple(simple));
        }
        match text {
            "string" => {
                self.advance();
                let nullable = self.consume_question();
                Ok(TypeExpr::String { nullable })
            }
            "handle" => {
                self.advance();
                let kind = if self.kind() == SyntaxKind::LAngle {
                    self.advance();
                    let (kw, kw_tok) = self.expect_identifier(descriptor)?;
                    let handle_kind = HandleKind::from_keyword(&kw)
                        .ok_or_else(|| descriptor.error_at(self.token_at(kw_tok), Some(&kw), &format!("Unknown handle kind '{kw}'."), DiagnosticKind::InvalidType))?;
                    self.expect_kind(descriptor, SyntaxKind::RAngle, "'>'")?;
                    handle_kind
                } else {
                    HandleKind::Generic
                };
                let nullable = self.consume_question();
                Ok(TypeExpr::Handle { kind, nullable })
            }
            "array" => {
                self.advance();
                self.expect_kind(descriptor, SyntaxKind::LAngle, "'<'")?;
                let element = self.parse_type(descriptor, scope)?;
                let fixed_length = if self.kind() == SyntaxKind::Comma {
                    self.advance();
                    let len_tok = self.expect_kind(descriptor, SyntaxKind::IntegerLiteral, "an array length")?;
                    let text = len_tok.text(self.source);
                    let n: u32 = text
                        .parse()
                        .map_err(|_| descriptor.error_at(self.token_at(len_tok), Some(text), "Array length out of range.", DiagnosticKind::InvalidType))?;
                    Some(n)
                } else {
                    None
                };
                self.expect_kind(descriptor, SyntaxKind::RAngle, "'>'")?;
                let nullable = self.consume_question();
                Ok(TypeExpr::Array {
                    element: Box::new(element),
                    fixed_length,
                    nullable,
                })
            }
            "map" => {
                self.advance();
                self.expect_kind(descriptor, SyntaxKind::LAngle, "'<'")?;
                let (key_text, key_tok) = self.expect_identifier(descriptor)?;
                let key = if key_text == "string" {
                    MapKeyType::String
                } else {
                    SimpleType::from_keyword(&key_text)
                        .map(MapKeyType::Simple)
                        .ok_or_else(|| descriptor.error_at(self.token_at(key_tok), Some(&key_text), "Map keys must be a simple type or string.", DiagnosticKind::InvalidType))?
                };
                self.expect_kind(descriptor, SyntaxKind::Comma, "','")?;
                let value = self.parse_type(descriptor, scope)?;
                self.expect_kind(descriptor, SyntaxKind::RAngle, "'>'")?;
                let nullable = self.consume_question();
                Ok(TypeExpr::Map {
                    key,
                    value: Box::new(value),
                    nullable,
                })
            }
            _ => {
                let (name, name_tok) = self.parse_dotted_name_with_token(descriptor)?;
                let nullable = self.consume_question();
                let token = self.token_at(name_tok);
                let type_ref = UserTypeRef::new(name, nullable, false, scope, token);
                let ref_id = descriptor.register_unresolved_type_reference(type_ref);
                Ok(TypeExpr::UserRef(ref_id))
            }
        }
    }

    // ---- Literals & initializers --------------------------------------

    fn parse_integer_magnitude(text: &str) -> u64 {
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).expect("lexer already validated this fits u64")
        } else {
            text.parse().expect("lexer already validated this fits u64")
        }
    }

    fn parse_numeric_literal(&mut self, descriptor: &Descriptor, negative: bool) -> Result<LiteralValue, Diagnostic> {
        match self.kind() {
            SyntaxKind::IntegerLiteral => {
                let tok = self.advance();
                let magnitude = Self::parse_integer_magnitude(tok.text(self.source));
                Ok(LiteralValue::infer_integer(magnitude, negative))
            }
            SyntaxKind::FloatLiteral => {
                let tok = self.advance();
                let mut value: f64 = tok.text(self.source).parse().expect("lexer already validated this is a finite float");
                if negative {
                    value = -value;
                }
                Ok(LiteralValue::Double(value))
            }
            _ => Err(self.error(descriptor, "Expected a number after '-'.", DiagnosticKind::Syntax)),
        }
    }

    fn parse_initializer_input(&mut self, descriptor: &Descriptor) -> Result<InitializerInput, Diagnostic> {
        match self.kind() {
            SyntaxKind::Identifier => match self.peek_text() {
                "default" => {
                    self.advance();
                    Ok(InitializerInput::Literal(LiteralValue::Default))
                }
                "true" => {
                    self.advance();
                    Ok(InitializerInput::Literal(LiteralValue::Bool(true)))
                }
                "false" => {
                    self.advance();
                    Ok(InitializerInput::Literal(LiteralValue::Bool(false)))
                }
                _ => {
                    let name = self.parse_dotted_name(descriptor)?;
                    Ok(InitializerInput::Identifier(name))
                }
            },
            SyntaxKind::Minus => {
                self.advance();
                self.parse_numeric_literal(descriptor, true).map(InitializerInput::Literal)
            }
            SyntaxKind::IntegerLiteral | SyntaxKind::FloatLiteral => self.parse_numeric_literal(descriptor, false).map(InitializerInput::Literal),
            SyntaxKind::StringLiteral => {
                let tok = self.advance();
                Ok(InitializerInput::Literal(LiteralValue::String(unescape_string_literal(tok.text(self.source)))))
            }
            _ => Err(self.error(descriptor, "Expected an initializer value.", DiagnosticKind::Syntax)),
        }
    }

    fn parse_attribute_value(&mut self, descriptor: &Descriptor) -> Result<LiteralValue, Diagnostic> {
        match self.kind() {
            SyntaxKind::Identifier => match self.peek_text() {
                "true" => {
                    self.advance();
                    Ok(LiteralValue::Bool(true))
                }
                "false" => {
                    self.advance();
                    Ok(LiteralValue::Bool(false))
                }
                _ => {
                    // A bare identifier as an attribute value (`[ServiceName=Foo]`)
                    // names a tag, not a reference to resolve; it is recorded as
                    // a string so the attribute model stays a single concrete type.
                    let name = self.parse_dotted_name(descriptor)?;
                    Ok(LiteralValue::String(name))
                }
            },
            SyntaxKind::Minus => {
                self.advance();
                self.parse_numeric_literal(descriptor, true)
            }
            SyntaxKind::IntegerLiteral | SyntaxKind::FloatLiteral => self.parse_numeric_literal(descriptor, false),
            SyntaxKind::StringLiteral => {
                let tok = self.advance();
                Ok(LiteralValue::String(unescape_string_literal(tok.text(self.source))))
            }
            _ => Err(self.error(descriptor, "Expected an attribute value.", DiagnosticKind::Syntax)),
        }
    }

    fn parse_attributes(&mut self, descriptor: &Descriptor) -> Result<Vec<Attribute>, Diagnostic> {
        if self.kind() != SyntaxKind::LBracket {
            return Ok(Vec::new());
        }
        self.advance();
        let mut attrs = Vec::new();
        loop {
            let (name, _) = self.expect_identifier(descriptor)?;
            let value = if self.kind() == SyntaxKind::Equals {
                self.advance();
                Some(self.parse_attribute_value(descriptor)?)
            } else {
                None
            };
            attrs.push(Attribute { name, value });
            if self.kind() == SyntaxKind::Comma {
                self.advance();
                continue;
            }
            break;
        }
        self.expect_kind(descriptor, SyntaxKind::RBracket, "']'")?;
        Ok(attrs)
    }

    // ---- Recovering declaration heads -----------------------------------
    //
    // A duplicate-name error from a `begin_*` builder still leaves the body
    // of the declaration to parse; rather than special-case the body parser
    // for a missing `TypeId`, these retry under a synthesized name that is
    // guaranteed not to collide, so the rest of the file parses normally and
    // only the original diagnostic (not a cascade) is reported.

    fn begin_struct_recovering(&mut self, descriptor: &mut Descriptor, file: FileId, scope: ScopeId, name: &str, attrs: Vec<Attribute>, token: SourceToken) -> TypeId {
        match builders::begin_struct(descriptor, scope, name, attrs, token) {
            Ok(id) => id,
            Err(diag) => {
                descriptor.push_file_error(file, diag);
                self.dup_counter += 1;
                let fallback = format!("{name}#parse-recovery#{}", self.dup_counter);
                builders::begin_struct(descriptor, scope, &fallback, Vec::new(), token).expect("recovery name is always unique")
            }
        }
    }

    fn begin_union_recovering(&mut self, descriptor: &mut Descriptor, file: FileId, scope: ScopeId, name: &str, attrs: Vec<Attribute>, token: SourceToken) -> TypeId {
        match builders::begin_union(descriptor, scope, name, attrs, token) {
            Ok(id) => id,
            Err(diag) => {
                descriptor.push_file_error(file, diag);
                self.dup_counter += 1;
                let fallback = format!("{name}#parse-recovery#{}", self.dup_counter);
                builders::begin_union(descriptor, scope, &fallback, Vec::new(), token).expect("recovery name is always unique")
            }
        }
    }

    fn begin_interface_recovering(&mut self, descriptor: &mut Descriptor, file: FileId, scope: ScopeId, name: &str, attrs: Vec<Attribute>, token: SourceToken) -> TypeId {
        match builders::begin_interface(descriptor, scope, name, attrs, token) {
            Ok(id) => id,
            Err(diag) => {
                descriptor.push_file_error(file, diag);
                self.dup_counter += 1;
                let fallback = format!("{name}#parse-recovery#{}", self.dup_counter);
                builders::begin_interface(descriptor, scope, &fallback, Vec::new(), token).expect("recovery name is always unique")
            }
        }
    }

    fn begin_enum_recovering(&mut self, descriptor: &mut Descriptor, file: FileId, scope: ScopeId, name: &str, attrs: Vec<Attribute>, token: SourceToken) -> TypeId {
        match builders::begin_enum(descriptor, scope, name, attrs, token) {
            Ok(id) => id,
            Err(diag) => {
                descriptor.push_file_error(file, diag);
                self.dup_counter += 1;
                let fallback = format!("{name}#parse-recovery#{}", self.dup_counter);
                builders::begin_enum(descriptor, scope, &fallback, Vec::new(), token).expect("recovery name is always unique")
            }
        }
    }

    // ---- Declarations ---------------------------------------------------

    fn parse_struct(&mut self, descriptor: &mut Descriptor, file: FileId, container_scope: ScopeId, attrs: Vec<Attribute>) -> Result<(), Diagnostic> {
        self.advance(); // 'struct'
        let (name, name_tok) = self.expect_identifier(descriptor)?;
        let token = self.token_at(name_tok);
        let struct_id = self.begin_struct_recovering(descriptor, file, container_scope, &name, attrs, token);
        self.expect_kind(descriptor, SyntaxKind::LBrace, "'{'")?;
        loop {
            match self.kind() {
                SyntaxKind::RBrace => break,
                SyntaxKind::Eof => return Err(self.error(descriptor, "Unexpected end of file inside struct body.", DiagnosticKind::Syntax)),
                _ => self.parse_struct_member(descriptor, file, struct_id)?,
            }
        }
        self.advance(); // '}'
        self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after struct declaration")?;
        descriptor.files[file.index()].structs.push(struct_id);
        Ok(())
    }

    fn parse_struct_member(&mut self, descriptor: &mut Descriptor, file: FileId, struct_id: TypeId) -> Result<(), Diagnostic> {
        let own_scope = descriptor.ty(struct_id).own_scope();
        let attrs = self.parse_attributes(descriptor)?;
        if self.is_keyword("enum") {
            return self.parse_enum(descriptor, file, own_scope, attrs);
        }
        if self.is_keyword("const") {
            return self.parse_const(descriptor, file, own_scope, attrs);
        }

        let field_type = self.parse_type(descriptor, own_scope)?;
        let (name, name_tok) = self.expect_identifier(descriptor)?;
        let token = self.token_at(name_tok);
        let ordinal = self.parse_optional_ordinal(descriptor)?;
        let field_index = match builders::add_field(descriptor, struct_id, &name, ordinal, attrs, field_type, token) {
            Ok(idx) => Some(idx),
            Err(diag) => {
                descriptor.push_file_error(file, diag);
                None
            }
        };
        if self.kind() == SyntaxKind::Equals {
            self.advance();
            let input = self.parse_initializer_input(descriptor)?;
            if let Some(idx) = field_index {
                if let Err(diag) = builders::set_default_value(descriptor, struct_id, idx, input) {
                    descriptor.push_file_error(file, diag);
                }
            }
        }
        self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after field declaration")?;
        Ok(())
    }

    fn parse_union(&mut self, descriptor: &mut Descriptor, file: FileId, container_scope: ScopeId, attrs: Vec<Attribute>) -> Result<(), Diagnostic> {
        self.advance(); // 'union'
        let (name, name_tok) = self.expect_identifier(descriptor)?;
        let token = self.token_at(name_tok);
        let union_id = self.begin_union_recovering(descriptor, file, container_scope, &name, attrs, token);
        self.expect_kind(descriptor, SyntaxKind::LBrace, "'{'")?;
        loop {
            match self.kind() {
                SyntaxKind::RBrace => break,
                SyntaxKind::Eof => return Err(self.error(descriptor, "Unexpected end of file inside union body.", DiagnosticKind::Syntax)),
                _ => self.parse_union_member(descriptor, file, union_id)?,
            }
        }
        self.advance(); // '}'
        self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after union declaration")?;
        descriptor.files[file.index()].unions.push(union_id);
        Ok(())
    }

    fn parse_union_member(&mut self, descriptor: &mut Descriptor, file: FileId, union_id: TypeId) -> Result<(), Diagnostic> {
        let own_scope = descriptor.ty(union_id).own_scope();
        // Union fields carry no attributes of their own; a bracketed block
        // here is still consumed so a stray one doesn't desync the parser.
        let _ = self.parse_attributes(descriptor)?;
        let field_type = self.parse_type(descriptor, own_scope)?;
        let (name, name_tok) = self.expect_identifier(descriptor)?;
        let token = self.token_at(name_tok);
        let ordinal = self.parse_optional_ordinal(descriptor)?;
        if let Err(diag) = builders::add_union_field(descriptor, union_id, &name, ordinal, field_type, token) {
            descriptor.push_file_error(file, diag);
        }
        self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after union field")?;
        Ok(())
    }

    fn parse_interface(&mut self, descriptor: &mut Descriptor, file: FileId, container_scope: ScopeId, attrs: Vec<Attribute>) -> Result<(), Diagnostic> {
        self.advance(); // 'interface'
        let (name, name_tok) = self.expect_identifier(descriptor)?;
        let token = self.token_at(name_tok);
        let iface_id = self.begin_interface_recovering(descriptor, file, container_scope, &name, attrs, token);
        self.expect_kind(descriptor, SyntaxKind::LBrace, "'{'")?;
        loop {
            match self.kind() {
                SyntaxKind::RBrace => break,
                SyntaxKind::Eof => return Err(self.error(descriptor, "Unexpected end of file inside interface body.", DiagnosticKind::Syntax)),
                _ => self.parse_interface_member(descriptor, file, iface_id)?,
            }
        }
        self.advance(); // '}'
        self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after interface declaration")?;
        descriptor.files[file.index()].interfaces.push(iface_id);
        Ok(())
    }

    fn parse_interface_member(&mut self, descriptor: &mut Descriptor, file: FileId, iface_id: TypeId) -> Result<(), Diagnostic> {
        let own_scope = descriptor.ty(iface_id).own_scope();
        let attrs = self.parse_attributes(descriptor)?;
        if self.is_keyword("enum") {
            return self.parse_enum(descriptor, file, own_scope, attrs);
        }
        if self.is_keyword("const") {
            return self.parse_const(descriptor, file, own_scope, attrs);
        }

        let (name, name_tok) = self.expect_identifier(descriptor)?;
        let token = self.token_at(name_tok);
        let ordinal = self.parse_optional_ordinal(descriptor)?;
        self.expect_kind(descriptor, SyntaxKind::LParen, "'('")?;
        let params = self.parse_parameter_list(descriptor, own_scope)?;
        self.expect_kind(descriptor, SyntaxKind::RParen, "')'")?;
        let response = if self.kind() == SyntaxKind::FatArrow {
            self.advance();
            self.expect_kind(descriptor, SyntaxKind::LParen, "'('")?;
            let resp = self.parse_parameter_list(descriptor, own_scope)?;
            self.expect_kind(descriptor, SyntaxKind::RParen, "')'")?;
            Some(resp)
        } else {
            None
        };
        if let Err(diag) = builders::add_method(descriptor, iface_id, &name, ordinal, attrs, params, response, token) {
            descriptor.push_file_error(file, diag);
        }
        self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after method declaration")?;
        Ok(())
    }

    fn parse_parameter_list(&mut self, descriptor: &mut Descriptor, scope: ScopeId) -> Result<Vec<Parameter>, Diagnostic> {
        let mut params = Vec::new();
        if self.kind() == SyntaxKind::RParen {
            return Ok(params);
        }
        loop {
            let _ = self.parse_attributes(descriptor)?;
            let param_type = self.parse_type(descriptor, scope)?;
            let (name, name_tok) = self.expect_identifier(descriptor)?;
            let token = self.token_at(name_tok);
            let ordinal = self.parse_optional_ordinal(descriptor)?;
            params.push(Parameter {
                name,
                ordinal,
                param_type,
                token,
            });
            if self.kind() == SyntaxKind::Comma {
                self.advance();
                continue;
            }
            break;
        }
        Ok(params)
    }

    fn parse_enum(&mut self, descriptor: &mut Descriptor, file: FileId, container_scope: ScopeId, attrs: Vec<Attribute>) -> Result<(), Diagnostic> {
        self.advance(); // 'enum'
        let (name, name_tok) = self.expect_identifier(descriptor)?;
        let token = self.token_at(name_tok);
        let enum_id = self.begin_enum_recovering(descriptor, file, container_scope, &name, attrs, token);
        self.expect_kind(descriptor, SyntaxKind::LBrace, "'{'")?;
        if self.kind() != SyntaxKind::RBrace {
            loop {
                let (value_name, value_tok) = self.expect_identifier(descriptor)?;
                let value_token = self.token_at(value_tok);
                let init = if self.kind() == SyntaxKind::Equals {
                    self.advance();
                    Some(self.parse_initializer_input(descriptor)?)
                } else {
                    None
                };
                if let Err(diag) = builders::add_enum_value(descriptor, enum_id, &value_name, init, value_token) {
                    descriptor.push_file_error(file, diag);
                }
                if self.kind() == SyntaxKind::Comma {
                    self.advance();
                    if self.kind() == SyntaxKind::RBrace {
                        break;
                    }
                    continue;
                }
                break;
            }
        }
        self.expect_kind(descriptor, SyntaxKind::RBrace, "'}'")?;
        self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after enum declaration")?;
        descriptor.files[file.index()].enums.push(enum_id);
        Ok(())
    }

    fn parse_const(&mut self, descriptor: &mut Descriptor, file: FileId, container_scope: ScopeId, attrs: Vec<Attribute>) -> Result<(), Diagnostic> {
        self.advance(); // 'const'
        let declared_type = self.parse_type(descriptor, container_scope)?;
        let (name, name_tok) = self.expect_identifier(descriptor)?;
        let token = self.token_at(name_tok);
        self.expect_kind(descriptor, SyntaxKind::Equals, "'=' after const name")?;
        let input = self.parse_initializer_input(descriptor)?;
        self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after const declaration")?;
        match builders::add_constant(descriptor, container_scope, &name, declared_type, input, attrs, token) {
            Ok(value_id) => descriptor.files[file.index()].constants.push(value_id),
            Err(diag) => descriptor.push_file_error(file, diag),
        }
        Ok(())
    }

    fn parse_top_level_decl(&mut self, descriptor: &mut Descriptor, file: FileId, scope: ScopeId, attrs: Vec<Attribute>) -> Result<(), Diagnostic> {
        if self.is_keyword("struct") {
            return self.parse_struct(descriptor, file, scope, attrs);
        }
        if self.is_keyword("union") {
            return self.parse_union(descriptor, file, scope, attrs);
        }
        if self.is_keyword("interface") {
            return self.parse_interface(descriptor, file, scope, attrs);
        }
        if self.is_keyword("enum") {
            return self.parse_enum(descriptor, file, scope, attrs);
        }
        if self.is_keyword("const") {
            return self.parse_const(descriptor, file, scope, attrs);
        }
        Err(self.error(descriptor, "Expected a struct, union, interface, enum, or const declaration.", DiagnosticKind::Syntax))
    }

    fn parse_file_body(&mut self, descriptor: &mut Descriptor, file: FileId) -> Result<(), Diagnostic> {
        let mut pending_attrs = self.parse_attributes(descriptor)?;
        let mut module_namespace = None;
        if self.is_keyword("module") {
            self.advance();
            let name = self.parse_dotted_name(descriptor)?;
            self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after module declaration")?;
            descriptor.files[file.index()].attributes = std::mem::take(&mut pending_attrs);
            module_namespace = Some(name);
            pending_attrs = self.parse_attributes(descriptor)?;
        }
        let scope = descriptor.initialize_file_scope(file, module_namespace.as_deref());

        while self.is_keyword("import") {
            self.advance();
            let path_tok = self.expect_kind(descriptor, SyntaxKind::StringLiteral, "a quoted import path")?;
            let path = unescape_string_literal(path_tok.text(self.source));
            let import_token = self.token_at(path_tok);
            self.expect_kind(descriptor, SyntaxKind::Semicolon, "';' after import declaration")?;
            descriptor.add_import(file, &path, import_token);
            pending_attrs = self.parse_attributes(descriptor)?;
        }

        while self.kind() != SyntaxKind::Eof {
            let attrs = std::mem::take(&mut pending_attrs);
            self.parse_top_level_decl(descriptor, file, scope, attrs)?;
            pending_attrs = self.parse_attributes(descriptor)?;
        }
        Ok(())
    }
}
