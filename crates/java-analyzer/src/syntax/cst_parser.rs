use rowan::{GreenNode, GreenNodeBuilder};

use crate::syntax::{kind::SyntaxKind, lexer::Lexer};

/// A parse problem with byte-offset bounds into the original text.
///
/// `start..end` covers the offending token; at end of input both bounds sit
/// past the last byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub start: usize,
    pub end: usize,
    pub message: String,
}

pub struct ParseOutput {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

pub struct Parser<'a> {
    tokens: Vec<(SyntaxKind, &'a str)>,
    pos: usize,
    offset: usize,
    text_len: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
    recovering: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let tokens: Vec<_> = Lexer::new(input).collect();
        Self {
            tokens,
            pos: 0,
            offset: 0,
            text_len: input.len(),
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            recovering: false,
        }
    }

    pub fn parse(mut self) -> ParseOutput {
        self.start_node(SyntaxKind::Root);
        self.parse_compilation_unit();
        self.finish_node();
        ParseOutput {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // ── compilation unit ────────────────────────────────────────────────

    fn parse_compilation_unit(&mut self) {
        loop {
            self.skip_trivia();
            if self.is_eof() {
                break;
            }
            match self.peek() {
                SyntaxKind::KwPackage => {
                    self.parse_package_decl();
                },
                SyntaxKind::KwImport => {
                    self.parse_import_decl();
                },
                SyntaxKind::Semicolon => {
                    self.bump();
                },
                _ => {
                    if self.at_type_decl_start() {
                        self.parse_type_decl();
                        self.recovering = false;
                    } else {
                        if !self.recovering {
                            self.error("expected class, interface, or enum");
                        }
                        self.recovering = true;
                        self.bump();
                    }
                },
            }
        }
    }

    fn parse_package_decl(&mut self) {
        self.start_node(SyntaxKind::PackageDecl);
        self.bump();
        self.skip_trivia();
        self.parse_qualified_name();
        self.skip_trivia();
        self.expect(SyntaxKind::Semicolon, "expected ';'");
        self.finish_node();
    }

    fn parse_import_decl(&mut self) {
        self.start_node(SyntaxKind::ImportDecl);
        self.bump();
        self.skip_trivia();
        if self.at(SyntaxKind::KwStatic) {
            self.bump();
            self.skip_trivia();
        }
        self.parse_qualified_name();
        self.skip_trivia();
        self.expect(SyntaxKind::Semicolon, "expected ';'");
        self.finish_node();
    }

    /// `a.b.c` with an optional trailing `.*`.
    fn parse_qualified_name(&mut self) {
        self.start_node(SyntaxKind::QualifiedName);
        if self.at(SyntaxKind::Ident) {
            self.bump();
        } else {
            self.error("expected identifier");
        }
        loop {
            self.skip_trivia();
            if !self.at(SyntaxKind::Dot) {
                break;
            }
            self.bump();
            self.skip_trivia();
            if self.at(SyntaxKind::Ident) {
                self.bump();
            } else if self.at(SyntaxKind::Star) {
                self.bump();
                break;
            } else {
                self.error("expected identifier");
                break;
            }
        }
        self.finish_node();
    }

    // ── type declarations ───────────────────────────────────────────────

    fn at_type_decl_start(&self) -> bool {
        let mut cursor = self.cursor();
        cursor.skip_trivia();
        cursor.skip_modifiers();
        matches!(
            cursor.peek(),
            Some(SyntaxKind::KwClass | SyntaxKind::KwInterface | SyntaxKind::KwEnum)
        )
    }

    fn parse_type_decl(&mut self) {
        let mut cursor = self.cursor();
        cursor.skip_trivia();
        cursor.skip_modifiers();
        let kind = match cursor.peek() {
            Some(SyntaxKind::KwInterface) => SyntaxKind::InterfaceDecl,
            Some(SyntaxKind::KwEnum) => SyntaxKind::EnumDecl,
            _ => SyntaxKind::ClassDecl,
        };

        self.skip_trivia();
        self.start_node(kind);
        self.parse_modifiers();
        self.skip_trivia();
        // class / interface / enum keyword
        self.bump();
        self.skip_trivia();
        if self.at(SyntaxKind::Ident) {
            self.bump();
        } else {
            self.error("expected identifier");
        }
        self.skip_trivia();
        if self.at(SyntaxKind::Less) {
            self.consume_balanced(SyntaxKind::Less, SyntaxKind::Greater);
            self.skip_trivia();
        }
        if self.at(SyntaxKind::KwExtends) {
            self.bump();
            self.skip_trivia();
            self.parse_type_ref();
            self.skip_trivia();
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.skip_trivia();
                self.parse_type_ref();
                self.skip_trivia();
            }
        }
        if self.at(SyntaxKind::KwImplements) {
            self.bump();
            self.skip_trivia();
            self.parse_type_ref();
            self.skip_trivia();
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.skip_trivia();
                self.parse_type_ref();
                self.skip_trivia();
            }
        }
        if kind == SyntaxKind::EnumDecl {
            self.parse_enum_body();
        } else {
            self.parse_class_body();
        }
        self.finish_node();
    }

    fn parse_class_body(&mut self) {
        self.skip_trivia();
        if !self.expect(SyntaxKind::LBrace, "expected '{'") {
            return;
        }
        self.parse_member_loop();
        self.expect(SyntaxKind::RBrace, "expected '}'");
    }

    /// Constants first, then ordinary members. Each constant becomes a
    /// field of the enum itself.
    fn parse_enum_body(&mut self) {
        self.skip_trivia();
        if !self.expect(SyntaxKind::LBrace, "expected '{'") {
            return;
        }
        loop {
            self.skip_trivia();
            if !self.at(SyntaxKind::Ident) {
                break;
            }
            // `NAME`, `NAME(args)`, optionally with a constant body,
            // terminated by ',' ';' or '}'. Anything else means ordinary
            // members have started.
            let mut cursor = self.cursor();
            cursor.bump();
            cursor.skip_trivia();
            if cursor.peek() == Some(SyntaxKind::LParen)
                && !cursor.skip_balanced(SyntaxKind::LParen, SyntaxKind::RParen)
            {
                break;
            }
            cursor.skip_trivia();
            if !matches!(
                cursor.peek(),
                Some(
                    SyntaxKind::Comma
                        | SyntaxKind::Semicolon
                        | SyntaxKind::RBrace
                        | SyntaxKind::LBrace
                ) | None
            ) {
                break;
            }
            self.start_node(SyntaxKind::FieldDecl);
            self.bump();
            self.skip_trivia();
            if self.at(SyntaxKind::LParen) {
                self.parse_arg_list();
                self.skip_trivia();
            }
            if self.at(SyntaxKind::LBrace) {
                self.consume_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace);
            }
            self.finish_node();
            self.skip_trivia();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            if self.at(SyntaxKind::Semicolon) {
                self.bump();
            }
            break;
        }
        self.parse_member_loop();
        self.expect(SyntaxKind::RBrace, "expected '}'");
    }

    fn parse_member_loop(&mut self) {
        loop {
            self.skip_trivia();
            if self.is_eof() || self.at(SyntaxKind::RBrace) {
                break;
            }
            match self.classify_member() {
                MemberStart::Nested => {
                    self.parse_type_decl();
                },
                MemberStart::Constructor => {
                    self.parse_method_decl(false);
                },
                MemberStart::Method => {
                    self.parse_method_decl(true);
                },
                MemberStart::Field => {
                    self.parse_field_decl();
                },
                MemberStart::Stray => {
                    if self.at(SyntaxKind::Semicolon) {
                        self.bump();
                    } else {
                        if !self.recovering {
                            self.error("expected member declaration");
                        }
                        self.recovering = true;
                        self.bump();
                        continue;
                    }
                },
            }
            self.recovering = false;
        }
    }

    fn classify_member(&self) -> MemberStart {
        let mut cursor = self.cursor();
        cursor.skip_trivia();
        cursor.skip_modifiers();
        match cursor.peek() {
            Some(SyntaxKind::KwClass | SyntaxKind::KwInterface | SyntaxKind::KwEnum) => {
                MemberStart::Nested
            },
            Some(SyntaxKind::Ident) => {
                // `Name(` with no preceding type is a constructor.
                let mut ahead = cursor.clone();
                ahead.bump();
                ahead.skip_trivia();
                if ahead.peek() == Some(SyntaxKind::LParen) {
                    return MemberStart::Constructor;
                }
                Self::classify_typed_member(cursor)
            },
            Some(kind) if kind.is_primitive_type() => Self::classify_typed_member(cursor),
            _ => MemberStart::Stray,
        }
    }

    fn classify_typed_member(mut cursor: TokenCursor<'_, 'a>) -> MemberStart {
        if !cursor.scan_type() {
            return MemberStart::Stray;
        }
        cursor.skip_trivia();
        if cursor.peek() != Some(SyntaxKind::Ident) {
            return MemberStart::Stray;
        }
        cursor.bump();
        cursor.skip_trivia();
        if cursor.peek() == Some(SyntaxKind::LParen) {
            MemberStart::Method
        } else {
            MemberStart::Field
        }
    }

    fn parse_modifiers(&mut self) {
        let mut cursor = self.cursor();
        cursor.skip_trivia();
        if !matches!(cursor.peek(), Some(kind) if kind.is_modifier() || kind == SyntaxKind::At) {
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::Modifiers);
        loop {
            self.skip_trivia();
            match self.peek() {
                kind if kind.is_modifier() => {
                    self.bump();
                },
                SyntaxKind::At => {
                    self.bump();
                    self.skip_trivia();
                    if self.at(SyntaxKind::Ident) {
                        self.bump();
                    }
                    self.skip_trivia();
                    if self.at(SyntaxKind::LParen) {
                        self.consume_balanced(SyntaxKind::LParen, SyntaxKind::RParen);
                    }
                },
                _ => break,
            }
        }
        self.finish_node();
    }

    fn parse_method_decl(
        &mut self,
        has_return_type: bool,
    ) {
        self.skip_trivia();
        self.start_node(SyntaxKind::MethodDecl);
        self.parse_modifiers();
        self.skip_trivia();
        if has_return_type {
            self.parse_type_ref();
            self.skip_trivia();
        }
        if self.at(SyntaxKind::Ident) {
            self.bump();
        } else {
            self.error("expected identifier");
        }
        self.skip_trivia();
        self.parse_parameter_list();
        self.skip_trivia();
        if self.at(SyntaxKind::KwThrows) {
            self.bump();
            self.skip_trivia();
            self.parse_type_ref();
            self.skip_trivia();
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.skip_trivia();
                self.parse_type_ref();
                self.skip_trivia();
            }
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.expect(SyntaxKind::Semicolon, "expected ';' or method body");
        }
        self.finish_node();
    }

    fn parse_field_decl(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::FieldDecl);
        self.parse_modifiers();
        self.skip_trivia();
        self.parse_type_ref();
        self.parse_declarator_list();
        self.finish_node();
    }

    /// `a = expr, b, c = expr ;`, shared by fields and local declarations.
    fn parse_declarator_list(&mut self) {
        self.skip_trivia();
        if self.at(SyntaxKind::Ident) {
            self.bump();
        } else {
            self.error("expected identifier");
        }
        self.skip_trivia();
        if self.at(SyntaxKind::Equal) {
            self.bump();
            self.skip_trivia();
            self.parse_expression();
            self.skip_trivia();
        }
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.skip_trivia();
            if self.at(SyntaxKind::Ident) {
                self.bump();
            } else {
                self.error("expected identifier");
                break;
            }
            self.skip_trivia();
            if self.at(SyntaxKind::Equal) {
                self.bump();
                self.skip_trivia();
                self.parse_expression();
                self.skip_trivia();
            }
        }
        self.expect(SyntaxKind::Semicolon, "expected ';'");
    }

    fn parse_parameter_list(&mut self) {
        self.start_node(SyntaxKind::ParameterList);
        if !self.expect(SyntaxKind::LParen, "expected '('") {
            self.finish_node();
            return;
        }
        loop {
            self.skip_trivia();
            if self.is_eof()
                || self.at(SyntaxKind::RParen)
                || self.at(SyntaxKind::LBrace)
                || self.at(SyntaxKind::Semicolon)
            {
                break;
            }
            if self.at_type_start() {
                self.start_node(SyntaxKind::Parameter);
                if self.at(SyntaxKind::KwFinal) {
                    self.bump();
                    self.skip_trivia();
                }
                self.parse_type_ref();
                self.skip_trivia();
                if self.at(SyntaxKind::Ident) {
                    self.bump();
                } else {
                    self.error("expected identifier");
                }
                self.finish_node();
                self.skip_trivia();
                if self.at(SyntaxKind::Comma) {
                    self.bump();
                }
            } else {
                if !self.recovering {
                    self.error("expected parameter");
                }
                self.recovering = true;
                self.bump();
            }
        }
        self.expect(SyntaxKind::RParen, "expected ')'");
        self.finish_node();
    }

    fn at_type_start(&self) -> bool {
        matches!(self.peek(), SyntaxKind::Ident | SyntaxKind::KwFinal)
            || self.peek().is_primitive_type()
    }

    /// `int`, `Foo`, `a.b.Foo`, `List<String>`, `int[]` and combinations.
    /// Returns false without consuming anything when no type starts here.
    fn parse_type_ref(&mut self) -> bool {
        self.skip_trivia();
        if !(self.at(SyntaxKind::Ident) || self.peek().is_primitive_type()) {
            self.error("expected type");
            return false;
        }
        self.start_node(SyntaxKind::TypeRef);
        self.bump();
        loop {
            let mut cursor = self.cursor();
            cursor.skip_trivia();
            match cursor.peek() {
                Some(SyntaxKind::Dot) => {
                    cursor.bump();
                    cursor.skip_trivia();
                    if cursor.peek() != Some(SyntaxKind::Ident) {
                        break;
                    }
                    self.skip_trivia();
                    self.bump();
                    self.skip_trivia();
                    self.bump();
                },
                Some(SyntaxKind::Less) => {
                    self.skip_trivia();
                    self.consume_balanced(SyntaxKind::Less, SyntaxKind::Greater);
                },
                Some(SyntaxKind::LBracket) => {
                    cursor.bump();
                    cursor.skip_trivia();
                    if cursor.peek() != Some(SyntaxKind::RBracket) {
                        break;
                    }
                    self.skip_trivia();
                    self.bump();
                    self.skip_trivia();
                    self.bump();
                },
                _ => break,
            }
        }
        self.finish_node();
        true
    }

    // ── statements ──────────────────────────────────────────────────────

    fn parse_block(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::Block);
        if !self.expect(SyntaxKind::LBrace, "expected '{'") {
            self.finish_node();
            return;
        }
        loop {
            self.skip_trivia();
            if self.is_eof() || self.at(SyntaxKind::RBrace) {
                break;
            }
            self.parse_statement();
        }
        self.expect(SyntaxKind::RBrace, "expected '}'");
        self.finish_node();
    }

    fn parse_statement(&mut self) {
        self.skip_trivia();
        match self.peek() {
            SyntaxKind::LBrace => {
                self.parse_block();
            },
            SyntaxKind::KwReturn => {
                self.start_node(SyntaxKind::ReturnStmt);
                self.bump();
                self.skip_trivia();
                if !self.at(SyntaxKind::Semicolon) && !self.at(SyntaxKind::RBrace) {
                    self.parse_expression();
                    self.skip_trivia();
                }
                self.expect(SyntaxKind::Semicolon, "expected ';'");
                self.finish_node();
            },
            SyntaxKind::KwIf => {
                self.start_node(SyntaxKind::IfStmt);
                self.bump();
                self.skip_trivia();
                if self.expect(SyntaxKind::LParen, "expected '('") {
                    self.skip_trivia();
                    self.parse_expression();
                    self.skip_trivia();
                    self.expect(SyntaxKind::RParen, "expected ')'");
                }
                self.parse_statement();
                self.skip_trivia();
                if self.at(SyntaxKind::KwElse) {
                    self.bump();
                    self.parse_statement();
                }
                self.finish_node();
            },
            SyntaxKind::KwWhile => {
                self.start_node(SyntaxKind::WhileStmt);
                self.bump();
                self.skip_trivia();
                if self.expect(SyntaxKind::LParen, "expected '('") {
                    self.skip_trivia();
                    self.parse_expression();
                    self.skip_trivia();
                    self.expect(SyntaxKind::RParen, "expected ')'");
                }
                self.parse_statement();
                self.finish_node();
            },
            SyntaxKind::KwFor => {
                self.start_node(SyntaxKind::ForStmt);
                self.bump();
                self.skip_trivia();
                if self.at(SyntaxKind::LParen) {
                    // Header kept as raw tokens; locals bound here stay
                    // outside the resolver's view.
                    self.consume_balanced(SyntaxKind::LParen, SyntaxKind::RParen);
                }
                self.parse_statement();
                self.finish_node();
            },
            SyntaxKind::KwBreak => {
                self.start_node(SyntaxKind::BreakStmt);
                self.bump();
                self.skip_trivia();
                self.expect(SyntaxKind::Semicolon, "expected ';'");
                self.finish_node();
            },
            SyntaxKind::KwContinue => {
                self.start_node(SyntaxKind::ContinueStmt);
                self.bump();
                self.skip_trivia();
                self.expect(SyntaxKind::Semicolon, "expected ';'");
                self.finish_node();
            },
            SyntaxKind::KwThrow => {
                self.start_node(SyntaxKind::ThrowStmt);
                self.bump();
                self.skip_trivia();
                self.parse_expression();
                self.skip_trivia();
                self.expect(SyntaxKind::Semicolon, "expected ';'");
                self.finish_node();
            },
            SyntaxKind::KwTry => {
                self.start_node(SyntaxKind::TryStmt);
                self.bump();
                self.parse_block();
                loop {
                    self.skip_trivia();
                    if self.at(SyntaxKind::KwCatch) {
                        self.bump();
                        self.skip_trivia();
                        if self.at(SyntaxKind::LParen) {
                            self.consume_balanced(SyntaxKind::LParen, SyntaxKind::RParen);
                        }
                        self.parse_block();
                    } else if self.at(SyntaxKind::KwFinally) {
                        self.bump();
                        self.parse_block();
                        break;
                    } else {
                        break;
                    }
                }
                self.finish_node();
            },
            SyntaxKind::Semicolon => {
                self.bump();
            },
            _ => {
                if self.looks_like_declaration() {
                    self.parse_decl_stmt();
                } else {
                    self.parse_expr_stmt();
                }
            },
        }
    }

    fn looks_like_declaration(&self) -> bool {
        let mut cursor = self.cursor();
        cursor.skip_trivia();
        if cursor.peek() == Some(SyntaxKind::KwFinal) {
            cursor.bump();
            cursor.skip_trivia();
        }
        if cursor.peek() == Some(SyntaxKind::KwVar) {
            return true;
        }
        if !cursor.scan_type() {
            return false;
        }
        cursor.skip_trivia();
        cursor.peek() == Some(SyntaxKind::Ident)
    }

    fn parse_decl_stmt(&mut self) {
        self.start_node(SyntaxKind::DeclStmt);
        self.skip_trivia();
        if self.at(SyntaxKind::KwFinal) {
            self.bump();
            self.skip_trivia();
        }
        if self.at(SyntaxKind::KwVar) {
            self.bump();
        } else {
            self.parse_type_ref();
        }
        self.parse_declarator_list();
        self.finish_node();
    }

    fn parse_expr_stmt(&mut self) {
        self.start_node(SyntaxKind::ExprStmt);
        self.parse_expression();
        self.skip_trivia();
        // Recover to the statement terminator without cascading errors.
        while !self.is_eof() && !self.at(SyntaxKind::Semicolon) && !self.at(SyntaxKind::RBrace) {
            self.bump();
        }
        self.expect(SyntaxKind::Semicolon, "expected ';'");
        self.finish_node();
    }

    // ── expressions ─────────────────────────────────────────────────────

    fn parse_expression(&mut self) {
        self.parse_assignment_expression();
    }

    fn parse_assignment_expression(&mut self) {
        self.skip_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_binary_expression(0);
        self.skip_trivia();
        if self.is_assign_operator(self.peek()) {
            self.builder.start_node_at(checkpoint, SyntaxKind::AssignExpr.into());
            self.bump();
            self.skip_trivia();
            self.parse_assignment_expression();
            self.finish_node();
        } else if self.at(SyntaxKind::Question) {
            // Conditional folds into the binary shape; the resolver only
            // cares about the reference nodes inside.
            self.builder.start_node_at(checkpoint, SyntaxKind::BinaryExpr.into());
            self.bump();
            self.skip_trivia();
            self.parse_expression();
            self.skip_trivia();
            if self.at(SyntaxKind::Colon) {
                self.bump();
                self.skip_trivia();
                self.parse_expression();
            }
            self.finish_node();
        }
    }

    fn parse_binary_expression(
        &mut self,
        min_prec: u8,
    ) {
        self.skip_trivia();
        let checkpoint = self.builder.checkpoint();
        self.parse_unary_expression();
        loop {
            self.skip_trivia();
            let Some(prec) = self.binary_precedence(self.peek()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.builder.start_node_at(checkpoint, SyntaxKind::BinaryExpr.into());
            self.bump();
            self.skip_trivia();
            self.parse_binary_expression(prec + 1);
            self.finish_node();
        }
    }

    fn parse_unary_expression(&mut self) {
        self.skip_trivia();
        if matches!(
            self.peek(),
            SyntaxKind::Plus
                | SyntaxKind::Minus
                | SyntaxKind::Exclaim
                | SyntaxKind::Tilde
                | SyntaxKind::PlusPlus
                | SyntaxKind::MinusMinus
        ) {
            self.start_node(SyntaxKind::UnaryExpr);
            self.bump();
            self.parse_unary_expression();
            self.finish_node();
            return;
        }
        self.parse_postfix_expression();
    }

    fn parse_postfix_expression(&mut self) {
        let checkpoint = self.builder.checkpoint();
        self.parse_primary_expression();
        loop {
            self.skip_trivia();
            match self.peek() {
                SyntaxKind::LParen => {
                    self.builder.start_node_at(checkpoint, SyntaxKind::CallExpr.into());
                    self.parse_arg_list();
                    self.finish_node();
                },
                SyntaxKind::LBracket => {
                    self.builder.start_node_at(checkpoint, SyntaxKind::IndexExpr.into());
                    self.consume_balanced(SyntaxKind::LBracket, SyntaxKind::RBracket);
                    self.finish_node();
                },
                SyntaxKind::Dot | SyntaxKind::DoubleColon => {
                    self.builder.start_node_at(checkpoint, SyntaxKind::MemberExpr.into());
                    self.bump();
                    self.skip_trivia();
                    if self.at(SyntaxKind::Ident) {
                        self.bump();
                    } else {
                        self.error("expected identifier");
                    }
                    self.finish_node();
                },
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.builder.start_node_at(checkpoint, SyntaxKind::PostfixExpr.into());
                    self.bump();
                    self.finish_node();
                },
                _ => break,
            }
        }
    }

    fn parse_primary_expression(&mut self) {
        self.skip_trivia();
        match self.peek() {
            SyntaxKind::Integer
            | SyntaxKind::Float
            | SyntaxKind::String
            | SyntaxKind::Char
            | SyntaxKind::KwTrue
            | SyntaxKind::KwFalse
            | SyntaxKind::KwNull => {
                self.start_node(SyntaxKind::LiteralExpr);
                self.bump();
                self.finish_node();
            },
            SyntaxKind::Ident => {
                self.start_node(SyntaxKind::NameRef);
                self.bump();
                self.finish_node();
            },
            SyntaxKind::KwThis => {
                self.start_node(SyntaxKind::ThisExpr);
                self.bump();
                self.finish_node();
            },
            SyntaxKind::KwSuper => {
                self.start_node(SyntaxKind::SuperExpr);
                self.bump();
                self.finish_node();
            },
            SyntaxKind::KwNew => {
                self.start_node(SyntaxKind::NewExpr);
                self.bump();
                self.skip_trivia();
                self.parse_type_ref();
                self.skip_trivia();
                if self.at(SyntaxKind::LParen) {
                    self.parse_arg_list();
                } else {
                    while self.at(SyntaxKind::LBracket) {
                        self.consume_balanced(SyntaxKind::LBracket, SyntaxKind::RBracket);
                        self.skip_trivia();
                    }
                    if self.at(SyntaxKind::LBrace) {
                        self.consume_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace);
                    }
                }
                self.finish_node();
            },
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::ParenExpr);
                self.bump();
                self.skip_trivia();
                self.parse_expression();
                self.skip_trivia();
                self.expect(SyntaxKind::RParen, "expected ')'");
                self.finish_node();
            },
            _ => {
                // Leave the token in place; statement-level recovery owns it.
                self.error("expected expression");
            },
        }
    }

    fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ArgList);
        self.bump();
        loop {
            self.skip_trivia();
            if self.is_eof() || self.at(SyntaxKind::RParen) {
                break;
            }
            let before = self.pos;
            self.parse_expression();
            self.skip_trivia();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            if self.at(SyntaxKind::RParen) {
                break;
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(SyntaxKind::RParen, "expected ')'");
        self.finish_node();
    }

    fn binary_precedence(
        &self,
        kind: SyntaxKind,
    ) -> Option<u8> {
        let prec = match kind {
            SyntaxKind::OrOr => 1,
            SyntaxKind::AndAnd => 2,
            SyntaxKind::Pipe => 3,
            SyntaxKind::Caret => 4,
            SyntaxKind::Amp => 5,
            SyntaxKind::EqualEqual | SyntaxKind::NotEqual => 6,
            SyntaxKind::Less
            | SyntaxKind::Greater
            | SyntaxKind::LessEqual
            | SyntaxKind::GreaterEqual
            | SyntaxKind::KwInstanceof => 7,
            SyntaxKind::LeftShift | SyntaxKind::RightShift | SyntaxKind::URightShift => 8,
            SyntaxKind::Plus | SyntaxKind::Minus => 9,
            SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => 10,
            _ => return None,
        };
        Some(prec)
    }

    fn is_assign_operator(
        &self,
        kind: SyntaxKind,
    ) -> bool {
        matches!(
            kind,
            SyntaxKind::Equal
                | SyntaxKind::PlusEqual
                | SyntaxKind::MinusEqual
                | SyntaxKind::StarEqual
                | SyntaxKind::SlashEqual
                | SyntaxKind::PercentEqual
                | SyntaxKind::AmpEqual
                | SyntaxKind::PipeEqual
                | SyntaxKind::CaretEqual
                | SyntaxKind::LeftShiftEqual
                | SyntaxKind::RightShiftEqual
                | SyntaxKind::URightShiftEqual
        )
    }

    // ── machinery ───────────────────────────────────────────────────────

    fn start_node(
        &mut self,
        kind: SyntaxKind,
    ) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Consume from `open` to its matching `close`, tolerating nesting.
    /// Angle brackets get shift-token credit (`>>` closes two levels) and
    /// bail out at statement boundaries so an unclosed `<` cannot swallow
    /// the rest of the file.
    fn consume_balanced(
        &mut self,
        open: SyntaxKind,
        close: SyntaxKind,
    ) {
        let mut depth: i32 = 0;
        while !self.is_eof() {
            let kind = self.peek();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
            } else if open == SyntaxKind::Less {
                match kind {
                    SyntaxKind::RightShift => depth -= 2,
                    SyntaxKind::URightShift => depth -= 3,
                    SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace => {
                        self.error("expected '>'");
                        return;
                    },
                    _ => {},
                }
            }
            self.bump();
            if depth <= 0 {
                return;
            }
        }
        match close {
            SyntaxKind::RParen => self.error("expected ')'"),
            SyntaxKind::RBracket => self.error("expected ']'"),
            SyntaxKind::RBrace => self.error("expected '}'"),
            _ => self.error("expected '>'"),
        }
    }

    fn skip_trivia(&mut self) {
        while !self.is_eof() {
            match self.peek() {
                SyntaxKind::Whitespace | SyntaxKind::Comment => {
                    self.bump();
                },
                _ => break,
            }
        }
    }

    fn peek(&self) -> SyntaxKind {
        if self.is_eof() {
            return SyntaxKind::Error;
        }
        self.tokens[self.pos].0
    }

    fn at(
        &self,
        kind: SyntaxKind,
    ) -> bool {
        self.peek() == kind
    }

    fn bump(&mut self) {
        if !self.is_eof() {
            let (kind, text) = self.tokens[self.pos];
            self.builder.token(kind.into(), text);
            self.pos += 1;
            self.offset += text.len();
        }
    }

    fn expect(
        &mut self,
        kind: SyntaxKind,
        message: &str,
    ) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error(message);
            false
        }
    }

    /// Record an error at the next non-trivia token without consuming it.
    /// Repeated reports against the same offset collapse into one.
    fn error(
        &mut self,
        message: impl Into<String>,
    ) {
        let (start, end) = self.next_non_trivia_span();
        if let Some(last) = self.errors.last()
            && last.start == start
        {
            return;
        }
        self.errors.push(ParseError {
            start,
            end,
            message: message.into(),
        });
    }

    fn next_non_trivia_span(&self) -> (usize, usize) {
        let mut offset = self.offset;
        for (kind, text) in &self.tokens[self.pos..] {
            if kind.is_trivia() {
                offset += text.len();
                continue;
            }
            return (offset, offset + text.len());
        }
        (self.text_len, self.text_len)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn cursor(&self) -> TokenCursor<'_, 'a> {
        TokenCursor {
            tokens: &self.tokens,
            idx: self.pos,
        }
    }
}

enum MemberStart {
    Nested,
    Constructor,
    Method,
    Field,
    Stray,
}

/// Pure lookahead over the token buffer; never feeds the tree builder.
#[derive(Clone)]
struct TokenCursor<'p, 'a> {
    tokens: &'p [(SyntaxKind, &'a str)],
    idx: usize,
}

impl TokenCursor<'_, '_> {
    fn peek(&self) -> Option<SyntaxKind> {
        self.tokens.get(self.idx).map(|(kind, _)| *kind)
    }

    fn bump(&mut self) {
        self.idx += 1;
    }

    fn skip_trivia(&mut self) {
        while let Some((kind, _)) = self.tokens.get(self.idx) {
            if kind.is_trivia() {
                self.idx += 1;
            } else {
                break;
            }
        }
    }

    fn skip_modifiers(&mut self) {
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(kind) if kind.is_modifier() => {
                    self.bump();
                },
                Some(SyntaxKind::At) => {
                    self.bump();
                    self.skip_trivia();
                    if self.peek() == Some(SyntaxKind::Ident) {
                        self.bump();
                    }
                    self.skip_trivia();
                    if self.peek() == Some(SyntaxKind::LParen) {
                        self.skip_balanced(SyntaxKind::LParen, SyntaxKind::RParen);
                    }
                },
                _ => break,
            }
        }
    }

    /// Advance over one type-shaped token run. Returns false (position
    /// unspecified) when the tokens do not form a type.
    fn scan_type(&mut self) -> bool {
        self.skip_trivia();
        match self.peek() {
            Some(SyntaxKind::Ident) => {
                self.bump();
            },
            Some(kind) if kind.is_primitive_type() => {
                self.bump();
            },
            _ => return false,
        }
        loop {
            let mut ahead = self.clone();
            ahead.skip_trivia();
            match ahead.peek() {
                Some(SyntaxKind::Dot) => {
                    ahead.bump();
                    ahead.skip_trivia();
                    if ahead.peek() != Some(SyntaxKind::Ident) {
                        return true;
                    }
                    ahead.bump();
                    *self = ahead;
                },
                Some(SyntaxKind::Less) => {
                    if !ahead.skip_balanced(SyntaxKind::Less, SyntaxKind::Greater) {
                        return false;
                    }
                    *self = ahead;
                },
                Some(SyntaxKind::LBracket) => {
                    ahead.bump();
                    ahead.skip_trivia();
                    if ahead.peek() != Some(SyntaxKind::RBracket) {
                        return true;
                    }
                    ahead.bump();
                    *self = ahead;
                },
                _ => return true,
            }
        }
    }

    fn skip_balanced(
        &mut self,
        open: SyntaxKind,
        close: SyntaxKind,
    ) -> bool {
        let mut depth: i32 = 0;
        while let Some(kind) = self.peek() {
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
            } else if open == SyntaxKind::Less {
                match kind {
                    SyntaxKind::RightShift => depth -= 2,
                    SyntaxKind::URightShift => depth -= 3,
                    SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace => {
                        return false;
                    },
                    _ => {},
                }
            }
            self.bump();
            if depth <= 0 {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/cst_parser_tests.rs"]
mod tests;
