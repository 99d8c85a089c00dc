use super::*;

use expect_test::{Expect, expect};

use crate::syntax::cst::SyntaxNode;

fn check(
    input: &str,
    expected_tree: Expect,
) {
    let output = Parser::new(input).parse();
    let node = SyntaxNode::new_root(output.green);
    expected_tree.assert_eq(&format!("{:#?}", node));
}

fn errors_of(input: &str) -> Vec<ParseError> {
    Parser::new(input).parse().errors
}

fn parse_error(
    start: usize,
    end: usize,
    message: &str,
) -> ParseError {
    ParseError {
        start,
        end,
        message: message.to_string(),
    }
}

#[test]
fn test_empty() {
    check("", expect![[r#"
        Root@0..0
    "#]]);
}

#[test]
fn test_package_and_import() {
    check(
        "package com.app;\nimport java.util.List;\n",
        expect![[r#"
            Root@0..40
              PackageDecl@0..16
                KwPackage@0..7 "package"
                Whitespace@7..8 " "
                QualifiedName@8..15
                  Ident@8..11 "com"
                  Dot@11..12 "."
                  Ident@12..15 "app"
                Semicolon@15..16 ";"
              Whitespace@16..17 "\n"
              ImportDecl@17..39
                KwImport@17..23 "import"
                Whitespace@23..24 " "
                QualifiedName@24..38
                  Ident@24..28 "java"
                  Dot@28..29 "."
                  Ident@29..33 "util"
                  Dot@33..34 "."
                  Ident@34..38 "List"
                Semicolon@38..39 ";"
              Whitespace@39..40 "\n"
        "#]],
    );
}

#[test]
fn test_class_with_field_and_method() {
    check(
        "class A {\n    int x;\n    int plus(int y) { return x + y; }\n}\n",
        expect![[r#"
            Root@0..61
              ClassDecl@0..60
                KwClass@0..5 "class"
                Whitespace@5..6 " "
                Ident@6..7 "A"
                Whitespace@7..8 " "
                LBrace@8..9 "{"
                Whitespace@9..14 "\n    "
                FieldDecl@14..20
                  TypeRef@14..17
                    KwInt@14..17 "int"
                  Whitespace@17..18 " "
                  Ident@18..19 "x"
                  Semicolon@19..20 ";"
                Whitespace@20..25 "\n    "
                MethodDecl@25..58
                  TypeRef@25..28
                    KwInt@25..28 "int"
                  Whitespace@28..29 " "
                  Ident@29..33 "plus"
                  ParameterList@33..40
                    LParen@33..34 "("
                    Parameter@34..39
                      TypeRef@34..37
                        KwInt@34..37 "int"
                      Whitespace@37..38 " "
                      Ident@38..39 "y"
                    RParen@39..40 ")"
                  Whitespace@40..41 " "
                  Block@41..58
                    LBrace@41..42 "{"
                    Whitespace@42..43 " "
                    ReturnStmt@43..56
                      KwReturn@43..49 "return"
                      Whitespace@49..50 " "
                      BinaryExpr@50..55
                        NameRef@50..51
                          Ident@50..51 "x"
                        Whitespace@51..52 " "
                        Plus@52..53 "+"
                        Whitespace@53..54 " "
                        NameRef@54..55
                          Ident@54..55 "y"
                      Semicolon@55..56 ";"
                    Whitespace@56..57 " "
                    RBrace@57..58 "}"
                Whitespace@58..59 "\n"
                RBrace@59..60 "}"
              Whitespace@60..61 "\n"
        "#]],
    );
}

#[test]
fn test_method_call_on_this() {
    check(
        "class A { void f() { this.g(1); } }",
        expect![[r#"
            Root@0..35
              ClassDecl@0..35
                KwClass@0..5 "class"
                Whitespace@5..6 " "
                Ident@6..7 "A"
                Whitespace@7..8 " "
                LBrace@8..9 "{"
                Whitespace@9..10 " "
                MethodDecl@10..33
                  TypeRef@10..14
                    KwVoid@10..14 "void"
                  Whitespace@14..15 " "
                  Ident@15..16 "f"
                  ParameterList@16..18
                    LParen@16..17 "("
                    RParen@17..18 ")"
                  Whitespace@18..19 " "
                  Block@19..33
                    LBrace@19..20 "{"
                    Whitespace@20..21 " "
                    ExprStmt@21..31
                      CallExpr@21..30
                        MemberExpr@21..27
                          ThisExpr@21..25
                            KwThis@21..25 "this"
                          Dot@25..26 "."
                          Ident@26..27 "g"
                        ArgList@27..30
                          LParen@27..28 "("
                          LiteralExpr@28..29
                            Integer@28..29 "1"
                          RParen@29..30 ")"
                      Semicolon@30..31 ";"
                    Whitespace@31..32 " "
                    RBrace@32..33 "}"
                Whitespace@33..34 " "
                RBrace@34..35 "}"
        "#]],
    );
}

#[test]
fn test_binary_precedence() {
    check(
        "class A { int x = a + b * c; }",
        expect![[r#"
            Root@0..30
              ClassDecl@0..30
                KwClass@0..5 "class"
                Whitespace@5..6 " "
                Ident@6..7 "A"
                Whitespace@7..8 " "
                LBrace@8..9 "{"
                Whitespace@9..10 " "
                FieldDecl@10..28
                  TypeRef@10..13
                    KwInt@10..13 "int"
                  Whitespace@13..14 " "
                  Ident@14..15 "x"
                  Whitespace@15..16 " "
                  Equal@16..17 "="
                  Whitespace@17..18 " "
                  BinaryExpr@18..27
                    NameRef@18..19
                      Ident@18..19 "a"
                    Whitespace@19..20 " "
                    Plus@20..21 "+"
                    Whitespace@21..22 " "
                    BinaryExpr@22..27
                      NameRef@22..23
                        Ident@22..23 "b"
                      Whitespace@23..24 " "
                      Star@24..25 "*"
                      Whitespace@25..26 " "
                      NameRef@26..27
                        Ident@26..27 "c"
                  Semicolon@27..28 ";"
                Whitespace@28..29 " "
                RBrace@29..30 "}"
        "#]],
    );
}

#[test]
fn test_var_declaration() {
    check(
        "class A { void f() { var a = 1; } }",
        expect![[r#"
            Root@0..35
              ClassDecl@0..35
                KwClass@0..5 "class"
                Whitespace@5..6 " "
                Ident@6..7 "A"
                Whitespace@7..8 " "
                LBrace@8..9 "{"
                Whitespace@9..10 " "
                MethodDecl@10..33
                  TypeRef@10..14
                    KwVoid@10..14 "void"
                  Whitespace@14..15 " "
                  Ident@15..16 "f"
                  ParameterList@16..18
                    LParen@16..17 "("
                    RParen@17..18 ")"
                  Whitespace@18..19 " "
                  Block@19..33
                    LBrace@19..20 "{"
                    Whitespace@20..21 " "
                    DeclStmt@21..31
                      KwVar@21..24 "var"
                      Whitespace@24..25 " "
                      Ident@25..26 "a"
                      Whitespace@26..27 " "
                      Equal@27..28 "="
                      Whitespace@28..29 " "
                      LiteralExpr@29..30
                        Integer@29..30 "1"
                      Semicolon@30..31 ";"
                    Whitespace@31..32 " "
                    RBrace@32..33 "}"
                Whitespace@33..34 " "
                RBrace@34..35 "}"
        "#]],
    );
}

#[test]
fn test_interface_method_without_body() {
    check(
        "interface I { void f(); }",
        expect![[r#"
            Root@0..25
              InterfaceDecl@0..25
                KwInterface@0..9 "interface"
                Whitespace@9..10 " "
                Ident@10..11 "I"
                Whitespace@11..12 " "
                LBrace@12..13 "{"
                Whitespace@13..14 " "
                MethodDecl@14..23
                  TypeRef@14..18
                    KwVoid@14..18 "void"
                  Whitespace@18..19 " "
                  Ident@19..20 "f"
                  ParameterList@20..22
                    LParen@20..21 "("
                    RParen@21..22 ")"
                  Semicolon@22..23 ";"
                Whitespace@23..24 " "
                RBrace@24..25 "}"
        "#]],
    );
}

#[test]
fn test_enum_constants_become_fields() {
    let output = Parser::new("enum E { A, B; }").parse();
    assert!(output.errors.is_empty(), "{:?}", output.errors);

    let root = SyntaxNode::new_root(output.green);
    let constants: Vec<String> = root
        .descendants()
        .filter(|node| node.kind() == SyntaxKind::FieldDecl)
        .map(|node| node.text().to_string())
        .collect();
    assert_eq!(constants, ["A", "B"]);
}

#[test]
fn test_top_level_junk_reports_once() {
    assert_eq!(
        errors_of("int x = 5;"),
        [parse_error(0, 3, "expected class, interface, or enum")],
    );
}

#[test]
fn test_unclosed_class_body() {
    assert_eq!(errors_of("class A {"), [parse_error(9, 9, "expected '}'")]);
}

#[test]
fn test_missing_semicolon_after_field() {
    assert_eq!(errors_of("class A { int x }"), [parse_error(16, 17, "expected ';'")]);
}

#[test]
fn test_missing_supertype_collapses_followup_errors() {
    assert_eq!(errors_of("class A extends ;"), [parse_error(16, 17, "expected type")]);
}

#[test]
fn test_unclosed_type_parameters_stop_at_the_body() {
    assert_eq!(
        errors_of("class A<T {"),
        [
            parse_error(10, 11, "expected '>'"),
            parse_error(11, 11, "expected '}'"),
        ],
    );
}

#[test]
fn test_missing_initializer_expression() {
    assert_eq!(
        errors_of("class A { int x = ; }"),
        [parse_error(18, 19, "expected expression")],
    );
}

#[test]
fn test_junk_member_reports_once() {
    assert_eq!(
        errors_of("class A { 42 }"),
        [parse_error(10, 12, "expected member declaration")],
    );
}

#[test]
fn test_clean_parse_has_no_errors() {
    let source = "package p;\n\nimport java.util.List;\n\npublic class Account {\n    private int balance;\n\n    public int deposit(int amount) {\n        balance = balance + amount;\n        return balance;\n    }\n}\n";
    assert_eq!(errors_of(source), []);
}
