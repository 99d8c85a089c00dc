use super::*;

use std::sync::Arc;

use crate::syntax::SyntaxTree;
use crate::syntax::ast::{FieldDecl, MethodDecl};

fn root_of(text: &str) -> SyntaxNode {
    let (tree, errors) = SyntaxTree::parse(Arc::from(text));
    assert!(errors.is_empty(), "{errors:?}");
    tree.root()
}

#[test]
fn test_token_at_offset_inside_a_token() {
    let root = root_of("class A { int xy; }");
    assert_eq!(token_at_offset(&root, 15).unwrap().text(), "xy");
    assert_eq!(token_at_offset(&root, 11).unwrap().text(), "int");
}

#[test]
fn test_identifier_wins_on_boundaries() {
    let root = root_of("class A { int xy; }");
    // Start and end of the declarator both resolve to it.
    assert_eq!(token_at_offset(&root, 14).unwrap().text(), "xy");
    assert_eq!(token_at_offset(&root, 16).unwrap().text(), "xy");
}

#[test]
fn test_literal_wins_over_punctuation() {
    let root = root_of("class A { int x = 15; }");
    assert_eq!(token_at_offset(&root, 20).unwrap().text(), "15");
}

#[test]
fn test_offset_past_the_end_clamps_to_the_last_token() {
    let root = root_of("class A { int xy; }");
    assert_eq!(token_at_offset(&root, 999).unwrap().text(), "}");
}

#[test]
fn test_node_at_offset_returns_the_covering_node() {
    let root = root_of("class A { int xy; }");
    let node = node_at_offset(&root, 15).unwrap();
    assert_eq!(node.kind(), SyntaxKind::FieldDecl);
}

#[test]
fn test_find_ancestor_by_kind() {
    let root = root_of("class A { int xy; }");
    let field = node_at_offset(&root, 15).unwrap();
    let class = find_ancestor(field.clone(), SyntaxKind::ClassDecl).unwrap();
    assert_eq!(class.kind(), SyntaxKind::ClassDecl);
    assert!(find_ancestor(field.clone(), SyntaxKind::Root).is_some());
    assert!(find_ancestor(field, SyntaxKind::MethodDecl).is_none());
}

#[test]
fn test_enclosing_casts_the_nearest_match() {
    let root = root_of("class A { int xy; }");
    let node = node_at_offset(&root, 15).unwrap();
    let field: FieldDecl = enclosing(&node).unwrap();
    assert_eq!(field.name_tokens()[0].text(), "xy");
    assert!(enclosing::<MethodDecl>(&node).is_none());
}

#[test]
fn test_enclosing_type_finds_the_declaration() {
    let root = root_of("class A { int xy; }");
    let node = node_at_offset(&root, 15).unwrap();
    let decl = enclosing_type(&node).unwrap();
    assert_eq!(decl.name_token().unwrap().text(), "A");
}
