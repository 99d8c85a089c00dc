/// Node and token lookup utilities over the syntax tree.
use rowan::{TextSize, TokenAtOffset};

use crate::syntax::ast::{AstNode, TypeDecl};
use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;

/// The token covering `offset`. On a boundary between two tokens the
/// identifier wins, then literals, so a cursor at the end of a word still
/// refers to that word.
pub fn token_at_offset(
    root: &SyntaxNode,
    offset: usize,
) -> Option<SyntaxToken> {
    let len: u32 = root.text_range().end().into();
    let clamped = TextSize::from((offset as u32).min(len));
    pick_token(root.token_at_offset(clamped))
}

pub fn node_at_offset(
    root: &SyntaxNode,
    offset: usize,
) -> Option<SyntaxNode> {
    token_at_offset(root, offset)?.parent()
}

/// Walk ancestors until a node with the given kind is found.
pub fn find_ancestor(
    node: SyntaxNode,
    kind: SyntaxKind,
) -> Option<SyntaxNode> {
    let mut current = node;
    loop {
        if current.kind() == kind {
            return Some(current);
        }
        current = current.parent()?;
    }
}

/// The nearest enclosing node castable to `T`, the node itself included.
pub fn enclosing<T: AstNode>(node: &SyntaxNode) -> Option<T> {
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if let Some(cast) = T::cast(candidate.clone()) {
            return Some(cast);
        }
        current = candidate.parent();
    }
    None
}

/// The nearest enclosing class, interface, or enum declaration.
pub fn enclosing_type(node: &SyntaxNode) -> Option<TypeDecl> {
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if let Some(decl) = TypeDecl::cast(candidate.clone()) {
            return Some(decl);
        }
        current = candidate.parent();
    }
    None
}

fn pick_token(tokens: TokenAtOffset<SyntaxToken>) -> Option<SyntaxToken> {
    tokens.max_by_key(|token| match token.kind() {
        SyntaxKind::Ident => 2,
        SyntaxKind::Integer | SyntaxKind::Float | SyntaxKind::String | SyntaxKind::Char => 1,
        _ => 0,
    })
}

#[cfg(test)]
#[path = "../../tests/src/syntax/helpers_tests.rs"]
mod tests;
