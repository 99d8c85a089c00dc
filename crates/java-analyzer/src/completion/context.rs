use rowan::TextRange;

use crate::syntax::ast::{AstNode, MemberExpr};
use crate::syntax::cst::SyntaxNode;
use crate::syntax::helpers;
use crate::syntax::kind::SyntaxKind;

/// Describes the syntactic context at the cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CursorContext {
    /// After `receiver.` with a possibly empty partial member name. The
    /// range is the receiver expression's span; an empty range means the
    /// receiver could not be recovered.
    Member {
        receiver_range: TextRange,
        prefix: String,
    },
    /// A bare identifier prefix, possibly empty.
    Name {
        prefix: String,
    },
}

pub(crate) fn detect_context(
    root: &SyntaxNode,
    text: &str,
    offset: usize,
) -> CursorContext {
    let prefix = identifier_prefix(text, offset);
    let prefix_start = offset - prefix.len();

    let before = text.get(..prefix_start).unwrap_or("");
    if !before.ends_with('.') {
        return CursorContext::Name {
            prefix,
        };
    }
    let dot_offset = prefix_start - 1;

    if let Some(range) = receiver_at_dot(root, dot_offset) {
        return CursorContext::Member {
            receiver_range: range,
            prefix,
        };
    }
    // A dot with no recoverable receiver still means member position;
    // the empty range resolves to nothing and yields no candidates.
    CursorContext::Member {
        receiver_range: TextRange::empty((dot_offset as u32).into()),
        prefix,
    }
}

/// The receiver span of the member access whose dot sits at `dot_offset`.
fn receiver_at_dot(
    root: &SyntaxNode,
    dot_offset: usize,
) -> Option<TextRange> {
    let token = helpers::token_at_offset(root, dot_offset)?;
    let mut current = token.parent();
    while let Some(node) = current {
        if let Some(member) = MemberExpr::cast(node.clone())
            && member_dot_offset(&member) == Some(dot_offset)
        {
            return member.receiver().map(|receiver| receiver.text_range());
        }
        current = node.parent();
    }
    None
}

fn member_dot_offset(member: &MemberExpr) -> Option<usize> {
    member
        .syntax()
        .children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == SyntaxKind::Dot)
        .map(|token| token.text_range().start().into())
}

/// The partial identifier ending at `offset`, scanned backwards.
fn identifier_prefix(
    text: &str,
    offset: usize,
) -> String {
    let head = text.get(..offset).unwrap_or("");
    let start = head
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '$')
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(offset);
    head.get(start..).unwrap_or("").to_string()
}
