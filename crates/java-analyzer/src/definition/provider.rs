use std::sync::{Arc, Mutex};

use rowan::TextRange;
use tracing::debug;

use crate::sema::symbol::SymbolRef;
use crate::session::{Phase, PhaseHook, UnitView};
use crate::source::SourceId;
use crate::syntax::ast::{AstNode, DeclStmt, FieldDecl, MethodDecl, Parameter, TypeDecl};
use crate::syntax::cst::SyntaxToken;
use crate::syntax::helpers;
use crate::syntax::kind::SyntaxKind;

/// Replays the resolutions recorded during attribution for the reference
/// under the cursor. Overloaded targets all come back; a declaration name
/// locates itself.
pub struct DefinitionVisitor {
    target: SourceId,
    offset: usize,
    results: Arc<Mutex<Vec<SymbolRef>>>,
}

impl DefinitionVisitor {
    pub fn new(
        target: SourceId,
        offset: usize,
    ) -> (Self, Arc<Mutex<Vec<SymbolRef>>>) {
        let results = Arc::new(Mutex::new(Vec::new()));
        let visitor = Self {
            target,
            offset,
            results: Arc::clone(&results),
        };
        (visitor, results)
    }
}

impl PhaseHook for DefinitionVisitor {
    fn phase(&self) -> Phase {
        Phase::Analyze
    }

    fn visit(
        &mut self,
        unit: &UnitView<'_>,
    ) {
        if *unit.source != self.target {
            return;
        }
        let locations = locate(unit, self.offset);
        debug!(count = locations.len(), "definition targets");
        if let Ok(mut results) = self.results.lock() {
            *results = locations;
        }
    }
}

fn locate(
    unit: &UnitView<'_>,
    offset: usize,
) -> Vec<SymbolRef> {
    let root = unit.tree.root();
    let Some(token) = helpers::token_at_offset(&root, offset) else {
        return Vec::new();
    };
    if token.kind() != SyntaxKind::Ident {
        return Vec::new();
    }
    let range = token.text_range();
    if let Some(resolutions) = unit.resolutions
        && let Some(refs) = resolutions.get(range)
    {
        return refs.to_vec();
    }
    self_declaration(unit, &token)
}

/// A cursor on a declaration's own name jumps to that declaration.
fn self_declaration(
    unit: &UnitView<'_>,
    token: &SyntaxToken,
) -> Vec<SymbolRef> {
    let range = token.text_range();
    let Some(parent) = token.parent() else {
        return Vec::new();
    };
    let is_decl_name = match parent.kind() {
        SyntaxKind::ClassDecl | SyntaxKind::InterfaceDecl | SyntaxKind::EnumDecl => {
            TypeDecl::cast(parent)
                .and_then(|decl| decl.name_token())
                .is_some_and(|name| name.text_range() == range)
        },
        SyntaxKind::MethodDecl => MethodDecl::cast(parent)
            .and_then(|decl| decl.name_token())
            .is_some_and(|name| name.text_range() == range),
        SyntaxKind::FieldDecl => FieldDecl::cast(parent)
            .map(|decl| names_contain(decl.name_tokens(), range))
            .unwrap_or(false),
        SyntaxKind::DeclStmt => DeclStmt::cast(parent)
            .map(|decl| names_contain(decl.name_tokens(), range))
            .unwrap_or(false),
        SyntaxKind::Parameter => Parameter::cast(parent)
            .and_then(|parameter| parameter.name_token())
            .is_some_and(|name| name.text_range() == range),
        _ => false,
    };
    if is_decl_name {
        vec![SymbolRef {
            target: unit.source.clone(),
            name_range: range,
        }]
    } else {
        Vec::new()
    }
}

fn names_contain(
    tokens: Vec<SyntaxToken>,
    range: TextRange,
) -> bool {
    tokens.iter().any(|token| token.text_range() == range)
}
