use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rowan::{TextRange, TextSize};
use tracing::debug;

use crate::completion::context::{self, CursorContext};
use crate::protocol::{CandidateKind, CompletionCandidate};
use crate::sema::builtins;
use crate::sema::symbol::{ClassSymbol, MemberKind, chain_classes};
use crate::session::{Phase, PhaseHook, UnitView};
use crate::source::SourceId;
use crate::syntax::ast::{AstNode, Block, DeclStmt, MethodDecl, Root, Stmt};
use crate::syntax::helpers;

/// Collects the symbols visible at a cursor, filtered by the partial
/// identifier under it. Registered for the analyze phase; reads the
/// resolved receiver types recorded during attribution.
pub struct CompletionVisitor {
    target: SourceId,
    offset: usize,
    results: Arc<Mutex<Vec<CompletionCandidate>>>,
}

impl CompletionVisitor {
    pub fn new(
        target: SourceId,
        offset: usize,
    ) -> (Self, Arc<Mutex<Vec<CompletionCandidate>>>) {
        let results = Arc::new(Mutex::new(Vec::new()));
        let visitor = Self {
            target,
            offset,
            results: Arc::clone(&results),
        };
        (visitor, results)
    }
}

impl PhaseHook for CompletionVisitor {
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
        let candidates = collect_candidates(unit, self.offset);
        debug!(count = candidates.len(), "completion candidates");
        if let Ok(mut results) = self.results.lock() {
            *results = candidates;
        }
    }
}

fn collect_candidates(
    unit: &UnitView<'_>,
    offset: usize,
) -> Vec<CompletionCandidate> {
    let text: &str = unit.tree.source();
    let root = unit.tree.root();
    match context::detect_context(&root, text, offset) {
        CursorContext::Member {
            receiver_range,
            prefix,
        } => member_candidates(unit, receiver_range, &prefix),
        CursorContext::Name {
            prefix,
        } => visible_candidates(unit, offset, &prefix),
    }
}

/// Members of the receiver's class chain. An unresolvable receiver type
/// yields nothing rather than noise.
fn member_candidates(
    unit: &UnitView<'_>,
    receiver_range: TextRange,
    prefix: &str,
) -> Vec<CompletionCandidate> {
    let Some(resolutions) = unit.resolutions else {
        return Vec::new();
    };
    let Some(qualified) = resolutions.type_at(receiver_range) else {
        return Vec::new();
    };
    let mut set = CandidateSet::new(prefix);
    for class in chain_classes(unit.table, qualified) {
        for member in &class.members {
            if member.kind == MemberKind::Constructor {
                continue;
            }
            set.add(&member.name, member_kind(member.kind));
        }
    }
    set.into_candidates()
}

/// Everything visible at the cursor, innermost scope first: locals,
/// parameters, the enclosing class chain's members, imported and
/// same-package classes, then the implicit core types.
fn visible_candidates(
    unit: &UnitView<'_>,
    offset: usize,
    prefix: &str,
) -> Vec<CompletionCandidate> {
    let root_node = unit.tree.root();
    let mut set = CandidateSet::new(prefix);
    let anchor = helpers::token_at_offset(&root_node, offset).and_then(|token| token.parent());

    if let Some(anchor) = &anchor {
        let mut current = Some(anchor.clone());
        while let Some(node) = current {
            if let Some(block) = Block::cast(node.clone()) {
                for stmt in block.statements() {
                    let Stmt::Decl(stmt_node) = stmt else {
                        continue;
                    };
                    if usize::from(stmt_node.text_range().start()) >= offset {
                        break;
                    }
                    let Some(decl) = DeclStmt::cast(stmt_node) else {
                        continue;
                    };
                    for (name_token, _) in decl.declarators() {
                        set.add(name_token.text(), CandidateKind::Local);
                    }
                }
            }
            current = node.parent();
        }

        if let Some(method) = helpers::enclosing::<MethodDecl>(anchor) {
            for parameter in method.parameters() {
                if let Some(name_token) = parameter.name_token() {
                    set.add(name_token.text(), CandidateKind::Parameter);
                }
            }
        }
    }

    if let Some(class) = enclosing_class_symbol(unit, offset) {
        for level in chain_classes(unit.table, &class.qualified_name) {
            for member in &level.members {
                if member.kind == MemberKind::Constructor {
                    continue;
                }
                set.add(&member.name, member_kind(member.kind));
            }
        }
    }

    let mut package = String::new();
    if let Some(root) = Root::cast(root_node) {
        if let Some(name) = root.package_name() {
            package = name;
        }
        for import in root.imports() {
            if import.is_wildcard() {
                if let Some(target) = import.qualified_target() {
                    for class in unit.table.in_package(&target) {
                        set.add(&class.simple_name, CandidateKind::Class);
                    }
                }
            } else if let Some(name) = import.imported_name() {
                set.add(&name, CandidateKind::Class);
            }
        }
    }
    for class in unit.table.in_package(&package) {
        set.add(&class.simple_name, CandidateKind::Class);
    }

    for name in builtins::implicit_type_names() {
        set.add(name, CandidateKind::Class);
    }

    set.into_candidates()
}

/// The innermost class declaration spanning the cursor.
fn enclosing_class_symbol<'a>(
    unit: &'a UnitView<'_>,
    offset: usize,
) -> Option<&'a ClassSymbol> {
    let position = TextSize::from(offset as u32);
    unit.table
        .classes()
        .filter(|class| class.origin == *unit.source && class.span.contains(position))
        .min_by_key(|class| class.span.len())
}

fn member_kind(kind: MemberKind) -> CandidateKind {
    match kind {
        MemberKind::Field => CandidateKind::Field,
        MemberKind::Method | MemberKind::Constructor => CandidateKind::Method,
    }
}

/// Prefix-filtered, first-writer-wins accumulator. Inner scopes are fed
/// first, so shadowing falls out of insertion order.
struct CandidateSet<'a> {
    prefix: &'a str,
    seen: HashSet<String>,
    candidates: Vec<CompletionCandidate>,
}

impl<'a> CandidateSet<'a> {
    fn new(prefix: &'a str) -> Self {
        Self {
            prefix,
            seen: HashSet::new(),
            candidates: Vec::new(),
        }
    }

    fn add(
        &mut self,
        name: &str,
        kind: CandidateKind,
    ) {
        if name.is_empty() || !name.starts_with(self.prefix) {
            return;
        }
        if !self.seen.insert(name.to_string()) {
            return;
        }
        self.candidates.push(CompletionCandidate {
            name: name.to_string(),
            kind,
        });
    }

    fn into_candidates(self) -> Vec<CompletionCandidate> {
        self.candidates
    }
}
