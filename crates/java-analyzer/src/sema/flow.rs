//! Third pipeline phase: definite assignment and reachability.
//!
//! Runs only on files the earlier phases accepted without errors. Locals
//! are tracked per scope with an assigned flag; reads of fields and
//! classes fall through untouched. Branches are merged conservatively: a
//! variable is definitely assigned after an `if` only when both arms
//! assign it, and loop bodies contribute nothing.

use rowan::TextRange;

use crate::diagnostics::RunLog;
use crate::protocol::Severity;
use crate::sema::error_at;
use crate::source::SourceId;
use crate::syntax::SyntaxTree;
use crate::syntax::ast::{
    AstNode,
    Block,
    CallExpr,
    DeclStmt,
    Expr,
    MemberExpr,
    MethodDecl,
    NameRef,
    Root,
    Stmt,
    TypeDecl,
};
use crate::syntax::cst::SyntaxNode;
use crate::syntax::kind::SyntaxKind;
use crate::text_pos::LineIndex;

pub fn analyze_unit(
    source: &SourceId,
    tree: &SyntaxTree,
    index: &LineIndex,
    log: &mut RunLog,
) {
    let Some(root) = Root::cast(tree.root()) else {
        return;
    };
    for decl in root.type_decls() {
        analyze_type(source, index, &decl, log);
    }
}

fn analyze_type(
    source: &SourceId,
    index: &LineIndex,
    decl: &TypeDecl,
    log: &mut RunLog,
) {
    for method in decl.methods() {
        let mut checker = FlowChecker {
            source,
            index,
            log,
            scopes: Vec::new(),
        };
        checker.check_method(&method);
    }
    for nested in decl.nested_types() {
        analyze_type(source, index, &nested, log);
    }
}

struct LocalState {
    name: String,
    assigned: bool,
}

struct FlowChecker<'a> {
    source: &'a SourceId,
    index: &'a LineIndex,
    log: &'a mut RunLog,
    scopes: Vec<Vec<LocalState>>,
}

impl FlowChecker<'_> {
    fn check_method(
        &mut self,
        method: &MethodDecl,
    ) {
        let mut frame = Vec::new();
        for param in method.parameters() {
            if let Some(token) = param.name_token() {
                frame.push(LocalState {
                    name: token.text().to_string(),
                    assigned: true,
                });
            }
        }
        self.scopes.push(frame);
        if let Some(body) = method.body() {
            self.check_block(&body);
        }
        self.scopes.clear();
    }

    fn check_block(
        &mut self,
        block: &Block,
    ) {
        self.scopes.push(Vec::new());
        let mut terminated = false;
        let mut reported = false;
        for stmt in block.statements() {
            if terminated && !reported {
                self.report(stmt.syntax().text_range(), "unreachable statement");
                reported = true;
            }
            self.check_stmt(&stmt);
            if terminates(&stmt) {
                terminated = true;
            }
        }
        self.scopes.pop();
    }

    fn check_stmt(
        &mut self,
        stmt: &Stmt,
    ) {
        match stmt {
            Stmt::Decl(node) => {
                if let Some(decl) = DeclStmt::cast(node.clone()) {
                    self.check_decl(&decl);
                }
            },
            Stmt::Block(node) => {
                if let Some(block) = Block::cast(node.clone()) {
                    self.check_block(&block);
                }
            },
            Stmt::If(node) => self.check_if(node),
            Stmt::While(node) | Stmt::For(node) => {
                for child in node.children() {
                    if Expr::cast(child.clone()).is_some() {
                        self.check_expr(&child);
                    }
                }
                let saved = self.snapshot();
                for child in node.children() {
                    if let Some(inner) = Stmt::cast(child.clone()) {
                        self.check_stmt(&inner);
                    }
                }
                // Zero iterations are possible; nothing from the body
                // survives.
                self.restore(saved);
            },
            Stmt::Try(node) => {
                let saved = self.snapshot();
                for child in node.children() {
                    if let Some(block) = Block::cast(child.clone()) {
                        self.check_block(&block);
                        self.restore(saved.clone());
                    }
                }
            },
            Stmt::Break(_) | Stmt::Continue(_) => {},
            _ => {
                for child in stmt.syntax().children() {
                    if Expr::cast(child.clone()).is_some() {
                        self.check_expr(&child);
                    } else if let Some(inner) = Stmt::cast(child.clone()) {
                        self.check_stmt(&inner);
                    }
                }
            },
        }
    }

    fn check_decl(
        &mut self,
        decl: &DeclStmt,
    ) {
        let mut inits = decl.initializers();
        for (token, has_init) in decl.declarators() {
            let name = token.text().to_string();
            // In scope inside its own initializer, but not yet assigned.
            if let Some(frame) = self.scopes.last_mut() {
                frame.push(LocalState {
                    name: name.clone(),
                    assigned: false,
                });
            }
            if has_init {
                if let Some(init) = inits.next() {
                    self.check_expr(&init);
                }
                self.mark_assigned(&name);
            }
        }
    }

    fn check_if(
        &mut self,
        node: &SyntaxNode,
    ) {
        for child in node.children() {
            if Expr::cast(child.clone()).is_some() {
                self.check_expr(&child);
            }
        }
        let branches: Vec<Stmt> = node.children().filter_map(Stmt::cast).collect();
        let saved = self.snapshot();
        let mut outcomes = Vec::new();
        for branch in &branches {
            self.restore(saved.clone());
            self.check_stmt(branch);
            outcomes.push(self.snapshot());
        }
        if branches.len() >= 2 {
            self.restore(intersect(outcomes));
        } else {
            self.restore(saved);
        }
    }

    fn check_expr(
        &mut self,
        node: &SyntaxNode,
    ) {
        let Some(expr) = Expr::cast(node.clone()) else {
            return;
        };
        match expr {
            Expr::Name(node) => {
                if let Some(name_ref) = NameRef::cast(node)
                    && let Some(token) = name_ref.ident_token()
                {
                    self.check_read(token.text(), token.text_range());
                }
            },
            Expr::Assign(node) => self.check_assign(&node),
            Expr::Unary(node) | Expr::Postfix(node) => {
                let is_step = node.children_with_tokens().any(|element| {
                    matches!(
                        element.kind(),
                        SyntaxKind::PlusPlus | SyntaxKind::MinusMinus
                    )
                });
                let operands: Vec<SyntaxNode> = node
                    .children()
                    .filter(|child| Expr::cast(child.clone()).is_some())
                    .collect();
                for operand in &operands {
                    self.check_expr(operand);
                }
                if is_step
                    && let Some(operand) = operands.first()
                    && let Some(name) = name_of(operand)
                {
                    self.mark_assigned(&name);
                }
            },
            Expr::Member(node) => {
                if let Some(member) = MemberExpr::cast(node)
                    && let Some(receiver) = member.receiver()
                {
                    self.check_expr(&receiver);
                }
            },
            Expr::Call(node) => {
                if let Some(call) = CallExpr::cast(node) {
                    // A bare callee names a method, never a local.
                    if let Some(callee) = call.callee()
                        && callee.kind() != SyntaxKind::NameRef
                    {
                        self.check_expr(&callee);
                    }
                    if let Some(args) = call.arg_list() {
                        for arg in args.args() {
                            self.check_expr(&arg);
                        }
                    }
                }
            },
            Expr::Literal(_) | Expr::This(_) | Expr::Super(_) => {},
            Expr::Binary(node)
            | Expr::Index(node)
            | Expr::Paren(node)
            | Expr::New(node) => {
                for child in node.children() {
                    if Expr::cast(child.clone()).is_some() {
                        self.check_expr(&child);
                    }
                }
            },
        }
    }

    fn check_assign(
        &mut self,
        node: &SyntaxNode,
    ) {
        let compound = node
            .children_with_tokens()
            .any(|element| is_compound_assign(element.kind()));
        let operands: Vec<SyntaxNode> = node
            .children()
            .filter(|child| Expr::cast(child.clone()).is_some())
            .collect();
        let Some((lhs, rest)) = operands.split_first() else {
            return;
        };
        for rhs in rest {
            self.check_expr(rhs);
        }
        match name_of(lhs) {
            Some(name) => {
                if compound {
                    self.check_read(&name, lhs.text_range());
                }
                self.mark_assigned(&name);
            },
            None => self.check_expr(lhs),
        }
    }

    fn check_read(
        &mut self,
        name: &str,
        range: TextRange,
    ) {
        for frame in self.scopes.iter().rev() {
            if let Some(local) = frame.iter().rev().find(|local| local.name == name) {
                if !local.assigned {
                    self.report(
                        range,
                        &format!("variable {name} might not have been initialized"),
                    );
                }
                return;
            }
        }
    }

    fn mark_assigned(
        &mut self,
        name: &str,
    ) {
        for frame in self.scopes.iter_mut().rev() {
            if let Some(local) = frame.iter_mut().rev().find(|local| local.name == name) {
                local.assigned = true;
                return;
            }
        }
    }

    fn snapshot(&self) -> Vec<Vec<bool>> {
        self.scopes
            .iter()
            .map(|frame| frame.iter().map(|local| local.assigned).collect())
            .collect()
    }

    fn restore(
        &mut self,
        snapshot: Vec<Vec<bool>>,
    ) {
        for (frame, flags) in self.scopes.iter_mut().zip(snapshot) {
            for (local, flag) in frame.iter_mut().zip(flags) {
                local.assigned = flag;
            }
        }
    }

    fn report(
        &mut self,
        range: TextRange,
        message: &str,
    ) {
        self.log.report(error_at(
            self.source,
            self.index,
            range,
            message.to_string(),
            Severity::Error,
        ));
    }
}

/// Definitely assigned after the `if` means assigned in every arm.
fn intersect(outcomes: Vec<Vec<Vec<bool>>>) -> Vec<Vec<bool>> {
    let mut merged = outcomes.first().cloned().unwrap_or_default();
    for outcome in outcomes.iter().skip(1) {
        for (frame, other) in merged.iter_mut().zip(outcome) {
            for (flag, other_flag) in frame.iter_mut().zip(other) {
                *flag = *flag && *other_flag;
            }
        }
    }
    merged
}

fn name_of(node: &SyntaxNode) -> Option<String> {
    NameRef::cast(node.clone())?
        .ident_token()
        .map(|token| token.text().to_string())
}

fn is_compound_assign(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::PlusEqual
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

/// Whether control can never flow past this statement.
fn terminates(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(_) | Stmt::Throw(_) | Stmt::Break(_) | Stmt::Continue(_) => true,
        Stmt::Block(node) => node
            .children()
            .filter_map(Stmt::cast)
            .any(|inner| terminates(&inner)),
        Stmt::If(node) => {
            let branches: Vec<Stmt> = node.children().filter_map(Stmt::cast).collect();
            branches.len() >= 2 && branches.iter().all(terminates)
        },
        _ => false,
    }
}
