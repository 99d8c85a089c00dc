//! Second pipeline phase: resolve references against everything the
//! session knows and record where each one points.
//!
//! Resolution order for a bare name: enclosing locals and parameters,
//! members of the enclosing class and its supers, then type lookup. Type
//! lookup tries the current file, explicit imports, the current package,
//! wildcard imports, the durable symbol index, the implicit core types,
//! and finally asks the loader to bring a matching source file in from
//! disk. Only when all of that fails does the name produce a diagnostic.

use rowan::TextRange;

use crate::diagnostics::RunLog;
use crate::protocol::Severity;
use crate::sema::builtins;
use crate::sema::error_at;
use crate::sema::symbol::{
    ClassTable,
    MemberSymbol,
    ResolutionMap,
    SymbolRef,
    chain_classes,
};
use crate::source::SourceId;
use crate::symbols::SymbolIndex;
use crate::syntax::SyntaxTree;
use crate::syntax::ast::{
    AstNode,
    Block,
    CallExpr,
    DeclStmt,
    Expr,
    FieldDecl,
    ImportDecl,
    MemberExpr,
    MethodDecl,
    NameRef,
    NewExpr,
    Root,
    Stmt,
    TypeDecl,
    TypeRef,
};
use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;
use crate::text_pos::LineIndex;

/// Brings referenced types into the class table on demand.
pub trait TypeLoader {
    /// Try to make a type with this simple name available, entering any
    /// newly parsed file. Returns true when the table may have grown.
    fn load_type(
        &mut self,
        name: &str,
        table: &mut ClassTable,
        log: &mut RunLog,
    ) -> bool;
}

/// Loader for contexts without source roots.
pub struct NoLoader;

impl TypeLoader for NoLoader {
    fn load_type(
        &mut self,
        _name: &str,
        _table: &mut ClassTable,
        _log: &mut RunLog,
    ) -> bool {
        false
    }
}

enum ImportBinding {
    Explicit { name: String, qualified: String },
    Wildcard { package: String },
}

/// Static type derived for an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExprType {
    /// Resolution failed; the failure site already carries a diagnostic.
    Unknown,
    /// Resolved, but members are not knowable (primitives, core types,
    /// classes promised by an import the session has not seen).
    Opaque,
    Class(String),
}

struct Local {
    name: String,
    range: TextRange,
    /// Base name as written, or a qualified name when inferred.
    type_name: Option<String>,
}

pub struct Attributor<'a> {
    source: &'a SourceId,
    index: &'a LineIndex,
    table: &'a mut ClassTable,
    symbols: &'a SymbolIndex,
    loader: &'a mut dyn TypeLoader,
    log: &'a mut RunLog,
    package: String,
    imports: Vec<ImportBinding>,
    current_class: String,
    scopes: Vec<Vec<Local>>,
    resolutions: ResolutionMap,
}

impl<'a> Attributor<'a> {
    pub fn new(
        source: &'a SourceId,
        index: &'a LineIndex,
        table: &'a mut ClassTable,
        symbols: &'a SymbolIndex,
        loader: &'a mut dyn TypeLoader,
        log: &'a mut RunLog,
    ) -> Self {
        Self {
            source,
            index,
            table,
            symbols,
            loader,
            log,
            package: String::new(),
            imports: Vec::new(),
            current_class: String::new(),
            scopes: Vec::new(),
            resolutions: ResolutionMap::new(),
        }
    }

    pub fn attribute(
        mut self,
        tree: &SyntaxTree,
    ) -> ResolutionMap {
        let Some(root) = Root::cast(tree.root()) else {
            return self.resolutions;
        };
        self.package = root.package_name().unwrap_or_default();
        for import in root.imports() {
            self.enter_import(&import);
        }
        for decl in root.type_decls() {
            self.attribute_type(&decl, None);
        }
        self.resolutions
    }

    fn enter_import(
        &mut self,
        import: &ImportDecl,
    ) {
        let Some(qualified) = import.qualified_target() else {
            return;
        };
        if import.is_wildcard() {
            self.imports.push(ImportBinding::Wildcard { package: qualified });
            return;
        }
        let Some(name) = import.imported_name() else {
            return;
        };
        // Make the imported name jumpable when the session knows its file.
        if let Some(target) = self.lookup_qualified_ref(&qualified)
            && let Some(path) = import.path()
            && let Some(token) = last_ident_token(path.syntax())
        {
            self.resolutions.record(token.text_range(), vec![target]);
        }
        self.imports.push(ImportBinding::Explicit { name, qualified });
    }

    fn attribute_type(
        &mut self,
        decl: &TypeDecl,
        outer: Option<&str>,
    ) {
        let Some(name_token) = decl.name_token() else {
            return;
        };
        let simple = name_token.text().to_string();
        let qualified = match outer {
            Some(outer) => format!("{outer}.{simple}"),
            None if self.package.is_empty() => simple,
            None => format!("{}.{simple}", self.package),
        };

        for type_ref in decl.supertypes() {
            self.resolve_type_ref(&type_ref);
        }

        let saved = std::mem::replace(&mut self.current_class, qualified.clone());
        for child in decl.syntax().children() {
            if let Some(field) = FieldDecl::cast(child.clone()) {
                if let Some(type_ref) = field.type_ref() {
                    self.resolve_type_ref(&type_ref);
                }
                self.scopes.clear();
                for init in field.initializers() {
                    self.attribute_expr(&init);
                }
            } else if let Some(method) = MethodDecl::cast(child.clone()) {
                self.attribute_method(&method);
            } else if let Some(nested) = TypeDecl::cast(child.clone()) {
                self.attribute_type(&nested, Some(&qualified));
            }
        }
        self.current_class = saved;
    }

    fn attribute_method(
        &mut self,
        method: &MethodDecl,
    ) {
        if let Some(return_type) = method.return_type() {
            self.resolve_type_ref(&return_type);
        }
        self.scopes.clear();
        let mut frame = Vec::new();
        for param in method.parameters() {
            let type_name = param.type_ref().map(|type_ref| {
                self.resolve_type_ref(&type_ref);
                type_ref.base_name()
            });
            if let Some(token) = param.name_token() {
                frame.push(Local {
                    name: token.text().to_string(),
                    range: token.text_range(),
                    type_name: type_name.clone().filter(|name| !name.is_empty()),
                });
            }
        }
        self.scopes.push(frame);
        if let Some(body) = method.body() {
            self.attribute_block(&body);
        }
        self.scopes.clear();
    }

    fn attribute_block(
        &mut self,
        block: &Block,
    ) {
        self.scopes.push(Vec::new());
        for stmt in block.statements() {
            self.attribute_stmt(&stmt);
        }
        self.scopes.pop();
    }

    fn attribute_stmt(
        &mut self,
        stmt: &Stmt,
    ) {
        match stmt {
            Stmt::Decl(node) => {
                if let Some(decl) = DeclStmt::cast(node.clone()) {
                    self.attribute_decl_stmt(&decl);
                }
            },
            Stmt::Block(node) => {
                if let Some(block) = Block::cast(node.clone()) {
                    self.attribute_block(&block);
                }
            },
            _ => self.walk_children(stmt.syntax()),
        }
    }

    fn attribute_decl_stmt(
        &mut self,
        decl: &DeclStmt,
    ) {
        match decl.type_ref() {
            Some(type_ref) => {
                self.resolve_type_ref(&type_ref);
                let base = type_ref.base_name();
                let type_name = (!base.is_empty()).then_some(base);
                // Declarators are in scope inside their own initializers;
                // use before assignment is the flow phase's problem.
                for token in decl.name_tokens() {
                    self.push_local(Local {
                        name: token.text().to_string(),
                        range: token.text_range(),
                        type_name: type_name.clone(),
                    });
                }
                for init in decl.initializers() {
                    self.attribute_expr(&init);
                }
            },
            None => {
                // `var`: the initializer decides the type.
                let mut inferred = None;
                for init in decl.initializers() {
                    let ty = self.attribute_expr(&init);
                    if inferred.is_none()
                        && let ExprType::Class(qualified) = ty
                    {
                        inferred = Some(qualified);
                    }
                }
                for token in decl.name_tokens() {
                    self.push_local(Local {
                        name: token.text().to_string(),
                        range: token.text_range(),
                        type_name: inferred.clone(),
                    });
                }
            },
        }
    }

    fn push_local(
        &mut self,
        local: Local,
    ) {
        if let Some(frame) = self.scopes.last_mut() {
            frame.push(local);
        } else {
            self.scopes.push(vec![local]);
        }
    }

    fn walk_children(
        &mut self,
        node: &SyntaxNode,
    ) {
        for child in node.children() {
            if let Some(stmt) = Stmt::cast(child.clone()) {
                self.attribute_stmt(&stmt);
            } else if Expr::cast(child.clone()).is_some() {
                self.attribute_expr(&child);
            }
        }
    }

    // ── expressions ─────────────────────────────────────────────────────

    fn attribute_expr(
        &mut self,
        node: &SyntaxNode,
    ) -> ExprType {
        let ty = self.attribute_expr_inner(node);
        if let ExprType::Class(qualified) = &ty {
            self.resolutions
                .record_type(node.text_range(), qualified.clone());
        }
        ty
    }

    fn attribute_expr_inner(
        &mut self,
        node: &SyntaxNode,
    ) -> ExprType {
        let Some(expr) = Expr::cast(node.clone()) else {
            self.walk_children(node);
            return ExprType::Opaque;
        };
        match expr {
            Expr::Name(node) => match NameRef::cast(node) {
                Some(name_ref) => self.resolve_name_ref(&name_ref),
                None => ExprType::Opaque,
            },
            Expr::This(_) => {
                if self.current_class.is_empty() {
                    ExprType::Opaque
                } else {
                    ExprType::Class(self.current_class.clone())
                }
            },
            Expr::Super(_) => self.current_superclass(),
            Expr::Literal(_) => ExprType::Opaque,
            Expr::Paren(node) => {
                let mut ty = ExprType::Opaque;
                for child in node.children() {
                    if Expr::cast(child.clone()).is_some() {
                        ty = self.attribute_expr(&child);
                    }
                }
                ty
            },
            Expr::Member(node) => match MemberExpr::cast(node) {
                Some(member) => self.attribute_member_expr(&member),
                None => ExprType::Opaque,
            },
            Expr::Call(node) => match CallExpr::cast(node) {
                Some(call) => {
                    let ty = match call.callee() {
                        Some(callee) => self.attribute_expr(&callee),
                        None => ExprType::Opaque,
                    };
                    if let Some(args) = call.arg_list() {
                        for arg in args.args() {
                            self.attribute_expr(&arg);
                        }
                    }
                    ty
                },
                None => ExprType::Opaque,
            },
            Expr::New(node) => match NewExpr::cast(node) {
                Some(new_expr) => {
                    let ty = match new_expr.type_ref() {
                        Some(type_ref) => self.resolve_type_ref(&type_ref),
                        None => ExprType::Opaque,
                    };
                    if let Some(args) = new_expr.arg_list() {
                        for arg in args.args() {
                            self.attribute_expr(&arg);
                        }
                    }
                    ty
                },
                None => ExprType::Opaque,
            },
            Expr::Assign(node) | Expr::Unary(node) | Expr::Postfix(node) => {
                let mut first = None;
                for child in node.children() {
                    if Expr::cast(child.clone()).is_some() {
                        let ty = self.attribute_expr(&child);
                        if first.is_none() {
                            first = Some(ty);
                        }
                    }
                }
                first.unwrap_or(ExprType::Opaque)
            },
            Expr::Binary(node) | Expr::Index(node) => {
                for child in node.children() {
                    if Expr::cast(child.clone()).is_some() {
                        self.attribute_expr(&child);
                    }
                }
                ExprType::Opaque
            },
        }
    }

    fn attribute_member_expr(
        &mut self,
        member: &MemberExpr,
    ) -> ExprType {
        let receiver_type = match member.receiver() {
            Some(receiver) => self.attribute_expr(&receiver),
            None => ExprType::Unknown,
        };
        let Some(token) = member.name_token() else {
            return ExprType::Opaque;
        };
        let name = token.text().to_string();
        match receiver_type {
            ExprType::Class(qualified) => {
                let found = self.lookup_member_chain(&qualified, &name);
                if found.is_empty() {
                    if self.table.get(&qualified).is_some() {
                        self.report_unresolved(&name, token.text_range());
                        ExprType::Unknown
                    } else {
                        // An import promised the class but the session has
                        // never seen its source.
                        ExprType::Opaque
                    }
                } else {
                    let ty = self.type_of_member(&found[0].1);
                    self.record_members(token.text_range(), found);
                    ty
                }
            },
            ExprType::Opaque | ExprType::Unknown => ExprType::Opaque,
        }
    }

    fn resolve_name_ref(
        &mut self,
        name_ref: &NameRef,
    ) -> ExprType {
        let Some(token) = name_ref.ident_token() else {
            return ExprType::Opaque;
        };
        let name = token.text().to_string();
        let range = token.text_range();

        // Innermost scope wins; later declarations shadow earlier ones.
        for frame in self.scopes.iter().rev() {
            if let Some(local) = frame.iter().rev().find(|local| local.name == name) {
                let target = SymbolRef {
                    target: self.source.clone(),
                    name_range: local.range,
                };
                let type_name = local.type_name.clone();
                self.resolutions.record(range, vec![target]);
                return match type_name {
                    Some(base) => self.class_of_base(&base),
                    None => ExprType::Opaque,
                };
            }
        }

        if !self.current_class.is_empty() {
            let owner = self.current_class.clone();
            let found = self.lookup_member_chain(&owner, &name);
            if !found.is_empty() {
                let ty = self.type_of_member(&found[0].1);
                self.record_members(range, found);
                return ty;
            }
        }

        if let Some((qualified, target)) = self.find_type(&name) {
            if let Some(target) = target {
                self.resolutions.record(range, vec![target]);
            }
            return ExprType::Class(qualified);
        }
        if builtins::is_implicit_type(&name) {
            return ExprType::Opaque;
        }
        if self.looks_like_package(&name) {
            return ExprType::Opaque;
        }
        if self.load(&name)
            && let Some((qualified, target)) = self.find_type(&name)
        {
            if let Some(target) = target {
                self.resolutions.record(range, vec![target]);
            }
            return ExprType::Class(qualified);
        }

        self.report_unresolved(&name, range);
        ExprType::Unknown
    }

    fn resolve_type_ref(
        &mut self,
        type_ref: &TypeRef,
    ) -> ExprType {
        if type_ref.is_primitive() {
            return ExprType::Opaque;
        }
        let base = type_ref.base_name();
        if base.is_empty() {
            return ExprType::Opaque;
        }
        let Some(token) = type_ref.name_token() else {
            return ExprType::Opaque;
        };
        let range = token.text_range();

        if base.contains('.') {
            if let Some(target) = self.lookup_qualified_ref(&base) {
                self.resolutions.record(range, vec![target]);
                return ExprType::Class(base);
            }
            self.report_unresolved(&base, range);
            return ExprType::Unknown;
        }

        if let Some((qualified, target)) = self.find_type(&base) {
            if let Some(target) = target {
                self.resolutions.record(range, vec![target]);
            }
            return ExprType::Class(qualified);
        }
        if builtins::is_implicit_type(&base) {
            return ExprType::Opaque;
        }
        if self.load(&base)
            && let Some((qualified, target)) = self.find_type(&base)
        {
            if let Some(target) = target {
                self.resolutions.record(range, vec![target]);
            }
            return ExprType::Class(qualified);
        }

        self.report_unresolved(&base, range);
        ExprType::Unknown
    }

    // ── lookup helpers ──────────────────────────────────────────────────

    /// Type lookup by simple name, without loading and without builtins.
    fn find_type(
        &self,
        name: &str,
    ) -> Option<(String, Option<SymbolRef>)> {
        // Same file first.
        if let Some(class) = self
            .table
            .by_simple_name(name)
            .into_iter()
            .find(|class| class.origin == *self.source)
        {
            return Some((
                class.qualified_name.clone(),
                Some(SymbolRef {
                    target: class.origin.clone(),
                    name_range: class.name_range,
                }),
            ));
        }
        // Explicit imports.
        for binding in &self.imports {
            if let ImportBinding::Explicit { name: bound, qualified } = binding
                && bound == name
            {
                let target = self.lookup_qualified_ref(qualified);
                return Some((qualified.clone(), target));
            }
        }
        // Current package.
        if let Some(class) = self
            .table
            .in_package(&self.package)
            .into_iter()
            .find(|class| class.simple_name == name)
        {
            return Some((
                class.qualified_name.clone(),
                Some(SymbolRef {
                    target: class.origin.clone(),
                    name_range: class.name_range,
                }),
            ));
        }
        // Wildcard imports, in declaration order.
        for binding in &self.imports {
            if let ImportBinding::Wildcard { package } = binding {
                let qualified = format!("{package}.{name}");
                if let Some(target) = self.lookup_qualified_ref(&qualified) {
                    return Some((qualified, Some(target)));
                }
            }
        }
        // Anything the durable index still holds.
        let mut rows = self.symbols.lookup(name);
        rows.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        if let Some(row) = rows.first() {
            return Some((
                row.qualified_name.clone(),
                Some(SymbolRef {
                    target: row.owner.clone(),
                    name_range: row.name_range,
                }),
            ));
        }
        None
    }

    fn lookup_qualified_ref(
        &self,
        qualified: &str,
    ) -> Option<SymbolRef> {
        if let Some(class) = self.table.get(qualified) {
            return Some(SymbolRef {
                target: class.origin.clone(),
                name_range: class.name_range,
            });
        }
        self.symbols
            .lookup_qualified(qualified)
            .first()
            .map(|row| SymbolRef {
                target: row.owner.clone(),
                name_range: row.name_range,
            })
    }

    /// Resolve a declared type name to a class, quietly. Failures become
    /// `Opaque`: the declaration site already reported anything worth
    /// reporting.
    fn class_of_base(
        &mut self,
        base: &str,
    ) -> ExprType {
        if base.contains('.') {
            return if self.table.get(base).is_some() {
                ExprType::Class(base.to_string())
            } else {
                ExprType::Opaque
            };
        }
        if is_primitive_name(base) {
            return ExprType::Opaque;
        }
        if let Some((qualified, _)) = self.find_type(base) {
            return ExprType::Class(qualified);
        }
        if builtins::is_implicit_type(base) {
            return ExprType::Opaque;
        }
        if self.load(base)
            && let Some((qualified, _)) = self.find_type(base)
        {
            return ExprType::Class(qualified);
        }
        ExprType::Opaque
    }

    fn lookup_member_chain(
        &self,
        qualified: &str,
        name: &str,
    ) -> Vec<(SourceId, MemberSymbol)> {
        for class in chain_classes(self.table, qualified) {
            let found = class.members_named(name);
            if !found.is_empty() {
                return found
                    .into_iter()
                    .map(|member| (class.origin.clone(), member.clone()))
                    .collect();
            }
        }
        Vec::new()
    }

    fn record_members(
        &mut self,
        range: TextRange,
        found: Vec<(SourceId, MemberSymbol)>,
    ) {
        let targets = found
            .into_iter()
            .map(|(target, member)| SymbolRef {
                target,
                name_range: member.name_range,
            })
            .collect();
        self.resolutions.record(range, targets);
    }

    fn type_of_member(
        &mut self,
        member: &MemberSymbol,
    ) -> ExprType {
        match &member.type_name {
            Some(base) => {
                let base = base.clone();
                self.class_of_base(&base)
            },
            None => ExprType::Opaque,
        }
    }

    fn current_superclass(&mut self) -> ExprType {
        if self.current_class.is_empty() {
            return ExprType::Opaque;
        }
        let chain = chain_classes(self.table, &self.current_class);
        match chain.get(1) {
            Some(class) => ExprType::Class(class.qualified_name.clone()),
            None => ExprType::Opaque,
        }
    }

    /// A bare name that heads a package the session has heard of is left
    /// alone; the qualified chain built on it resolves member by member
    /// or not at all.
    fn looks_like_package(
        &self,
        name: &str,
    ) -> bool {
        let prefix = format!("{name}.");
        if self.package == name || self.package.starts_with(&prefix) {
            return true;
        }
        if self
            .table
            .classes()
            .any(|class| class.package == name || class.package.starts_with(&prefix))
        {
            return true;
        }
        self.imports.iter().any(|binding| match binding {
            ImportBinding::Explicit { qualified, .. } => {
                qualified.starts_with(&prefix)
            },
            ImportBinding::Wildcard { package } => {
                package == name || package.starts_with(&prefix)
            },
        })
    }

    fn load(
        &mut self,
        name: &str,
    ) -> bool {
        self.loader
            .load_type(name, &mut *self.table, &mut *self.log)
    }

    fn report_unresolved(
        &mut self,
        name: &str,
        range: TextRange,
    ) {
        self.log.report(error_at(
            self.source,
            self.index,
            range,
            format!("cannot find symbol: {name}"),
            Severity::Error,
        ));
    }
}

fn is_primitive_name(name: &str) -> bool {
    matches!(
        name,
        "boolean" | "byte" | "char" | "double" | "float" | "int" | "long" | "short" | "void"
    )
}

fn last_ident_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::Ident)
        .last()
}
