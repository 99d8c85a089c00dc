//! First pipeline phase: register every declared class and its members.

use crate::diagnostics::RunLog;
use crate::protocol::Severity;
use crate::sema::error_at;
use crate::sema::symbol::{ClassSymbol, ClassTable, MemberKind, MemberSymbol};
use crate::source::SourceId;
use crate::symbols::DeclKind;
use crate::syntax::SyntaxTree;
use crate::syntax::ast::{FieldDecl, MethodDecl, Root, TypeDecl};
use crate::syntax::ast::AstNode;
use crate::text_pos::LineIndex;

/// Walks the tree and inserts a [`ClassSymbol`] per declaration, nested
/// ones included. Returns the qualified names in declaration order.
///
/// Two live files declaring the same qualified name is a duplicate-class
/// error against the file entered second. The same path seen through both
/// origins never trips this: invalidation already purged the older rows.
pub fn enter_trees(
    source: &SourceId,
    tree: &SyntaxTree,
    index: &LineIndex,
    table: &mut ClassTable,
    log: &mut RunLog,
) -> Vec<String> {
    let Some(root) = Root::cast(tree.root()) else {
        return Vec::new();
    };
    let package = root.package_name().unwrap_or_default();
    let mut entered = Vec::new();
    for decl in root.type_decls() {
        enter_type(source, index, &package, None, &decl, table, log, &mut entered);
    }
    entered
}

fn enter_type(
    source: &SourceId,
    index: &LineIndex,
    package: &str,
    outer: Option<&str>,
    decl: &TypeDecl,
    table: &mut ClassTable,
    log: &mut RunLog,
    entered: &mut Vec<String>,
) {
    let Some(name_token) = decl.name_token() else {
        return;
    };
    let simple = name_token.text().to_string();
    let qualified = match outer {
        Some(outer) => format!("{outer}.{simple}"),
        None if package.is_empty() => simple.clone(),
        None => format!("{package}.{simple}"),
    };

    if let Some(existing) = table.get(&qualified)
        && existing.origin.path() != source.path()
    {
        log.report(error_at(
            source,
            index,
            name_token.text_range(),
            format!("duplicate class: {qualified}"),
            Severity::Error,
        ));
    }

    let kind = match decl {
        TypeDecl::Class(_) => DeclKind::Class,
        TypeDecl::Interface(_) => DeclKind::Interface,
        TypeDecl::Enum(_) => DeclKind::Enum,
    };
    let superclass = decl
        .superclass_type()
        .map(|type_ref| type_ref.base_name())
        .filter(|name| !name.is_empty());

    table.insert(ClassSymbol {
        simple_name: simple.clone(),
        qualified_name: qualified.clone(),
        package: package.to_string(),
        origin: source.clone(),
        kind,
        name_range: name_token.text_range(),
        span: decl.syntax().text_range(),
        superclass,
        members: collect_members(decl, &simple, kind == DeclKind::Enum),
    });
    entered.push(qualified.clone());

    for nested in decl.nested_types() {
        enter_type(
            source,
            index,
            package,
            Some(&qualified),
            &nested,
            table,
            log,
            entered,
        );
    }
}

/// Members in declaration order; enum constants count as fields typed by
/// the enum itself.
fn collect_members(
    decl: &TypeDecl,
    owner_simple: &str,
    owner_is_enum: bool,
) -> Vec<MemberSymbol> {
    let mut members = Vec::new();
    for child in decl.syntax().children() {
        if let Some(field) = FieldDecl::cast(child.clone()) {
            let type_name = field
                .type_ref()
                .map(|type_ref| type_ref.base_name())
                .filter(|name| !name.is_empty())
                .or_else(|| owner_is_enum.then(|| owner_simple.to_string()));
            for token in field.name_tokens() {
                members.push(MemberSymbol {
                    name: token.text().to_string(),
                    kind: MemberKind::Field,
                    name_range: token.text_range(),
                    type_name: type_name.clone(),
                    param_count: 0,
                });
            }
        } else if let Some(method) = MethodDecl::cast(child.clone()) {
            let Some(name_token) = method.name_token() else {
                continue;
            };
            let kind = if method.is_constructor() {
                MemberKind::Constructor
            } else {
                MemberKind::Method
            };
            let type_name = method
                .return_type()
                .map(|type_ref| type_ref.base_name())
                .filter(|name| !name.is_empty() && name != "void");
            members.push(MemberSymbol {
                name: name_token.text().to_string(),
                kind,
                name_range: name_token.text_range(),
                type_name,
                param_count: method.parameters().len(),
            });
        }
    }
    members
}
