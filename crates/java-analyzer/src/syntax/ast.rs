use crate::syntax::cst::{SyntaxNode, SyntaxToken};
use crate::syntax::kind::SyntaxKind;

pub trait AstNode: Sized {
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

fn first_ident_token(syntax: &SyntaxNode) -> Option<SyntaxToken> {
    syntax
        .children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == SyntaxKind::Ident)
}

fn direct_ident_tokens(syntax: &SyntaxNode) -> Vec<SyntaxToken> {
    syntax
        .children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| token.kind() == SyntaxKind::Ident)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Root {
    syntax: SyntaxNode,
}

impl AstNode for Root {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::Root {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Root {
    pub fn package_decl(&self) -> Option<PackageDecl> {
        self.syntax.children().find_map(PackageDecl::cast)
    }

    pub fn package_name(&self) -> Option<String> {
        self.package_decl()
            .and_then(|decl| decl.name())
            .map(|name| name.text())
    }

    pub fn imports(&self) -> impl Iterator<Item = ImportDecl> {
        self.syntax.children().filter_map(ImportDecl::cast)
    }

    pub fn type_decls(&self) -> impl Iterator<Item = TypeDecl> {
        self.syntax.children().filter_map(TypeDecl::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageDecl {
    syntax: SyntaxNode,
}

impl AstNode for PackageDecl {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::PackageDecl {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl PackageDecl {
    pub fn name(&self) -> Option<QualifiedName> {
        self.syntax.children().find_map(QualifiedName::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportDecl {
    syntax: SyntaxNode,
}

impl AstNode for ImportDecl {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::ImportDecl {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl ImportDecl {
    pub fn path(&self) -> Option<QualifiedName> {
        self.syntax.children().find_map(QualifiedName::cast)
    }

    pub fn is_wildcard(&self) -> bool {
        self.path()
            .map(|path| path.text().ends_with(".*"))
            .unwrap_or(false)
    }

    /// The simple name this import binds, `None` for wildcard imports.
    pub fn imported_name(&self) -> Option<String> {
        if self.is_wildcard() {
            return None;
        }
        let path = self.path()?.text();
        path.rsplit('.').next().map(str::to_owned)
    }

    /// For `import a.b.C` this is `a.b.C`; for `import a.b.*` it is `a.b`.
    pub fn qualified_target(&self) -> Option<String> {
        let path = self.path()?.text();
        Some(path.strip_suffix(".*").unwrap_or(&path).to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    syntax: SyntaxNode,
}

impl AstNode for QualifiedName {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::QualifiedName {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl QualifiedName {
    /// The dotted path with trivia stripped.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for element in self.syntax.children_with_tokens() {
            if let Some(token) = element.into_token()
                && !token.kind().is_trivia()
            {
                text.push_str(token.text());
            }
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDecl {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
}

impl TypeDecl {
    pub fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::ClassDecl => ClassDecl::cast(syntax).map(Self::Class),
            SyntaxKind::InterfaceDecl => InterfaceDecl::cast(syntax).map(Self::Interface),
            SyntaxKind::EnumDecl => EnumDecl::cast(syntax).map(Self::Enum),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Class(decl) => decl.syntax(),
            Self::Interface(decl) => decl.syntax(),
            Self::Enum(decl) => decl.syntax(),
        }
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_ident_token(self.syntax())
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> {
        self.syntax().children().filter_map(FieldDecl::cast)
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodDecl> {
        self.syntax().children().filter_map(MethodDecl::cast)
    }

    pub fn nested_types(&self) -> impl Iterator<Item = TypeDecl> {
        self.syntax().children().filter_map(TypeDecl::cast)
    }

    /// Every type named in the `extends` and `implements` clauses. Member
    /// types live inside their own declaration nodes, so the direct
    /// `TypeRef` children are exactly the heritage clause.
    pub fn supertypes(&self) -> impl Iterator<Item = TypeRef> {
        self.syntax().children().filter_map(TypeRef::cast)
    }

    /// The type following `extends`, if any.
    pub fn superclass_type(&self) -> Option<TypeRef> {
        let mut after_extends = false;
        for element in self.syntax().children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(token) => match token.kind() {
                    SyntaxKind::KwExtends => after_extends = true,
                    SyntaxKind::KwImplements | SyntaxKind::LBrace => return None,
                    _ => {},
                },
                rowan::NodeOrToken::Node(node) => {
                    if after_extends
                        && let Some(type_ref) = TypeRef::cast(node)
                    {
                        return Some(type_ref);
                    }
                },
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassDecl {
    syntax: SyntaxNode,
}

impl AstNode for ClassDecl {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::ClassDecl {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl ClassDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_ident_token(&self.syntax)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceDecl {
    syntax: SyntaxNode,
}

impl AstNode for InterfaceDecl {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::InterfaceDecl {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl InterfaceDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_ident_token(&self.syntax)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumDecl {
    syntax: SyntaxNode,
}

impl AstNode for EnumDecl {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::EnumDecl {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl EnumDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_ident_token(&self.syntax)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    syntax: SyntaxNode,
}

impl AstNode for FieldDecl {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::FieldDecl {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl FieldDecl {
    pub fn type_ref(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    /// One token per declarator: `int a, b = 0;` yields `a` and `b`.
    pub fn name_tokens(&self) -> Vec<SyntaxToken> {
        direct_ident_tokens(&self.syntax)
    }

    pub fn initializers(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|child| Expr::cast(child.clone()).is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDecl {
    syntax: SyntaxNode,
}

impl AstNode for MethodDecl {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::MethodDecl {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl MethodDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_ident_token(&self.syntax)
    }

    pub fn return_type(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type().is_none()
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        self.syntax.children().find_map(ParameterList::cast)
    }

    pub fn parameters(&self) -> Vec<Parameter> {
        self.parameter_list()
            .map(|list| list.parameters().collect())
            .unwrap_or_default()
    }

    pub fn body(&self) -> Option<Block> {
        self.syntax.children().find_map(Block::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterList {
    syntax: SyntaxNode,
}

impl AstNode for ParameterList {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::ParameterList {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> {
        self.syntax.children().filter_map(Parameter::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    syntax: SyntaxNode,
}

impl AstNode for Parameter {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::Parameter {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Parameter {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_ident_token(&self.syntax)
    }

    pub fn type_ref(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    syntax: SyntaxNode,
}

impl AstNode for TypeRef {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::TypeRef {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl TypeRef {
    /// The dotted name before any generic arguments or array brackets,
    /// e.g. `List` for `List<String>[]` and `a.b.Foo` for `a.b.Foo`.
    pub fn base_name(&self) -> String {
        let mut name = String::new();
        for element in self.syntax.children_with_tokens() {
            let Some(token) = element.into_token() else {
                break;
            };
            match token.kind() {
                SyntaxKind::Whitespace | SyntaxKind::Comment => {},
                SyntaxKind::Ident => name.push_str(token.text()),
                SyntaxKind::Dot => name.push('.'),
                kind if kind.is_primitive_type() => name.push_str(token.text()),
                _ => break,
            }
        }
        name
    }

    /// The token naming the referenced type, ignoring any package prefix.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        let mut last = None;
        for element in self.syntax.children_with_tokens() {
            let Some(token) = element.into_token() else {
                break;
            };
            match token.kind() {
                SyntaxKind::Whitespace | SyntaxKind::Comment | SyntaxKind::Dot => {},
                SyntaxKind::Ident => last = Some(token),
                kind if kind.is_primitive_type() => return None,
                _ => break,
            }
        }
        last
    }

    pub fn is_primitive(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .any(|token| token.kind().is_primitive_type())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    syntax: SyntaxNode,
}

impl AstNode for Block {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::Block {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclStmt {
    syntax: SyntaxNode,
}

impl AstNode for DeclStmt {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::DeclStmt {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl DeclStmt {
    /// `None` for `var` declarations.
    pub fn type_ref(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn name_tokens(&self) -> Vec<SyntaxToken> {
        direct_ident_tokens(&self.syntax)
    }

    pub fn initializers(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|child| Expr::cast(child.clone()).is_some())
    }

    /// Declarators paired with whether an initializer follows them.
    pub fn declarators(&self) -> Vec<(SyntaxToken, bool)> {
        let mut out = Vec::new();
        let mut pending: Option<SyntaxToken> = None;
        for element in self.syntax.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(token) => match token.kind() {
                    SyntaxKind::Ident => {
                        if let Some(name) = pending.take() {
                            out.push((name, false));
                        }
                        pending = Some(token);
                    },
                    SyntaxKind::Equal => {
                        if let Some(name) = pending.take() {
                            out.push((name, true));
                        }
                    },
                    _ => {},
                },
                rowan::NodeOrToken::Node(_) => {},
            }
        }
        if let Some(name) = pending.take() {
            out.push((name, false));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameRef {
    syntax: SyntaxNode,
}

impl AstNode for NameRef {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::NameRef {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl NameRef {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        first_ident_token(&self.syntax)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberExpr {
    syntax: SyntaxNode,
}

impl AstNode for MemberExpr {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::MemberExpr {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl MemberExpr {
    /// The expression before the dot.
    pub fn receiver(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|child| Expr::cast(child.clone()).is_some())
    }

    /// The member name after the dot; receiver names live in child nodes,
    /// so the only direct identifier token is the member itself.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_ident_token(&self.syntax)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallExpr {
    syntax: SyntaxNode,
}

impl AstNode for CallExpr {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::CallExpr {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl CallExpr {
    pub fn callee(&self) -> Option<SyntaxNode> {
        self.syntax
            .children()
            .find(|child| child.kind() != SyntaxKind::ArgList)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        self.syntax.children().find_map(ArgList::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgList {
    syntax: SyntaxNode,
}

impl AstNode for ArgList {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::ArgList {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = SyntaxNode> {
        self.syntax
            .children()
            .filter(|child| Expr::cast(child.clone()).is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewExpr {
    syntax: SyntaxNode,
}

impl AstNode for NewExpr {
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if syntax.kind() == SyntaxKind::NewExpr {
            Some(Self { syntax })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl NewExpr {
    pub fn type_ref(&self) -> Option<TypeRef> {
        self.syntax.children().find_map(TypeRef::cast)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        self.syntax.children().find_map(ArgList::cast)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Assign(SyntaxNode),
    Binary(SyntaxNode),
    Unary(SyntaxNode),
    Postfix(SyntaxNode),
    Member(SyntaxNode),
    Index(SyntaxNode),
    Call(SyntaxNode),
    New(SyntaxNode),
    Paren(SyntaxNode),
    Literal(SyntaxNode),
    Name(SyntaxNode),
    This(SyntaxNode),
    Super(SyntaxNode),
}

impl Expr {
    pub fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::AssignExpr => Some(Self::Assign(syntax)),
            SyntaxKind::BinaryExpr => Some(Self::Binary(syntax)),
            SyntaxKind::UnaryExpr => Some(Self::Unary(syntax)),
            SyntaxKind::PostfixExpr => Some(Self::Postfix(syntax)),
            SyntaxKind::MemberExpr => Some(Self::Member(syntax)),
            SyntaxKind::IndexExpr => Some(Self::Index(syntax)),
            SyntaxKind::CallExpr => Some(Self::Call(syntax)),
            SyntaxKind::NewExpr => Some(Self::New(syntax)),
            SyntaxKind::ParenExpr => Some(Self::Paren(syntax)),
            SyntaxKind::LiteralExpr => Some(Self::Literal(syntax)),
            SyntaxKind::NameRef => Some(Self::Name(syntax)),
            SyntaxKind::ThisExpr => Some(Self::This(syntax)),
            SyntaxKind::SuperExpr => Some(Self::Super(syntax)),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Assign(syntax)
            | Self::Binary(syntax)
            | Self::Unary(syntax)
            | Self::Postfix(syntax)
            | Self::Member(syntax)
            | Self::Index(syntax)
            | Self::Call(syntax)
            | Self::New(syntax)
            | Self::Paren(syntax)
            | Self::Literal(syntax)
            | Self::Name(syntax)
            | Self::This(syntax)
            | Self::Super(syntax) => syntax,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Return(SyntaxNode),
    If(SyntaxNode),
    While(SyntaxNode),
    For(SyntaxNode),
    Break(SyntaxNode),
    Continue(SyntaxNode),
    Throw(SyntaxNode),
    Try(SyntaxNode),
    Decl(SyntaxNode),
    Expr(SyntaxNode),
    Block(SyntaxNode),
}

impl Stmt {
    pub fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::ReturnStmt => Some(Self::Return(syntax)),
            SyntaxKind::IfStmt => Some(Self::If(syntax)),
            SyntaxKind::WhileStmt => Some(Self::While(syntax)),
            SyntaxKind::ForStmt => Some(Self::For(syntax)),
            SyntaxKind::BreakStmt => Some(Self::Break(syntax)),
            SyntaxKind::ContinueStmt => Some(Self::Continue(syntax)),
            SyntaxKind::ThrowStmt => Some(Self::Throw(syntax)),
            SyntaxKind::TryStmt => Some(Self::Try(syntax)),
            SyntaxKind::DeclStmt => Some(Self::Decl(syntax)),
            SyntaxKind::ExprStmt => Some(Self::Expr(syntax)),
            SyntaxKind::Block => Some(Self::Block(syntax)),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Return(syntax)
            | Self::If(syntax)
            | Self::While(syntax)
            | Self::For(syntax)
            | Self::Break(syntax)
            | Self::Continue(syntax)
            | Self::Throw(syntax)
            | Self::Try(syntax)
            | Self::Decl(syntax)
            | Self::Expr(syntax)
            | Self::Block(syntax) => syntax,
        }
    }
}
