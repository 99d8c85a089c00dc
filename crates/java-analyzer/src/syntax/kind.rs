use logos::Logos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    Error = 0,
    Whitespace,
    Comment,

    // Identifiers & Literals
    Ident,
    Integer,
    Float,
    String,
    Char,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    At,
    Question,
    Arrow,
    DoubleColon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Exclaim,
    Equal,
    Less,
    Greater,
    PlusPlus,
    MinusMinus,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    CaretEqual,
    AmpEqual,
    PipeEqual,
    EqualEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,
    AndAnd,
    OrOr,
    LeftShift,
    RightShift,
    URightShift,
    LeftShiftEqual,
    RightShiftEqual,
    URightShiftEqual,

    // Keywords
    KwAbstract,
    KwAssert,
    KwBoolean,
    KwBreak,
    KwByte,
    KwCase,
    KwCatch,
    KwChar,
    KwClass,
    KwConst,
    KwContinue,
    KwDefault,
    KwDo,
    KwDouble,
    KwElse,
    KwEnum,
    KwExtends,
    KwFinal,
    KwFinally,
    KwFloat,
    KwFor,
    KwGoto,
    KwIf,
    KwImplements,
    KwImport,
    KwInstanceof,
    KwInt,
    KwInterface,
    KwLong,
    KwNative,
    KwNew,
    KwPackage,
    KwPrivate,
    KwProtected,
    KwPublic,
    KwReturn,
    KwShort,
    KwStatic,
    KwStrictfp,
    KwSuper,
    KwSwitch,
    KwSynchronized,
    KwThis,
    KwThrow,
    KwThrows,
    KwTransient,
    KwTry,
    KwVar,
    KwVoid,
    KwVolatile,
    KwWhile,
    KwTrue,
    KwFalse,
    KwNull,

    // Composite Nodes (Parser output)
    Root,
    PackageDecl,
    ImportDecl,
    Modifiers,
    ClassDecl,
    InterfaceDecl,
    EnumDecl,
    FieldDecl,
    MethodDecl,
    ParameterList,
    Parameter,
    TypeRef,
    Block,
    DeclStmt,
    ExprStmt,
    ReturnStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    BreakStmt,
    ContinueStmt,
    ThrowStmt,
    TryStmt,
    NameRef,
    ThisExpr,
    SuperExpr,
    NewExpr,
    MemberExpr,
    IndexExpr,
    CallExpr,
    BinaryExpr,
    UnaryExpr,
    PostfixExpr,
    AssignExpr,
    LiteralExpr,
    ParenExpr,
    ArgList,
    QualifiedName,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Comment)
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::KwPublic
                | SyntaxKind::KwPrivate
                | SyntaxKind::KwProtected
                | SyntaxKind::KwStatic
                | SyntaxKind::KwFinal
                | SyntaxKind::KwAbstract
                | SyntaxKind::KwNative
                | SyntaxKind::KwSynchronized
                | SyntaxKind::KwTransient
                | SyntaxKind::KwVolatile
                | SyntaxKind::KwStrictfp
        )
    }

    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::KwBoolean
                | SyntaxKind::KwByte
                | SyntaxKind::KwChar
                | SyntaxKind::KwShort
                | SyntaxKind::KwInt
                | SyntaxKind::KwLong
                | SyntaxKind::KwFloat
                | SyntaxKind::KwDouble
                | SyntaxKind::KwVoid
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = ())]
pub enum TokenKind {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("@")]
    At,
    #[token("?")]
    Question,
    #[token("->")]
    Arrow,
    #[token("::")]
    DoubleColon,

    // Operators (multi-char first)
    #[token(">>>=")]
    URightShiftEqual,
    #[token(">>=")]
    RightShiftEqual,
    #[token("<<=")]
    LeftShiftEqual,
    #[token(">>>")]
    URightShift,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("^=")]
    CaretEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("<<")]
    LeftShift,
    #[token(">>")]
    RightShift,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("!")]
    Exclaim,
    #[token("=")]
    Equal,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    // Keywords
    #[token("abstract")]
    KwAbstract,
    #[token("assert")]
    KwAssert,
    #[token("boolean")]
    KwBoolean,
    #[token("break")]
    KwBreak,
    #[token("byte")]
    KwByte,
    #[token("case")]
    KwCase,
    #[token("catch")]
    KwCatch,
    #[token("char")]
    KwChar,
    #[token("class")]
    KwClass,
    #[token("const")]
    KwConst,
    #[token("continue")]
    KwContinue,
    #[token("default")]
    KwDefault,
    #[token("do")]
    KwDo,
    #[token("double")]
    KwDouble,
    #[token("else")]
    KwElse,
    #[token("enum")]
    KwEnum,
    #[token("extends")]
    KwExtends,
    #[token("final")]
    KwFinal,
    #[token("finally")]
    KwFinally,
    #[token("float")]
    KwFloat,
    #[token("for")]
    KwFor,
    #[token("goto")]
    KwGoto,
    #[token("if")]
    KwIf,
    #[token("implements")]
    KwImplements,
    #[token("import")]
    KwImport,
    #[token("instanceof")]
    KwInstanceof,
    #[token("int")]
    KwInt,
    #[token("interface")]
    KwInterface,
    #[token("long")]
    KwLong,
    #[token("native")]
    KwNative,
    #[token("new")]
    KwNew,
    #[token("package")]
    KwPackage,
    #[token("private")]
    KwPrivate,
    #[token("protected")]
    KwProtected,
    #[token("public")]
    KwPublic,
    #[token("return")]
    KwReturn,
    #[token("short")]
    KwShort,
    #[token("static")]
    KwStatic,
    #[token("strictfp")]
    KwStrictfp,
    #[token("super")]
    KwSuper,
    #[token("switch")]
    KwSwitch,
    #[token("synchronized")]
    KwSynchronized,
    #[token("this")]
    KwThis,
    #[token("throw")]
    KwThrow,
    #[token("throws")]
    KwThrows,
    #[token("transient")]
    KwTransient,
    #[token("try")]
    KwTry,
    #[token("var")]
    KwVar,
    #[token("void")]
    KwVoid,
    #[token("volatile")]
    KwVolatile,
    #[token("while")]
    KwWhile,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,
    #[token("null")]
    KwNull,

    // Literals
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
    #[regex(r#"'([^'\\]|\\[\s\S])'"#)]
    Char,
    #[regex(r#""([^"\\]|\\[\s\S])*""#)]
    String,
    #[regex(r"0[xX][0-9A-Fa-f](_?[0-9A-Fa-f])*[lL]?")]
    #[regex(r"0[bB][01](_?[01])*[lL]?")]
    #[regex(r"[0-9](_?[0-9])*[lL]?")]
    Integer,
    #[regex(r"[0-9](_?[0-9])*\.[0-9](_?[0-9])*([eE][+-]?[0-9](_?[0-9])*)?[fFdD]?")]
    #[regex(r"\.[0-9](_?[0-9])*([eE][+-]?[0-9](_?[0-9])*)?[fFdD]?")]
    #[regex(r"[0-9](_?[0-9])*[eE][+-]?[0-9](_?[0-9])*[fFdD]?")]
    #[regex(r"[0-9](_?[0-9])*[fFdD]")]
    Float,
}

impl From<TokenKind> for SyntaxKind {
    fn from(token: TokenKind) -> Self {
        match token {
            TokenKind::Whitespace => SyntaxKind::Whitespace,
            TokenKind::Comment => SyntaxKind::Comment,
            TokenKind::LParen => SyntaxKind::LParen,
            TokenKind::RParen => SyntaxKind::RParen,
            TokenKind::LBrace => SyntaxKind::LBrace,
            TokenKind::RBrace => SyntaxKind::RBrace,
            TokenKind::LBracket => SyntaxKind::LBracket,
            TokenKind::RBracket => SyntaxKind::RBracket,
            TokenKind::Semicolon => SyntaxKind::Semicolon,
            TokenKind::Colon => SyntaxKind::Colon,
            TokenKind::Comma => SyntaxKind::Comma,
            TokenKind::Dot => SyntaxKind::Dot,
            TokenKind::At => SyntaxKind::At,
            TokenKind::Question => SyntaxKind::Question,
            TokenKind::Arrow => SyntaxKind::Arrow,
            TokenKind::DoubleColon => SyntaxKind::DoubleColon,
            TokenKind::URightShiftEqual => SyntaxKind::URightShiftEqual,
            TokenKind::RightShiftEqual => SyntaxKind::RightShiftEqual,
            TokenKind::LeftShiftEqual => SyntaxKind::LeftShiftEqual,
            TokenKind::URightShift => SyntaxKind::URightShift,
            TokenKind::PlusPlus => SyntaxKind::PlusPlus,
            TokenKind::MinusMinus => SyntaxKind::MinusMinus,
            TokenKind::PlusEqual => SyntaxKind::PlusEqual,
            TokenKind::MinusEqual => SyntaxKind::MinusEqual,
            TokenKind::StarEqual => SyntaxKind::StarEqual,
            TokenKind::SlashEqual => SyntaxKind::SlashEqual,
            TokenKind::PercentEqual => SyntaxKind::PercentEqual,
            TokenKind::AmpEqual => SyntaxKind::AmpEqual,
            TokenKind::PipeEqual => SyntaxKind::PipeEqual,
            TokenKind::CaretEqual => SyntaxKind::CaretEqual,
            TokenKind::EqualEqual => SyntaxKind::EqualEqual,
            TokenKind::NotEqual => SyntaxKind::NotEqual,
            TokenKind::LessEqual => SyntaxKind::LessEqual,
            TokenKind::GreaterEqual => SyntaxKind::GreaterEqual,
            TokenKind::AndAnd => SyntaxKind::AndAnd,
            TokenKind::OrOr => SyntaxKind::OrOr,
            TokenKind::LeftShift => SyntaxKind::LeftShift,
            TokenKind::RightShift => SyntaxKind::RightShift,
            TokenKind::Plus => SyntaxKind::Plus,
            TokenKind::Minus => SyntaxKind::Minus,
            TokenKind::Star => SyntaxKind::Star,
            TokenKind::Slash => SyntaxKind::Slash,
            TokenKind::Percent => SyntaxKind::Percent,
            TokenKind::Caret => SyntaxKind::Caret,
            TokenKind::Amp => SyntaxKind::Amp,
            TokenKind::Pipe => SyntaxKind::Pipe,
            TokenKind::Tilde => SyntaxKind::Tilde,
            TokenKind::Exclaim => SyntaxKind::Exclaim,
            TokenKind::Equal => SyntaxKind::Equal,
            TokenKind::Less => SyntaxKind::Less,
            TokenKind::Greater => SyntaxKind::Greater,
            TokenKind::KwAbstract => SyntaxKind::KwAbstract,
            TokenKind::KwAssert => SyntaxKind::KwAssert,
            TokenKind::KwBoolean => SyntaxKind::KwBoolean,
            TokenKind::KwBreak => SyntaxKind::KwBreak,
            TokenKind::KwByte => SyntaxKind::KwByte,
            TokenKind::KwCase => SyntaxKind::KwCase,
            TokenKind::KwCatch => SyntaxKind::KwCatch,
            TokenKind::KwChar => SyntaxKind::KwChar,
            TokenKind::KwClass => SyntaxKind::KwClass,
            TokenKind::KwConst => SyntaxKind::KwConst,
            TokenKind::KwContinue => SyntaxKind::KwContinue,
            TokenKind::KwDefault => SyntaxKind::KwDefault,
            TokenKind::KwDo => SyntaxKind::KwDo,
            TokenKind::KwDouble => SyntaxKind::KwDouble,
            TokenKind::KwElse => SyntaxKind::KwElse,
            TokenKind::KwEnum => SyntaxKind::KwEnum,
            TokenKind::KwExtends => SyntaxKind::KwExtends,
            TokenKind::KwFinal => SyntaxKind::KwFinal,
            TokenKind::KwFinally => SyntaxKind::KwFinally,
            TokenKind::KwFloat => SyntaxKind::KwFloat,
            TokenKind::KwFor => SyntaxKind::KwFor,
            TokenKind::KwGoto => SyntaxKind::KwGoto,
            TokenKind::KwIf => SyntaxKind::KwIf,
            TokenKind::KwImplements => SyntaxKind::KwImplements,
            TokenKind::KwImport => SyntaxKind::KwImport,
            TokenKind::KwInstanceof => SyntaxKind::KwInstanceof,
            TokenKind::KwInt => SyntaxKind::KwInt,
            TokenKind::KwInterface => SyntaxKind::KwInterface,
            TokenKind::KwLong => SyntaxKind::KwLong,
            TokenKind::KwNative => SyntaxKind::KwNative,
            TokenKind::KwNew => SyntaxKind::KwNew,
            TokenKind::KwPackage => SyntaxKind::KwPackage,
            TokenKind::KwPrivate => SyntaxKind::KwPrivate,
            TokenKind::KwProtected => SyntaxKind::KwProtected,
            TokenKind::KwPublic => SyntaxKind::KwPublic,
            TokenKind::KwReturn => SyntaxKind::KwReturn,
            TokenKind::KwShort => SyntaxKind::KwShort,
            TokenKind::KwStatic => SyntaxKind::KwStatic,
            TokenKind::KwStrictfp => SyntaxKind::KwStrictfp,
            TokenKind::KwSuper => SyntaxKind::KwSuper,
            TokenKind::KwSwitch => SyntaxKind::KwSwitch,
            TokenKind::KwSynchronized => SyntaxKind::KwSynchronized,
            TokenKind::KwThis => SyntaxKind::KwThis,
            TokenKind::KwThrow => SyntaxKind::KwThrow,
            TokenKind::KwThrows => SyntaxKind::KwThrows,
            TokenKind::KwTransient => SyntaxKind::KwTransient,
            TokenKind::KwTry => SyntaxKind::KwTry,
            TokenKind::KwVar => SyntaxKind::KwVar,
            TokenKind::KwVoid => SyntaxKind::KwVoid,
            TokenKind::KwVolatile => SyntaxKind::KwVolatile,
            TokenKind::KwWhile => SyntaxKind::KwWhile,
            TokenKind::KwTrue => SyntaxKind::KwTrue,
            TokenKind::KwFalse => SyntaxKind::KwFalse,
            TokenKind::KwNull => SyntaxKind::KwNull,
            TokenKind::Ident => SyntaxKind::Ident,
            TokenKind::Char => SyntaxKind::Char,
            TokenKind::String => SyntaxKind::String,
            TokenKind::Integer => SyntaxKind::Integer,
            TokenKind::Float => SyntaxKind::Float,
        }
    }
}
