//! Syntax tree types for the Go subset
//!
//! Parsing happens in two steps: the grammar builds [`TokenTree`]s grouped
//! by declaration, then lowering turns them into the declaration types below.

use super::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Go identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single `//` or `/* */` comment, text as written
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
    /// Shares its line with preceding code
    pub trailing: bool,
}

/// Adjacent comments with no blank line between them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    /// Raw text of each comment, in source order
    pub fn lines(&self) -> Vec<String> {
        self.comments.iter().map(|c| c.text.clone()).collect()
    }

    pub fn end(&self) -> usize {
        self.comments.last().map_or(0, |c| c.span.end)
    }
}

/// Bracket kind of a token group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Brace,
    Paren,
    Bracket,
}

/// A token, or a balanced bracket group of token trees
#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree {
    Leaf(Spanned<Token>),
    Group {
        delimiter: Delimiter,
        children: Vec<TokenTree>,
        span: Span,
    },
}

impl TokenTree {
    pub fn span(&self) -> Span {
        match self {
            TokenTree::Leaf(tok) => tok.span.clone(),
            TokenTree::Group { span, .. } => span.clone(),
        }
    }

    /// The token if this is a leaf
    pub fn token(&self) -> Option<&Token> {
        match self {
            TokenTree::Leaf(tok) => Some(&tok.node),
            TokenTree::Group { .. } => None,
        }
    }

    pub fn is(&self, token: &Token) -> bool {
        self.token() == Some(token)
    }

    /// Identifier text if this is an identifier leaf
    pub fn ident(&self) -> Option<&str> {
        match self.token() {
            Some(Token::Ident(s)) => Some(s),
            _ => None,
        }
    }
}

/// Declaration keyword of a top-level declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Type,
    Var,
    /// `import`, `const`, `func` and anything else kept opaque
    Other,
}

/// Top-level declaration as produced by the grammar, before lowering
#[derive(Debug, Clone, PartialEq)]
pub struct RawDecl {
    pub kind: DeclKind,
    pub span: Span,
    /// One token run per spec; grouped declarations have several
    pub specs: Vec<Vec<TokenTree>>,
}

/// Root node as produced by the grammar, before lowering
#[derive(Debug, Clone, PartialEq)]
pub struct RawFile {
    pub package: Spanned<Identifier>,
    pub decls: Vec<RawDecl>,
}

/// A parsed Go source file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub package: Spanned<Identifier>,
    pub decls: Vec<Decl>,
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `type Name ...` or `type ( ... )`
    Type(GenDecl<TypeSpec>),
    /// `var Name = ...` or `var ( ... )`
    Var(GenDecl<ValueSpec>),
    /// Anything the generator does not look into
    Other(Span),
}

/// A `type` or `var` declaration with its specs
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl<T> {
    pub doc: Option<CommentGroup>,
    pub specs: Vec<T>,
    pub span: Span,
}

/// `Name [=] Type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Spanned<Identifier>,
    pub doc: Option<CommentGroup>,
    pub ty: TypeExpr,
}

/// Right-hand side of a type spec
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Struct(Vec<Field>),
    /// Any other type, as source text
    Other(String),
}

/// One named struct field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Spanned<Identifier>,
    /// Field type as source text
    pub ty: String,
}

/// `a, b [Type] [= x, y]`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Spanned<Identifier>>,
    pub ty: Option<String>,
    pub values: Vec<Spanned<Expr>>,
}

/// Value expression on the right of a binding
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `Type{...}`
    Composite(CompositeLit),
    /// Anything else, as source text
    Other(String),
}

/// Composite literal of a named type
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    pub type_name: Identifier,
    pub elements: Vec<Element>,
}

/// Element of a composite literal
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// `key: value`; `key` is `None` when it is not a plain identifier
    Keyed { key: Option<Identifier>, value: String },
    Positional(String),
}
