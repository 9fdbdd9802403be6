//! Lexer for Go source using logos
//!
//! Only the tokens needed to locate declarations are distinguished. Comments
//! are collected on the side, and semicolons are inserted at line ends the
//! Go way so the grammar can split statements.

use logos::Logos;

use super::ast::Comment;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // Declaration keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("type")]
    Type,
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("func")]
    Func,
    #[token("struct")]
    Struct,

    // Delimiters
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("=")]
    Assign,

    // Every other operator, longest match first
    #[regex(
        r"==|!=|<=|>=|:=|&&|\|\||<-|\+\+|--|\.\.\.|<<=?|>>=?|&\^=?|[+\-*/%&|\^]=|[+\-*/%&|\^<>!~]",
        |lex| lex.slice().to_string()
    )]
    Operator(String),

    // Literals - identifiers must come after keywords
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r"[0-9][0-9a-zA-Z_.]*|\.[0-9][0-9a-zA-Z_]*", |lex| lex.slice().to_string())]
    Number(String),

    /// Interpreted string literal, quotes included
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    String(String),

    /// Raw (backtick) string literal, backticks included
    #[regex(r"`[^`]*`", |lex| lex.slice().to_string())]
    RawString(String),

    /// Rune literal, quotes included
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice().to_string())]
    Char(String),

    // Comments are pulled out of the token stream by `lex`
    #[regex(r"//[^\n]*", |lex| lex.slice().to_string())]
    LineComment(String),

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", |lex| lex.slice().to_string())]
    BlockComment(String),
}

impl Token {
    /// Opening or closing bracket of any kind
    pub fn is_delimiter(&self) -> bool {
        matches!(
            self,
            Token::BraceOpen
                | Token::BraceClose
                | Token::ParenOpen
                | Token::ParenClose
                | Token::BracketOpen
                | Token::BracketClose
        )
    }

    /// Whether a line break after this token terminates the statement
    fn ends_statement(&self) -> bool {
        match self {
            Token::Ident(_)
            | Token::Number(_)
            | Token::String(_)
            | Token::RawString(_)
            | Token::Char(_)
            | Token::BraceClose
            | Token::ParenClose
            | Token::BracketClose => true,
            Token::Operator(op) => op == "++" || op == "--",
            _ => false,
        }
    }
}

/// Output of the lexer: code tokens plus the comments found between them
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<(Token, Span)>,
    pub comments: Vec<Comment>,
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> Lexed {
    let mut tokens: Vec<(Token, Span)> = Vec::new();
    let mut comments = Vec::new();

    let spanned = Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)));

    for (tok, span) in spanned {
        match tok {
            Token::LineComment(text) | Token::BlockComment(text) => {
                let trailing = tokens
                    .last()
                    .is_some_and(|(_, prev)| !input[prev.end..span.start].contains('\n'));
                comments.push(Comment {
                    text,
                    span,
                    trailing,
                });
            }
            other => tokens.push((other, span)),
        }
    }

    Lexed {
        tokens: insert_semicolons(input, tokens),
        comments,
    }
}

fn insert_semicolons(input: &str, tokens: Vec<(Token, Span)>) -> Vec<(Token, Span)> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some((tok, span)) = iter.next() {
        let terminates = tok.ends_statement();
        let end = span.end;
        out.push((tok, span));

        if terminates {
            let at_line_end = match iter.peek() {
                Some((_, next)) => input[end..next.start].contains('\n'),
                None => true,
            };
            if at_line_end {
                out.push((Token::Semicolon, end..end));
            }
        }
    }
    out
}
