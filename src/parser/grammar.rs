//! Parser implementation using chumsky
//!
//! The grammar only understands the declaration skeleton of a file. Every
//! declaration is read as runs of token trees, which are then lowered into
//! the typed nodes of [`crate::parser::ast`].

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::{lex, Token};
use crate::ParseError;

/// Parse Go source code into a [`SourceFile`]
pub fn parse(input: &str) -> Result<SourceFile, Vec<ParseError>> {
    let len = input.len();
    let lexed = lex(input);

    let token_iter = lexed
        .tokens
        .into_iter()
        .map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    let raw = file_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(ParseError::from).collect::<Vec<_>>())?;

    Ok(Lowering::new(input, &lexed.comments).file(raw))
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn file_parser<'a, I>() -> impl Parser<'a, I, RawFile, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    // A token, or a balanced group of trees
    let tree = recursive(|tree| {
        let group = |open: Token, close: Token, delimiter: Delimiter| {
            tree.clone()
                .repeated()
                .collect::<Vec<_>>()
                .delimited_by(just(open), just(close))
                .map_with(move |children, e| TokenTree::Group {
                    delimiter,
                    children,
                    span: span_range(&e.span()),
                })
        };

        choice((
            group(Token::BraceOpen, Token::BraceClose, Delimiter::Brace),
            group(Token::ParenOpen, Token::ParenClose, Delimiter::Paren),
            group(Token::BracketOpen, Token::BracketClose, Delimiter::Bracket),
            any()
                .filter(|t: &Token| !t.is_delimiter())
                .map_with(|t, e| TokenTree::Leaf(Spanned::new(t, span_range(&e.span())))),
        ))
    });

    let semi = just(Token::Semicolon);

    // Trees up to the next top-level semicolon
    let line = tree
        .filter(|t: &TokenTree| !t.is(&Token::Semicolon))
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>();

    // `( spec; spec; )` or a single spec
    let specs = choice((
        line.clone()
            .separated_by(semi.clone())
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        line.clone().map(|l| vec![l]),
    ));

    let gen_decl = |keyword: Token, kind: DeclKind| {
        just(keyword)
            .ignore_then(specs.clone())
            .map_with(move |specs, e| RawDecl {
                kind,
                span: span_range(&e.span()),
                specs,
            })
    };

    // import, const, func: kept opaque
    let other_decl = line.clone().map_with(|l, e| RawDecl {
        kind: DeclKind::Other,
        span: span_range(&e.span()),
        specs: vec![l],
    });

    let decl = choice((
        gen_decl(Token::Type, DeclKind::Type),
        gen_decl(Token::Var, DeclKind::Var),
        other_decl,
    ));

    let package = just(Token::Package).ignore_then(
        select! { Token::Ident(s) => Identifier::new(s) }
            .map_with(|id, e| Spanned::new(id, span_range(&e.span()))),
    );

    package
        .then_ignore(semi.clone())
        .then(
            decl.then_ignore(semi.repeated())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
        .map(|(package, decls)| RawFile { package, decls })
}

/// Turns token trees into typed declarations
struct Lowering<'s> {
    source: &'s str,
    groups: Vec<CommentGroup>,
}

impl<'s> Lowering<'s> {
    fn new(source: &'s str, comments: &[Comment]) -> Self {
        Self {
            source,
            groups: comment_groups(source, comments),
        }
    }

    fn file(&self, raw: RawFile) -> SourceFile {
        SourceFile {
            package: raw.package,
            decls: raw.decls.into_iter().map(|d| self.decl(d)).collect(),
        }
    }

    fn decl(&self, raw: RawDecl) -> Decl {
        let doc = self.doc_before(raw.span.start);
        match raw.kind {
            DeclKind::Type => Decl::Type(GenDecl {
                doc,
                specs: raw.specs.iter().filter_map(|s| self.type_spec(s)).collect(),
                span: raw.span,
            }),
            DeclKind::Var => Decl::Var(GenDecl {
                doc,
                specs: raw.specs.iter().filter_map(|s| self.value_spec(s)).collect(),
                span: raw.span,
            }),
            DeclKind::Other => Decl::Other(raw.span),
        }
    }

    fn type_spec(&self, trees: &[TokenTree]) -> Option<TypeSpec> {
        let (first, rest) = trees.split_first()?;
        let name = first.ident()?;

        // Alias declarations: `type A = B`
        let rest = match rest.split_first() {
            Some((assign, tail)) if assign.is(&Token::Assign) => tail,
            _ => rest,
        };

        let ty = match rest {
            [
                keyword,
                TokenTree::Group {
                    delimiter: Delimiter::Brace,
                    children,
                    ..
                },
            ] if keyword.is(&Token::Struct) => TypeExpr::Struct(self.fields(children)),
            _ => TypeExpr::Other(self.text(rest)),
        };

        Some(TypeSpec {
            name: Spanned::new(Identifier::new(name), first.span()),
            doc: self.doc_before(first.span().start),
            ty,
        })
    }

    fn fields(&self, body: &[TokenTree]) -> Vec<Field> {
        body.split(|t| t.is(&Token::Semicolon))
            .flat_map(|line| self.field_line(line))
            .collect()
    }

    fn field_line(&self, line: &[TokenTree]) -> Vec<Field> {
        let (names, rest) = ident_list(line);

        // Drop the struct tag
        let rest = match rest.split_last() {
            Some((last, init)) if matches!(last.token(), Some(Token::String(_) | Token::RawString(_))) => {
                init
            }
            _ => rest,
        };

        // Embedded fields (`T`, `pkg.T`) declare no names of their own
        if names.is_empty() || rest.is_empty() || rest[0].is(&Token::Dot) {
            return Vec::new();
        }

        let ty = self.text(rest);
        names
            .into_iter()
            .map(|name| Field {
                name,
                ty: ty.clone(),
            })
            .collect()
    }

    fn value_spec(&self, trees: &[TokenTree]) -> Option<ValueSpec> {
        let (names, rest) = ident_list(trees);
        if names.is_empty() {
            return None;
        }

        let (ty, values) = match rest.iter().position(|t| t.is(&Token::Assign)) {
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => (rest, &[][..]),
        };

        let values = values
            .split(|t| t.is(&Token::Comma))
            .filter(|v| !v.is_empty())
            .map(|v| Spanned::new(self.expr(v), span_of(v)))
            .collect();

        Some(ValueSpec {
            names,
            ty: (!ty.is_empty()).then(|| self.text(ty)),
            values,
        })
    }

    fn expr(&self, trees: &[TokenTree]) -> Expr {
        if let [
            name,
            TokenTree::Group {
                delimiter: Delimiter::Brace,
                children,
                ..
            },
        ] = trees
        {
            if let Some(type_name) = name.ident() {
                return Expr::Composite(CompositeLit {
                    type_name: Identifier::new(type_name),
                    elements: self.elements(children),
                });
            }
        }
        Expr::Other(self.text(trees))
    }

    fn elements(&self, body: &[TokenTree]) -> Vec<Element> {
        body.split(|t| t.is(&Token::Comma))
            .filter(|element| !element.is_empty())
            .map(|element| match element.iter().position(|t| t.is(&Token::Colon)) {
                Some(i) if i > 0 && i + 1 < element.len() => {
                    let key = match &element[..i] {
                        [key] => key.ident().map(Identifier::new),
                        _ => None,
                    };
                    Element::Keyed {
                        key,
                        value: self.text(&element[i + 1..]),
                    }
                }
                _ => Element::Positional(self.text(element)),
            })
            .collect()
    }

    /// Source text covered by a run of trees
    fn text(&self, trees: &[TokenTree]) -> String {
        self.source[span_of(trees)].to_string()
    }

    /// The comment group ending on the line just before `offset`
    fn doc_before(&self, offset: usize) -> Option<CommentGroup> {
        let group = self.groups.iter().rev().find(|g| g.end() <= offset)?;
        let leading = group.comments.first().is_some_and(|c| !c.trailing);
        let gap = &self.source[group.end()..offset];

        (leading && gap.trim().is_empty() && gap.matches('\n').count() == 1)
            .then(|| group.clone())
    }
}

fn span_of(trees: &[TokenTree]) -> Span {
    match (trees.first(), trees.last()) {
        (Some(first), Some(last)) => first.span().start..last.span().end,
        _ => 0..0,
    }
}

/// Leading `a, b, c` identifiers and whatever follows them
fn ident_list(trees: &[TokenTree]) -> (Vec<Spanned<Identifier>>, &[TokenTree]) {
    let mut names = Vec::new();
    let mut rest = trees;

    while let Some((first, tail)) = rest.split_first() {
        let Some(name) = first.ident() else { break };
        names.push(Spanned::new(Identifier::new(name), first.span()));
        rest = tail;

        match rest.split_first() {
            Some((comma, tail)) if comma.is(&Token::Comma) => rest = tail,
            _ => break,
        }
    }
    (names, rest)
}

/// Group comments the way Go does: a trailing comment only takes comments on
/// its own line, other comments join while separated by at most one newline.
fn comment_groups(source: &str, comments: &[Comment]) -> Vec<CommentGroup> {
    let mut groups: Vec<CommentGroup> = Vec::new();

    for comment in comments {
        let joins = groups.last().is_some_and(|group| {
            let (Some(first), Some(prev)) = (group.comments.first(), group.comments.last()) else {
                return false;
            };
            let gap = &source[prev.span.end..comment.span.start];
            let newlines = gap.matches('\n').count();
            gap.trim().is_empty() && if first.trailing { newlines == 0 } else { newlines <= 1 }
        });

        match groups.last_mut() {
            Some(group) if joins => group.comments.push(comment.clone()),
            _ => groups.push(CommentGroup {
                comments: vec![comment.clone()],
            }),
        }
    }
    groups
}
