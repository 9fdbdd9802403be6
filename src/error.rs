//! Error types for parsing and generation

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);

                if written.is_err() {
                    return format!("{}: {}", filename, self);
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::parser::lexer::Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::parser::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        // Format expected tokens nicely
        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::parser::lexer::Token) -> String {
    use crate::parser::lexer::Token;
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::Number(n) => format!("number {}", n),
        Token::String(s) | Token::RawString(s) => format!("string {}", s),
        Token::Char(c) => format!("rune {}", c),
        Token::Operator(op) => format!("'{}'", op),
        Token::Package => "keyword 'package'".to_string(),
        Token::Import => "keyword 'import'".to_string(),
        Token::Type => "keyword 'type'".to_string(),
        Token::Var => "keyword 'var'".to_string(),
        Token::Const => "keyword 'const'".to_string(),
        Token::Func => "keyword 'func'".to_string(),
        Token::Struct => "keyword 'struct'".to_string(),
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Semicolon => "newline or ';'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Assign => "'='".to_string(),
        Token::LineComment(_) | Token::BlockComment(_) => "comment".to_string(),
    }
}

/// Errors that abort generation of the whole batch
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// Requested type is not declared in the package
    #[error("type {type_name} not found in package")]
    TypeNotFound { type_name: String },

    /// Neither directives nor value bindings produced a member
    #[error("failed to find any instances of {type_name}")]
    NoInstancesFound { type_name: String },

    /// The designated marshal field is missing on an instance
    #[error("instance {instance} of {type_name} does not define marshal field {field}")]
    MissingMarshalField {
        type_name: String,
        field: String,
        instance: String,
    },

    /// The same member name was declared twice
    #[error("instance {instance} of {type_name} is declared more than once")]
    DuplicateInstance { type_name: String, instance: String },

    /// Two members have the same field values, so `String` cannot tell them apart
    #[error("instances {first} and {second} of {type_name} have identical field values")]
    DuplicateValue {
        type_name: String,
        first: String,
        second: String,
    },

    /// Two members would decode from the same text
    #[error("instances {first} and {second} of {type_name} both encode as \"{encoding}\"")]
    DuplicateEncoding {
        type_name: String,
        encoding: String,
        first: String,
        second: String,
    },
}
