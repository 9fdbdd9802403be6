//! `enumr:` directives in doc comments
//!
//! A directive declares one instance and its field values:
//!
//! ```text
//! // enumr:CreditCard Code:CC Desc:"Credit Card"
//! ```
//!
//! Arguments are separated by whitespace, except inside a double-quoted
//! run. Each argument is `key:value`; values that are valid Go string
//! literals are unquoted.

use std::collections::HashMap;
use std::fmt;

use crate::literal;
use crate::source::FieldDescriptor;

use super::Instance;

/// Key carrying the instance name
pub const TAG: &str = "enumr";

/// Why part of a directive was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// An argument without a `key:value` shape
    MissingValue,
    /// `enumr:` with nothing after the colon; the whole line is skipped
    EmptyName,
}

/// A directive argument that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveWarning {
    /// Comment line the argument came from
    pub line: String,
    pub argument: String,
    pub kind: WarningKind,
}

impl fmt::Display for DirectiveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::MissingValue => write!(
                f,
                "skipping directive argument without value: {} (in `{}`)",
                self.argument, self.line
            ),
            WarningKind::EmptyName => {
                write!(f, "skipping directive without instance name: `{}`", self.line)
            }
        }
    }
}

/// Parse every directive in a doc comment, in source order
pub fn parse_directives(
    doc: &[String],
    fields: &[FieldDescriptor],
    warnings: &mut Vec<DirectiveWarning>,
) -> Vec<Instance> {
    doc.iter()
        .filter_map(|line| parse_directive(line, fields, warnings))
        .collect()
}

/// Parse a single comment line
///
/// Returns `None` for comments that are not directives. Unknown keys are
/// ignored; values for `string` fields are re-quoted as Go literals.
pub fn parse_directive(
    text: &str,
    fields: &[FieldDescriptor],
    warnings: &mut Vec<DirectiveWarning>,
) -> Option<Instance> {
    let content = text.strip_prefix("//")?.trim();
    if !content.starts_with("enumr:") {
        return None;
    }

    let mut values = parse_args(text, split_args(content), warnings);
    let name = values.remove(TAG)?;
    if name.is_empty() {
        tracing::warn!(line = %text, "skipping directive without instance name");
        warnings.push(DirectiveWarning {
            line: text.to_string(),
            argument: format!("{}:", TAG),
            kind: WarningKind::EmptyName,
        });
        return None;
    }

    let fields = fields
        .iter()
        .filter_map(|field| {
            let value = values.get(&field.name)?;
            let literal = if field.ty.is_string() {
                literal::quote(value)
            } else {
                value.clone()
            };
            Some((field.name.clone(), literal))
        })
        .collect();

    tracing::trace!(instance = %name, "parsed directive");
    Some(Instance { name, fields })
}

fn parse_args(
    line: &str,
    args: Vec<String>,
    warnings: &mut Vec<DirectiveWarning>,
) -> HashMap<String, String> {
    let mut values = HashMap::with_capacity(args.len());
    for arg in args {
        let Some((key, value)) = arg.split_once(':') else {
            tracing::warn!(arg = %arg, "skipping directive argument without value");
            warnings.push(DirectiveWarning {
                line: line.to_string(),
                argument: arg,
                kind: WarningKind::MissingValue,
            });
            continue;
        };

        let value = literal::unquote(value).unwrap_or_else(|| value.to_string());
        values.insert(key.to_string(), value);
    }
    values
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitState {
    Normal,
    InQuote,
    /// After a backslash inside a quoted run
    Escaped,
}

/// Split on whitespace, keeping double-quoted runs together
///
/// Quote characters are kept in the output. An unterminated quote runs to
/// the end of the input.
pub(crate) fn split_args(s: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut state = SplitState::Normal;

    for c in s.chars() {
        state = match (state, c) {
            (SplitState::Normal, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
                continue;
            }
            (SplitState::Normal, '"') => SplitState::InQuote,
            (SplitState::Normal, _) => SplitState::Normal,
            (SplitState::InQuote, '"') => SplitState::Normal,
            (SplitState::InQuote, '\\') => SplitState::Escaped,
            (SplitState::InQuote, _) => SplitState::InQuote,
            (SplitState::Escaped, _) => SplitState::InQuote,
        };
        current.push(c);
    }

    if !current.is_empty() {
        args.push(current);
    }
    args
}
