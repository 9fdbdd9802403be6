//! Name casing conventions for enum encodings
//!
//! Identifier-style names are split into word fragments and re-joined under a
//! [`Casing`] convention. Splitting and joining are pure and total: every
//! input maps to exactly one output, and the empty name maps to the empty
//! string.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a casing convention string is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown casing convention '{0}' (expected one of: identity, snake_case, SCREAMING_SNAKE_CASE, camelCase, PascalCase, Title Case)")]
pub struct ParseCasingError(pub String);

/// A convention for turning an instance name into its textual encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Casing {
    /// The name is used unchanged
    #[default]
    Identity,
    /// `value_one`
    Snake,
    /// `VALUE_ONE`
    ScreamingSnake,
    /// `valueOne`
    Camel,
    /// `ValueOne`
    Pascal,
    /// `Value One`
    Title,
}

impl Casing {
    /// All conventions, in declaration order
    pub const ALL: [Casing; 6] = [
        Casing::Identity,
        Casing::Snake,
        Casing::ScreamingSnake,
        Casing::Camel,
        Casing::Pascal,
        Casing::Title,
    ];

    /// Canonical spelling of the convention
    pub fn as_str(&self) -> &'static str {
        match self {
            Casing::Identity => "identity",
            Casing::Snake => "snake_case",
            Casing::ScreamingSnake => "SCREAMING_SNAKE_CASE",
            Casing::Camel => "camelCase",
            Casing::Pascal => "PascalCase",
            Casing::Title => "Title Case",
        }
    }

    /// Transform a whole name under this convention
    pub fn apply(&self, name: &str) -> String {
        match self {
            Casing::Identity => name.to_string(),
            _ => self.join(&words(name)),
        }
    }

    /// Join word fragments under this convention
    ///
    /// `Identity` has no separator and keeps fragments as they are; every
    /// other convention normalizes the case of each fragment.
    pub fn join<S: AsRef<str>>(&self, words: &[S]) -> String {
        let words = words.iter().map(AsRef::as_ref);
        match self {
            Casing::Identity => words.collect(),
            Casing::Snake => words.map(str::to_lowercase).collect::<Vec<_>>().join("_"),
            Casing::ScreamingSnake => words.map(str::to_uppercase).collect::<Vec<_>>().join("_"),
            Casing::Camel => words
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            Casing::Pascal => words.map(capitalize).collect(),
            Casing::Title => words.map(capitalize).collect::<Vec<_>>().join(" "),
        }
    }
}

impl fmt::Display for Casing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Casing {
    type Err = ParseCasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "identity" => Ok(Casing::Identity),
            "snake_case" => Ok(Casing::Snake),
            "SNAKE_CASE" | "SCREAMING_SNAKE_CASE" => Ok(Casing::ScreamingSnake),
            "camelCase" => Ok(Casing::Camel),
            "PascalCase" => Ok(Casing::Pascal),
            "Title Case" => Ok(Casing::Title),
            other => Err(ParseCasingError(other.to_string())),
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c == '_' || c == ' '
}

/// Split an identifier-style name into word fragments
///
/// Fragments keep their original case. A word ends at a delimiter
/// (`_` or space, dropped), before an uppercase letter that follows a
/// lowercase one (`fooBar`), and before the last uppercase letter of an
/// acronym that is followed by a lowercase letter (`JSONParser`).
pub fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_delimiter(c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        // `current` is non-empty only if the previous char was not a delimiter
        if !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let lower_to_upper = prev.is_lowercase() && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(char::is_lowercase);
            if lower_to_upper || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
