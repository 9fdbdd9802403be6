//! Go renderer for resolved enum types
//!
//! This module takes the resolved members of each requested type and
//! produces one Go source file with text conversions for all of them.

pub mod config;
pub mod go;

pub use config::GoConfig;
pub use go::{render_go, render_init};

use crate::casing::Casing;
use crate::literal;
use crate::resolve::Instance;
use crate::source::FieldDescriptor;

/// Everything needed to render one enum type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    pub type_name: String,
    /// Members in resolution order
    pub instances: Vec<Instance>,
    /// Struct fields in declaration order
    pub fields: Vec<FieldDescriptor>,
    pub casing: Casing,
    /// Emit `var` declarations for the members
    pub generate_bindings: bool,
    /// Field whose value is the text encoding instead of the member name
    pub marshal_field: Option<String>,
    /// Decode the empty string to the zero value
    pub accept_zero: bool,
}

impl EnumSpec {
    pub fn new(type_name: impl Into<String>, instances: Vec<Instance>) -> Self {
        Self {
            type_name: type_name.into(),
            instances,
            fields: Vec::new(),
            casing: Casing::default(),
            generate_bindings: false,
            marshal_field: None,
            accept_zero: false,
        }
    }

    /// Text encoding of a member
    ///
    /// With a marshal field this is the field's literal, unquoted when it is
    /// a Go string literal. Otherwise it is the cased member name.
    pub fn encoding(&self, instance: &Instance) -> String {
        let field_literal = self
            .marshal_field
            .as_deref()
            .and_then(|field| instance.field(field));

        match field_literal {
            Some(lit) => literal::unquote(lit).unwrap_or_else(|| lit.to_string()),
            None => self.casing.apply(&instance.name),
        }
    }
}

/// Text form compared by the generated decoder
///
/// Lowercases one char at a time, the way Go's `strings.ToLower` maps runes,
/// so keys match what the decoder computes at run time.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|&c| c != '"')
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}
