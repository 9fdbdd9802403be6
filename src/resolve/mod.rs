//! Instance resolution
//!
//! Decides which members an enum type has: those declared by `enumr:`
//! directives in its doc comment, or failing that, the package-level `var`
//! bindings constructing it.

mod directive;
mod resolver;

use std::collections::HashMap;

pub use directive::{parse_directive, parse_directives, DirectiveWarning, WarningKind, TAG};
pub use resolver::{resolve, Resolution};

/// One enum member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Go identifier of the member
    pub name: String,
    /// Field name to Go literal expression
    pub fields: HashMap<String, String>,
}

impl Instance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a field literal
    pub fn with_field(mut self, field: impl Into<String>, literal: impl Into<String>) -> Self {
        self.fields.insert(field.into(), literal.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}
