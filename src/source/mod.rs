//! Source model consumed by the generator
//!
//! The resolver and orchestrator only see this narrow view of a package:
//! locate a type, read its fields and doc comment, and list value bindings.
//! [`GoPackage`] implements it over parsed Go files; tests use in-memory
//! models.

mod package;

pub use package::{GoPackage, LoadError};

/// Semantic category of a struct field's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Bool,
    Int,
    Float,
    /// Any other type, as written
    Other(String),
}

impl FieldType {
    /// Classify a field type from its source text
    pub fn from_type_text(text: &str) -> Self {
        match text {
            "string" => FieldType::String,
            "bool" => FieldType::Bool,
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
            | "uint32" | "uint64" | "uintptr" | "byte" | "rune" => FieldType::Int,
            "float32" | "float64" => FieldType::Float,
            other => FieldType::Other(other.to_string()),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, FieldType::String)
    }
}

/// A named struct field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A type declaration located in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    /// Package the type is declared in
    pub package: String,
    /// Raw doc comment lines, in source order
    pub doc: Vec<String>,
    /// Struct fields in declaration order; empty for non-struct types
    pub fields: Vec<FieldDescriptor>,
}

/// A composite literal element, as source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeElement {
    /// `key: value`; `key` is `None` for non-identifier keys
    Keyed { key: Option<String>, value: String },
    Positional(String),
}

/// The right-hand side of a value binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExpr {
    /// `TypeName{...}`
    Composite {
        type_name: String,
        elements: Vec<CompositeElement>,
    },
    /// Anything else, as source text
    Other(String),
}

/// A `var` spec: names on the left, values on the right, paired by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBinding {
    pub names: Vec<String>,
    pub values: Vec<ValueExpr>,
}

/// The capabilities the generator needs from a parsed package
pub trait SourceModel {
    /// Name of the package generated code belongs to
    fn package_name(&self) -> &str;

    /// Locate a type declaration by name
    fn find_type(&self, name: &str) -> Option<TypeDescriptor>;

    /// Every package-level value binding, in source order
    fn value_bindings(&self) -> Vec<ValueBinding>;

    /// Struct fields of a located type
    fn fields_of(&self, ty: &TypeDescriptor) -> Vec<FieldDescriptor> {
        ty.fields.clone()
    }

    /// Doc comment lines of a located type
    fn documentation_of(&self, ty: &TypeDescriptor) -> Vec<String> {
        ty.doc.clone()
    }
}
