//! Loading a Go package directory into a [`SourceModel`]

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::ParseError;
use crate::parser::{self, CompositeLit, Decl, Element, Expr, SourceFile, TypeExpr, TypeSpec};

use super::{
    CompositeElement, FieldDescriptor, FieldType, SourceModel, TypeDescriptor, ValueBinding,
    ValueExpr,
};

/// Errors that can occur while loading a package
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {error}", path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("failed to parse {}: {}", path.display(), format_errors(errors))]
    Parse {
        path: PathBuf,
        text: String,
        errors: Vec<ParseError>,
    },

    #[error("no Go files found in {}", dir.display())]
    NoGoFiles { dir: PathBuf },
}

fn format_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl LoadError {
    /// Render the error for a terminal, with source snippets for parse errors
    pub fn report(&self) -> String {
        match self {
            LoadError::Parse { path, text, errors } => {
                let filename = path.display().to_string();
                errors
                    .iter()
                    .map(|e| e.format(text, &filename))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            other => other.to_string(),
        }
    }
}

/// A parsed source file and where it came from
#[derive(Debug, Clone)]
struct ParsedFile {
    path: PathBuf,
    file: SourceFile,
}

/// All non-test Go files of one directory
#[derive(Debug, Clone)]
pub struct GoPackage {
    name: String,
    dir: PathBuf,
    files: Vec<ParsedFile>,
}

impl GoPackage {
    /// Parse every `*.go` file in `dir` except `_test.go` files
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        let io_err = |error| LoadError::Io {
            path: dir.to_path_buf(),
            error,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_go = path.extension().is_some_and(|ext| ext == "go");
            let is_test = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_test.go"));
            if path.is_file() && is_go && !is_test {
                paths.push(path);
            }
        }
        paths.sort();

        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(&path).map_err(|error| LoadError::Io {
                path: path.clone(),
                error,
            })?;
            sources.push((path, text));
        }

        Self::from_sources(dir, sources)
    }

    /// Build a package from in-memory sources, in the given order
    pub fn from_sources(
        dir: &Path,
        sources: impl IntoIterator<Item = (PathBuf, String)>,
    ) -> Result<Self, LoadError> {
        let mut files = Vec::new();
        for (path, text) in sources {
            tracing::debug!(file = %path.display(), "parsing");
            match parser::parse(&text) {
                Ok(file) => files.push(ParsedFile { path, file }),
                Err(errors) => return Err(LoadError::Parse { path, text, errors }),
            }
        }

        let name = files
            .first()
            .map(|f| f.file.package.node.0.clone())
            .ok_or_else(|| LoadError::NoGoFiles {
                dir: dir.to_path_buf(),
            })?;

        for parsed in &files {
            if parsed.file.package.node.as_str() != name {
                tracing::warn!(
                    file = %parsed.path.display(),
                    package = %parsed.file.package.node,
                    expected = %name,
                    "file declares a different package"
                );
            }
        }

        Ok(Self {
            name,
            dir: dir.to_path_buf(),
            files,
        })
    }

    /// Directory the package was loaded from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn type_specs(&self) -> impl Iterator<Item = (&SourceFile, &TypeSpec, Option<&parser::CommentGroup>)> {
        self.files.iter().flat_map(|parsed| {
            parsed.file.decls.iter().flat_map(move |decl| match decl {
                Decl::Type(gen) => gen
                    .specs
                    .iter()
                    .map(|spec| (&parsed.file, spec, gen.doc.as_ref()))
                    .collect::<Vec<_>>(),
                _ => Vec::new(),
            })
        })
    }
}

impl SourceModel for GoPackage {
    fn package_name(&self) -> &str {
        &self.name
    }

    fn find_type(&self, name: &str) -> Option<TypeDescriptor> {
        let (file, spec, decl_doc) = self
            .type_specs()
            .find(|(_, spec, _)| spec.name.node.as_str() == name)?;

        // A spec's own doc wins over the declaration's
        let doc = spec
            .doc
            .as_ref()
            .or(decl_doc)
            .map(|group| group.lines())
            .unwrap_or_default();

        let fields = match &spec.ty {
            TypeExpr::Struct(fields) => fields
                .iter()
                .map(|f| FieldDescriptor::new(f.name.node.as_str(), FieldType::from_type_text(&f.ty)))
                .collect(),
            TypeExpr::Other(_) => Vec::new(),
        };

        Some(TypeDescriptor {
            name: name.to_string(),
            package: file.package.node.0.clone(),
            doc,
            fields,
        })
    }

    fn value_bindings(&self) -> Vec<ValueBinding> {
        self.files
            .iter()
            .flat_map(|parsed| parsed.file.decls.iter())
            .filter_map(|decl| match decl {
                Decl::Var(gen) => Some(gen.specs.iter()),
                _ => None,
            })
            .flatten()
            .map(|spec| ValueBinding {
                names: spec.names.iter().map(|n| n.node.0.clone()).collect(),
                values: spec.values.iter().map(|v| value_expr(&v.node)).collect(),
            })
            .collect()
    }
}

fn value_expr(expr: &Expr) -> ValueExpr {
    match expr {
        Expr::Composite(CompositeLit {
            type_name,
            elements,
        }) => ValueExpr::Composite {
            type_name: type_name.0.clone(),
            elements: elements
                .iter()
                .map(|element| match element {
                    Element::Keyed { key, value } => CompositeElement::Keyed {
                        key: key.as_ref().map(|k| k.0.clone()),
                        value: value.clone(),
                    },
                    Element::Positional(value) => CompositeElement::Positional(value.clone()),
                })
                .collect(),
        },
        Expr::Other(text) => ValueExpr::Other(text.clone()),
    }
}
