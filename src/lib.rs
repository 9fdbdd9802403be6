//! enumr - text conversions for Go enum-like struct types
//!
//! This library reads a Go package, resolves the members of each requested
//! struct type (from `enumr:` doc comment directives, or from existing `var`
//! bindings), and renders `String`, `MarshalText` and `UnmarshalText`
//! methods for them.
//!
//! # Example
//!
//! ```rust
//! use std::path::{Path, PathBuf};
//!
//! use enumr::{generate, Casing, GenerateRequest, GoPackage};
//!
//! let source = r#"package shop
//!
//! // enumr:CreditCard Code:CC
//! // enumr:PayPal Code:PP
//! type PaymentMethod struct {
//! 	Code string
//! }
//! "#;
//! let package = GoPackage::from_sources(
//!     Path::new("shop"),
//!     [(PathBuf::from("payment.go"), source.to_string())],
//! )
//! .unwrap();
//!
//! let request = GenerateRequest::new(["PaymentMethod"]).with_casing(Casing::Snake);
//! let generated = generate(&package, &request).unwrap().unwrap();
//!
//! assert!(generated.source.contains("CreditCard = PaymentMethod{Code: \"CC\"}"));
//! assert!(generated.source.contains("case \"credit_card\":"));
//! ```

pub mod casing;
pub mod config;
pub mod error;
pub mod generate;
pub mod literal;
pub mod logging;
pub mod parser;
pub mod renderer;
pub mod resolve;
pub mod source;

use std::path::Path;

pub use casing::{Casing, ParseCasingError};
pub use error::{GenerateError, ParseError};
pub use generate::{generate, output_filename, GenerateRequest, Generated};
pub use renderer::GoConfig;
pub use resolve::{DirectiveWarning, WarningKind};
pub use source::{GoPackage, LoadError, SourceModel};

use thiserror::Error;

/// Errors that can occur during the whole pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// Error while reading or parsing the package
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Error while resolving or validating the requested types
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl Error {
    /// Render the error for a terminal, with source snippets where available
    pub fn report(&self) -> String {
        match self {
            Error::Load(e) => e.report(),
            Error::Generate(e) => e.to_string(),
        }
    }
}

/// Load the package in `dir` and generate the requested types
///
/// Returns `Ok(None)` when no types were requested.
pub fn generate_dir(dir: &Path, request: &GenerateRequest) -> Result<Option<Generated>, Error> {
    let package = GoPackage::load_dir(dir)?;
    tracing::debug!(
        package = package.package_name(),
        dir = %dir.display(),
        "loaded package"
    );
    Ok(generate(&package, request)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("level.go"),
            "package levels\n\ntype Level struct{ Rank int }\n\nvar (\n\tLow  = Level{1}\n\tHigh = Level{2}\n)\n",
        )
        .unwrap();

        let request = GenerateRequest::new(["Level"]).with_casing(Casing::ScreamingSnake);
        let generated = generate_dir(dir.path(), &request).unwrap().unwrap();

        assert!(generated.source.contains("package levels"));
        assert!(generated.source.contains("return \"HIGH\""));
        assert!(!generated.source.contains("var ("));
    }

    #[test]
    fn test_generate_dir_missing_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.go"), "package a\n").unwrap();

        let err = generate_dir(dir.path(), &GenerateRequest::new(["Nope"])).unwrap_err();
        assert!(matches!(err, Error::Generate(GenerateError::TypeNotFound { .. })));
        assert_eq!(err.report(), "type Nope not found in package");
    }

    #[test]
    fn test_generate_dir_without_go_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = generate_dir(dir.path(), &GenerateRequest::new(["T"])).unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::NoGoFiles { .. })));
    }
}
