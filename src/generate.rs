//! Generation pipeline: locate, resolve, validate, render

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::casing::Casing;
use crate::error::GenerateError;
use crate::renderer::{normalize, render_go, EnumSpec, GoConfig};
use crate::resolve::{resolve, DirectiveWarning};
use crate::source::SourceModel;

/// Suffix appended to the snake_case type name for the default output file
pub const OUTPUT_SUFFIX: &str = "_enum.go";

/// What to generate and how
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Type names, in output order
    pub types: Vec<String>,
    pub casing: Casing,
    pub marshal_field: Option<String>,
    pub accept_zero: bool,
    pub go: GoConfig,
}

impl GenerateRequest {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the casing used for member encodings
    pub fn with_casing(mut self, casing: Casing) -> Self {
        self.casing = casing;
        self
    }

    /// Encode members by this field's value instead of their names
    pub fn with_marshal_field(mut self, field: impl Into<String>) -> Self {
        self.marshal_field = Some(field.into());
        self
    }

    /// Decode the empty string to the zero value
    pub fn with_accept_zero(mut self, accept_zero: bool) -> Self {
        self.accept_zero = accept_zero;
        self
    }

    pub fn with_go_config(mut self, go: GoConfig) -> Self {
        self.go = go;
        self
    }
}

/// Output of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Go source for all requested types
    pub source: String,
    /// Directive arguments that were skipped
    pub warnings: Vec<DirectiveWarning>,
}

/// Generate conversions for every requested type
///
/// Returns `Ok(None)` when no types were requested. Any error aborts the
/// whole batch.
pub fn generate<M: SourceModel + ?Sized>(
    model: &M,
    request: &GenerateRequest,
) -> Result<Option<Generated>, GenerateError> {
    let mut warnings = Vec::new();
    let mut enums = Vec::with_capacity(request.types.len());

    for type_name in &request.types {
        let ty = model
            .find_type(type_name)
            .ok_or_else(|| GenerateError::TypeNotFound {
                type_name: type_name.clone(),
            })?;
        let fields = model.fields_of(&ty);
        let doc = model.documentation_of(&ty);

        let resolution = resolve(model, &ty, &fields, &doc, &mut warnings)?;
        tracing::debug!(
            type_name = %ty.name,
            instances = resolution.instances.len(),
            generate_bindings = resolution.generate_bindings,
            "resolved"
        );

        if let Some(field) = &request.marshal_field {
            if let Some(missing) = resolution
                .instances
                .iter()
                .find(|instance| instance.field(field).is_none())
            {
                return Err(GenerateError::MissingMarshalField {
                    type_name: ty.name.clone(),
                    field: field.clone(),
                    instance: missing.name.clone(),
                });
            }
        }

        let spec = EnumSpec {
            type_name: ty.name.clone(),
            instances: resolution.instances,
            fields,
            casing: request.casing,
            generate_bindings: resolution.generate_bindings,
            marshal_field: request.marshal_field.clone(),
            accept_zero: request.accept_zero,
        };
        check_values(&spec)?;
        check_encodings(&spec)?;
        enums.push(spec);
    }

    if enums.is_empty() {
        tracing::debug!("nothing to generate");
        return Ok(None);
    }

    let source = render_go(model.package_name(), &enums, &request.go);
    Ok(Some(Generated { source, warnings }))
}

/// Reject members that compare equal as Go values
fn check_values(spec: &EnumSpec) -> Result<(), GenerateError> {
    for (i, second) in spec.instances.iter().enumerate() {
        if let Some(first) = spec.instances[..i]
            .iter()
            .find(|first| first.fields == second.fields)
        {
            return Err(GenerateError::DuplicateValue {
                type_name: spec.type_name.clone(),
                first: first.name.clone(),
                second: second.name.clone(),
            });
        }
    }
    Ok(())
}

/// Reject members the decoder could not tell apart
fn check_encodings(spec: &EnumSpec) -> Result<(), GenerateError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    if spec.accept_zero {
        seen.insert(String::new(), format!("{}{{}}", spec.type_name));
    }

    for instance in &spec.instances {
        let encoding = spec.encoding(instance);
        if let Some(first) = seen.insert(normalize(&encoding), instance.name.clone()) {
            return Err(GenerateError::DuplicateEncoding {
                type_name: spec.type_name.clone(),
                encoding,
                first,
                second: instance.name.clone(),
            });
        }
    }
    Ok(())
}

/// Where the generated file goes
///
/// Defaults to `<snake_case(type)>_enum.go` in `dir`. An override naming an
/// existing directory receives the default file name; any other override is
/// used as is.
pub fn output_filename(dir: &Path, first_type: &str, output: Option<&Path>) -> PathBuf {
    let file_name = format!("{}{}", Casing::Snake.apply(first_type), OUTPUT_SUFFIX);
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => dir.join(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{
        CompositeElement, FieldDescriptor, FieldType, TypeDescriptor, ValueBinding, ValueExpr,
    };
    use pretty_assertions::assert_eq;

    /// One-type package held in memory
    struct FakeModel {
        ty: TypeDescriptor,
        bindings: Vec<ValueBinding>,
    }

    impl SourceModel for FakeModel {
        fn package_name(&self) -> &str {
            &self.ty.package
        }

        fn find_type(&self, name: &str) -> Option<TypeDescriptor> {
            (self.ty.name == name).then(|| self.ty.clone())
        }

        fn value_bindings(&self) -> Vec<ValueBinding> {
            self.bindings.clone()
        }
    }

    fn model(doc: &[&str]) -> FakeModel {
        FakeModel {
            ty: TypeDescriptor {
                name: "UserType".to_string(),
                package: "users".to_string(),
                doc: doc.iter().map(|l| l.to_string()).collect(),
                fields: vec![FieldDescriptor::new("Code", FieldType::String)],
            },
            bindings: vec![],
        }
    }

    fn scanned(names: &[&str]) -> FakeModel {
        let mut model = model(&[]);
        model.bindings = names
            .iter()
            .map(|name| ValueBinding {
                names: vec![name.to_string()],
                values: vec![ValueExpr::Composite {
                    type_name: "UserType".to_string(),
                    elements: vec![CompositeElement::Positional(format!("\"{}\"", name))],
                }],
            })
            .collect();
        model
    }

    #[test]
    fn test_generate_from_directives() {
        let model = model(&["// enumr:Admin Code:ADM", "// enumr:Guest Code:GST"]);
        let request = GenerateRequest::new(["UserType"]).with_casing(Casing::Snake);

        let generated = generate(&model, &request)
            .expect("Should generate")
            .expect("Should have output");
        assert!(generated.source.contains("package users"));
        assert!(generated.source.contains("Admin = UserType{Code: \"ADM\"}"));
        assert!(generated.source.contains("case \"guest\":"));
        assert!(generated.warnings.is_empty());
    }

    #[test]
    fn test_empty_request_is_nothing_to_generate() {
        let request = GenerateRequest::new(Vec::<String>::new());
        assert_eq!(generate(&model(&[]), &request), Ok(None));
    }

    #[test]
    fn test_unknown_type_aborts() {
        let request = GenerateRequest::new(["UserType", "Missing"]);
        let err = generate(&scanned(&["Admin"]), &request).expect_err("Should fail");
        assert_eq!(
            err,
            GenerateError::TypeNotFound {
                type_name: "Missing".to_string()
            }
        );
    }

    #[test]
    fn test_no_instances_aborts() {
        let request = GenerateRequest::new(["UserType"]);
        let err = generate(&model(&[]), &request).expect_err("Should fail");
        assert_eq!(err.to_string(), "failed to find any instances of UserType");
    }

    #[test]
    fn test_missing_marshal_field_names_instance() {
        let model = model(&["// enumr:Admin Code:ADM", "// enumr:Guest"]);
        let request = GenerateRequest::new(["UserType"]).with_marshal_field("Code");

        let err = generate(&model, &request).expect_err("Should fail");
        assert_eq!(
            err,
            GenerateError::MissingMarshalField {
                type_name: "UserType".to_string(),
                field: "Code".to_string(),
                instance: "Guest".to_string(),
            }
        );
    }

    #[test]
    fn test_marshal_field_drives_encoding() {
        let request = GenerateRequest::new(["UserType"]).with_marshal_field("Code");
        let generated = generate(&scanned(&["Admin"]), &request)
            .expect("Should generate")
            .expect("Should have output");
        assert!(generated.source.contains("return \"Admin\""));
        assert!(generated.source.contains("case \"admin\":"));
        assert!(!generated.source.contains("var ("));
    }

    #[test]
    fn test_encodings_equal_after_lowercasing_are_rejected() {
        let model = model(&["// enumr:ABC Code:A", "// enumr:Abc Code:B"]);
        let request = GenerateRequest::new(["UserType"]).with_casing(Casing::Snake);

        let err = generate(&model, &request).expect_err("Should fail");
        assert_eq!(
            err,
            GenerateError::DuplicateEncoding {
                type_name: "UserType".to_string(),
                encoding: "abc".to_string(),
                first: "ABC".to_string(),
                second: "Abc".to_string(),
            }
        );
    }

    #[test]
    fn test_members_with_equal_fields_are_rejected() {
        let model = model(&["// enumr:Red", "// enumr:Green", "// enumr:Blue Code:B"]);
        let err = generate(&model, &GenerateRequest::new(["UserType"])).expect_err("Should fail");
        assert_eq!(
            err,
            GenerateError::DuplicateValue {
                type_name: "UserType".to_string(),
                first: "Red".to_string(),
                second: "Green".to_string(),
            }
        );

        let mut duplicated = scanned(&["Admin", "Guest"]);
        duplicated.bindings[1].values = duplicated.bindings[0].values.clone();
        let err = generate(&duplicated, &GenerateRequest::new(["UserType"])).expect_err("Should fail");
        assert!(matches!(err, GenerateError::DuplicateValue { .. }));
    }

    #[test]
    fn test_empty_encoding_conflicts_with_zero_value() {
        let model = model(&[r#"// enumr:Unset Code:"""#]);
        let request = GenerateRequest::new(["UserType"])
            .with_marshal_field("Code")
            .with_accept_zero(true);

        let err = generate(&model, &request).expect_err("Should fail");
        assert!(matches!(err, GenerateError::DuplicateEncoding { ref first, .. } if first == "UserType{}"));
    }

    #[test]
    fn test_zero_acceptance_is_rendered() {
        let request = GenerateRequest::new(["UserType"]).with_accept_zero(true);
        let generated = generate(&scanned(&["Admin"]), &request)
            .expect("Should generate")
            .expect("Should have output");
        assert!(generated.source.contains("case \"\":\n\t\t*t = UserType{}"));
    }

    #[test]
    fn test_directive_warnings_are_returned() {
        let model = model(&["// enumr:Admin stray"]);
        let generated = generate(&model, &GenerateRequest::new(["UserType"]))
            .expect("Should generate")
            .expect("Should have output");
        assert_eq!(generated.warnings.len(), 1);
        assert_eq!(generated.warnings[0].argument, "stray");
    }

    #[test]
    fn test_output_filename_default() {
        assert_eq!(
            output_filename(Path::new("pkg"), "UserType", None),
            Path::new("pkg").join("user_type_enum.go")
        );
    }

    #[test]
    fn test_output_filename_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            output_filename(Path::new("pkg"), "UserType", Some(dir.path())),
            dir.path().join("user_type_enum.go")
        );

        let file = Path::new("out/custom.go");
        assert_eq!(
            output_filename(Path::new("pkg"), "UserType", Some(file)),
            file.to_path_buf()
        );
    }
}
