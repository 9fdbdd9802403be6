use std::collections::{HashMap, HashSet};

use crate::error::GenerateError;
use crate::source::{
    CompositeElement, FieldDescriptor, SourceModel, TypeDescriptor, ValueExpr,
};

use super::directive::{parse_directives, DirectiveWarning};
use super::Instance;

/// Resolved members of one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub instances: Vec<Instance>,
    /// Members came from directives, so their `var` declarations must be
    /// generated too
    pub generate_bindings: bool,
}

/// Resolve the members of `ty`
///
/// Directives in `doc` win; scanned bindings are only consulted when there
/// are none.
pub fn resolve<M: SourceModel + ?Sized>(
    model: &M,
    ty: &TypeDescriptor,
    fields: &[FieldDescriptor],
    doc: &[String],
    warnings: &mut Vec<DirectiveWarning>,
) -> Result<Resolution, GenerateError> {
    let directives = parse_directives(doc, fields, warnings);
    let (instances, generate_bindings) = if directives.is_empty() {
        (scan_bindings(model, &ty.name, fields), false)
    } else {
        tracing::debug!(type_name = %ty.name, count = directives.len(), "using directives");
        (directives, true)
    };

    if instances.is_empty() {
        return Err(GenerateError::NoInstancesFound {
            type_name: ty.name.clone(),
        });
    }

    let mut seen = HashSet::new();
    for instance in &instances {
        if !seen.insert(instance.name.as_str()) {
            return Err(GenerateError::DuplicateInstance {
                type_name: ty.name.clone(),
                instance: instance.name.clone(),
            });
        }
    }

    Ok(Resolution {
        instances,
        generate_bindings,
    })
}

/// Every `var` bound to a `TypeName{...}` literal
fn scan_bindings<M: SourceModel + ?Sized>(
    model: &M,
    type_name: &str,
    fields: &[FieldDescriptor],
) -> Vec<Instance> {
    let mut instances = Vec::new();
    for binding in model.value_bindings() {
        if binding.values.len() > binding.names.len() {
            tracing::debug!(
                names = binding.names.len(),
                values = binding.values.len(),
                "ignoring values without a name"
            );
        }

        for (name, value) in binding.names.iter().zip(&binding.values) {
            let ValueExpr::Composite {
                type_name: literal_type,
                elements,
            } = value
            else {
                continue;
            };
            if literal_type != type_name {
                continue;
            }

            tracing::debug!(type_name, instance = %name, "found binding");
            instances.push(Instance {
                name: name.clone(),
                fields: element_fields(elements, fields),
            });
        }
    }
    instances
}

/// Map literal elements to field names: keyed by name, positional by order
fn element_fields(
    elements: &[CompositeElement],
    fields: &[FieldDescriptor],
) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (index, element) in elements.iter().enumerate() {
        match element {
            CompositeElement::Keyed {
                key: Some(key),
                value,
            } => {
                if fields.iter().any(|f| &f.name == key) {
                    map.insert(key.clone(), value.clone());
                }
            }
            CompositeElement::Keyed { key: None, .. } => {}
            CompositeElement::Positional(value) => {
                if let Some(field) = fields.get(index) {
                    map.insert(field.name.clone(), value.clone());
                }
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FieldType, ValueBinding};
    use pretty_assertions::assert_eq;

    /// In-memory package with one type and a list of bindings
    struct FakeModel {
        bindings: Vec<ValueBinding>,
    }

    impl SourceModel for FakeModel {
        fn package_name(&self) -> &str {
            "fake"
        }

        fn find_type(&self, _name: &str) -> Option<TypeDescriptor> {
            None
        }

        fn value_bindings(&self) -> Vec<ValueBinding> {
            self.bindings.clone()
        }
    }

    fn ty() -> TypeDescriptor {
        TypeDescriptor {
            name: "Status".to_string(),
            package: "fake".to_string(),
            doc: Vec::new(),
            fields: fields(),
        }
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("Code", FieldType::String),
            FieldDescriptor::new("Rank", FieldType::Int),
        ]
    }

    fn binding(names: &[&str], values: Vec<ValueExpr>) -> ValueBinding {
        ValueBinding {
            names: names.iter().map(|n| n.to_string()).collect(),
            values,
        }
    }

    fn composite(type_name: &str, elements: Vec<CompositeElement>) -> ValueExpr {
        ValueExpr::Composite {
            type_name: type_name.to_string(),
            elements,
        }
    }

    fn positional(value: &str) -> CompositeElement {
        CompositeElement::Positional(value.to_string())
    }

    fn keyed(key: &str, value: &str) -> CompositeElement {
        CompositeElement::Keyed {
            key: Some(key.to_string()),
            value: value.to_string(),
        }
    }

    fn run(model: &FakeModel, doc: &[&str]) -> Result<Resolution, GenerateError> {
        let doc: Vec<String> = doc.iter().map(|l| l.to_string()).collect();
        resolve(model, &ty(), &fields(), &doc, &mut Vec::new())
    }

    #[test]
    fn test_directives_take_precedence() {
        let model = FakeModel {
            bindings: vec![binding(
                &["Active"],
                vec![composite("Status", vec![positional(r#""A""#)])],
            )],
        };

        let resolution = run(&model, &["// enumr:Active Code:ACT"]).expect("Should resolve");
        assert!(resolution.generate_bindings);
        assert_eq!(
            resolution.instances,
            vec![Instance::new("Active").with_field("Code", r#""ACT""#)]
        );
    }

    #[test]
    fn test_scans_bindings_without_directives() {
        let model = FakeModel {
            bindings: vec![
                binding(
                    &["Active"],
                    vec![composite("Status", vec![keyed("Rank", "1"), keyed("Code", r#""A""#)])],
                ),
                binding(&["Other"], vec![composite("Color", vec![positional("1")])]),
                binding(&["count"], vec![ValueExpr::Other("3".to_string())]),
                binding(
                    &["Inactive"],
                    vec![composite("Status", vec![positional(r#""I""#), positional("2")])],
                ),
            ],
        };

        let resolution = run(&model, &["// Status of an account"]).expect("Should resolve");
        assert!(!resolution.generate_bindings);
        assert_eq!(
            resolution.instances,
            vec![
                Instance::new("Active")
                    .with_field("Code", r#""A""#)
                    .with_field("Rank", "1"),
                Instance::new("Inactive")
                    .with_field("Code", r#""I""#)
                    .with_field("Rank", "2"),
            ]
        );
    }

    #[test]
    fn test_positional_may_omit_trailing_fields() {
        let model = FakeModel {
            bindings: vec![binding(
                &["Pending"],
                vec![composite("Status", vec![positional(r#""P""#)])],
            )],
        };

        let resolution = run(&model, &[]).expect("Should resolve");
        assert_eq!(
            resolution.instances,
            vec![Instance::new("Pending").with_field("Code", r#""P""#)]
        );
    }

    #[test]
    fn test_extra_values_are_truncated() {
        let model = FakeModel {
            bindings: vec![binding(
                &["A"],
                vec![
                    composite("Status", vec![]),
                    composite("Status", vec![positional(r#""B""#)]),
                ],
            )],
        };

        let resolution = run(&model, &[]).expect("Should resolve");
        assert_eq!(resolution.instances, vec![Instance::new("A")]);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let model = FakeModel {
            bindings: vec![binding(
                &["A"],
                vec![composite(
                    "Status",
                    vec![
                        keyed("Color", "1"),
                        CompositeElement::Keyed {
                            key: None,
                            value: "2".to_string(),
                        },
                    ],
                )],
            )],
        };

        let resolution = run(&model, &[]).expect("Should resolve");
        assert_eq!(resolution.instances, vec![Instance::new("A")]);
    }

    #[test]
    fn test_no_instances_names_type() {
        let model = FakeModel { bindings: vec![] };
        let err = run(&model, &["// just docs"]).expect_err("Should fail");
        assert_eq!(
            err,
            GenerateError::NoInstancesFound {
                type_name: "Status".to_string()
            }
        );
        assert_eq!(err.to_string(), "failed to find any instances of Status");
    }

    #[test]
    fn test_duplicate_directive_names_rejected() {
        let model = FakeModel { bindings: vec![] };
        let err = run(&model, &["// enumr:A", "// enumr:A Code:X"]).expect_err("Should fail");
        assert_eq!(
            err,
            GenerateError::DuplicateInstance {
                type_name: "Status".to_string(),
                instance: "A".to_string(),
            }
        );
    }

    #[test]
    fn test_warnings_are_collected() {
        let model = FakeModel { bindings: vec![] };
        let mut warnings = Vec::new();
        let doc = vec!["// enumr:A oops".to_string()];
        resolve(&model, &ty(), &fields(), &doc, &mut warnings).expect("Should resolve");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].argument, "oops");
    }
}
