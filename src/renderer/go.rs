//! Go source generation

use crate::literal;
use crate::resolve::Instance;
use crate::source::FieldDescriptor;

use super::{normalize, EnumSpec, GoConfig};

/// Build Go source incrementally
pub struct GoBuilder {
    config: GoConfig,
    package: String,
    sections: Vec<Vec<String>>,
    lines: Vec<String>,
    indent: usize,
}

impl GoBuilder {
    /// Create a new builder for a file in `package`
    pub fn new(package: impl Into<String>, config: GoConfig) -> Self {
        Self {
            config,
            package: package.into(),
            sections: vec![],
            lines: vec![],
            indent: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", "\t".repeat(self.indent), text));
        }
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.indent += 1;
    }

    fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    /// Finish the current top-level declaration
    fn end_section(&mut self) {
        if !self.lines.is_empty() {
            self.sections.push(std::mem::take(&mut self.lines));
        }
        self.indent = 0;
    }

    /// Add the `var` block declaring each member
    pub fn add_bindings(&mut self, spec: &EnumSpec) {
        let width = spec
            .instances
            .iter()
            .map(|i| i.name.chars().count())
            .max()
            .unwrap_or(0);

        self.open("var (");
        for instance in &spec.instances {
            self.line(format!(
                "{:<width$} = {}{{{}}}",
                instance.name,
                spec.type_name,
                render_init(instance, &spec.fields),
                width = width
            ));
        }
        self.close(")");
        self.end_section();
    }

    /// Add `String`, which maps each member to its encoding
    pub fn add_string(&mut self, spec: &EnumSpec) {
        let recv = self.config.receiver.clone();
        self.line(format!(
            "// String returns the text encoding of a {}.",
            spec.type_name
        ));
        self.open(format!("func ({} {}) String() string {{", recv, spec.type_name));
        self.line(format!("switch {} {{", recv));
        for instance in &spec.instances {
            self.line(format!("case {}:", instance.name));
            self.indent += 1;
            self.line(format!("return {}", literal::quote(&spec.encoding(instance))));
            self.indent -= 1;
        }
        self.line("}");
        self.line("return \"\"");
        self.close("}");
        self.end_section();
    }

    /// Add `MarshalText`, delegating to `String`
    pub fn add_marshal_text(&mut self, spec: &EnumSpec) {
        let recv = self.config.receiver.clone();
        self.line("// MarshalText implements encoding.TextMarshaler.");
        self.open(format!(
            "func ({} {}) MarshalText() ([]byte, error) {{",
            recv, spec.type_name
        ));
        self.line(format!("return []byte({}.String()), nil", recv));
        self.close("}");
        self.end_section();
    }

    /// Add `UnmarshalText`, a case-insensitive and quote-tolerant decoder
    pub fn add_unmarshal_text(&mut self, spec: &EnumSpec) {
        let recv = self.config.receiver.clone();
        let name = &spec.type_name;
        self.line("// UnmarshalText implements encoding.TextUnmarshaler.");
        self.open(format!(
            "func ({} *{}) UnmarshalText(text []byte) error {{",
            recv, name
        ));
        self.line(r#"normalized := strings.ReplaceAll(strings.ToLower(string(text)), "\"", "")"#);
        self.line("switch normalized {");
        if spec.accept_zero {
            self.line(r#"case "":"#);
            self.indent += 1;
            self.line(format!("*{} = {}{{}}", recv, name));
            self.indent -= 1;
        }
        for instance in &spec.instances {
            self.line(format!(
                "case {}:",
                literal::quote(&normalize(&spec.encoding(instance)))
            ));
            self.indent += 1;
            self.line(format!("*{} = {}", recv, instance.name));
            self.indent -= 1;
        }
        self.line("default:");
        self.indent += 1;
        self.line(format!(
            "return fmt.Errorf(\"unsupported value for {}: %q\", string(text))",
            name
        ));
        self.indent -= 1;
        self.line("}");
        self.line("return nil");
        self.close("}");
        self.end_section();
    }

    /// Add every declaration for one type
    pub fn add_enum(&mut self, spec: &EnumSpec) {
        if spec.generate_bindings {
            self.add_bindings(spec);
        }
        self.add_string(spec);
        self.add_marshal_text(spec);
        self.add_unmarshal_text(spec);
    }

    /// Build the final source text
    pub fn build(mut self) -> String {
        self.end_section();

        let mut out = String::new();
        out.push_str(&self.config.header());
        out.push_str("\n\n");
        out.push_str(&format!("package {}\n\n", self.package));
        out.push_str("import (\n\t\"fmt\"\n\t\"strings\"\n)\n");

        for section in &self.sections {
            out.push('\n');
            for line in section {
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

/// Render Go source for every type, in order
pub fn render_go(package: &str, enums: &[EnumSpec], config: &GoConfig) -> String {
    let mut builder = GoBuilder::new(package, config.clone());
    for spec in enums {
        tracing::debug!(type_name = %spec.type_name, instances = spec.instances.len(), "rendering");
        builder.add_enum(spec);
    }
    builder.build()
}

/// `Field: value` pairs of a member in field declaration order
///
/// Fields the member does not set are left out.
pub fn render_init(instance: &Instance, fields: &[FieldDescriptor]) -> String {
    fields
        .iter()
        .filter_map(|field| {
            let value = instance.field(&field.name)?;
            Some(format!("{}: {}", field.name, value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casing::Casing;
    use crate::source::FieldType;

    fn payment_method() -> EnumSpec {
        let mut spec = EnumSpec::new(
            "PaymentMethod",
            vec![
                Instance::new("CreditCard")
                    .with_field("Code", r#""CC""#)
                    .with_field("Desc", r#""Credit Card""#),
                Instance::new("PayPal")
                    .with_field("Code", r#""PP""#)
                    .with_field("Desc", r#""PayPal""#),
            ],
        );
        spec.fields = vec![
            FieldDescriptor::new("Code", FieldType::String),
            FieldDescriptor::new("Desc", FieldType::String),
        ];
        spec.casing = Casing::Snake;
        spec.generate_bindings = true;
        spec
    }

    #[test]
    fn test_render_init_follows_field_order() {
        let fields = vec![
            FieldDescriptor::new("A", FieldType::Int),
            FieldDescriptor::new("B", FieldType::Int),
            FieldDescriptor::new("C", FieldType::Int),
        ];
        let instance = Instance::new("X").with_field("C", "3").with_field("A", "1");
        assert_eq!(render_init(&instance, &fields), "A: 1, C: 3");
        assert_eq!(render_init(&Instance::new("Y"), &fields), "");
    }

    #[test]
    fn test_var_block_is_aligned() {
        let source = render_go("testpkg", &[payment_method()], &GoConfig::default());
        let expected = "var (\n\tCreditCard = PaymentMethod{Code: \"CC\", Desc: \"Credit Card\"}\n\tPayPal     = PaymentMethod{Code: \"PP\", Desc: \"PayPal\"}\n)\n";
        assert!(source.contains(expected), "got:\n{}", source);
    }

    #[test]
    fn test_no_var_block_for_scanned_instances() {
        let mut spec = payment_method();
        spec.generate_bindings = false;
        let source = render_go("testpkg", &[spec], &GoConfig::default());
        assert!(!source.contains("var ("));
    }

    #[test]
    fn test_render_snake_case_enum() {
        let mut spec = EnumSpec::new(
            "MyEnum",
            vec![Instance::new("ValueOne"), Instance::new("ValueTwo")],
        );
        spec.casing = Casing::Snake;

        let source = render_go("testpkg", &[spec], &GoConfig::default());
        insta::assert_snapshot!(source, @r#"
        // Code generated by enumr. DO NOT EDIT.

        package testpkg

        import (
        	"fmt"
        	"strings"
        )

        // String returns the text encoding of a MyEnum.
        func (t MyEnum) String() string {
        	switch t {
        	case ValueOne:
        		return "value_one"
        	case ValueTwo:
        		return "value_two"
        	}
        	return ""
        }

        // MarshalText implements encoding.TextMarshaler.
        func (t MyEnum) MarshalText() ([]byte, error) {
        	return []byte(t.String()), nil
        }

        // UnmarshalText implements encoding.TextUnmarshaler.
        func (t *MyEnum) UnmarshalText(text []byte) error {
        	normalized := strings.ReplaceAll(strings.ToLower(string(text)), "\"", "")
        	switch normalized {
        	case "value_one":
        		*t = ValueOne
        	case "value_two":
        		*t = ValueTwo
        	default:
        		return fmt.Errorf("unsupported value for MyEnum: %q", string(text))
        	}
        	return nil
        }
        "#);
    }

    #[test]
    fn test_zero_branch_comes_first() {
        let mut spec = payment_method();
        spec.accept_zero = true;
        let source = render_go("testpkg", &[spec], &GoConfig::default());

        let zero = source.find("case \"\":\n\t\t*t = PaymentMethod{}").expect("zero branch");
        let first = source.find("case \"credit_card\":").expect("first member");
        assert!(zero < first);
    }

    #[test]
    fn test_marshal_field_encodings() {
        let mut spec = payment_method();
        spec.marshal_field = Some("Code".to_string());
        let source = render_go("testpkg", &[spec], &GoConfig::default());

        assert!(source.contains("case CreditCard:\n\t\treturn \"CC\""));
        assert!(source.contains("case \"cc\":\n\t\t*t = CreditCard"));
    }

    #[test]
    fn test_types_render_in_order() {
        let first = EnumSpec::new("Alpha", vec![Instance::new("A")]);
        let second = EnumSpec::new("Beta", vec![Instance::new("B")]);
        let source = render_go("p", &[first, second], &GoConfig::new().with_receiver("v"));

        assert_eq!(source.matches("package p").count(), 1);
        let alpha = source.find("func (v Alpha) String()").expect("Alpha");
        let beta = source.find("func (v Beta) String()").expect("Beta");
        assert!(alpha < beta);
    }
}
