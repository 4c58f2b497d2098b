//! Java language adapter
//!
//! Methods, constructors (compact record ones included) and lambdas
//! become functions; classes, interfaces, enums, records and annotation
//! types become classes.
//! Body-less methods (interface, abstract, native) are recorded with
//! `CallableForm::Abstract`.

use super::framework::{
    field_text, node_lines, CallableForm, ClassShape, Construct, DeclarationAdapter, FunctionShape,
};
use crate::schema::LanguageType;
use tree_sitter::Node;

/// Java language adapter
#[derive(Debug, Default)]
pub struct JavaAdapter;

impl JavaAdapter {
    /// Create a new Java adapter
    pub fn new() -> Self {
        Self
    }

    fn method(&self, node: Node<'_>, source: &[u8]) -> FunctionShape {
        let has_body = node.child_by_field_name("body").is_some();
        FunctionShape {
            form: if has_body {
                CallableForm::Declared
            } else {
                CallableForm::Abstract
            },
            name: field_text(node, "name", source),
            has_parameters: node.child_by_field_name("parameters").is_some(),
            has_body,
            lines: node_lines(node),
            // `void` is recorded as written
            return_type: field_text(node, "type", source),
            is_constructor: false,
        }
    }

    fn constructor(&self, node: Node<'_>, source: &[u8]) -> FunctionShape {
        FunctionShape {
            form: CallableForm::Declared,
            name: field_text(node, "name", source),
            has_parameters: node.child_by_field_name("parameters").is_some(),
            has_body: node.child_by_field_name("body").is_some(),
            lines: node_lines(node),
            return_type: None,
            is_constructor: true,
        }
    }

    /// `record Point(int x, int y) { Point { ... } }`
    fn compact_constructor(&self, node: Node<'_>, source: &[u8]) -> FunctionShape {
        FunctionShape {
            // Parameters are the record components, implied by the header
            has_parameters: true,
            ..self.constructor(node, source)
        }
    }

    fn lambda(&self, node: Node<'_>) -> FunctionShape {
        FunctionShape {
            form: CallableForm::Anonymous,
            name: None,
            has_parameters: node.child_by_field_name("parameters").is_some(),
            has_body: node.child_by_field_name("body").is_some(),
            lines: node_lines(node),
            return_type: None,
            is_constructor: false,
        }
    }

    fn type_declaration(&self, node: Node<'_>, source: &[u8]) -> ClassShape {
        ClassShape {
            name: field_text(node, "name", source),
            has_body: node.child_by_field_name("body").is_some(),
            lines: node_lines(node),
        }
    }
}

impl DeclarationAdapter for JavaAdapter {
    fn language(&self) -> LanguageType {
        LanguageType::Java
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_java::LANGUAGE.into()
    }

    fn recognize(&self, node: Node<'_>, source: &[u8]) -> Construct {
        match node.kind() {
            "method_declaration" => Construct::Function(self.method(node, source)),
            "constructor_declaration" => Construct::Function(self.constructor(node, source)),
            "compact_constructor_declaration" => {
                Construct::Function(self.compact_constructor(node, source))
            }
            "lambda_expression" => Construct::Function(self.lambda(node)),
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration" => Construct::Class(self.type_declaration(node, source)),
            _ => Construct::Other,
        }
    }
}
