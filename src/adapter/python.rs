//! Python language adapter
//!
//! Recognizes `def` (including `async def` and decorated definitions),
//! `lambda` and `class`. Python has no syntactic constructor; `__init__`
//! defined directly in a class body is reported as one.

use super::framework::{
    field_text, node_lines, CallableForm, ClassShape, Construct, DeclarationAdapter, FunctionShape,
};
use crate::schema::LanguageType;
use tree_sitter::Node;

/// Python language adapter
#[derive(Debug, Default)]
pub struct PythonAdapter;

impl PythonAdapter {
    /// Create a new Python adapter
    pub fn new() -> Self {
        Self
    }

    fn function(&self, node: Node<'_>, source: &[u8]) -> FunctionShape {
        let name = field_text(node, "name", source);
        let is_constructor = name.as_deref() == Some("__init__") && is_class_member(node);

        FunctionShape {
            form: CallableForm::Declared,
            name,
            has_parameters: node.child_by_field_name("parameters").is_some(),
            has_body: node.child_by_field_name("body").is_some(),
            lines: node_lines(node),
            return_type: field_text(node, "return_type", source),
            is_constructor,
        }
    }

    fn lambda(&self, node: Node<'_>) -> FunctionShape {
        FunctionShape {
            form: CallableForm::Anonymous,
            name: None,
            // `lambda: 0` has no parameter node at all
            has_parameters: node.child_by_field_name("parameters").is_some(),
            has_body: node.child_by_field_name("body").is_some(),
            lines: node_lines(node),
            return_type: None,
            is_constructor: false,
        }
    }

    fn class(&self, node: Node<'_>, source: &[u8]) -> ClassShape {
        ClassShape {
            name: field_text(node, "name", source),
            has_body: node.child_by_field_name("body").is_some(),
            lines: node_lines(node),
        }
    }
}

/// True when `node` sits directly in a class body, decorators aside.
fn is_class_member(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "decorated_definition" => current = parent.parent(),
            "block" => return parent.parent().is_some_and(|p| p.kind() == "class_definition"),
            _ => return false,
        }
    }
    false
}

impl DeclarationAdapter for PythonAdapter {
    fn language(&self) -> LanguageType {
        LanguageType::Python
    }

    fn grammar(&self) -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn recognize(&self, node: Node<'_>, source: &[u8]) -> Construct {
        match node.kind() {
            "function_definition" => Construct::Function(self.function(node, source)),
            "lambda" => Construct::Function(self.lambda(node)),
            "class_definition" => Construct::Class(self.class(node, source)),
            _ => Construct::Other,
        }
    }

    fn outside_own_scope(&self, field: &str) -> bool {
        matches!(field, "parameters" | "return_type" | "superclasses")
    }
}
