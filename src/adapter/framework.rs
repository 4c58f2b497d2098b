//! Core adapter framework
//!
//! Defines the trait every language adapter implements and the
//! grammar-independent shapes adapters hand to the shared extractor.

use crate::schema::{LanguageType, Location};
use std::path::Path;
use tree_sitter::Node;

/// How a callable is declared, which decides the parts it must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableForm {
    /// Named declaration with parameters and a body
    Declared,
    /// Named declaration without a body (interface or abstract method)
    Abstract,
    /// Nameless callable (lambda); only the body is mandatory
    Anonymous,
}

/// Grammar-independent view of a callable node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionShape {
    pub form: CallableForm,
    pub name: Option<String>,
    pub has_parameters: bool,
    pub has_body: bool,
    /// 1-based inclusive `(start, end)` lines of the whole construct
    pub lines: (usize, usize),
    pub return_type: Option<String>,
    pub is_constructor: bool,
}

impl FunctionShape {
    /// Check the mandatory parts, naming the first one missing.
    pub fn check(&self) -> Result<Location, &'static str> {
        let needs_name = !matches!(self.form, CallableForm::Anonymous);
        let needs_parameters = !matches!(self.form, CallableForm::Anonymous);
        let needs_body = !matches!(self.form, CallableForm::Abstract);

        if needs_name && self.name.as_deref().is_none_or(str::is_empty) {
            return Err("name");
        }
        if needs_parameters && !self.has_parameters {
            return Err("parameter list");
        }
        if needs_body && !self.has_body {
            return Err("body");
        }
        Location::new(self.lines.0, self.lines.1).ok_or("source span")
    }
}

/// Grammar-independent view of a class-like node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassShape {
    pub name: Option<String>,
    pub has_body: bool,
    pub lines: (usize, usize),
}

impl ClassShape {
    pub fn check(&self) -> Result<Location, &'static str> {
        if self.name.as_deref().is_none_or(str::is_empty) {
            return Err("name");
        }
        if !self.has_body {
            return Err("body");
        }
        Location::new(self.lines.0, self.lines.1).ok_or("source span")
    }
}

/// What an adapter recognized a node as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construct {
    Function(FunctionShape),
    Class(ClassShape),
    /// Not a declaration; its children are still visited
    Other,
}

/// Trait for language adapters
///
/// An adapter only translates its grammar's node shapes. Scope tracking,
/// entity construction and the walk itself live in the shared core.
pub trait DeclarationAdapter: Send + Sync {
    /// The language stamped on extracted files
    fn language(&self) -> LanguageType;

    /// Get the language name (for display)
    fn language_name(&self) -> &str {
        self.language().display_name()
    }

    /// The tree-sitter grammar to parse with
    fn grammar(&self) -> tree_sitter::Language;

    /// Get file extensions this adapter handles
    fn file_extensions(&self) -> &[&str] {
        self.language().extensions()
    }

    /// Check if this adapter can handle a file
    fn can_handle(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.file_extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Classify one syntax node
    fn recognize(&self, node: Node<'_>, source: &[u8]) -> Construct;

    /// Whether a construct's child under `field` is evaluated in the
    /// enclosing scope (parameter defaults, annotations, base classes).
    fn outside_own_scope(&self, _field: &str) -> bool {
        false
    }
}

/// Registry of language adapters
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn DeclarationAdapter>>,
}

impl AdapterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter
    pub fn register(&mut self, adapter: impl DeclarationAdapter + 'static) {
        self.adapters.push(Box::new(adapter));
    }

    /// Find an adapter for a file
    pub fn find_adapter(&self, path: &Path) -> Option<&dyn DeclarationAdapter> {
        self.adapters
            .iter()
            .find(|a| a.can_handle(path))
            .map(|a| a.as_ref())
    }

    /// Find the adapter stamping `language`
    pub fn for_language(&self, language: LanguageType) -> Option<&dyn DeclarationAdapter> {
        self.adapters
            .iter()
            .find(|a| a.language() == language)
            .map(|a| a.as_ref())
    }

    /// Get all registered adapters
    pub fn adapters(&self) -> &[Box<dyn DeclarationAdapter>] {
        &self.adapters
    }
}

/// Create a default registry with all built-in adapters
pub fn default_registry() -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register(super::python::PythonAdapter::new());
    registry.register(super::java::JavaAdapter::new());
    registry
}

/// 1-based inclusive line span of a node.
///
/// A node whose range stops at column 0 ends on the previous line; the
/// trailing newline is not part of the construct.
pub fn node_lines(node: Node<'_>) -> (usize, usize) {
    let start = node.start_position();
    let end = node.end_position();
    let end_row = if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    };
    (start.row + 1, end_row + 1)
}

/// UTF-8 text of a node's named field, if present
pub fn field_text(node: Node<'_>, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|n| n.utf8_text(source).ok())
        .map(str::to_string)
}
