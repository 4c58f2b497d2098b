//! Schema types - language-agnostic structural inventory
//!
//! Every supported grammar is reduced to the same small set of entities:
//! - `File`: the root of one source unit, owning everything below it
//! - `Class`: a type declaration that can enclose methods
//! - `Function`: any callable (function, method, constructor, lambda)
//!
//! Entities refer to their enclosing entity through a `Parent`, which is
//! a plain `(id, kind)` pair and never owns what it points at.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name recorded for callables that have no name in the source (lambdas).
pub const ANONYMOUS_NAME: &str = "";

/// Source languages with a registered adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageType {
    Python,
    Java,
}

impl LanguageType {
    /// Get the canonical tag of the language
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageType::Python => "python",
            LanguageType::Java => "java",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageType::Python => "Python",
            LanguageType::Java => "Java",
        }
    }

    /// File extensions conventionally used by the language
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            LanguageType::Python => &["py", "pyi"],
            LanguageType::Java => &["java"],
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [LanguageType] {
        &[LanguageType::Python, LanguageType::Java]
    }

    /// Guess the language from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|lang| lang.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

impl FromStr for LanguageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "python" | "python3" | "py" => Ok(LanguageType::Python),
            "java" => Ok(LanguageType::Java),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for LanguageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of structural entity a `Parent` can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    File,
    Function,
    Class,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::File => "file",
            EntityKind::Function => "function",
            EntityKind::Class => "class",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable identifier of an entity.
///
/// Function and class ids have the form `<file-id>/<kind>:<n>`, so they
/// are unique across files without any shared counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive a file id from its path and content.
    ///
    /// Identical input always yields the same id.
    pub fn for_source(path: &str, content: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(path.as_bytes());
        hasher.update(&[0]);
        hasher.update(content.as_bytes());
        let hex = hasher.finalize().to_hex();
        Self(hex.as_str()[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out entity ids scoped to a single file.
#[derive(Debug)]
pub struct IdSequence {
    file_id: EntityId,
    next: u64,
}

impl IdSequence {
    pub fn new(file_id: EntityId) -> Self {
        Self { file_id, next: 1 }
    }

    /// Allocate the next id for an entity of `kind`
    pub fn next(&mut self, kind: EntityKind) -> EntityId {
        let id = EntityId(format!("{}/{}:{}", self.file_id, kind, self.next));
        self.next += 1;
        id
    }
}

/// Inclusive, 1-based line range of an entity in its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub start_line: usize,
    pub end_line: usize,
}

impl Location {
    /// Returns `None` unless `1 <= start_line <= end_line`.
    pub fn new(start_line: usize, end_line: usize) -> Option<Self> {
        (start_line >= 1 && start_line <= end_line).then_some(Self { start_line, end_line })
    }

    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    pub fn contains(&self, other: &Location) -> bool {
        self.start_line <= other.start_line && other.end_line <= self.end_line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_line, self.end_line)
    }
}

/// Back-reference to the entity enclosing another one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parent {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl Parent {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self { id, kind }
    }
}

/// A declared callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub id: EntityId,
    /// `ANONYMOUS_NAME` for lambdas
    pub name: String,
    /// `None` when the source declares no return type.
    pub return_type: Option<String>,
    pub is_constructor: bool,
    pub location: Location,
    pub parent: Parent,
}

impl Function {
    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS_NAME
    }

    pub fn as_parent(&self) -> Parent {
        Parent::new(self.id.clone(), EntityKind::Function)
    }
}

/// A declared class, interface, enum or record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: EntityId,
    pub name: String,
    pub location: Location,
    pub parent: Parent,
}

impl Class {
    pub fn as_parent(&self) -> Parent {
        Parent::new(self.id.clone(), EntityKind::Class)
    }
}

/// Root entity of one source unit.
///
/// The file owns every entity extracted from it. Collections only grow,
/// in the order the walk discovered the declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: EntityId,
    pub path: String,
    pub name: String,
    pub language: LanguageType,
    functions: Vec<Function>,
    classes: Vec<Class>,
}

impl File {
    pub fn new(id: EntityId, path: impl Into<String>, language: LanguageType) -> Self {
        let path = path.into();
        let name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(path.as_str())
            .to_string();
        Self {
            id,
            path,
            name,
            language,
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub fn as_parent(&self) -> Parent {
        Parent::new(self.id.clone(), EntityKind::File)
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub(crate) fn push_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    pub(crate) fn push_class(&mut self, class: Class) {
        self.classes.push(class);
    }

    pub fn function(&self, id: &EntityId) -> Option<&Function> {
        self.functions.iter().find(|f| &f.id == id)
    }

    pub fn class(&self, id: &EntityId) -> Option<&Class> {
        self.classes.iter().find(|c| &c.id == id)
    }

    /// Functions with the given name, in document order
    pub fn functions_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Function> + 'a {
        self.functions.iter().filter(move |f| f.name == name)
    }

    /// Functions whose immediate parent is `parent`
    pub fn functions_in<'a>(&'a self, parent: &'a EntityId) -> impl Iterator<Item = &'a Function> + 'a {
        self.functions.iter().filter(move |f| &f.parent.id == parent)
    }

    /// Check that a parent points at an entity of this file with the right kind.
    pub fn resolves(&self, parent: &Parent) -> bool {
        match parent.kind {
            EntityKind::File => parent.id == self.id,
            EntityKind::Function => self.function(&parent.id).is_some(),
            EntityKind::Class => self.class(&parent.id).is_some(),
        }
    }

    /// Total number of declarations recorded
    pub fn entity_count(&self) -> usize {
        self.functions.len() + self.classes.len()
    }
}
