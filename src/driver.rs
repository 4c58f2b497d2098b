//! Extraction driver
//!
//! Turns source text into a `File`: pick the adapter, parse with its
//! grammar, refuse trees with syntax errors, walk, and check the scope
//! stack unwound.

use crate::adapter::{default_registry, AdapterRegistry, DeclarationAdapter, Extracted, Extraction};
use crate::diagnostics::Diagnostics;
use crate::schema::{EntityId, File, LanguageType};
use crate::{Error, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// One source unit to extract
#[derive(Debug, Clone)]
pub struct SourceInput {
    /// Caller-supplied file id; derived from path and content when absent
    pub id: Option<String>,
    pub path: String,
    pub content: String,
}

impl SourceInput {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Read a source file from disk
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_string_lossy(), content))
    }

    pub fn file_name(&self) -> &str {
        self.path.rsplit(['/', '\\']).next().unwrap_or(&self.path)
    }

    fn file_id(&self) -> EntityId {
        match &self.id {
            Some(id) => EntityId::new(id.clone()),
            None => EntityId::for_source(&self.path, &self.content),
        }
    }
}

/// Per-run options
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Dump recognized nodes to stderr
    pub dump_nodes: bool,
}

/// Drives extraction runs against a registry of adapters.
///
/// A driver holds no per-run state, so one instance can serve many
/// threads at once.
pub struct Driver {
    registry: AdapterRegistry,
    options: ExtractOptions,
}

impl Driver {
    /// Driver over every built-in adapter
    pub fn new() -> Self {
        Self::with_registry(default_registry())
    }

    pub fn with_registry(registry: AdapterRegistry) -> Self {
        Self {
            registry,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Adapter for an explicit language, or else for the input's extension
    pub fn adapter_for(
        &self,
        input: &SourceInput,
        language: Option<LanguageType>,
    ) -> Result<&dyn DeclarationAdapter> {
        match language {
            Some(lang) => self
                .registry
                .for_language(lang)
                .ok_or_else(|| Error::UnsupportedLanguage(lang.to_string())),
            None => self
                .registry
                .find_adapter(Path::new(&input.path))
                .ok_or_else(|| Error::UnsupportedLanguage(input.path.clone())),
        }
    }

    /// Extract one source unit
    pub fn extract(&self, input: &SourceInput, language: Option<LanguageType>) -> Result<Extracted> {
        let adapter = self.adapter_for(input, language)?;
        let diagnostics = Diagnostics::from_flag(self.options.dump_nodes);
        self.extract_with(input, adapter, diagnostics)
    }

    /// Extract with a specific adapter and diagnostics sink
    pub fn extract_with(
        &self,
        input: &SourceInput,
        adapter: &dyn DeclarationAdapter,
        diagnostics: Diagnostics,
    ) -> Result<Extracted> {
        tracing::debug!("extracting {} as {}", input.path, adapter.language_name());
        let tree = parse(adapter, input)?;

        let file = File::new(input.file_id(), input.path.clone(), adapter.language());
        let mut extraction = Extraction::new(file, diagnostics);
        extraction.walk(tree.root_node(), input.content.as_bytes(), adapter);
        extraction.finish()
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `input` with the adapter's grammar, rejecting trees with errors.
pub fn parse(adapter: &dyn DeclarationAdapter, input: &SourceInput) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&adapter.grammar())
        .map_err(|e| Error::Grammar(format!("{}: {}", adapter.language_name(), e)))?;

    let tree = parser.parse(&input.content, None).ok_or_else(|| Error::UpstreamParse {
        path: input.path.clone(),
        message: "parser produced no tree".to_string(),
    })?;

    if let Some(node) = first_error(tree.root_node()) {
        let what = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_string()
        };
        return Err(Error::UpstreamParse {
            path: input.path.clone(),
            message: format!(
                "{} at line {}, column {}",
                what,
                node.start_position().row + 1,
                node.start_position().column + 1
            ),
        });
    }
    Ok(tree)
}

/// First error or missing node in document order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    if !root.has_error() {
        return None;
    }
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        // Only subtrees that contain an error are entered
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::tests::SharedBuffer;
    use crate::schema::EntityKind;
    use std::collections::HashSet;

    const SCENARIO: &str = "def a():\n def b():\n  pass\n pass\ndef c():\n pass";

    const SAMPLE: &str = "\
import os

class Loader:
    def __init__(self, root):
        self.root = root

    def load(self, name) -> str:
        def resolve(part):
            return os.path.join(self.root, part)
        return open(resolve(name)).read()

def main():
    handlers = [lambda e: print(e), lambda e: None]
    return Loader('.').load('x')
";

    #[test]
    fn test_scenario_through_driver() {
        let driver = Driver::new();
        let extracted = driver.extract(&SourceInput::new("scenario.py", SCENARIO), None).unwrap();
        let file = extracted.file;

        assert!(extracted.malformed.is_empty());
        assert_eq!(file.language, LanguageType::Python);
        assert_eq!(file.name, "scenario.py");

        let shape: Vec<_> = file
            .functions()
            .iter()
            .map(|f| (f.name.as_str(), f.parent.kind, f.location.start_line, f.location.end_line))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("a", EntityKind::File, 1, 4),
                ("b", EntityKind::Function, 2, 3),
                ("c", EntityKind::File, 5, 6),
            ]
        );
    }

    #[test]
    fn test_structural_invariants_hold() {
        let file = Driver::new()
            .extract(&SourceInput::new("loader.py", SAMPLE), None)
            .unwrap()
            .file;
        assert_eq!(file.functions().len(), 6);

        let mut seen: HashSet<_> = HashSet::from([file.id.clone()]);
        let mut order: Vec<(usize, &crate::schema::EntityId)> = Vec::new();
        for class in file.classes() {
            order.push((class.location.start_line, &class.id));
        }
        for function in file.functions() {
            assert!(function.location.start_line >= 1);
            assert!(function.location.start_line <= function.location.end_line);
            assert!(file.resolves(&function.parent), "dangling parent for {}", function.name);
            order.push((function.location.start_line, &function.id));
        }

        // Parents are always discovered before their children
        order.sort();
        for (_, id) in order {
            let parent = file
                .function(id)
                .map(|f| &f.parent)
                .or_else(|| file.class(id).map(|c| &c.parent))
                .unwrap();
            assert!(seen.contains(&parent.id), "parent of {} not seen yet", id);
            seen.insert(id.clone());
        }
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let driver = Driver::new();
        let input = SourceInput::new("loader.py", SAMPLE);
        let first = driver.extract(&input, None).unwrap().file;
        let second = driver.extract(&input, None).unwrap().file;
        assert_eq!(first, second);

        let renamed = driver.extract(&input.clone().with_id("custom"), None).unwrap().file;
        assert_eq!(renamed.id.as_str(), "custom");
        assert!(renamed.functions()[0].id.as_str().starts_with("custom/"));
        assert_eq!(renamed.functions().len(), first.functions().len());
    }

    #[test]
    fn test_parse_failure_produces_no_file() {
        let driver = Driver::new();
        let err = driver
            .extract(&SourceInput::new("broken.py", "def broken(:\n    pass\n"), None)
            .unwrap_err();
        match err {
            Error::UpstreamParse { path, message } => {
                assert_eq!(path, "broken.py");
                assert!(message.contains("line 1"), "unexpected message: {message}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    fn deep_expression(terms: usize) -> String {
        format!("def deep():\n    return {}1\n", "1+".repeat(terms))
    }

    #[test]
    fn test_deeply_nested_expression_walks_without_recursion() {
        let source = format!("{}def after():\n    pass\n", deep_expression(50_000));
        let extracted = Driver::new().extract(&SourceInput::new("deep.py", source), None).unwrap();

        let names: Vec<_> = extracted.file.functions().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["deep", "after"]);
        assert!(extracted.file.functions().iter().all(|f| f.parent == extracted.file.as_parent()));

        let broken = format!("{}def broken(:\n", deep_expression(50_000));
        let err = Driver::new().extract(&SourceInput::new("deep.py", broken), None).unwrap_err();
        assert!(matches!(err, Error::UpstreamParse { .. }));
    }

    #[test]
    fn test_language_selection() {
        let driver = Driver::new();
        let java = "class A { void run() {} }";

        let err = driver.extract(&SourceInput::new("notes.txt", java), None).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(_)));

        let file = driver
            .extract(&SourceInput::new("notes.txt", java), Some(LanguageType::Java))
            .unwrap()
            .file;
        assert_eq!(file.language, LanguageType::Java);
        assert_eq!(file.functions()[0].name, "run");
    }

    #[test]
    fn test_node_dump_does_not_change_result() {
        let driver = Driver::new();
        let input = SourceInput::new("loader.py", SAMPLE);
        let adapter = driver.adapter_for(&input, None).unwrap();

        let buffer = SharedBuffer::default();
        let dumped = driver
            .extract_with(&input, adapter, Diagnostics::to_writer(buffer.clone()))
            .unwrap();
        let quiet = driver.extract_with(&input, adapter, Diagnostics::disabled()).unwrap();

        assert_eq!(dumped.file, quiet.file);
        let out = buffer.contents();
        assert!(out.contains("ENTERED function (function_definition) at line 4"));
        assert!(out.contains("ENTERED class (class_definition) at line 3"));
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Main.java");
        std::fs::write(&path, "public class Main { public static void main(String[] args) {} }").unwrap();

        let input = SourceInput::read(&path).unwrap();
        assert_eq!(input.file_name(), "Main.java");
        let file = Driver::new().extract(&input, None).unwrap().file;
        assert_eq!(file.classes()[0].name, "Main");
        assert_eq!(file.functions()[0].name, "main");

        assert!(matches!(
            SourceInput::read(&dir.path().join("missing.py")),
            Err(Error::Io(_))
        ));
    }
}
