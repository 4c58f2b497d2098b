//! Shared extraction core
//!
//! `Extraction` owns the `File` being built, its scope stack and its id
//! sequence. Adapters only classify nodes; everything that touches the
//! schema or the stack happens here, identically for every grammar.

use super::framework::{ClassShape, Construct, DeclarationAdapter, FunctionShape};
use crate::Result;
use crate::diagnostics::Diagnostics;
use crate::schema::{Class, EntityKind, File, Function, IdSequence, Parent, ANONYMOUS_NAME};
use crate::scope::{ScopeGuard, ScopeOwner, ScopeStack};
use tree_sitter::Node;

/// A construct skipped because a mandatory part was missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed {construct} at line {line}: missing {missing}")]
pub struct MalformedNode {
    pub construct: EntityKind,
    pub missing: &'static str,
    pub line: usize,
}

/// Outcome of one successful extraction run
#[derive(Debug, Clone)]
pub struct Extracted {
    pub file: File,
    pub malformed: Vec<MalformedNode>,
}

/// State of a single walk over one tree.
pub struct Extraction {
    file: File,
    scopes: ScopeStack,
    ids: IdSequence,
    malformed: Vec<MalformedNode>,
    diagnostics: Diagnostics,
}

impl Extraction {
    /// Start a run for `file`, seeding the stack with the file frame
    pub fn new(file: File, diagnostics: Diagnostics) -> Self {
        let scopes = ScopeStack::new(file.as_parent());
        let ids = IdSequence::new(file.id.clone());
        Self {
            file,
            scopes,
            ids,
            malformed: Vec::new(),
            diagnostics,
        }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn current_parent(&self) -> &Parent {
        self.scopes.peek()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    pub fn malformed(&self) -> &[MalformedNode] {
        &self.malformed
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Record a callable under the current scope.
    ///
    /// Returns the frame to enter for its body, or `None` when the shape
    /// is malformed and nothing was recorded.
    pub fn record_function(&mut self, shape: FunctionShape) -> Option<Parent> {
        let location = match shape.check() {
            Ok(location) => location,
            Err(missing) => {
                self.skip(EntityKind::Function, missing, shape.lines.0);
                return None;
            }
        };

        let function = Function {
            id: self.ids.next(EntityKind::Function),
            name: shape.name.unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
            return_type: shape.return_type,
            is_constructor: shape.is_constructor,
            location,
            parent: self.scopes.peek().clone(),
        };
        tracing::trace!(
            "function {:?} at {} under {} {}",
            function.name,
            function.location,
            function.parent.kind,
            function.parent.id
        );

        let frame = function.as_parent();
        self.file.push_function(function);
        Some(frame)
    }

    /// Record a class under the current scope.
    pub fn record_class(&mut self, shape: ClassShape) -> Option<Parent> {
        let location = match shape.check() {
            Ok(location) => location,
            Err(missing) => {
                self.skip(EntityKind::Class, missing, shape.lines.0);
                return None;
            }
        };

        let class = Class {
            id: self.ids.next(EntityKind::Class),
            name: shape.name.unwrap_or_default(),
            location,
            parent: self.scopes.peek().clone(),
        };
        tracing::trace!("class {:?} at {}", class.name, class.location);

        let frame = class.as_parent();
        self.file.push_class(class);
        Some(frame)
    }

    /// Push `frame`; it is popped when the returned guard drops.
    pub fn enter(&mut self, frame: Parent) -> ScopeGuard<'_, Self> {
        ScopeGuard::enter(self, frame)
    }

    pub fn enter_function(&mut self, shape: FunctionShape) -> Option<ScopeGuard<'_, Self>> {
        let frame = self.record_function(shape)?;
        Some(self.enter(frame))
    }

    pub fn enter_class(&mut self, shape: ClassShape) -> Option<ScopeGuard<'_, Self>> {
        let frame = self.record_class(shape)?;
        Some(self.enter(frame))
    }

    /// Walk `root` depth-first, letting `adapter` classify each node.
    ///
    /// The walk runs on a `TreeCursor` with an explicit stack of open
    /// nodes, so nesting depth is bounded by the heap rather than the
    /// thread stack. A recognized construct's frame is pushed before its
    /// first child that belongs to its own scope and released when the
    /// cursor climbs back above it.
    pub fn walk(&mut self, root: Node<'_>, source: &[u8], adapter: &dyn DeclarationAdapter) {
        let mut cursor = root.walk();
        // One entry per ancestor of the cursor's node, `root` included
        let mut open: Vec<OpenNode> = Vec::new();

        loop {
            let node = cursor.node();
            if node.is_named() {
                if let Some(parent) = open.last_mut() {
                    let own_scope = !cursor
                        .field_name()
                        .is_some_and(|field| adapter.outside_own_scope(field));
                    self.align(parent, own_scope);
                }
                let frame = self.visit(adapter, node, source);
                if cursor.goto_first_child() {
                    open.push(OpenNode { frame, pushed: false });
                    continue;
                }
            }

            loop {
                if open.is_empty() {
                    return;
                }
                if cursor.goto_next_sibling() {
                    break;
                }
                cursor.goto_parent();
                if let Some(done) = open.pop() {
                    self.close(done);
                }
            }
        }
    }

    /// End the run, checking the stack unwound back to the file frame.
    pub fn finish(self) -> Result<Extracted> {
        self.scopes.finish()?;
        tracing::debug!(
            "extracted {} function(s), {} class(es) from {} ({} malformed)",
            self.file.functions().len(),
            self.file.classes().len(),
            self.file.path,
            self.malformed.len()
        );
        Ok(Extracted {
            file: self.file,
            malformed: self.malformed,
        })
    }

    fn skip(&mut self, construct: EntityKind, missing: &'static str, line: usize) {
        let malformed = MalformedNode {
            construct,
            missing,
            line,
        };
        tracing::warn!("{}: skipping {}", self.file.path, malformed);
        self.malformed.push(malformed);
    }

    /// Record `node` if the adapter recognizes it, returning its frame.
    fn visit(&mut self, adapter: &dyn DeclarationAdapter, node: Node<'_>, source: &[u8]) -> Option<Parent> {
        match adapter.recognize(node, source) {
            Construct::Function(shape) => {
                self.diagnostics.dump_node("function", node, source);
                self.record_function(shape)
            }
            Construct::Class(shape) => {
                self.diagnostics.dump_node("class", node, source);
                self.record_class(shape)
            }
            Construct::Other => None,
        }
    }

    /// Put `open`'s frame on or off the stack for its next child.
    fn align(&mut self, open: &mut OpenNode, own_scope: bool) {
        let Some(frame) = &open.frame else {
            return;
        };
        if own_scope && !open.pushed {
            self.scopes.push(frame.clone());
            open.pushed = true;
        } else if !own_scope && open.pushed {
            self.scopes.release(frame);
            open.pushed = false;
        }
    }

    fn close(&mut self, open: OpenNode) {
        if let (Some(frame), true) = (&open.frame, open.pushed) {
            self.scopes.release(frame);
        }
    }
}

/// A node whose children the walk is visiting
struct OpenNode {
    /// Frame of a recorded construct; `None` for anything else
    frame: Option<Parent>,
    pushed: bool,
}

impl ScopeOwner for Extraction {
    fn scopes_mut(&mut self) -> &mut ScopeStack {
        &mut self.scopes
    }
}
