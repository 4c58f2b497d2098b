//! Scope stack - tracks where the walk currently is
//!
//! The stack is seeded with the file frame and can never drop below it,
//! so `peek` always has an answer.

use crate::schema::Parent;
use crate::{Error, Result};

/// LIFO stack of enclosing entities for one walk.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Parent>,
    /// Guard releases that found an unexpected frame on top
    faults: usize,
}

impl ScopeStack {
    /// Create a stack seeded with the root (file) frame
    pub fn new(root: Parent) -> Self {
        Self {
            frames: vec![root],
            faults: 0,
        }
    }

    /// Enter a new scope
    pub fn push(&mut self, parent: Parent) {
        self.frames.push(parent);
    }

    /// Leave the current scope. The root frame cannot be popped.
    pub fn pop(&mut self) -> Result<Parent> {
        if self.frames.len() <= 1 {
            return Err(Error::StackImbalance(
                "pop with only the file frame left".to_string(),
            ));
        }
        self.frames
            .pop()
            .ok_or_else(|| Error::StackImbalance("pop on empty stack".to_string()))
    }

    /// Current enclosing entity
    pub fn peek(&self) -> &Parent {
        // Seeded in `new` and `pop` never removes the last frame.
        &self.frames[self.frames.len() - 1]
    }

    pub fn root(&self) -> &Parent {
        &self.frames[0]
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.frames.len() == 1
    }

    /// Pop `expected`, recording a fault if something else is on top.
    pub(crate) fn release(&mut self, expected: &Parent) {
        match self.pop() {
            Ok(ref popped) if popped == expected => {}
            Ok(popped) => {
                tracing::error!(
                    "scope release expected {} {} but found {} {}",
                    expected.kind,
                    expected.id,
                    popped.kind,
                    popped.id
                );
                self.faults += 1;
            }
            Err(e) => {
                tracing::error!("scope release of {} {} failed: {}", expected.kind, expected.id, e);
                self.faults += 1;
            }
        }
    }

    /// Consume the stack after a walk, checking it unwound completely.
    pub fn finish(self) -> Result<Parent> {
        if self.faults > 0 {
            return Err(Error::StackImbalance(format!(
                "{} scope release(s) out of order",
                self.faults
            )));
        }
        if self.frames.len() != 1 {
            return Err(Error::StackImbalance(format!(
                "{} frame(s) left above the file frame",
                self.frames.len() - 1
            )));
        }
        let mut frames = self.frames;
        frames
            .pop()
            .ok_or_else(|| Error::StackImbalance("file frame missing".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EntityId, EntityKind};

    fn frame(id: &str, kind: EntityKind) -> Parent {
        Parent::new(EntityId::new(id), kind)
    }

    #[test]
    fn test_push_pop_peek() {
        let mut stack = ScopeStack::new(frame("f", EntityKind::File));
        assert!(stack.is_at_root());
        assert_eq!(stack.peek().kind, EntityKind::File);

        stack.push(frame("f/function:1", EntityKind::Function));
        stack.push(frame("f/function:2", EntityKind::Function));
        assert_eq!(stack.depth(), 3);
        assert_eq!(stack.peek().id.as_str(), "f/function:2");

        assert_eq!(stack.pop().unwrap().id.as_str(), "f/function:2");
        assert_eq!(stack.peek().id.as_str(), "f/function:1");
        stack.pop().unwrap();
        assert_eq!(stack.peek(), stack.root());
    }

    #[test]
    fn test_root_frame_cannot_be_popped() {
        let mut stack = ScopeStack::new(frame("f", EntityKind::File));
        assert!(matches!(stack.pop(), Err(Error::StackImbalance(_))));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_finish_detects_leftover_frames() {
        let mut stack = ScopeStack::new(frame("f", EntityKind::File));
        stack.push(frame("f/class:1", EntityKind::Class));
        assert!(matches!(stack.finish(), Err(Error::StackImbalance(_))));

        let stack = ScopeStack::new(frame("f", EntityKind::File));
        assert_eq!(stack.finish().unwrap().id.as_str(), "f");
    }

    #[test]
    fn test_out_of_order_release_is_a_fault() {
        let mut stack = ScopeStack::new(frame("f", EntityKind::File));
        stack.push(frame("f/function:1", EntityKind::Function));
        stack.release(&frame("f/function:9", EntityKind::Function));

        assert!(stack.is_at_root());
        assert!(matches!(stack.finish(), Err(Error::StackImbalance(_))));
    }
}
