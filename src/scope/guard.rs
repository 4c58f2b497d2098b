//! Scoped frame acquisition
//!
//! Entering a construct hands back a `ScopeGuard`; the matching pop runs
//! when the guard is dropped, whichever way the enclosing code exits.

use super::stack::ScopeStack;
use crate::schema::Parent;
use std::ops::{Deref, DerefMut};

/// Anything that owns a scope stack for the duration of a walk.
pub trait ScopeOwner {
    fn scopes_mut(&mut self) -> &mut ScopeStack;
}

impl ScopeOwner for ScopeStack {
    fn scopes_mut(&mut self) -> &mut ScopeStack {
        self
    }
}

/// Keeps one frame pushed on its owner's stack while alive.
///
/// The guard dereferences to the owner so nested constructs can be
/// entered through it.
pub struct ScopeGuard<'a, T: ScopeOwner + ?Sized> {
    owner: &'a mut T,
    frame: Parent,
}

impl<'a, T: ScopeOwner + ?Sized> ScopeGuard<'a, T> {
    pub fn enter(owner: &'a mut T, frame: Parent) -> Self {
        owner.scopes_mut().push(frame.clone());
        Self { owner, frame }
    }

    /// The frame this guard pushed
    pub fn frame(&self) -> &Parent {
        &self.frame
    }
}

impl<T: ScopeOwner + ?Sized> Deref for ScopeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.owner
    }
}

impl<T: ScopeOwner + ?Sized> DerefMut for ScopeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.owner
    }
}

impl<T: ScopeOwner + ?Sized> Drop for ScopeGuard<'_, T> {
    fn drop(&mut self) {
        self.owner.scopes_mut().release(&self.frame);
    }
}
