//! Scope tracking - current lexical nesting during a walk
//!
//! Adapters never push or pop by hand: entering a construct returns a
//! guard and leaving it is the guard's drop.

pub mod guard;
pub mod stack;

pub use guard::{ScopeGuard, ScopeOwner};
pub use stack::ScopeStack;
