//! # Declscope - declaration extraction with parent links
//!
//! Parses Python and Java sources with tree-sitter and records every class
//! and function together with its line span and the entity that lexically
//! encloses it.
//!
//! Declscope provides:
//! - A flat schema (`File`, `Class`, `Function`) with typed parent references
//! - Pluggable per-language declaration adapters
//! - A scope stack that keeps parent links consistent during the walk
//! - Parallel batch extraction and an optional node dump for debugging

pub mod adapter;
pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod ignore;
pub mod schema;
pub mod scope;
pub mod ui;

// Re-exports for convenient access
pub use adapter::{DeclarationAdapter, Extracted, MalformedNode};
pub use driver::{Driver, ExtractOptions, SourceInput};
pub use schema::{Class, EntityId, EntityKind, File, Function, LanguageType, Location, Parent};

/// Result type alias for Declscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Declscope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The grammar could not produce a clean tree for the source
    #[error("parse error in {path}: {message}")]
    UpstreamParse { path: String, message: String },

    #[error("scope stack imbalance: {0}")]
    StackImbalance(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("grammar error: {0}")]
    Grammar(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
