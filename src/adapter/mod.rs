//! Language Adapter Framework
//!
//! Each language provides a tree-sitter grammar and an adapter that maps
//! its declaration nodes to grammar-independent shapes. The extraction
//! core never sees language-specific logic.

pub mod extraction;
pub mod framework;
pub mod java;
pub mod python;

pub use extraction::{Extracted, Extraction, MalformedNode};
pub use framework::{
    default_registry, AdapterRegistry, CallableForm, ClassShape, Construct, DeclarationAdapter,
    FunctionShape,
};
pub use java::JavaAdapter;
pub use python::PythonAdapter;
