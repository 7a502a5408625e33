//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use rpcgen::prelude::*;
//! ```

// Model types
pub use rpcgen_model::{
    ClassId, ClassKind, ClassModule, EnumDef, IntrospectError, IntrospectOptions, Member,
    ModelError, Namespace, NamespaceId, NativeType, ParentModule, TypeGraph, TypeRef,
    ingest_introspect, parse_introspect, validate_graph,
};

// Codegen types
pub use rpcgen_codegen::{CodegenError, GeneratedUnit, Generator, GeneratorConfig};
