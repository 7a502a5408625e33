//! # rpcgen Model
//!
//! Type model and reference resolution for JSON-RPC model generation.
//!
//! This crate provides:
//! - A type graph of classes, members, enums and constructors
//! - A registry resolving forward and circular references exactly once
//! - Naming rules turning schema identifiers into class names
//! - Visibility and import computation for rendering
//! - Graph validation
//! - Ingestion of JSON-RPC introspect documents

pub mod error;
pub mod graph;
pub mod imports;
pub mod module;
pub mod naming;
pub mod parser;
pub mod resolve;
pub mod types;
pub mod validation;

pub use error::{IntrospectError, ModelError};
pub use graph::TypeGraph;
pub use imports::ENUM_SUPPORT_IMPORTS;
pub use module::{ClassModule, ParentModule};
pub use naming::{NameContext, derive_enum_name, derive_name, plural_to_singular, to_field_name};
pub use parser::{IntrospectOptions, ingest_introspect, parse_introspect};
pub use types::{
    ClassId, ClassKind, ClassNode, Constructor, EnumDef, Member, Namespace, NamespaceId,
    NativeType, Parameter, TypeRef, UnresolvedRef,
};
pub use validation::validate_graph;
