//! # rpcgen
//!
//! Java model generation from JSON-RPC introspect documents.
//!
//! rpcgen reads the `types` section of a JSON-RPC introspect document,
//! builds a graph of classes whose references may point forward or form
//! cycles, resolves every reference exactly once and renders one Java
//! source file per API namespace.
//!
//! ## Features
//!
//! - **Cycle-safe resolution** - Forward and circular references link to a single canonical class
//! - **Readable names** - `Filter.Rule.Albums` becomes `AlbumFilterRule`
//! - **Import computation** - Imports are derived from the resolved graph
//! - **Class modules** - Pluggable extensions contribute imports and code
//!
//! ## Quick Start
//!
//! ```ignore
//! use rpcgen::prelude::*;
//!
//! let mut graph = parse_introspect(&json)?;
//! let generator = Generator::new(&mut graph, GeneratorConfig::new().package("com.example"))?;
//! generator.write_to(Path::new("out"))?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`model`] - Type graph, resolution, naming, imports and ingestion
//! - [`codegen`] - Java source generation

pub mod prelude;

/// Type graph, resolution, naming and introspect ingestion.
pub mod model {
    pub use rpcgen_model::*;
}

/// Java source generation.
pub mod codegen {
    pub use rpcgen_codegen::*;
}

// Re-export commonly used items at the crate root
pub use rpcgen_codegen::{
    CodegenError, GeneratedUnit, Generator, GeneratorConfig, generate_from_file,
    generate_from_json,
};
pub use rpcgen_model::{IntrospectError, ModelError, TypeGraph, parse_introspect};
