//! Class-level behavior modules.
//!
//! A namespace carries the modules applied when its classes are rendered.
//! Modules contribute imports and extra source to a class declaration; a
//! parent module supplies the superclass of classes that do not extend
//! another schema type.

use crate::error::ModelError;
use crate::graph::TypeGraph;
use crate::types::ClassId;
use std::collections::BTreeSet;

/// Extension rendering additional code into a class declaration.
pub trait ClassModule {
    /// Returns the module name, used in diagnostics.
    fn name(&self) -> &str;

    /// Returns the imports the module needs for the given class.
    fn imports(&self, graph: &TypeGraph, class: ClassId) -> BTreeSet<String>;

    /// Renders the module's contribution into a class body.
    ///
    /// # Errors
    /// Returns `ModelError` if the class graph cannot be read.
    fn render(
        &self,
        _out: &mut String,
        _prefix: &str,
        _graph: &TypeGraph,
        _class: ClassId,
    ) -> Result<(), ModelError> {
        Ok(())
    }
}

/// Extension supplying a common superclass.
pub trait ParentModule {
    /// Returns the superclass name used in `extends` clauses.
    fn superclass(&self) -> &str;

    /// Returns the imports the superclass needs.
    fn imports(&self, _graph: &TypeGraph, _class: ClassId) -> BTreeSet<String> {
        BTreeSet::new()
    }
}
