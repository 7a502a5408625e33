//! Visibility and import computation.
//!
//! Native classes and arrays of invisible classes are inlined where they
//! are used instead of being emitted as named classes. Imports are
//! recomputed from the resolved graph on every call.

use crate::error::ModelError;
use crate::graph::TypeGraph;
use crate::types::{ClassId, ClassKind};
use std::collections::{BTreeSet, HashSet};

/// Imports every class with inner enums needs for its enum-backed fields.
pub const ENUM_SUPPORT_IMPORTS: [&str; 3] = ["java.util.Arrays", "java.util.HashSet", "java.util.Set"];

impl TypeGraph {
    /// Returns true if the class is emitted as a named class.
    ///
    /// # Errors
    /// Returns `ModelError::UseBeforeResolve` if an array element on the
    /// way is still pending.
    pub fn is_visible(&self, id: ClassId) -> Result<bool, ModelError> {
        let mut seen = HashSet::new();
        let mut current = id;
        loop {
            if !seen.insert(current) {
                return Ok(true);
            }
            match self.class(current).kind() {
                ClassKind::Native(_) => return Ok(false),
                ClassKind::Array { element } => current = self.expect_resolved(element)?,
                ClassKind::Composite | ClassKind::MultiType => return Ok(true),
            }
        }
    }

    /// Collects the imports a class declaration needs.
    ///
    /// This is the union of the class's declared imports, the imports of
    /// a visible array element, of every visible non-enum member type and
    /// of every inner class, plus
    /// [`ENUM_SUPPORT_IMPORTS`] when the class has inner enums.
    ///
    /// # Errors
    /// Returns `ModelError::UseBeforeResolve` if the graph is not resolved.
    pub fn collect_imports(&self, id: ClassId) -> Result<BTreeSet<String>, ModelError> {
        let mut imports = BTreeSet::new();
        let mut visited = HashSet::new();
        let mut pending = vec![id];

        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            let class = self.class(current);
            imports.extend(class.declared_imports().iter().cloned());

            if let Some(element) = class.kind().element() {
                let element = self.expect_resolved(element)?;
                if self.is_visible(element)? {
                    pending.push(element);
                }
            }
            for member in class.members().iter().filter(|m| !m.is_enum) {
                let member_type = self.expect_resolved(&member.type_ref)?;
                if self.is_visible(member_type)? {
                    pending.push(member_type);
                }
            }
            for inner in class.inner_types() {
                pending.push(self.expect_resolved(inner)?);
            }
            if class.has_inner_enums() {
                imports.extend(ENUM_SUPPORT_IMPORTS.iter().map(|i| i.to_string()));
            }
        }
        Ok(imports)
    }

    /// Adds the imports of the applicable class modules and parent module
    /// to the declared imports of a visible class and its inner classes.
    ///
    /// # Errors
    /// Returns `ModelError::UseBeforeResolve` if the graph is not resolved.
    pub fn apply_module_imports(&mut self, id: ClassId) -> Result<(), ModelError> {
        if !self.is_visible(id)? {
            return Ok(());
        }
        let class = self.class(id);
        let namespace = self.namespace(class.namespace());
        let inner = class.is_inner();

        let mut added = BTreeSet::new();
        for module in namespace.modules_for(inner) {
            added.extend(module.imports(self, id));
        }
        if let Some(parent) = namespace.parent_module_for(inner) {
            added.extend(parent.imports(self, id));
        }
        let inner_types = class
            .inner_types()
            .iter()
            .map(|t| self.expect_resolved(t))
            .collect::<Result<Vec<_>, _>>()?;

        self.classes[id.index()].imports.extend(added);
        for inner in inner_types {
            self.apply_module_imports(inner)?;
        }
        Ok(())
    }
}
