//! Type graph validation.
//!
//! Run after resolution, before rendering, to catch graphs that would
//! produce uncompilable code.

use crate::error::ModelError;
use crate::graph::TypeGraph;
use crate::types::{ClassId, ClassKind, ClassNode, EnumDef, NativeType, TypeRef};
use std::collections::HashSet;

/// Validates a resolved type graph.
///
/// # Arguments
/// * `graph` - The graph to validate
///
/// # Returns
/// Ok(()) if valid, or ModelError describing the first issue.
///
/// # Errors
/// Returns `ModelError` if validation fails.
pub fn validate_graph(graph: &TypeGraph) -> Result<(), ModelError> {
    validate_classes(graph)?;
    validate_inheritance(graph)?;
    validate_enums(graph)?;
    Ok(())
}

/// Validates every class in the arena.
fn validate_classes(graph: &TypeGraph) -> Result<(), ModelError> {
    for class in &graph.classes {
        validate_references(graph, class)?;

        if let ClassKind::Native(label) = class.kind() {
            if NativeType::from_schema_name(label).is_none() {
                return Err(ModelError::unknown_native(label.as_str()));
            }
        }

        let mut seen_names = HashSet::new();
        for member in class.members() {
            if !seen_names.insert(member.name.as_str()) {
                return Err(ModelError::validation(format!(
                    "Duplicate member '{}' in class '{}'",
                    member.name,
                    class.label()
                )));
            }
        }
    }
    Ok(())
}

/// Checks that every reference held by a class is resolved.
fn validate_references(graph: &TypeGraph, class: &ClassNode) -> Result<(), ModelError> {
    let refs = class
        .parent()
        .into_iter()
        .chain(class.kind().element())
        .chain(class.inner_types())
        .chain(class.members().iter().map(|m| &m.type_ref));

    for type_ref in refs {
        graph.expect_resolved(type_ref)?;
    }
    Ok(())
}

/// Checks that no class is its own ancestor.
fn validate_inheritance(graph: &TypeGraph) -> Result<(), ModelError> {
    for start in graph.global_classes() {
        let mut seen = HashSet::new();
        let mut path = vec![start];
        let mut current = start;
        seen.insert(current);

        while let Some(TypeRef::Resolved(parent)) = graph.class(current).parent() {
            path.push(*parent);
            if !seen.insert(*parent) {
                return Err(ModelError::CircularInheritance {
                    path: format_path(graph, &path),
                });
            }
            current = *parent;
        }
    }
    Ok(())
}

/// Checks that enums declare at least one literal.
fn validate_enums(graph: &TypeGraph) -> Result<(), ModelError> {
    let global = graph.namespaces().flat_map(|ns| graph.namespace(ns).enums());
    let inner = graph.classes.iter().flat_map(ClassNode::inner_enums);

    for enum_def in global.chain(inner) {
        validate_enum(enum_def)?;
    }
    Ok(())
}

/// Validates a single enum.
fn validate_enum(enum_def: &EnumDef) -> Result<(), ModelError> {
    if enum_def.values().is_empty() {
        return Err(ModelError::validation(format!(
            "Enum '{}' has no values",
            enum_def.name()
        )));
    }
    Ok(())
}

fn format_path(graph: &TypeGraph, path: &[ClassId]) -> String {
    path.iter()
        .map(|&id| graph.class(id).label())
        .collect::<Vec<_>>()
        .join(" -> ")
}
