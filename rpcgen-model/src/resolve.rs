//! Reference resolution.
//!
//! Turns symbolic references into direct links to the canonical class
//! registered for each API type. Resolution walks the graph with an
//! explicit worklist, so chain depth is bounded by memory, not by the
//! stack. It runs in two phases: every reference reachable from the
//! starting class is looked up first, and only when all of them exist are
//! the classes marked and their references rewritten. A failed resolution
//! leaves the graph untouched, and a resolved class only ever reaches
//! resolved classes.

use crate::error::ModelError;
use crate::graph::TypeGraph;
use crate::types::{ClassId, ClassKind, TypeRef};
use std::collections::HashSet;

/// Canonical targets of every reference held by one class.
#[derive(Debug)]
struct Links {
    parent: Option<ClassId>,
    element: Option<ClassId>,
    inner_types: Vec<ClassId>,
    members: Vec<ClassId>,
}

impl Links {
    fn targets(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.parent
            .iter()
            .chain(&self.element)
            .chain(&self.inner_types)
            .chain(&self.members)
            .copied()
    }
}

impl TypeGraph {
    /// Resolves a reference and returns the canonical class it stands for.
    ///
    /// Two references carrying the same API type always yield the same
    /// handle. Resolving an already resolved class is a no-op.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownType` if the reference, or any reference
    /// reachable from the class, names an unregistered type.
    pub fn resolve(&mut self, type_ref: &TypeRef) -> Result<ClassId, ModelError> {
        let id = self.peek(type_ref)?;
        self.resolve_class(id)
    }

    /// Resolves every reference reachable from a class.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownType` if a reachable reference names an
    /// unregistered type. Nothing is marked in that case, so a later call
    /// reports the same error.
    pub fn resolve_class(&mut self, id: ClassId) -> Result<ClassId, ModelError> {
        if self.classes[id.index()].resolved {
            return Ok(id);
        }
        for (class, links) in self.plan_resolution(id)? {
            self.apply_links(class, links);
        }
        Ok(id)
    }

    /// Resolves every registered global class, then every class left in
    /// the arena.
    ///
    /// # Errors
    /// Returns the first resolution error encountered.
    pub fn resolve_all(&mut self) -> Result<(), ModelError> {
        let globals: Vec<ClassId> = self.global_classes().collect();
        for id in globals {
            self.resolve_class(id)?;
        }
        for index in 0..self.classes.len() {
            self.resolve_class(ClassId::new(index))?;
        }
        tracing::debug!("Resolved {} classes", self.classes.len());
        Ok(())
    }

    /// Looks up the links of every unresolved class reachable from `start`
    /// without modifying the graph.
    fn plan_resolution(&self, start: ClassId) -> Result<Vec<(ClassId, Links)>, ModelError> {
        let mut plan = Vec::new();
        let mut seen = HashSet::from([start]);
        let mut pending = vec![start];

        while let Some(current) = pending.pop() {
            let links = self.links_of(current)?;
            for target in links.targets() {
                if !self.classes[target.index()].resolved && seen.insert(target) {
                    pending.push(target);
                }
            }
            plan.push((current, links));
        }
        Ok(plan)
    }

    fn links_of(&self, id: ClassId) -> Result<Links, ModelError> {
        let node = &self.classes[id.index()];
        Ok(Links {
            parent: node.parent.as_ref().map(|r| self.peek(r)).transpose()?,
            element: node.kind.element().map(|r| self.peek(r)).transpose()?,
            inner_types: node
                .inner_types
                .iter()
                .map(|r| self.peek(r))
                .collect::<Result<_, _>>()?,
            members: node
                .members
                .iter()
                .map(|m| self.peek(&m.type_ref))
                .collect::<Result<_, _>>()?,
        })
    }

    fn apply_links(&mut self, id: ClassId, links: Links) {
        let node = &mut self.classes[id.index()];
        node.resolved = true;
        tracing::trace!("Resolving {}", node.label());

        if let Some(parent) = links.parent {
            node.parent = Some(TypeRef::Resolved(parent));
        }
        if let Some(element) = links.element {
            node.kind = ClassKind::Array {
                element: TypeRef::Resolved(element),
            };
        }
        for (slot, inner) in node.inner_types.iter_mut().zip(links.inner_types) {
            *slot = TypeRef::Resolved(inner);
        }
        for (member, target) in node.members.iter_mut().zip(links.members) {
            member.type_ref = TypeRef::Resolved(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Member, Namespace, NamespaceId, NativeType};

    fn graph_with_namespace() -> (TypeGraph, NamespaceId) {
        let mut graph = TypeGraph::new();
        let ns = graph.add_namespace(Namespace::new("VideoModel"));
        (graph, ns)
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let (mut graph, ns) = graph_with_namespace();
        let id = graph
            .register_global_type("Video.Cast", "Cast", ns, ClassKind::Composite)
            .expect("Failed to register");

        let first = graph
            .resolve(&TypeRef::unresolved("Video.Cast"))
            .expect("Failed to resolve");
        let second = graph
            .resolve(&TypeRef::Resolved(first))
            .expect("Failed to resolve");

        assert_eq!(first, id);
        assert_eq!(second, first);
        assert!(graph.class(id).is_resolved());
    }

    #[test]
    fn test_references_unify_to_one_class() {
        let (mut graph, ns) = graph_with_namespace();
        let a = graph.create_unresolved_reference("Library.Id");
        let b = graph.create_unresolved_reference("Library.Id");
        let id = graph
            .register_global_type("Library.Id", "Id", ns, ClassKind::native(NativeType::Integer))
            .expect("Failed to register");

        let ra = graph.resolve(&a).expect("Failed to resolve");
        let rb = graph.resolve(&b).expect("Failed to resolve");
        assert_eq!(ra, rb);
        assert_eq!(ra, id);
    }

    #[test]
    fn test_unknown_type_fails() {
        let (mut graph, _) = graph_with_namespace();
        let result = graph.resolve(&TypeRef::unresolved("Nope.Missing"));
        assert!(matches!(
            result,
            Err(ModelError::UnknownType { ref api_type }) if api_type == "Nope.Missing"
        ));
    }

    #[test]
    fn test_unknown_member_type_fails() {
        let (mut graph, ns) = graph_with_namespace();
        let id = graph
            .register_global_type("Video.Details.Base", "Details.Base", ns, ClassKind::Composite)
            .expect("Failed to register");
        graph
            .add_member(id, Member::new("art", TypeRef::unresolved("Media.Artwork")))
            .expect("Failed to add member");

        let err = graph.resolve_class(id).expect_err("Expected failure");
        assert!(err.to_string().contains("Media.Artwork"));
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let (mut graph, ns) = graph_with_namespace();
        let a = graph
            .register_global_type("Test.A", "A", ns, ClassKind::Composite)
            .expect("Failed to register");
        let b = graph
            .register_global_type("Test.B", "B", ns, ClassKind::Composite)
            .expect("Failed to register");
        graph
            .set_parent(a, TypeRef::unresolved("Test.B"))
            .expect("Failed to set parent");
        graph
            .set_parent(b, TypeRef::unresolved("Test.A"))
            .expect("Failed to set parent");

        graph.resolve_class(a).expect("Failed to resolve");

        assert!(graph.class(a).is_resolved());
        assert!(graph.class(b).is_resolved());
        assert_eq!(graph.class(a).parent(), Some(&TypeRef::Resolved(b)));
        assert_eq!(graph.class(b).parent(), Some(&TypeRef::Resolved(a)));
    }

    #[test]
    fn test_self_referencing_member_terminates() {
        let (mut graph, ns) = graph_with_namespace();
        let node = graph
            .register_global_type("Tree.Node", "Node", ns, ClassKind::Composite)
            .expect("Failed to register");
        let children = graph.create_anonymous_type(
            ns,
            Some("children"),
            ClassKind::array(TypeRef::unresolved("Tree.Node")),
        );
        graph
            .add_member(node, Member::new("children", children))
            .expect("Failed to add member");

        graph.resolve_class(node).expect("Failed to resolve");

        assert_eq!(
            graph.class(children).kind().element(),
            Some(&TypeRef::Resolved(node))
        );
    }

    #[test]
    fn test_out_of_order_registration() {
        let (mut graph, ns) = graph_with_namespace();
        let movie = graph
            .register_global_type("Video.Details.Movie", "Details.Movie", ns, ClassKind::Composite)
            .expect("Failed to register");
        graph
            .set_parent(movie, TypeRef::unresolved("Video.Details.Base"))
            .expect("Failed to set parent");
        let base = graph
            .register_global_type("Video.Details.Base", "Details.Base", ns, ClassKind::Composite)
            .expect("Failed to register");

        let resolved = graph
            .resolve(&TypeRef::unresolved("Video.Details.Movie"))
            .expect("Failed to resolve");

        assert_eq!(resolved, movie);
        assert_eq!(graph.class(movie).parent(), Some(&TypeRef::Resolved(base)));
    }

    #[test]
    fn test_inner_types_are_resolved_in_place() {
        let (mut graph, ns) = graph_with_namespace();
        let outer = graph
            .register_global_type("Video.Streams", "Streams", ns, ClassKind::Composite)
            .expect("Failed to register");
        let inner = graph.create_anonymous_type(ns, Some("audio"), ClassKind::Composite);
        graph.link_inner_type(outer, inner).expect("Failed to link");
        let string = graph.create_anonymous_type(ns, None, ClassKind::native(NativeType::String));
        graph
            .add_member(inner, Member::new("codec", string))
            .expect("Failed to add member");

        graph.resolve_class(outer).expect("Failed to resolve");

        assert!(graph.class(inner).is_resolved());
        assert!(graph.class(string).is_resolved());
    }

    #[test]
    fn test_resolved_class_is_frozen() {
        let (mut graph, ns) = graph_with_namespace();
        let id = graph
            .register_global_type("Video.Cast", "Cast", ns, ClassKind::Composite)
            .expect("Failed to register");
        graph.resolve_class(id).expect("Failed to resolve");

        let result = graph.add_import(id, "java.util.List");
        assert!(matches!(result, Err(ModelError::ClassFrozen { .. })));
    }

    #[test]
    fn test_resolve_all_reaches_anonymous_classes() {
        let (mut graph, ns) = graph_with_namespace();
        graph
            .register_global_type("Video.Cast", "Cast", ns, ClassKind::Composite)
            .expect("Failed to register");
        let orphan = graph.create_anonymous_type(ns, None, ClassKind::Composite);

        graph.resolve_all().expect("Failed to resolve");
        assert!(graph.class(orphan).is_resolved());
    }

    #[test]
    fn test_failed_resolution_leaves_graph_untouched() {
        let (mut graph, ns) = graph_with_namespace();
        let movie = graph
            .register_global_type("Video.Details.Movie", "Details.Movie", ns, ClassKind::Composite)
            .expect("Failed to register");
        let string = graph.create_anonymous_type(ns, None, ClassKind::native(NativeType::String));
        graph
            .add_member(movie, Member::new("title", string))
            .expect("Failed to add member");
        graph
            .add_member(movie, Member::new("art", TypeRef::unresolved("Media.Artwork")))
            .expect("Failed to add member");

        for _ in 0..2 {
            assert!(matches!(
                graph.resolve_class(movie),
                Err(ModelError::UnknownType { ref api_type }) if api_type == "Media.Artwork"
            ));
        }
        assert!(!graph.class(movie).is_resolved());
        assert!(!graph.class(string).is_resolved());
        assert_eq!(
            graph.members(movie)[0].type_ref,
            TypeRef::unresolved("Media.Artwork")
        );
    }

    #[test]
    fn test_failure_deep_in_the_graph_marks_nothing() {
        let (mut graph, ns) = graph_with_namespace();
        let movie = graph
            .register_global_type("Video.Details.Movie", "Details.Movie", ns, ClassKind::Composite)
            .expect("Failed to register");
        let base = graph
            .register_global_type("Video.Details.Base", "Details.Base", ns, ClassKind::Composite)
            .expect("Failed to register");
        graph
            .set_parent(movie, TypeRef::unresolved("Video.Details.Base"))
            .expect("Failed to set parent");
        graph
            .set_parent(base, TypeRef::unresolved("Media.Details.Base"))
            .expect("Failed to set parent");

        assert!(graph.resolve_class(movie).is_err());
        assert!(!graph.class(movie).is_resolved());
        assert!(!graph.class(base).is_resolved());

        let media = graph.add_namespace(Namespace::new("MediaModel"));
        graph
            .register_global_type("Media.Details.Base", "Details.Base", media, ClassKind::Composite)
            .expect("Failed to register");
        graph.resolve_class(movie).expect("Failed to resolve");
        assert_eq!(graph.class(movie).parent(), Some(&TypeRef::Resolved(base)));
        assert!(graph.class(base).is_resolved());
    }

    #[test]
    fn test_deep_parent_chain_resolves() {
        const DEPTH: usize = 20_000;
        let (mut graph, ns) = graph_with_namespace();
        let mut ids = Vec::with_capacity(DEPTH);
        for i in 0..DEPTH {
            let id = graph
                .register_global_type(&format!("T.C{}", i), &format!("C{}", i), ns, ClassKind::Composite)
                .expect("Failed to register");
            if i + 1 < DEPTH {
                graph
                    .set_parent(id, TypeRef::unresolved(format!("T.C{}", i + 1)))
                    .expect("Failed to set parent");
            }
            ids.push(id);
        }

        let root = graph
            .resolve(&TypeRef::unresolved("T.C0"))
            .expect("Failed to resolve");

        assert_eq!(root, ids[0]);
        assert!(ids.iter().all(|&id| graph.class(id).is_resolved()));
        assert_eq!(
            graph.class(ids[DEPTH - 2]).parent(),
            Some(&TypeRef::Resolved(ids[DEPTH - 1]))
        );
    }
}
