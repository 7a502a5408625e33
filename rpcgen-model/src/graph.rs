//! Type graph: class arena plus the registry of global types.
//!
//! The graph is the single context object of a generation run. Ingestion
//! registers global classes and attaches members to them, possibly
//! referring to types that are registered later; consumers then resolve
//! those references on demand (see [`resolve`](crate::resolve)).

use crate::error::ModelError;
use crate::types::{
    ClassId, ClassKind, ClassNode, Constructor, EnumDef, Member, Namespace, NamespaceId, TypeRef,
};
use std::collections::HashMap;

/// Arena of classes and namespaces with the global type registry.
#[derive(Debug, Default)]
pub struct TypeGraph {
    pub(crate) namespaces: Vec<Namespace>,
    pub(crate) classes: Vec<ClassNode>,
    globals: HashMap<String, ClassId>,
    /// API types in first-registration order.
    global_order: Vec<String>,
    strict: bool,
}

impl TypeGraph {
    /// Creates an empty graph where re-registration overwrites.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph that rejects re-registration of an identifier.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Adds a namespace.
    pub fn add_namespace(&mut self, namespace: Namespace) -> NamespaceId {
        let id = NamespaceId::new(self.namespaces.len());
        tracing::debug!("Added namespace {}", namespace.name);
        self.namespaces.push(namespace);
        id
    }

    /// Gets a namespace by handle.
    #[must_use]
    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    /// Gets a mutable namespace by handle.
    pub fn namespace_mut(&mut self, id: NamespaceId) -> &mut Namespace {
        &mut self.namespaces[id.index()]
    }

    /// Looks up a namespace by name.
    #[must_use]
    pub fn namespace_by_name(&self, name: &str) -> Option<NamespaceId> {
        self.namespaces
            .iter()
            .position(|ns| ns.name == name)
            .map(NamespaceId::new)
    }

    /// Returns all namespace handles in creation order.
    pub fn namespaces(&self) -> impl Iterator<Item = NamespaceId> + '_ {
        (0..self.namespaces.len()).map(NamespaceId::new)
    }

    /// Adds a global enum to a namespace.
    pub fn add_global_enum(&mut self, namespace: NamespaceId, enum_def: EnumDef) {
        self.namespaces[namespace.index()].enums.push(enum_def);
    }

    /// Creates a global class and registers it under its API type.
    ///
    /// # Errors
    /// Returns `ModelError::DuplicateRegistration` on a strict graph if the
    /// identifier is already registered.
    pub fn register_global_type(
        &mut self,
        api_type: &str,
        raw_name: &str,
        namespace: NamespaceId,
        kind: ClassKind,
    ) -> Result<ClassId, ModelError> {
        let id = self.push_class(ClassNode::new(
            namespace,
            Some(raw_name.to_string()),
            Some(api_type.to_string()),
            kind,
        ));
        self.register(api_type, id)?;
        Ok(id)
    }

    /// Creates an anonymous class, typically an inner class or a member
    /// type without a global identifier.
    pub fn create_anonymous_type(
        &mut self,
        namespace: NamespaceId,
        guessed_name: Option<&str>,
        kind: ClassKind,
    ) -> ClassId {
        self.push_class(ClassNode::new(
            namespace,
            guessed_name.map(str::to_string),
            None,
            kind,
        ))
    }

    /// Creates a symbolic reference to a global type.
    #[must_use]
    pub fn create_unresolved_reference(&self, api_type: &str) -> TypeRef {
        TypeRef::unresolved(api_type)
    }

    /// Registers a class as the canonical node of an API type.
    ///
    /// # Errors
    /// Returns `ModelError::DuplicateRegistration` on a strict graph if a
    /// different class is already registered under the identifier.
    pub fn register(&mut self, api_type: &str, id: ClassId) -> Result<(), ModelError> {
        match self.globals.insert(api_type.to_string(), id) {
            None => self.global_order.push(api_type.to_string()),
            Some(previous) if previous != id => {
                if self.strict {
                    self.globals.insert(api_type.to_string(), previous);
                    return Err(ModelError::DuplicateRegistration {
                        api_type: api_type.to_string(),
                    });
                }
                tracing::warn!("Type {} registered twice, last registration wins", api_type);
            }
            Some(_) => {}
        }
        Ok(())
    }

    /// Looks up the canonical class of an API type.
    #[must_use]
    pub fn lookup(&self, api_type: &str) -> Option<ClassId> {
        self.globals.get(api_type).copied()
    }

    /// Returns the registered global classes in registration order.
    pub fn global_classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.global_order.iter().filter_map(|t| self.lookup(t))
    }

    /// Returns the global classes of one namespace in registration order.
    #[must_use]
    pub fn classes_in_namespace(&self, namespace: NamespaceId) -> Vec<ClassId> {
        self.global_classes()
            .filter(|&id| self.class(id).namespace == namespace)
            .collect()
    }

    /// Returns the classes declared at the top level of a namespace:
    /// composites and multitypes without an owner, in creation order.
    /// Classes displaced by a later registration are skipped.
    #[must_use]
    pub fn top_level_classes(&self, namespace: NamespaceId) -> Vec<ClassId> {
        self.classes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.namespace == namespace && c.is_global())
            .filter(|(_, c)| matches!(c.kind, ClassKind::Composite | ClassKind::MultiType))
            .map(|(index, _)| ClassId::new(index))
            .filter(|&id| match self.class(id).api_type() {
                Some(api_type) => self.lookup(api_type) == Some(id),
                None => true,
            })
            .collect()
    }

    /// Returns the number of classes in the arena.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Gets a class by handle.
    #[must_use]
    pub fn class(&self, id: ClassId) -> &ClassNode {
        &self.classes[id.index()]
    }

    /// Returns the members of a class, sorted by name.
    #[must_use]
    pub fn members(&self, id: ClassId) -> &[Member] {
        self.class(id).members()
    }

    /// Returns the inner classes of a class.
    #[must_use]
    pub fn inner_types(&self, id: ClassId) -> &[TypeRef] {
        self.class(id).inner_types()
    }

    /// Returns the inner enums of a class.
    #[must_use]
    pub fn inner_enums(&self, id: ClassId) -> &[EnumDef] {
        self.class(id).inner_enums()
    }

    /// Returns the constructors of a class.
    #[must_use]
    pub fn constructors(&self, id: ClassId) -> &[Constructor] {
        self.class(id).constructors()
    }

    /// Sets the parent class.
    ///
    /// # Errors
    /// Returns `ModelError::ClassFrozen` if the class is already resolved.
    pub fn set_parent(&mut self, id: ClassId, parent: TypeRef) -> Result<(), ModelError> {
        self.class_mut(id)?.parent = Some(parent);
        Ok(())
    }

    /// Turns the class into an array of the given element type.
    ///
    /// # Errors
    /// Returns `ModelError::ClassFrozen` if the class is already resolved.
    pub fn set_array_element(&mut self, id: ClassId, element: TypeRef) -> Result<(), ModelError> {
        self.class_mut(id)?.kind = ClassKind::Array { element };
        Ok(())
    }

    /// Changes the nature of a class.
    ///
    /// # Errors
    /// Returns `ModelError::ClassFrozen` if the class is already resolved.
    pub fn set_kind(&mut self, id: ClassId, kind: ClassKind) -> Result<(), ModelError> {
        self.class_mut(id)?.kind = kind;
        Ok(())
    }

    /// Adds an inner class and points its owner back at `owner`.
    ///
    /// # Errors
    /// Returns `ModelError::ClassFrozen` if either class is already resolved.
    pub fn link_inner_type(&mut self, owner: ClassId, inner: ClassId) -> Result<(), ModelError> {
        self.class_mut(owner)?;
        self.class_mut(inner)?.owner = Some(owner);
        self.classes[owner.index()].inner_types.push(TypeRef::Resolved(inner));
        Ok(())
    }

    /// Adds an inner enum owned by `owner`.
    ///
    /// # Errors
    /// Returns `ModelError::ClassFrozen` if the owner is already resolved.
    pub fn link_inner_enum(&mut self, owner: ClassId, mut enum_def: EnumDef) -> Result<(), ModelError> {
        enum_def.set_owner(owner);
        self.class_mut(owner)?.inner_enums.push(enum_def);
        Ok(())
    }

    /// Adds a member, keeping members sorted by name.
    ///
    /// # Errors
    /// Returns `ModelError::ClassFrozen` if the class is already resolved.
    pub fn add_member(&mut self, id: ClassId, member: Member) -> Result<(), ModelError> {
        self.class_mut(id)?.insert_member(member);
        Ok(())
    }

    /// Adds a constructor.
    ///
    /// # Errors
    /// Returns `ModelError::ClassFrozen` if the class is already resolved.
    pub fn add_constructor(&mut self, id: ClassId, constructor: Constructor) -> Result<(), ModelError> {
        self.class_mut(id)?.constructors.push(constructor);
        Ok(())
    }

    /// Declares an import needed by the class itself.
    ///
    /// # Errors
    /// Returns `ModelError::ClassFrozen` if the class is already resolved.
    pub fn add_import(&mut self, id: ClassId, import: impl Into<String>) -> Result<(), ModelError> {
        self.class_mut(id)?.imports.insert(import.into());
        Ok(())
    }

    /// Returns the canonical class of a reference without resolving it.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownType` if the referenced type is not
    /// registered.
    pub fn peek(&self, type_ref: &TypeRef) -> Result<ClassId, ModelError> {
        match type_ref {
            TypeRef::Resolved(id) => Ok(*id),
            TypeRef::Unresolved(r) => self
                .lookup(r.api_type())
                .ok_or_else(|| ModelError::unknown_type(r.api_type())),
        }
    }

    /// Returns the linked class of a reference that must already be resolved.
    ///
    /// # Errors
    /// Returns `ModelError::UseBeforeResolve` for a pending reference.
    pub fn expect_resolved(&self, type_ref: &TypeRef) -> Result<ClassId, ModelError> {
        match type_ref {
            TypeRef::Resolved(id) => Ok(*id),
            TypeRef::Unresolved(r) => Err(ModelError::use_before_resolve(r.api_type())),
        }
    }

    fn push_class(&mut self, node: ClassNode) -> ClassId {
        let id = ClassId::new(self.classes.len());
        self.classes.push(node);
        id
    }

    fn class_mut(&mut self, id: ClassId) -> Result<&mut ClassNode, ModelError> {
        let node = &mut self.classes[id.index()];
        if node.resolved {
            return Err(ModelError::ClassFrozen {
                class: node.label().to_string(),
            });
        }
        Ok(node)
    }
}
