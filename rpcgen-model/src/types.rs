//! Type model definitions.
//!
//! This module contains the data structures the type graph is made of:
//! class nodes, members, enums, constructors and namespaces, plus the
//! handles and references used to link them together.

use crate::module::{ClassModule, ParentModule};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Handle to a class node stored in a [`TypeGraph`](crate::graph::TypeGraph).
///
/// Two handles are equal iff they point at the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

impl ClassId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index of this class.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Handle to a namespace stored in a [`TypeGraph`](crate::graph::TypeGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(usize);

impl NamespaceId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index of this namespace.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Placeholder standing for a global type that may not be registered yet.
///
/// It only remembers the API type identifier; everything else is obtained
/// by resolving it through the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnresolvedRef {
    api_type: String,
}

impl UnresolvedRef {
    /// Creates a reference to the given API type.
    #[must_use]
    pub fn new(api_type: impl Into<String>) -> Self {
        Self {
            api_type: api_type.into(),
        }
    }

    /// Returns the referenced API type identifier.
    #[must_use]
    pub fn api_type(&self) -> &str {
        &self.api_type
    }
}

/// A link from one node of the graph to a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Symbolic reference, pending resolution.
    Unresolved(UnresolvedRef),
    /// Direct link to a class node.
    Resolved(ClassId),
}

impl TypeRef {
    /// Creates a symbolic reference to a global type.
    #[must_use]
    pub fn unresolved(api_type: impl Into<String>) -> Self {
        Self::Unresolved(UnresolvedRef::new(api_type))
    }

    /// Returns true if this is a direct link.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Returns the linked class, if resolved.
    #[must_use]
    pub const fn class_id(&self) -> Option<ClassId> {
        match self {
            Self::Resolved(id) => Some(*id),
            Self::Unresolved(_) => None,
        }
    }
}

impl From<ClassId> for TypeRef {
    fn from(id: ClassId) -> Self {
        Self::Resolved(id)
    }
}

/// The four JSON schema primitives that map to target classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// `boolean`
    Boolean,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `string`
    String,
}

impl NativeType {
    /// Parses a native type from its schema label.
    #[must_use]
    pub fn from_schema_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    /// Returns the schema label.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::String => "string",
        }
    }

    /// Returns the target language class name.
    #[must_use]
    pub const fn target_name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Number => "Double",
            Self::Integer => "Integer",
            Self::String => "String",
        }
    }
}

/// Nature of a class node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassKind {
    /// Primitive, carrying the raw schema label (checked when named).
    Native(String),
    /// Class with members and inner types.
    Composite,
    /// List of another type.
    Array {
        /// Element type.
        element: TypeRef,
    },
    /// Choice among several primitive or enum variants.
    MultiType,
}

impl ClassKind {
    /// Creates a native kind from a known primitive.
    #[must_use]
    pub fn native(native: NativeType) -> Self {
        Self::Native(native.schema_name().to_string())
    }

    /// Creates an array kind.
    #[must_use]
    pub fn array(element: impl Into<TypeRef>) -> Self {
        Self::Array {
            element: element.into(),
        }
    }

    /// Returns true if this is a native kind.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// Returns true if this is an array kind.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Returns true if this is a multitype.
    #[must_use]
    pub const fn is_multi_type(&self) -> bool {
        matches!(self, Self::MultiType)
    }

    /// Returns the element type of an array kind.
    #[must_use]
    pub const fn element(&self) -> Option<&TypeRef> {
        match self {
            Self::Array { element } => Some(element),
            _ => None,
        }
    }
}

/// A declared or synthesized class.
#[derive(Debug, Clone)]
pub struct ClassNode {
    pub(crate) namespace: NamespaceId,
    pub(crate) name: Option<String>,
    pub(crate) api_type: Option<String>,
    pub(crate) kind: ClassKind,
    pub(crate) parent: Option<TypeRef>,
    pub(crate) owner: Option<ClassId>,
    pub(crate) inner_types: Vec<TypeRef>,
    pub(crate) inner_enums: Vec<EnumDef>,
    pub(crate) members: Vec<Member>,
    pub(crate) constructors: Vec<Constructor>,
    pub(crate) imports: BTreeSet<String>,
    pub(crate) resolved: bool,
}

impl ClassNode {
    pub(crate) fn new(
        namespace: NamespaceId,
        name: Option<String>,
        api_type: Option<String>,
        kind: ClassKind,
    ) -> Self {
        Self {
            namespace,
            name,
            api_type,
            kind,
            parent: None,
            owner: None,
            inner_types: Vec::new(),
            inner_enums: Vec::new(),
            members: Vec::new(),
            constructors: Vec::new(),
            imports: BTreeSet::new(),
            resolved: false,
        }
    }

    /// Returns the declaring namespace.
    #[must_use]
    pub const fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    /// Returns the raw (schema-level) name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the API type identifier for global classes.
    #[must_use]
    pub fn api_type(&self) -> Option<&str> {
        self.api_type.as_deref()
    }

    /// Returns the class nature.
    #[must_use]
    pub const fn kind(&self) -> &ClassKind {
        &self.kind
    }

    /// Returns the parent class reference.
    #[must_use]
    pub const fn parent(&self) -> Option<&TypeRef> {
        self.parent.as_ref()
    }

    /// Returns true if the class extends another one.
    #[must_use]
    pub const fn does_extend(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the owning class of an inner class.
    #[must_use]
    pub const fn owner(&self) -> Option<ClassId> {
        self.owner
    }

    /// Returns true if the class is nested in another one.
    #[must_use]
    pub const fn is_inner(&self) -> bool {
        self.owner.is_some()
    }

    /// Returns true if the class is a top-level class of its namespace.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns true once the class went through resolution.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Returns the inner classes.
    #[must_use]
    pub fn inner_types(&self) -> &[TypeRef] {
        &self.inner_types
    }

    /// Returns the inner enums.
    #[must_use]
    pub fn inner_enums(&self) -> &[EnumDef] {
        &self.inner_enums
    }

    /// Returns true if the class has inner classes.
    #[must_use]
    pub fn has_inner_types(&self) -> bool {
        !self.inner_types.is_empty()
    }

    /// Returns true if the class has inner enums.
    #[must_use]
    pub fn has_inner_enums(&self) -> bool {
        !self.inner_enums.is_empty()
    }

    /// Returns the members, sorted by name.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Returns the constructors in declaration order.
    #[must_use]
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Returns the imports declared on this class only.
    #[must_use]
    pub const fn declared_imports(&self) -> &BTreeSet<String> {
        &self.imports
    }

    /// Returns a label suitable for diagnostics.
    #[must_use]
    pub fn label(&self) -> &str {
        self.api_type
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("<anonymous>")
    }

    pub(crate) fn insert_member(&mut self, member: Member) {
        let pos = self.members.partition_point(|m| m.name <= member.name);
        self.members.insert(pos, member);
    }
}

/// Member (field) of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name as declared in the schema.
    pub name: String,
    /// Member type.
    pub type_ref: TypeRef,
    /// Whether the member holds an enum literal, emitted as plain text.
    pub is_enum: bool,
    /// Description.
    pub description: Option<String>,
}

impl Member {
    /// Creates a new member.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            is_enum: false,
            description: None,
        }
    }

    /// Creates a member backed by an enum.
    #[must_use]
    pub fn enum_backed(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            is_enum: true,
            ..Self::new(name, type_ref)
        }
    }
}

/// Enumeration of string literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    name: String,
    owner: Option<ClassId>,
    values: Vec<String>,
}

impl EnumDef {
    /// Creates a new enum. Duplicate literals are dropped, order is kept.
    #[must_use]
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = String>) -> Self {
        let mut seen = BTreeSet::new();
        let values = values
            .into_iter()
            .filter(|v| seen.insert(v.clone()))
            .collect();
        Self {
            name: name.into(),
            owner: None,
            values,
        }
    }

    /// Returns the raw enum name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owning class of an inner enum.
    #[must_use]
    pub const fn owner(&self) -> Option<ClassId> {
        self.owner
    }

    /// Returns true if the enum is nested in a class.
    #[must_use]
    pub const fn is_inner(&self) -> bool {
        self.owner.is_some()
    }

    /// Returns the literal values in declaration order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn set_owner(&mut self, owner: ClassId) {
        self.owner = Some(owner);
    }
}

/// Constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub type_ref: TypeRef,
    /// Whether the parameter holds an enum literal.
    pub is_enum: bool,
}

impl Parameter {
    /// Creates a new parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            is_enum: false,
        }
    }
}

/// Constructor of a class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constructor {
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
}

impl Constructor {
    /// Creates a constructor from its parameters.
    #[must_use]
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }
}

/// Logical API module grouping classes and enums.
///
/// Carries the behavior modules applied when rendering its classes: one set
/// for classes declared directly in the namespace and an independent set for
/// their inner classes.
#[derive(Clone, Default)]
pub struct Namespace {
    /// Namespace name, e.g. `VideoModel`.
    pub name: String,
    /// Modules applied to global classes.
    pub class_modules: Vec<Rc<dyn ClassModule>>,
    /// Modules applied to inner classes.
    pub inner_class_modules: Vec<Rc<dyn ClassModule>>,
    /// Superclass provider for global classes.
    pub parent_module: Option<Rc<dyn ParentModule>>,
    /// Superclass provider for inner classes.
    pub inner_parent_module: Option<Rc<dyn ParentModule>>,
    pub(crate) enums: Vec<EnumDef>,
}

impl Namespace {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a module applied to global classes.
    #[must_use]
    pub fn with_class_module(mut self, module: Rc<dyn ClassModule>) -> Self {
        self.class_modules.push(module);
        self
    }

    /// Adds a module applied to inner classes.
    #[must_use]
    pub fn with_inner_class_module(mut self, module: Rc<dyn ClassModule>) -> Self {
        self.inner_class_modules.push(module);
        self
    }

    /// Sets the superclass provider for global classes.
    #[must_use]
    pub fn with_parent_module(mut self, module: Rc<dyn ParentModule>) -> Self {
        self.parent_module = Some(module);
        self
    }

    /// Sets the superclass provider for inner classes.
    #[must_use]
    pub fn with_inner_parent_module(mut self, module: Rc<dyn ParentModule>) -> Self {
        self.inner_parent_module = Some(module);
        self
    }

    /// Returns the global enums declared in this namespace.
    #[must_use]
    pub fn enums(&self) -> &[EnumDef] {
        &self.enums
    }

    /// Returns the class modules applicable to a class.
    #[must_use]
    pub fn modules_for(&self, inner: bool) -> &[Rc<dyn ClassModule>] {
        if inner {
            &self.inner_class_modules
        } else {
            &self.class_modules
        }
    }

    /// Returns the parent module applicable to a class.
    #[must_use]
    pub fn parent_module_for(&self, inner: bool) -> Option<&Rc<dyn ParentModule>> {
        if inner {
            self.inner_parent_module.as_ref()
        } else {
            self.parent_module.as_ref()
        }
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |modules: &[Rc<dyn ClassModule>]| {
            modules.iter().map(|m| m.name().to_string()).collect::<Vec<_>>()
        };
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("class_modules", &names(&self.class_modules))
            .field("inner_class_modules", &names(&self.inner_class_modules))
            .field(
                "parent_module",
                &self.parent_module.as_ref().map(|m| m.superclass().to_string()),
            )
            .field(
                "inner_parent_module",
                &self
                    .inner_parent_module
                    .as_ref()
                    .map(|m| m.superclass().to_string()),
            )
            .field("enums", &self.enums)
            .finish()
    }
}
