//! JSON-RPC introspect ingestion.
//!
//! Reads the `types` section of an introspect document and populates a
//! [`TypeGraph`]. Types are visited in document order; references to types
//! declared further down are kept symbolic and resolved later.

use crate::error::IntrospectError;
use crate::graph::TypeGraph;
use crate::naming::to_camel_case;
use crate::types::{
    ClassId, ClassKind, Constructor, EnumDef, Member, Namespace, NamespaceId, NativeType,
    Parameter, TypeRef,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Options controlling how identifiers map onto namespaces.
#[derive(Debug, Clone)]
pub struct IntrospectOptions {
    namespace_suffix: String,
    default_namespace: String,
}

impl IntrospectOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespace_suffix: "Model".to_string(),
            default_namespace: "Global".to_string(),
        }
    }

    /// Sets the suffix appended to the first identifier segment.
    #[must_use]
    pub fn namespace_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.namespace_suffix = suffix.into();
        self
    }

    /// Sets the namespace used for identifiers without a dot.
    #[must_use]
    pub fn default_namespace(mut self, name: impl Into<String>) -> Self {
        self.default_namespace = name.into();
        self
    }

    /// Splits an API type into its namespace name and raw class name.
    #[must_use]
    pub fn split_api_type<'a>(&self, api_type: &'a str) -> (String, &'a str) {
        match api_type.split_once('.') {
            Some((first, rest)) => (format!("{}{}", first, self.namespace_suffix), rest),
            None => (
                format!("{}{}", self.default_namespace, self.namespace_suffix),
                api_type,
            ),
        }
    }
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IntrospectDocument {
    types: Option<IndexMap<String, SchemaNode>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SchemaNode {
    #[serde(rename = "type")]
    kind: Option<TypeField>,
    #[serde(rename = "$ref")]
    reference: Option<String>,
    extends: Option<Extends>,
    #[serde(default)]
    properties: IndexMap<String, SchemaNode>,
    items: Option<Box<SchemaNode>>,
    #[serde(rename = "enum")]
    enum_values: Option<Vec<Value>>,
    #[serde(default)]
    required: bool,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TypeField {
    Single(String),
    Many(Vec<TypeVariant>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TypeVariant {
    Name(String),
    Node(Box<SchemaNode>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

impl SchemaNode {
    fn type_name(&self) -> Option<&str> {
        match &self.kind {
            Some(TypeField::Single(name)) => Some(name),
            _ => None,
        }
    }

    fn is_object(&self) -> bool {
        self.type_name() == Some("object") || !self.properties.is_empty()
    }

    fn is_string_enum(&self) -> bool {
        self.type_name() == Some("string") && self.enum_values.is_some()
    }

    fn parent(&self) -> Option<&str> {
        match &self.extends {
            Some(Extends::One(parent)) => Some(parent),
            Some(Extends::Many(parents)) => parents.first().map(String::as_str),
            None => None,
        }
    }

    fn variants(&self) -> Vec<SchemaNode> {
        let Some(TypeField::Many(variants)) = &self.kind else {
            return Vec::new();
        };
        variants
            .iter()
            .filter_map(|variant| match variant {
                TypeVariant::Name(name) if name == "null" => None,
                TypeVariant::Name(name) => Some(SchemaNode {
                    kind: Some(TypeField::Single(name.clone())),
                    ..SchemaNode::default()
                }),
                TypeVariant::Node(node) if node.type_name() == Some("null") => None,
                TypeVariant::Node(node) => Some(node.as_ref().clone()),
            })
            .collect()
    }
}

/// Parses an introspect document into a fresh type graph.
///
/// # Errors
/// Returns `IntrospectError` if the document is malformed.
pub fn parse_introspect(json: &str) -> Result<TypeGraph, IntrospectError> {
    let mut graph = TypeGraph::new();
    ingest_introspect(&mut graph, json, &IntrospectOptions::default())?;
    Ok(graph)
}

/// Ingests an introspect document into an existing graph.
///
/// Namespaces already present in the graph (for instance created with
/// their behavior modules) are reused by name.
///
/// # Errors
/// Returns `IntrospectError` if the document is malformed or the graph
/// rejects a registration.
pub fn ingest_introspect(
    graph: &mut TypeGraph,
    json: &str,
    options: &IntrospectOptions,
) -> Result<(), IntrospectError> {
    let document: IntrospectDocument = serde_json::from_str(json)?;
    let types = document.types.ok_or(IntrospectError::MissingTypes)?;

    let mut ingest = Ingest { graph, options };
    for (api_type, node) in &types {
        ingest.global_type(api_type, node)?;
    }
    tracing::debug!("Ingested {} global types", types.len());
    Ok(())
}

struct Ingest<'a> {
    graph: &'a mut TypeGraph,
    options: &'a IntrospectOptions,
}

impl Ingest<'_> {
    fn namespace(&mut self, name: String) -> NamespaceId {
        match self.graph.namespace_by_name(&name) {
            Some(id) => id,
            None => self.graph.add_namespace(Namespace::new(name)),
        }
    }

    fn global_type(&mut self, api_type: &str, node: &SchemaNode) -> Result<(), IntrospectError> {
        let (ns_name, raw_name) = self.options.split_api_type(api_type);
        let ns = self.namespace(ns_name);

        if node.is_string_enum() {
            let values = string_values(api_type, node)?;
            self.graph
                .add_global_enum(ns, EnumDef::new(raw_name, values));
            self.graph.register_global_type(
                api_type,
                raw_name,
                ns,
                ClassKind::native(NativeType::String),
            )?;
            return Ok(());
        }

        let kind = match (&node.kind, node.type_name()) {
            (Some(TypeField::Many(_)), _) => ClassKind::MultiType,
            (_, Some("array")) => {
                let element = self.global_array_element(api_type, raw_name, ns, node)?;
                ClassKind::Array { element }
            }
            (_, Some(name)) if !node.is_object() => ClassKind::Native(name.to_string()),
            _ => ClassKind::Composite,
        };
        let id = self.graph.register_global_type(api_type, raw_name, ns, kind)?;
        tracing::trace!("Registered {}", api_type);
        self.populate(id, ns, api_type, node)
    }

    /// Element of a global array. An inline object becomes a top-level
    /// class carrying the array's own name.
    fn global_array_element(
        &mut self,
        api_type: &str,
        raw_name: &str,
        ns: NamespaceId,
        node: &SchemaNode,
    ) -> Result<TypeRef, IntrospectError> {
        let items = node
            .items
            .as_deref()
            .ok_or_else(|| IntrospectError::invalid_node(api_type, "array without items"))?;

        if items.is_object() {
            let element = self
                .graph
                .create_anonymous_type(ns, Some(raw_name), ClassKind::Composite);
            self.populate(element, ns, api_type, items)?;
            return Ok(element.into());
        }
        if items.is_string_enum() {
            let values = string_values(api_type, items)?;
            self.graph.add_global_enum(ns, EnumDef::new(raw_name, values));
            let string = self.native(ns, NativeType::String.schema_name());
            return Ok(string.into());
        }
        match (&items.reference, items.type_name()) {
            (Some(reference), _) => Ok(TypeRef::unresolved(reference.as_str())),
            (None, Some(name)) => Ok(self.native(ns, name).into()),
            (None, None) => Err(IntrospectError::invalid_node(
                format!("{}.items", api_type),
                "items without type",
            )),
        }
    }

    fn populate(
        &mut self,
        id: ClassId,
        ns: NamespaceId,
        path: &str,
        node: &SchemaNode,
    ) -> Result<(), IntrospectError> {
        if let Some(parent) = node.parent().or(node.reference.as_deref()) {
            self.graph.set_parent(id, TypeRef::unresolved(parent))?;
        }

        let kind = self.graph.class(id).kind();
        let (multi, composite) = (kind.is_multi_type(), matches!(kind, ClassKind::Composite));
        if multi {
            self.variants(id, ns, path, node)
        } else if composite {
            self.properties(id, ns, path, node)
        } else {
            Ok(())
        }
    }

    fn properties(
        &mut self,
        id: ClassId,
        ns: NamespaceId,
        path: &str,
        node: &SchemaNode,
    ) -> Result<(), IntrospectError> {
        let mut parameters = Vec::new();
        for (name, property) in &node.properties {
            let property_path = format!("{}.{}", path, name);
            let (type_ref, is_enum) = self.member_type(id, ns, name, &property_path, property)?;

            if property.required {
                parameters.push(Parameter {
                    name: name.clone(),
                    type_ref: type_ref.clone(),
                    is_enum,
                });
            }
            self.graph.add_member(
                id,
                Member {
                    name: name.clone(),
                    type_ref,
                    is_enum,
                    description: property.description.clone(),
                },
            )?;
        }
        if !parameters.is_empty() {
            self.graph.add_constructor(id, Constructor::new(parameters))?;
        }
        Ok(())
    }

    fn variants(
        &mut self,
        id: ClassId,
        ns: NamespaceId,
        path: &str,
        node: &SchemaNode,
    ) -> Result<(), IntrospectError> {
        let mut used = Vec::new();
        for (index, variant) in node.variants().iter().enumerate() {
            let base = match (&variant.reference, variant.type_name()) {
                (Some(reference), _) => {
                    to_camel_case(reference.rsplit('.').next().unwrap_or(reference))
                }
                (None, Some(name)) => format!("{}Value", name),
                (None, None) => format!("value{}", index),
            };
            let name = if used.contains(&base) {
                format!("{}{}", base, index)
            } else {
                base
            };
            let variant_path = format!("{}.{}", path, name);
            let (type_ref, is_enum) = self.member_type(id, ns, &name, &variant_path, variant)?;
            self.graph.add_member(
                id,
                Member {
                    name: name.clone(),
                    type_ref,
                    is_enum,
                    description: variant.description.clone(),
                },
            )?;
            used.push(name);
        }
        Ok(())
    }

    /// Returns the type of a property, creating inner classes and enums
    /// on `owner` as needed, and whether the property is enum-backed.
    fn member_type(
        &mut self,
        owner: ClassId,
        ns: NamespaceId,
        name: &str,
        path: &str,
        node: &SchemaNode,
    ) -> Result<(TypeRef, bool), IntrospectError> {
        if let Some(reference) = &node.reference {
            return Ok((TypeRef::unresolved(reference.as_str()), false));
        }

        if node.is_string_enum() {
            let values = string_values(path, node)?;
            self.graph.link_inner_enum(owner, EnumDef::new(name, values))?;
            let string = self.native(ns, NativeType::String.schema_name());
            return Ok((string.into(), true));
        }

        if let Some(TypeField::Many(_)) = &node.kind {
            let mut variants = node.variants();
            if variants.len() == 1 {
                let single = variants.remove(0);
                return self.member_type(owner, ns, name, path, &single);
            }
            let multi = self
                .graph
                .create_anonymous_type(ns, Some(name), ClassKind::MultiType);
            self.graph.link_inner_type(owner, multi)?;
            self.variants(multi, ns, path, node)?;
            return Ok((multi.into(), false));
        }

        if node.is_object() {
            let inner = self
                .graph
                .create_anonymous_type(ns, Some(name), ClassKind::Composite);
            self.graph.link_inner_type(owner, inner)?;
            self.populate(inner, ns, path, node)?;
            return Ok((inner.into(), false));
        }

        match node.type_name() {
            Some("array") => {
                let items = node
                    .items
                    .as_deref()
                    .ok_or_else(|| IntrospectError::invalid_node(path, "array without items"))?;
                let (element, _) = self.member_type(owner, ns, name, path, items)?;
                let array = self
                    .graph
                    .create_anonymous_type(ns, None, ClassKind::Array { element });
                Ok((array.into(), false))
            }
            Some(type_name) => Ok((self.native(ns, type_name).into(), false)),
            None => match node.parent() {
                Some(parent) => Ok((TypeRef::unresolved(parent), false)),
                None => Err(IntrospectError::invalid_node(path, "node without type")),
            },
        }
    }

    fn native(&mut self, ns: NamespaceId, label: &str) -> ClassId {
        self.graph
            .create_anonymous_type(ns, Some(label), ClassKind::Native(label.to_string()))
    }
}

fn string_values(path: &str, node: &SchemaNode) -> Result<Vec<String>, IntrospectError> {
    node.enum_values
        .iter()
        .flatten()
        .map(|value| match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(IntrospectError::invalid_string(
                path,
                format!("enum literal {} is not a string", other),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    const INTROSPECT: &str = r#"{
        "types": {
            "Video.Details.Movie": {
                "extends": "Video.Details.Base",
                "properties": {
                    "title": { "type": "string", "required": true },
                    "rating": { "type": "number" },
                    "cast": { "$ref": "Video.Cast" },
                    "resume": {
                        "type": "object",
                        "properties": {
                            "position": { "type": "number" },
                            "total": { "type": "number" }
                        }
                    },
                    "sort": { "type": "string", "enum": ["asc", "desc"] },
                    "tags": { "type": "array", "items": { "type": "string" } }
                }
            },
            "Video.Details.Base": {
                "type": "object",
                "properties": { "playcount": { "type": "integer" } }
            },
            "Video.Cast": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": { "name": { "type": "string", "required": true } }
                }
            },
            "Library.Id": { "type": "integer" },
            "List.Fields.Files": { "type": "string", "enum": ["title", "file"] },
            "Global.Toggle": {
                "type": [
                    { "type": "boolean", "required": true },
                    { "type": "string", "enum": ["toggle"], "required": true }
                ]
            },
            "Optional.Boolean": { "type": ["null", "boolean"] }
        }
    }"#;

    #[test]
    fn test_parse_registers_globals_in_namespaces() {
        let graph = parse_introspect(INTROSPECT).expect("Failed to parse");

        let movie = graph.lookup("Video.Details.Movie").expect("Missing movie");
        let class = graph.class(movie);
        assert_eq!(class.name(), Some("Details.Movie"));
        assert_eq!(graph.namespace(class.namespace()).name, "VideoModel");
        assert!(graph.namespace_by_name("LibraryModel").is_some());
        assert_eq!(graph.global_classes().count(), 7);
    }

    #[test]
    fn test_parse_members_and_inner_types() {
        let graph = parse_introspect(INTROSPECT).expect("Failed to parse");
        let movie = graph.lookup("Video.Details.Movie").expect("Missing movie");

        let names: Vec<_> = graph.members(movie).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["cast", "rating", "resume", "sort", "tags", "title"]);

        let sort = &graph.members(movie)[3];
        assert!(sort.is_enum);
        assert_eq!(graph.inner_enums(movie)[0].values(), ["asc", "desc"]);
        assert_eq!(graph.inner_types(movie).len(), 1);
        assert_eq!(
            graph.members(movie)[0].type_ref,
            TypeRef::unresolved("Video.Cast")
        );
        assert_eq!(
            graph.class(movie).parent(),
            Some(&TypeRef::unresolved("Video.Details.Base"))
        );
    }

    #[test]
    fn test_parse_required_properties_become_constructor() {
        let graph = parse_introspect(INTROSPECT).expect("Failed to parse");
        let movie = graph.lookup("Video.Details.Movie").expect("Missing movie");

        let constructors = graph.constructors(movie);
        assert_eq!(constructors.len(), 1);
        assert_eq!(constructors[0].parameters.len(), 1);
        assert_eq!(constructors[0].parameters[0].name, "title");
    }

    #[test]
    fn test_parse_global_array_with_inline_items() {
        let graph = parse_introspect(INTROSPECT).expect("Failed to parse");
        let cast = graph.lookup("Video.Cast").expect("Missing cast");

        let element = graph
            .class(cast)
            .kind()
            .element()
            .and_then(TypeRef::class_id)
            .expect("Missing element");
        assert_eq!(graph.class(element).name(), Some("Cast"));
        assert!(graph.class(element).is_global());
        assert_eq!(graph.members(element)[0].name, "name");
    }

    #[test]
    fn test_parse_global_enum_and_native() {
        let graph = parse_introspect(INTROSPECT).expect("Failed to parse");
        let list = graph.namespace_by_name("ListModel").expect("Missing namespace");
        assert_eq!(graph.namespace(list).enums()[0].name(), "Fields.Files");

        let id = graph.lookup("Library.Id").expect("Missing id");
        assert_eq!(graph.class(id).kind(), &ClassKind::Native("integer".to_string()));
    }

    #[test]
    fn test_parse_multitypes() {
        let graph = parse_introspect(INTROSPECT).expect("Failed to parse");
        let toggle = graph.lookup("Global.Toggle").expect("Missing toggle");
        assert!(graph.class(toggle).kind().is_multi_type());

        let names: Vec<_> = graph.members(toggle).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["booleanValue", "stringValue"]);
        assert!(graph.members(toggle)[1].is_enum);

        let optional = graph.lookup("Optional.Boolean").expect("Missing optional");
        assert!(graph.class(optional).kind().is_multi_type());
        assert_eq!(graph.members(optional).len(), 1);
    }

    #[test]
    fn test_parsed_graph_resolves() {
        let mut graph = parse_introspect(INTROSPECT).expect("Failed to parse");
        graph.resolve_all().expect("Failed to resolve");

        let movie = graph.lookup("Video.Details.Movie").expect("Missing movie");
        let base = graph.lookup("Video.Details.Base").expect("Missing base");
        assert_eq!(graph.class(movie).parent(), Some(&TypeRef::Resolved(base)));
    }

    #[test]
    fn test_parse_missing_types() {
        assert!(matches!(
            parse_introspect(r#"{"methods": {}}"#),
            Err(IntrospectError::MissingTypes)
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_introspect("{ not json"),
            Err(IntrospectError::Json(_))
        ));
    }

    #[test]
    fn test_parse_non_string_enum_literal() {
        let json = r#"{"types": {"Player.Speed": {"type": "string", "enum": ["fast", 2]}}}"#;
        assert!(matches!(
            parse_introspect(json),
            Err(IntrospectError::InvalidStringNode { ref node, .. }) if node == "Player.Speed"
        ));
    }

    #[test]
    fn test_parse_array_without_items() {
        let json = r#"{"types": {"Player.Ids": {"type": "array"}}}"#;
        assert!(matches!(
            parse_introspect(json),
            Err(IntrospectError::InvalidNode { .. })
        ));
    }

    #[test]
    fn test_ingest_reuses_existing_namespace() {
        let mut graph = TypeGraph::new();
        let video = graph.add_namespace(Namespace::new("VideoModel"));
        ingest_introspect(&mut graph, INTROSPECT, &IntrospectOptions::default())
            .expect("Failed to ingest");

        let movie = graph.lookup("Video.Details.Movie").expect("Missing movie");
        assert_eq!(graph.class(movie).namespace(), video);
    }

    #[test]
    fn test_ingest_into_strict_graph_reports_duplicates() {
        let mut graph = TypeGraph::strict();
        let ns = graph.add_namespace(Namespace::new("LibraryModel"));
        graph
            .register_global_type("Library.Id", "Id", ns, ClassKind::native(NativeType::Integer))
            .expect("Failed to register");

        let result = ingest_introspect(&mut graph, INTROSPECT, &IntrospectOptions::default());
        assert!(matches!(
            result,
            Err(IntrospectError::Model(ModelError::DuplicateRegistration { .. }))
        ));
    }

    #[test]
    fn test_split_api_type() {
        let options = IntrospectOptions::new();
        assert_eq!(
            options.split_api_type("Video.Details.Base"),
            ("VideoModel".to_string(), "Details.Base")
        );
        assert_eq!(
            options.split_api_type("Toggle"),
            ("GlobalModel".to_string(), "Toggle")
        );

        let options = IntrospectOptions::new().namespace_suffix("").default_namespace("Core");
        assert_eq!(options.split_api_type("Toggle"), ("Core".to_string(), "Toggle"));
    }
}
