//! Member and constructor code generation.

use rpcgen_model::naming::{to_constant_case, to_field_name};
use rpcgen_model::{Constructor, Member, ModelError, NamespaceId, TypeGraph, TypeRef};

/// Generator for fields, field name constants and constructors.
pub struct MemberGenerator<'a> {
    graph: &'a TypeGraph,
    indent: &'a str,
}

impl<'a> MemberGenerator<'a> {
    /// Creates a new member generator.
    #[must_use]
    pub fn new(graph: &'a TypeGraph, indent: &'a str) -> Self {
        Self { graph, indent }
    }

    /// Returns the type a field or parameter is declared with, as seen
    /// from namespace `ns`. Enum-backed values are plain strings.
    ///
    /// # Errors
    /// Returns `ModelError` if the type is unknown or cannot be named.
    pub fn type_name(
        &self,
        ns: NamespaceId,
        type_ref: &TypeRef,
        is_enum: bool,
    ) -> Result<String, ModelError> {
        if is_enum {
            return Ok("String".to_string());
        }
        let id = self.graph.peek(type_ref)?;
        self.graph.class_reference(ns, id)
    }

    /// Renders the constant holding the JSON name of a member.
    pub fn render_field_name(&self, out: &mut String, prefix: &str, member: &Member) {
        out.push_str(&format!(
            "{}public static final String {} = \"{}\";\n",
            prefix,
            to_constant_case(&member.name),
            member.name
        ));
    }

    /// Renders a member field declaration.
    ///
    /// # Errors
    /// Returns `ModelError` if the member type cannot be named.
    pub fn render_declaration(
        &self,
        out: &mut String,
        prefix: &str,
        ns: NamespaceId,
        member: &Member,
    ) -> Result<(), ModelError> {
        if let Some(description) = &member.description {
            out.push_str(&format!("{}/** {} */\n", prefix, description.trim()));
        }
        let type_name = self.type_name(ns, &member.type_ref, member.is_enum)?;
        out.push_str(&format!(
            "{}public {} {};\n",
            prefix,
            type_name,
            to_field_name(&member.name)
        ));
        Ok(())
    }

    /// Renders a constructor assigning each parameter to its field.
    ///
    /// # Errors
    /// Returns `ModelError` if a parameter type is unknown.
    pub fn render_constructor(
        &self,
        out: &mut String,
        prefix: &str,
        ns: NamespaceId,
        class_name: &str,
        constructor: &Constructor,
    ) -> Result<(), ModelError> {
        let mut parameters = Vec::with_capacity(constructor.parameters.len());
        for parameter in &constructor.parameters {
            let type_name = self.type_name(ns, &parameter.type_ref, parameter.is_enum)?;
            parameters.push(format!("{} {}", type_name, to_field_name(&parameter.name)));
        }

        out.push('\n');
        out.push_str(&format!(
            "{}public {}({}) {{\n",
            prefix,
            class_name,
            parameters.join(", ")
        ));
        for parameter in &constructor.parameters {
            let field = to_field_name(&parameter.name);
            out.push_str(&format!(
                "{}{}this.{} = {};\n",
                prefix, self.indent, field, field
            ));
        }
        out.push_str(&format!("{}}}\n", prefix));
        Ok(())
    }
}
