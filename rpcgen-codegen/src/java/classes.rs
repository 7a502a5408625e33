//! Class declaration code generation.

use super::{EnumGenerator, MemberGenerator};
use rpcgen_model::{ClassId, ModelError, TypeGraph};

/// Generator for class declarations, inner classes included.
pub struct ClassGenerator<'a> {
    graph: &'a TypeGraph,
    indent: &'a str,
}

impl<'a> ClassGenerator<'a> {
    /// Creates a new class generator.
    #[must_use]
    pub fn new(graph: &'a TypeGraph, indent: &'a str) -> Self {
        Self { graph, indent }
    }

    /// Renders a class declaration at the given nesting depth.
    ///
    /// Classes that are not visible (natives, lists of natives) render
    /// nothing.
    ///
    /// # Errors
    /// Returns `ModelError` if the graph is not resolved or a name cannot
    /// be derived.
    pub fn render(&self, out: &mut String, id: ClassId, depth: usize) -> Result<(), ModelError> {
        if !self.graph.is_visible(id)? {
            return Ok(());
        }

        let class = self.graph.class(id);
        let ns = class.namespace();
        let namespace = self.graph.namespace(ns);
        let prefix = self.indent.repeat(depth);
        let body = format!("{}{}", prefix, self.indent);
        let class_name = self.graph.class_name(id)?;
        let members = MemberGenerator::new(self.graph, self.indent);

        // signature
        out.push('\n');
        out.push_str(&format!("{}public static class {}", prefix, class_name));
        if let Some(parent) = class.parent() {
            let parent = self.graph.expect_resolved(parent)?;
            out.push_str(&format!(
                " extends {}",
                self.graph.class_reference(ns, parent)?
            ));
        } else if let Some(module) = namespace.parent_module_for(class.is_inner()) {
            out.push_str(&format!(" extends {}", module.superclass()));
        }
        out.push_str(" {\n");

        if let Some(api_type) = class.api_type() {
            out.push_str(&format!(
                "{}public final static String API_TYPE = \"{}\";\n",
                body, api_type
            ));
        }

        if !class.kind().is_multi_type() {
            out.push_str(&format!("\n{}// field names\n", body));
            for member in class.members() {
                members.render_field_name(out, &body, member);
            }
        }

        out.push_str(&format!("\n{}// class members\n", body));
        for member in class.members() {
            members.render_declaration(out, &body, ns, member)?;
        }

        for module in namespace.modules_for(class.is_inner()) {
            module.render(out, &body, self.graph, id)?;
        }

        for constructor in class.constructors() {
            members.render_constructor(out, &body, ns, &class_name, constructor)?;
        }

        for inner in class.inner_types() {
            let inner = self.graph.expect_resolved(inner)?;
            self.render(out, inner, depth + 1)?;
        }

        let enums = EnumGenerator::new(self.graph, self.indent);
        for enum_def in class.inner_enums() {
            enums.render(out, enum_def, depth + 1);
        }

        out.push_str(&format!("{}}}\n", prefix));
        Ok(())
    }
}
