//! Enum code generation.
//!
//! Enums become holders of string constants plus a `values` set, since the
//! JSON-RPC API transports enum literals as plain strings.

use rpcgen_model::naming::to_constant_case;
use rpcgen_model::{EnumDef, TypeGraph};
use std::collections::HashSet;

/// Generator for global and inner enum definitions.
pub struct EnumGenerator<'a> {
    graph: &'a TypeGraph,
    indent: &'a str,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(graph: &'a TypeGraph, indent: &'a str) -> Self {
        Self { graph, indent }
    }

    /// Renders an enum declaration at the given nesting depth.
    pub fn render(&self, out: &mut String, enum_def: &EnumDef, depth: usize) {
        let prefix = self.indent.repeat(depth);
        let constants = constant_names(enum_def.values());

        out.push('\n');
        out.push_str(&format!(
            "{}public interface {} {{\n",
            prefix,
            self.graph.enum_name(enum_def)
        ));
        out.push('\n');
        for (constant, value) in constants.iter().zip(enum_def.values()) {
            out.push_str(&format!(
                "{}{}public final String {} = \"{}\";\n",
                prefix, self.indent, constant, value
            ));
        }
        out.push('\n');
        out.push_str(&format!(
            "{}{}public final static Set<String> values = new HashSet<String>(Arrays.asList({}));\n",
            prefix,
            self.indent,
            constants.join(", ")
        ));
        out.push_str(&format!("{}}}\n", prefix));
    }
}

/// Turns enum literals into unique Java constant identifiers.
fn constant_names(values: &[String]) -> Vec<String> {
    let mut used = HashSet::new();
    values
        .iter()
        .map(|value| {
            let base = constant_identifier(value);
            let mut name = base.clone();
            let mut n = 2;
            while !used.insert(name.clone()) {
                name = format!("{}_{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

fn constant_identifier(value: &str) -> String {
    let mut name: String = to_constant_case(value)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}
