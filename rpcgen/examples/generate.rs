//! Example generating Java models from an introspect document.
//!
//! Run with: `cargo run --example generate -- [introspect.json] [output-dir]`
//!
//! Without arguments a small built-in document is used and the sources are
//! printed instead of written.

use rpcgen::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;
use std::rc::Rc;

const SAMPLE: &str = r#"{
    "types": {
        "Video.Details.Movie": {
            "extends": "Video.Details.Base",
            "properties": {
                "title": { "type": "string", "required": true },
                "cast": { "$ref": "Video.Cast" },
                "set": { "$ref": "Video.Details.Set" }
            }
        },
        "Video.Details.Set": {
            "extends": "Video.Details.Base",
            "properties": {
                "movies": { "type": "array", "items": { "$ref": "Video.Details.Movie" } }
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
                "properties": {
                    "name": { "type": "string", "required": true },
                    "role": { "type": "string" }
                }
            }
        },
        "List.Sort": {
            "type": "object",
            "properties": {
                "order": { "type": "string", "enum": ["ascending", "descending"] },
                "method": { "type": "string" }
            }
        },
        "List.Fields.Files": { "type": "string", "enum": ["title", "file", "size"] }
    }
}"#;

/// Adds a JSON serializer to every global class.
struct JsonModule;

impl ClassModule for JsonModule {
    fn name(&self) -> &str {
        "json"
    }

    fn imports(&self, _graph: &TypeGraph, _class: ClassId) -> BTreeSet<String> {
        BTreeSet::from(["org.json.JSONObject".to_string()])
    }

    fn render(
        &self,
        out: &mut String,
        prefix: &str,
        graph: &TypeGraph,
        class: ClassId,
    ) -> Result<(), ModelError> {
        out.push_str(&format!("\n{}public JSONObject toJSONObject() {{\n", prefix));
        out.push_str(&format!("{}\tfinal JSONObject obj = new JSONObject();\n", prefix));
        for member in graph.members(class) {
            out.push_str(&format!(
                "{}\tobj.put(\"{}\", {});\n",
                prefix,
                member.name,
                rpcgen::model::naming::to_field_name(&member.name)
            ));
        }
        out.push_str(&format!("{}\treturn obj;\n", prefix));
        out.push_str(&format!("{}}}\n", prefix));
        Ok(())
    }
}

/// Makes every global class extend a common base class.
struct ModelParent;

impl ParentModule for ModelParent {
    fn superclass(&self) -> &str {
        "AbstractModel"
    }

    fn imports(&self, _graph: &TypeGraph, _class: ClassId) -> BTreeSet<String> {
        BTreeSet::from(["org.xbmc.android.jsonrpc.api.AbstractModel".to_string()])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let json = match args.next() {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };
    let output = args.next();

    let options = IntrospectOptions::default();
    let mut graph = TypeGraph::new();
    for name in ["VideoModel", "ListModel"] {
        graph.add_namespace(
            Namespace::new(name)
                .with_class_module(Rc::new(JsonModule))
                .with_parent_module(Rc::new(ModelParent)),
        );
    }
    ingest_introspect(&mut graph, &json, &options)?;

    let config = GeneratorConfig::new().header("Generated by rpcgen. Do not edit.");
    let generator = Generator::new(&mut graph, config)?;

    match output {
        Some(dir) => {
            for path in generator.write_to(Path::new(&dir))? {
                println!("Wrote {}", path.display());
            }
        }
        None => {
            for unit in generator.generate()? {
                println!("// ---- {} ----", unit.file_name);
                println!("{}", unit.source);
            }
        }
    }
    Ok(())
}
