//! # rpcgen Codegen
//!
//! Java model source generation from JSON-RPC introspect documents.
//!
//! This crate provides:
//! - One compilation unit per API namespace
//! - Class declarations with field name constants, members and constructors
//! - Inner classes and string-constant enums
//! - Pluggable class modules rendering extra code

pub mod error;
pub mod generator;
pub mod java;

pub use error::CodegenError;
pub use generator::{GeneratedUnit, Generator, GeneratorConfig};

/// Generates Java sources from an introspect document string.
///
/// # Arguments
/// * `json` - JSON-RPC introspect document
///
/// # Returns
/// One generated unit per namespace.
///
/// # Errors
/// Returns `CodegenError` if parsing, resolution or generation fails.
pub fn generate_from_json(json: &str) -> Result<Vec<GeneratedUnit>, CodegenError> {
    let mut graph = rpcgen_model::parse_introspect(json)?;
    let generator = Generator::new(&mut graph, GeneratorConfig::default())?;
    generator.generate()
}

/// Generates Java sources from an introspect document file.
///
/// # Arguments
/// * `path` - Path to the introspect document
///
/// # Returns
/// One generated unit per namespace.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, resolution or generation fails.
pub fn generate_from_file(path: &std::path::Path) -> Result<Vec<GeneratedUnit>, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTROSPECT: &str = r#"{
        "types": {
            "Audio.Details.Album": {
                "extends": "Audio.Details.Media",
                "properties": {
                    "albumid": { "type": "integer", "required": true },
                    "genre": { "type": "array", "items": { "type": "string" } }
                }
            },
            "Audio.Details.Media": {
                "type": "object",
                "properties": { "title": { "type": "string" } }
            }
        }
    }"#;

    #[test]
    fn test_generate_from_json() {
        let units = generate_from_json(INTROSPECT).expect("Failed to generate");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].file_name, "AudioModel.java");
        assert!(units[0].source.contains("class AlbumDetail extends MediaDetail {"));
        assert!(units[0].source.contains("public List<String> genre;"));
    }

    #[test]
    fn test_generate_from_json_invalid() {
        assert!(matches!(
            generate_from_json("[]"),
            Err(CodegenError::Introspect(_))
        ));
    }

    #[test]
    fn test_multitype_members_keep_builtin_names_free() {
        let json = r#"{
            "types": {
                "Global.Toggle": {
                    "type": [
                        { "type": "boolean", "required": true },
                        { "type": "string", "enum": ["toggle"], "required": true }
                    ]
                },
                "Setting.Details.Base": {
                    "type": "object",
                    "properties": {
                        "default": { "type": "string" },
                        "class": { "type": "integer" }
                    }
                }
            }
        }"#;

        let units = generate_from_json(json).expect("Failed to generate");
        let source: String = units.iter().map(|u| u.source.as_str()).collect();

        assert!(source.contains("public Boolean booleanValue;"));
        assert!(source.contains("public String stringValue;"));
        assert!(source.contains("public interface StringValue {"));
        assert!(source.contains("public String default_;"));
        assert!(source.contains("public Integer class_;"));
        assert!(!source.contains("interface String {"));
        assert!(!source.contains(" boolean;"));
        assert!(!source.contains(" default;"));
    }

    #[test]
    fn test_generate_from_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("introspect.json");
        std::fs::write(&path, INTROSPECT).expect("Failed to write fixture");

        let units = generate_from_file(&path).expect("Failed to generate");
        assert_eq!(units[0].namespace, "AudioModel");
    }

    #[test]
    fn test_generate_from_missing_file() {
        let result = generate_from_file(std::path::Path::new("/nonexistent/introspect.json"));
        assert!(matches!(result, Err(CodegenError::Io(_))));
    }
}
