//! Main code generator.

use crate::error::CodegenError;
use crate::java::{ClassGenerator, EnumGenerator};
use rpcgen_model::{ClassId, ENUM_SUPPORT_IMPORTS, NamespaceId, TypeGraph, validate_graph};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Configuration for code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    package: String,
    indent: String,
    header: Option<String>,
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            package: "org.xbmc.android.jsonrpc.api.model".to_string(),
            indent: "\t".to_string(),
            header: None,
        }
    }

    /// Sets the package the generated classes are declared in.
    #[must_use]
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the indentation unit.
    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets a comment placed at the top of every generated file.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Returns the target package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.package
    }

    /// Returns the indentation unit.
    #[must_use]
    pub fn indent_unit(&self) -> &str {
        &self.indent
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Namespace the file declares.
    pub namespace: String,
    /// File name, e.g. `VideoModel.java`.
    pub file_name: String,
    /// Source text.
    pub source: String,
}

/// Main code generator, one compilation unit per namespace.
pub struct Generator<'a> {
    graph: &'a TypeGraph,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Prepares a graph for generation.
    ///
    /// Resolves and validates the graph, then applies the imports of the
    /// namespace modules to every top-level class.
    ///
    /// # Errors
    /// Returns `CodegenError::Model` if the graph does not resolve or is
    /// invalid.
    pub fn new(graph: &'a mut TypeGraph, config: GeneratorConfig) -> Result<Self, CodegenError> {
        graph.resolve_all()?;
        validate_graph(graph)?;

        let namespaces: Vec<NamespaceId> = graph.namespaces().collect();
        for ns in namespaces {
            for id in graph.top_level_classes(ns) {
                graph.apply_module_imports(id)?;
            }
        }
        tracing::debug!("Prepared {} classes for generation", graph.class_count());

        Ok(Self { graph, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates one unit per namespace that declares at least one visible
    /// class or enum, in namespace creation order.
    ///
    /// # Errors
    /// Returns `CodegenError` if the configuration is unusable or a class
    /// cannot be rendered.
    pub fn generate(&self) -> Result<Vec<GeneratedUnit>, CodegenError> {
        if self.config.package.trim().is_empty() {
            return Err(CodegenError::generation("package name must not be empty"));
        }

        let mut units = Vec::new();
        for ns in self.graph.namespaces() {
            if let Some(unit) = self.generate_namespace(ns)? {
                units.push(unit);
            }
        }
        tracing::debug!("Generated {} compilation units", units.len());
        Ok(units)
    }

    /// Generates every unit and writes it into `dir`.
    ///
    /// # Returns
    /// Paths of the written files.
    ///
    /// # Errors
    /// Returns `CodegenError` if generation or writing fails.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::new();
        for unit in self.generate()? {
            let path = dir.join(&unit.file_name);
            std::fs::write(&path, unit.source)?;
            tracing::debug!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    fn generate_namespace(&self, ns: NamespaceId) -> Result<Option<GeneratedUnit>, CodegenError> {
        let namespace = self.graph.namespace(ns);
        let mut classes = Vec::new();
        for id in self.graph.top_level_classes(ns) {
            if self.graph.is_visible(id)? {
                classes.push(id);
            }
        }
        if classes.is_empty() && namespace.enums().is_empty() {
            return Ok(None);
        }

        let mut imports = BTreeSet::new();
        let mut visited = HashSet::new();
        for &id in &classes {
            imports.extend(self.graph.collect_imports(id)?);
            if uses_list(self.graph, id, &mut visited)? {
                imports.insert("java.util.List".to_string());
            }
        }
        if !namespace.enums().is_empty() {
            imports.extend(ENUM_SUPPORT_IMPORTS.iter().map(|i| i.to_string()));
        }

        let mut source = String::new();
        if let Some(header) = &self.config.header {
            for line in header.lines() {
                source.push_str(format!("// {}", line).trim_end());
                source.push('\n');
            }
            source.push('\n');
        }
        source.push_str(&format!("package {};\n\n", self.config.package));
        for import in &imports {
            source.push_str(&format!("import {};\n", import));
        }
        if !imports.is_empty() {
            source.push('\n');
        }

        source.push_str(&format!("public final class {} {{\n", namespace.name));
        let class_generator = ClassGenerator::new(self.graph, &self.config.indent);
        for id in classes {
            class_generator.render(&mut source, id, 1)?;
        }
        let enum_generator = EnumGenerator::new(self.graph, &self.config.indent);
        for enum_def in namespace.enums() {
            enum_generator.render(&mut source, enum_def, 1);
        }
        source.push_str("}\n");

        Ok(Some(GeneratedUnit {
            namespace: namespace.name.clone(),
            file_name: format!("{}.java", namespace.name),
            source,
        }))
    }
}

/// Returns true if a field or constructor parameter of the class, or of
/// one of its inner classes, is declared as a list.
fn uses_list(
    graph: &TypeGraph,
    id: ClassId,
    visited: &mut HashSet<ClassId>,
) -> Result<bool, CodegenError> {
    if !visited.insert(id) {
        return Ok(false);
    }
    let class = graph.class(id);

    let member_types = class
        .members()
        .iter()
        .filter(|m| !m.is_enum)
        .map(|m| &m.type_ref);
    let parameter_types = class
        .constructors()
        .iter()
        .flat_map(|c| &c.parameters)
        .filter(|p| !p.is_enum)
        .map(|p| &p.type_ref);

    for type_ref in member_types.chain(parameter_types) {
        if graph.class(graph.peek(type_ref)?).kind().is_array() {
            return Ok(true);
        }
    }
    for inner in class.inner_types() {
        if uses_list(graph, graph.expect_resolved(inner)?, visited)? {
            return Ok(true);
        }
    }
    Ok(false)
}
