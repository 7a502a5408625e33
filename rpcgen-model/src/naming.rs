//! Naming of generated classes and enums.
//!
//! Schema identifiers are dotted and frequently plural (`Filter.Albums`);
//! generated names read as singular class names (`AlbumFilter`). Global
//! names go through ordered rule groups: inside a group the first matching
//! rule rewrites the name, and the result feeds the next group. Dots are
//! stripped at the end.
//!
//! Naming only reads the graph. It has no say in identity.

use crate::error::ModelError;
use crate::graph::TypeGraph;
use crate::types::{ClassId, ClassKind, EnumDef, NamespaceId, NativeType};

/// A single rewrite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Replaces a name that matches exactly.
    Exact {
        /// Name to match.
        name: &'static str,
        /// Replacement.
        replacement: &'static str,
    },
    /// Turns `<prefix><rest>` into `<singular rest><suffix>`.
    Prefix {
        /// Prefix to match and strip.
        prefix: &'static str,
        /// Suffix appended to the singular remainder.
        suffix: &'static str,
    },
}

impl NameRule {
    /// Applies the rule, returning `None` if it does not match.
    #[must_use]
    pub fn apply(&self, name: &str) -> Option<String> {
        match *self {
            Self::Exact { name: exact, replacement } => {
                (name == exact).then(|| replacement.to_string())
            }
            Self::Prefix { prefix, suffix } => name
                .strip_prefix(prefix)
                .map(|rest| format!("{}{}", plural_to_singular(rest), suffix)),
        }
    }
}

/// Rule groups for global class names, in evaluation order.
pub const GLOBAL_CLASS_RULES: &[&[NameRule]] = &[
    // Item.All -> AllItems, Items.Source -> SourceItem, Item.File -> FileItem
    &[
        NameRule::Exact {
            name: "ItemAll",
            replacement: "AllItems",
        },
        NameRule::Exact {
            name: "Item.All",
            replacement: "AllItems",
        },
        NameRule::Prefix {
            prefix: "Items",
            suffix: "Item",
        },
        NameRule::Prefix {
            prefix: "Item",
            suffix: "Item",
        },
    ],
    // Details.Album -> AlbumDetail
    &[NameRule::Prefix {
        prefix: "Details",
        suffix: "Detail",
    }],
    // Filter.Rule.Albums -> AlbumFilterRule, Filter.Albums -> AlbumFilter
    &[
        NameRule::Prefix {
            prefix: "FilterRule",
            suffix: "FilterRule",
        },
        NameRule::Prefix {
            prefix: "Filter.Rule",
            suffix: "FilterRule",
        },
        NameRule::Prefix {
            prefix: "Filter.",
            suffix: "Filter",
        },
    ],
];

/// Rule groups for global enum names, in evaluation order.
pub const GLOBAL_ENUM_RULES: &[&[NameRule]] = &[
    // Fields.Files -> FileFields
    &[NameRule::Prefix {
        prefix: "Fields.",
        suffix: "Fields",
    }],
    // Filter.Fields.TVShows -> TVShowFilterFields, Filter.Operators -> OperatorFilters
    &[
        NameRule::Prefix {
            prefix: "Filter.Fields.",
            suffix: "FilterFields",
        },
        NameRule::Prefix {
            prefix: "Filter.",
            suffix: "Filters",
        },
    ],
];

/// Context a name is derived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext<'a> {
    /// The raw name is a primitive label.
    Native,
    /// List of the given, already derived, element reference.
    Array {
        /// Element class reference.
        element: &'a str,
    },
    /// Class nested in an owner with the given raw name.
    Inner {
        /// Raw name of the owner.
        owner: &'a str,
    },
    /// Top-level class.
    Global,
}

/// Derives a target identifier from a raw schema name.
///
/// # Errors
/// Returns `ModelError::UnknownNativeType` for a native label outside the
/// four supported primitives.
pub fn derive_name(raw: &str, context: NameContext<'_>) -> Result<String, ModelError> {
    match context {
        NameContext::Native => NativeType::from_schema_name(raw)
            .map(|n| n.target_name().to_string())
            .ok_or_else(|| ModelError::unknown_native(raw)),
        NameContext::Array { element } => Ok(format!("List<{}>", element)),
        NameContext::Inner { owner } => Ok(inner_name(raw, owner)),
        NameContext::Global => Ok(apply_rules(raw, GLOBAL_CLASS_RULES)),
    }
}

/// Derives the name of an enum; `owner` is the raw name of the owning
/// class for inner enums.
#[must_use]
pub fn derive_enum_name(raw: &str, owner: Option<&str>) -> String {
    match owner {
        Some(owner) => inner_name(raw, owner),
        None => apply_rules(raw, GLOBAL_ENUM_RULES),
    }
}

/// Converts a plural word into a singular one.
///
/// A label-quality heuristic: words ending in `ovies` are kept as they
/// are, other `ies` words get every `ies` replaced by `y`, and a trailing
/// `s` is dropped.
#[must_use]
pub fn plural_to_singular(word: &str) -> String {
    if word.ends_with("ovies") {
        return word.to_string();
    }
    if word.ends_with("ies") {
        return word.replace("ies", "y");
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

/// Converts a name to CONSTANT_CASE.
#[must_use]
pub fn to_constant_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c == '.' || c == '-' || c == '_' || c == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            result.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        result.push(c.to_ascii_uppercase());
    }
    result
}

/// Converts a name to camelCase.
#[must_use]
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '.' {
            capitalize_next = !result.is_empty();
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else if result.is_empty() {
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Converts a member name to a Java field or parameter identifier.
///
/// The name is camel-cased; a reserved word gets a trailing underscore.
#[must_use]
pub fn to_field_name(s: &str) -> String {
    let name = to_camel_case(s);
    if JAVA_KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else {
        name
    }
}

/// Words that cannot be used as Java identifiers.
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// Type names the generated sources refer to unqualified. A generated
/// class or enum with one of these names would shadow it.
pub const SHADOWED_TYPE_NAMES: &[&str] = &[
    "Arrays", "Boolean", "Double", "HashSet", "Integer", "List", "Object", "Set", "String",
];

fn inner_name(raw: &str, owner: &str) -> String {
    let singular = plural_to_singular(raw);
    let mut chars = singular.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if raw == owner || name.is_empty() || SHADOWED_TYPE_NAMES.contains(&name.as_str()) {
        format!("{}Value", name)
    } else {
        name
    }
}

fn apply_rules(raw: &str, groups: &[&[NameRule]]) -> String {
    let mut name = raw.to_string();
    for group in groups {
        if let Some(rewritten) = group.iter().find_map(|rule| rule.apply(&name)) {
            name = rewritten;
        }
    }
    let name = name.replace('.', "");
    if SHADOWED_TYPE_NAMES.contains(&name.as_str()) {
        format!("{}Value", name)
    } else {
        name
    }
}

impl TypeGraph {
    /// Returns the declared name of a class.
    ///
    /// # Errors
    /// Returns `ModelError::UnknownNativeType` for an unsupported native,
    /// `ModelError::UseBeforeResolve` for an array with a pending element.
    pub fn class_name(&self, id: ClassId) -> Result<String, ModelError> {
        self.class_name_in(self.class(id).namespace(), id)
    }

    /// Returns how a class is referred to from code in namespace `from`.
    ///
    /// Classes of other namespaces are qualified with their namespace,
    /// except natives and lists.
    ///
    /// # Errors
    /// Same as [`TypeGraph::class_name`].
    pub fn class_reference(&self, from: NamespaceId, id: ClassId) -> Result<String, ModelError> {
        let class = self.class(id);
        let name = self.class_name_in(from, id)?;
        if !class.kind().is_native() && class.namespace() != from && !name.starts_with("List") {
            return Ok(format!("{}.{}", self.namespace(class.namespace()).name, name));
        }
        Ok(name)
    }

    /// Returns the declared name of an enum.
    #[must_use]
    pub fn enum_name(&self, enum_def: &EnumDef) -> String {
        let owner = enum_def
            .owner()
            .map(|owner| self.class(owner).name().unwrap_or_default());
        derive_enum_name(enum_def.name(), owner)
    }

    fn class_name_in(&self, from: NamespaceId, id: ClassId) -> Result<String, ModelError> {
        let class = self.class(id);
        match class.kind() {
            ClassKind::Native(label) => derive_name(label, NameContext::Native),
            ClassKind::Array { element } => {
                let element = self.expect_resolved(element)?;
                let reference = self.class_reference(from, element)?;
                derive_name("", NameContext::Array {
                    element: &reference,
                })
            }
            ClassKind::Composite | ClassKind::MultiType => {
                let raw = class.name().ok_or_else(|| {
                    ModelError::validation(format!("class '{}' has no name", class.label()))
                })?;
                match class.owner() {
                    Some(owner) => {
                        let owner = self.class(owner).name().unwrap_or_default();
                        derive_name(raw, NameContext::Inner { owner })
                    }
                    None => derive_name(raw, NameContext::Global),
                }
            }
        }
    }
}
