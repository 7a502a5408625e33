//! Error types for the type model and introspect ingestion.

use thiserror::Error;

/// Error type for type graph construction, resolution and naming.
///
/// Every variant is fatal for a generation run: the graph is either
/// internally inconsistent or was used in the wrong order.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A reference names an API type that was never registered.
    #[error("trying to resolve unknown type '{api_type}'")]
    UnknownType {
        /// API type identifier.
        api_type: String,
    },

    /// A native class carries a primitive label outside the supported set.
    #[error("unknown native type '{label}'")]
    UnknownNativeType {
        /// Primitive label found on the class.
        label: String,
    },

    /// A reference was read before it went through resolution.
    #[error("type '{api_type}' used before it was resolved")]
    UseBeforeResolve {
        /// API type identifier of the pending reference.
        api_type: String,
    },

    /// Two distinct classes registered under the same identifier.
    #[error("duplicate registration for type '{api_type}'")]
    DuplicateRegistration {
        /// API type identifier.
        api_type: String,
    },

    /// A class was mutated after it had been resolved.
    #[error("class '{class}' is already resolved and can no longer be modified")]
    ClassFrozen {
        /// Best available label of the class.
        class: String,
    },

    /// A global class is its own ancestor.
    #[error("circular inheritance detected: {path}")]
    CircularInheritance {
        /// Chain of API types forming the cycle.
        path: String,
    },

    /// Structural problem found while validating the graph.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

/// Error type for reading JSON-RPC introspect documents.
#[derive(Debug, Error)]
pub enum IntrospectError {
    /// The document is not valid JSON.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no `types` object.
    #[error("introspect document has no 'types' object")]
    MissingTypes,

    /// A type node has a shape the ingestion does not understand.
    #[error("invalid node '{node}': {message}")]
    InvalidNode {
        /// Identifier or property path of the node.
        node: String,
        /// Error message.
        message: String,
    },

    /// A node that must hold a string holds something else.
    #[error("invalid string node '{node}': {message}")]
    InvalidStringNode {
        /// Identifier or property path of the node.
        node: String,
        /// Error message.
        message: String,
    },

    /// The type graph rejected an operation.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ModelError {
    /// Creates an unknown type error.
    pub fn unknown_type(api_type: impl Into<String>) -> Self {
        Self::UnknownType {
            api_type: api_type.into(),
        }
    }

    /// Creates an unknown native type error.
    pub fn unknown_native(label: impl Into<String>) -> Self {
        Self::UnknownNativeType {
            label: label.into(),
        }
    }

    /// Creates a use-before-resolve error.
    pub fn use_before_resolve(api_type: impl Into<String>) -> Self {
        Self::UseBeforeResolve {
            api_type: api_type.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl IntrospectError {
    /// Creates an invalid node error.
    pub fn invalid_node(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidNode {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid string node error.
    pub fn invalid_string(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStringNode {
            node: node.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_names_identifier() {
        let err = ModelError::unknown_type("Video.Details.Base");
        assert_eq!(
            err.to_string(),
            "trying to resolve unknown type 'Video.Details.Base'"
        );
    }

    #[test]
    fn test_model_error_converts_into_introspect_error() {
        let err: IntrospectError = ModelError::unknown_native("null").into();
        assert!(matches!(err, IntrospectError::Model(_)));
        assert!(err.to_string().contains("null"));
    }
}
