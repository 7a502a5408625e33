//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Introspect document error.
    #[error("introspect error: {0}")]
    Introspect(#[from] rpcgen_model::IntrospectError),

    /// Type graph error.
    #[error("model error: {0}")]
    Model(#[from] rpcgen_model::ModelError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpcgen_model::ModelError;

    #[test]
    fn test_model_error_conversion() {
        let err: CodegenError = ModelError::unknown_type("Video.Cast").into();
        assert_eq!(
            err.to_string(),
            "model error: trying to resolve unknown type 'Video.Cast'"
        );
    }

    #[test]
    fn test_generation_error() {
        let err = CodegenError::generation("empty package");
        assert!(matches!(err, CodegenError::Generation { .. }));
        assert_eq!(err.to_string(), "generation error: empty package");
    }
}
