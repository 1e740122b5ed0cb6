//! Template model errors.

/// Errors raised while assembling or validating a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Two entities share a logical ID.
    #[error("duplicate logical ID: {0}")]
    DuplicateLogicalId(String),

    /// A reference names no resource, parameter, or pseudo parameter.
    #[error("{from} references undeclared entity {target}")]
    DanglingReference {
        /// Logical ID of the referring resource or output.
        from: String,
        /// The missing target.
        target: String,
    },

    /// Resources depend on each other in a loop.
    #[error("dependency cycle between resources: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    /// Resource properties could not be turned into JSON.
    #[error("failed to serialize properties of {logical_id}: {source}")]
    Serialize {
        /// Resource whose properties failed.
        logical_id: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
