//! Errors raised while composing or synthesizing the stack.

use std::path::PathBuf;

use pulsestack_core::PulseError;
use pulsestack_template::TemplateError;

/// Stack composition and synthesis error.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// Settings failed validation.
    #[error(transparent)]
    Settings(#[from] PulseError),

    /// The composed template is inconsistent.
    #[error("invalid template: {0}")]
    Template(#[from] TemplateError),

    /// Filesystem failure while writing the cloud assembly.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Manifest or template serialization failure.
    #[error("failed to serialize {what}: {source}")]
    Json {
        /// Document being serialized.
        what: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Asset archive could not be built.
    #[error("failed to package asset: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Convenience result type for stack operations.
pub type StackResult<T> = Result<T, StackError>;
