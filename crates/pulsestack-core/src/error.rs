//! Error types for the PulseStack core.

/// Core error type for settings resolution and validation.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// No source supplied an AWS account.
    #[error(
        "could not determine the AWS account. Run with --profile, or pass -c account=123456789012 -c region=ca-central-1"
    )]
    MissingAccount,

    /// A removal policy other than `destroy` or `retain`.
    #[error("unknown removal policy: {0} (expected destroy or retain)")]
    UnknownRemovalPolicy(String),

    /// Context values could not be parsed.
    #[error("invalid context: {0}")]
    InvalidContext(String),
}

/// Convenience result type for PulseStack core operations.
pub type PulseResult<T> = Result<T, PulseError>;
