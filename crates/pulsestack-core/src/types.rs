//! Common AWS type definitions shared across the stack.

use std::fmt;

/// AWS account ID.
///
/// Only emptiness is checked. The value is passed to the deployment tooling
/// as given, which reports malformed accounts itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns [`PulseError::MissingAccount`](crate::PulseError::MissingAccount)
    /// if the string is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, crate::PulseError> {
        let id = id.into();
        if id.is_empty() {
            return Err(crate::PulseError::MissingAccount);
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Region used when neither the environment nor the context names one.
    pub const DEFAULT: &str = "ca-central-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated deployment target: one account in one region.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetEnvironment {
    /// Account the stack is deployed into.
    pub account: AccountId,
    /// Region the stack is deployed into.
    pub region: AwsRegion,
}

impl TargetEnvironment {
    /// Render the target in cloud assembly form, `aws://<account>/<region>`.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("aws://{}/{}", self.account, self.region)
    }
}

impl fmt::Display for TargetEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.region)
    }
}
