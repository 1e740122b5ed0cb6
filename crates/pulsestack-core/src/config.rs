//! Deployment settings and their resolution from environment and context.
//!
//! [`resolve_settings`] walks a fixed, first-match-wins chain per field:
//!
//! | Field | Sources, in order |
//! |-------|-------------------|
//! | environment name | `APP_ENV`, then `dev` |
//! | account | `CDK_DEFAULT_ACCOUNT`, context `account`, then empty |
//! | region | `CDK_DEFAULT_REGION`, context `region`, `AWS_REGION`, then `ca-central-1` |
//! | removal | `APP_REMOVAL_POLICY`, then the tier default |
//!
//! The resolver never fails. An unrecognized `APP_ENV` is kept verbatim as
//! the tier label, and an unrecognized `APP_REMOVAL_POLICY` falls back to the
//! tier default; both are logged. The account is not checked here. Callers
//! validate through [`Settings::target`] before composing anything.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use crate::context::{ContextSource, EnvSource};
use crate::error::{PulseError, PulseResult};
use crate::types::{AccountId, AwsRegion, TargetEnvironment};

/// Deployment tier override.
pub const APP_ENV_VAR: &str = "APP_ENV";
/// Account override.
pub const ACCOUNT_VAR: &str = "CDK_DEFAULT_ACCOUNT";
/// Region override.
pub const REGION_VAR: &str = "CDK_DEFAULT_REGION";
/// Secondary region source consulted after the context.
pub const AWS_REGION_VAR: &str = "AWS_REGION";
/// Removal policy override.
pub const REMOVAL_POLICY_VAR: &str = "APP_REMOVAL_POLICY";

/// Context key for the account.
pub const ACCOUNT_CONTEXT_KEY: &str = "account";
/// Context key for the region.
pub const REGION_CONTEXT_KEY: &str = "region";

/// Deployment tier.
///
/// The three known tiers parse case-insensitively. Any other label is kept
/// as [`EnvName::Other`] so that it still appears in names and descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvName {
    /// Development (default).
    #[default]
    Dev,
    /// Staging.
    Stage,
    /// Production.
    Prod,
    /// Unrecognized tier label, verbatim.
    #[serde(untagged)]
    Other(String),
}

impl EnvName {
    /// Returns the string value of this tier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dev => "dev",
            Self::Stage => "stage",
            Self::Prod => "prod",
            Self::Other(label) => label,
        }
    }

    /// Whether this is one of `dev`, `stage`, `prod`.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for EnvName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EnvName {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Self::Dev,
            "stage" => Self::Stage,
            "prod" => Self::Prod,
            _ => Self::Other(s.to_owned()),
        }
    }
}

impl FromStr for EnvName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// What happens to the site bucket when the stack is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalMode {
    /// Delete the bucket and purge its objects on teardown.
    Destroy,
    /// Keep the bucket and its contents.
    Retain,
}

impl RemovalMode {
    /// Default removal mode for a tier. Only `dev` is disposable.
    #[must_use]
    pub fn default_for(env_name: &EnvName) -> Self {
        match env_name {
            EnvName::Dev => Self::Destroy,
            EnvName::Stage | EnvName::Prod | EnvName::Other(_) => Self::Retain,
        }
    }

    /// Returns the string value of this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Destroy => "destroy",
            Self::Retain => "retain",
        }
    }

    /// Whether teardown deletes data.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Destroy)
    }
}

impl std::fmt::Display for RemovalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, like [`EnvName`]. Used by the `--removal-policy` flag.
impl FromStr for RemovalMode {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "destroy" => Ok(Self::Destroy),
            "retain" => Ok(Self::Retain),
            _ => Err(PulseError::UnknownRemovalPolicy(s.to_owned())),
        }
    }
}

/// Resolved deployment settings.
///
/// Computed once per invocation and passed by reference through the
/// composition chain.
///
/// # Examples
///
/// ```
/// use pulsestack_core::{EnvName, RemovalMode, Settings};
///
/// let settings = Settings::builder()
///     .account("123456789012".into())
///     .build();
/// assert_eq!(settings.env_name, EnvName::Dev);
/// assert_eq!(settings.region, "ca-central-1");
/// assert_eq!(settings.removal, RemovalMode::Destroy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Deployment tier.
    #[builder(default)]
    pub env_name: EnvName,

    /// Target account; empty when no source supplied one.
    #[builder(default)]
    pub account: String,

    /// Target region.
    #[builder(default = String::from(AwsRegion::DEFAULT))]
    pub region: String,

    /// Bucket teardown behavior.
    #[builder(default = RemovalMode::default_for(env_name))]
    pub removal: RemovalMode,
}

impl Settings {
    /// Turn the account and region into a deployment target.
    ///
    /// # Errors
    /// [`PulseError::MissingAccount`] when no account was resolved.
    pub fn target(&self) -> PulseResult<TargetEnvironment> {
        Ok(TargetEnvironment {
            account: AccountId::new(self.account.as_str())?,
            region: AwsRegion::new(self.region.as_str()),
        })
    }
}

/// Resolve [`Settings`] from the environment and the provisioning context.
#[must_use]
pub fn resolve_settings(env: &impl EnvSource, context: &impl ContextSource) -> Settings {
    let env_name = lookup(env, APP_ENV_VAR)
        .map(|raw| EnvName::from(raw.as_str()))
        .unwrap_or_default();
    if !env_name.is_known() {
        warn!(env_name = %env_name, "unrecognized {APP_ENV_VAR}, using it as the tier label");
    }

    let account = lookup(env, ACCOUNT_VAR)
        .or_else(|| lookup_context(context, ACCOUNT_CONTEXT_KEY))
        .unwrap_or_default();

    let region = lookup(env, REGION_VAR)
        .or_else(|| lookup_context(context, REGION_CONTEXT_KEY))
        .or_else(|| lookup(env, AWS_REGION_VAR))
        .unwrap_or_else(|| AwsRegion::DEFAULT.to_owned());

    let removal = match lookup(env, REMOVAL_POLICY_VAR).map(|raw| raw.parse::<RemovalMode>()) {
        Some(Ok(removal)) => removal,
        Some(Err(err)) => {
            let fallback = RemovalMode::default_for(&env_name);
            warn!(error = %err, removal = %fallback, "ignoring {REMOVAL_POLICY_VAR}");
            fallback
        }
        None => RemovalMode::default_for(&env_name),
    };

    debug!(
        env_name = %env_name,
        account = %account,
        region = %region,
        removal = %removal,
        "resolved settings"
    );

    Settings {
        env_name,
        account,
        region,
        removal,
    }
}

/// Environment lookup where an empty value counts as unset.
fn lookup(env: &impl EnvSource, key: &str) -> Option<String> {
    env.var(key).filter(|v| !v.is_empty())
}

fn lookup_context(context: &impl ContextSource, key: &str) -> Option<String> {
    context.try_get_context(key).filter(|v| !v.is_empty())
}
