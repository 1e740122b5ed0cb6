//! Lookup sources for ambient configuration.
//!
//! The resolver never reads process state directly. It asks an [`EnvSource`]
//! for environment variables and a [`ContextSource`] for provisioning-context
//! parameters, so the entry point reads the ambient state once and tests can
//! supply plain maps.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use tracing::debug;

use crate::error::{PulseError, PulseResult};

/// Environment variable carrying the context object handed to the app by the
/// CDK CLI.
pub const CONTEXT_JSON_VAR: &str = "CDK_CONTEXT_JSON";

/// Read-only view of environment variables.
pub trait EnvSource {
    /// Value of the variable `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// Read-only view of provisioning-context parameters.
pub trait ContextSource {
    /// Value of the context parameter `key`, if supplied.
    fn try_get_context(&self, key: &str) -> Option<String>;
}

/// [`EnvSource`] backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Context parameters collected from `CDK_CONTEXT_JSON` and `-c key=value`
/// pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMap {
    values: BTreeMap<String, String>,
}

impl ContextMap {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a context JSON object. Non-string values keep their JSON text.
    pub fn from_json(raw: &str) -> PulseResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| PulseError::InvalidContext(format!("{CONTEXT_JSON_VAR}: {e}")))?;
        let serde_json::Value::Object(entries) = value else {
            return Err(PulseError::InvalidContext(format!(
                "{CONTEXT_JSON_VAR} must be a JSON object"
            )));
        };

        let values = entries
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();

        Ok(Self { values })
    }

    /// Build the context from the environment's `CDK_CONTEXT_JSON`, if any.
    pub fn from_env(env: &impl EnvSource) -> PulseResult<Self> {
        match env.var(CONTEXT_JSON_VAR) {
            Some(raw) if !raw.trim().is_empty() => {
                let context = Self::from_json(&raw)?;
                debug!(keys = context.len(), "loaded context from {CONTEXT_JSON_VAR}");
                Ok(context)
            }
            _ => Ok(Self::new()),
        }
    }

    /// Overlay `key=value` pairs. Later pairs win over earlier values.
    pub fn with_overrides<I, T>(mut self, pairs: I) -> PulseResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((key, value)) = pair.split_once('=') else {
                return Err(PulseError::InvalidContext(format!(
                    "expected key=value, got {pair:?}"
                )));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(PulseError::InvalidContext(format!(
                    "empty context key in {pair:?}"
                )));
            }
            self.values.insert(key.to_owned(), value.to_owned());
        }
        Ok(self)
    }

    /// Number of context entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ContextSource for ContextMap {
    fn try_get_context(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ContextMap {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_context_json() {
        let context =
            ContextMap::from_json(r#"{"account":"123456789012","region":"eu-west-1","flag":true}"#)
                .unwrap();
        assert_eq!(
            context.try_get_context("account").as_deref(),
            Some("123456789012")
        );
        assert_eq!(context.try_get_context("flag").as_deref(), Some("true"));
        assert_eq!(context.try_get_context("missing"), None);
    }

    #[test]
    fn test_should_reject_non_object_context_json() {
        assert!(matches!(
            ContextMap::from_json("[1, 2]"),
            Err(PulseError::InvalidContext(_))
        ));
        assert!(ContextMap::from_json("{not json").is_err());
    }

    #[test]
    fn test_should_prefer_command_line_pairs_over_context_json() {
        let context = ContextMap::from_json(r#"{"region":"eu-west-1"}"#)
            .unwrap()
            .with_overrides(["region=us-west-2", "account=123456789012"])
            .unwrap();
        assert_eq!(
            context.try_get_context("region").as_deref(),
            Some("us-west-2")
        );
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_should_reject_malformed_pairs() {
        assert!(ContextMap::new().with_overrides(["account"]).is_err());
        assert!(ContextMap::new().with_overrides(["=value"]).is_err());
    }

    #[test]
    fn test_should_keep_equals_signs_in_values() {
        let context = ContextMap::new().with_overrides(["note=a=b"]).unwrap();
        assert_eq!(context.try_get_context("note").as_deref(), Some("a=b"));
    }

    #[test]
    fn test_should_load_context_from_env_source() {
        let env = HashMap::from([(
            CONTEXT_JSON_VAR.to_owned(),
            r#"{"account":"210987654321"}"#.to_owned(),
        )]);
        let context = ContextMap::from_env(&env).unwrap();
        assert_eq!(
            context.try_get_context("account").as_deref(),
            Some("210987654321")
        );

        let empty: HashMap<String, String> = HashMap::new();
        assert!(ContextMap::from_env(&empty).unwrap().is_empty());
    }
}
