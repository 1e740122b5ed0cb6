//! Core types and configuration for PulseStack.
//!
//! This crate owns everything that depends on ambient process state: the
//! [`Settings`] record, the deployment tier and removal toggles, the
//! account/region target types, and the resolver that reads them from
//! environment variables and provisioning-context parameters.

pub mod config;
pub mod context;
mod error;
mod types;

pub use config::{EnvName, RemovalMode, Settings, resolve_settings};
pub use context::{ContextMap, ContextSource, EnvSource, ProcessEnv};
pub use error::{PulseError, PulseResult};
pub use types::{AccountId, AwsRegion, TargetEnvironment};
