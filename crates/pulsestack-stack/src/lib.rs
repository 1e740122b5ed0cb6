//! PulseStack: a private S3 bucket behind CloudFront.
//!
//! [`compose`] turns resolved [`Settings`](pulsestack_core::Settings) into a
//! [`StackDescription`]: the site bucket and its policy, a security headers
//! policy, the distribution, a placeholder upload, and the `WebUrl` and
//! `BucketName` outputs. [`synth`] writes that description out as a cloud
//! assembly ready for deployment.

pub mod assembly;
mod distribution;
mod error;
pub mod handlers;
pub mod ids;
pub mod placeholder;
pub mod security_headers;
mod site_bucket;
mod stack;

pub use assembly::{AssemblySummary, synth};
pub use error::{StackError, StackResult};
pub use placeholder::FileAsset;
pub use stack::{StackDescription, compose, stack_description};
