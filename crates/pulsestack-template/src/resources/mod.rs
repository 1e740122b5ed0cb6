//! Typed properties for the resource types the stack declares.

pub mod cloudfront;
pub mod custom;
pub mod iam;
pub mod lambda;
pub mod s3;
