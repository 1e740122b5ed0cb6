//! Custom resources backed by Lambda handlers declared in the same template.
//!
//! CloudFormation invokes the function named by `ServiceToken` on create,
//! update, and delete; the handler performs the work.

use serde::Serialize;

use crate::expr::Expr;
use crate::template::ResourceProperties;

/// `Custom::CDKBucketDeployment` properties: copy zipped sources into a
/// bucket, optionally invalidating a distribution afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketDeployment {
    /// Handler Lambda ARN.
    pub service_token: Expr,
    /// Buckets holding the source archives, parallel to `source_object_keys`.
    pub source_bucket_names: Vec<Expr>,
    /// Keys of the source archives.
    pub source_object_keys: Vec<String>,
    /// Bucket receiving the extracted files.
    pub destination_bucket_name: Expr,
    /// Delete destination objects absent from the sources.
    pub prune: bool,
    /// Distribution to invalidate after upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_id: Option<Expr>,
    /// Paths to invalidate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub distribution_paths: Vec<String>,
    /// Report extracted object keys as a resource attribute.
    pub output_object_keys: bool,
}

impl ResourceProperties for BucketDeployment {
    const TYPE: &'static str = "Custom::CDKBucketDeployment";
}

/// `Custom::S3AutoDeleteObjects` properties: empty a bucket before
/// CloudFormation deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AutoDeleteObjects {
    /// Handler Lambda ARN.
    pub service_token: Expr,
    /// Bucket to purge.
    pub bucket_name: Expr,
}

impl ResourceProperties for AutoDeleteObjects {
    const TYPE: &'static str = "Custom::S3AutoDeleteObjects";
}
