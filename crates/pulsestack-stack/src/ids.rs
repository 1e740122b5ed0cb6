//! Logical IDs of everything the stack declares.

/// Stack name used for the deployed CloudFormation stack.
pub const STACK_NAME: &str = "PulseStack";

/// Private site bucket.
pub const SITE_BUCKET: &str = "SiteBucket";
/// Policy attached to the site bucket.
pub const SITE_BUCKET_POLICY: &str = "SiteBucketPolicy";
/// Purge-on-teardown custom resource.
pub const SITE_BUCKET_AUTO_DELETE: &str = "SiteBucketAutoDeleteObjects";
/// Response headers policy.
pub const SECURITY_HEADERS: &str = "SecurityHeaders";
/// Origin access control binding the distribution to the bucket.
pub const ORIGIN_ACCESS_CONTROL: &str = "DistributionOriginAccessControl";
/// CloudFront distribution.
pub const DISTRIBUTION: &str = "Distribution";
/// Placeholder content upload.
pub const DEPLOY_PLACEHOLDER: &str = "DeployPlaceholder";

/// Origin ID inside the distribution config.
pub const SITE_ORIGIN: &str = "SiteBucketOrigin";

/// Lambda function backing the placeholder upload.
pub const BUCKET_DEPLOYMENT_HANDLER: &str = "BucketDeploymentHandler";
/// Execution role of [`BUCKET_DEPLOYMENT_HANDLER`].
pub const BUCKET_DEPLOYMENT_HANDLER_ROLE: &str = "BucketDeploymentHandlerRole";
/// Lambda function backing the purge resource.
pub const AUTO_DELETE_HANDLER: &str = "AutoDeleteObjectsHandler";
/// Execution role of [`AUTO_DELETE_HANDLER`].
pub const AUTO_DELETE_HANDLER_ROLE: &str = "AutoDeleteObjectsHandlerRole";

/// Output: public site URL.
pub const WEB_URL_OUTPUT: &str = "WebUrl";
/// Output: bucket name.
pub const BUCKET_NAME_OUTPUT: &str = "BucketName";
