//! CloudFront resource properties: distributions, origin access control, and
//! response headers policies.

use serde::Serialize;

use crate::expr::Expr;
use crate::template::ResourceProperties;

/// Managed `CachingOptimized` cache policy ID.
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// CloudFront ViewerProtocolPolicy enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ViewerProtocolPolicy {
    /// Serve both HTTP and HTTPS.
    #[serde(rename = "allow-all")]
    AllowAll,
    /// Reject plain HTTP.
    #[serde(rename = "https-only")]
    HttpsOnly,
    /// Redirect plain HTTP to HTTPS.
    #[default]
    #[serde(rename = "redirect-to-https")]
    RedirectToHttps,
}

impl ViewerProtocolPolicy {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllowAll => "allow-all",
            Self::HttpsOnly => "https-only",
            Self::RedirectToHttps => "redirect-to-https",
        }
    }
}

/// CloudFront FrameOptionsList enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FrameOption {
    /// Never allow framing.
    #[default]
    #[serde(rename = "DENY")]
    Deny,
    /// Allow framing by the same origin.
    #[serde(rename = "SAMEORIGIN")]
    SameOrigin,
}

impl FrameOption {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deny => "DENY",
            Self::SameOrigin => "SAMEORIGIN",
        }
    }
}

/// CloudFront ReferrerPolicyList enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    #[allow(missing_docs)]
    NoReferrer,
    /// Browser default: omit the referrer on HTTPS to HTTP navigation.
    #[default]
    NoReferrerWhenDowngrade,
    #[allow(missing_docs)]
    Origin,
    #[allow(missing_docs)]
    OriginWhenCrossOrigin,
    #[allow(missing_docs)]
    SameOrigin,
    #[allow(missing_docs)]
    StrictOrigin,
    #[allow(missing_docs)]
    StrictOriginWhenCrossOrigin,
    #[allow(missing_docs)]
    UnsafeUrl,
}

impl ReferrerPolicy {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoReferrer => "no-referrer",
            Self::NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
            Self::Origin => "origin",
            Self::OriginWhenCrossOrigin => "origin-when-cross-origin",
            Self::SameOrigin => "same-origin",
            Self::StrictOrigin => "strict-origin",
            Self::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
            Self::UnsafeUrl => "unsafe-url",
        }
    }
}

/// CloudFront HttpVersion enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum HttpVersion {
    #[allow(missing_docs)]
    #[serde(rename = "http1.1")]
    Http1_1,
    #[allow(missing_docs)]
    #[default]
    #[serde(rename = "http2")]
    Http2,
    #[allow(missing_docs)]
    #[serde(rename = "http2and3")]
    Http2And3,
    #[allow(missing_docs)]
    #[serde(rename = "http3")]
    Http3,
}

/// Origin access control signing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SigningBehavior {
    /// Sign every origin request.
    #[default]
    Always,
    /// Never sign.
    Never,
    /// Sign unless the viewer sent an `Authorization` header.
    NoOverride,
}

/// Origin access control signing protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningProtocol {
    /// AWS Signature Version 4.
    #[default]
    Sigv4,
}

/// Origin type an access control applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginAccessControlOriginType {
    /// S3 bucket origin.
    #[default]
    S3,
    /// Elemental MediaStore origin.
    Mediastore,
}

// ---------------------------------------------------------------------------
// Response headers policy
// ---------------------------------------------------------------------------

/// `Content-Security-Policy` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentSecurityPolicy {
    /// Header value.
    pub content_security_policy: String,
    /// Replace a header sent by the origin.
    #[serde(rename = "Override")]
    pub override_origin: bool,
}

/// `X-Content-Type-Options: nosniff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContentTypeOptions {
    /// Replace a header sent by the origin.
    #[serde(rename = "Override")]
    pub override_origin: bool,
}

/// `X-Frame-Options` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrameOptions {
    /// Header value.
    pub frame_option: FrameOption,
    /// Replace a header sent by the origin.
    #[serde(rename = "Override")]
    pub override_origin: bool,
}

/// `Referrer-Policy` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferrerPolicyHeader {
    /// Header value.
    pub referrer_policy: ReferrerPolicy,
    /// Replace a header sent by the origin.
    #[serde(rename = "Override")]
    pub override_origin: bool,
}

/// `Strict-Transport-Security` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StrictTransportSecurity {
    /// `max-age` in seconds.
    pub access_control_max_age_sec: u64,
    /// Append `includeSubDomains`.
    pub include_subdomains: bool,
    /// Replace a header sent by the origin.
    #[serde(rename = "Override")]
    pub override_origin: bool,
    /// Append `preload`.
    pub preload: bool,
}

/// `X-XSS-Protection` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct XssProtection {
    /// Append `mode=block`.
    pub mode_block: bool,
    /// Replace a header sent by the origin.
    #[serde(rename = "Override")]
    pub override_origin: bool,
    /// `1` when true, `0` when false.
    pub protection: bool,
    /// Optional `report=` URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_uri: Option<String>,
}

/// Security header set attached to responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityHeadersConfig {
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_security_policy: Option<ContentSecurityPolicy>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type_options: Option<ContentTypeOptions>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_options: Option<FrameOptions>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer_policy: Option<ReferrerPolicyHeader>,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_transport_security: Option<StrictTransportSecurity>,
    #[allow(missing_docs)]
    #[serde(rename = "XSSProtection", skip_serializing_if = "Option::is_none")]
    pub xss_protection: Option<XssProtection>,
}

/// Response headers policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseHeadersPolicyConfig {
    /// Policy name, unique per account.
    pub name: String,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Security headers.
    pub security_headers_config: SecurityHeadersConfig,
}

/// `AWS::CloudFront::ResponseHeadersPolicy` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseHeadersPolicy {
    #[allow(missing_docs)]
    pub response_headers_policy_config: ResponseHeadersPolicyConfig,
}

impl ResourceProperties for ResponseHeadersPolicy {
    const TYPE: &'static str = "AWS::CloudFront::ResponseHeadersPolicy";
}

// ---------------------------------------------------------------------------
// Origin access control
// ---------------------------------------------------------------------------

/// Origin access control configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginAccessControlConfig {
    /// Name, unique per account.
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[allow(missing_docs)]
    pub origin_access_control_origin_type: OriginAccessControlOriginType,
    #[allow(missing_docs)]
    pub signing_behavior: SigningBehavior,
    #[allow(missing_docs)]
    pub signing_protocol: SigningProtocol,
}

/// `AWS::CloudFront::OriginAccessControl` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginAccessControl {
    #[allow(missing_docs)]
    pub origin_access_control_config: OriginAccessControlConfig,
}

impl ResourceProperties for OriginAccessControl {
    const TYPE: &'static str = "AWS::CloudFront::OriginAccessControl";
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Legacy S3 origin settings. An empty identity means access goes through
/// origin access control instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3OriginConfig {
    #[allow(missing_docs)]
    pub origin_access_identity: String,
}

/// One distribution origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Origin {
    /// Origin host name.
    pub domain_name: Expr,
    /// Identifier that cache behaviors target.
    pub id: String,
    /// Origin access control attached to the origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_access_control_id: Option<Expr>,
    /// Present for S3 origins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_origin_config: Option<S3OriginConfig>,
}

/// Behavior applied to requests matching no other path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultCacheBehavior {
    /// Cache policy.
    pub cache_policy_id: String,
    /// Compress eligible responses.
    pub compress: bool,
    /// Response headers policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers_policy_id: Option<Expr>,
    /// Origin ID the behavior forwards to.
    pub target_origin_id: String,
    #[allow(missing_docs)]
    pub viewer_protocol_policy: ViewerProtocolPolicy,
}

/// Distribution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionConfig {
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[allow(missing_docs)]
    pub default_cache_behavior: DefaultCacheBehavior,
    /// Object served for requests to `/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_root_object: Option<String>,
    #[allow(missing_docs)]
    pub enabled: bool,
    #[allow(missing_docs)]
    pub http_version: HttpVersion,
    #[allow(missing_docs)]
    #[serde(rename = "IPV6Enabled")]
    pub ipv6_enabled: bool,
    #[allow(missing_docs)]
    pub origins: Vec<Origin>,
}

/// `AWS::CloudFront::Distribution` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Distribution {
    #[allow(missing_docs)]
    pub distribution_config: DistributionConfig,
}

impl ResourceProperties for Distribution {
    const TYPE: &'static str = "AWS::CloudFront::Distribution";
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_serialize_security_header_names() {
        let config = SecurityHeadersConfig {
            strict_transport_security: Some(StrictTransportSecurity {
                access_control_max_age_sec: 31_536_000,
                include_subdomains: true,
                override_origin: true,
                preload: true,
            }),
            xss_protection: Some(XssProtection {
                mode_block: true,
                override_origin: true,
                protection: true,
                report_uri: None,
            }),
            ..SecurityHeadersConfig::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({
                "StrictTransportSecurity": {
                    "AccessControlMaxAgeSec": 31_536_000,
                    "IncludeSubdomains": true,
                    "Override": true,
                    "Preload": true
                },
                "XSSProtection": {"ModeBlock": true, "Override": true, "Protection": true}
            })
        );
    }

    #[test]
    fn test_should_serialize_enum_wire_values() {
        assert_eq!(
            serde_json::to_value(ViewerProtocolPolicy::RedirectToHttps).unwrap(),
            json!("redirect-to-https")
        );
        assert_eq!(
            serde_json::to_value(ReferrerPolicy::NoReferrerWhenDowngrade).unwrap(),
            json!(ReferrerPolicy::NoReferrerWhenDowngrade.as_str())
        );
        assert_eq!(
            serde_json::to_value(ReferrerPolicy::StrictOriginWhenCrossOrigin).unwrap(),
            json!("strict-origin-when-cross-origin")
        );
        assert_eq!(serde_json::to_value(FrameOption::Deny).unwrap(), json!("DENY"));
        assert_eq!(serde_json::to_value(HttpVersion::Http2).unwrap(), json!("http2"));
        assert_eq!(serde_json::to_value(SigningBehavior::Always).unwrap(), json!("always"));
        assert_eq!(serde_json::to_value(SigningProtocol::Sigv4).unwrap(), json!("sigv4"));
        assert_eq!(
            serde_json::to_value(OriginAccessControlOriginType::S3).unwrap(),
            json!("s3")
        );
    }

    #[test]
    fn test_should_serialize_ipv6_flag_name() {
        let config = DistributionConfig {
            comment: None,
            default_cache_behavior: DefaultCacheBehavior {
                cache_policy_id: CACHING_OPTIMIZED_POLICY_ID.to_owned(),
                compress: true,
                response_headers_policy_id: None,
                target_origin_id: "origin".to_owned(),
                viewer_protocol_policy: ViewerProtocolPolicy::default(),
            },
            default_root_object: None,
            enabled: true,
            http_version: HttpVersion::default(),
            ipv6_enabled: true,
            origins: Vec::new(),
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["IPV6Enabled"], true);
        assert!(value.get("Ipv6Enabled").is_none());
        assert_eq!(value["DefaultCacheBehavior"]["ViewerProtocolPolicy"], "redirect-to-https");
    }
}
