//! Hardened response headers attached to every response the distribution
//! serves. Values are fixed; only the policy name varies per target.

use pulsestack_core::{Settings, TargetEnvironment};
use pulsestack_template::resources::cloudfront::{
    ContentSecurityPolicy, ContentTypeOptions, FrameOption, FrameOptions, ReferrerPolicy,
    ReferrerPolicyHeader, ResponseHeadersPolicy, ResponseHeadersPolicyConfig,
    SecurityHeadersConfig, StrictTransportSecurity, XssProtection,
};
use pulsestack_template::{Template, TemplateResult};

use crate::ids;

/// Permissive single-page-app policy. Tighten once the app's domains are known.
pub const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self' 'unsafe-inline' 'unsafe-eval' data: blob: https:";

/// HSTS `max-age`: 365 days.
pub const HSTS_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// The fixed header set.
#[must_use]
pub fn security_headers() -> SecurityHeadersConfig {
    SecurityHeadersConfig {
        content_security_policy: Some(ContentSecurityPolicy {
            content_security_policy: CONTENT_SECURITY_POLICY.to_owned(),
            override_origin: true,
        }),
        content_type_options: Some(ContentTypeOptions {
            override_origin: true,
        }),
        frame_options: Some(FrameOptions {
            frame_option: FrameOption::Deny,
            override_origin: true,
        }),
        referrer_policy: Some(ReferrerPolicyHeader {
            referrer_policy: ReferrerPolicy::NoReferrerWhenDowngrade,
            override_origin: true,
        }),
        strict_transport_security: Some(StrictTransportSecurity {
            access_control_max_age_sec: HSTS_MAX_AGE_SECS,
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
    }
}

pub(crate) fn declare(
    template: &mut Template,
    settings: &Settings,
    target: &TargetEnvironment,
) -> TemplateResult<()> {
    let policy = ResponseHeadersPolicy {
        response_headers_policy_config: ResponseHeadersPolicyConfig {
            // Policy names are account-wide.
            name: format!(
                "{}-{}-{}-{}",
                ids::STACK_NAME,
                settings.env_name,
                target.region,
                ids::SECURITY_HEADERS
            ),
            comment: Some("Baseline security headers for the Pulseboard site".to_owned()),
            security_headers_config: security_headers(),
        },
    };
    template.add_resource(ids::SECURITY_HEADERS, &policy)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_emit_hardened_defaults() {
        let value = serde_json::to_value(security_headers()).unwrap();
        assert_eq!(
            value,
            json!({
                "ContentSecurityPolicy": {
                    "ContentSecurityPolicy": "default-src 'self' 'unsafe-inline' 'unsafe-eval' data: blob: https:",
                    "Override": true
                },
                "ContentTypeOptions": {"Override": true},
                "FrameOptions": {"FrameOption": "DENY", "Override": true},
                "ReferrerPolicy": {
                    "ReferrerPolicy": "no-referrer-when-downgrade",
                    "Override": true
                },
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
    fn test_should_name_policy_per_environment_and_region() {
        let settings = Settings::builder()
            .account("123456789012".into())
            .region("eu-west-1".into())
            .build();
        let target = settings.target().unwrap();
        let mut template = Template::default();
        declare(&mut template, &settings, &target).unwrap();

        let config = &template.resources[ids::SECURITY_HEADERS].properties
            ["ResponseHeadersPolicyConfig"];
        assert_eq!(config["Name"], "PulseStack-dev-eu-west-1-SecurityHeaders");
    }
}
