//! CloudFront distribution in front of the site bucket.
//!
//! The bucket is reached only through origin access control; the bucket
//! policy grants read to this distribution and nothing else.

use pulsestack_core::{Settings, TargetEnvironment};
use pulsestack_template::resources::cloudfront::{
    CACHING_OPTIMIZED_POLICY_ID, DefaultCacheBehavior, Distribution, DistributionConfig,
    HttpVersion, Origin, OriginAccessControl, OriginAccessControlConfig,
    OriginAccessControlOriginType, S3OriginConfig, SigningBehavior, SigningProtocol,
    ViewerProtocolPolicy,
};
use pulsestack_template::{Expr, Template, TemplateResult};

use crate::ids;

/// Object served for `/`.
pub const DEFAULT_ROOT_OBJECT: &str = "index.html";

/// Distribution comment.
pub const COMMENT: &str = "Pulseboard web distribution";

/// `Fn::Sub` template for this stack's distribution ARN.
pub(crate) fn distribution_arn() -> String {
    format!(
        "arn:${{AWS::Partition}}:cloudfront::${{AWS::AccountId}}:distribution/${{{}}}",
        ids::DISTRIBUTION
    )
}

pub(crate) fn declare(
    template: &mut Template,
    settings: &Settings,
    target: &TargetEnvironment,
) -> TemplateResult<()> {
    let oac = OriginAccessControl {
        origin_access_control_config: OriginAccessControlConfig {
            // At most 64 characters, unique per account.
            name: format!("{}-{}-{}-SiteOAC", ids::STACK_NAME, settings.env_name, target.region),
            description: Some("Origin access control for the Pulseboard site bucket".to_owned()),
            origin_access_control_origin_type: OriginAccessControlOriginType::S3,
            signing_behavior: SigningBehavior::Always,
            signing_protocol: SigningProtocol::Sigv4,
        },
    };
    template.add_resource(ids::ORIGIN_ACCESS_CONTROL, &oac)?;

    let distribution = Distribution {
        distribution_config: DistributionConfig {
            comment: Some(COMMENT.to_owned()),
            default_cache_behavior: DefaultCacheBehavior {
                cache_policy_id: CACHING_OPTIMIZED_POLICY_ID.to_owned(),
                compress: true,
                response_headers_policy_id: Some(Expr::reference(ids::SECURITY_HEADERS)),
                target_origin_id: ids::SITE_ORIGIN.to_owned(),
                viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
            },
            default_root_object: Some(DEFAULT_ROOT_OBJECT.to_owned()),
            enabled: true,
            http_version: HttpVersion::Http2,
            ipv6_enabled: true,
            origins: vec![Origin {
                domain_name: Expr::get_att(ids::SITE_BUCKET, "RegionalDomainName"),
                id: ids::SITE_ORIGIN.to_owned(),
                origin_access_control_id: Some(Expr::get_att(ids::ORIGIN_ACCESS_CONTROL, "Id")),
                s3_origin_config: Some(S3OriginConfig::default()),
            }],
        },
    };
    template.add_resource(ids::DISTRIBUTION, &distribution)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn declared() -> Template {
        let settings = Settings::builder()
            .account("123456789012".into())
            .build();
        let target = settings.target().unwrap();
        let mut template = Template::default();
        declare(&mut template, &settings, &target).unwrap();
        template
    }

    #[test]
    fn test_should_bind_origin_to_bucket_through_oac() {
        let template = declared();
        let config = &template.resources[ids::DISTRIBUTION].properties["DistributionConfig"];
        let origin = &config["Origins"][0];
        assert_eq!(
            origin["DomainName"],
            json!({"Fn::GetAtt": ["SiteBucket", "RegionalDomainName"]})
        );
        assert_eq!(
            origin["OriginAccessControlId"],
            json!({"Fn::GetAtt": ["DistributionOriginAccessControl", "Id"]})
        );
        assert_eq!(origin["S3OriginConfig"]["OriginAccessIdentity"], "");

        let oac = &template.resources[ids::ORIGIN_ACCESS_CONTROL].properties
            ["OriginAccessControlConfig"];
        assert_eq!(oac["SigningBehavior"], "always");
        assert_eq!(oac["SigningProtocol"], "sigv4");
        assert_eq!(oac["OriginAccessControlOriginType"], "s3");
        assert!(oac["Name"].as_str().unwrap().len() <= 64);
    }

    #[test]
    fn test_should_configure_default_behavior() {
        let template = declared();
        let config = &template.resources[ids::DISTRIBUTION].properties["DistributionConfig"];
        let behavior = &config["DefaultCacheBehavior"];
        assert_eq!(behavior["ViewerProtocolPolicy"], "redirect-to-https");
        assert_eq!(behavior["Compress"], true);
        assert_eq!(behavior["ResponseHeadersPolicyId"], json!({"Ref": "SecurityHeaders"}));
        assert_eq!(behavior["TargetOriginId"], config["Origins"][0]["Id"]);
        assert_eq!(config["DefaultRootObject"], "index.html");
        assert_eq!(config["Comment"], COMMENT);
        assert_eq!(config["Enabled"], true);
    }
}
