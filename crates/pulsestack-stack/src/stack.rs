//! Stack composition.
//!
//! [`compose`] is a pure function of [`Settings`]: it validates the target,
//! declares the fixed set of resources, and checks the reference graph. It
//! reads no ambient state and performs no I/O.

use pulsestack_core::{Settings, TargetEnvironment};
use pulsestack_template::resources::cloudfront::{Distribution, ResponseHeadersPolicy};
use pulsestack_template::resources::custom::BucketDeployment;
use pulsestack_template::resources::s3::Bucket;
use pulsestack_template::{Expr, Output, ResourceProperties, Template};
use tracing::info;

use crate::error::StackResult;
use crate::placeholder::{self, FileAsset};
use crate::{distribution, ids, security_headers, site_bucket};

/// The composed stack: target, template, and the assets it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct StackDescription {
    /// CloudFormation stack name.
    pub stack_name: String,
    /// Settings the stack was composed from.
    pub settings: Settings,
    /// Validated deployment target.
    pub target: TargetEnvironment,
    /// Resource-description tree.
    pub template: Template,
    /// Packaged placeholder content.
    pub placeholder: FileAsset,
}

impl StackDescription {
    /// Stack description string.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.template.description.as_deref()
    }

    /// Value expression of the site URL output.
    #[must_use]
    pub fn web_url(&self) -> Option<&Expr> {
        self.template
            .outputs
            .get(ids::WEB_URL_OUTPUT)
            .map(|o| &o.value)
    }

    /// Number of declared resources per core kind: bucket, headers policy,
    /// distribution, content deployment.
    #[must_use]
    pub fn core_resource_counts(&self) -> [(&'static str, usize); 4] {
        [
            Bucket::TYPE,
            ResponseHeadersPolicy::TYPE,
            Distribution::TYPE,
            BucketDeployment::TYPE,
        ]
        .map(|t| (t, self.template.resources_of_type(t).count()))
    }
}

/// Description attached to the CloudFormation stack.
#[must_use]
pub fn stack_description(settings: &Settings) -> String {
    // Single space after "site"; deployed stacks compare this string verbatim.
    format!(
        "{}: static site hosting + CDN for PulseBoard :: ENV :: {}",
        ids::STACK_NAME,
        settings.env_name
    )
}

/// Compose the stack for `settings`.
///
/// # Errors
/// Fails with [`PulseError::MissingAccount`](pulsestack_core::PulseError::MissingAccount)
/// before anything is declared.
pub fn compose(settings: &Settings) -> StackResult<StackDescription> {
    let target = settings.target()?;
    let placeholder = placeholder::placeholder_asset()?;

    let mut template = Template::new(stack_description(settings));

    // 1) Private, versioned bucket with TLS-only policy.
    site_bucket::declare(&mut template, settings)?;

    // 2) Security headers.
    security_headers::declare(&mut template, settings, &target)?;

    // 3) Distribution bound to the bucket through origin access control.
    distribution::declare(&mut template, settings, &target)?;

    // 4) Placeholder upload, invalidating the distribution afterwards.
    placeholder::declare(&mut template, &placeholder)?;

    // 5) Outputs.
    template.add_output(
        ids::WEB_URL_OUTPUT,
        Output::new(
            Expr::concat(vec![
                "https://".into(),
                Expr::get_att(ids::DISTRIBUTION, "DomainName"),
            ]),
            "CloudFront URL of the site",
        ),
    )?;
    template.add_output(
        ids::BUCKET_NAME_OUTPUT,
        Output::new(
            Expr::reference(ids::SITE_BUCKET),
            "S3 bucket for static assets",
        ),
    )?;

    template.validate()?;

    info!(
        stack = ids::STACK_NAME,
        target = %target,
        env_name = %settings.env_name,
        removal = %settings.removal,
        resources = template.resources.len(),
        "composed stack"
    );

    Ok(StackDescription {
        stack_name: ids::STACK_NAME.to_owned(),
        settings: settings.clone(),
        target,
        template,
        placeholder,
    })
}
