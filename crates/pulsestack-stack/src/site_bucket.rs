//! The private bucket holding site assets.
//!
//! Public access is blocked outright. The bucket policy refuses any request
//! made without TLS and lets CloudFront read objects only on behalf of this
//! stack's distribution. Teardown behavior follows [`RemovalMode`].

use pulsestack_core::{EnvName, RemovalMode, Settings};
use pulsestack_template::resources::custom::AutoDeleteObjects;
use pulsestack_template::resources::iam::{Effect, PolicyDocument, PolicyStatement, Principal};
use pulsestack_template::resources::s3::{
    Bucket, BucketPolicy, PublicAccessBlockConfiguration, Tag, VersioningConfiguration,
};
use pulsestack_template::{DeletionPolicy, Expr, Template, TemplateResult};
use serde_json::json;
use tracing::{debug, warn};

use crate::{distribution, handlers, ids};

/// Tag marking a bucket whose objects are purged on teardown.
pub const AUTO_DELETE_TAG: &str = "aws-cdk:auto-delete-objects";

/// Declare the bucket, its policy, and, in destroy mode, the purge resource.
pub(crate) fn declare(template: &mut Template, settings: &Settings) -> TemplateResult<()> {
    let destroy = settings.removal.is_destructive();

    let bucket = Bucket {
        bucket_name: None,
        public_access_block_configuration: Some(PublicAccessBlockConfiguration::block_all()),
        versioning_configuration: Some(VersioningConfiguration::default()),
        tags: if destroy {
            vec![Tag::new(AUTO_DELETE_TAG, "true")]
        } else {
            Vec::new()
        },
    };
    template
        .add_resource(ids::SITE_BUCKET, &bucket)?
        .removal_policy(removal_policy(settings.removal));

    let mut statements = vec![deny_insecure_transport(), allow_distribution_read()];
    let purge_token = if destroy {
        statements.push(allow_purge_handler());
        Some(handlers::declare_auto_delete(template)?)
    } else {
        None
    };

    let policy = BucketPolicy {
        bucket: Expr::reference(ids::SITE_BUCKET),
        policy_document: PolicyDocument::new(statements),
    };
    template.add_resource(ids::SITE_BUCKET_POLICY, &policy)?;

    if let Some(service_token) = purge_token {
        if settings.env_name == EnvName::Prod {
            warn!("prod bucket will be deleted with its contents on stack teardown");
        }
        let purge = AutoDeleteObjects {
            service_token,
            bucket_name: Expr::reference(ids::SITE_BUCKET),
        };
        template
            .add_resource(ids::SITE_BUCKET_AUTO_DELETE, &purge)?
            .depends_on(ids::SITE_BUCKET_POLICY)
            .removal_policy(DeletionPolicy::Delete);
    }

    debug!(removal = %settings.removal, "declared site bucket");
    Ok(())
}

fn removal_policy(mode: RemovalMode) -> DeletionPolicy {
    match mode {
        RemovalMode::Destroy => DeletionPolicy::Delete,
        RemovalMode::Retain => DeletionPolicy::Retain,
    }
}

fn bucket_and_objects() -> Vec<Expr> {
    vec![
        Expr::get_att(ids::SITE_BUCKET, "Arn"),
        objects_in_bucket(),
    ]
}

fn objects_in_bucket() -> Expr {
    Expr::concat(vec![Expr::get_att(ids::SITE_BUCKET, "Arn"), "/*".into()])
}

fn deny_insecure_transport() -> PolicyStatement {
    PolicyStatement {
        action: vec!["s3:*".to_owned()],
        condition: Some(json!({"Bool": {"aws:SecureTransport": "false"}})),
        effect: Effect::Deny,
        principal: Some(Principal::Aws(Expr::literal("*"))),
        resource: bucket_and_objects(),
    }
}

fn allow_distribution_read() -> PolicyStatement {
    let source_arn = distribution::distribution_arn();
    PolicyStatement {
        action: vec!["s3:GetObject".to_owned()],
        condition: Some(json!({"StringEquals": {"AWS:SourceArn": {"Fn::Sub": source_arn}}})),
        effect: Effect::Allow,
        principal: Some(Principal::Service("cloudfront.amazonaws.com".to_owned())),
        resource: vec![objects_in_bucket()],
    }
}

// The purge handler empties the bucket while this policy is still in place.
fn allow_purge_handler() -> PolicyStatement {
    PolicyStatement {
        action: vec![
            "s3:DeleteObject*".to_owned(),
            "s3:GetBucket*".to_owned(),
            "s3:List*".to_owned(),
        ],
        condition: None,
        effect: Effect::Allow,
        principal: Some(Principal::Aws(Expr::get_att(
            ids::AUTO_DELETE_HANDLER_ROLE,
            "Arn",
        ))),
        resource: bucket_and_objects(),
    }
}
