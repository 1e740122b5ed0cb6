//! Lambda handlers behind the two custom resources.
//!
//! Both handlers are inline Python, so the template deploys with no asset
//! beyond the placeholder archive. Each runs under its own role scoped to
//! the buckets and distribution it touches.

use pulsestack_template::resources::iam::{PolicyDocument, PolicyStatement, Role, RolePolicy};
use pulsestack_template::resources::lambda::{Code, Function};
use pulsestack_template::{Expr, Template, TemplateResult};

use crate::{distribution, ids, placeholder};

/// Runtime of both handlers.
pub const HANDLER_RUNTIME: &str = "python3.12";

/// Source of the bucket deployment handler.
pub const BUCKET_DEPLOYMENT_SOURCE: &str = include_str!("../assets/handlers/bucket_deployment.py");

/// Source of the purge handler.
pub const AUTO_DELETE_SOURCE: &str = include_str!("../assets/handlers/auto_delete_objects.py");

const BASIC_EXECUTION_POLICY: &str =
    "arn:${AWS::Partition}:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";

/// Declare the bucket deployment handler and return its service token.
pub(crate) fn declare_bucket_deployment(template: &mut Template) -> TemplateResult<Expr> {
    let policy = PolicyDocument::new(vec![
        PolicyStatement::allow(
            &["s3:GetObject"],
            vec![Expr::sub(format!("{}/*", placeholder::staging_bucket_arn()))],
        ),
        PolicyStatement::allow(&["s3:PutObject"], vec![site_objects()]),
        PolicyStatement::allow(
            &["cloudfront:CreateInvalidation"],
            vec![Expr::sub(distribution::distribution_arn())],
        ),
    ]);
    declare_handler(
        template,
        ids::BUCKET_DEPLOYMENT_HANDLER,
        ids::BUCKET_DEPLOYMENT_HANDLER_ROLE,
        policy,
        Handler {
            source: BUCKET_DEPLOYMENT_SOURCE,
            description: "Extracts staged archives into the site bucket and invalidates the distribution",
            memory_size: 256,
            timeout: 300,
        },
    )
}

/// Declare the purge handler and return its service token.
pub(crate) fn declare_auto_delete(template: &mut Template) -> TemplateResult<Expr> {
    let policy = PolicyDocument::new(vec![PolicyStatement::allow(
        &[
            "s3:GetBucketTagging",
            "s3:ListBucket",
            "s3:ListBucketVersions",
            "s3:DeleteObject",
            "s3:DeleteObjectVersion",
        ],
        vec![Expr::get_att(ids::SITE_BUCKET, "Arn"), site_objects()],
    )]);
    declare_handler(
        template,
        ids::AUTO_DELETE_HANDLER,
        ids::AUTO_DELETE_HANDLER_ROLE,
        policy,
        Handler {
            source: AUTO_DELETE_SOURCE,
            description: "Empties the site bucket before it is deleted",
            memory_size: 128,
            timeout: 300,
        },
    )
}

struct Handler {
    source: &'static str,
    description: &'static str,
    memory_size: u32,
    timeout: u32,
}

fn declare_handler(
    template: &mut Template,
    function_id: &str,
    role_id: &str,
    policy: PolicyDocument,
    handler: Handler,
) -> TemplateResult<Expr> {
    let role = Role {
        assume_role_policy_document: PolicyDocument::assumable_by("lambda.amazonaws.com"),
        managed_policy_arns: vec![Expr::sub(BASIC_EXECUTION_POLICY)],
        policies: vec![RolePolicy {
            policy_name: format!("{function_id}Policy"),
            policy_document: policy,
        }],
    };
    template.add_resource(role_id, &role)?;

    let function = Function {
        code: Code {
            zip_file: handler.source.to_owned(),
        },
        description: Some(handler.description.to_owned()),
        handler: "index.handler".to_owned(),
        memory_size: handler.memory_size,
        role: Expr::get_att(role_id, "Arn"),
        runtime: HANDLER_RUNTIME.to_owned(),
        timeout: handler.timeout,
    };
    template.add_resource(function_id, &function)?;

    Ok(Expr::get_att(function_id, "Arn"))
}

fn site_objects() -> Expr {
    Expr::concat(vec![Expr::get_att(ids::SITE_BUCKET, "Arn"), "/*".into()])
}
