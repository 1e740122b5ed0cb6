//! IAM policy documents and roles.
//!
//! The same [`PolicyDocument`] shape serves resource policies (bucket
//! policies, which name a principal per statement) and identity policies
//! attached to a [`Role`], which do not.

use serde::Serialize;

use crate::expr::Expr;
use crate::template::ResourceProperties;

/// IAM policy statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    /// Grant.
    Allow,
    /// Refuse; overrides any grant.
    Deny,
}

/// Statement principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Principal {
    /// IAM principal, `"*"` for everyone.
    #[serde(rename = "AWS")]
    Aws(Expr),
    /// AWS service principal such as `cloudfront.amazonaws.com`.
    #[serde(rename = "Service")]
    Service(String),
}

/// One policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    /// Actions the statement covers.
    pub action: Vec<String>,
    /// Condition block: operator, then key, then value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<serde_json::Value>,
    /// Allow or deny.
    pub effect: Effect,
    /// Who the statement applies to. Absent in identity policies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    /// Resources the statement covers. Absent in trust policies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<Expr>,
}

impl PolicyStatement {
    /// Identity-policy grant of `actions` on `resource`.
    #[must_use]
    pub fn allow(actions: &[&str], resource: Vec<Expr>) -> Self {
        Self {
            action: actions.iter().map(|a| (*a).to_owned()).collect(),
            condition: None,
            effect: Effect::Allow,
            principal: None,
            resource,
        }
    }
}

/// IAM policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Statements, evaluated together.
    pub statement: Vec<PolicyStatement>,
    /// Policy language version.
    pub version: String,
}

impl PolicyDocument {
    /// Policy language version in current use.
    pub const VERSION: &str = "2012-10-17";

    /// Document with the given statements.
    #[must_use]
    pub fn new(statement: Vec<PolicyStatement>) -> Self {
        Self {
            statement,
            version: Self::VERSION.to_owned(),
        }
    }

    /// Trust policy letting an AWS service assume the role.
    #[must_use]
    pub fn assumable_by(service: &str) -> Self {
        Self::new(vec![PolicyStatement {
            action: vec!["sts:AssumeRole".to_owned()],
            condition: None,
            effect: Effect::Allow,
            principal: Some(Principal::Service(service.to_owned())),
            resource: Vec::new(),
        }])
    }
}

/// Inline policy embedded in a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RolePolicy {
    /// Name, unique within the role.
    pub policy_name: String,
    /// Policy document.
    pub policy_document: PolicyDocument,
}

/// `AWS::IAM::Role` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    /// Who may assume the role.
    pub assume_role_policy_document: PolicyDocument,
    /// Managed policies attached to the role.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<Expr>,
    /// Inline policies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<RolePolicy>,
}

impl ResourceProperties for Role {
    const TYPE: &'static str = "AWS::IAM::Role";
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_serialize_resource_policy_statement() {
        let statement = PolicyStatement {
            action: vec!["s3:GetObject".to_owned()],
            condition: None,
            effect: Effect::Allow,
            principal: Some(Principal::Service("cloudfront.amazonaws.com".to_owned())),
            resource: vec![Expr::literal("arn:aws:s3:::b/*")],
        };
        let doc = PolicyDocument::new(vec![statement]);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "Statement": [{
                    "Action": ["s3:GetObject"],
                    "Effect": "Allow",
                    "Principal": {"Service": "cloudfront.amazonaws.com"},
                    "Resource": ["arn:aws:s3:::b/*"]
                }],
                "Version": "2012-10-17"
            })
        );
    }

    #[test]
    fn test_should_serialize_role_without_principal_in_inline_policy() {
        let role = Role {
            assume_role_policy_document: PolicyDocument::assumable_by("lambda.amazonaws.com"),
            managed_policy_arns: Vec::new(),
            policies: vec![RolePolicy {
                policy_name: "Read".to_owned(),
                policy_document: PolicyDocument::new(vec![PolicyStatement::allow(
                    &["s3:GetObject"],
                    vec![Expr::literal("arn:aws:s3:::b/*")],
                )]),
            }],
        };
        assert_eq!(
            serde_json::to_value(&role).unwrap(),
            json!({
                "AssumeRolePolicyDocument": {
                    "Statement": [{
                        "Action": ["sts:AssumeRole"],
                        "Effect": "Allow",
                        "Principal": {"Service": "lambda.amazonaws.com"}
                    }],
                    "Version": "2012-10-17"
                },
                "Policies": [{
                    "PolicyName": "Read",
                    "PolicyDocument": {
                        "Statement": [{
                            "Action": ["s3:GetObject"],
                            "Effect": "Allow",
                            "Resource": ["arn:aws:s3:::b/*"]
                        }],
                        "Version": "2012-10-17"
                    }
                }]
            })
        );
    }
}
