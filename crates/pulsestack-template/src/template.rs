//! Template containers: resources and outputs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{TemplateError, TemplateResult};
use crate::expr::Expr;

/// CloudFormation template format version.
pub const FORMAT_VERSION: &str = "2010-09-09";

/// Typed properties of one CloudFormation resource type.
pub trait ResourceProperties: Serialize {
    /// CloudFormation type name, e.g. `AWS::S3::Bucket`.
    const TYPE: &'static str;
}

/// What CloudFormation does with a resource on deletion or replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    /// Delete the physical resource.
    Delete,
    /// Keep the physical resource.
    Retain,
}

/// A declared resource with its properties erased to JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    /// CloudFormation type name.
    #[serde(rename = "Type")]
    pub resource_type: String,
    /// Resource properties.
    pub properties: serde_json::Value,
    /// Explicit ordering dependencies.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Policy applied when the stack deletes the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,
    /// Policy applied when an update replaces the resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<DeletionPolicy>,
}

impl Resource {
    /// Erase typed properties into a resource declaration.
    pub fn new<P: ResourceProperties>(logical_id: &str, properties: &P) -> TemplateResult<Self> {
        let properties =
            serde_json::to_value(properties).map_err(|source| TemplateError::Serialize {
                logical_id: logical_id.to_owned(),
                source,
            })?;
        Ok(Self {
            resource_type: P::TYPE.to_owned(),
            properties,
            depends_on: Vec::new(),
            deletion_policy: None,
            update_replace_policy: None,
        })
    }

    /// Add an explicit dependency on another resource.
    pub fn depends_on(&mut self, logical_id: impl Into<String>) -> &mut Self {
        let logical_id = logical_id.into();
        if !self.depends_on.contains(&logical_id) {
            self.depends_on.push(logical_id);
        }
        self
    }

    /// Apply the same policy to deletion and replacement.
    pub fn removal_policy(&mut self, policy: DeletionPolicy) -> &mut Self {
        self.deletion_policy = Some(policy);
        self.update_replace_policy = Some(policy);
        self
    }
}

/// A named value exposed after provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    /// Value expression.
    pub value: Expr,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Output {
    /// Output with a description.
    #[must_use]
    pub fn new(value: Expr, description: impl Into<String>) -> Self {
        Self {
            value,
            description: Some(description.into()),
        }
    }
}

/// A CloudFormation template.
///
/// Maps are ordered by logical ID so that serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    /// Format version, always [`FORMAT_VERSION`].
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,
    /// Stack description.
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared resources.
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, Resource>,
    /// Named outputs.
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION.to_owned(),
            description: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }
}

impl Template {
    /// Create an empty template with a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Declare a resource and return it for further adjustment.
    pub fn add_resource<P: ResourceProperties>(
        &mut self,
        logical_id: &str,
        properties: &P,
    ) -> TemplateResult<&mut Resource> {
        self.ensure_unused(logical_id)?;
        let resource = Resource::new(logical_id, properties)?;
        Ok(self
            .resources
            .entry(logical_id.to_owned())
            .or_insert(resource))
    }

    /// Declare an output.
    pub fn add_output(&mut self, name: &str, output: Output) -> TemplateResult<()> {
        if self.outputs.contains_key(name) {
            return Err(TemplateError::DuplicateLogicalId(name.to_owned()));
        }
        self.outputs.insert(name.to_owned(), output);
        Ok(())
    }

    /// Resources of the given CloudFormation type.
    pub fn resources_of_type<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
            .map(|(id, r)| (id.as_str(), r))
    }

    /// Whether a logical ID names a declared resource.
    #[must_use]
    pub fn declares(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn ensure_unused(&self, logical_id: &str) -> TemplateResult<()> {
        if self.declares(logical_id) {
            return Err(TemplateError::DuplicateLogicalId(logical_id.to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Topic {
        display_name: String,
    }

    impl ResourceProperties for Topic {
        const TYPE: &'static str = "AWS::SNS::Topic";
    }

    #[test]
    fn test_should_serialize_template_shape() {
        let mut template = Template::new("demo");
        template
            .add_resource(
                "Alerts",
                &Topic {
                    display_name: "alerts".to_owned(),
                },
            )
            .unwrap()
            .removal_policy(DeletionPolicy::Retain);
        template
            .add_output("TopicArn", Output::new(Expr::reference("Alerts"), "topic"))
            .unwrap();

        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(value["Description"], "demo");
        assert!(value.get("Parameters").is_none());
        assert_eq!(
            value["Resources"]["Alerts"],
            json!({
                "Type": "AWS::SNS::Topic",
                "Properties": {"DisplayName": "alerts"},
                "DeletionPolicy": "Retain",
                "UpdateReplacePolicy": "Retain"
            })
        );
        assert_eq!(
            value["Outputs"]["TopicArn"],
            json!({"Value": {"Ref": "Alerts"}, "Description": "topic"})
        );
    }

    #[test]
    fn test_should_reject_duplicate_logical_ids() {
        let mut template = Template::default();
        let topic = Topic {
            display_name: "a".to_owned(),
        };
        template.add_resource("Alerts", &topic).unwrap();
        assert!(matches!(
            template.add_resource("Alerts", &topic),
            Err(TemplateError::DuplicateLogicalId(_))
        ));
    }

    #[test]
    fn test_should_deduplicate_dependencies() {
        let mut template = Template::default();
        let resource = template
            .add_resource(
                "Alerts",
                &Topic {
                    display_name: "a".to_owned(),
                },
            )
            .unwrap();
        resource.depends_on("Other").depends_on("Other");
        assert_eq!(resource.depends_on, vec!["Other".to_owned()]);
    }

    #[test]
    fn test_should_filter_resources_by_type() {
        let mut template = Template::default();
        let topic = Topic {
            display_name: "a".to_owned(),
        };
        template.add_resource("A", &topic).unwrap();
        template.add_resource("B", &topic).unwrap();
        assert_eq!(template.resources_of_type("AWS::SNS::Topic").count(), 2);
        assert_eq!(template.resources_of_type("AWS::S3::Bucket").count(), 0);
    }
}
