//! CloudFormation values and intrinsic functions.
//!
//! An [`Expr`] is either a literal string or one of the intrinsic functions
//! the stack needs. It serializes to the JSON shape CloudFormation expects:
//!
//! ```text
//! Literal("a")              -> "a"
//! Ref("Bucket")             -> {"Ref": "Bucket"}
//! GetAtt("Bucket", "Arn")   -> {"Fn::GetAtt": ["Bucket", "Arn"]}
//! Join("", [a, b])          -> {"Fn::Join": ["", [a, b]]}
//! Sub("${AWS::Region}")     -> {"Fn::Sub": "${AWS::Region}"}
//! ```

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A CloudFormation value: literal text or an intrinsic function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Plain string.
    Literal(String),
    /// `Ref` to a resource, parameter, or pseudo parameter.
    Ref(String),
    /// `Fn::GetAtt` of a resource attribute.
    GetAtt(String, String),
    /// `Fn::Join` with a separator.
    Join(String, Vec<Expr>),
    /// `Fn::Sub` template string.
    Sub(String),
}

impl Expr {
    /// Literal string value.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// `{"Ref": logical_id}`.
    #[must_use]
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref(logical_id.into())
    }

    /// `{"Fn::GetAtt": [logical_id, attribute]}`.
    #[must_use]
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt(logical_id.into(), attribute.into())
    }

    /// `{"Fn::Join": [separator, parts]}`.
    #[must_use]
    pub fn join(separator: impl Into<String>, parts: Vec<Expr>) -> Self {
        Self::Join(separator.into(), parts)
    }

    /// `{"Fn::Sub": template}`.
    #[must_use]
    pub fn sub(template: impl Into<String>) -> Self {
        Self::Sub(template.into())
    }

    /// Concatenation of `parts` with no separator.
    #[must_use]
    pub fn concat(parts: Vec<Expr>) -> Self {
        Self::join("", parts)
    }

    /// Whether evaluating this expression needs no other template entity.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Literal(_) => true,
            Self::Ref(_) | Self::GetAtt(..) => false,
            Self::Sub(template) => sub_references(template).is_empty(),
            Self::Join(_, parts) => parts.iter().all(Self::is_constant),
        }
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_owned())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(s) => serializer.serialize_str(s),
            Self::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id)?;
                map.end()
            }
            Self::GetAtt(id, attr) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id, attr])?;
                map.end()
            }
            Self::Join(separator, parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(separator, parts))?;
                map.end()
            }
            Self::Sub(template) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Sub", template)?;
                map.end()
            }
        }
    }
}

/// Names referenced by `${...}` placeholders in an `Fn::Sub` template.
///
/// `${!Literal}` escapes are skipped and `${Res.Attr}` yields `Res`.
#[must_use]
pub fn sub_references(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        let inner = &after[..end];
        if !inner.starts_with('!') && !inner.is_empty() {
            let name = inner.split('.').next().unwrap_or(inner);
            names.push(name.to_owned());
        }
        rest = &after[end + 1..];
    }
    names
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_serialize_intrinsics() {
        let expr = Expr::concat(vec![
            Expr::literal("https://"),
            Expr::get_att("Distribution", "DomainName"),
        ]);
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({"Fn::Join": ["", ["https://", {"Fn::GetAtt": ["Distribution", "DomainName"]}]]})
        );
        assert_eq!(
            serde_json::to_value(Expr::reference("SiteBucket")).unwrap(),
            json!({"Ref": "SiteBucket"})
        );
        assert_eq!(
            serde_json::to_value(Expr::sub("${AWS::Region}")).unwrap(),
            json!({"Fn::Sub": "${AWS::Region}"})
        );
    }

    #[test]
    fn test_should_extract_sub_references() {
        assert_eq!(
            sub_references("arn:${AWS::Partition}:s3:::${SiteBucket}/*"),
            vec!["AWS::Partition".to_owned(), "SiteBucket".to_owned()]
        );
        assert_eq!(
            sub_references("${Distribution.DomainName} ${!Escaped}"),
            vec!["Distribution".to_owned()]
        );
        assert!(sub_references("no placeholders").is_empty());
    }

    #[test]
    fn test_should_detect_constant_expressions() {
        assert!(Expr::literal("x").is_constant());
        assert!(Expr::sub("plain").is_constant());
        assert!(!Expr::reference("SiteBucket").is_constant());
        assert!(!Expr::concat(vec!["a".into(), Expr::reference("B")]).is_constant());
    }
}
