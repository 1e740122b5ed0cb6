//! Lambda function properties.

use serde::Serialize;

use crate::expr::Expr;
use crate::template::ResourceProperties;

/// Largest source CloudFormation accepts inline in `Code.ZipFile`.
pub const INLINE_CODE_LIMIT: usize = 4096;

/// Function code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Code {
    /// Inline source. For Python runtimes CloudFormation also provides the
    /// `cfnresponse` module next to it.
    pub zip_file: String,
}

/// `AWS::Lambda::Function` properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Function {
    /// Function code.
    pub code: Code,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Entry point, `module.function`.
    pub handler: String,
    /// Memory in MiB.
    pub memory_size: u32,
    /// Execution role ARN.
    pub role: Expr,
    /// Runtime identifier, e.g. `python3.12`.
    pub runtime: String,
    /// Timeout in seconds.
    pub timeout: u32,
}

impl ResourceProperties for Function {
    const TYPE: &'static str = "AWS::Lambda::Function";
}
