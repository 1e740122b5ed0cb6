//! Typed CloudFormation template model.
//!
//! Resource properties are plain serde structs tagged with their
//! CloudFormation type through [`ResourceProperties`]. A [`Template`] stores
//! them erased to JSON, keyed by logical ID, and [`Template::validate`]
//! checks that every reference resolves and that resources form a DAG.
//!
//! # Example
//!
//! ```
//! use pulsestack_template::resources::s3::Bucket;
//! use pulsestack_template::{Expr, Output, Template};
//!
//! let mut template = Template::new("example");
//! template.add_resource("Assets", &Bucket::default()).unwrap();
//! template
//!     .add_output("AssetsName", Output::new(Expr::reference("Assets"), "bucket"))
//!     .unwrap();
//! template.validate().unwrap();
//! ```

mod error;
pub mod expr;
pub mod graph;
pub mod resources;
mod template;

pub use error::{TemplateError, TemplateResult};
pub use expr::Expr;
pub use template::{DeletionPolicy, FORMAT_VERSION, Output, Resource, ResourceProperties, Template};

impl Template {
    /// Check references and dependency order. See [`graph::validate`].
    pub fn validate(&self) -> TemplateResult<()> {
        graph::validate(self)
    }
}
