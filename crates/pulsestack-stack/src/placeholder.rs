//! Placeholder content and its upload.
//!
//! A single `index.html` is packaged as a zip file asset. The asset is
//! published to the CDK bootstrap staging bucket under `<sha256>.zip`, and a
//! bucket deployment extracts it into the site bucket, then invalidates the
//! distribution cache. Pruning is off, so earlier uploads are left alone.

use std::io::{Cursor, Write};

use pulsestack_core::TargetEnvironment;
use pulsestack_template::resources::custom::BucketDeployment;
use pulsestack_template::{Expr, Template, TemplateResult};
use sha2::{Digest, Sha256};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::StackResult;
use crate::{handlers, ids};

/// Body of the placeholder page.
pub const PLACEHOLDER_HTML: &str = include_str!("../assets/index.html");

/// Object key of the placeholder page in the site bucket.
pub const PLACEHOLDER_KEY: &str = "index.html";

/// Default CDK bootstrap qualifier.
pub const BOOTSTRAP_QUALIFIER: &str = "hnb659fds";

/// Paths invalidated after upload.
pub const INVALIDATION_PATHS: &[&str] = &["/*"];

/// A packaged file asset: a deterministic zip archive and its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAsset {
    /// Hex SHA-256 of the packaged files.
    pub hash: String,
    /// Zip archive bytes.
    pub archive: Vec<u8>,
}

impl FileAsset {
    /// Package `(name, contents)` pairs into a zip archive.
    ///
    /// The hash covers names and contents only, so identical inputs always
    /// give the same hash and the same bytes.
    pub fn package(files: &[(&str, &[u8])]) -> StackResult<Self> {
        let mut sorted: Vec<&(&str, &[u8])> = files.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);

        let mut hasher = Sha256::new();
        for (name, contents) in &sorted {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
            hasher.update(contents);
            hasher.update([0u8]);
        }
        let hash = hex::encode(hasher.finalize());

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in &sorted {
            writer.start_file(*name, options)?;
            writer.write_all(contents).map_err(zip::result::ZipError::Io)?;
        }
        let archive = writer.finish()?.into_inner();

        debug!(hash = %hash, bytes = archive.len(), files = sorted.len(), "packaged file asset");
        Ok(Self { hash, archive })
    }

    /// Key of the archive in the staging bucket.
    #[must_use]
    pub fn object_key(&self) -> String {
        format!("{}.zip", self.hash)
    }

    /// File name of the archive inside the cloud assembly.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("asset.{}.zip", self.hash)
    }
}

/// Package the placeholder page.
pub fn placeholder_asset() -> StackResult<FileAsset> {
    FileAsset::package(&[(PLACEHOLDER_KEY, PLACEHOLDER_HTML.as_bytes())])
}

/// Bootstrap staging bucket for a concrete target.
#[must_use]
pub fn staging_bucket_name(target: &TargetEnvironment) -> String {
    format!(
        "cdk-{BOOTSTRAP_QUALIFIER}-assets-{}-{}",
        target.account, target.region
    )
}

/// Role the publisher assumes to upload file assets.
#[must_use]
pub fn publishing_role_arn(target: &TargetEnvironment) -> String {
    format!(
        "arn:${{AWS::Partition}}:iam::{account}:role/cdk-{BOOTSTRAP_QUALIFIER}-file-publishing-role-{account}-{region}",
        account = target.account,
        region = target.region,
    )
}

/// `Fn::Sub` template for the staging bucket of whichever account deploys.
fn staging_bucket_sub() -> String {
    format!("cdk-{BOOTSTRAP_QUALIFIER}-assets-${{AWS::AccountId}}-${{AWS::Region}}")
}

/// `Fn::Sub` template for the staging bucket ARN.
pub(crate) fn staging_bucket_arn() -> String {
    format!("arn:${{AWS::Partition}}:s3:::{}", staging_bucket_sub())
}

pub(crate) fn declare(template: &mut Template, asset: &FileAsset) -> TemplateResult<()> {
    let service_token = handlers::declare_bucket_deployment(template)?;

    let deployment = BucketDeployment {
        service_token,
        source_bucket_names: vec![Expr::sub(staging_bucket_sub())],
        source_object_keys: vec![asset.object_key()],
        destination_bucket_name: Expr::reference(ids::SITE_BUCKET),
        prune: false,
        distribution_id: Some(Expr::reference(ids::DISTRIBUTION)),
        distribution_paths: INVALIDATION_PATHS.iter().map(|p| (*p).to_owned()).collect(),
        output_object_keys: true,
    };
    template
        .add_resource(ids::DEPLOY_PLACEHOLDER, &deployment)?
        .depends_on(ids::DISTRIBUTION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use pulsestack_core::{AccountId, AwsRegion};

    use super::*;

    fn target() -> TargetEnvironment {
        TargetEnvironment {
            account: AccountId::new("123456789012").unwrap(),
            region: AwsRegion::new("ca-central-1"),
        }
    }

    #[test]
    fn test_should_package_placeholder_deterministically() {
        let first = placeholder_asset().unwrap();
        let second = placeholder_asset().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.hash.len(), 64);
        assert_eq!(first.object_key(), format!("{}.zip", first.hash));
        assert_eq!(first.file_name(), format!("asset.{}.zip", first.hash));
    }

    #[test]
    fn test_should_change_hash_with_contents() {
        let a = FileAsset::package(&[("index.html", b"a".as_slice())]).unwrap();
        let b = FileAsset::package(&[("index.html", b"b".as_slice())]).unwrap();
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_should_contain_index_html() {
        let asset = placeholder_asset().unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(asset.archive)).unwrap();
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_name(PLACEHOLDER_KEY).unwrap();
        let mut body = String::new();
        entry.read_to_string(&mut body).unwrap();
        assert!(body.contains("Pulseboard is live behind CloudFront"));
    }

    #[test]
    fn test_should_name_bootstrap_locations() {
        let target = target();
        assert_eq!(
            staging_bucket_name(&target),
            "cdk-hnb659fds-assets-123456789012-ca-central-1"
        );
        assert_eq!(
            publishing_role_arn(&target),
            "arn:${AWS::Partition}:iam::123456789012:role/cdk-hnb659fds-file-publishing-role-123456789012-ca-central-1"
        );
    }

    #[test]
    fn test_should_declare_non_pruning_deployment_with_invalidation() {
        let asset = placeholder_asset().unwrap();
        let mut template = Template::default();
        declare(&mut template, &asset).unwrap();

        let deploy = &template.resources[ids::DEPLOY_PLACEHOLDER];
        assert_eq!(deploy.resource_type, "Custom::CDKBucketDeployment");
        assert_eq!(deploy.depends_on, vec![ids::DISTRIBUTION.to_owned()]);

        let props = &deploy.properties;
        assert_eq!(props["Prune"], false);
        assert_eq!(props["DestinationBucketName"]["Ref"], ids::SITE_BUCKET);
        assert_eq!(props["DistributionId"]["Ref"], ids::DISTRIBUTION);
        assert_eq!(props["DistributionPaths"][0], "/*");
        assert_eq!(props["SourceObjectKeys"][0], asset.object_key());
        assert_eq!(
            props["ServiceToken"],
            serde_json::json!({"Fn::GetAtt": ["BucketDeploymentHandler", "Arn"]})
        );
        assert!(template.resources.contains_key(ids::BUCKET_DEPLOYMENT_HANDLER_ROLE));
    }
}
