//! Cloud assembly writer.
//!
//! Layout of the output directory:
//!
//! | File                       | Contents                                   |
//! |----------------------------|--------------------------------------------|
//! | `manifest.json`            | Artifacts: the stack and its asset manifest |
//! | `PulseStack.template.json` | CloudFormation template                    |
//! | `PulseStack.assets.json`   | File asset sources and publish targets     |
//! | `asset.<sha256>.zip`       | Placeholder archive                        |
//!
//! Every file is rewritten on each run with identical bytes for identical
//! input.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{StackError, StackResult};
use crate::placeholder::{self, FileAsset};
use crate::stack::StackDescription;

/// Cloud assembly schema version written to every manifest.
pub const ASSEMBLY_VERSION: &str = "36.0.0";

/// Name of the top-level manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// What [`synth`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySummary {
    /// Output directory.
    pub out_dir: PathBuf,
    /// Path of the template file.
    pub template_file: PathBuf,
    /// Path of the placeholder archive.
    pub asset_file: PathBuf,
    /// Content hash of the placeholder archive.
    pub asset_hash: String,
}

// ---------------------------------------------------------------------------
// Manifest documents
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetManifest {
    version: &'static str,
    files: BTreeMap<String, FileAssetEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileAssetEntry {
    source: FileSource,
    destinations: BTreeMap<String, FileDestination>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileSource {
    path: String,
    packaging: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileDestination {
    bucket_name: String,
    object_key: String,
    region: String,
    assume_role_arn: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssemblyManifest {
    version: &'static str,
    artifacts: BTreeMap<String, Artifact>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    #[serde(rename = "type")]
    artifact_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<String>,
    properties: ArtifactProperties,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ArtifactProperties {
    #[serde(rename_all = "camelCase")]
    Assets { file: String },
    #[serde(rename_all = "camelCase")]
    Stack {
        template_file: String,
        stack_name: String,
    },
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Write the cloud assembly for `description` into `out_dir`.
///
/// # Errors
/// Returns [`StackError::Io`] when the directory or a file cannot be written.
pub fn synth(description: &StackDescription, out_dir: &Path) -> StackResult<AssemblySummary> {
    fs::create_dir_all(out_dir).map_err(|source| StackError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let stack_name = description.stack_name.as_str();
    let template_name = format!("{stack_name}.template.json");
    let assets_name = format!("{stack_name}.assets.json");
    let assets_artifact = format!("{stack_name}.assets");
    let asset = &description.placeholder;

    let template_json = description
        .template
        .to_json_pretty()
        .map_err(|source| StackError::Json {
            what: "template",
            source,
        })?;
    let template_file = write_file(out_dir, &template_name, &with_newline(template_json))?;

    let asset_file = write_file(out_dir, &asset.file_name(), &asset.archive)?;

    let assets = asset_manifest(description, asset);
    write_json(out_dir, &assets_name, "asset manifest", &assets)?;

    let mut artifacts = BTreeMap::new();
    artifacts.insert(
        assets_artifact.clone(),
        Artifact {
            artifact_type: "cdk:asset-manifest",
            environment: None,
            properties: ArtifactProperties::Assets { file: assets_name },
            dependencies: Vec::new(),
        },
    );
    artifacts.insert(
        stack_name.to_owned(),
        Artifact {
            artifact_type: "aws:cloudformation:stack",
            environment: Some(description.target.uri()),
            properties: ArtifactProperties::Stack {
                template_file: template_name,
                stack_name: stack_name.to_owned(),
            },
            dependencies: vec![assets_artifact],
        },
    );
    let manifest = AssemblyManifest {
        version: ASSEMBLY_VERSION,
        artifacts,
    };
    write_json(out_dir, MANIFEST_FILE, "cloud assembly manifest", &manifest)?;

    info!(
        out_dir = %out_dir.display(),
        stack = stack_name,
        asset = %asset.hash,
        "synthesized cloud assembly"
    );

    Ok(AssemblySummary {
        out_dir: out_dir.to_path_buf(),
        template_file,
        asset_file,
        asset_hash: asset.hash.clone(),
    })
}

fn asset_manifest(description: &StackDescription, asset: &FileAsset) -> AssetManifest {
    let target = &description.target;
    let mut destinations = BTreeMap::new();
    destinations.insert(
        format!("{}-{}", target.account, target.region),
        FileDestination {
            bucket_name: placeholder::staging_bucket_name(target),
            object_key: asset.object_key(),
            region: target.region.to_string(),
            assume_role_arn: placeholder::publishing_role_arn(target),
        },
    );

    let mut files = BTreeMap::new();
    files.insert(
        asset.hash.clone(),
        FileAssetEntry {
            source: FileSource {
                path: asset.file_name(),
                packaging: "file",
            },
            destinations,
        },
    );
    AssetManifest {
        version: ASSEMBLY_VERSION,
        files,
    }
}

fn with_newline(mut text: String) -> Vec<u8> {
    text.push('\n');
    text.into_bytes()
}

fn write_json<T: Serialize>(
    out_dir: &Path,
    name: &str,
    what: &'static str,
    value: &T,
) -> StackResult<PathBuf> {
    let json =
        serde_json::to_string_pretty(value).map_err(|source| StackError::Json { what, source })?;
    write_file(out_dir, name, &with_newline(json))
}

fn write_file(out_dir: &Path, name: &str, bytes: &[u8]) -> StackResult<PathBuf> {
    let path = out_dir.join(name);
    fs::write(&path, bytes).map_err(|source| StackError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote assembly file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use pulsestack_core::{EnvName, RemovalMode, Settings};
    use serde_json::Value;

    use super::*;
    use crate::stack::compose;

    fn composed() -> StackDescription {
        let settings = Settings::builder()
            .env_name(EnvName::Stage)
            .account("123456789012".into())
            .region("eu-west-1".into())
            .removal(RemovalMode::Retain)
            .build();
        compose(&settings).unwrap()
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
    }

    #[test]
    fn test_should_write_complete_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cdk.out");
        let stack = composed();
        let summary = synth(&stack, &out).unwrap();

        assert_eq!(summary.out_dir, out);
        assert_eq!(summary.template_file, out.join("PulseStack.template.json"));
        assert_eq!(summary.asset_hash, stack.placeholder.hash);
        assert!(summary.asset_file.is_file());

        let template = read_json(&summary.template_file);
        assert_eq!(template["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(
            template["Resources"]["Distribution"]["Type"],
            "AWS::CloudFront::Distribution"
        );

        let manifest = read_json(&out.join(MANIFEST_FILE));
        let stack_artifact = &manifest["artifacts"]["PulseStack"];
        assert_eq!(stack_artifact["type"], "aws:cloudformation:stack");
        assert_eq!(stack_artifact["environment"], "aws://123456789012/eu-west-1");
        assert_eq!(
            stack_artifact["properties"]["templateFile"],
            "PulseStack.template.json"
        );
        assert_eq!(stack_artifact["dependencies"][0], "PulseStack.assets");
        assert_eq!(
            manifest["artifacts"]["PulseStack.assets"]["properties"]["file"],
            "PulseStack.assets.json"
        );
    }

    #[test]
    fn test_should_describe_asset_destination() {
        let dir = tempfile::tempdir().unwrap();
        let stack = composed();
        synth(&stack, dir.path()).unwrap();

        let assets = read_json(&dir.path().join("PulseStack.assets.json"));
        let entry = &assets["files"][stack.placeholder.hash.as_str()];
        assert_eq!(entry["source"]["packaging"], "file");
        assert_eq!(entry["source"]["path"], stack.placeholder.file_name());

        let destination = &entry["destinations"]["123456789012-eu-west-1"];
        assert_eq!(
            destination["bucketName"],
            "cdk-hnb659fds-assets-123456789012-eu-west-1"
        );
        assert_eq!(destination["objectKey"], stack.placeholder.object_key());
        assert_eq!(destination["region"], "eu-west-1");
        assert!(
            destination["assumeRoleArn"]
                .as_str()
                .unwrap()
                .ends_with("cdk-hnb659fds-file-publishing-role-123456789012-eu-west-1")
        );
    }

    #[test]
    fn test_should_archive_placeholder_page() {
        let dir = tempfile::tempdir().unwrap();
        let summary = synth(&composed(), dir.path()).unwrap();

        let bytes = fs::read(&summary.asset_file).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut body = String::new();
        archive
            .by_name(placeholder::PLACEHOLDER_KEY)
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, placeholder::PLACEHOLDER_HTML);
    }

    #[test]
    fn test_should_rewrite_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let stack = composed();
        synth(&stack, dir.path()).unwrap();
        let snapshot = |name: &str| fs::read(dir.path().join(name)).unwrap();
        let files = [MANIFEST_FILE, "PulseStack.template.json", "PulseStack.assets.json"];
        let first = files.map(snapshot);

        synth(&composed(), dir.path()).unwrap();
        let second = files.map(snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_should_report_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = synth(&composed(), &blocker).unwrap_err();
        assert!(matches!(err, StackError::Io { ref path, .. } if path == &blocker));
    }
}
