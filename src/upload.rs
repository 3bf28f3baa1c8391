//! Publishing artifacts to S3-compatible object storage.
//!
//! Every upload is a single `PutObject` under a fixed key, so re-running
//! overwrites the previous artifact. The SDK is async; a private
//! current-thread runtime drives the one request to completion.

use crate::freshness::ArtifactKind;
use anyhow::{anyhow, Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials as S3Credentials, Region},
    primitives::ByteStream,
    Client,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REGION: &str = "auto";
pub const DEFAULT_ENDPOINT: &str = "https://fly.storage.tigris.dev";
pub const DEFAULT_BUCKET: &str = "wild-bird-2039";

/// Where an artifact is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTarget {
    /// Bucket name, falling back to `AWS_S3_BUCKET` / `BUCKET_NAME`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Object key, overwritten on every upload
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,
}

impl UploadTarget {
    pub fn content_type(&self, kind: ArtifactKind) -> String {
        self.content_type
            .clone()
            .unwrap_or_else(|| kind.content_type().to_string())
    }

    /// Offer the artifact as a download named after its file.
    pub fn content_disposition(&self, artifact: &Path) -> String {
        self.content_disposition.clone().unwrap_or_else(|| {
            let name = artifact
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.key.clone());
            format!("attachment; filename=\"{name}\"")
        })
    }
}

/// Access to the object store, read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub endpoint: String,
    pub default_bucket: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("default_bucket", &self.default_bucket)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment, loading `.env` first if
    /// there is one.
    pub fn from_env() -> Result<Credentials> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Ignoring unreadable .env file: {e}");
            }
        }
        Credentials::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            var(name).ok_or_else(|| anyhow!("Missing {name}, set it in the environment or .env"))
        };

        Ok(Credentials {
            access_key_id: required("AWS_ACCESS_KEY_ID")?,
            secret_access_key: required("AWS_SECRET_ACCESS_KEY")?,
            region: var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: var("AWS_ENDPOINT_URL_S3").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            default_bucket: var("AWS_S3_BUCKET")
                .or_else(|| var("BUCKET_NAME"))
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        })
    }

    fn client(&self) -> Client {
        let credentials = S3Credentials::new(
            &self.access_key_id,
            &self.secret_access_key,
            None,
            None,
            "inkpress",
        );

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&self.endpoint)
            .region(Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Client::from_conf(config)
    }
}

/// A finished upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Uploaded {
    pub bucket: String,
    pub key: String,
}

impl std::fmt::Display for Uploaded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Upload `artifact` to `target`. The local file is left in place whatever
/// happens.
pub fn upload(
    artifact: &Path,
    kind: ArtifactKind,
    target: &UploadTarget,
    credentials: &Credentials,
) -> Result<Uploaded> {
    let body = std::fs::read(artifact)
        .with_context(|| format!("Failed to read {} for upload", artifact.display()))?;
    let bucket = target
        .bucket
        .clone()
        .unwrap_or_else(|| credentials.default_bucket.clone());
    let content_type = target.content_type(kind);
    let content_disposition = target.content_disposition(artifact);

    log::info!(
        "Uploading {} ({} bytes) to s3://{}/{}",
        artifact.display(),
        body.len(),
        bucket,
        target.key
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| "Failed to start async runtime for upload")?;

    let client = credentials.client();
    runtime
        .block_on(
            client
                .put_object()
                .bucket(&bucket)
                .key(&target.key)
                .body(ByteStream::from(body))
                .content_type(content_type)
                .content_disposition(content_disposition)
                .send(),
        )
        .map_err(|e| anyhow!("{}", aws_sdk_s3::error::DisplayErrorContext(e)))
        .with_context(|| format!("Failed to upload to s3://{}/{}", bucket, target.key))?;

    Ok(Uploaded {
        bucket,
        key: target.key.clone(),
    })
}
