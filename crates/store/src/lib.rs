//! State-store infrastructure over S3-compatible object storage.
//!
//! Implements the [`checker::StateStore`] port with one object per resource,
//! keyed `<resource-id>/updated`, inside a single bucket. The deployments
//! this checker targets run MinIO, so the client is built with an explicit
//! endpoint, static credentials, and path-style addressing rather than the
//! ambient AWS environment.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** SDK configuration, bucket bootstrap, and byte-level
//! object handling live here. The [`checker`] crate sees only
//! [`checker::StateStore`] and its string blobs.

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use checker::{CheckerError, ResourceId, StateStore};

/// Region label sent to the endpoint. MinIO accepts any value; the SDK
/// requires one for request signing.
const SIGNING_REGION: &str = "us-east-1";

/// Object-storage-backed [`StateStore`].
pub struct ObjectStateStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl ObjectStateStore {
    /// Creates a store against `endpoint` using static credentials.
    ///
    /// `endpoint` is a full URL (e.g. `https://minio.example.com`); `bucket`
    /// is created on demand by [`StateStore::ensure_container`].
    pub fn new(
        endpoint: impl Into<String>,
        access_key: &str,
        secret_key: &str,
        bucket: impl Into<String>,
    ) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(SIGNING_REGION))
            .endpoint_url(endpoint.into())
            .credentials_provider(credentials)
            // MinIO serves buckets under the path, not a subdomain.
            .force_path_style(true)
            .build();
        Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: bucket.into(),
        }
    }

    fn store_error(&self, key: &str, message: impl std::fmt::Display) -> CheckerError {
        CheckerError::Store {
            key: format!("{}/{}", self.bucket, key),
            message: message.to_string(),
        }
    }
}

/// The object key holding a resource's last-seen timestamp.
pub fn state_key(resource: &ResourceId) -> String {
    format!("{resource}/updated")
}

#[async_trait]
impl StateStore for ObjectStateStore {
    async fn ensure_container(&self) -> Result<(), CheckerError> {
        match self.client.create_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                tracing::debug!(bucket = %self.bucket, "Created state bucket");
                Ok(())
            }
            Err(e) => {
                let already_exists = e.as_service_error().is_some_and(|service| {
                    service.is_bucket_already_owned_by_you() || service.is_bucket_already_exists()
                });
                if already_exists {
                    Ok(())
                } else {
                    Err(CheckerError::Store {
                        key: self.bucket.clone(),
                        message: DisplayErrorContext(&e).to_string(),
                    })
                }
            }
        }
    }

    async fn get(&self, resource: &ResourceId) -> Result<Option<String>, CheckerError> {
        let key = state_key(resource);
        let object = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(object) => object,
            Err(e) => {
                // An absent record means "never seen", not a failure.
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    return Ok(None);
                }
                return Err(self.store_error(&key, DisplayErrorContext(&e)));
            }
        };

        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| self.store_error(&key, e))?
            .into_bytes();
        let blob = String::from_utf8(bytes.to_vec())
            .map_err(|e| self.store_error(&key, format!("non-UTF-8 state blob: {e}")))?;
        Ok(Some(blob))
    }

    async fn put(&self, resource: &ResourceId, blob: &str) -> Result<(), CheckerError> {
        let key = state_key(resource);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(blob.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| self.store_error(&key, DisplayErrorContext(&e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_key_is_resource_id_slash_updated() {
        let id = ResourceId::new("ceph-nautilus").unwrap();
        assert_eq!(state_key(&id), "ceph-nautilus/updated");
    }
}
