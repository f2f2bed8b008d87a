use std::collections::HashMap;

use bytes::Bytes;

use crate::types::{
    DeleteResult, ListObjectsRequest, ObjectIdentifier, ObjectListing, ObjectMetadata, ObsError,
};

/// Object storage operations consumed by the virtual filesystem.
///
/// `ObsClient` is the production implementation; the trait exists so callers
/// (and tests) can depend on the operation surface rather than the concrete
/// HTTP client.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Retrieve object metadata without the body.
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, ObsError>;

    /// Download an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, ObsError>;

    /// Upload an object. `headers` may carry `Content-Type`, `x-obs-acl`,
    /// `x-obs-storage-class` and `x-obs-meta-*` entries.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        headers: &HashMap<String, String>,
    ) -> Result<(), ObsError>;

    /// Delete a single object.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ObsError>;

    /// Delete up to 1000 objects in one request.
    async fn delete_objects(
        &self,
        bucket: &str,
        objects: &[ObjectIdentifier],
    ) -> Result<DeleteResult, ObsError>;

    /// Fetch one page of an object listing.
    async fn list_objects(
        &self,
        bucket: &str,
        request: &ListObjectsRequest,
    ) -> Result<ObjectListing, ObsError>;

    /// Server-side copy; the source is referenced via `x-obs-copy-source`,
    /// no data flows through the caller.
    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        dest_bucket: &str,
        dest_key: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(), ObsError>;
}
