use chrono::{DateTime, Utc};

/// Metadata returned by a HEAD request against a single object.
#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

/// One entry of a listing page's `Contents` set.
#[derive(Debug, Clone)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: String,
    pub storage_class: String,
}

/// One page of an object listing, as parsed from `ListBucketResult`.
///
/// `next_marker` is the opaque cursor for the following page; `None` means
/// the listing is complete.
#[derive(Debug, Clone, Default)]
pub struct ObjectListing {
    pub name: String,
    pub prefix: String,
    pub max_keys: i32,
    pub is_truncated: bool,
    pub next_marker: Option<String>,
    pub contents: Vec<ObjectSummary>,
    pub common_prefixes: Vec<String>,
}

/// A bucket as returned by the list-buckets call.
#[derive(Debug, Clone)]
pub struct BucketSummary {
    pub name: String,
    pub creation_date: String,
}

/// Identifies an object to remove in a batch delete.
#[derive(Debug, Clone)]
pub struct ObjectIdentifier {
    pub key: String,
    pub version_id: Option<String>,
}

impl ObjectIdentifier {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: None,
        }
    }
}

/// Outcome of a batch delete: keys removed and per-key failures.
#[derive(Debug, Clone, Default)]
pub struct DeleteResult {
    pub deleted: Vec<String>,
    pub errors: Vec<DeleteError>,
}

#[derive(Debug, Clone)]
pub struct DeleteError {
    pub key: String,
    pub code: String,
    pub message: String,
}

/// Handle for an in-progress multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    pub bucket: String,
    pub key: String,
    pub upload_id: String,
}

/// A finished part, fed back into complete-multipart-upload.
#[derive(Debug, Clone)]
pub struct CompletedPart {
    pub part_number: u32,
    pub etag: String,
}

/// Parameters for a single list-objects page request.
#[derive(Debug, Clone, Default)]
pub struct ListObjectsRequest {
    pub prefix: Option<String>,
    pub delimiter: Option<String>,
    pub marker: Option<String>,
    pub max_keys: Option<i32>,
}
