//! XML request bodies and response parsing for the OBS API.
//!
//! Wire shapes only; the public result models live in `types::models`.

use chrono::{DateTime, Utc};
use quick_xml::de::from_str as from_xml_str;
use quick_xml::se::to_string as to_xml_string;
use serde::{Deserialize, Serialize};

use crate::types::{
    BucketSummary, CompletedPart, DeleteError, DeleteResult, MultipartUpload, ObjectIdentifier,
    ObjectListing, ObjectSummary, ObsError,
};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListBucketResultXml {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Prefix", default)]
    prefix: String,
    #[serde(rename = "MaxKeys", default)]
    max_keys: i32,
    #[serde(rename = "IsTruncated", default)]
    is_truncated: bool,
    #[serde(rename = "NextMarker")]
    next_marker: Option<String>,
    #[serde(rename = "Contents", default)]
    contents: Vec<ContentsXml>,
    #[serde(rename = "CommonPrefixes", default)]
    common_prefixes: Vec<CommonPrefixXml>,
}

#[derive(Debug, Deserialize)]
struct ContentsXml {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "LastModified")]
    last_modified: Option<String>,
    #[serde(rename = "ETag", default)]
    etag: String,
    #[serde(rename = "Size", default)]
    size: u64,
    #[serde(rename = "StorageClass", default)]
    storage_class: String,
}

#[derive(Debug, Deserialize)]
struct CommonPrefixXml {
    #[serde(rename = "Prefix")]
    prefix: String,
}

/// Parse a `ListBucketResult` response body.
pub(crate) fn parse_list_objects(xml: &str) -> Result<ObjectListing, ObsError> {
    let raw: ListBucketResultXml =
        from_xml_str(xml).map_err(|e| ObsError::Parse(e.to_string()))?;

    Ok(ObjectListing {
        name: raw.name,
        prefix: raw.prefix,
        max_keys: raw.max_keys,
        is_truncated: raw.is_truncated,
        next_marker: raw.next_marker,
        contents: raw
            .contents
            .into_iter()
            .map(|c| ObjectSummary {
                last_modified: c.last_modified.as_deref().and_then(parse_timestamp),
                key: c.key,
                size: c.size,
                etag: c.etag,
                storage_class: c.storage_class,
            })
            .collect(),
        common_prefixes: raw.common_prefixes.into_iter().map(|p| p.prefix).collect(),
    })
}

#[derive(Debug, Deserialize)]
struct ListAllMyBucketsResultXml {
    #[serde(rename = "Buckets", default)]
    buckets: Option<BucketsXml>,
}

#[derive(Debug, Deserialize, Default)]
struct BucketsXml {
    #[serde(rename = "Bucket", default)]
    bucket: Vec<BucketXml>,
}

#[derive(Debug, Deserialize)]
struct BucketXml {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "CreationDate", default)]
    creation_date: String,
}

/// Parse a `ListAllMyBucketsResult` response body.
pub(crate) fn parse_list_buckets(xml: &str) -> Result<Vec<BucketSummary>, ObsError> {
    let raw: ListAllMyBucketsResultXml =
        from_xml_str(xml).map_err(|e| ObsError::Parse(e.to_string()))?;

    Ok(raw
        .buckets
        .unwrap_or_default()
        .bucket
        .into_iter()
        .map(|b| BucketSummary {
            name: b.name,
            creation_date: b.creation_date,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct InitiateMultipartUploadResultXml {
    #[serde(rename = "Bucket", default)]
    bucket: String,
    #[serde(rename = "Key", default)]
    key: String,
    #[serde(rename = "UploadId", default)]
    upload_id: String,
}

/// Parse an `InitiateMultipartUploadResult` response body.
pub(crate) fn parse_initiate_multipart(xml: &str) -> Result<MultipartUpload, ObsError> {
    let raw: InitiateMultipartUploadResultXml =
        from_xml_str(xml).map_err(|e| ObsError::Parse(e.to_string()))?;

    Ok(MultipartUpload {
        bucket: raw.bucket,
        key: raw.key,
        upload_id: raw.upload_id,
    })
}

#[derive(Debug, Deserialize)]
struct DeleteResultXml {
    #[serde(rename = "Deleted", default)]
    deleted: Vec<DeletedXml>,
    #[serde(rename = "Error", default)]
    errors: Vec<DeleteErrorXml>,
}

#[derive(Debug, Deserialize)]
struct DeletedXml {
    #[serde(rename = "Key", default)]
    key: String,
}

#[derive(Debug, Deserialize)]
struct DeleteErrorXml {
    #[serde(rename = "Key", default)]
    key: String,
    #[serde(rename = "Code", default)]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

/// Parse a batch-delete `DeleteResult` response body.
pub(crate) fn parse_delete_result(xml: &str) -> Result<DeleteResult, ObsError> {
    let raw: DeleteResultXml = from_xml_str(xml).map_err(|e| ObsError::Parse(e.to_string()))?;

    Ok(DeleteResult {
        deleted: raw.deleted.into_iter().map(|d| d.key).collect(),
        errors: raw
            .errors
            .into_iter()
            .map(|e| DeleteError {
                key: e.key,
                code: e.code,
                message: e.message,
            })
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename = "Delete")]
struct DeleteXml<'a> {
    #[serde(rename = "Object")]
    objects: Vec<DeleteObjectXml<'a>>,
}

#[derive(Serialize)]
struct DeleteObjectXml<'a> {
    #[serde(rename = "Key")]
    key: &'a str,
    #[serde(rename = "VersionId", skip_serializing_if = "Option::is_none")]
    version_id: Option<&'a str>,
}

/// Serialize the batch-delete request body. Key text is XML-escaped by the
/// serializer.
pub(crate) fn delete_objects_body(objects: &[ObjectIdentifier]) -> Result<String, ObsError> {
    let body = DeleteXml {
        objects: objects
            .iter()
            .map(|o| DeleteObjectXml {
                key: &o.key,
                version_id: o.version_id.as_deref(),
            })
            .collect(),
    };

    let xml = to_xml_string(&body).map_err(|e| ObsError::Parse(e.to_string()))?;
    Ok(format!("{XML_DECLARATION}{xml}"))
}

#[derive(Serialize)]
#[serde(rename = "CompleteMultipartUpload")]
struct CompleteMultipartUploadXml<'a> {
    #[serde(rename = "Part")]
    parts: Vec<PartXml<'a>>,
}

#[derive(Serialize)]
struct PartXml<'a> {
    #[serde(rename = "PartNumber")]
    part_number: u32,
    #[serde(rename = "ETag")]
    etag: &'a str,
}

/// Serialize the complete-multipart-upload request body.
pub(crate) fn complete_multipart_body(parts: &[CompletedPart]) -> Result<String, ObsError> {
    let body = CompleteMultipartUploadXml {
        parts: parts
            .iter()
            .map(|p| PartXml {
                part_number: p.part_number,
                etag: &p.etag,
            })
            .collect(),
    };

    let xml = to_xml_string(&body).map_err(|e| ObsError::Parse(e.to_string()))?;
    Ok(format!("{XML_DECLARATION}{xml}"))
}

/// Serialize the create-bucket location configuration body.
pub(crate) fn create_bucket_body(region: &str, location: &str) -> String {
    format!(
        "<CreateBucketConfiguration xmlns=\"http://obs.{region}.myhuaweicloud.com/doc/2015-06-30/\"><Location>{}</Location></CreateBucketConfiguration>",
        quick_xml::escape::escape(location)
    )
}
