use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::Utc;
use md5::{Digest, Md5};

use crate::auth::ObsSignature;
use crate::client::store::ObjectStore;
use crate::client::transport::{HttpResponse, HttpTransport, ReqwestTransport};
use crate::client::xml;
use crate::types::{
    BucketSummary, CompletedPart, DeleteResult, ListObjectsRequest, MultipartUpload,
    ObjectIdentifier, ObjectListing, ObjectMetadata, ObsError,
};

const DEFAULT_REGION: &str = "cn-north-4";

/// Optional settings for bucket creation.
#[derive(Debug, Clone, Default)]
pub struct CreateBucketOptions {
    pub location: Option<String>,
    pub storage_class: Option<String>,
    pub acl: Option<String>,
}

/// Signed HTTP client for the OBS API.
///
/// Every operation builds one request, signs it, dispatches it through the
/// transport and maps the outcome: network failure to `Transport`, status
/// >= 300 to `Remote`, unparseable XML to `Parse`. There is no retry at
/// this layer.
pub struct ObsClient {
    transport: Arc<dyn HttpTransport>,
    signature: ObsSignature,
    region: String,
    endpoint: String,
}

impl ObsClient {
    /// Create a client using the default `reqwest` transport.
    pub fn new(
        access_key: &str,
        secret_key: &str,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Result<Self, ObsError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(transport, access_key, secret_key, region, endpoint)
    }

    /// Create a client over an injected transport.
    pub fn with_transport(
        transport: Arc<dyn HttpTransport>,
        access_key: &str,
        secret_key: &str,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Result<Self, ObsError> {
        if access_key.is_empty() || secret_key.is_empty() {
            return Err(ObsError::Configuration(
                "missing access key or secret key".to_string(),
            ));
        }

        let region = region.unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoint = endpoint.unwrap_or_else(|| format!("obs.{region}.myhuaweicloud.com"));

        Ok(Self {
            transport,
            signature: ObsSignature::new(access_key, secret_key),
            region,
            endpoint,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // -----------------------------------------------------------------------
    // Bucket operations
    // -----------------------------------------------------------------------

    pub async fn create_bucket(
        &self,
        bucket: &str,
        options: &CreateBucketOptions,
    ) -> Result<(), ObsError> {
        let mut headers = HashMap::new();
        let mut body = String::new();

        if let Some(location) = &options.location {
            body = xml::create_bucket_body(&self.region, location);
            headers.insert("Content-Type".to_string(), "application/xml".to_string());
        }
        if let Some(storage_class) = &options.storage_class {
            headers.insert("x-obs-storage-class".to_string(), storage_class.clone());
        }
        if let Some(acl) = &options.acl {
            headers.insert("x-obs-acl".to_string(), acl.clone());
        }

        self.request("PUT", bucket, "", &[], headers, Bytes::from(body))
            .await?;
        Ok(())
    }

    pub async fn delete_bucket(&self, bucket: &str) -> Result<(), ObsError> {
        self.request("DELETE", bucket, "", &[], HashMap::new(), Bytes::new())
            .await?;
        Ok(())
    }

    pub async fn list_buckets(&self) -> Result<Vec<BucketSummary>, ObsError> {
        let response = self
            .request("GET", "", "", &[], HashMap::new(), Bytes::new())
            .await?;

        xml::parse_list_buckets(&String::from_utf8_lossy(&response.body))
    }

    // -----------------------------------------------------------------------
    // Object operations
    // -----------------------------------------------------------------------

    /// Download a specific object version.
    pub async fn get_object_version(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> Result<Bytes, ObsError> {
        let query = vec![("versionId".to_string(), version_id.to_string())];
        let response = self
            .request("GET", bucket, key, &query, HashMap::new(), Bytes::new())
            .await?;
        Ok(response.body)
    }

    // -----------------------------------------------------------------------
    // Multipart upload
    // -----------------------------------------------------------------------

    pub async fn initiate_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        headers: &HashMap<String, String>,
    ) -> Result<MultipartUpload, ObsError> {
        let query = vec![("uploads".to_string(), String::new())];
        let response = self
            .request("POST", bucket, key, &query, headers.clone(), Bytes::new())
            .await?;

        xml::parse_initiate_multipart(&String::from_utf8_lossy(&response.body))
    }

    /// Upload one part; returns the part's ETag from the response headers.
    pub async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u32,
        content: Bytes,
    ) -> Result<String, ObsError> {
        let query = vec![
            ("partNumber".to_string(), part_number.to_string()),
            ("uploadId".to_string(), upload_id.to_string()),
        ];
        let response = self
            .request("PUT", bucket, key, &query, HashMap::new(), content)
            .await?;

        Ok(response.headers.get("etag").cloned().unwrap_or_default())
    }

    pub async fn complete_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> Result<(), ObsError> {
        let body = xml::complete_multipart_body(parts)?;
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/xml".to_string());

        let query = vec![("uploadId".to_string(), upload_id.to_string())];
        self.request("POST", bucket, key, &query, headers, Bytes::from(body))
            .await?;
        Ok(())
    }

    pub async fn abort_multipart_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
    ) -> Result<(), ObsError> {
        let query = vec![("uploadId".to_string(), upload_id.to_string())];
        self.request("DELETE", bucket, key, &query, HashMap::new(), Bytes::new())
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Request plumbing
    // -----------------------------------------------------------------------

    fn host_for(&self, bucket: &str) -> String {
        if bucket.is_empty() {
            self.endpoint.clone()
        } else {
            format!("{}.{}", bucket, self.endpoint)
        }
    }

    fn object_url(&self, bucket: &str, object: &str, query: &[(String, String)]) -> String {
        let host = self.host_for(bucket);
        let object = object.trim_start_matches('/');

        let path = if object.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", encode_path(object))
        };

        let mut url = format!("https://{host}{path}");
        if !query.is_empty() {
            url.push('?');
            url.push_str(&build_query(query));
        }
        url
    }

    /// Build, sign and dispatch one request. Status >= 300 is a failure.
    async fn request(
        &self,
        method: &str,
        bucket: &str,
        object: &str,
        query: &[(String, String)],
        mut headers: HashMap<String, String>,
        body: Bytes,
    ) -> Result<HttpResponse, ObsError> {
        let url = self.object_url(bucket, object, query);

        headers.insert(
            "Date".to_string(),
            Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        );
        headers.insert("Host".to_string(), self.host_for(bucket));

        let authorization = self
            .signature
            .sign_request(method, bucket, object, query, &headers);
        headers.insert("Authorization".to_string(), authorization);

        // Header key names only; values may carry credentials
        let header_keys: Vec<&String> = headers.keys().collect();
        tracing::info!(
            method,
            url = %url,
            header_keys = ?header_keys,
            body_size = body.len(),
            "obs api request"
        );

        let start = Instant::now();
        let response = match self.transport.execute(method, &url, &headers, body).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(
                    method,
                    url = %url,
                    error = %err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "obs api transport error"
                );
                return Err(err);
            }
        };

        tracing::info!(
            method,
            url = %url,
            status = response.status,
            response_size = response.body.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "obs api response"
        );

        if response.status >= 300 {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            tracing::error!(
                method,
                url = %url,
                status = response.status,
                response_body = %body,
                "obs api error response"
            );
            return Err(ObsError::Remote {
                status: response.status,
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl ObjectStore for ObsClient {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, ObsError> {
        let response = self
            .request("HEAD", bucket, key, &[], HashMap::new(), Bytes::new())
            .await?;

        Ok(metadata_from_headers(&response.headers))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, ObsError> {
        let response = self
            .request("GET", bucket, key, &[], HashMap::new(), Bytes::new())
            .await?;
        Ok(response.body)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        headers: &HashMap<String, String>,
    ) -> Result<(), ObsError> {
        let mut headers = headers.clone();
        let has_content_type = headers
            .keys()
            .any(|k| k.eq_ignore_ascii_case("content-type"));
        if !has_content_type {
            headers.insert(
                "Content-Type".to_string(),
                "application/octet-stream".to_string(),
            );
        }

        self.request("PUT", bucket, key, &[], headers, body).await?;
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ObsError> {
        self.request("DELETE", bucket, key, &[], HashMap::new(), Bytes::new())
            .await?;
        Ok(())
    }

    async fn delete_objects(
        &self,
        bucket: &str,
        objects: &[ObjectIdentifier],
    ) -> Result<DeleteResult, ObsError> {
        let body = xml::delete_objects_body(objects)?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/xml".to_string());
        headers.insert(
            "Content-MD5".to_string(),
            BASE64.encode(Md5::digest(body.as_bytes())),
        );

        let query = vec![("delete".to_string(), String::new())];
        let response = self
            .request("POST", bucket, "", &query, headers, Bytes::from(body))
            .await?;

        xml::parse_delete_result(&String::from_utf8_lossy(&response.body))
    }

    async fn list_objects(
        &self,
        bucket: &str,
        request: &ListObjectsRequest,
    ) -> Result<ObjectListing, ObsError> {
        let mut query = Vec::new();
        if let Some(prefix) = &request.prefix {
            query.push(("prefix".to_string(), prefix.clone()));
        }
        if let Some(delimiter) = &request.delimiter {
            query.push(("delimiter".to_string(), delimiter.clone()));
        }
        if let Some(marker) = &request.marker {
            query.push(("marker".to_string(), marker.clone()));
        }
        if let Some(max_keys) = request.max_keys {
            query.push(("max-keys".to_string(), max_keys.to_string()));
        }

        let response = self
            .request("GET", bucket, "", &query, HashMap::new(), Bytes::new())
            .await?;

        xml::parse_list_objects(&String::from_utf8_lossy(&response.body))
    }

    async fn copy_object(
        &self,
        source_bucket: &str,
        source_key: &str,
        dest_bucket: &str,
        dest_key: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(), ObsError> {
        let mut headers = headers.clone();
        headers.insert(
            "x-obs-copy-source".to_string(),
            format!("/{source_bucket}/{source_key}"),
        );

        self.request("PUT", dest_bucket, dest_key, &[], headers, Bytes::new())
            .await?;
        Ok(())
    }
}

/// Percent-encode a key for the request path, keeping `/` separators.
fn encode_path(object: &str) -> String {
    object
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn build_query(query: &[(String, String)]) -> String {
    query
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn metadata_from_headers(headers: &HashMap<String, String>) -> ObjectMetadata {
    ObjectMetadata {
        content_length: headers
            .get("content-length")
            .and_then(|v| v.parse::<u64>().ok()),
        content_type: headers.get("content-type").cloned(),
        last_modified: headers.get("last-modified").and_then(|v| {
            chrono::DateTime::parse_from_rfc2822(v)
                .ok()
                .map(|dt| dt.with_timezone(&chrono::Utc))
        }),
        etag: headers.get("etag").cloned(),
    }
}
