//! Scripted in-memory `ObjectStore` double for adapter tests.
//!
//! Keeps objects in a sorted map and computes delimiter/marker listings the
//! way the service does, so pagination and grouping behavior can be tested
//! without a network. Individual operations can be made to fail, and whole
//! listing pages can be scripted to exercise exact page boundaries.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};

use obsfs::ObjectStore;
use obsfs::types::{
    DeleteResult, ListObjectsRequest, ObjectIdentifier, ObjectListing, ObjectMetadata,
    ObjectSummary, ObsError,
};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 10, 12, 8, 12, 38).unwrap()
}

#[derive(Default)]
pub struct MockStore {
    pub objects: Mutex<BTreeMap<String, StoredObject>>,
    /// Scripted listing pages; when non-empty, `list_objects` pops these
    /// instead of computing a listing from `objects`.
    pub pages: Mutex<VecDeque<ObjectListing>>,
    /// Operation name -> error returned by every call of that operation.
    pub failures: Mutex<HashMap<&'static str, ObsError>>,
    /// One line per call, for asserting call counts and arguments.
    pub calls: Mutex<Vec<String>>,
    /// Headers seen by `put_object` calls, in order.
    pub put_headers: Mutex<Vec<HashMap<String, String>>>,
    /// Headers seen by `copy_object` calls, in order.
    pub copy_headers: Mutex<Vec<HashMap<String, String>>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(keys: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (key, contents) in keys {
            store.insert(key, contents);
        }
        store
    }

    pub fn insert(&self, key: &str, contents: &str) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: Bytes::from(contents.to_string()),
                content_type: "application/octet-stream".to_string(),
                last_modified: fixed_timestamp(),
            },
        );
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn script_page(&self, page: ObjectListing) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn fail(&self, operation: &'static str, error: ObsError) {
        self.failures.lock().unwrap().insert(operation, error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(operation))
            .count()
    }

    fn check_failure(&self, operation: &'static str) -> Result<(), ObsError> {
        match self.failures.lock().unwrap().get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn summary(key: &str, size: u64) -> ObjectSummary {
        ObjectSummary {
            key: key.to_string(),
            size,
            last_modified: Some(fixed_timestamp()),
            etag: "\"etag\"".to_string(),
            storage_class: "STANDARD".to_string(),
        }
    }

    pub fn page(
        contents: &[(&str, u64)],
        common_prefixes: &[&str],
        next_marker: Option<&str>,
    ) -> ObjectListing {
        ObjectListing {
            name: super::TEST_BUCKET.to_string(),
            contents: contents
                .iter()
                .map(|(key, size)| Self::summary(key, *size))
                .collect(),
            common_prefixes: common_prefixes.iter().map(|p| p.to_string()).collect(),
            is_truncated: next_marker.is_some(),
            next_marker: next_marker.map(|m| m.to_string()),
            ..Default::default()
        }
    }

    fn compute_listing(&self, request: &ListObjectsRequest) -> ObjectListing {
        let prefix = request.prefix.clone().unwrap_or_default();
        let marker = request.marker.clone().unwrap_or_default();
        let max_keys = request.max_keys.unwrap_or(1000).max(1) as usize;

        let mut contents = Vec::new();
        let mut common_prefixes: Vec<String> = Vec::new();
        let mut next_marker = None;

        let objects = self.objects.lock().unwrap();
        for (key, object) in objects.iter() {
            if !key.starts_with(&prefix) || key.as_str() <= marker.as_str() {
                continue;
            }

            if contents.len() + common_prefixes.len() >= max_keys {
                next_marker = Some(key.clone());
                break;
            }

            if let Some(delimiter) = &request.delimiter {
                let rest = &key[prefix.len()..];
                if let Some(idx) = rest.find(delimiter.as_str()) {
                    let grouped = format!("{}{}{}", prefix, &rest[..idx], delimiter);
                    if !common_prefixes.contains(&grouped) {
                        common_prefixes.push(grouped);
                    }
                    continue;
                }
            }

            contents.push(ObjectSummary {
                key: key.clone(),
                size: object.data.len() as u64,
                last_modified: Some(object.last_modified),
                etag: "\"etag\"".to_string(),
                storage_class: "STANDARD".to_string(),
            });
        }

        ObjectListing {
            name: super::TEST_BUCKET.to_string(),
            prefix,
            max_keys: max_keys as i32,
            is_truncated: next_marker.is_some(),
            next_marker,
            contents,
            common_prefixes,
        }
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn head_object(&self, _bucket: &str, key: &str) -> Result<ObjectMetadata, ObsError> {
        self.record(format!("head {key}"));
        self.check_failure("head")?;

        let objects = self.objects.lock().unwrap();
        match objects.get(key) {
            Some(object) => Ok(ObjectMetadata {
                content_length: Some(object.data.len() as u64),
                content_type: Some(object.content_type.clone()),
                last_modified: Some(object.last_modified),
                etag: Some("\"etag\"".to_string()),
            }),
            None => Err(ObsError::Remote {
                status: 404,
                body: "NoSuchKey".to_string(),
            }),
        }
    }

    async fn get_object(&self, _bucket: &str, key: &str) -> Result<Bytes, ObsError> {
        self.record(format!("get {key}"));
        self.check_failure("get")?;

        let objects = self.objects.lock().unwrap();
        match objects.get(key) {
            Some(object) => Ok(object.data.clone()),
            None => Err(ObsError::Remote {
                status: 404,
                body: "NoSuchKey".to_string(),
            }),
        }
    }

    async fn put_object(
        &self,
        _bucket: &str,
        key: &str,
        body: Bytes,
        headers: &HashMap<String, String>,
    ) -> Result<(), ObsError> {
        self.record(format!("put {key}"));
        self.put_headers.lock().unwrap().push(headers.clone());
        self.check_failure("put")?;

        let content_type = headers
            .get("Content-Type")
            .cloned()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: body,
                content_type,
                last_modified: fixed_timestamp(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, _bucket: &str, key: &str) -> Result<(), ObsError> {
        self.record(format!("delete {key}"));
        self.check_failure("delete")?;

        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn delete_objects(
        &self,
        _bucket: &str,
        objects: &[ObjectIdentifier],
    ) -> Result<DeleteResult, ObsError> {
        self.record(format!("delete_objects count={}", objects.len()));
        self.check_failure("delete_objects")?;

        let mut map = self.objects.lock().unwrap();
        let mut deleted = Vec::new();
        for object in objects {
            map.remove(&object.key);
            deleted.push(object.key.clone());
        }

        Ok(DeleteResult {
            deleted,
            errors: Vec::new(),
        })
    }

    async fn list_objects(
        &self,
        _bucket: &str,
        request: &ListObjectsRequest,
    ) -> Result<ObjectListing, ObsError> {
        self.record(format!(
            "list prefix={:?} delimiter={:?} marker={:?} max_keys={:?}",
            request.prefix, request.delimiter, request.marker, request.max_keys
        ));
        self.check_failure("list")?;

        if let Some(page) = self.pages.lock().unwrap().pop_front() {
            return Ok(page);
        }

        Ok(self.compute_listing(request))
    }

    async fn copy_object(
        &self,
        _source_bucket: &str,
        source_key: &str,
        _dest_bucket: &str,
        dest_key: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(), ObsError> {
        self.record(format!("copy {source_key} -> {dest_key}"));
        self.copy_headers.lock().unwrap().push(headers.clone());
        self.check_failure("copy")?;

        let mut objects = self.objects.lock().unwrap();
        let source = objects.get(source_key).cloned().ok_or(ObsError::Remote {
            status: 404,
            body: "NoSuchKey".to_string(),
        })?;
        objects.insert(dest_key.to_string(), source);
        Ok(())
    }
}
