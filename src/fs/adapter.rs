use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;

use crate::client::ObjectStore;
use crate::fs::entry::{FileAttributes, Visibility, WriteOptions};
use crate::fs::filesystem::{Filesystem, ListStream};
use crate::fs::listing;
use crate::fs::prefixer::PathPrefixer;
use crate::types::{FilesystemError, ListObjectsRequest, ObjectIdentifier, ObsError};

/// Largest number of keys the service accepts in one batch delete.
const BATCH_DELETE_LIMIT: usize = 1000;

/// Virtual filesystem over a flat object namespace.
///
/// Hierarchical paths map to object keys through a fixed prefix; directories
/// are emulated with common-prefix grouping and zero-byte marker objects.
pub struct ObsFilesystem {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    prefixer: PathPrefixer,
}

impl ObsFilesystem {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        prefix: &str,
    ) -> Result<Self, ObsError> {
        let bucket = bucket.into();
        if bucket.is_empty() {
            return Err(ObsError::Configuration(
                "bucket name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            store,
            bucket,
            prefixer: PathPrefixer::new(prefix),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn head_attributes(&self, path: &str) -> Result<FileAttributes, ObsError> {
        let location = self.prefixer.prefix_path(path);
        let metadata = self.store.head_object(&self.bucket, &location).await?;

        Ok(FileAttributes {
            path: path.to_string(),
            file_size: metadata.content_length,
            last_modified: metadata.last_modified,
            mime_type: metadata.content_type,
        })
    }

    /// Collect every key under `location`, following the page marker until
    /// the listing is exhausted.
    async fn collect_keys(&self, location: &str) -> Result<Vec<String>, ObsError> {
        let mut keys = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let request = ListObjectsRequest {
                prefix: Some(location.to_string()),
                marker: marker.take(),
                ..Default::default()
            };
            let page = self.store.list_objects(&self.bucket, &request).await?;

            keys.extend(page.contents.into_iter().map(|object| object.key));

            marker = page.next_marker;
            if marker.is_none() {
                return Ok(keys);
            }
        }
    }
}

#[async_trait::async_trait]
impl Filesystem for ObsFilesystem {
    async fn file_exists(&self, path: &str) -> bool {
        let location = self.prefixer.prefix_path(path);
        self.store.head_object(&self.bucket, &location).await.is_ok()
    }

    async fn directory_exists(&self, path: &str) -> bool {
        let location = self.prefixer.prefix_directory_path(path);
        let request = ListObjectsRequest {
            prefix: Some(location),
            max_keys: Some(1),
            ..Default::default()
        };

        match self.store.list_objects(&self.bucket, &request).await {
            Ok(listing) => !listing.contents.is_empty(),
            Err(_) => false,
        }
    }

    async fn read(&self, path: &str) -> Result<Bytes, FilesystemError> {
        let location = self.prefixer.prefix_path(path);
        self.store
            .get_object(&self.bucket, &location)
            .await
            .map_err(|e| FilesystemError::Read {
                path: path.to_string(),
                source: e,
            })
    }

    async fn write(
        &self,
        path: &str,
        contents: Bytes,
        options: &WriteOptions,
    ) -> Result<(), FilesystemError> {
        let location = self.prefixer.prefix_path(path);
        self.store
            .put_object(&self.bucket, &location, contents, &options.to_headers())
            .await
            .map_err(|e| FilesystemError::Write {
                path: path.to_string(),
                source: e,
            })
    }

    async fn delete(&self, path: &str) -> Result<(), FilesystemError> {
        let location = self.prefixer.prefix_path(path);
        self.store
            .delete_object(&self.bucket, &location)
            .await
            .map_err(|e| FilesystemError::Delete {
                path: path.to_string(),
                source: e,
            })
    }

    async fn delete_directory(&self, path: &str) -> Result<(), FilesystemError> {
        let location = self.prefixer.prefix_directory_path(path);
        let wrap = |e: ObsError| FilesystemError::DeleteDirectory {
            path: path.to_string(),
            source: e,
        };

        let keys = self.collect_keys(&location).await.map_err(wrap)?;
        if keys.is_empty() {
            return Ok(());
        }

        for chunk in keys.chunks(BATCH_DELETE_LIMIT) {
            let objects: Vec<ObjectIdentifier> = chunk
                .iter()
                .map(|key| ObjectIdentifier::new(key.clone()))
                .collect();

            let result = self
                .store
                .delete_objects(&self.bucket, &objects)
                .await
                .map_err(wrap)?;

            if !result.errors.is_empty() {
                tracing::warn!(
                    path,
                    failed = result.errors.len(),
                    "batch delete reported per-key errors"
                );
            }
        }

        Ok(())
    }

    async fn create_directory(&self, path: &str) -> Result<(), FilesystemError> {
        // A directory is a zero-byte object whose key ends with the separator
        let location = self.prefixer.prefix_directory_path(path);
        self.store
            .put_object(&self.bucket, &location, Bytes::new(), &HashMap::new())
            .await
            .map_err(|e| FilesystemError::CreateDirectory {
                path: path.to_string(),
                source: e,
            })
    }

    async fn copy(
        &self,
        source: &str,
        destination: &str,
        options: &WriteOptions,
    ) -> Result<(), FilesystemError> {
        let source_location = self.prefixer.prefix_path(source);
        let destination_location = self.prefixer.prefix_path(destination);

        self.store
            .copy_object(
                &self.bucket,
                &source_location,
                &self.bucket,
                &destination_location,
                &options.to_headers(),
            )
            .await
            .map_err(|e| FilesystemError::Copy {
                from: source.to_string(),
                to: destination.to_string(),
                source: e,
            })
    }

    async fn move_file(
        &self,
        source: &str,
        destination: &str,
        options: &WriteOptions,
    ) -> Result<(), FilesystemError> {
        let wrap = |e: FilesystemError| FilesystemError::Move {
            from: source.to_string(),
            to: destination.to_string(),
            source: Box::new(e),
        };

        self.copy(source, destination, options).await.map_err(wrap)?;
        self.delete(source).await.map_err(wrap)
    }

    async fn file_size(&self, path: &str) -> Result<FileAttributes, FilesystemError> {
        self.head_attributes(path)
            .await
            .map_err(|e| FilesystemError::Metadata {
                path: path.to_string(),
                source: e,
            })
    }

    async fn mime_type(&self, path: &str) -> Result<FileAttributes, FilesystemError> {
        self.head_attributes(path)
            .await
            .map_err(|e| FilesystemError::Metadata {
                path: path.to_string(),
                source: e,
            })
    }

    async fn last_modified(&self, path: &str) -> Result<FileAttributes, FilesystemError> {
        self.head_attributes(path)
            .await
            .map_err(|e| FilesystemError::Metadata {
                path: path.to_string(),
                source: e,
            })
    }

    async fn visibility(&self, path: &str) -> Result<Visibility, FilesystemError> {
        let _ = path;
        Ok(Visibility::Private)
    }

    async fn set_visibility(
        &self,
        path: &str,
        _visibility: Visibility,
    ) -> Result<(), FilesystemError> {
        Err(FilesystemError::UnsupportedVisibility {
            path: path.to_string(),
        })
    }

    fn list_contents(&self, path: &str, deep: bool) -> ListStream {
        let location = self.prefixer.prefix_directory_path(path);

        listing::paginate(
            self.store.clone(),
            self.bucket.clone(),
            location,
            path.to_string(),
            self.prefixer.clone(),
            deep,
        )
    }
}
