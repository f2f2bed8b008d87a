use bytes::Bytes;
use futures::stream::BoxStream;

use crate::fs::entry::{FileAttributes, FsEntry, Visibility, WriteOptions};
use crate::types::FilesystemError;

/// Lazy, forward-only sequence of listing entries. Dropping the stream stops
/// pagination; no further page requests are issued.
pub type ListStream = BoxStream<'static, Result<FsEntry, FilesystemError>>;

/// Hierarchical filesystem capability set over a storage backend.
///
/// Callers depend on this trait; `ObsFilesystem` is the object-storage
/// implementation.
#[async_trait::async_trait]
pub trait Filesystem: Send + Sync {
    /// Whether a file exists. Every failure collapses to `false`.
    async fn file_exists(&self, path: &str) -> bool;

    /// Whether a directory exists. Every failure collapses to `false`.
    async fn directory_exists(&self, path: &str) -> bool;

    async fn read(&self, path: &str) -> Result<Bytes, FilesystemError>;

    async fn write(
        &self,
        path: &str,
        contents: Bytes,
        options: &WriteOptions,
    ) -> Result<(), FilesystemError>;

    async fn delete(&self, path: &str) -> Result<(), FilesystemError>;

    /// Remove a directory and everything below it. An empty directory is a
    /// no-op, not an error.
    async fn delete_directory(&self, path: &str) -> Result<(), FilesystemError>;

    async fn create_directory(&self, path: &str) -> Result<(), FilesystemError>;

    /// Server-side copy.
    async fn copy(
        &self,
        source: &str,
        destination: &str,
        options: &WriteOptions,
    ) -> Result<(), FilesystemError>;

    /// Copy then delete the source. A delete failure after a successful copy
    /// is reported as a move failure; the destination is left in place.
    async fn move_file(
        &self,
        source: &str,
        destination: &str,
        options: &WriteOptions,
    ) -> Result<(), FilesystemError>;

    async fn file_size(&self, path: &str) -> Result<FileAttributes, FilesystemError>;

    async fn mime_type(&self, path: &str) -> Result<FileAttributes, FilesystemError>;

    async fn last_modified(&self, path: &str) -> Result<FileAttributes, FilesystemError>;

    async fn visibility(&self, path: &str) -> Result<Visibility, FilesystemError>;

    async fn set_visibility(
        &self,
        path: &str,
        visibility: Visibility,
    ) -> Result<(), FilesystemError>;

    /// List entries under `path`. In non-recursive mode objects are grouped
    /// by the path separator and grouped prefixes appear as directories; in
    /// recursive mode every object is yielded flat.
    fn list_contents(&self, path: &str, deep: bool) -> ListStream;
}
