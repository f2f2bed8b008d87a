use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Visibility of a file, as exposed through the filesystem capability set.
///
/// The OBS backend does not map its ACL model onto this; reads always report
/// `Private` and writes of visibility are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Attributes of a file entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttributes {
    pub path: String,
    pub file_size: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub mime_type: Option<String>,
}

/// Attributes of a (virtual) directory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryAttributes {
    pub path: String,
}

/// One entry yielded by a listing.
#[derive(Debug, Clone, PartialEq)]
pub enum FsEntry {
    File(FileAttributes),
    Directory(DirectoryAttributes),
}

impl FsEntry {
    pub fn path(&self) -> &str {
        match self {
            FsEntry::File(file) => &file.path,
            FsEntry::Directory(dir) => &dir.path,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FsEntry::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, FsEntry::Directory(_))
    }
}

/// Per-write configuration: an optional content-type override and free-form
/// metadata entries that become `x-obs-meta-*` headers on the underlying
/// put or copy.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl WriteOptions {
    pub(crate) fn to_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        if let Some(content_type) = &self.content_type {
            headers.insert("Content-Type".to_string(), content_type.clone());
        }
        for (key, value) in &self.metadata {
            headers.insert(format!("x-obs-meta-{key}"), value.clone());
        }

        headers
    }
}
