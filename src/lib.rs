// Library exports for integration tests and embedding
pub mod auth;
pub mod client;
pub mod config;
pub mod fs;
pub mod types;

// Re-export commonly used types
pub use auth::ObsSignature;
pub use client::{CreateBucketOptions, HttpResponse, HttpTransport, ObjectStore, ObsClient};
pub use config::{ObsConfig, create_client, create_filesystem};
pub use fs::{
    Filesystem, FsEntry, ObsFilesystem, PathPrefixer, PublicUrlGenerator, Visibility, WriteOptions,
};
pub use types::{FilesystemError, ObsError};
