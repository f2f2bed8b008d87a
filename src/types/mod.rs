pub mod error;
pub mod models;

pub use error::{FilesystemError, ObsError};
pub use models::{
    BucketSummary, CompletedPart, DeleteError, DeleteResult, ListObjectsRequest, MultipartUpload,
    ObjectIdentifier, ObjectListing, ObjectMetadata, ObjectSummary,
};
