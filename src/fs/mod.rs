mod adapter;
mod entry;
mod filesystem;
mod listing;
mod prefixer;
mod public_url;

pub use adapter::ObsFilesystem;
pub use entry::{DirectoryAttributes, FileAttributes, FsEntry, Visibility, WriteOptions};
pub use filesystem::{Filesystem, ListStream};
pub use prefixer::PathPrefixer;
pub use public_url::PublicUrlGenerator;
