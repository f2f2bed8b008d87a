use thiserror::Error;

/// Errors produced by the OBS client layer.
///
/// Every failed request maps to exactly one variant: the transport could not
/// complete, the service answered with a non-success status, or the response
/// body was not the XML we expected. `Configuration` is raised at
/// construction time, before any request is issued.
#[derive(Debug, Clone, Error)]
pub enum ObsError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("http request failed: {0}")]
    Transport(String),

    #[error("request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("failed to parse XML response: {0}")]
    Parse(String),
}

/// Path-aware failures surfaced by the virtual filesystem.
///
/// The adapter wraps every client error at the operation boundary, so raw
/// transport/remote errors never escape to filesystem callers. Existence
/// checks are the exception and collapse to `false` instead.
#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("unable to write file at {path}: {source}")]
    Write { path: String, source: ObsError },

    #[error("unable to read file at {path}: {source}")]
    Read { path: String, source: ObsError },

    #[error("unable to delete file at {path}: {source}")]
    Delete { path: String, source: ObsError },

    #[error("unable to delete directory at {path}: {source}")]
    DeleteDirectory { path: String, source: ObsError },

    #[error("unable to create directory at {path}: {source}")]
    CreateDirectory { path: String, source: ObsError },

    #[error("unable to copy file from {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        source: ObsError,
    },

    #[error("unable to move file from {from} to {to}: {source}")]
    Move {
        from: String,
        to: String,
        source: Box<FilesystemError>,
    },

    #[error("unable to retrieve metadata for {path}: {source}")]
    Metadata { path: String, source: ObsError },

    #[error("unable to list contents of {path}: {source}")]
    List { path: String, source: ObsError },

    #[error("visibility changes are not supported for {path}")]
    UnsupportedVisibility { path: String },
}

impl FilesystemError {
    /// Logical path the failed operation was addressed to. For copy/move
    /// failures this is the source path.
    pub fn path(&self) -> &str {
        match self {
            FilesystemError::Write { path, .. }
            | FilesystemError::Read { path, .. }
            | FilesystemError::Delete { path, .. }
            | FilesystemError::DeleteDirectory { path, .. }
            | FilesystemError::CreateDirectory { path, .. }
            | FilesystemError::Metadata { path, .. }
            | FilesystemError::List { path, .. }
            | FilesystemError::UnsupportedVisibility { path } => path,
            FilesystemError::Copy { from, .. } | FilesystemError::Move { from, .. } => from,
        }
    }
}
