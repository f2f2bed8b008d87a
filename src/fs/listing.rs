use std::collections::VecDeque;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream;

use crate::client::ObjectStore;
use crate::fs::entry::{DirectoryAttributes, FileAttributes, FsEntry};
use crate::fs::filesystem::ListStream;
use crate::fs::prefixer::PathPrefixer;
use crate::types::{FilesystemError, ListObjectsRequest};

struct ListingState {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    location: String,
    path: String,
    prefixer: PathPrefixer,
    deep: bool,
    marker: Option<String>,
    buffer: VecDeque<FsEntry>,
    done: bool,
}

/// Drive the marker-based pagination loop as a lazy stream.
///
/// Each page yields its file entries (directory markers are skipped) and, in
/// non-recursive mode, its common prefixes as directories. The next page is
/// only requested once the buffered entries are consumed, so a caller that
/// stops early never triggers further requests.
pub(crate) fn paginate(
    store: Arc<dyn ObjectStore>,
    bucket: String,
    location: String,
    path: String,
    prefixer: PathPrefixer,
    deep: bool,
) -> ListStream {
    let state = ListingState {
        store,
        bucket,
        location,
        path,
        prefixer,
        deep,
        marker: None,
        buffer: VecDeque::new(),
        done: false,
    };

    stream::try_unfold(state, |mut state| async move {
        loop {
            if let Some(entry) = state.buffer.pop_front() {
                return Ok(Some((entry, state)));
            }
            if state.done {
                return Ok(None);
            }

            let request = ListObjectsRequest {
                prefix: Some(state.location.clone()),
                delimiter: (!state.deep).then(|| "/".to_string()),
                marker: state.marker.take(),
                max_keys: None,
            };

            let page = state
                .store
                .list_objects(&state.bucket, &request)
                .await
                .map_err(|e| FilesystemError::List {
                    path: state.path.clone(),
                    source: e,
                })?;

            for object in &page.contents {
                // Directory markers are synthesized, never file entries
                if object.key.ends_with('/') {
                    continue;
                }

                state.buffer.push_back(FsEntry::File(FileAttributes {
                    path: state.prefixer.strip_prefix(&object.key).to_string(),
                    file_size: Some(object.size),
                    last_modified: object.last_modified,
                    mime_type: None,
                }));
            }

            if !state.deep {
                for prefix in &page.common_prefixes {
                    state.buffer.push_back(FsEntry::Directory(DirectoryAttributes {
                        path: state.prefixer.strip_directory_prefix(prefix).to_string(),
                    }));
                }
            }

            state.marker = page.next_marker;
            state.done = state.marker.is_none();
        }
    })
    .boxed()
}
