/// Maps logical filesystem paths to physical object keys and back.
///
/// The configured prefix is normalized once at construction and is immutable
/// for the adapter's lifetime.
#[derive(Debug, Clone)]
pub struct PathPrefixer {
    prefix: String,
}

impl PathPrefixer {
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}/")
        };

        Self { prefix }
    }

    /// Object key for a file path.
    pub fn prefix_path(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path.trim_start_matches('/'))
    }

    /// Object key for a directory path, always ending in the separator.
    /// The empty path maps to the bare prefix.
    pub fn prefix_directory_path(&self, path: &str) -> String {
        let prefixed = self.prefix_path(path);
        if prefixed.is_empty() || prefixed.ends_with('/') {
            prefixed
        } else {
            format!("{prefixed}/")
        }
    }

    /// Logical path for an object key.
    pub fn strip_prefix<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.prefix.as_str()).unwrap_or(key)
    }

    /// Logical directory path for an object key, without the trailing
    /// separator.
    pub fn strip_directory_prefix<'a>(&self, key: &'a str) -> &'a str {
        self.strip_prefix(key).trim_end_matches('/')
    }
}
