/// Builds public URLs for stored objects.
///
/// Two layouts are supported: the service's native virtual-host format
/// (`https://{bucket}.{host}/{path}`) and a CDN or custom-domain format
/// (`https://{host}/{path}`).
#[derive(Debug, Clone)]
pub struct PublicUrlGenerator {
    base_url: String,
    prefix: String,
}

impl PublicUrlGenerator {
    /// `base_url` may be a bare host or carry an `http(s)://` scheme, which
    /// is stripped. With `obs_format` the bucket becomes a subdomain of the
    /// host; otherwise the host is used as-is (CDN/custom domain).
    pub fn new(base_url: &str, bucket: &str, prefix: &str, obs_format: bool) -> Self {
        let host = base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://");

        let base_url = if obs_format {
            format!("https://{bucket}.{host}")
        } else {
            format!("https://{host}")
        };

        Self {
            base_url,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        let object_path = if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix, path)
        };

        let encoded: Vec<String> = object_path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        format!("{}/{}", self.base_url, encoded.join("/"))
    }
}
