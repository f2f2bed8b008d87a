//! Canonical resource construction for OBS signature v1.
//!
//! The canonicalized resource is the last line of the string-to-sign: the
//! bucket/object path in the service's own encoding, followed by the signed
//! sub-resource query parameters.

/// Query parameter names that participate in the canonical resource.
///
/// This is a closed vocabulary defined by the service; any other query
/// parameter is excluded from signing.
const SUB_RESOURCES: &[&str] = &[
    "CDNNotifyConfiguration",
    "acl",
    "append",
    "attname",
    "backtosource",
    "cors",
    "customdomain",
    "delete",
    "deletebucket",
    "directcoldaccess",
    "encryption",
    "inventory",
    "length",
    "lifecycle",
    "location",
    "logging",
    "metadata",
    "modify",
    "name",
    "notification",
    "object-lock",
    "partNumber",
    "policy",
    "position",
    "quota",
    "rename",
    "replication",
    "response-cache-control",
    "response-content-disposition",
    "response-content-encoding",
    "response-content-language",
    "response-content-type",
    "response-expires",
    "restore",
    "retention",
    "storageClass",
    "storagePolicy",
    "storageinfo",
    "tagging",
    "torrent",
    "truncate",
    "uploadId",
    "uploads",
    "versionId",
    "versioning",
    "versions",
    "website",
    "x-image-process",
    "x-image-save-bucket",
    "x-image-save-object",
    "x-obs-security-token",
];

/// Builds the canonicalized resource for a request.
///
/// `/` when no bucket is addressed, otherwise `/{bucket}/` plus the encoded
/// object key, plus the sorted sub-resource suffix.
pub fn canonicalized_resource(bucket: &str, object: &str, query: &[(String, String)]) -> String {
    let mut resource = String::from("/");

    if !bucket.is_empty() {
        resource.push_str(bucket);
        resource.push('/');
        if !object.is_empty() {
            resource.push_str(&obs_url_encode(object));
        }
    }

    resource.push_str(&sub_resources_query_string(query));
    resource
}

/// OBS-specific URL encoding of an object key.
///
/// Percent-encodes every character outside the RFC 3986 unreserved set, then
/// restores `/` path separators and replaces `%20` with `+`. The service
/// computes signatures over exactly this form, so the two replacements must
/// be preserved as-is.
pub fn obs_url_encode(input: &str) -> String {
    urlencoding::encode(input)
        .replace("%2F", "/")
        .replace("%20", "+")
}

fn sub_resources_query_string(query: &[(String, String)]) -> String {
    let mut sub_resources: Vec<(&str, &str)> = query
        .iter()
        .filter(|(key, _)| SUB_RESOURCES.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    if sub_resources.is_empty() {
        return String::new();
    }

    sub_resources.sort_by(|a, b| a.0.cmp(b.0));

    let parts: Vec<String> = sub_resources
        .iter()
        .map(|(key, value)| {
            if value.is_empty() {
                (*key).to_string()
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect();

    format!("?{}", parts.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_root_resource_without_bucket() {
        assert_eq!(canonicalized_resource("", "", &[]), "/");
        // An object without a bucket cannot be addressed
        assert_eq!(canonicalized_resource("", "object.txt", &[]), "/");
    }

    #[test]
    fn test_bucket_resource() {
        assert_eq!(canonicalized_resource("bucket", "", &[]), "/bucket/");
        assert_eq!(
            canonicalized_resource("bucket", "object.txt", &[]),
            "/bucket/object.txt"
        );
    }

    #[test]
    fn test_object_key_encoding_preserves_separators() {
        assert_eq!(
            canonicalized_resource("bucket", "a b/c+d/é.txt", &[]),
            "/bucket/a+b/c%2Bd/%C3%A9.txt"
        );
    }

    #[test]
    fn test_encoding_round_trip() {
        // Decoding by standard rules, with '+' mapped back to space, must
        // recover the original key.
        let key = "dir one/文件 name/f+g.txt";
        let encoded = obs_url_encode(key);
        let normalized = encoded.replace('+', "%20");
        let decoded = urlencoding::decode(&normalized).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_sub_resource_filtering_and_sorting() {
        let q = query(&[
            ("versionId", "xxx"),
            ("randomKey", "y"),
            ("response-content-type", "text/plain"),
        ]);
        assert_eq!(
            canonicalized_resource("bucket", "object", &q),
            "/bucket/object?response-content-type=text/plain&versionId=xxx"
        );
    }

    #[test]
    fn test_value_less_sub_resource() {
        let q = query(&[("acl", "")]);
        assert_eq!(
            canonicalized_resource("bucket", "object.txt", &q),
            "/bucket/object.txt?acl"
        );
    }

    #[test]
    fn test_non_vocabulary_keys_ignored() {
        let q = query(&[("prefix", "a/"), ("marker", "b"), ("max-keys", "10")]);
        assert_eq!(canonicalized_resource("bucket", "", &q), "/bucket/");
    }
}
