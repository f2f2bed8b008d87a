use std::collections::{BTreeMap, HashMap};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::auth::resource::canonicalized_resource;

type HmacSha1 = Hmac<Sha1>;

const OBS_HEADER_PREFIX: &str = "x-obs-";

/// OBS signature v1 calculator.
///
/// Produces the `Authorization` header value for a request:
/// `OBS {access_key}:{base64(hmac_sha1(secret_key, string_to_sign))}`.
///
/// The calculation is pure: given the same method, resource, query and
/// headers it always yields the same token.
#[derive(Debug, Clone)]
pub struct ObsSignature {
    access_key: String,
    secret_key: String,
}

impl ObsSignature {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Sign a request and return the `Authorization` header value.
    pub fn sign_request(
        &self,
        method: &str,
        bucket: &str,
        object: &str,
        query: &[(String, String)],
        headers: &HashMap<String, String>,
    ) -> String {
        let string_to_sign = self.string_to_sign(method, bucket, object, query, headers);
        let signature = self.calculate_signature(&string_to_sign);

        format!("OBS {}:{}", self.access_key, signature)
    }

    /// Build the string-to-sign:
    ///
    /// ```text
    /// HTTP-Verb + "\n" +
    /// Content-MD5 + "\n" +
    /// Content-Type + "\n" +
    /// Date + "\n" +
    /// CanonicalizedHeaders + CanonicalizedResource
    /// ```
    fn string_to_sign(
        &self,
        method: &str,
        bucket: &str,
        object: &str,
        query: &[(String, String)],
        headers: &HashMap<String, String>,
    ) -> String {
        let mut content_md5 = "";
        let mut content_type = "";
        let mut date = "";
        let mut canonicalized_headers = BTreeMap::new();

        for (key, value) in headers {
            let key = key.trim().to_ascii_lowercase();

            match key.as_str() {
                "content-md5" => content_md5 = value.as_str(),
                "content-type" => content_type = value.as_str(),
                "date" => date = value.as_str(),
                _ if key.starts_with(OBS_HEADER_PREFIX) => {
                    canonicalized_headers.insert(key, value.trim());
                }
                _ => {}
            }
        }

        // When x-obs-date is supplied the Date line is signed as empty
        if canonicalized_headers.contains_key("x-obs-date") {
            date = "";
        }

        let mut string_to_sign = format!("{method}\n{content_md5}\n{content_type}\n{date}\n");

        for (key, value) in &canonicalized_headers {
            string_to_sign.push_str(key);
            string_to_sign.push(':');
            string_to_sign.push_str(value);
            string_to_sign.push('\n');
        }

        string_to_sign.push_str(&canonicalized_resource(bucket, object, query));
        string_to_sign
    }

    fn calculate_signature(&self, string_to_sign: &str) -> String {
        let mut mac = HmacSha1::new_from_slice(self.secret_key.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(string_to_sign.as_bytes());

        BASE64.encode(mac.finalize().into_bytes())
    }
}
