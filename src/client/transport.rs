use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::types::ObsError;

/// A raw HTTP exchange as seen by the client: status, headers and body.
/// Header names are lowercased.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

/// Dispatches one HTTP request and returns the response whatever its status.
///
/// The transport reports only failures to complete the exchange
/// (`ObsError::Transport`); status-code handling belongs to the client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
        body: Bytes,
    ) -> Result<HttpResponse, ObsError>;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ObsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ObsError::Configuration(format!("failed to build http client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
        body: Bytes,
    ) -> Result<HttpResponse, ObsError> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|e| ObsError::Transport(format!("invalid http method {method}: {e}")))?;

        let mut request = self.client.request(method, url);
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| ObsError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ObsError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}
