//! Recording `HttpTransport` double for client tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use obsfs::{HttpResponse, HttpTransport};
use obsfs::types::ObsError;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

#[derive(Default)]
pub struct MockTransport {
    pub requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, ObsError>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response; responses are consumed in order. When the queue is
    /// empty, requests succeed with an empty 200.
    pub fn respond(&self, status: u16, body: &str) {
        self.respond_with_headers(status, body, &[]);
    }

    pub fn respond_with_headers(&self, status: u16, body: &str, headers: &[(&str, &str)]) {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Bytes::from(body.to_string()),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ObsError::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was recorded")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(
        &self,
        method: &str,
        url: &str,
        headers: &HashMap<String, String>,
        body: Bytes,
    ) -> Result<HttpResponse, ObsError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 200,
                    headers: HashMap::new(),
                    body: Bytes::new(),
                })
            })
    }
}
