//! Backend HTTP plumbing.
//!
//! Every backend capability is a single request to a fixed path. This module
//! defines the request/response shapes the call sites exchange with a
//! [`Transport`], the request builders for each documented endpoint, and
//! [`UreqTransport`], the synchronous `ureq` implementation used outside of
//! tests.
//!
//! No retries, no caching. A non-2xx status is still a *response*; only
//! network-level failures are [`TransportError`]s.

use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Endpoint paths
// ---------------------------------------------------------------------------

pub const LOGIN: &str = "/auth/login";
pub const CLASSIFY: &str = "/api/classify";
pub const HISTORY: &str = "/api/history";
pub const BATCH_CLASSIFY: &str = "/api/batch-classify";
pub const SCRAPE: &str = "/api/scrape";
pub const YOUTUBE_SAVE: &str = "/api/youtube/save";
pub const BRAND_BATTLE: &str = "/api/brand/battle";
pub const STATS_SUMMARY: &str = "/api/stats/summary";
pub const STATS_TREND: &str = "/api/stats/trend";
pub const STATS_WORDCLOUD: &str = "/api/stats/wordcloud";

/// `POST /api/feedback/{id}`.
pub fn feedback_path(analysis_id: i64) -> String {
    format!("/api/feedback/{analysis_id}")
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A single uploaded file in a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(FilePart),
}

/// A request against a backend path (not a full URL).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            headers: Vec::new(),
            body: Body::Json(body),
        }
    }

    pub fn post_file(path: impl Into<String>, part: FilePart) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            headers: Vec::new(),
            body: Body::Multipart(part),
        }
    }

    /// Set a header, replacing any existing value (case-insensitive name).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw backend response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON, `None` when it isn't.
    pub fn json_value(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// The `message` field of a JSON object body, if any.
    pub fn message(&self) -> Option<String> {
        self.json_value()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}

/// Network-level failure: nothing usable came back.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{method} {path} failed: {reason}")]
    Network {
        method: &'static str,
        path: String,
        reason: String,
    },
    #[error("failed to read response from {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Performs one request. Implementations must not retry.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).send(request)
    }
}

// ---------------------------------------------------------------------------
// Request builders
// ---------------------------------------------------------------------------

pub fn login(username: &str, password: &str) -> ApiRequest {
    ApiRequest::post_json(
        LOGIN,
        json!({ "username": username, "password": password }),
    )
}

pub fn classify(text: &str) -> ApiRequest {
    ApiRequest::post_json(CLASSIFY, json!({ "text_input": text }))
}

pub fn history() -> ApiRequest {
    ApiRequest::get(HISTORY)
}

pub fn feedback(analysis_id: i64, correction: &str) -> ApiRequest {
    ApiRequest::post_json(
        feedback_path(analysis_id),
        json!({ "correction": correction }),
    )
}

pub fn batch_classify(filename: &str, bytes: Vec<u8>) -> ApiRequest {
    ApiRequest::post_file(
        BATCH_CLASSIFY,
        FilePart {
            field: "file".to_string(),
            filename: filename.to_string(),
            bytes,
        },
    )
}

pub fn scrape(url: &str) -> ApiRequest {
    ApiRequest::post_json(SCRAPE, json!({ "url": url }))
}

pub fn youtube_save(label: &str, video_url: &str, analysis_data: Value) -> ApiRequest {
    ApiRequest::post_json(
        YOUTUBE_SAVE,
        json!({ "label": label, "video_url": video_url, "analysis_data": analysis_data }),
    )
}

pub fn brand_battle(url_a: &str, url_b: &str) -> ApiRequest {
    ApiRequest::post_json(BRAND_BATTLE, json!({ "url_a": url_a, "url_b": url_b }))
}

pub fn stats_summary() -> ApiRequest {
    ApiRequest::get(STATS_SUMMARY)
}

pub fn stats_trend() -> ApiRequest {
    ApiRequest::get(STATS_TREND)
}

pub fn stats_wordcloud() -> ApiRequest {
    ApiRequest::get(STATS_WORDCLOUD)
}

// ---------------------------------------------------------------------------
// ureq transport
// ---------------------------------------------------------------------------

/// Synchronous HTTP transport against a backend base URL.
///
/// `timeout` is `None` unless configured: no client-enforced deadline, the
/// library defaults apply.
#[derive(Debug)]
pub struct UreqTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: builder.build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut call = self.agent.request(request.method.as_str(), &url);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let result = match &request.body {
            Body::Empty => call.call(),
            Body::Json(value) => call.send_json(value),
            Body::Multipart(part) => {
                let boundary = multipart_boundary(&part.bytes);
                let (content_type, bytes) = encode_multipart(part, &boundary);
                call.set("Content-Type", &content_type).send_bytes(&bytes)
            }
        };

        let response = match result {
            Ok(resp) => resp,
            // 4xx/5xx still carry a body with the server's message.
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(e)) => {
                return Err(TransportError::Network {
                    method: request.method.as_str(),
                    path: request.path.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status();
        let body = response.into_string().map_err(|e| TransportError::Read {
            path: request.path.clone(),
            reason: e.to_string(),
        })?;

        Ok(ApiResponse { status, body })
    }
}

/// Boundary for one upload. Seeded from the clock; a candidate that occurs
/// in the payload is skipped, so the body never contains its own delimiter.
fn multipart_boundary(payload: &[u8]) -> String {
    boundary_for(payload, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

fn boundary_for(payload: &[u8], seed: i64) -> String {
    (0u32..)
        .map(|n| format!("----sentimen{seed:x}{n:x}"))
        .find(|candidate| {
            !payload
                .windows(candidate.len())
                .any(|w| w == candidate.as_bytes())
        })
        .unwrap_or_default()
}

/// Encode a single-file `multipart/form-data` body.
///
/// Returns the `Content-Type` header value and the body bytes.
pub fn encode_multipart(part: &FilePart, boundary: &str) -> (String, Vec<u8>) {
    let filename = part.filename.replace('"', "%22");
    let mut body = Vec::with_capacity(part.bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            part.field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(&part.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_header_replaces_case_insensitively() {
        let req = ApiRequest::get("/x")
            .with_header("authorization", "Bearer a")
            .with_header("Authorization", "Bearer b");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("AUTHORIZATION"), Some("Bearer b"));
    }

    #[test]
    fn classify_request_shape() {
        let req = classify("mantap");
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/api/classify");
        assert_eq!(req.body, Body::Json(json!({ "text_input": "mantap" })));
    }

    #[test]
    fn feedback_request_targets_analysis_id() {
        let req = feedback(42, "Negatif");
        assert_eq!(req.path, "/api/feedback/42");
        assert_eq!(req.body, Body::Json(json!({ "correction": "Negatif" })));
    }

    #[test]
    fn response_message_extraction() {
        let resp = ApiResponse::new(400, r#"{"status": "error", "message": "URL is required"}"#);
        assert!(!resp.is_success());
        assert_eq!(resp.message().as_deref(), Some("URL is required"));

        let html = ApiResponse::new(502, "<html>Bad Gateway</html>");
        assert!(html.message().is_none());
    }

    #[test]
    fn multipart_body_contains_file_and_boundary() {
        let part = FilePart {
            field: "file".to_string(),
            filename: "ulasan.csv".to_string(),
            bytes: b"text\nenak".to_vec(),
        };
        let (content_type, body) = encode_multipart(&part, "XYZ");
        assert_eq!(content_type, "multipart/form-data; boundary=XYZ");

        let body = String::from_utf8(body).unwrap();
        assert!(body.starts_with("--XYZ\r\n"));
        assert!(body.contains("name=\"file\"; filename=\"ulasan.csv\""));
        assert!(body.contains("text\nenak"));
        assert!(body.ends_with("\r\n--XYZ--\r\n"));
    }

    #[test]
    fn boundary_skips_candidates_found_in_payload() {
        let payload = b"a,b\n----sentimen2a0\n----sentimen2a1\n";
        let boundary = boundary_for(payload, 0x2a);
        assert_eq!(boundary, "----sentimen2a2");

        assert_eq!(boundary_for(b"text\nenak", 0x2a), "----sentimen2a0");
    }

    #[test]
    fn transport_strips_trailing_slash() {
        let t = UreqTransport::new("http://127.0.0.1:5000/", None);
        assert_eq!(t.base_url(), "http://127.0.0.1:5000");
    }
}
