//! Shared HTTP client and auth utilities.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::AlfredError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> AlfredError {
    match status {
        401 | 403 => AlfredError::Authentication(error_message(body)),
        429 => AlfredError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => AlfredError::api(status, error_message(body)),
    }
}

/// Prefer the `error.message` field of an OpenAI-style error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication() {
        let err = status_to_error(401, r#"{"error":{"message":"Incorrect API key provided"}}"#);
        assert!(matches!(err, AlfredError::Authentication(msg) if msg == "Incorrect API key provided"));
    }

    #[test]
    fn rate_limit_reads_retry_after() {
        let err = status_to_error(429, r#"{"error":{"retry_after":1.5}}"#);
        assert!(matches!(err, AlfredError::RateLimited { retry_after_ms: Some(1500) }));
    }

    #[test]
    fn plain_body_is_kept_verbatim() {
        let err = status_to_error(502, "bad gateway");
        assert_eq!(err.to_string(), "API error (status 502): bad gateway");
    }

    #[test]
    fn bearer_header_is_set() {
        let headers = bearer_headers("sk-abc");
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-abc");
    }
}
