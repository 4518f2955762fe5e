//! HTTP transport.
//!
//! One thin request wrapper used by every operation: merges headers,
//! attaches the bearer credential when present, and normalizes responses
//! into either a JSON payload or a structured [`CrestError`].

use reqwest::{Client, Method, StatusCode, header};
use serde::Serialize;
use serde_json::Value;

use crest_core::{CrestError, Result};

use crate::credentials::CredentialStore;

/// Issues requests against one backend deployment.
///
/// The transport has no session side effects of its own: it reads the
/// injected [`CredentialStore`] on every request but never writes it.
/// Cookies are kept across requests so cookie-based sessions ride along
/// with the bearer header.
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: CredentialStore,
}

impl ApiClient {
    /// Creates a transport for `base_url`, reading the bearer token from
    /// `credentials` on each request.
    ///
    /// # Errors
    ///
    /// Returns `CrestError::Config` when the base URL is empty and
    /// `CrestError::Internal` when the underlying client cannot be built.
    pub fn new(base_url: impl Into<String>, credentials: CredentialStore) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(CrestError::config("backend URL is not configured"));
        }
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|err| CrestError::internal(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Sends a JSON request and returns the parsed payload.
    ///
    /// `query` is appended to the URL; `body` (when given) is sent as JSON.
    /// Success returns the payload unchanged, with no envelope. A JSON
    /// content type with a malformed body decodes to `Value::Null` rather
    /// than an error; non-JSON bodies come back as a string value.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        self.send_with_headers(method, path, query, body, &[]).await
    }

    /// [`send`](Self::send) with caller-supplied headers merged over the
    /// defaults.
    pub async fn send_with_headers(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        extra_headers: &[(&str, &str)],
    ) -> Result<Value> {
        let mut request = self
            .http
            .request(method, self.url(path))
            .header(header::CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }
        if let Some(token) = self.credentials.get().await {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| CrestError::network(err.to_string()))?;
        read_response(response).await
    }

    /// Sends a form-urlencoded POST (the OAuth2-style token grant shape).
    pub async fn send_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Result<Value> {
        let mut request = self.http.post(self.url(path)).form(form);
        if let Some(token) = self.credentials.get().await {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = request
            .send()
            .await
            .map_err(|err| CrestError::network(err.to_string()))?;
        read_response(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decodes a response body and folds non-success statuses into
/// [`CrestError::Api`].
async fn read_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    let text = response
        .text()
        .await
        .map_err(|err| CrestError::network(err.to_string()))?;
    let payload = if is_json {
        serde_json::from_str(&text).unwrap_or(Value::Null)
    } else {
        Value::String(text)
    };

    if !status.is_success() {
        return Err(api_error(status, payload));
    }
    Ok(payload)
}

/// Builds the structured error for a non-success response: a
/// server-supplied `detail` or `message` field wins over the generic
/// status line, and the raw payload rides along for callers that need it.
fn api_error(status: StatusCode, payload: Value) -> CrestError {
    let message = payload
        .get("detail")
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "API error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown")
            )
        });
    CrestError::Api {
        status: status.as_u16(),
        message,
        payload: (!payload.is_null()).then_some(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_prefers_detail_over_message() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            json!({"detail": "bad email", "message": "other"}),
        );
        assert_eq!(err.to_string(), "bad email");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_api_error_falls_back_to_message_field() {
        let err = api_error(StatusCode::BAD_REQUEST, json!({"message": "nope"}));
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_api_error_generic_line_for_opaque_payloads() {
        let err = api_error(StatusCode::NOT_FOUND, Value::String("gone".to_string()));
        assert_eq!(err.to_string(), "API error 404: Not Found");
        // the raw payload is still captured for fallback branching
        match err {
            CrestError::Api { payload, .. } => {
                assert_eq!(payload, Some(Value::String("gone".to_string())));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_null_payload_is_dropped() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, Value::Null);
        match err {
            CrestError::Api { payload, .. } => assert!(payload.is_none()),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let result = ApiClient::new("", CredentialStore::new());
        assert!(matches!(result, Err(CrestError::Config(_))));
    }
}
