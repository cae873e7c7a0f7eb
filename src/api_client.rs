use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failures carry the backend's own message so it can be
    /// shown to the user verbatim.
    #[error("{message}")]
    Auth { message: String },
    #[error("invalid response from dictionary service")]
    InvalidResponse,
    #[error("dictionary service returned {status}")]
    Status { status: StatusCode },
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Vec<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a non-success response to an `ApiError`. 401 and 403 are
/// authentication errors; the message is taken from the response body's
/// `detail` or `message` field when present.
pub(crate) fn classify_error(status: StatusCode, body: &str) -> ApiError {
    if status != StatusCode::UNAUTHORIZED && status != StatusCode::FORBIDDEN {
        return ApiError::Status { status };
    }
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .detail
        .into_iter()
        .next()
        .or(parsed.message)
        .unwrap_or_else(|| "Authentication required. Please log in again.".to_string());
    ApiError::Auth { message }
}

/// Dictionary lookups as the search session sees them. The session only
/// depends on this trait, so tests can stand in a double.
pub trait DictionaryApi: Send + Sync {
    /// Returns the raw entries for `term`, requesting a forced-refresh,
    /// required-match lookup.
    fn lookup(&self, term: &str) -> Result<Vec<Value>, ApiError>;
}

#[derive(Clone)]
pub struct DictionaryClient {
    base_url: String,
    client: Client,
}

impl DictionaryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .cookie_store(true)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl DictionaryApi for DictionaryClient {
    fn lookup(&self, term: &str) -> Result<Vec<Value>, ApiError> {
        debug!("dictionary lookup for '{}'", term);
        let response = self
            .client
            .get(format!("{}/dictionary/search/", self.base_url))
            .query(&[("q", term), ("refresh", "true"), ("required", "true")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_error(status, &body));
        }

        let body: Value = response.json()?;
        match body.get("learners_entries") {
            Some(Value::Array(entries)) => Ok(entries.clone()),
            _ => Err(ApiError::InvalidResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_with_detail_is_an_auth_error() {
        let error = classify_error(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": ["Session expired. Please log in again."]}"#,
        );
        match error {
            ApiError::Auth { message } => {
                assert_eq!(message, "Session expired. Please log in again.")
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn test_403_with_message_field_is_an_auth_error() {
        let error = classify_error(StatusCode::FORBIDDEN, r#"{"message": "Account locked."}"#);
        match error {
            ApiError::Auth { message } => assert_eq!(message, "Account locked."),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn test_auth_error_without_body_gets_a_default_message() {
        let error = classify_error(StatusCode::UNAUTHORIZED, "");
        match error {
            ApiError::Auth { message } => assert!(!message.is_empty()),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn test_server_errors_are_not_auth_errors() {
        let error = classify_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(
            error,
            ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR
            }
        ));
    }
}
