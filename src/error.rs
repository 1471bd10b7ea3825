use reqwest::StatusCode;
use rmcp::model::{CallToolResult, Content};

/// All error types produced by the bitbucket-mcp server.
#[derive(Debug, thiserror::Error)]
pub enum BitbucketError {
    #[error("Authentication failed. Check your Bitbucket credentials.")]
    Auth,

    #[error("Rate limited by the Bitbucket API. Retry after {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid parameter: {0}")]
    InvalidParams(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl BitbucketError {
    /// Machine-usable discriminator included in every error response.
    pub fn kind(&self) -> &'static str {
        match self {
            BitbucketError::Auth => "authentication_error",
            BitbucketError::RateLimited { .. } => "rate_limit_error",
            BitbucketError::Api { .. } => "upstream_api_error",
            BitbucketError::InvalidParams(_) => "invalid_params",
            BitbucketError::Http(_) => "transport_error",
        }
    }

    /// Wrap the error into the uniform failure envelope. Every tool call
    /// terminates in a `CallToolResult`, success or error; nothing escapes
    /// to the protocol transport.
    pub fn to_tool_result(&self) -> CallToolResult {
        CallToolResult::error(vec![Content::text(format!("[{}] {self}", self.kind()))])
    }
}

/// Classify a non-2xx HTTP response into a typed error.
///
/// Pure over (status, Retry-After header, body text) so the mapping is
/// testable without a live server.
pub fn classify_status(
    status: StatusCode,
    retry_after: Option<&str>,
    body: &str,
) -> BitbucketError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = retry_after
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(60);
        return BitbucketError::RateLimited { retry_after_secs };
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return BitbucketError::Auth;
    }
    let message = extract_error_message(body)
        .unwrap_or_else(|| format!("API error: {}", status.as_u16()));
    BitbucketError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Pull the human-readable message out of Bitbucket's error body shape:
/// `{"type": "error", "error": {"message": "..."}}`.
fn extract_error_message(body: &str) -> Option<String> {
    let val: serde_json::Value = serde_json::from_str(body).ok()?;
    val.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
}

pub type Result<T> = std::result::Result<T, BitbucketError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(result: &CallToolResult) -> (bool, String) {
        let val = serde_json::to_value(result).unwrap();
        let is_error = val["isError"].as_bool().unwrap_or(false);
        let text = val["content"][0]["text"].as_str().unwrap_or("").to_string();
        (is_error, text)
    }

    #[test]
    fn rate_limit_uses_retry_after_header() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, Some("30"), "");
        match err {
            BitbucketError::RateLimited { retry_after_secs } => {
                assert_eq!(retry_after_secs, 30)
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
        let (is_error, text) = envelope(&err.to_tool_result());
        assert!(is_error);
        assert!(text.contains("[rate_limit_error]"));
        assert!(text.contains("30 seconds"));
    }

    #[test]
    fn rate_limit_defaults_to_sixty_seconds() {
        for header in [None, Some("soon"), Some("")] {
            let err = classify_status(StatusCode::TOO_MANY_REQUESTS, header, "");
            match err {
                BitbucketError::RateLimited { retry_after_secs } => {
                    assert_eq!(retry_after_secs, 60)
                }
                other => panic!("expected RateLimited, got {other:?}"),
            }
        }
    }

    #[test]
    fn forbidden_maps_to_auth_without_leaking_credentials() {
        // The body echoes a credential; the classified message must not.
        let body = r#"{"error": {"message": "token hunter2-secret rejected"}}"#;
        let err = classify_status(StatusCode::FORBIDDEN, None, body);
        let (is_error, text) = envelope(&err.to_tool_result());
        assert!(is_error);
        assert!(text.contains("[authentication_error]"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn unauthorized_maps_to_auth() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, None, ""),
            BitbucketError::Auth
        ));
    }

    #[test]
    fn upstream_error_extracts_body_message() {
        let body = r#"{"type": "error", "error": {"message": "Repository not found"}}"#;
        let err = classify_status(StatusCode::NOT_FOUND, None, body);
        match err {
            BitbucketError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Repository not found");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn upstream_error_falls_back_to_generic_message() {
        let err = classify_status(StatusCode::BAD_GATEWAY, None, "<html>oops</html>");
        match err {
            BitbucketError::Api { ref message, .. } => assert_eq!(message, "API error: 502"),
            other => panic!("expected Api, got {other:?}"),
        }
        let (_, text) = envelope(&err.to_tool_result());
        assert!(text.contains("[upstream_api_error]"));
    }
}
