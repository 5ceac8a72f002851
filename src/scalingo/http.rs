//! HTTP utilities for Scalingo REST API calls

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Typed remote API error.
///
/// Kept as a concrete type (rather than a bare `anyhow!`) so that callers can
/// downcast and classify, e.g. treat a 404 on a parent resource as an empty
/// result set.
#[derive(Debug, Error)]
#[error("API request failed: {status} {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

/// Check whether an error is a remote "not found".
pub fn is_not_found(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<ApiError>()
        .is_some_and(|e| e.status == 404)
}

/// Sanitize response body for logging
/// Truncates long responses and masks potentially sensitive patterns
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // back up to a char boundary; slicing mid-character panics
        let mut cut = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..cut],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull the human-readable message out of a Scalingo error body.
/// Bodies look like `{"error": "not found"}` or `{"errors": {...}}`.
fn error_message(body: &str) -> String {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return sanitize_for_log(body),
    };

    if let Some(msg) = parsed.get("error").and_then(|v| v.as_str()) {
        return msg.to_string();
    }
    if let Some(errors) = parsed.get("errors") {
        return sanitize_for_log(&errors.to_string());
    }
    sanitize_for_log(body)
}

/// HTTP client wrapper for Scalingo API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("scalingo-tables/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a GET request to a Scalingo API
    pub async fn get(&self, url: &str, token: &str) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only log sanitized/truncated error bodies
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(ApiError {
                status: status.as_u16(),
                message: error_message(&body),
            }
            .into());
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}

/// Format a Scalingo API error for display
pub fn format_api_error(error: &anyhow::Error) -> String {
    if let Some(api) = error.downcast_ref::<ApiError>() {
        return match api.status {
            401 => "Authentication failed. Check your Scalingo API token.".to_string(),
            403 => "Permission denied. Check your Scalingo account permissions.".to_string(),
            404 => "Resource not found.".to_string(),
            429 => "Rate limit exceeded. Please try again later.".to_string(),
            400 => "Invalid request. Check your parameters.".to_string(),
            500 | 503 => "Scalingo service temporarily unavailable. Please try again.".to_string(),
            _ => format!("Request failed with status {}.", api.status),
        };
    }

    let error_str = error.to_string();

    // Truncate long error messages and remove potential sensitive data
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found_on_404() {
        let err: anyhow::Error = ApiError {
            status: 404,
            message: "not found".to_string(),
        }
        .into();
        assert!(is_not_found(&err));
    }

    #[test]
    fn test_is_not_found_rejects_other_statuses() {
        let err: anyhow::Error = ApiError {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(!is_not_found(&err));

        let plain = anyhow::anyhow!("not an api error");
        assert!(!is_not_found(&plain));
    }

    #[test]
    fn test_sanitize_truncates_on_char_boundary() {
        // a two-byte character straddling the truncation index
        let body = format!("{}éé", "a".repeat(MAX_LOG_BODY_LENGTH - 1));
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated"));
        assert!(sanitized.starts_with(&"a".repeat(MAX_LOG_BODY_LENGTH - 1)));

        // exact ASCII fit is untouched
        let ascii = "b".repeat(MAX_LOG_BODY_LENGTH);
        assert_eq!(sanitize_for_log(&ascii), ascii);
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"error": "app not found"}"#), "app not found");
        assert_eq!(error_message("garbage"), "garbage");
    }

    #[test]
    fn test_format_api_error_maps_statuses() {
        let err: anyhow::Error = ApiError {
            status: 401,
            message: "unauthorized".to_string(),
        }
        .into();
        assert!(format_api_error(&err).contains("token"));
    }
}
