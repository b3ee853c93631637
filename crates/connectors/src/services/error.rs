use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Missing configuration: {0} must be set")]
    MissingConfig(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{service} API returned status {status}: {message}")]
    ApiError {
        service: &'static str,
        status: u16,
        message: String,
    },
}

impl ServiceError {
    /// Builds an `ApiError` from a non-success upstream response body.
    /// Both Google (`{"error": {"message": ..}}`) and Notion (`{"message": ..}`)
    /// error shapes are understood; anything else is passed through verbatim.
    /// An empty body falls back to the status reason phrase.
    pub(crate) fn from_upstream(service: &'static str, status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .or_else(|| v.get("error_description"))
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string());
        let message = if message.trim().is_empty() {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("no error details")
                .to_string()
        } else {
            message
        };

        ServiceError::ApiError {
            service,
            status,
            message,
        }
    }

    /// True for failures caused by deployment configuration rather than upstream.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ServiceError::MissingConfig(_) | ServiceError::InvalidConfig(_)
        )
    }
}
