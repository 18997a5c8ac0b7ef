use ag_core::{Error, ErrorKind};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// An HTTP failure: a status and the terse message sent as `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn url_required() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "URL is required")
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Resource not found")
    }

    pub fn rate_limited() -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let bad_request = |message: &str| Self::new(StatusCode::BAD_REQUEST, message);
        let internal = |message: &str| Self::new(StatusCode::INTERNAL_SERVER_ERROR, message);

        match error.kind() {
            ErrorKind::InvalidUrl => bad_request("Invalid URL format"),
            ErrorKind::DomainNotAllowed => Self::new(StatusCode::FORBIDDEN, "Domain not allowed"),
            ErrorKind::FetchTimeout => bad_request("Request timed out while fetching content"),
            ErrorKind::FetchFailed => match &error {
                Error::FetchFailed(reason) => {
                    bad_request(&format!("Failed to fetch content: {}", reason))
                }
                _ => bad_request("Failed to fetch content"),
            },
            ErrorKind::NoContentFound => bad_request("No content found at URL"),
            ErrorKind::NoKeywordsFound => bad_request("Failed to extract keywords"),
            ErrorKind::ExtractionFailed => internal("Failed to extract keywords"),
            ErrorKind::GenerationFailed => internal("Failed to generate content"),
            ErrorKind::PersistenceFailed => internal("Failed to save content history"),
            ErrorKind::Unexpected => internal("An unexpected error occurred"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::InvalidUrl("x".into()), StatusCode::BAD_REQUEST, "Invalid URL format"),
            (Error::DomainNotAllowed("h".into()), StatusCode::FORBIDDEN, "Domain not allowed"),
            (
                Error::FetchTimeout,
                StatusCode::BAD_REQUEST,
                "Request timed out while fetching content",
            ),
            (Error::NoContentFound, StatusCode::BAD_REQUEST, "No content found at URL"),
            (Error::NoKeywordsFound, StatusCode::BAD_REQUEST, "Failed to extract keywords"),
            (
                Error::ExtractionFailed("tagger".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract keywords",
            ),
            (
                Error::GenerationFailed("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate content",
            ),
            (
                Error::PersistenceFailed("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save content history",
            ),
            (
                Error::Config("oops".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred",
            ),
        ];

        for (error, status, message) in cases {
            let api: ApiError = error.into();
            assert_eq!(api.status, status);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn test_fetch_failure_carries_reason() {
        let api = ApiError::from(Error::FetchFailed("HTTP 404 Not Found".into()));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Failed to fetch content: HTTP 404 Not Found");
    }
}
