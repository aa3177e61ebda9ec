use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use collab_core::DomainError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every handler failure. Rendered as `{"error": CODE}` with a matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or invalid session")]
    Unauthorized,

    #[error("wrong email or password")]
    InvalidCredentials,

    #[error("not found ({0})")]
    NotFound(&'static str),

    #[error("bad request ({0})")]
    BadRequest(&'static str),

    #[error("conflict ({0})")]
    Conflict(&'static str),

    #[error("uploaded file is too large")]
    FileTooLarge,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound("NOT_FOUND")
    }

    pub fn missing_fields() -> Self {
        Self::BadRequest("MISSING_FIELDS")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Domain(DomainError::Forbidden) => StatusCode::FORBIDDEN,
            Self::Domain(DomainError::DuplicateActive) => StatusCode::CONFLICT,
            Self::Domain(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotFound(code) | Self::BadRequest(code) | Self::Conflict(code) => *code,
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::Domain(e) => e.code(),
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            error!("Internal error: {:#}", e);
        }
        (self.status(), Json(json!({ "error": self.code() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_types::models::RequestStatus;

    #[test]
    fn test_domain_errors_map_to_codes() {
        let forbidden = ApiError::from(DomainError::Forbidden);
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.code(), "FORBIDDEN");

        let dup = ApiError::from(DomainError::DuplicateActive);
        assert_eq!(dup.status(), StatusCode::CONFLICT);
        assert_eq!(dup.code(), "DUPLICATE_ACTIVE");

        let invalid = ApiError::from(DomainError::InvalidRequestStatus {
            action: "accept",
            from: RequestStatus::Rejected,
        });
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.code(), "INVALID_STATUS");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::from(anyhow::anyhow!("disk full"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL");
    }
}
