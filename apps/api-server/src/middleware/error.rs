//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpRequest, HttpResponse, ResponseError, error, http::StatusCode};
use moodlog_core::DomainError;
use moodlog_core::ports::AuthError;
use moodlog_shared::ErrorResponse;
use thiserror::Error;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("App password not set")]
    AppPasswordNotSet,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized
            | AppError::MissingToken
            | AppError::InvalidToken(_)
            | AppError::AppPasswordNotSet => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::MissingToken => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AppError::InvalidToken(detail) => {
                tracing::debug!(reason = %detail, "Rejected bearer token");
                ErrorResponse::new(401, "Invalid Token")
                    .with_detail("The bearer token is malformed, expired or not signed by this server.")
            }
            AppError::AppPasswordNotSet => ErrorResponse::new(401, "App Password Not Set")
                .with_detail("Set an app password before performing this action."),
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Unauthenticated => AppError::Unauthorized,
            DomainError::AppPasswordNotSet => AppError::AppPasswordNotSet,
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => AppError::MissingToken,
            AuthError::InvalidToken(msg) => AppError::InvalidToken(msg),
            AuthError::InvalidCredentials => AppError::Unauthorized,
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Malformed JSON bodies become 400s with a problem body.
pub fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Malformed path segments, such as a non-numeric id, become 400s.
pub fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Malformed query strings become 400s.
pub fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (DomainError::AppPasswordNotSet, StatusCode::UNAUTHORIZED),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (DomainError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[actix_web::test]
    async fn test_token_failure_reason_is_not_exposed() {
        let response = AppError::InvalidToken("InvalidSignature".into()).error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Invalid Token"));
        assert!(!body.contains("InvalidSignature"));
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let response = AppError::Internal("connection refused at 10.0.0.3".into()).error_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
