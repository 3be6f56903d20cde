//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::body::EitherBody;
use actix_web::dev::ServiceResponse;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use quill_core::error::{DomainError, RepoError};
use quill_shared::ErrorResponse;
use std::fmt;

use crate::observability::RequestId;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(self.problem())
    }
}

impl AppError {
    fn problem(&self) -> ErrorResponse {
        match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Internal(_) => ErrorResponse::internal_error(),
        }
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::MissingFields(_)
            | DomainError::Validation(_)
            | DomainError::UnknownReference { .. }
            | DomainError::IdMismatch { .. } => AppError::BadRequest(err.to_string()),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Store(repo) => repo.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => {
                tracing::warn!("Store constraint violation: {}", msg);
                AppError::Conflict("Request conflicts with existing data".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Renders body and query extraction failures as 400 problem responses.
pub fn bad_payload<E: fmt::Display>(err: E, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Re-renders a response produced from an [`AppError`] so that its problem
/// body names the request id. Other responses pass through untouched.
pub fn attach_request_id<B>(res: ServiceResponse<B>) -> ServiceResponse<EitherBody<B>> {
    let problem = res
        .response()
        .error()
        .and_then(|err| err.as_error::<AppError>())
        .zip(RequestId::of(res.request()))
        .map(|(err, id)| err.problem().with_request_id(id.as_str()));

    match problem {
        Some(body) => {
            let status = res.status();
            res.into_response(HttpResponse::build(status).json(body))
                .map_into_right_body()
        }
        None => res.map_into_left_body(),
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let id = Uuid::new_v4();
        let cases = [
            (DomainError::not_found("Post", id), StatusCode::NOT_FOUND),
            (DomainError::MissingFields(vec!["title"]), StatusCode::BAD_REQUEST),
            (
                DomainError::UnknownReference {
                    entity_type: "Author",
                    id,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::IdMismatch {
                    path: id,
                    declared: "x".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::Duplicate("ada".into()), StatusCode::CONFLICT),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn store_errors_hide_details() {
        let err = AppError::from(DomainError::Store(RepoError::Query(
            "relation \"posts\" does not exist".into(),
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("relation"));
    }

    #[test]
    fn reference_error_names_the_missing_author() {
        let id = Uuid::new_v4();
        let err = AppError::from(DomainError::UnknownReference {
            entity_type: "Author",
            id,
        });
        assert!(err.to_string().contains(&id.to_string()));
    }
}
