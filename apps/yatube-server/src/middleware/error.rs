//! Error handling - failures render the HTML error pages.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use askama::Template;

use yatube_core::error::{DomainError, RepoError};
use yatube_core::ports::{CacheError, StorageError};

use crate::views::{ForbiddenTemplate, Nav, NotFoundTemplate, ServerErrorTemplate};

/// Application-level error type rendered through the `core/` templates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn page(&self) -> askama::Result<String> {
        let nav = Nav::anonymous();
        match self {
            AppError::NotFound(_) => NotFoundTemplate { nav }.render(),
            AppError::Forbidden => ForbiddenTemplate { nav }.render(),
            _ => ServerErrorTemplate { nav }.render(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Internal(detail) => tracing::error!("Internal error: {}", detail),
            AppError::NotFound(detail) => tracing::debug!("Not found: {}", detail),
            other => tracing::debug!("Request rejected: {}", other),
        }

        let mut response = HttpResponse::build(self.status_code());
        match self {
            AppError::BadRequest(_) | AppError::PayloadTooLarge => {
                response.content_type("text/plain; charset=utf-8").body(self.to_string())
            }
            _ => match self.page() {
                Ok(body) => response.content_type("text/html; charset=utf-8").body(body),
                Err(e) => {
                    tracing::error!(error = %e, "Error page rendering failed");
                    response
                        .content_type("text/plain; charset=utf-8")
                        .body(self.status_code().to_string())
                }
            },
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{entity_type} '{key}'"))
            }
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Invalid(errors) => AppError::BadRequest(errors.to_string()),
            DomainError::Repo(e) => e.into(),
            DomainError::Storage(e) => e.into(),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Internal(format!("Constraint violation: {msg}")),
            RepoError::Connection(msg) => AppError::Internal(format!("Database connection: {msg}")),
            RepoError::Query(msg) => AppError::Internal(format!("Database query: {msg}")),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) | StorageError::InvalidPath(path) => {
                AppError::NotFound(format!("media '{path}'"))
            }
            StorageError::Io(e) => AppError::Internal(format!("Media storage: {e}")),
        }
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_not_found_renders_page() {
        let response = AppError::NotFound("post '9'".to_string()).error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Page not found"));
    }

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let forbidden: AppError = DomainError::Forbidden.into();
        let missing: AppError = DomainError::not_found("group", "cats").into();
        let storage: AppError = DomainError::Storage(StorageError::InvalidPath("..".into())).into();
        let repo: AppError = RepoError::Query("boom".into()).into();

        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(storage.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(repo.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
