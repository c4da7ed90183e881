use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(anyhow::Error),
}

/// Store methods return `anyhow::Result`; sqlx failures keep their own code.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<sqlx::Error>() {
            Ok(db) => AppError::Database(db),
            Err(other) => AppError::Internal(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Returns the trimmed value of a required request field, or a 400.
pub fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// Parses a client-supplied id, or a 400 naming the field.
pub fn parse_id(raw: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("{field} is not a valid id")))
}

/// Like `parse_id`, but an absent or blank value is `None`.
pub fn optional_id(raw: Option<&str>, field: &str) -> Result<Option<Uuid>, AppError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_id(value, field).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_keep_database_code() {
        let err = AppError::from(anyhow::Error::from(sqlx::Error::RowNotFound));
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::from(anyhow::anyhow!("lock poisoned"));
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_required_rejects_blank() {
        assert_eq!(required(Some(" u1 "), "userId").unwrap(), "u1");
        let err = required(Some("  "), "userId").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: userId is required");
        assert!(required(None, "email").is_err());
    }

    #[test]
    fn test_ids_are_validated() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "stepId").unwrap(), id);
        let err = parse_id("step-1", "stepId").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: stepId is not a valid id");

        assert_eq!(optional_id(None, "roadmapId").unwrap(), None);
        assert_eq!(optional_id(Some(" "), "roadmapId").unwrap(), None);
        assert!(matches!(
            optional_id(Some("nope"), "roadmapId"),
            Err(AppError::Validation(_))
        ));
    }
}
