//! # Error Handling
//!
//! Handlers return `Result<_, ApiError>` and the body is always `{"error": "..."}`.
//! Database errors and internal details go to the log only.
//!
//! ```rust,ignore
//! async fn handler(State(state): State<AppState>) -> Result<Json<GridResponse>, ApiError> {
//!     let request = GridRequest::from_params(params)?; // bad date -> 400
//!     Ok(Json(state.service.grid(&request).await?)) // DbErr -> 500
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

const DATABASE_MESSAGE: &str = "A database error occurred";

#[derive(Debug)]
pub enum ApiError {
    /// 400, for malformed bodies and unparsable filter values
    BadRequest { message: String },

    /// 403, raised by the access guard before any query runs
    Forbidden { message: String },

    /// 404, for `DbErr::RecordNotFound`
    NotFound { resource: String },

    /// 500 carrying the database error for the log
    Database(DbErr),

    /// 500 with optional details for the log
    Internal {
        message: String,
        details: Option<String>,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message sent to the client.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message }
            | Self::Forbidden { message }
            | Self::Internal { message, .. } => message.clone(),
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::Database(_) => DATABASE_MESSAGE.to_string(),
        }
    }

    fn log(&self) {
        match self {
            Self::Database(err) => tracing::error!(error = ?err, "Order manager database error"),
            Self::Internal {
                message,
                details: Some(details),
            } => tracing::error!(%message, %details, "Order manager internal error"),
            _ => tracing::debug!(
                status = %self.status_code(),
                error = %self.user_message(),
                "Request rejected"
            ),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(message) => Self::NotFound {
                resource: message
                    .split_whitespace()
                    .next()
                    .unwrap_or("Record")
                    .to_string(),
            },
            other => Self::Database(other),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::bad_request(format!("Malformed JSON body: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden() {
        let err = ApiError::forbidden("Access denied");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Access denied");
    }

    #[test]
    fn test_database_error_is_sanitized() {
        let err: ApiError = DbErr::Custom("FOREIGN KEY constraint failed".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), DATABASE_MESSAGE);
    }

    #[test]
    fn test_record_not_found_becomes_404() {
        let err: ApiError = DbErr::RecordNotFound("Order 12 is gone".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Order not found");
    }

    #[test]
    fn test_malformed_json_becomes_bad_request() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{order_ids:").unwrap_err();
        let err: ApiError = parse_err.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.user_message().starts_with("Malformed JSON body"));
    }

    #[tokio::test]
    async fn test_response_body_hides_internal_details() {
        let err = ApiError::internal("Could not write the export", Some("disk full".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Could not write the export"}));
    }
}
