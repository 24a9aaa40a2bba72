use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or malformed; answered as `{ error }`.
    #[error("{0}")]
    Validation(String),

    /// Answered as a 401 with a bare `{ message }`, which is what existing
    /// clients of the category endpoints expect for a missing name.
    #[error("{0}")]
    MissingName(String),

    #[error("{0}")]
    BadRequest(String),

    /// Business-rule refusal reported with a 200 and `success: false`.
    #[error("{0}")]
    Declined(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// A storage call failed while serving a named operation.
    #[error("{message}")]
    Operation {
        status: StatusCode,
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Payment gateway error")]
    Gateway(#[from] GatewayError),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData<'a> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ErrorData<'_> {
    fn body(message: &str, error: Option<String>) -> serde_json::Value {
        serde_json::to_value(ErrorData {
            success: false,
            message,
            error,
        })
        .unwrap_or_default()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": message }),
            ),
            AppError::MissingName(message) => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "message": message }),
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorData::body(message, Some(message.clone())),
            ),
            AppError::Declined(message) => (StatusCode::OK, ErrorData::body(message, None)),
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, ErrorData::body(message, None))
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorData::body(message, None)),
            AppError::Operation {
                status,
                message,
                source,
            } => {
                tracing::error!(error = %source, "{message}");
                (*status, ErrorData::body(message, Some(source.to_string())))
            }
            AppError::Gateway(err) => {
                tracing::error!(error = %err, "payment gateway call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_json())
            }
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorData::body(&self.to_string(), Some(err.to_string())),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorData::body(&self.to_string(), Some(err.to_string())),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Tags a storage failure with the message of the operation it broke.
pub trait OrFail<T> {
    /// Reported as a 500.
    fn or_fail(self, message: &'static str) -> AppResult<T>;

    /// Reported as a 400; the read-only product queries answer this way.
    fn or_reject(self, message: &'static str) -> AppResult<T>;
}

impl<T, E> OrFail<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn or_fail(self, message: &'static str) -> AppResult<T> {
        self.map_err(|err| AppError::Operation {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
            source: err.into(),
        })
    }

    fn or_reject(self, message: &'static str) -> AppResult<T> {
        self.map_err(|err| AppError::Operation {
            status: StatusCode::BAD_REQUEST,
            message,
            source: err.into(),
        })
    }
}
