use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

/// The `{ success, message, ...payload }` envelope. The payload's fields are
/// flattened next to `success` and `message`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: message.into(),
            data,
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::success(message, data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// Payload for envelopes that carry nothing besides the message.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct Empty {}

/// `{ ok: true }`, answered by the guard probes and the payment endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkFlag {
    pub ok: bool,
}

impl OkFlag {
    pub fn yes() -> Self {
        Self { ok: true }
    }
}
