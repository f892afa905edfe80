use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tradein_core::InterfaceError;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'static str,
    detail: &'a str,
    correlation_id: &'a str,
}

/// HTTP rendering of an [`InterfaceError`].
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl From<InterfaceError> for ApiError {
    fn from(value: InterfaceError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        };
        let body = ErrorBody {
            error: self.0.error_class(),
            message: self.0.user_message(),
            detail: self.0.detail(),
            correlation_id: self.0.correlation_id(),
        };

        (status, Json(body)).into_response()
    }
}
