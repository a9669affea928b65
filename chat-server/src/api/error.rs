use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hms_chat::ChatError;
use hms_chat::common::wire::StatusResponse;

/// Failure of a request, rendered as a `{ success: false, message }` envelope.
#[derive(Debug)]
pub struct ApiError(pub ChatError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ChatError::Forbidden(_) => StatusCode::FORBIDDEN,
            ChatError::Storage(_) | ChatError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ChatError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self.0);
        } else {
            log::warn!("Request rejected ({status}): {}", self.0);
        }
        (status, Json(StatusResponse::failure(self.0.to_string()))).into_response()
    }
}
