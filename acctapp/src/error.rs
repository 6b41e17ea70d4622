use acctctrl::error::{
    PlatformError,
    ValidationErrors,
};
use axum::{
    extract::rejection::JsonRejection,
    response::{
        IntoResponse,
        Response,
    },
    Json,
};
use http::status::StatusCode;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("User with ID {0} not found")]
    NotFound(String),
    #[error("{0}")]
    UnprocessableEntity(ValidationErrors),
    #[error("An unexpected error occurred.")]
    InternalServerError(#[source] PlatformError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PlatformError> for AppError {
    fn from(e: PlatformError) -> Self {
        match e {
            PlatformError::ValidationErrors(errors) => AppError::UnprocessableEntity(errors),
            PlatformError::NotFound(id) => AppError::NotFound(id.to_string()),
            e => AppError::InternalServerError(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::UnprocessableEntity(errors) => json!({
                "success": false,
                "message": errors.summary(),
                "errors": errors,
            }),
            AppError::InternalServerError(e) => {
                log::error!("internal error while handling request: {e}");
                json!({
                    "success": false,
                    "message": self.to_string(),
                })
            }
            _ => json!({
                "success": false,
                "message": self.to_string(),
            }),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
