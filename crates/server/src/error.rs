use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use customer::CustomerError;
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("API Key no proporcionada")]
    MissingApiKey,

    #[error("API Key invalida")]
    InvalidApiKey,

    /// Body or path could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Recurso no encontrado")]
    RouteNotFound,

    #[error(transparent)]
    Customer(#[from] CustomerError),
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MissingApiKey | ServerError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::RouteNotFound => StatusCode::NOT_FOUND,
            ServerError::Customer(err) => match err {
                CustomerError::Validation(_) => StatusCode::BAD_REQUEST,
                CustomerError::NotFound(_) => StatusCode::NOT_FOUND,
                CustomerError::EmailTaken | CustomerError::EmailTakenByOther => {
                    StatusCode::CONFLICT
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ServerError::Customer(CustomerError::Validation(errors)) => {
                Json(json!({ "errors": errors }))
            }
            _ => Json(json!({ "error": self.to_string() })),
        };

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(err: JsonRejection) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(err.body_text())
        } else {
            ServerError::BadRequest(err.body_text())
        }
    }
}

impl From<PathRejection> for ServerError {
    fn from(err: PathRejection) -> Self {
        ServerError::BadRequest(err.body_text())
    }
}
