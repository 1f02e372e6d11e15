use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Unsupported Content-Type. Please use application/json")]
    UnsupportedContentType,

    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::UnsupportedContentType => StatusCode::BAD_REQUEST,
            AppError::InvalidJson(_) | AppError::Upstream(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Anything that is not a routing decision becomes a plain 500.
        let body = match &self {
            AppError::NotFound | AppError::UnsupportedContentType => self.to_string(),
            AppError::InvalidJson(_) | AppError::Upstream(_) | AppError::Internal(_) => {
                tracing::error!("request failed: {}", self);
                format!("Error: {}", self)
            }
        };

        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain;charset=UTF-8"),
        );
        response
    }
}
