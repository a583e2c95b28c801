use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Database unavailable")]
    Unavailable,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid id")]
    InvalidId,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidId => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Internal server error"
            }
            AppError::Unavailable => {
                tracing::error!("Request rejected, no database connection");
                "Database unavailable"
            }
            AppError::NotFound(what) => *what,
            AppError::Forbidden => "Forbidden: you are not the author",
            AppError::InvalidId => "Invalid id format",
        };

        (self.status(), Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status() {
        assert_eq!(AppError::NotFound("Article not found").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unavailable.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_carries_status() {
        let response = AppError::NotFound("Article not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
