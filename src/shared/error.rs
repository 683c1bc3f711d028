use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbError(#[from] sea_orm::DbErr),

    #[error("Not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The provider could not be reached or the transfer broke off.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with something that is not the expected JSON.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// The provider answered without a field the link cannot do without.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// The provider answered with its own error object.
    #[error("Provider error {code}: {message}")]
    ProviderError { code: i64, message: String },

    /// The user declined on the provider's consent page.
    #[error("Authorization denied: {error}")]
    AuthorizationDenied {
        error: String,
        description: Option<String>,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            AppError::Network(_)
            | AppError::MalformedResponse(_)
            | AppError::MissingField(_)
            | AppError::ProviderError { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::DbError(err) => {
                tracing::error!("Database error: {:?}", err);
                "Database error".to_string()
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Network(err) => {
                tracing::warn!("Provider unreachable: {}", err);
                "Provider unreachable".to_string()
            }
            AppError::AuthorizationDenied { error, description } => {
                description.clone().unwrap_or_else(|| error.clone())
            }
            other => other.to_string(),
        };

        (
            status,
            Json(json!({
                "error": message,
                "error_code": status.as_u16(),
            })),
        )
            .into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
