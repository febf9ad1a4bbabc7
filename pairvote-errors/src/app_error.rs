use serde::{Deserialize, Serialize};

/// Error taxonomy shared by every crate in the workspace.
///
/// The first four variants are expected, caller-recoverable conditions and
/// map to distinct HTTP statuses; `Store` is fatal for the request.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("daily {0} limit reached")]
    QuotaExceeded(String),

    #[error("already voted on this pair")]
    DuplicatePair,

    #[error("storage error: {0}")]
    Store(String),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(entity.to_string())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn quota_exceeded(action: &str) -> Self {
        Self::QuotaExceeded(action.to_string())
    }
}

#[cfg(feature = "seaorm")]
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Store(err.to_string())
    }
}

#[cfg(feature = "axum")]
mod http_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        error: String,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = match &self {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AppError::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
                AppError::DuplicatePair => StatusCode::CONFLICT,
                AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };

            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!("request failed: {}", self);
                // Do not leak storage details to the caller.
                return (
                    status,
                    Json(ErrorResponse {
                        error: "internal server error".to_string(),
                    }),
                )
                    .into_response();
            }

            (
                status,
                Json(ErrorResponse {
                    error: self.to_string(),
                }),
            )
                .into_response()
        }
    }
}
