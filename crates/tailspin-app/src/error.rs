use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

/// Message returned for any storage failure, details stay in the log
pub const DATABASE_ERROR_MESSAGE: &str = "Database error occurred";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0} not found")]
    ResourceNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[source] tailspin_dal::Error),
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: String,
}

impl From<tailspin_dal::Error> for ApiError {
    fn from(value: tailspin_dal::Error) -> Self {
        use tailspin_dal::Error;
        match value {
            Error::RecordNotFound(entity) => ApiError::ResourceNotFound(entity),
            Error::DatabaseError(tailspin_dal::SqlxError::RowNotFound) => {
                ApiError::ResourceNotFound("Record".to_string())
            }
            Error::Validation(e) => ApiError::InvalidRequest(e.to_string()),
            Error::InvalidReference(msg) => ApiError::InvalidRequest(msg.to_string()),
            Error::InvalidPayload(msg) => ApiError::InvalidRequest(msg),
            e @ (Error::DatabaseError(_) | Error::MigrationError(_)) => ApiError::DatabaseError(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(msg) => {
                debug!("Invalid request: {msg}");
                (StatusCode::BAD_REQUEST, msg)
            }
            e @ ApiError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
            ApiError::DatabaseError(e) => {
                error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    DATABASE_ERROR_MESSAGE.to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
