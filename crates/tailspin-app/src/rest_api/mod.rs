pub mod category;
pub mod game;
mod macros;
pub mod publisher;

use axum::extract::{rejection::PathRejection, Path};
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Record id from the path, anything but a positive integer is reported as a
/// missing record
pub(crate) fn record_id(path: Result<Path<i64>, PathRejection>, entity: &str) -> ApiResult<i64> {
    match path {
        Ok(Path(id)) if id > 0 => Ok(id),
        Ok(Path(id)) => {
            debug!("Non positive {entity} id {id}");
            Err(ApiError::ResourceNotFound(entity.to_string()))
        }
        Err(e) => {
            debug!("Invalid {entity} id: {e}");
            Err(ApiError::ResourceNotFound(entity.to_string()))
        }
    }
}

/// All REST endpoints, with their state still to be provided
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .nest("/api/games", game::router())
        .nest("/api/publishers", publisher::router())
        .nest("/api/categories", category::router())
}

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;

    #[derive(utoipa::OpenApi)]
    #[openapi(info(title = "Tailspin Toys catalog"))]
    struct OpenApi;

    OpenApi::openapi()
        .nest("/api/games", game::api_docs())
        .nest("/api/publishers", publisher::api_docs())
        .nest("/api/categories", category::api_docs())
}
