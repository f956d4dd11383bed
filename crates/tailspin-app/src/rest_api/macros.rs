/// Read only endpoints (list all, get by id) for a lookup entity
#[macro_export]
macro_rules! lookup_api {
    ($entity:ty) => {
        type EntityRepository = paste::paste! {[<$entity Repository>]};
        $crate::repository_from_request!(EntityRepository);
        pub mod lookup_api {
            use super::*;
            use crate::error::ApiResult;
            use axum::{
                extract::{rejection::PathRejection, Path},
                response::IntoResponse,
                Json,
            };
            use http::StatusCode;

            #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = stringify!($entity), operation_id = concat!("list", stringify!($entity)),
            responses((status = StatusCode::OK, description = "List all, ordered by id", body = Vec<$entity>))))]
            pub async fn list(repository: EntityRepository) -> ApiResult<impl IntoResponse> {
                let records = repository.list_all().await?;
                Ok((StatusCode::OK, Json(records)))
            }

            #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = stringify!($entity), operation_id = concat!("get", stringify!($entity)),
            responses((status = StatusCode::OK, description = "Get one", body = $entity),
            (status = StatusCode::NOT_FOUND, description = "Not found", body = crate::error::ErrorBody))))]
            pub async fn get(
                path: Result<Path<i64>, PathRejection>,
                repository: EntityRepository,
            ) -> ApiResult<impl IntoResponse> {
                let id = crate::rest_api::record_id(path, stringify!($entity))?;
                let record = repository.get(id).await?;

                Ok((StatusCode::OK, Json(record)))
            }

            #[cfg(feature = "openapi")]
            #[cfg_attr(feature = "openapi", derive(utoipa::OpenApi))]
            #[openapi(paths(list, get))]
            struct ApiDocs;

            #[cfg(feature = "openapi")]
            pub(super) fn api_docs() -> utoipa::openapi::OpenApi {
                use utoipa::OpenApi as _;
                ApiDocs::openapi()
            }
        }

        pub fn router() -> axum::Router<$crate::state::AppState> {
            use axum::routing::get;
            axum::Router::new()
                .route("/", get(lookup_api::list))
                .route("/{id}", get(lookup_api::get))
        }

        #[cfg(feature = "openapi")]
        pub fn api_docs() -> utoipa::openapi::OpenApi {
            lookup_api::api_docs()
        }
    };
}
