use axum::{
    extract::{rejection::PathRejection, Path},
    response::IntoResponse,
    routing::get,
    Json,
};
use http::StatusCode;
use tailspin_dal::game::{CreateGame, GameRepository, UpdateGame};
#[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
use tailspin_dal::game::Game;
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    payload::JsonObject,
    repository_from_request,
    rest_api::record_id,
    state::AppState,
};

repository_from_request!(GameRepository);

const ENTITY: &str = "Game";
const REQUIRED_FIELDS: &[&str] = &["title", "description", "publisher_id", "category_id"];

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list, get_one, create, update, delete))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Game", operation_id = "listGame",
    responses((status = StatusCode::OK, description = "All games with publisher and category", body = Vec<Game>))))]
pub async fn list(repository: GameRepository) -> ApiResult<impl IntoResponse> {
    let games = repository.list_all().await?;
    Ok((StatusCode::OK, Json(games)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = "Game", operation_id = "getGame",
    responses((status = StatusCode::OK, description = "Get one game", body = Game),
    (status = StatusCode::NOT_FOUND, description = "Game not found", body = crate::error::ErrorBody))))]
pub async fn get_one(
    path: Result<Path<i64>, PathRejection>,
    repository: GameRepository,
) -> ApiResult<impl IntoResponse> {
    let id = record_id(path, ENTITY)?;
    let game = repository.get(id).await?;
    Ok((StatusCode::OK, Json(game)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Game", operation_id = "createGame",
    request_body = CreateGame,
    responses((status = StatusCode::CREATED, description = "Created game", body = Game),
    (status = StatusCode::BAD_REQUEST, description = "Invalid payload", body = crate::error::ErrorBody),
    (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Storage failure", body = crate::error::ErrorBody))))]
pub async fn create(
    repository: GameRepository,
    body: JsonObject,
) -> ApiResult<impl IntoResponse> {
    let payload: CreateGame = body.require(REQUIRED_FIELDS)?.into_payload()?;
    let game = repository.create(payload).await?;
    debug!("Game {} created", game.id);

    Ok((StatusCode::CREATED, Json(game)))
}

/// Body problems are only reported for an existing game
#[cfg_attr(feature = "openapi",  utoipa::path(put, path = "/{id}", tag = "Game", operation_id = "updateGame",
    request_body = UpdateGame,
    responses((status = StatusCode::OK, description = "Updated game", body = Game),
    (status = StatusCode::BAD_REQUEST, description = "Invalid payload", body = crate::error::ErrorBody),
    (status = StatusCode::NOT_FOUND, description = "Game not found", body = crate::error::ErrorBody))))]
pub async fn update(
    path: Result<Path<i64>, PathRejection>,
    repository: GameRepository,
    body: Result<JsonObject, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let id = record_id(path, ENTITY)?;
    repository.get(id).await?;

    let payload: UpdateGame = body?.into_payload()?;
    let game = repository.update(id, payload).await?;

    Ok((StatusCode::OK, Json(game)))
}

#[cfg_attr(feature = "openapi",  utoipa::path(delete, path = "/{id}", tag = "Game", operation_id = "deleteGame",
    responses((status = StatusCode::NO_CONTENT, description = "Deleted"),
    (status = StatusCode::NOT_FOUND, description = "Game not found", body = crate::error::ErrorBody))))]
pub async fn delete(
    path: Result<Path<i64>, PathRejection>,
    repository: GameRepository,
) -> ApiResult<impl IntoResponse> {
    let id = record_id(path, ENTITY)?;
    repository.delete(id).await?;
    debug!("Game {id} deleted");

    Ok((StatusCode::NO_CONTENT, ()))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}
