use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateFolderRequest, UpdateFolderRequest},
    repo_types::Folder,
    services,
};
use crate::{
    auth::AuthUser,
    error::AppResult,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folders", get(list_folders).post(create_folder))
        .route(
            "/folders/:id",
            get(get_folder).put(update_folder).delete(delete_folder),
        )
}

#[instrument(skip(state))]
pub async fn list_folders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Folder>>> {
    Ok(Json(services::list_folders(state.store.as_ref(), user.id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_folder(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateFolderRequest>,
) -> AppResult<(StatusCode, Json<Folder>)> {
    let folder = services::create_folder(state.store.as_ref(), user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

#[instrument(skip(state))]
pub async fn get_folder(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Folder>> {
    Ok(Json(services::get_folder(state.store.as_ref(), user.id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_folder(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateFolderRequest>,
) -> AppResult<Json<Folder>> {
    Ok(Json(
        services::update_folder(state.store.as_ref(), user.id, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_folder(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Value>> {
    services::delete_folder(state.store.as_ref(), user.id, id).await?;
    Ok(Json(json!({ "message": "Folder deleted successfully." })))
}
