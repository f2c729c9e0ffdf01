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
    dto::{CreateFileRequest, UpdateFileRequest},
    repo_types::File,
    services,
};
use crate::{
    auth::AuthUser,
    error::AppResult,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files/folder/:folder_id",
            get(list_files).post(create_file),
        )
        .route("/files/:id", get(get_file).put(update_file).delete(delete_file))
}

#[instrument(skip(state))]
pub async fn list_files(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(folder_id): PathParam<Uuid>,
) -> AppResult<Json<Vec<File>>> {
    Ok(Json(
        services::list_files(state.store.as_ref(), user.id, folder_id).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_file(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(folder_id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<CreateFileRequest>,
) -> AppResult<(StatusCode, Json<File>)> {
    let file = services::create_file(state.store.as_ref(), user.id, folder_id, payload).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

#[instrument(skip(state))]
pub async fn get_file(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<File>> {
    Ok(Json(services::get_file(state.store.as_ref(), user.id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_file(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateFileRequest>,
) -> AppResult<Json<File>> {
    Ok(Json(
        services::update_file(state.store.as_ref(), user.id, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_file(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Value>> {
    services::delete_file(state.store.as_ref(), user.id, id).await?;
    Ok(Json(json!({ "message": "File deleted successfully." })))
}
