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
    dto::{CreateMetadataRequest, UpdateMetadataRequest},
    repo_types::Metadata,
    services,
};
use crate::{
    auth::AuthUser,
    error::AppResult,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn metadata_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/metadata/file/:file_id",
            get(list_metadata).post(create_metadata),
        )
        .route(
            "/metadata/:id",
            get(get_metadata).put(update_metadata).delete(delete_metadata),
        )
}

#[instrument(skip(state))]
pub async fn list_metadata(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(file_id): PathParam<Uuid>,
) -> AppResult<Json<Vec<Metadata>>> {
    Ok(Json(
        services::list_metadata(state.store.as_ref(), user.id, file_id).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_metadata(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(file_id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<CreateMetadataRequest>,
) -> AppResult<(StatusCode, Json<Metadata>)> {
    let metadata =
        services::create_metadata(state.store.as_ref(), user.id, file_id, payload).await?;
    Ok((StatusCode::CREATED, Json(metadata)))
}

#[instrument(skip(state))]
pub async fn get_metadata(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Metadata>> {
    Ok(Json(services::get_metadata(state.store.as_ref(), user.id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_metadata(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateMetadataRequest>,
) -> AppResult<Json<Metadata>> {
    Ok(Json(
        services::update_metadata(state.store.as_ref(), user.id, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_metadata(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Value>> {
    services::delete_metadata(state.store.as_ref(), user.id, id).await?;
    Ok(Json(json!({ "message": "Metadata deleted successfully." })))
}
