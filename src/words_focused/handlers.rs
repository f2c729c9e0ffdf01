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
    dto::{CreateWordRequest, UpdateWordRequest},
    repo_types::WordFocused,
    services,
};
use crate::{
    auth::AuthUser,
    error::AppResult,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn word_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/wordsFocused/metadata/:metadata_id",
            get(list_words).post(create_word),
        )
        .route(
            "/wordsFocused/:id",
            get(get_word).put(update_word).delete(delete_word),
        )
}

#[instrument(skip(state))]
pub async fn list_words(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(metadata_id): PathParam<Uuid>,
) -> AppResult<Json<Vec<WordFocused>>> {
    Ok(Json(
        services::list_words(state.store.as_ref(), user.id, metadata_id).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_word(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(metadata_id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<CreateWordRequest>,
) -> AppResult<(StatusCode, Json<WordFocused>)> {
    let word = services::create_word(state.store.as_ref(), user.id, metadata_id, payload).await?;
    Ok((StatusCode::CREATED, Json(word)))
}

#[instrument(skip(state))]
pub async fn get_word(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<WordFocused>> {
    Ok(Json(services::get_word(state.store.as_ref(), user.id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_word(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateWordRequest>,
) -> AppResult<Json<WordFocused>> {
    Ok(Json(
        services::update_word(state.store.as_ref(), user.id, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_word(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Value>> {
    services::delete_word(state.store.as_ref(), user.id, id).await?;
    Ok(Json(json!({ "message": "Word focused deleted successfully." })))
}
