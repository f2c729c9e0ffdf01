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
    dto::{CreateSkillRequest, UpdateSkillRequest},
    repo_types::SkillPerformance,
    services,
};
use crate::{
    auth::AuthUser,
    error::AppResult,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn skill_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/skillsPerformance/metadata/:metadata_id",
            get(list_skills).post(create_skill),
        )
        .route(
            "/skillsPerformance/:id",
            get(get_skill).put(update_skill).delete(delete_skill),
        )
}

#[instrument(skip(state))]
pub async fn list_skills(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(metadata_id): PathParam<Uuid>,
) -> AppResult<Json<Vec<SkillPerformance>>> {
    Ok(Json(
        services::list_skills(state.store.as_ref(), user.id, metadata_id).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_skill(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(metadata_id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<CreateSkillRequest>,
) -> AppResult<(StatusCode, Json<SkillPerformance>)> {
    let skill =
        services::create_skill(state.store.as_ref(), user.id, metadata_id, payload).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

#[instrument(skip(state))]
pub async fn get_skill(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<SkillPerformance>> {
    Ok(Json(services::get_skill(state.store.as_ref(), user.id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_skill(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateSkillRequest>,
) -> AppResult<Json<SkillPerformance>> {
    Ok(Json(
        services::update_skill(state.store.as_ref(), user.id, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_skill(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Value>> {
    services::delete_skill(state.store.as_ref(), user.id, id).await?;
    Ok(Json(json!({ "message": "Skill performance deleted successfully." })))
}
