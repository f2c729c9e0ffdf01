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
    dto::{CreateDayTestRequest, UpdateDayTestRequest},
    repo_types::DayTest,
    services,
};
use crate::{
    auth::AuthUser,
    error::AppResult,
    extract::{JsonBody, PathParam},
    state::AppState,
};

pub fn day_test_routes() -> Router<AppState> {
    Router::new()
        .route("/dayTests", get(list_day_tests).post(create_day_test))
        .route(
            "/dayTests/:id",
            get(get_day_test).put(update_day_test).delete(delete_day_test),
        )
}

#[instrument(skip(state))]
pub async fn list_day_tests(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<DayTest>>> {
    Ok(Json(
        services::list_day_tests(state.store.as_ref(), user.id).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_day_test(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateDayTestRequest>,
) -> AppResult<(StatusCode, Json<DayTest>)> {
    let day_test = services::create_day_test(state.store.as_ref(), user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(day_test)))
}

#[instrument(skip(state))]
pub async fn get_day_test(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<DayTest>> {
    Ok(Json(services::get_day_test(state.store.as_ref(), user.id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_day_test(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
    JsonBody(payload): JsonBody<UpdateDayTestRequest>,
) -> AppResult<Json<DayTest>> {
    Ok(Json(
        services::update_day_test(state.store.as_ref(), user.id, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_day_test(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> AppResult<Json<Value>> {
    services::delete_day_test(state.store.as_ref(), user.id, id).await?;
    Ok(Json(json!({ "message": "Day test deleted successfully." })))
}
