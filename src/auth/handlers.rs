use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AccessToken, LoginRequest, RefreshRequest, TokenPair},
    jwt::JwtKeys,
    services,
};
use crate::{error::AppResult, extract::JsonBody, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users/login", post(login))
        .route("/users/refresh-token", post(refresh))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<TokenPair>> {
    let keys = JwtKeys::from_ref(&state);
    let pair = services::login(
        state.store.as_ref(),
        &keys,
        payload.email.as_deref(),
        payload.password.as_deref(),
    )
    .await?;
    Ok(Json(pair))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> AppResult<Json<AccessToken>> {
    let keys = JwtKeys::from_ref(&state);
    let token = services::refresh(state.store.as_ref(), &keys, payload.refresh_token.as_deref()).await?;
    Ok(Json(token))
}
