//! Lixi endpoints.
//!
//! Public: the active configuration and greeting submission.
//! Admin (`/api/admin/lixi...`): configuration CRUD, activation and the greeting log.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{AppState, json_body, parse_id};
use crate::{
    errors::Result,
    models::{Envelope, Greeting, LixiConfig, NewGreeting},
};

/// Body of `POST /api/admin/lixi` and `PUT /api/admin/lixi/{id}`.
///
/// For updates an empty or absent field means "leave unchanged".
#[derive(Debug, Default, Deserialize)]
pub struct ConfigRequest {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Exactly 12 envelopes when present
    #[serde(default)]
    pub envelopes: Vec<Envelope>,
}

/// `GET /api/lixi/active`
pub async fn get_active(State(state): State<AppState>) -> Result<Json<LixiConfig>> {
    state.lixi.get_active_config().await.map(Json)
}

/// `POST /api/lixi/greeting`
pub async fn submit_greeting(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewGreeting>, JsonRejection>,
) -> Result<(StatusCode, Json<Greeting>)> {
    let greeting = state.greetings.submit(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(greeting)))
}

/// `GET /api/admin/lixi` - newest first, `[]` when empty.
pub async fn list_configs(State(state): State<AppState>) -> Result<Json<Vec<LixiConfig>>> {
    state.lixi.get_all_configs().await.map(Json)
}

/// `POST /api/admin/lixi`
pub async fn create_config(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ConfigRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LixiConfig>)> {
    let request = json_body(payload)?;
    let config = state
        .lixi
        .create_config(&request.name, request.envelopes)
        .await?;
    Ok((StatusCode::CREATED, Json(config)))
}

/// `PUT /api/admin/lixi/{id}`
pub async fn update_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ConfigRequest>, JsonRejection>,
) -> Result<Json<LixiConfig>> {
    let id = parse_id(&id)?;
    let request = json_body(payload)?;
    state
        .lixi
        .update_config(id, &request.name, request.envelopes)
        .await
        .map(Json)
}

/// `DELETE /api/admin/lixi/{id}` - refuses the active configuration.
pub async fn delete_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.lixi.delete_config(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/admin/lixi/{id}/activate`
pub async fn activate_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.lixi.set_active_config(parse_id(&id)?).await?;
    Ok(Json(json!({ "message": "Config activated successfully" })))
}

/// `GET /api/admin/lixi/greetings`
pub async fn list_greetings(State(state): State<AppState>) -> Result<Json<Vec<Greeting>>> {
    state.greetings.list_all().await.map(Json)
}
