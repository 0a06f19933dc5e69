//! Registration and login endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::{AppState, json_body};
use crate::{errors::Result, models::User};

/// Body of `POST /register` and `POST /login`.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Account email
    #[serde(default)]
    pub email: String,
    /// Plain-text password, hashed before storage
    #[serde(default)]
    pub password: String,
}

/// Body of a successful `POST /login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// HS256 bearer token
    pub token: String,
    /// The authenticated account
    pub user: User,
}

/// `POST /register` - creates an account.
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let credentials = json_body(payload)?;
    let user = state
        .auth
        .register(&credentials.email, &credentials.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /login` - exchanges credentials for a token.
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let credentials = json_body(payload)?;
    let (user, token) = state
        .auth
        .login(&credentials.email, &credentials.password)
        .await?;
    Ok(Json(LoginResponse { token, user }))
}
