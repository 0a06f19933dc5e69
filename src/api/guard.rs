//! Bearer-token gate for `/api/admin/*`, enabled by `ADMIN_AUTH_REQUIRED=true`.
//!
//! Off by default: the admin routes are open unless an operator opts in.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::AppState;
use crate::errors::{Error, Result};

/// Rejects the request with 401 unless it carries a valid `Authorization: Bearer` token.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| Error::Auth {
            message: "missing bearer token".to_string(),
        })?;

    let claims = state.auth.verify_token(token.trim())?;
    debug!(user_id = %claims.sub, "admin request authorized");
    Ok(next.run(request).await)
}
