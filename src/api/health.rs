//! Liveness endpoints. These never touch the database.

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}

/// `GET /`
pub async fn welcome() -> &'static str {
    "Welcome to Lixi Buddy API"
}
