//! Shared test utilities for `LixiBuddy`.
//!
//! Helpers for setting up test databases and building valid envelope sets.

use crate::{errors::Result, models::Envelope};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A valid envelope with the given display amount.
///
/// # Defaults
/// * `position`: 0 (assigned on create)
/// * `message`: "Chuc mung nam moi"
/// * `weight`: 1.0
pub fn sample_envelope(amount: &str) -> Envelope {
    Envelope {
        position: 0,
        amount: amount.to_string(),
        message: "Chuc mung nam moi".to_string(),
        weight: 1.0,
    }
}

/// Twelve valid envelopes with increasing amounts and weights.
pub fn sample_envelopes() -> Vec<Envelope> {
    (1..=12_u32)
        .map(|i| Envelope {
            weight: f64::from(i),
            ..sample_envelope(&format!("{}K", i * 10))
        })
        .collect()
}

/// Cheapest bcrypt work factor, so auth tests stay fast.
pub const TEST_BCRYPT_COST: u32 = 4;
