//! Default lixi configuration loading from a TOML seed file.
//!
//! On first start, when no configuration exists yet, the envelopes defined in
//! the seed file are created through the normal service validation and the
//! result is activated, so the public endpoint has something to serve.

use crate::{
    core::lixi::LixiService,
    errors::{Error, Result},
    models::{Envelope, LixiConfig},
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Structure of the whole seed file
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Display name of the configuration
    pub name: String,
    /// Envelope definitions, in position order
    pub envelopes: Vec<SeedEnvelope>,
}

/// A single envelope in the seed file
#[derive(Debug, Deserialize, Clone)]
pub struct SeedEnvelope {
    /// Display amount, e.g. "100K"
    pub amount: String,
    /// Display message
    pub message: String,
    /// Relative weight
    pub weight: f64,
}

impl From<SeedEnvelope> for Envelope {
    fn from(seed: SeedEnvelope) -> Self {
        Self {
            position: 0,
            amount: seed.amount,
            message: seed.message,
            weight: seed.weight,
        }
    }
}

/// Loads a seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Creates and activates `seed` if the store holds no configuration yet.
///
/// Returns the created configuration, or `None` when the store was not empty.
pub async fn apply_seed(service: &LixiService, seed: SeedConfig) -> Result<Option<LixiConfig>> {
    if !service.get_all_configs().await?.is_empty() {
        return Ok(None);
    }

    let envelopes = seed.envelopes.into_iter().map(Envelope::from).collect();
    let config = service.create_config(&seed.name, envelopes).await?;
    service.set_active_config(config.id).await?;
    info!(config_id = config.id, "seeded default lixi config");

    service.get_config(config.id).await.map(Some)
}
