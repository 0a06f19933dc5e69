//! Domain value types exchanged between the API, the services and the repositories.
//!
//! These are decoupled from the SeaORM entities so that repository
//! implementations (database-backed or in-memory) are interchangeable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities;
use crate::errors::Result;

/// Number of envelopes every configuration holds.
pub const ENVELOPE_COUNT: usize = 12;

/// One weighted prize slot inside a configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// 1-based slot, assigned by the service from list order; `id` on the wire
    #[serde(default, rename = "id", alias = "position")]
    pub position: u8,
    /// Display amount, e.g. "100K"
    #[serde(default)]
    pub amount: String,
    /// Display message
    #[serde(default)]
    pub message: String,
    /// Relative probability mass; must be positive. `rate` on the wire
    #[serde(default, rename = "rate", alias = "weight")]
    pub weight: f64,
}

/// A named set of envelopes, at most one of which is active at any time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LixiConfig {
    /// Store-assigned id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Exactly 12 envelopes, positions 1..=12
    pub envelopes: Vec<Envelope>,
    /// At most one configuration is active
    pub is_active: bool,
    /// Set once on insert
    pub created_at: DateTime<Utc>,
}

/// Input for [`crate::repository::LixiRepository::create`].
#[derive(Clone, Debug, PartialEq)]
pub struct NewLixiConfig {
    /// Display name
    pub name: String,
    /// Validated envelopes with positions assigned
    pub envelopes: Vec<Envelope>,
    /// Initial active flag
    pub is_active: bool,
}

/// A public greeting submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    /// Store-assigned id
    pub id: i64,
    /// Sender name
    pub name: String,
    /// Amount the sender received
    pub amount: String,
    /// Greeting text
    pub message: String,
    /// Optional image (URL or data URI), may be empty
    pub image: String,
    /// Set once on insert
    pub created_at: DateTime<Utc>,
}

/// Input for [`crate::repository::GreetingRepository::create`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NewGreeting {
    /// Sender name
    #[serde(default)]
    pub name: String,
    /// Amount the sender received
    #[serde(default)]
    pub amount: String,
    /// Greeting text
    #[serde(default)]
    pub message: String,
    /// Optional image
    #[serde(default)]
    pub image: String,
}

/// A registered account. The password digest is never serialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    /// Store-assigned id
    pub id: i64,
    /// Unique login email
    pub email: String,
    /// bcrypt digest
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Set once on insert
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
}

impl LixiConfig {
    /// Builds a domain configuration from its row, decoding the envelope column.
    pub fn from_entity(model: entities::lixi_config::Model) -> Result<Self> {
        let envelopes: Vec<Envelope> = serde_json::from_str(&model.envelopes)?;
        Ok(Self {
            id: model.id,
            name: model.name,
            envelopes,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}

impl From<entities::lixi_greeting::Model> for Greeting {
    fn from(model: entities::lixi_greeting::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            amount: model.amount,
            message: model.message,
            image: model.image,
            created_at: model.created_at,
        }
    }
}

impl From<entities::user::Model> for User {
    fn from(model: entities::user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
