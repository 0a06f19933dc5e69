//! Lixi configuration entity - a named set of 12 weighted envelopes.
//!
//! The envelope list is stored as JSON text in a single column and is always
//! replaced as a whole. At most one row may carry `is_active = true`; that is
//! enforced by the partial unique index created in
//! [`crate::config::database::create_tables`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lixi configuration database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lixi_configs")]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g. "Tet 2025")
    pub name: String,
    /// JSON-encoded `Vec<Envelope>`
    #[sea_orm(column_type = "Text")]
    pub envelopes: String,
    /// Whether this is the configuration served to the public
    pub is_active: bool,
    /// Set once on insert
    pub created_at: DateTimeUtc,
}

/// `LixiConfig` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
