//! Greeting entity - append-only log of public greeting submissions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Greeting database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lixi_greetings")]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sender name
    pub name: String,
    /// Envelope amount the sender received, as displayed
    pub amount: String,
    /// Free-form greeting text
    #[sea_orm(column_type = "Text")]
    pub message: String,
    /// Opaque image reference (URL or data URI)
    #[sea_orm(column_type = "Text")]
    pub image: String,
    /// When the greeting was submitted
    pub created_at: DateTimeUtc,
}

/// `LixiGreeting` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
