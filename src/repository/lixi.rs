//! SeaORM-backed lixi configuration repository.
//!
//! The active flag is only ever flipped by [`LixiRepository::set_active`],
//! which clears the current holder before setting the target inside one
//! database transaction. Clearing first keeps every intermediate statement
//! within the partial unique index on `is_active`.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::{debug, info};

use super::{LixiRepository, active_delete_conflict};
use crate::{
    entities::lixi_config,
    errors::{Error, Result},
    models::{LixiConfig, NewLixiConfig},
};

const NOT_FOUND: Error = Error::NotFound {
    entity: "lixi config",
};

/// Lixi configuration repository over a pooled database connection.
#[derive(Clone, Debug)]
pub struct SeaLixiRepository {
    db: DatabaseConnection,
}

impl SeaLixiRepository {
    /// Creates a repository that checks connections out of `db` per operation.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LixiRepository for SeaLixiRepository {
    async fn create(&self, config: NewLixiConfig) -> Result<LixiConfig> {
        let envelopes = serde_json::to_string(&config.envelopes)?;

        let row = lixi_config::ActiveModel {
            name: Set(config.name),
            envelopes: Set(envelopes),
            is_active: Set(config.is_active),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        LixiConfig::from_entity(row)
    }

    async fn get_by_id(&self, id: i64) -> Result<LixiConfig> {
        let row = lixi_config::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(NOT_FOUND)?;
        LixiConfig::from_entity(row)
    }

    async fn get_active(&self) -> Result<LixiConfig> {
        // The unique index guarantees at most one match
        let row = lixi_config::Entity::find()
            .filter(lixi_config::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(Error::NotFound {
                entity: "active lixi config",
            })?;
        LixiConfig::from_entity(row)
    }

    async fn get_all(&self) -> Result<Vec<LixiConfig>> {
        lixi_config::Entity::find()
            .order_by_desc(lixi_config::Column::CreatedAt)
            .order_by_desc(lixi_config::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(LixiConfig::from_entity)
            .collect()
    }

    async fn update(&self, config: &LixiConfig) -> Result<()> {
        let envelopes = serde_json::to_string(&config.envelopes)?;

        let result = lixi_config::Entity::update_many()
            .col_expr(lixi_config::Column::Name, Expr::value(config.name.clone()))
            .col_expr(lixi_config::Column::Envelopes, Expr::value(envelopes))
            .filter(lixi_config::Column::Id.eq(config.id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(NOT_FOUND);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = lixi_config::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(NOT_FOUND);
        }
        Ok(())
    }

    async fn delete_inactive(&self, id: i64) -> Result<()> {
        // Single statement, so the active check and the delete cannot interleave
        // with an activation
        let result = lixi_config::Entity::delete_many()
            .filter(lixi_config::Column::Id.eq(id))
            .filter(lixi_config::Column::IsActive.eq(false))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return match lixi_config::Entity::find_by_id(id).one(&self.db).await? {
                Some(_) => Err(active_delete_conflict()),
                None => Err(NOT_FOUND),
            };
        }
        Ok(())
    }

    async fn set_active(&self, id: i64) -> Result<()> {
        let txn = self.db.begin().await?;

        let deactivated = match switch_active(&txn, id).await {
            Ok(deactivated) => deactivated,
            Err(err) => {
                // The clear must not survive a missing target
                txn.rollback().await?;
                debug!(config_id = id, "activation rolled back: {err}");
                return Err(err);
            }
        };

        txn.commit().await?;
        info!(config_id = id, deactivated, "lixi config activated");
        Ok(())
    }
}

/// Clears the current holder and activates `id` inside `txn`.
///
/// Returns the number of rows deactivated. Nothing is visible to other
/// connections until the caller commits; dropping `txn` instead rolls back.
async fn switch_active(txn: &DatabaseTransaction, id: i64) -> Result<u64> {
    // Under read committed a concurrent activation's freshly committed row
    // is invisible to our clear; serialize activations on Postgres.
    if txn.get_database_backend() == DatabaseBackend::Postgres {
        txn.execute_unprepared("LOCK TABLE lixi_configs IN SHARE ROW EXCLUSIVE MODE")
            .await?;
    }

    let cleared = lixi_config::Entity::update_many()
        .col_expr(lixi_config::Column::IsActive, Expr::value(false))
        .filter(lixi_config::Column::IsActive.eq(true))
        .exec(txn)
        .await?;

    let activated = lixi_config::Entity::update_many()
        .col_expr(lixi_config::Column::IsActive, Expr::value(true))
        .filter(lixi_config::Column::Id.eq(id))
        .exec(txn)
        .await?;

    if activated.rows_affected == 0 {
        return Err(NOT_FOUND);
    }
    Ok(cleared.rows_affected)
}
