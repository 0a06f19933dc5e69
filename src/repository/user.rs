//! SeaORM-backed user accounts.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use super::UserRepository;
use crate::{
    entities::user,
    errors::{Error, Result},
    models::User,
};

/// User repository over a pooled database connection.
#[derive(Clone, Debug)]
pub struct SeaUserRepository {
    db: DatabaseConnection,
}

impl SeaUserRepository {
    /// Creates a repository over `db`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaUserRepository {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User> {
        let now = chrono::Utc::now();
        let inserted = user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(row) => Ok(row.into()),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(Error::Conflict {
                    message: "user already exists".to_string(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::from)
            .ok_or(Error::NotFound { entity: "user" })
    }
}
