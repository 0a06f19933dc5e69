//! SeaORM-backed greeting log. Insert and list only; greetings are never
//! updated or deleted.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::GreetingRepository;
use crate::{
    entities::lixi_greeting,
    errors::Result,
    models::{Greeting, NewGreeting},
};

/// Greeting repository over a pooled database connection.
#[derive(Clone, Debug)]
pub struct SeaGreetingRepository {
    db: DatabaseConnection,
}

impl SeaGreetingRepository {
    /// Creates a repository over `db`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GreetingRepository for SeaGreetingRepository {
    async fn create(&self, greeting: NewGreeting) -> Result<Greeting> {
        let row = lixi_greeting::ActiveModel {
            name: Set(greeting.name),
            amount: Set(greeting.amount),
            message: Set(greeting.message),
            image: Set(greeting.image),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn get_all(&self) -> Result<Vec<Greeting>> {
        let rows = lixi_greeting::Entity::find()
            .order_by_desc(lixi_greeting::Column::CreatedAt)
            .order_by_desc(lixi_greeting::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Greeting::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn greeting(name: &str) -> NewGreeting {
        NewGreeting {
            name: name.to_string(),
            amount: "200K".to_string(),
            message: "Happy new year".to_string(),
            image: "https://example.com/card.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_newest_first() -> Result<()> {
        let repo = SeaGreetingRepository::new(setup_test_db().await?);
        assert!(repo.get_all().await?.is_empty());

        let first = repo.create(greeting("Lan")).await?;
        let second = repo.create(greeting("Minh")).await?;
        assert_eq!(first.name, "Lan");
        assert_eq!(first.image, "https://example.com/card.png");

        let all = repo.get_all().await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        Ok(())
    }
}
