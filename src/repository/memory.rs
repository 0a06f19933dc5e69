//! In-memory repository implementations.
//!
//! Used as test doubles and for running the API without a database. There is
//! no uniqueness constraint to fall back on here, so every lixi mutation runs
//! under one mutex that covers the whole configuration set.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{GreetingRepository, LixiRepository, UserRepository, active_delete_conflict};
use crate::{
    errors::{Error, Result},
    models::{Greeting, LixiConfig, NewGreeting, NewLixiConfig, User},
};

const NOT_FOUND: Error = Error::NotFound {
    entity: "lixi config",
};

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Lixi configurations held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryLixiRepository {
    table: Mutex<Table<LixiConfig>>,
}

impl InMemoryLixiRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LixiRepository for InMemoryLixiRepository {
    async fn create(&self, config: NewLixiConfig) -> Result<LixiConfig> {
        let mut table = self.table.lock().await;
        if config.is_active && table.rows.values().any(|row| row.is_active) {
            return Err(Error::Storage {
                message: "duplicate active lixi config".to_string(),
            });
        }

        let id = table.allocate_id();
        let row = LixiConfig {
            id,
            name: config.name,
            envelopes: config.envelopes,
            is_active: config.is_active,
            created_at: Utc::now(),
        };
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: i64) -> Result<LixiConfig> {
        self.table
            .lock()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(NOT_FOUND)
    }

    async fn get_active(&self) -> Result<LixiConfig> {
        self.table
            .lock()
            .await
            .rows
            .values()
            .find(|row| row.is_active)
            .cloned()
            .ok_or(Error::NotFound {
                entity: "active lixi config",
            })
    }

    async fn get_all(&self) -> Result<Vec<LixiConfig>> {
        let mut rows: Vec<LixiConfig> = self.table.lock().await.rows.values().cloned().collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn update(&self, config: &LixiConfig) -> Result<()> {
        let mut table = self.table.lock().await;
        let row = table.rows.get_mut(&config.id).ok_or(NOT_FOUND)?;
        row.name.clone_from(&config.name);
        row.envelopes.clone_from(&config.envelopes);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.table
            .lock()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(NOT_FOUND)
    }

    async fn delete_inactive(&self, id: i64) -> Result<()> {
        let mut table = self.table.lock().await;
        match table.rows.get(&id) {
            None => Err(NOT_FOUND),
            Some(row) if row.is_active => Err(active_delete_conflict()),
            Some(_) => {
                table.rows.remove(&id);
                Ok(())
            }
        }
    }

    async fn set_active(&self, id: i64) -> Result<()> {
        let mut table = self.table.lock().await;
        if !table.rows.contains_key(&id) {
            return Err(NOT_FOUND);
        }
        for row in table.rows.values_mut() {
            row.is_active = row.id == id;
        }
        Ok(())
    }
}

/// Greeting log held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryGreetingRepository {
    table: Mutex<Table<Greeting>>,
}

impl InMemoryGreetingRepository {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GreetingRepository for InMemoryGreetingRepository {
    async fn create(&self, greeting: NewGreeting) -> Result<Greeting> {
        let mut table = self.table.lock().await;
        let id = table.allocate_id();
        let row = Greeting {
            id,
            name: greeting.name,
            amount: greeting.amount,
            message: greeting.message,
            image: greeting.image,
            created_at: Utc::now(),
        };
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn get_all(&self) -> Result<Vec<Greeting>> {
        let mut rows: Vec<Greeting> = self.table.lock().await.rows.values().cloned().collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }
}

/// User accounts held in process memory, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table<User>>,
}

impl InMemoryUserRepository {
    /// Creates an empty account store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User> {
        let mut table = self.table.lock().await;
        if table.rows.values().any(|user| user.email == email) {
            return Err(Error::Conflict {
                message: "user already exists".to_string(),
            });
        }

        let id = table.allocate_id();
        let now = Utc::now();
        let user = User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        self.table
            .lock()
            .await
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(Error::NotFound { entity: "user" })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use std::sync::Arc;

    use super::*;
    use crate::test_utils::sample_envelopes;

    fn new_config(name: &str) -> NewLixiConfig {
        NewLixiConfig {
            name: name.to_string(),
            envelopes: sample_envelopes(),
            is_active: false,
        }
    }

    #[tokio::test]
    async fn test_set_active_missing_target_keeps_holder() -> Result<()> {
        let repo = InMemoryLixiRepository::new();
        let c1 = repo.create(new_config("A")).await?;
        repo.set_active(c1.id).await?;

        assert!(matches!(
            repo.set_active(42).await,
            Err(Error::NotFound { .. })
        ));
        assert_eq!(repo.get_active().await?.id, c1.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_activations_leave_one_active() -> Result<()> {
        let repo = Arc::new(InMemoryLixiRepository::new());
        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            ids.push(repo.create(new_config(name)).await?.id);
        }

        let handles: Vec<_> = ids
            .iter()
            .cycle()
            .take(30)
            .map(|&id| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.set_active(id).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap()?;
        }

        let active = repo
            .get_all()
            .await?
            .into_iter()
            .filter(|c| c.is_active)
            .count();
        assert_eq!(active, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_inactive_refuses_active_row() -> Result<()> {
        let repo = InMemoryLixiRepository::new();
        let c1 = repo.create(new_config("A")).await?;
        let c2 = repo.create(new_config("B")).await?;
        repo.set_active(c1.id).await?;

        assert!(matches!(
            repo.delete_inactive(c1.id).await,
            Err(Error::Conflict { .. })
        ));
        repo.delete_inactive(c2.id).await?;
        assert!(matches!(
            repo.delete_inactive(c2.id).await,
            Err(Error::NotFound { .. })
        ));
        assert_eq!(repo.get_active().await?.id, c1.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_greetings_newest_first() -> Result<()> {
        let repo = InMemoryGreetingRepository::new();
        let first = repo.create(NewGreeting::default()).await?;
        let second = repo.create(NewGreeting::default()).await?;

        let ids: Vec<i64> = repo.get_all().await?.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_user_is_conflict() -> Result<()> {
        let repo = InMemoryUserRepository::new();
        repo.create("a@b.c", "x").await?;
        assert!(matches!(
            repo.create("a@b.c", "y").await,
            Err(Error::Conflict { .. })
        ));
        Ok(())
    }
}
