//! Repository layer - persistence contracts and their implementations.
//!
//! Each aggregate has one capability trait. Services hold an
//! `Arc<dyn Trait>`, so the SeaORM-backed implementation used in production
//! and the in-memory implementation used in tests are interchangeable.
//!
//! | Trait | SeaORM | In-memory |
//! |-------|--------|-----------|
//! | [`LixiRepository`] | [`SeaLixiRepository`] | [`InMemoryLixiRepository`] |
//! | [`GreetingRepository`] | [`SeaGreetingRepository`] | [`InMemoryGreetingRepository`] |
//! | [`UserRepository`] | [`SeaUserRepository`] | [`InMemoryUserRepository`] |
//!
//! Repositories are mechanism only. The one state check they own is
//! [`LixiRepository::delete_inactive`], since the test and the delete have to
//! happen atomically.

pub mod greeting;
pub mod lixi;
pub mod memory;
pub mod user;

use async_trait::async_trait;

use crate::errors::{Error, Result};
use crate::models::{Greeting, LixiConfig, NewGreeting, NewLixiConfig, User};

pub use greeting::SeaGreetingRepository;
pub use lixi::SeaLixiRepository;
pub use memory::{InMemoryGreetingRepository, InMemoryLixiRepository, InMemoryUserRepository};
pub use user::SeaUserRepository;

/// Storage contract for lixi configurations.
#[async_trait]
pub trait LixiRepository: Send + Sync {
    /// Inserts a configuration whose envelopes were already validated.
    async fn create(&self, config: NewLixiConfig) -> Result<LixiConfig>;

    /// Fails with `NotFound` if no configuration has this id.
    async fn get_by_id(&self, id: i64) -> Result<LixiConfig>;

    /// The single active configuration, or `NotFound` if none is active.
    async fn get_active(&self) -> Result<LixiConfig>;

    /// All configurations, newest first.
    async fn get_all(&self) -> Result<Vec<LixiConfig>>;

    /// Replaces `name` and `envelopes` of the configuration with `config.id`.
    async fn update(&self, config: &LixiConfig) -> Result<()>;

    /// Removes a configuration regardless of its active flag.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Removes a configuration only if it is not active, in one atomic step.
    ///
    /// Fails with `Conflict` if the row is active and `NotFound` if it does
    /// not exist. An activation racing with this call can never leave the
    /// store without its active configuration.
    async fn delete_inactive(&self, id: i64) -> Result<()>;

    /// Atomically deactivates the current active configuration and activates `id`.
    ///
    /// If `id` does not exist nothing changes and `NotFound` is returned.
    async fn set_active(&self, id: i64) -> Result<()>;
}

/// Error returned when deleting the active configuration.
pub(crate) fn active_delete_conflict() -> Error {
    Error::Conflict {
        message: "cannot delete active config".to_string(),
    }
}

/// Storage contract for the append-only greeting log.
#[async_trait]
pub trait GreetingRepository: Send + Sync {
    /// Appends a greeting; the store assigns id and timestamp.
    async fn create(&self, greeting: NewGreeting) -> Result<Greeting>;

    /// All greetings, newest first.
    async fn get_all(&self) -> Result<Vec<Greeting>>;
}

/// Storage contract for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` if the email is already registered.
    async fn create(&self, email: &str, password_hash: &str) -> Result<User>;

    /// Fails with `NotFound` if no account has this email.
    async fn get_by_email(&self, email: &str) -> Result<User>;
}
