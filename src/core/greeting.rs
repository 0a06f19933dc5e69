//! Greeting log - public submissions, independent of lixi configurations.

use std::sync::Arc;

use tracing::info;

use crate::{
    errors::{Error, Result},
    models::{Greeting, NewGreeting},
    repository::GreetingRepository,
};

/// Append-only log of greetings.
#[derive(Clone)]
pub struct GreetingLog {
    repo: Arc<dyn GreetingRepository>,
}

impl GreetingLog {
    /// Creates the log over `repo`.
    #[must_use]
    pub fn new(repo: Arc<dyn GreetingRepository>) -> Self {
        Self { repo }
    }

    /// Records a greeting. `name`, `amount` and `message` are required; `image` may be empty.
    pub async fn submit(&self, greeting: NewGreeting) -> Result<Greeting> {
        for (field, value) in [
            ("name", &greeting.name),
            ("amount", &greeting.amount),
            ("message", &greeting.message),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{field} is required")));
            }
        }

        let greeting = self.repo.create(greeting).await?;
        info!(greeting_id = greeting.id, "greeting submitted");
        Ok(greeting)
    }

    /// All greetings, newest first.
    pub async fn list_all(&self) -> Result<Vec<Greeting>> {
        self.repo.get_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryGreetingRepository;

    fn log() -> GreetingLog {
        GreetingLog::new(Arc::new(InMemoryGreetingRepository::new()))
    }

    #[tokio::test]
    async fn test_submit_requires_fields() {
        let log = log();
        let result = log
            .submit(NewGreeting {
                name: "Lan".to_string(),
                amount: "100K".to_string(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(Error::Validation { message }) if message == "message is required"));
    }

    #[tokio::test]
    async fn test_submit_without_image() -> Result<()> {
        let log = log();
        let greeting = log
            .submit(NewGreeting {
                name: "Lan".to_string(),
                amount: "100K".to_string(),
                message: "Chuc mung nam moi".to_string(),
                image: String::new(),
            })
            .await?;
        assert!(greeting.image.is_empty());
        assert_eq!(log.list_all().await?, vec![greeting]);
        Ok(())
    }
}
