//! Lixi configuration business logic - validation gate in front of the repository.
//!
//! Every configuration that is created or updated holds exactly
//! [`ENVELOPE_COUNT`] envelopes with non-empty text and a positive weight.
//! Positions are always reassigned from list order here, so client-supplied
//! positions never reach the store. The service holds no state of its own;
//! every call re-reads from the repository.

use std::sync::Arc;

use tracing::info;

use crate::{
    errors::{Error, Result},
    models::{ENVELOPE_COUNT, Envelope, LixiConfig, NewLixiConfig},
    repository::LixiRepository,
};

/// Validates envelopes and assigns positions 1..=12 in input order.
///
/// # Errors
/// Returns [`Error::Validation`] if the count is not [`ENVELOPE_COUNT`], or if
/// any envelope has an empty amount, an empty message or a non-positive weight.
pub fn prepare_envelopes(mut envelopes: Vec<Envelope>) -> Result<Vec<Envelope>> {
    if envelopes.len() != ENVELOPE_COUNT {
        return Err(Error::validation(format!(
            "exactly {ENVELOPE_COUNT} envelopes are required"
        )));
    }

    for (index, envelope) in envelopes.iter_mut().enumerate() {
        if envelope.amount.trim().is_empty() {
            return Err(Error::validation("amount is required for all envelopes"));
        }
        if envelope.message.trim().is_empty() {
            return Err(Error::validation("message is required for all envelopes"));
        }
        // NaN fails this check too
        if !(envelope.weight > 0.0 && envelope.weight.is_finite()) {
            return Err(Error::validation(
                "weight must be greater than 0 for all envelopes",
            ));
        }
        // index < ENVELOPE_COUNT, so this always fits
        envelope.position = u8::try_from(index + 1).unwrap_or(u8::MAX);
    }

    Ok(envelopes)
}

/// Configuration service; policy on top of a [`LixiRepository`].
#[derive(Clone)]
pub struct LixiService {
    repo: Arc<dyn LixiRepository>,
}

impl LixiService {
    /// Creates the service over `repo`.
    #[must_use]
    pub fn new(repo: Arc<dyn LixiRepository>) -> Self {
        Self { repo }
    }

    /// Creates an inactive configuration after validating it.
    pub async fn create_config(&self, name: &str, envelopes: Vec<Envelope>) -> Result<LixiConfig> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("name is required"));
        }
        let envelopes = prepare_envelopes(envelopes)?;

        let config = self
            .repo
            .create(NewLixiConfig {
                name: name.to_string(),
                envelopes,
                is_active: false,
            })
            .await?;

        info!(config_id = config.id, name = %config.name, "lixi config created");
        Ok(config)
    }

    /// Looks up a single configuration.
    pub async fn get_config(&self, id: i64) -> Result<LixiConfig> {
        self.repo.get_by_id(id).await
    }

    /// The active configuration; `NotFound` before the first activation.
    pub async fn get_active_config(&self) -> Result<LixiConfig> {
        self.repo.get_active().await
    }

    /// All configurations, newest first.
    pub async fn get_all_configs(&self) -> Result<Vec<LixiConfig>> {
        self.repo.get_all().await
    }

    /// Updates name and/or envelopes.
    ///
    /// An empty `name` or an empty `envelopes` list leaves that field unchanged.
    /// A non-empty envelope list must be complete; it replaces the stored list.
    pub async fn update_config(
        &self,
        id: i64,
        name: &str,
        envelopes: Vec<Envelope>,
    ) -> Result<LixiConfig> {
        let mut config = self.repo.get_by_id(id).await?;

        let name = name.trim();
        if !name.is_empty() {
            config.name = name.to_string();
        }
        if !envelopes.is_empty() {
            config.envelopes = prepare_envelopes(envelopes)?;
        }

        self.repo.update(&config).await?;
        info!(config_id = id, "lixi config updated");
        Ok(config)
    }

    /// Deletes an inactive configuration.
    ///
    /// # Errors
    /// [`Error::Conflict`] if the configuration is currently active.
    pub async fn delete_config(&self, id: i64) -> Result<()> {
        self.repo.delete_inactive(id).await?;
        info!(config_id = id, "lixi config deleted");
        Ok(())
    }

    /// Makes `id` the single active configuration.
    pub async fn set_active_config(&self, id: i64) -> Result<()> {
        // Clean NotFound up front; the repository re-checks inside its transaction
        self.repo.get_by_id(id).await?;
        self.repo.set_active(id).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::repository::{InMemoryLixiRepository, SeaLixiRepository};
    use crate::test_utils::*;

    fn memory_service() -> LixiService {
        LixiService::new(Arc::new(InMemoryLixiRepository::new()))
    }

    async fn active_count(service: &LixiService) -> Result<usize> {
        Ok(service
            .get_all_configs()
            .await?
            .iter()
            .filter(|c| c.is_active)
            .count())
    }

    #[tokio::test]
    async fn test_create_config_rejects_wrong_envelope_count() {
        let service = memory_service();

        for count in [0, 11, 13] {
            let mut envelopes = sample_envelopes();
            envelopes.resize(count, sample_envelope("10K"));
            let result = service.create_config("Tet2025", envelopes).await;
            assert!(
                matches!(result, Err(Error::Validation { .. })),
                "count {count} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_create_config_rejects_bad_fields() {
        let service = memory_service();

        let result = service.create_config("  ", sample_envelopes()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut envelopes = sample_envelopes();
        envelopes[3].amount = String::new();
        let result = service.create_config("Tet", envelopes).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut envelopes = sample_envelopes();
        envelopes[5].message = String::new();
        let result = service.create_config("Tet", envelopes).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        for weight in [0.0, -1.0, f64::NAN] {
            let mut envelopes = sample_envelopes();
            envelopes[11].weight = weight;
            let result = service.create_config("Tet", envelopes).await;
            assert!(matches!(result, Err(Error::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_create_config_assigns_positions() -> Result<()> {
        let service = memory_service();
        let mut envelopes = sample_envelopes();
        for envelope in &mut envelopes {
            envelope.position = 99;
        }
        envelopes[0].amount = "first".to_string();
        envelopes[11].amount = "last".to_string();

        let config = service.create_config("Tet2025", envelopes).await?;

        let positions: Vec<u8> = config.envelopes.iter().map(|e| e.position).collect();
        assert_eq!(positions, (1..=12).collect::<Vec<u8>>());
        assert_eq!(config.envelopes[0].amount, "first");
        assert_eq!(config.envelopes[11].amount, "last");
        assert!(!config.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_config_leaves_empty_fields_unchanged() -> Result<()> {
        let service = memory_service();
        let created = service.create_config("Tet2025", sample_envelopes()).await?;

        let renamed = service.update_config(created.id, "Tet 2025", Vec::new()).await?;
        assert_eq!(renamed.name, "Tet 2025");
        assert_eq!(renamed.envelopes, created.envelopes);

        let mut envelopes = sample_envelopes();
        envelopes.reverse();
        envelopes[0].amount = "2 Million".to_string();
        let replaced = service.update_config(created.id, "", envelopes).await?;
        assert_eq!(replaced.name, "Tet 2025");
        assert_eq!(replaced.envelopes[0].amount, "2 Million");
        assert_eq!(replaced.envelopes[0].position, 1);

        let stored = service.get_config(created.id).await?;
        assert_eq!(stored, replaced);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_config_rejects_partial_envelopes() -> Result<()> {
        let service = memory_service();
        let created = service.create_config("Tet2025", sample_envelopes()).await?;

        let result = service
            .update_config(created.id, "New", vec![sample_envelope("1K")])
            .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // Nothing was written
        assert_eq!(service.get_config(created.id).await?.name, "Tet2025");

        let missing = service.update_config(999, "x", Vec::new()).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_config_conflict_and_success() -> Result<()> {
        let service = memory_service();
        let active = service.create_config("Active", sample_envelopes()).await?;
        let inactive = service.create_config("Inactive", sample_envelopes()).await?;
        service.set_active_config(active.id).await?;

        let result = service.delete_config(active.id).await;
        assert!(matches!(result, Err(Error::Conflict { .. })));

        service.delete_config(inactive.id).await?;
        assert!(matches!(
            service.get_config(inactive.id).await,
            Err(Error::NotFound { .. })
        ));

        assert!(matches!(
            service.delete_config(inactive.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_active_missing_config() -> Result<()> {
        let service = memory_service();
        let c1 = service.create_config("A", sample_envelopes()).await?;
        service.set_active_config(c1.id).await?;

        let result = service.set_active_config(404).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(service.get_active_config().await?.id, c1.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_active_before_first_activation() {
        let service = memory_service();
        assert!(matches!(
            service.get_active_config().await,
            Err(Error::NotFound { .. })
        ));
    }

    /// Full lifecycle against the database-backed repository.
    #[tokio::test]
    async fn test_activation_lifecycle_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let service = LixiService::new(Arc::new(SeaLixiRepository::new(db)));

        let c1 = service.create_config("Tet2025", sample_envelopes()).await?;
        service.set_active_config(c1.id).await?;
        assert_eq!(service.get_active_config().await?.id, c1.id);

        let c2 = service.create_config("Tet2026", sample_envelopes()).await?;
        service.set_active_config(c2.id).await?;
        assert_eq!(service.get_active_config().await?.id, c2.id);
        assert!(!service.get_config(c1.id).await?.is_active);
        assert_eq!(active_count(&service).await?, 1);

        let all = service.get_all_configs().await?;
        assert_eq!(all[0].id, c2.id);
        assert_eq!(all[1].id, c1.id);

        assert!(matches!(
            service.delete_config(c2.id).await,
            Err(Error::Conflict { .. })
        ));
        service.set_active_config(c1.id).await?;
        service.delete_config(c2.id).await?;

        assert_eq!(service.get_active_config().await?.id, c1.id);
        assert_eq!(service.get_all_configs().await?.len(), 1);
        Ok(())
    }
}
