//! Automation config service — use-cases for the per-repo config editor.

use robohub_domain::automation::{AutomationEventConfig, AutomationRule, RepoAutomationConfig};
use robohub_domain::error::RoboHubError;
use robohub_domain::facts::EventKey;
use robohub_domain::id::RepoId;

use crate::ports::AutomationConfigRepository;

/// Application service for reading and editing automation config.
///
/// Every read path runs the stored JSON through
/// [`RepoAutomationConfig::normalize`], and every write persists the
/// canonical shape, so old-version configs are migrated on their first
/// save and malformed rows heal themselves.
pub struct AutomationConfigService<R> {
    repo: R,
}

impl<R: AutomationConfigRepository> AutomationConfigService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Load a repository's config, normalized. Repositories without a
    /// stored config get the default.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_config(&self, repo_id: RepoId) -> Result<RepoAutomationConfig, RoboHubError> {
        let stored = self
            .repo
            .load(repo_id)
            .await?
            .unwrap_or(serde_json::Value::Null);
        Ok(RepoAutomationConfig::normalize(&stored))
    }

    /// Replace a repository's config with the normalized form of `input`.
    ///
    /// Accepts any vintage the normalizer accepts, so an editor holding a
    /// version-1 document can save it directly. Returns the canonical
    /// config that was persisted.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, input))]
    pub async fn put_config(
        &self,
        repo_id: RepoId,
        input: serde_json::Value,
    ) -> Result<RepoAutomationConfig, RoboHubError> {
        let config = RepoAutomationConfig::normalize(&input);
        self.save(repo_id, &config).await?;
        Ok(config)
    }

    /// Replace one event bucket, leaving the others untouched.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, bucket), fields(event = %key))]
    pub async fn set_event_config(
        &self,
        repo_id: RepoId,
        key: EventKey,
        bucket: AutomationEventConfig,
    ) -> Result<RepoAutomationConfig, RoboHubError> {
        let config = self.get_config(repo_id).await?.with_event_config(key, bucket);
        self.save(repo_id, &config).await?;
        Ok(config)
    }

    /// Insert or replace a rule in the given event bucket.
    ///
    /// # Errors
    ///
    /// Returns [`RoboHubError::Validation`] if the rule breaks editor
    /// invariants, or a storage error from the repository.
    #[tracing::instrument(skip(self, rule), fields(event = %key, rule_id = %rule.id))]
    pub async fn upsert_rule(
        &self,
        repo_id: RepoId,
        key: EventKey,
        rule: AutomationRule,
    ) -> Result<RepoAutomationConfig, RoboHubError> {
        rule.validate()?;
        let config = self.get_config(repo_id).await?.upsert_rule(key, rule);
        self.save(repo_id, &config).await?;
        Ok(config)
    }

    /// Remove a rule from the given event bucket; unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn remove_rule(
        &self,
        repo_id: RepoId,
        key: EventKey,
        rule_id: &str,
    ) -> Result<RepoAutomationConfig, RoboHubError> {
        let config = self.get_config(repo_id).await?.remove_rule(key, rule_id);
        self.save(repo_id, &config).await?;
        Ok(config)
    }

    async fn save(
        &self,
        repo_id: RepoId,
        config: &RepoAutomationConfig,
    ) -> Result<(), RoboHubError> {
        let value =
            serde_json::to_value(config).map_err(|err| RoboHubError::Storage(Box::new(err)))?;
        self.repo.save(repo_id, value).await
    }
}
