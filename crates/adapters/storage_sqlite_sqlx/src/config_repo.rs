//! `SQLite` implementation of [`AutomationConfigRepository`].

use sqlx::SqlitePool;

use robohub_app::ports::AutomationConfigRepository;
use robohub_domain::error::RoboHubError;
use robohub_domain::id::RepoId;

use crate::error::StorageError;

/// `SQLite`-backed automation config repository.
///
/// The config column holds the JSON blob verbatim. Interpretation,
/// including version migration, belongs to the domain normalizer on load.
pub struct SqliteAutomationConfigRepository {
    pool: SqlitePool,
}

impl SqliteAutomationConfigRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AutomationConfigRepository for SqliteAutomationConfigRepository {
    async fn load(&self, repo_id: RepoId) -> Result<Option<serde_json::Value>, RoboHubError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT config FROM automation_configs WHERE repo_id = ?")
                .bind(repo_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::from)?;
        row.map(|(json,)| serde_json::from_str(&json).map_err(StorageError::from))
            .transpose()
            .map_err(RoboHubError::from)
    }

    async fn save(&self, repo_id: RepoId, config: serde_json::Value) -> Result<(), RoboHubError> {
        let json = serde_json::to_string(&config).map_err(StorageError::from)?;
        sqlx::query(
            "INSERT INTO automation_configs (repo_id, config, updated_at) VALUES (?, ?, ?)
             ON CONFLICT (repo_id) DO UPDATE SET config = excluded.config, updated_at = excluded.updated_at",
        )
        .bind(repo_id.to_string())
        .bind(&json)
        .bind(robohub_domain::time::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(())
    }
}
