//! `SQLite` implementation of [`RobotRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use robohub_app::ports::RobotRepository;
use robohub_domain::error::{ConflictError, NotFoundError, RoboHubError};
use robohub_domain::id::{RepoId, RobotId};
use robohub_domain::robot::{Permission, Robot};

use crate::error::StorageError;

struct Wrapper(Robot);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Robot> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let repo_id: String = row.try_get("repo_id")?;
        let name: String = row.try_get("name")?;
        let permission: String = row.try_get("permission")?;
        let is_default: bool = row.try_get("is_default")?;
        let prompt_default: Option<String> = row.try_get("prompt_default")?;
        let created_at: String = row.try_get("created_at")?;

        let id = RobotId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let repo_id =
            RepoId::from_str(&repo_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let permission = Permission::from_str(&permission)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.to_utc())
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Robot {
            id,
            repo_id,
            name,
            permission,
            is_default,
            prompt_default,
            created_at,
        }))
    }
}

/// `SQLite`-backed robot repository.
pub struct SqliteRobotRepository {
    pool: SqlitePool,
}

impl SqliteRobotRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn default_conflict(robot_id: RobotId, err: sqlx::Error) -> RoboHubError {
    if err
        .as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
    {
        ConflictError {
            entity: "Robot",
            id: robot_id.to_string(),
        }
        .into()
    } else {
        StorageError::from(err).into()
    }
}

impl RobotRepository for SqliteRobotRepository {
    async fn create(&self, robot: Robot) -> Result<Robot, RoboHubError> {
        sqlx::query(
                "INSERT INTO robots (id, repo_id, name, permission, is_default, prompt_default, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(robot.id.to_string())
            .bind(robot.repo_id.to_string())
            .bind(&robot.name)
            .bind(robot.permission.as_str())
            .bind(robot.is_default)
            .bind(&robot.prompt_default)
            .bind(robot.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|err| default_conflict(robot.id, err))?;

        Ok(robot)
    }

    async fn get_by_id(&self, id: RobotId) -> Result<Option<Robot>, RoboHubError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM robots WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn list_by_repo(&self, repo_id: RepoId) -> Result<Vec<Robot>, RoboHubError> {
        let rows: Vec<Wrapper> =
            sqlx::query_as("SELECT * FROM robots WHERE repo_id = ? ORDER BY created_at, name")
                .bind(repo_id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn set_default(&self, repo_id: RepoId, robot_id: RobotId) -> Result<(), RoboHubError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let permission: Option<(String,)> =
            sqlx::query_as("SELECT permission FROM robots WHERE id = ? AND repo_id = ?")
                .bind(robot_id.to_string())
                .bind(repo_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        let Some((permission,)) = permission else {
            return Err(NotFoundError {
                entity: "Robot",
                id: robot_id.to_string(),
            }
            .into());
        };

        sqlx::query(
            "UPDATE robots SET is_default = 0 WHERE repo_id = ? AND permission = ? AND is_default = 1",
        )
        .bind(repo_id.to_string())
        .bind(&permission)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from)?;

        sqlx::query("UPDATE robots SET is_default = 1 WHERE id = ?")
            .bind(robot_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|err| default_conflict(robot_id, err))?;

        // A concurrent promotion in the same group surfaces here as a
        // unique-index violation on the losing side.
        tx.commit()
            .await
            .map_err(|err| default_conflict(robot_id, err))?;
        Ok(())
    }
}
