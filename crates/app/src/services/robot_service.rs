//! Robot service — use-cases for the per-repository robot registry.

use robohub_domain::error::{NotFoundError, RoboHubError};
use robohub_domain::id::{RepoId, RobotId};
use robohub_domain::robot::{Permission, Robot};

use crate::ports::RobotRepository;

/// Application service for robot CRUD and default-robot promotion.
pub struct RobotService<R> {
    repo: R,
}

impl<R: RobotRepository> RobotService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new robot after validating domain invariants.
    ///
    /// A robot created with the default flag set goes through the same
    /// promotion path as [`set_default_robot`](Self::set_default_robot),
    /// so a previous default sharing the permission is demoted atomically.
    ///
    /// # Errors
    ///
    /// Returns [`RoboHubError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, robot), fields(repo_id = %robot.repo_id, robot_name = %robot.name))]
    pub async fn create_robot(&self, robot: Robot) -> Result<Robot, RoboHubError> {
        robot.validate()?;
        let promote = robot.is_default;
        // Stored unflagged first; the promotion transaction owns the flag.
        let robot = Robot {
            is_default: false,
            ..robot
        };
        let mut created = self.repo.create(robot).await?;
        if promote {
            self.repo.set_default(created.repo_id, created.id).await?;
            created.is_default = true;
        }
        Ok(created)
    }

    /// Look up a robot by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`RoboHubError::NotFound`] when no robot with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_robot(&self, id: RobotId) -> Result<Robot, RoboHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Robot",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all robots attached to a repository.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_robots(&self, repo_id: RepoId) -> Result<Vec<Robot>, RoboHubError> {
        self.repo.list_by_repo(repo_id).await
    }

    /// Make `robot_id` the sole default for its `(repo, permission)` group.
    ///
    /// # Errors
    ///
    /// Returns [`RoboHubError::NotFound`] when the robot does not belong to
    /// `repo_id`, [`RoboHubError::Conflict`] when a concurrent promotion in
    /// the same group wins, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn set_default_robot(
        &self,
        repo_id: RepoId,
        robot_id: RobotId,
    ) -> Result<(), RoboHubError> {
        self.repo.set_default(repo_id, robot_id).await
    }

    /// Find the default robot for a `(repo, permission)` group, if any.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn default_for(
        &self,
        repo_id: RepoId,
        permission: Permission,
    ) -> Result<Option<Robot>, RoboHubError> {
        let robots = self.repo.list_by_repo(repo_id).await?;
        Ok(robots
            .into_iter()
            .find(|robot| robot.is_default && robot.permission == permission))
    }
}
