//! Storage ports — persistence for robots and automation config.

use std::future::Future;

use robohub_domain::error::RoboHubError;
use robohub_domain::id::{RepoId, RobotId};
use robohub_domain::robot::Robot;

/// Repository for persisting and querying [`Robot`]s.
pub trait RobotRepository {
    /// Create a new robot in storage.
    fn create(&self, robot: Robot) -> impl Future<Output = Result<Robot, RoboHubError>> + Send;

    /// Get a robot by its unique identifier.
    fn get_by_id(
        &self,
        id: RobotId,
    ) -> impl Future<Output = Result<Option<Robot>, RoboHubError>> + Send;

    /// List all robots attached to a repository.
    fn list_by_repo(
        &self,
        repo_id: RepoId,
    ) -> impl Future<Output = Result<Vec<Robot>, RoboHubError>> + Send;

    /// Make `robot_id` the sole default for its `(repo, permission)` group.
    ///
    /// Implementations must run read-previous + clear + set as one
    /// transaction scoped to that group: after the call exactly one robot
    /// in the group has the flag and it is `robot_id`; a previously default
    /// robot sharing the permission is unset in the same transaction; a
    /// failed transaction leaves the previous default untouched. Groups
    /// with different keys must not block each other.
    ///
    /// The losing side of a concurrent promotion surfaces as
    /// [`RoboHubError::Conflict`].
    fn set_default(
        &self,
        repo_id: RepoId,
        robot_id: RobotId,
    ) -> impl Future<Output = Result<(), RoboHubError>> + Send;
}

/// Repository for the per-repository automation config blob.
///
/// Config is stored as opaque JSON; callers run it through
/// [`RepoAutomationConfig::normalize`](robohub_domain::automation::RepoAutomationConfig::normalize)
/// on every load, so this port never interprets the value.
pub trait AutomationConfigRepository {
    /// Load the stored config JSON, `None` when the repo has none yet.
    fn load(
        &self,
        repo_id: RepoId,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, RoboHubError>> + Send;

    /// Store the config JSON, replacing any previous value.
    fn save(
        &self,
        repo_id: RepoId,
        config: serde_json::Value,
    ) -> impl Future<Output = Result<(), RoboHubError>> + Send;
}
