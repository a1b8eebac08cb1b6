//! Robot — an AI agent attached to a repository.

use serde::{Deserialize, Serialize};

use crate::error::{RoboHubError, ValidationError};
use crate::id::{RepoId, RobotId};
use crate::time::Timestamp;

/// What a robot is allowed to do in its repository.
///
/// Defaults are contested *within* a permission group: a repo can have one
/// default `read` robot and one default `write` robot at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// May inspect the repository and comment.
    Read,
    /// May push changes and open merge requests.
    Write,
}

impl Permission {
    /// The snake_case form stored in the database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            other => Err(ValidationError::InvalidField {
                field: "permission",
                value: other.to_string(),
            }),
        }
    }
}

/// An AI agent that can be dispatched against repository events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub id: RobotId,
    pub repo_id: RepoId,
    pub name: String,
    pub permission: Permission,
    /// Whether this robot is the fallback for its `(repo, permission)`
    /// group. At most one robot per group carries the flag; the registry
    /// enforces this transactionally.
    pub is_default: bool,
    /// Base prompt applied when an action carries no override or patch.
    pub prompt_default: Option<String>,
    pub created_at: Timestamp,
}

impl Robot {
    /// Create a builder for constructing a [`Robot`].
    #[must_use]
    pub fn builder() -> RobotBuilder {
        RobotBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RoboHubError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), RoboHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Robot`].
#[derive(Debug, Default)]
pub struct RobotBuilder {
    id: Option<RobotId>,
    repo_id: Option<RepoId>,
    name: Option<String>,
    permission: Option<Permission>,
    is_default: bool,
    prompt_default: Option<String>,
}

impl RobotBuilder {
    #[must_use]
    pub fn id(mut self, id: RobotId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn repo_id(mut self, repo_id: RepoId) -> Self {
        self.repo_id = Some(repo_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    #[must_use]
    pub fn is_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    #[must_use]
    pub fn prompt_default(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_default = Some(prompt.into());
        self
    }

    /// Consume the builder, validate, and return a [`Robot`].
    ///
    /// # Errors
    ///
    /// Returns [`RoboHubError::Validation`] if required fields are missing
    /// or empty.
    pub fn build(self) -> Result<Robot, RoboHubError> {
        let robot = Robot {
            id: self.id.unwrap_or_default(),
            repo_id: self.repo_id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            permission: self.permission.unwrap_or(Permission::Read),
            is_default: self.is_default,
            prompt_default: self.prompt_default,
            created_at: crate::time::now(),
        };
        robot.validate()?;
        Ok(robot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn valid_robot() -> Robot {
        Robot::builder()
            .repo_id(RepoId::new())
            .name("triage-bot")
            .permission(Permission::Read)
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_robot_with_defaults() {
        let robot = valid_robot();
        assert_eq!(robot.permission, Permission::Read);
        assert!(!robot.is_default);
        assert!(robot.prompt_default.is_none());
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Robot::builder().repo_id(RepoId::new()).build();
        assert!(matches!(
            result,
            Err(RoboHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_parse_permission_from_stored_string() {
        assert_eq!(Permission::from_str("read").unwrap(), Permission::Read);
        assert_eq!(Permission::from_str("write").unwrap(), Permission::Write);
        assert!(Permission::from_str("admin").is_err());
    }

    #[test]
    fn should_roundtrip_robot_through_serde_json() {
        let robot = valid_robot();
        let json = serde_json::to_string(&robot).unwrap();
        let parsed: Robot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, robot);
    }

    #[test]
    fn should_serialize_permission_in_snake_case() {
        let json = serde_json::to_value(Permission::Write).unwrap();
        assert_eq!(json, serde_json::json!("write"));
    }
}
