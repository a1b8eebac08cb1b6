//! Task request — the instruction handed to the task queue when a rule
//! fires.
//!
//! Execution itself (resolving the robot's backend, applying the prompt,
//! reporting results) happens behind the `TaskSink` port in the `app`
//! crate; this type only carries what the worker needs plus rule
//! provenance for delivery logs.

use serde::{Deserialize, Serialize};

use crate::id::{RepoId, RobotId, TaskId};
use crate::time::Timestamp;

/// One queued robot invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub id: TaskId,
    pub repo_id: RepoId,
    pub robot_id: RobotId,
    /// Prompt instruction from the triggering action (override or patch);
    /// `None` means the robot's own default prompt applies unchanged.
    pub prompt_instruction: Option<String>,
    /// Id of the rule that dispatched this task.
    pub rule_id: String,
    /// Name of the rule at dispatch time.
    pub rule_name: String,
    pub created_at: Timestamp,
}

impl TaskRequest {
    /// Create a new task request stamped with the current time.
    #[must_use]
    pub fn new(
        repo_id: RepoId,
        robot_id: RobotId,
        prompt_instruction: Option<String>,
        rule_id: impl Into<String>,
        rule_name: impl Into<String>,
    ) -> Self {
        Self {
            id: TaskId::new(),
            repo_id,
            robot_id,
            prompt_instruction,
            rule_id: rule_id.into(),
            rule_name: rule_name.into(),
            created_at: crate::time::now(),
        }
    }
}
