//! Action — one robot invocation triggered when a rule matches.

use serde::{Deserialize, Serialize};

/// A robot to run when the owning rule matches, plus optional prompt
/// customization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationAction {
    /// Stable identifier assigned by the editor.
    pub id: String,
    /// The robot to dispatch. Stored as a string because the config is
    /// editor-produced JSON; resolution against the registry happens at
    /// task-creation time.
    pub robot_id: String,
    /// Disabled actions are skipped at dispatch without affecting matching.
    pub enabled: bool,
    /// Replaces the robot's default prompt entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_override: Option<String>,
    /// Appended to the robot's default prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_patch: Option<String>,
}

impl AutomationAction {
    /// Create an enabled action with no prompt customization.
    #[must_use]
    pub fn new(id: impl Into<String>, robot_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            robot_id: robot_id.into(),
            enabled: true,
            prompt_override: None,
            prompt_patch: None,
        }
    }

    /// Set a full prompt replacement.
    #[must_use]
    pub fn with_prompt_override(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_override = Some(prompt.into());
        self
    }

    /// Set a prompt addition.
    #[must_use]
    pub fn with_prompt_patch(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_patch = Some(prompt.into());
        self
    }

    /// Mark the action as disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The prompt instruction this action contributes to a dispatched task.
    ///
    /// The editor allows both fields to be set independently; the override
    /// wins when both are present.
    #[must_use]
    pub fn effective_prompt(&self) -> Option<&str> {
        self.prompt_override
            .as_deref()
            .or(self.prompt_patch.as_deref())
    }
}
