//! Automation engine — reacts to webhook events by dispatching robot tasks.
//!
//! For each inbound event the engine loads the repository's stored config,
//! normalizes it, runs the pure [`dispatch`] decision, resolves the
//! dispatched robot ids against the registry, and submits one task per
//! action to the [`TaskSink`]. Fact extraction happens upstream: the
//! engine assumes well-formed [`EventFacts`] and is never called when the
//! webhook payload could not be parsed.

use robohub_domain::automation::RepoAutomationConfig;
use robohub_domain::error::RoboHubError;
use robohub_domain::facts::{EventFacts, EventKey};
use robohub_domain::id::RepoId;
use robohub_domain::task::TaskRequest;
use robohub_domain::time::local_now;

use crate::dispatcher::{DispatchedAction, dispatch};
use crate::ports::{AutomationConfigRepository, RobotRepository, TaskSink};

/// Drives the dispatch pipeline over the storage and queue ports.
pub struct AutomationEngine<CR, RR, TS> {
    config_repo: CR,
    robot_repo: RR,
    task_sink: TS,
}

impl<CR, RR, TS> AutomationEngine<CR, RR, TS>
where
    CR: AutomationConfigRepository,
    RR: RobotRepository,
    TS: TaskSink,
{
    /// Create a new engine.
    pub fn new(config_repo: CR, robot_repo: RR, task_sink: TS) -> Self {
        Self {
            config_repo,
            robot_repo,
            task_sink,
        }
    }

    /// Process a single event against the repository's automation config.
    ///
    /// Returns the dispatch instructions in rule order. Actions whose robot
    /// id no longer resolves are skipped with a warning — a stale persisted
    /// reference must not take the whole event down — but still appear in
    /// the returned list, which reports the dispatch *decision*.
    ///
    /// # Errors
    ///
    /// Returns a storage error if loading config or robots fails, or a
    /// queue error if a task cannot be submitted.
    #[tracing::instrument(skip(self, facts), fields(repo_id = %repo_id, event = %key))]
    pub async fn process_event(
        &self,
        repo_id: RepoId,
        key: EventKey,
        facts: &EventFacts,
    ) -> Result<Vec<DispatchedAction>, RoboHubError> {
        let stored = self
            .config_repo
            .load(repo_id)
            .await?
            .unwrap_or(serde_json::Value::Null);
        let config = RepoAutomationConfig::normalize(&stored);

        let dispatched = dispatch(&config, key, facts, local_now());
        if dispatched.is_empty() {
            return Ok(dispatched);
        }

        let robots = self.robot_repo.list_by_repo(repo_id).await?;
        for action in &dispatched {
            let Some(robot) = robots
                .iter()
                .find(|robot| robot.id.to_string() == action.robot_id)
            else {
                tracing::warn!(
                    robot_id = %action.robot_id,
                    rule_id = %action.rule_id,
                    "skipping action for unknown robot"
                );
                continue;
            };

            let task = TaskRequest::new(
                repo_id,
                robot.id,
                action.effective_prompt_instruction.clone(),
                action.rule_id.clone(),
                action.rule_name.clone(),
            );
            self.task_sink.submit(task).await?;
            tracing::debug!(robot = %robot.name, rule_id = %action.rule_id, "task queued");
        }

        Ok(dispatched)
    }
}
