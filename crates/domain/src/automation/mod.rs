//! Automation — clause → criteria → action rules for webhook events.
//!
//! A rule reacts to a repository event (issue, commit, merge request) by
//! dispatching robot actions. Each rule has optional [`RuleCriteria`]
//! (clause composition deciding *whether* it matches the event's facts),
//! one or more [`AutomationAction`]s, and an optional [`TimeWindow`]
//! gating *when* it may fire.

mod action;
mod clause;
pub mod config;
mod schedule;

pub use action::AutomationAction;
pub use clause::{AutomationClause, ClauseOp};
pub use config::{AutomationEventConfig, RepoAutomationConfig};
pub use schedule::{TimeWindow, is_within_window};

use serde::{Deserialize, Serialize};

use crate::error::{RoboHubError, ValidationError};
use crate::facts::EventFacts;

/// Boolean composition of clauses for one rule.
///
/// The rule matches iff every clause in `all` holds (absent or empty is
/// vacuously true) and at least one clause in `any` holds. A
/// present-but-empty `any` is treated the same as an absent one — rule
/// authors end up with an empty array after removing all "any" clauses in
/// the editor, and that must not block matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCriteria {
    /// Clauses that must all hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<AutomationClause>>,
    /// Clauses of which at least one must hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any: Option<Vec<AutomationClause>>,
}

impl RuleCriteria {
    /// Evaluate the composition against a fact view.
    #[must_use]
    pub fn matches(&self, facts: &EventFacts) -> bool {
        let all_hold = self
            .all
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .all(|clause| clause.evaluate(facts));

        let any = self.any.as_deref().unwrap_or(&[]);
        let any_holds = any.is_empty() || any.iter().any(|clause| clause.evaluate(facts));

        all_hold && any_holds
    }

    /// Prepend a clause to `all`, creating it when absent.
    ///
    /// Used by the config migration to tag legacy rules with their origin
    /// sub-bucket.
    #[must_use]
    pub fn with_leading_all_clause(mut self, clause: AutomationClause) -> Self {
        let mut all = self.all.unwrap_or_default();
        all.insert(0, clause);
        self.all = Some(all);
        self
    }
}

/// A named, enable-able combination of clauses plus the robot actions to
/// trigger when it matches.
///
/// Identity is `id`, stable across edits. Rules with an empty name or no
/// actions are rejected at the editor boundary via [`Self::validate`]; the
/// matcher and dispatcher still tolerate them defensively (such a rule
/// matches but contributes no actions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRule {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    /// Clause composition; absent means "always matches".
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<RuleCriteria>,
    #[serde(default)]
    pub actions: Vec<AutomationAction>,
    /// Hour-of-day gate; absent means "never time-gated".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

impl AutomationRule {
    /// Create a builder for constructing an [`AutomationRule`].
    #[must_use]
    pub fn builder() -> AutomationRuleBuilder {
        AutomationRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RoboHubError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - `actions` is empty ([`ValidationError::NoActions`])
    pub fn validate(&self) -> Result<(), RoboHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.actions.is_empty() {
            return Err(ValidationError::NoActions.into());
        }
        Ok(())
    }

    /// Whether this rule matches the event's facts.
    ///
    /// Disabled rules never match, even when referenced explicitly
    /// elsewhere. Absent criteria always match.
    #[must_use]
    pub fn matches(&self, facts: &EventFacts) -> bool {
        if !self.enabled {
            return false;
        }
        self.criteria
            .as_ref()
            .is_none_or(|criteria| criteria.matches(facts))
    }
}

/// Step-by-step builder for [`AutomationRule`].
#[derive(Debug, Default)]
pub struct AutomationRuleBuilder {
    id: Option<String>,
    name: Option<String>,
    enabled: Option<bool>,
    criteria: Option<RuleCriteria>,
    actions: Vec<AutomationAction>,
    time_window: Option<TimeWindow>,
}

impl AutomationRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn criteria(mut self, criteria: RuleCriteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    /// Add a clause to the `all` composition.
    #[must_use]
    pub fn all_clause(mut self, clause: AutomationClause) -> Self {
        let criteria = self.criteria.get_or_insert_with(RuleCriteria::default);
        criteria.all.get_or_insert_with(Vec::new).push(clause);
        self
    }

    /// Add a clause to the `any` composition.
    #[must_use]
    pub fn any_clause(mut self, clause: AutomationClause) -> Self {
        let criteria = self.criteria.get_or_insert_with(RuleCriteria::default);
        criteria.any.get_or_insert_with(Vec::new).push(clause);
        self
    }

    #[must_use]
    pub fn action(mut self, action: AutomationAction) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRule`].
    ///
    /// # Errors
    ///
    /// Returns [`RoboHubError::Validation`] if required fields are missing
    /// or empty.
    pub fn build(self) -> Result<AutomationRule, RoboHubError> {
        let rule = AutomationRule {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name.unwrap_or_default(),
            enabled: self.enabled.unwrap_or(true),
            criteria: self.criteria,
            actions: self.actions,
            time_window: self.time_window,
        };
        rule.validate()?;
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::fields;

    fn created_facts() -> EventFacts {
        EventFacts::new()
            .with(fields::EVENT_SUB_TYPE, "created")
            .with(fields::BRANCH_NAME, "main")
    }

    fn sub_type_clause(value: &str) -> AutomationClause {
        AutomationClause::new(fields::EVENT_SUB_TYPE, ClauseOp::In).with_values([value])
    }

    fn valid_rule() -> AutomationRule {
        AutomationRule::builder()
            .name("Review new issues")
            .all_clause(sub_type_clause("created"))
            .action(AutomationAction::new("a1", "bot1"))
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_rule_with_defaults() {
        let rule = valid_rule();
        assert!(rule.enabled);
        assert!(!rule.id.is_empty());
        assert!(rule.time_window.is_none());
        assert_eq!(rule.actions.len(), 1);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = AutomationRule::builder()
            .action(AutomationAction::new("a1", "bot1"))
            .build();
        assert!(matches!(
            result,
            Err(RoboHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_actions_is_empty() {
        let result = AutomationRule::builder().name("No actions").build();
        assert!(matches!(
            result,
            Err(RoboHubError::Validation(ValidationError::NoActions))
        ));
    }

    #[test]
    fn should_match_when_criteria_absent() {
        let rule = AutomationRule::builder()
            .name("Catch-all")
            .action(AutomationAction::new("a1", "bot1"))
            .build()
            .unwrap();
        assert!(rule.matches(&created_facts()));
        assert!(rule.matches(&EventFacts::new()));
    }

    #[test]
    fn should_never_match_when_disabled() {
        let mut rule = valid_rule();
        rule.enabled = false;
        assert!(!rule.matches(&created_facts()));

        // Even a criteria-less rule stays dormant while disabled.
        rule.criteria = None;
        assert!(!rule.matches(&created_facts()));
    }

    #[test]
    fn should_require_every_all_clause_to_hold() {
        let rule = AutomationRule::builder()
            .name("Created on main")
            .all_clause(sub_type_clause("created"))
            .all_clause(
                AutomationClause::new(fields::BRANCH_NAME, ClauseOp::MatchesAny)
                    .with_values(["main"]),
            )
            .action(AutomationAction::new("a1", "bot1"))
            .build()
            .unwrap();

        assert!(rule.matches(&created_facts()));

        let other_branch = EventFacts::new()
            .with(fields::EVENT_SUB_TYPE, "created")
            .with(fields::BRANCH_NAME, "develop");
        assert!(!rule.matches(&other_branch));
    }

    #[test]
    fn should_require_at_least_one_any_clause_to_hold() {
        let rule = AutomationRule::builder()
            .name("Created or commented")
            .any_clause(sub_type_clause("created"))
            .any_clause(sub_type_clause("commented"))
            .action(AutomationAction::new("a1", "bot1"))
            .build()
            .unwrap();

        assert!(rule.matches(&created_facts()));
        let updated = EventFacts::new().with(fields::EVENT_SUB_TYPE, "updated");
        assert!(!rule.matches(&updated));
    }

    #[test]
    fn should_treat_empty_all_as_vacuously_true() {
        let criteria = RuleCriteria {
            all: Some(vec![]),
            any: None,
        };
        assert!(criteria.matches(&created_facts()));
    }

    #[test]
    fn should_not_block_matching_when_any_is_present_but_empty() {
        // Regression guard for the "empty array blocks matching" bug class.
        let rule = AutomationRule {
            id: "r1".to_string(),
            name: "Emptied any".to_string(),
            enabled: true,
            criteria: Some(RuleCriteria {
                all: None,
                any: Some(vec![]),
            }),
            actions: vec![AutomationAction::new("a1", "bot1")],
            time_window: None,
        };
        assert!(rule.matches(&created_facts()));
        assert!(rule.matches(&EventFacts::new()));
    }

    #[test]
    fn should_combine_all_and_any_compositions() {
        let criteria = RuleCriteria {
            all: Some(vec![sub_type_clause("created")]),
            any: Some(vec![
                AutomationClause::new(fields::BRANCH_NAME, ClauseOp::MatchesAny)
                    .with_values(["main"]),
                AutomationClause::new(fields::BRANCH_NAME, ClauseOp::MatchesAny)
                    .with_values(["develop"]),
            ]),
        };
        assert!(criteria.matches(&created_facts()));

        let neither_branch = EventFacts::new()
            .with(fields::EVENT_SUB_TYPE, "created")
            .with(fields::BRANCH_NAME, "feature/x");
        assert!(!criteria.matches(&neither_branch));
    }

    #[test]
    fn should_prepend_leading_all_clause() {
        let criteria = RuleCriteria {
            all: Some(vec![sub_type_clause("created")]),
            any: None,
        }
        .with_leading_all_clause(
            AutomationClause::new(fields::BRANCH_NAME, ClauseOp::Exists),
        );
        let all = criteria.all.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].field, fields::BRANCH_NAME);
    }

    #[test]
    fn should_create_criteria_when_prepending_to_none() {
        let criteria =
            RuleCriteria::default().with_leading_all_clause(sub_type_clause("created"));
        assert_eq!(criteria.all.unwrap().len(), 1);
    }

    #[test]
    fn should_roundtrip_rule_through_serde_json() {
        let rule = AutomationRule::builder()
            .id("r1")
            .name("Nightly triage")
            .all_clause(sub_type_clause("created"))
            .action(AutomationAction::new("a1", "bot1").with_prompt_patch("be brief"))
            .time_window(TimeWindow::new(22, 6).unwrap())
            .build()
            .unwrap();

        let json = serde_json::to_value(&rule).unwrap();
        assert!(json.get("match").is_some(), "criteria serializes as match");
        assert!(json.get("timeWindow").is_some());
        let parsed: AutomationRule = serde_json::from_str(&json.to_string()).unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn should_tolerate_rule_without_actions_when_deserializing() {
        // The editor boundary rejects these; the engine must still load them.
        let rule: AutomationRule = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "name": "damaged",
            "enabled": true,
        }))
        .unwrap();
        assert!(rule.actions.is_empty());
        assert!(rule.matches(&EventFacts::new()));
    }
}
