//! Dispatcher — turns a matched rule's enabled actions into dispatch
//! instructions.
//!
//! [`dispatch`] is the top-level decision function of the automation
//! engine: given a normalized config, an event's fact view, and the
//! current local time, it returns the ordered list of actions to queue.
//! It is pure — no IO, no shared state — and therefore safe to call
//! concurrently from any number of request handlers. Actual task creation
//! happens in [`AutomationEngine`](crate::automation_engine::AutomationEngine).

use serde::{Deserialize, Serialize};

use robohub_domain::automation::{RepoAutomationConfig, is_within_window};
use robohub_domain::facts::{EventFacts, EventKey};
use robohub_domain::time::LocalTimestamp;

/// One dispatch instruction: which robot to run, with which prompt
/// customization, and which rule asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchedAction {
    /// Id of the matching rule (provenance for delivery logs).
    pub rule_id: String,
    /// Name of the matching rule at dispatch time.
    pub rule_name: String,
    /// Robot referenced by the action, unresolved.
    pub robot_id: String,
    /// `promptOverride` when set, else `promptPatch`, else `None`.
    pub effective_prompt_instruction: Option<String>,
}

/// Decide which actions an event triggers.
///
/// Rules are walked in array order and *every* matching rule contributes —
/// there is no first-match-wins short circuit. A disabled bucket yields
/// nothing. Per rule, the schedule gate is evaluated against `now` (the
/// dispatch instant, not the event's original timestamp). Duplicate robot
/// ids across rules are preserved: each instruction is independent, and
/// coalescing is the task-creation side's call.
#[must_use]
pub fn dispatch(
    config: &RepoAutomationConfig,
    key: EventKey,
    facts: &EventFacts,
    now: LocalTimestamp,
) -> Vec<DispatchedAction> {
    let bucket = config.event_config(key);
    if !bucket.enabled {
        return Vec::new();
    }

    let mut dispatched = Vec::new();
    for rule in &bucket.rules {
        if !rule.matches(facts) {
            continue;
        }
        if !is_within_window(rule.time_window.as_ref(), now) {
            continue;
        }
        for action in rule.actions.iter().filter(|action| action.enabled) {
            dispatched.push(DispatchedAction {
                rule_id: rule.id.clone(),
                rule_name: rule.name.clone(),
                robot_id: action.robot_id.clone(),
                effective_prompt_instruction: action.effective_prompt().map(str::to_string),
            });
        }
    }
    dispatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use robohub_domain::automation::{
        AutomationAction, AutomationClause, AutomationEventConfig, AutomationRule, ClauseOp,
        TimeWindow,
    };
    use robohub_domain::facts::fields;

    fn at_hour(hour: u32) -> LocalTimestamp {
        chrono::Local
            .with_ymd_and_hms(2024, 6, 1, hour, 30, 0)
            .single()
            .unwrap()
    }

    fn created_facts() -> EventFacts {
        EventFacts::new().with(fields::EVENT_SUB_TYPE, "created")
    }

    fn sub_type_rule(id: &str, sub_type: &str, actions: Vec<AutomationAction>) -> AutomationRule {
        let mut builder = AutomationRule::builder().id(id).name(format!("rule {id}")).all_clause(
            AutomationClause::new(fields::EVENT_SUB_TYPE, ClauseOp::In).with_values([sub_type]),
        );
        for action in actions {
            builder = builder.action(action);
        }
        builder.build().unwrap()
    }

    fn config_with_issue_rules(rules: Vec<AutomationRule>) -> RepoAutomationConfig {
        RepoAutomationConfig::default()
            .with_event_config(EventKey::Issue, AutomationEventConfig { enabled: true, rules })
    }

    #[test]
    fn should_dispatch_matching_rule_actions() {
        // One rule firing on issue creation, prompt override carried through.
        let config = config_with_issue_rules(vec![sub_type_rule(
            "r1",
            "created",
            vec![AutomationAction::new("a1", "bot1")],
        )]);

        let dispatched = dispatch(&config, EventKey::Issue, &created_facts(), at_hour(12));
        assert_eq!(
            dispatched,
            vec![DispatchedAction {
                rule_id: "r1".to_string(),
                rule_name: "rule r1".to_string(),
                robot_id: "bot1".to_string(),
                effective_prompt_instruction: None,
            }]
        );

        let commented = EventFacts::new().with(fields::EVENT_SUB_TYPE, "commented");
        assert!(dispatch(&config, EventKey::Issue, &commented, at_hour(12)).is_empty());
    }

    #[test]
    fn should_return_nothing_when_bucket_disabled() {
        let config = RepoAutomationConfig::default().with_event_config(
            EventKey::Issue,
            AutomationEventConfig {
                enabled: false,
                rules: vec![sub_type_rule(
                    "r1",
                    "created",
                    vec![AutomationAction::new("a1", "bot1")],
                )],
            },
        );
        assert!(dispatch(&config, EventKey::Issue, &created_facts(), at_hour(12)).is_empty());
    }

    #[test]
    fn should_let_all_matching_rules_contribute_in_order() {
        let config = config_with_issue_rules(vec![
            sub_type_rule(
                "ruleA",
                "created",
                vec![
                    AutomationAction::new("a1", "bot1"),
                    AutomationAction::new("a2", "bot2"),
                ],
            ),
            sub_type_rule("ruleB", "created", vec![AutomationAction::new("b1", "bot3")]),
        ]);

        let dispatched = dispatch(&config, EventKey::Issue, &created_facts(), at_hour(12));
        let order: Vec<_> = dispatched
            .iter()
            .map(|action| (action.rule_id.as_str(), action.robot_id.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("ruleA", "bot1"), ("ruleA", "bot2"), ("ruleB", "bot3")]
        );
    }

    #[test]
    fn should_not_deduplicate_robot_ids_across_rules() {
        let config = config_with_issue_rules(vec![
            sub_type_rule("r1", "created", vec![AutomationAction::new("a1", "bot1")]),
            sub_type_rule("r2", "created", vec![AutomationAction::new("a2", "bot1")]),
        ]);

        let dispatched = dispatch(&config, EventKey::Issue, &created_facts(), at_hour(12));
        assert_eq!(dispatched.len(), 2);
        assert!(dispatched.iter().all(|action| action.robot_id == "bot1"));
    }

    #[test]
    fn should_skip_disabled_actions_but_keep_the_rest() {
        let config = config_with_issue_rules(vec![sub_type_rule(
            "r1",
            "created",
            vec![
                AutomationAction::new("a1", "bot1").disabled(),
                AutomationAction::new("a2", "bot2"),
            ],
        )]);

        let dispatched = dispatch(&config, EventKey::Issue, &created_facts(), at_hour(12));
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].robot_id, "bot2");
    }

    #[test]
    fn should_gate_rules_on_their_time_window() {
        let mut rule = sub_type_rule("r1", "created", vec![AutomationAction::new("a1", "bot1")]);
        rule.time_window = Some(TimeWindow::new(22, 6).unwrap());
        let config = config_with_issue_rules(vec![rule]);

        // Overnight window permits 23:xx and 02:xx, forbids 10:xx.
        assert_eq!(dispatch(&config, EventKey::Issue, &created_facts(), at_hour(23)).len(), 1);
        assert_eq!(dispatch(&config, EventKey::Issue, &created_facts(), at_hour(2)).len(), 1);
        assert!(dispatch(&config, EventKey::Issue, &created_facts(), at_hour(10)).is_empty());
    }

    #[test]
    fn should_only_gate_windowed_rules() {
        let mut gated = sub_type_rule("r1", "created", vec![AutomationAction::new("a1", "bot1")]);
        gated.time_window = Some(TimeWindow::new(9, 17).unwrap());
        let always = sub_type_rule("r2", "created", vec![AutomationAction::new("a2", "bot2")]);
        let config = config_with_issue_rules(vec![gated, always]);

        let dispatched = dispatch(&config, EventKey::Issue, &created_facts(), at_hour(20));
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].robot_id, "bot2");
    }

    #[test]
    fn should_carry_effective_prompt_with_override_winning() {
        let config = config_with_issue_rules(vec![sub_type_rule(
            "r1",
            "created",
            vec![
                AutomationAction::new("a1", "bot1")
                    .with_prompt_override("replace")
                    .with_prompt_patch("append"),
                AutomationAction::new("a2", "bot2").with_prompt_patch("append"),
                AutomationAction::new("a3", "bot3"),
            ],
        )]);

        let prompts: Vec<_> =
            dispatch(&config, EventKey::Issue, &created_facts(), at_hour(12))
                .into_iter()
                .map(|action| action.effective_prompt_instruction)
                .collect();
        assert_eq!(
            prompts,
            vec![Some("replace".to_string()), Some("append".to_string()), None]
        );
    }

    #[test]
    fn should_serialize_instruction_fields_in_camel_case() {
        let action = DispatchedAction {
            rule_id: "r1".to_string(),
            rule_name: "rule r1".to_string(),
            robot_id: "bot1".to_string(),
            effective_prompt_instruction: Some("replace".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            serde_json::json!({
                "ruleId": "r1",
                "ruleName": "rule r1",
                "robotId": "bot1",
                "effectivePromptInstruction": "replace",
            })
        );
    }

    #[test]
    fn should_contribute_nothing_for_defensive_zero_action_rule() {
        // The editor rejects these, but a persisted one must not break dispatch.
        let rule = AutomationRule {
            id: "damaged".to_string(),
            name: String::new(),
            enabled: true,
            criteria: None,
            actions: vec![],
            time_window: None,
        };
        let config = config_with_issue_rules(vec![
            rule,
            sub_type_rule("r2", "created", vec![AutomationAction::new("a1", "bot1")]),
        ]);

        let dispatched = dispatch(&config, EventKey::Issue, &created_facts(), at_hour(12));
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].rule_id, "r2");
    }

    #[test]
    fn should_dispatch_only_the_requested_bucket() {
        let config = config_with_issue_rules(vec![sub_type_rule(
            "r1",
            "created",
            vec![AutomationAction::new("a1", "bot1")],
        )]);
        assert!(dispatch(&config, EventKey::Commit, &created_facts(), at_hour(12)).is_empty());
        assert!(
            dispatch(&config, EventKey::MergeRequest, &created_facts(), at_hour(12)).is_empty()
        );
    }
}
