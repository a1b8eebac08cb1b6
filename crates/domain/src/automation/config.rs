//! Versioned per-repository automation config and its normalization.
//!
//! Config is persisted as editor-produced JSON and loaded through
//! [`RepoAutomationConfig::normalize`], which migrates version 1, merges
//! version 2 over defaults, and falls back to a default config for
//! anything malformed — it never fails. Past the normalizer the rest of
//! the engine only ever sees the canonical version-2 shape.
//!
//! All update helpers are pure: they return a new config instead of
//! mutating, which keeps the editor's auto-save/diff logic race-free.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::facts::{EventKey, fields};

use super::{AutomationClause, AutomationRule, ClauseOp, RuleCriteria};

/// The canonical config version. Version 1 is migrated on load and never
/// written back.
pub const CONFIG_VERSION: u32 = 2;

fn default_enabled() -> bool {
    true
}

/// The rules configured for one event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationEventConfig {
    /// Master switch for the whole bucket.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Rules in insertion order. Order is significant: dispatch walks the
    /// bucket front to back and every matching rule contributes.
    #[serde(default)]
    pub rules: Vec<AutomationRule>,
}

impl Default for AutomationEventConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: Vec::new(),
        }
    }
}

impl AutomationEventConfig {
    /// Replace the rule with the same id, or append when absent.
    #[must_use]
    pub fn upsert_rule(mut self, rule: AutomationRule) -> Self {
        match self.rules.iter_mut().find(|existing| existing.id == rule.id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Drop the rule with the given id; unknown ids are a no-op.
    #[must_use]
    pub fn remove_rule(mut self, rule_id: &str) -> Self {
        self.rules.retain(|rule| rule.id != rule_id);
        self
    }
}

/// Canonical (version 2) automation config for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoAutomationConfig {
    /// Always [`CONFIG_VERSION`] in memory.
    pub version: u32,
    /// Buckets keyed by event kind. The three canonical keys are always
    /// present; unknown extra buckets survive normalization untouched.
    pub events: BTreeMap<String, AutomationEventConfig>,
}

impl Default for RepoAutomationConfig {
    fn default() -> Self {
        let events = EventKey::ALL
            .iter()
            .map(|key| (key.as_str().to_string(), AutomationEventConfig::default()))
            .collect();
        Self {
            version: CONFIG_VERSION,
            events,
        }
    }
}

impl RepoAutomationConfig {
    /// Coerce a persisted config of any vintage into the canonical shape.
    ///
    /// Fail-soft by design: null, non-objects, and unknown versions all
    /// produce the default config rather than an error, so a damaged row
    /// can never take dispatch down. Idempotent — normalizing an already
    /// canonical config is structurally a no-op.
    #[must_use]
    pub fn normalize(input: &Value) -> Self {
        let Some(object) = input.as_object() else {
            return Self::default();
        };
        match object.get("version").and_then(Value::as_u64) {
            Some(1) => Self::migrate_v1(object.get("events")),
            Some(2) => Self::merge_v2(object.get("events")),
            _ => Self::default(),
        }
    }

    /// Version 1 stored per-sub-type buckets (`issue_created`,
    /// `issue_comment`, `commit_review`). Their rules move into the v2
    /// `issue`/`commit` buckets, each tagged with an injected leading
    /// `event.subType` clause so matching behavior is preserved.
    fn migrate_v1(events: Option<&Value>) -> Self {
        let empty = serde_json::Map::new();
        let events = events.and_then(Value::as_object).unwrap_or(&empty);
        let load = |key: &str| -> AutomationEventConfig {
            events
                .get(key)
                .cloned()
                .and_then(|value| serde_json::from_value(value).ok())
                .unwrap_or_default()
        };

        let issue_created = load("issue_created");
        let issue_comment = load("issue_comment");
        let commit_review = load("commit_review");

        let mut issue_rules = Vec::new();
        issue_rules.extend(
            issue_created
                .rules
                .into_iter()
                .map(|rule| tag_rule(rule, "created")),
        );
        issue_rules.extend(
            issue_comment
                .rules
                .into_iter()
                .map(|rule| tag_rule(rule, "commented")),
        );
        let issue = AutomationEventConfig {
            enabled: issue_created.enabled || issue_comment.enabled,
            rules: issue_rules,
        };

        let commit = AutomationEventConfig {
            enabled: commit_review.enabled,
            rules: commit_review
                .rules
                .into_iter()
                .map(|rule| tag_rule(rule, "created"))
                .collect(),
        };

        // merge_request did not exist in v1 and stays at the default.
        Self::default()
            .with_event_config(EventKey::Issue, issue)
            .with_event_config(EventKey::Commit, commit)
    }

    /// Version 2 is shallow-merged over the defaults: provided buckets win,
    /// missing canonical buckets stay at their default, unknown extra
    /// buckets are preserved but not specially interpreted.
    fn merge_v2(events: Option<&Value>) -> Self {
        let mut config = Self::default();
        let Some(events) = events.and_then(Value::as_object) else {
            return config;
        };
        for (key, value) in events {
            if let Ok(bucket) = serde_json::from_value::<AutomationEventConfig>(value.clone()) {
                config.events.insert(key.clone(), bucket);
            }
        }
        config
    }

    /// The bucket for an event kind, or a fresh default when absent.
    /// Never mutates the config.
    #[must_use]
    pub fn event_config(&self, key: EventKey) -> AutomationEventConfig {
        self.events.get(key.as_str()).cloned().unwrap_or_default()
    }

    /// Return a new config with the bucket replaced.
    #[must_use]
    pub fn with_event_config(mut self, key: EventKey, bucket: AutomationEventConfig) -> Self {
        self.events.insert(key.as_str().to_string(), bucket);
        self
    }

    /// Return a new config with the rule upserted into the bucket.
    #[must_use]
    pub fn upsert_rule(self, key: EventKey, rule: AutomationRule) -> Self {
        let bucket = self.event_config(key).upsert_rule(rule);
        self.with_event_config(key, bucket)
    }

    /// Return a new config with the rule removed from the bucket.
    #[must_use]
    pub fn remove_rule(self, key: EventKey, rule_id: &str) -> Self {
        let bucket = self.event_config(key).remove_rule(rule_id);
        self.with_event_config(key, bucket)
    }
}

fn tag_rule(mut rule: AutomationRule, sub_type: &str) -> AutomationRule {
    let clause =
        AutomationClause::new(fields::EVENT_SUB_TYPE, ClauseOp::In).with_values([sub_type]);
    rule.criteria = Some(
        rule.criteria
            .unwrap_or_default()
            .with_leading_all_clause(clause),
    );
    rule
}
