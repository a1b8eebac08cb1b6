//! Event facts — the normalized view of an inbound webhook event.
//!
//! Webhook ingestion (an adapter concern) flattens a provider-specific
//! payload into a string-keyed fact map. Each fact is either a single text
//! value (`branch.name`) or a list (`issue.assignees`); clause evaluation
//! pattern-matches on [`FactValue`] instead of doing ad-hoc type checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known fact field names supplied by webhook ingestion.
pub mod fields {
    /// Event sub-type: `created`, `updated`, or `commented`.
    pub const EVENT_SUB_TYPE: &str = "event.subType";
    /// Branch the event happened on.
    pub const BRANCH_NAME: &str = "branch.name";
    /// Concatenated title + body + latest comment.
    pub const TEXT_ALL: &str = "text.all";
    /// Usernames assigned to the issue.
    pub const ISSUE_ASSIGNEES: &str = "issue.assignees";
    /// Robot ids mentioned in the comment.
    pub const COMMENT_MENTION_ROBOT_IDS: &str = "comment.mentionRobotIds";
    /// Usernames mentioned in the comment.
    pub const COMMENT_MENTIONS: &str = "comment.mentions";
}

/// The event kinds that carry an automation rule bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKey {
    /// Issue opened, updated, or commented on.
    Issue,
    /// Commit pushed.
    Commit,
    /// Merge request opened or updated.
    MergeRequest,
}

impl EventKey {
    /// All canonical event keys, in bucket order.
    pub const ALL: [Self; 3] = [Self::Issue, Self::Commit, Self::MergeRequest];

    /// The canonical string form used as a config bucket key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Commit => "commit",
            Self::MergeRequest => "merge_request",
        }
    }
}

impl std::fmt::Display for EventKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKey {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issue" => Ok(Self::Issue),
            "commit" => Ok(Self::Commit),
            "merge_request" => Ok(Self::MergeRequest),
            other => Err(crate::error::ValidationError::InvalidField {
                field: "event key",
                value: other.to_string(),
            }),
        }
    }
}

/// A single fact: either one text value or a list of values.
///
/// Absence is expressed by the field missing from [`EventFacts`], not by a
/// variant, so lookups return `Option<&FactValue>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    /// A single text value, e.g. a branch name.
    Text(String),
    /// A list of values, e.g. assignee usernames.
    List(Vec<String>),
}

impl FactValue {
    /// Whether the fact carries no usable content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for FactValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Flat lookup from field names to fact values for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventFacts(BTreeMap<String, FactValue>);

impl EventFacts {
    /// Create an empty fact map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a single fact.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Insert a fact, replacing any previous value for the field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FactValue>) {
        self.0.insert(field.into(), value.into());
    }

    /// Look up a fact by field name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FactValue> {
        self.0.get(field)
    }

    /// Look up a text fact; `None` when absent or list-valued.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.0.get(field) {
            Some(FactValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Look up a list fact; `None` when absent or text-valued.
    #[must_use]
    pub fn list(&self, field: &str) -> Option<&[String]> {
        match self.0.get(field) {
            Some(FactValue::List(items)) => Some(items),
            _ => None,
        }
    }
}
