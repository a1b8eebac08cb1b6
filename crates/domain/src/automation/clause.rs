//! Clause — a single boolean test against one event fact.

use serde::{Deserialize, Serialize};

use crate::facts::EventFacts;

/// Comparison operator applied by a clause.
///
/// Operators read either `value` (single operand) or `values` (list of
/// operands); see the [`AutomationClause`] field docs. Operators persisted
/// by a newer editor than this binary deserialize as [`Self::Unknown`] and
/// evaluate to `false`, so a forward-incompatible stored clause never
/// crashes dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseOp {
    /// Text fact equals `value`, trimmed and case-insensitive.
    Equals,
    /// Text fact is a case-sensitive member of `values`.
    In,
    /// List fact intersects `values`. Comparison is exact for id-valued
    /// fields (field names ending in `Ids`, e.g. `comment.mentionRobotIds`)
    /// and case-insensitive for name-style fields such as assignees and
    /// mentions.
    ContainsAny,
    /// Text fact matches one of the patterns in `values`. Patterns are
    /// exact names; glob/regex expansion is not part of this engine.
    MatchesAny,
    /// Fact is present and non-empty. Ignores `value` and `values`.
    Exists,
    /// Text fact contains any of `values` as a case-insensitive substring.
    TextContainsAny,
    /// Any operator this binary does not know. Always evaluates to `false`.
    Unknown,
}

impl ClauseOp {
    /// The camelCase name used in persisted config.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::In => "in",
            Self::ContainsAny => "containsAny",
            Self::MatchesAny => "matchesAny",
            Self::Exists => "exists",
            Self::TextContainsAny => "textContainsAny",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a persisted operator name; anything unrecognized becomes
    /// [`Self::Unknown`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "equals" => Self::Equals,
            "in" => Self::In,
            "containsAny" => Self::ContainsAny,
            "matchesAny" => Self::MatchesAny,
            "exists" => Self::Exists,
            "textContainsAny" => Self::TextContainsAny,
            _ => Self::Unknown,
        }
    }
}

// Serde is hand-written: `#[serde(other)]` is not available for plain
// string enums, and deserialization must never reject a stored operator.
impl Serialize for ClauseOp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ClauseOp {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

impl std::fmt::Display for ClauseOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One boolean test against one event fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationClause {
    /// Fact path, e.g. `event.subType` or `branch.name`.
    pub field: String,
    /// Comparison operator.
    pub op: ClauseOp,
    /// Single operand, read by `equals`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// List operands, read by `in`/`containsAny`/`matchesAny`/`textContainsAny`.
    /// Duplicates are permitted and order does not affect semantics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    /// Invert the raw result before composition.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub negate: bool,
}

impl AutomationClause {
    /// Create a clause with no operands.
    #[must_use]
    pub fn new(field: impl Into<String>, op: ClauseOp) -> Self {
        Self {
            field: field.into(),
            op,
            value: None,
            values: None,
            negate: false,
        }
    }

    /// Set the single operand.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the list operands.
    #[must_use]
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Mark the clause as negated.
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Evaluate the clause against a fact view.
    ///
    /// Pure function of `(self, facts)` — no current time, no randomness.
    /// Unknown operators and absent facts evaluate to `false` (fail closed);
    /// `negate` then inverts the raw result.
    #[must_use]
    pub fn evaluate(&self, facts: &EventFacts) -> bool {
        let raw = self.evaluate_raw(facts);
        if self.negate { !raw } else { raw }
    }

    fn evaluate_raw(&self, facts: &EventFacts) -> bool {
        match self.op {
            ClauseOp::Equals => match (facts.text(&self.field), self.value.as_deref()) {
                (Some(fact), Some(expected)) => fold(fact.trim()) == fold(expected.trim()),
                _ => false,
            },
            ClauseOp::In | ClauseOp::MatchesAny => facts
                .text(&self.field)
                .is_some_and(|fact| self.operands().iter().any(|operand| operand == fact)),
            ClauseOp::ContainsAny => facts.list(&self.field).is_some_and(|items| {
                if is_id_field(&self.field) {
                    self.operands()
                        .iter()
                        .any(|operand| items.iter().any(|item| item == operand))
                } else {
                    self.operands().iter().any(|operand| {
                        let operand = fold(operand);
                        items.iter().any(|item| fold(item) == operand)
                    })
                }
            }),
            ClauseOp::Exists => facts.get(&self.field).is_some_and(|fact| !fact.is_empty()),
            ClauseOp::TextContainsAny => facts.text(&self.field).is_some_and(|blob| {
                let haystack = fold(blob);
                self.operands()
                    .iter()
                    .filter(|needle| !needle.is_empty())
                    .any(|needle| haystack.contains(&fold(needle)))
            }),
            ClauseOp::Unknown => false,
        }
    }

    fn operands(&self) -> &[String] {
        self.values.as_deref().unwrap_or(&[])
    }
}

impl std::fmt::Display for AutomationClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negate {
            write!(f, "!{}({})", self.op, self.field)
        } else {
            write!(f, "{}({})", self.op, self.field)
        }
    }
}

/// Id-valued fields are compared exactly; everything else is a user-facing
/// name where case differences are noise.
fn is_id_field(field: &str) -> bool {
    field.ends_with("Ids")
}

/// Single case-folding policy for every case-insensitive operator.
/// Unicode-aware, so accented usernames compare the same everywhere.
fn fold(text: &str) -> String {
    text.to_lowercase()
}
