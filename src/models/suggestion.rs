use serde::{Deserialize, Serialize};

use super::rule::RuleType;

/// Server-proposed guardrail derived from recent behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSuggestion {
    pub id: String,
    pub rule_type: RuleType,
    pub suggested_value: f64,
    pub rationale: String,
    pub confidence: f64,
}
