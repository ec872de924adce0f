use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    Risk,
    Discipline,
    Timing,
    Psychology,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    MaxDailyLoss,
    MaxWeeklyLoss,
    MaxDrawdownPercent,
    MaxRiskPerTrade,
    MaxPositionSize,
    MinRiskReward,
    RequireStopLoss,
    MaxTradesPerDay,
    MaxOpenPositions,
    RequireTradePlan,
    RequireJournalEntry,
    TradingStartHour,
    TradingEndHour,
    CooldownAfterLossMinutes,
    MaxConsecutiveLosses,
    MinConfidence,
    RequireMindsetCheck,
}

impl RuleType {
    pub const ALL: [RuleType; 17] = [
        RuleType::MaxDailyLoss,
        RuleType::MaxWeeklyLoss,
        RuleType::MaxDrawdownPercent,
        RuleType::MaxRiskPerTrade,
        RuleType::MaxPositionSize,
        RuleType::MinRiskReward,
        RuleType::RequireStopLoss,
        RuleType::MaxTradesPerDay,
        RuleType::MaxOpenPositions,
        RuleType::RequireTradePlan,
        RuleType::RequireJournalEntry,
        RuleType::TradingStartHour,
        RuleType::TradingEndHour,
        RuleType::CooldownAfterLossMinutes,
        RuleType::MaxConsecutiveLosses,
        RuleType::MinConfidence,
        RuleType::RequireMindsetCheck,
    ];

    pub fn category(&self) -> RuleCategory {
        match self {
            RuleType::MaxDailyLoss
            | RuleType::MaxWeeklyLoss
            | RuleType::MaxDrawdownPercent
            | RuleType::MaxRiskPerTrade
            | RuleType::MaxPositionSize
            | RuleType::MinRiskReward
            | RuleType::RequireStopLoss => RuleCategory::Risk,
            RuleType::MaxTradesPerDay
            | RuleType::MaxOpenPositions
            | RuleType::RequireTradePlan
            | RuleType::RequireJournalEntry => RuleCategory::Discipline,
            RuleType::TradingStartHour
            | RuleType::TradingEndHour
            | RuleType::CooldownAfterLossMinutes => RuleCategory::Timing,
            RuleType::MaxConsecutiveLosses
            | RuleType::MinConfidence
            | RuleType::RequireMindsetCheck => RuleCategory::Psychology,
        }
    }

    /// Value pre-filled in the rules editor.
    pub fn default_value(&self) -> f64 {
        match self {
            RuleType::MaxDailyLoss => 500.0,
            RuleType::MaxWeeklyLoss => 1500.0,
            RuleType::MaxDrawdownPercent => 10.0,
            RuleType::MaxRiskPerTrade => 2.0,
            RuleType::MaxPositionSize => 10_000.0,
            RuleType::MinRiskReward => 1.5,
            RuleType::MaxTradesPerDay => 5.0,
            RuleType::MaxOpenPositions => 3.0,
            RuleType::TradingStartHour => 9.0,
            RuleType::TradingEndHour => 16.0,
            RuleType::CooldownAfterLossMinutes => 30.0,
            RuleType::MaxConsecutiveLosses => 3.0,
            RuleType::MinConfidence => 5.0,
            RuleType::RequireStopLoss
            | RuleType::RequireTradePlan
            | RuleType::RequireJournalEntry
            | RuleType::RequireMindsetCheck => 1.0,
        }
    }

    /// Boolean rules store 1.0/0.0 in `value`.
    pub fn is_toggle(&self) -> bool {
        matches!(
            self,
            RuleType::RequireStopLoss
                | RuleType::RequireTradePlan
                | RuleType::RequireJournalEntry
                | RuleType::RequireMindsetCheck
        )
    }

    /// Reject values the backend would refuse anyway.
    pub fn validate_value(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err("Value must be a number".to_string());
        }
        match self {
            RuleType::TradingStartHour | RuleType::TradingEndHour => {
                if !(0.0..=23.0).contains(&value) {
                    return Err("Hour must be between 0 and 23".to_string());
                }
            }
            RuleType::MaxDrawdownPercent | RuleType::MaxRiskPerTrade => {
                if value <= 0.0 || value > 100.0 {
                    return Err("Percentage must be between 0 and 100".to_string());
                }
            }
            RuleType::MinConfidence => {
                if !(1.0..=10.0).contains(&value) {
                    return Err("Confidence must be between 1 and 10".to_string());
                }
            }
            _ if self.is_toggle() => {
                if value != 0.0 && value != 1.0 {
                    return Err("Value must be on or off".to_string());
                }
            }
            _ => {
                if value <= 0.0 {
                    return Err("Value must be greater than 0".to_string());
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingRule {
    pub id: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub category: RuleCategory,
    pub value: f64,
    pub is_active: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleInput {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub category: RuleCategory,
    pub value: f64,
    pub is_active: bool,
}

impl CreateRuleInput {
    pub fn new(rule_type: RuleType, value: f64) -> Result<Self, String> {
        rule_type.validate_value(value)?;
        Ok(Self {
            rule_type,
            category: rule_type.category(),
            value,
            is_active: true,
        })
    }

    pub fn with_default(rule_type: RuleType) -> Self {
        Self {
            rule_type,
            category: rule_type.category(),
            value: rule_type.default_value(),
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRuleInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_rule_type_has_valid_default() {
        let unique: HashSet<_> = RuleType::ALL.iter().collect();
        assert_eq!(unique.len(), 17);

        for rule_type in RuleType::ALL {
            assert!(
                rule_type.validate_value(rule_type.default_value()).is_ok(),
                "default for {:?} should validate",
                rule_type
            );
        }
    }

    #[test]
    fn test_rule_wire_format() {
        let json = r#"{"id":"r1","type":"MAX_DAILY_LOSS","category":"RISK","value":250,"isActive":true,"description":null}"#;
        let rule: TradingRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.rule_type, RuleType::MaxDailyLoss);
        assert_eq!(rule.category, RuleCategory::Risk);
        assert_eq!(rule.value, 250.0);
    }

    #[test]
    fn test_create_input_derives_category() {
        let input = CreateRuleInput::new(RuleType::CooldownAfterLossMinutes, 15.0).unwrap();
        assert_eq!(input.category, RuleCategory::Timing);
        assert!(input.is_active);

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["type"], "COOLDOWN_AFTER_LOSS_MINUTES");
    }

    #[test]
    fn test_value_validation() {
        assert!(RuleType::TradingStartHour.validate_value(24.0).is_err());
        assert!(RuleType::RequireStopLoss.validate_value(0.5).is_err());
        assert!(RuleType::RequireStopLoss.validate_value(0.0).is_ok());
        assert!(RuleType::MaxDailyLoss.validate_value(-10.0).is_err());
        assert!(RuleType::MaxRiskPerTrade.validate_value(f64::NAN).is_err());
    }
}
