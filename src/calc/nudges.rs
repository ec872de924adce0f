use serde::{Deserialize, Serialize};

use crate::models::{CreateTradeInput, TradeDirection};

const MIN_REWARD_RISK: f64 = 1.5;
const LOW_CONFIDENCE: u8 = 4;
const LOW_RISK_COMFORT: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeKind {
    MissingStop,
    StopWrongSide,
    LowRewardRisk,
    OversizedRisk,
    LowConfidenceSize,
    LowRiskComfort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskNudge {
    pub kind: NudgeKind,
    pub severity: NudgeSeverity,
    pub message: String,
}

impl RiskNudge {
    fn new(kind: NudgeKind, severity: NudgeSeverity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }
}

/// Account-level inputs for the sizing nudges. Unknown values skip the check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NudgeContext {
    pub account_size: Option<f64>,
    pub max_risk_percent: f64,
    pub average_position_value: Option<f64>,
}

impl Default for NudgeContext {
    fn default() -> Self {
        Self {
            account_size: None,
            max_risk_percent: 2.0,
            average_position_value: None,
        }
    }
}

/// Pre-trade warnings for the review step, most severe first.
pub fn risk_nudges(trade: &CreateTradeInput, context: &NudgeContext) -> Vec<RiskNudge> {
    let mut nudges = Vec::new();
    let entry = trade.entry_price;

    // Risk per share, only when the stop is on the protective side
    let mut risk_per_unit = None;
    match trade.planned_stop_loss {
        None => nudges.push(RiskNudge::new(
            NudgeKind::MissingStop,
            NudgeSeverity::High,
            "No stop loss planned. Decide where you are wrong before entering.",
        )),
        Some(stop) => {
            let protective = match trade.direction {
                TradeDirection::Buy => stop < entry,
                TradeDirection::Sell => stop > entry,
            };
            if protective {
                risk_per_unit = Some((entry - stop).abs());
            } else {
                let side = match trade.direction {
                    TradeDirection::Buy => "below",
                    TradeDirection::Sell => "above",
                };
                nudges.push(RiskNudge::new(
                    NudgeKind::StopWrongSide,
                    NudgeSeverity::High,
                    format!("Stop loss should be {} the entry price for a {} trade.", side, trade.direction),
                ));
            }
        }
    }

    if let (Some(risk), Some(target)) = (risk_per_unit, trade.planned_target) {
        let ratio = (target - entry).abs() / risk;
        if ratio < MIN_REWARD_RISK {
            let severity = if ratio < 1.0 {
                NudgeSeverity::High
            } else {
                NudgeSeverity::Medium
            };
            nudges.push(RiskNudge::new(
                NudgeKind::LowRewardRisk,
                severity,
                format!("Reward is only {:.2}x the risk. Aim for at least {:.1}x.", ratio, MIN_REWARD_RISK),
            ));
        }
    }

    if let (Some(risk), Some(account)) = (risk_per_unit, context.account_size) {
        if account > 0.0 {
            let risk_percent = risk * trade.quantity / account * 100.0;
            if risk_percent > context.max_risk_percent {
                let severity = if risk_percent > context.max_risk_percent * 2.0 {
                    NudgeSeverity::High
                } else {
                    NudgeSeverity::Medium
                };
                nudges.push(RiskNudge::new(
                    NudgeKind::OversizedRisk,
                    severity,
                    format!(
                        "This trade risks {:.1}% of your account (limit {:.1}%).",
                        risk_percent, context.max_risk_percent
                    ),
                ));
            }
        }
    }

    if let (Some(confidence), Some(average)) = (trade.confidence, context.average_position_value) {
        if confidence <= LOW_CONFIDENCE && trade.quantity * entry > average {
            nudges.push(RiskNudge::new(
                NudgeKind::LowConfidenceSize,
                NudgeSeverity::Medium,
                "Confidence is low but size is above your average. Consider sizing down.",
            ));
        }
    }

    if let Some(comfort) = trade.risk_comfort {
        if comfort <= LOW_RISK_COMFORT {
            nudges.push(RiskNudge::new(
                NudgeKind::LowRiskComfort,
                NudgeSeverity::Low,
                "You are not comfortable with this risk. Reduce size until you are.",
            ));
        }
    }

    // Stable, so equal severities keep check order
    nudges.sort_by(|a, b| b.severity.cmp(&a.severity));
    nudges
}
