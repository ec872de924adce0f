use regex::Regex;
use std::sync::LazyLock;

use super::{FieldErrors, Wizard, WizardForm, WizardStep, require_in_range, require_positive};
use crate::calc::{NudgeContext, RiskNudge, RiskReward, risk_nudges, risk_reward};
use crate::models::{CreateTradeInput, Emotion, InstrumentType, TradeDirection};

static SYMBOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9][A-Z0-9./\-]{0,14}$").expect("symbol pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeStep {
    Setup,
    Commitment,
    Execution,
    Review,
}

impl WizardStep for TradeStep {
    const ORDER: &'static [Self] = &[
        TradeStep::Setup,
        TradeStep::Commitment,
        TradeStep::Execution,
        TradeStep::Review,
    ];
    const FIRST: Self = TradeStep::Setup;

    fn title(&self) -> &'static str {
        match self {
            TradeStep::Setup => "Setup",
            TradeStep::Commitment => "Commitment",
            TradeStep::Execution => "Execution",
            TradeStep::Review => "Review",
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            TradeStep::Setup => Some(TradeStep::Commitment),
            TradeStep::Commitment => Some(TradeStep::Execution),
            TradeStep::Execution => Some(TradeStep::Review),
            TradeStep::Review => None,
        }
    }

    fn previous(&self) -> Option<Self> {
        match self {
            TradeStep::Setup => None,
            TradeStep::Commitment => Some(TradeStep::Setup),
            TradeStep::Execution => Some(TradeStep::Commitment),
            TradeStep::Review => Some(TradeStep::Execution),
        }
    }
}

/// Pre-trade plan captured by the new-trade wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeEntryForm {
    pub symbol: String,
    pub instrument_type: Option<InstrumentType>,
    pub direction: Option<TradeDirection>,
    pub planned_stop_loss: Option<f64>,
    pub planned_target: Option<f64>,
    pub confidence: Option<u8>,
    pub risk_comfort: Option<u8>,
    pub quantity: Option<f64>,
    pub entry_price: Option<f64>,
    pub emotions: Vec<Emotion>,
    pub notes: String,
    pub checklist_acknowledged: bool,
}

pub type TradeWizard = Wizard<TradeEntryForm>;

impl TradeEntryForm {
    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }

    /// Available once entry, stop and target are all set.
    pub fn risk_reward(&self) -> Option<RiskReward> {
        Some(risk_reward(
            self.entry_price?,
            self.planned_stop_loss?,
            self.planned_target?,
            self.quantity.unwrap_or(1.0),
        ))
    }

    pub fn nudges(&self, context: &NudgeContext) -> Vec<RiskNudge> {
        self.output()
            .map(|input| risk_nudges(&input, context))
            .unwrap_or_default()
    }

    fn validate_setup(&self, errors: &mut FieldErrors) {
        let symbol = self.normalized_symbol();
        if symbol.is_empty() {
            errors.insert("symbol", "Symbol is required".to_string());
        } else if !is_valid_symbol(&symbol) {
            errors.insert("symbol", "Symbol may only contain letters, digits, '.', '/' and '-'".to_string());
        }
        if self.instrument_type.is_none() {
            errors.insert("instrumentType", "Instrument type is required".to_string());
        }
        if self.direction.is_none() {
            errors.insert("direction", "Direction is required".to_string());
        }
    }

    fn validate_commitment(&self, errors: &mut FieldErrors) {
        if let Some(stop) = self.planned_stop_loss {
            if !stop.is_finite() || stop <= 0.0 {
                errors.insert("plannedStopLoss", "Stop loss must be greater than 0".to_string());
            }
        }
        if let Some(target) = self.planned_target {
            if !target.is_finite() || target <= 0.0 {
                errors.insert("plannedTarget", "Target must be greater than 0".to_string());
            }
        }
        require_in_range(errors, "confidence", "Confidence", self.confidence, 1, 10);
        require_in_range(errors, "riskComfort", "Risk comfort", self.risk_comfort, 1, 5);
    }

    fn validate_execution(&self, errors: &mut FieldErrors) {
        require_positive(errors, "quantity", "Quantity", self.quantity);
        require_positive(errors, "entryPrice", "Entry price", self.entry_price);

        let (Some(entry), Some(direction)) = (self.entry_price, self.direction) else {
            return;
        };
        if entry <= 0.0 {
            return;
        }
        match direction {
            TradeDirection::Buy => {
                if self.planned_stop_loss.is_some_and(|stop| stop >= entry) {
                    errors.insert("plannedStopLoss", "Stop loss must be below entry for a buy".to_string());
                }
                if self.planned_target.is_some_and(|target| target <= entry) {
                    errors.insert("plannedTarget", "Target must be above entry for a buy".to_string());
                }
            }
            TradeDirection::Sell => {
                if self.planned_stop_loss.is_some_and(|stop| stop <= entry) {
                    errors.insert("plannedStopLoss", "Stop loss must be above entry for a sell".to_string());
                }
                if self.planned_target.is_some_and(|target| target >= entry) {
                    errors.insert("plannedTarget", "Target must be below entry for a sell".to_string());
                }
            }
        }
    }
}

impl WizardForm for TradeEntryForm {
    type Step = TradeStep;
    type Output = CreateTradeInput;

    fn validate(&self, step: TradeStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            TradeStep::Setup => self.validate_setup(&mut errors),
            TradeStep::Commitment => self.validate_commitment(&mut errors),
            TradeStep::Execution => self.validate_execution(&mut errors),
            TradeStep::Review => {
                if !self.checklist_acknowledged {
                    errors.insert("checklist", "Confirm the pre-trade checklist".to_string());
                }
            }
        }
        errors
    }

    fn output(&self) -> Option<CreateTradeInput> {
        let notes = self.notes.trim();
        Some(CreateTradeInput {
            symbol: self.normalized_symbol(),
            instrument_type: self.instrument_type?,
            direction: self.direction?,
            quantity: self.quantity?,
            entry_price: self.entry_price?,
            planned_stop_loss: self.planned_stop_loss,
            planned_target: self.planned_target,
            confidence: self.confidence,
            risk_comfort: self.risk_comfort,
            emotions: self.emotions.clone(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

fn is_valid_symbol(symbol: &str) -> bool {
    SYMBOL_PATTERN.is_match(symbol)
}
