use super::{FieldErrors, Wizard, WizardForm, WizardStep, require_positive};
use crate::models::{CompleteTradeInput, Emotion, Trade};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionStep {
    Outcome,
    Emotions,
    Lessons,
}

impl WizardStep for CompletionStep {
    const ORDER: &'static [Self] = &[
        CompletionStep::Outcome,
        CompletionStep::Emotions,
        CompletionStep::Lessons,
    ];
    const FIRST: Self = CompletionStep::Outcome;

    fn title(&self) -> &'static str {
        match self {
            CompletionStep::Outcome => "Outcome",
            CompletionStep::Emotions => "Emotions",
            CompletionStep::Lessons => "Lessons",
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            CompletionStep::Outcome => Some(CompletionStep::Emotions),
            CompletionStep::Emotions => Some(CompletionStep::Lessons),
            CompletionStep::Lessons => None,
        }
    }

    fn previous(&self) -> Option<Self> {
        match self {
            CompletionStep::Outcome => None,
            CompletionStep::Emotions => Some(CompletionStep::Outcome),
            CompletionStep::Lessons => Some(CompletionStep::Emotions),
        }
    }
}

/// Journaling for a trade the broker closed on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeCompletionForm {
    pub exit_price: Option<f64>,
    pub followed_plan: Option<bool>,
    pub emotions: Vec<Emotion>,
    pub lessons: String,
    pub rating: Option<u8>,
}

pub type TradeCompletionWizard = Wizard<TradeCompletionForm>;

impl TradeCompletionForm {
    /// Pre-fills the exit price the broker reported, if any.
    pub fn for_trade(trade: &Trade) -> Self {
        Self {
            exit_price: trade.exit_price,
            ..Self::default()
        }
    }

    pub fn toggle_emotion(&mut self, emotion: Emotion) {
        match self.emotions.iter().position(|e| *e == emotion) {
            Some(index) => {
                self.emotions.remove(index);
            }
            None => self.emotions.push(emotion),
        }
    }
}

impl WizardForm for TradeCompletionForm {
    type Step = CompletionStep;
    type Output = CompleteTradeInput;

    fn validate(&self, step: CompletionStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            CompletionStep::Outcome => {
                require_positive(&mut errors, "exitPrice", "Exit price", self.exit_price);
                if self.followed_plan.is_none() {
                    errors.insert("followedPlan", "Tell us whether you followed your plan".to_string());
                }
            }
            CompletionStep::Emotions => {
                if self.emotions.is_empty() {
                    errors.insert("emotions", "Select at least one emotion".to_string());
                }
            }
            CompletionStep::Lessons => {
                if self.lessons.trim().is_empty() {
                    errors.insert("lessons", "Write down at least one lesson".to_string());
                }
                if self.rating.is_some_and(|r| !(1..=5).contains(&r)) {
                    errors.insert("rating", "Rating must be between 1 and 5".to_string());
                }
            }
        }
        errors
    }

    fn output(&self) -> Option<CompleteTradeInput> {
        Some(CompleteTradeInput {
            exit_price: self.exit_price?,
            followed_plan: self.followed_plan?,
            emotions: self.emotions.clone(),
            lessons: self.lessons.trim().to_string(),
            rating: self.rating,
        })
    }
}
