use chrono::{DateTime, Utc};

use super::{FieldErrors, Wizard, WizardForm, WizardStep, require_positive};
use crate::calc::{PnlPreview, suggest_plan_adherence};
use crate::models::{CloseTradeInput, Emotion, ExitReason, PlanAdherence, Trade};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStep {
    Exit,
    Reflection,
    Review,
}

impl WizardStep for ExitStep {
    const ORDER: &'static [Self] = &[ExitStep::Exit, ExitStep::Reflection, ExitStep::Review];
    const FIRST: Self = ExitStep::Exit;

    fn title(&self) -> &'static str {
        match self {
            ExitStep::Exit => "Exit",
            ExitStep::Reflection => "Reflection",
            ExitStep::Review => "Review",
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            ExitStep::Exit => Some(ExitStep::Reflection),
            ExitStep::Reflection => Some(ExitStep::Review),
            ExitStep::Review => None,
        }
    }

    fn previous(&self) -> Option<Self> {
        match self {
            ExitStep::Exit => None,
            ExitStep::Reflection => Some(ExitStep::Exit),
            ExitStep::Review => Some(ExitStep::Reflection),
        }
    }
}

/// Closing an open trade, with the plan adherence answer pre-filled from
/// the planned stop and target until the trader picks one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitTradeForm {
    trade: Trade,
    exit_price: Option<f64>,
    pub exit_time: Option<DateTime<Utc>>,
    pub exit_reason: Option<ExitReason>,
    plan_adherence: Option<PlanAdherence>,
    adherence_chosen: bool,
    pub emotions: Vec<Emotion>,
    pub lessons: String,
}

pub type ExitTradeWizard = Wizard<ExitTradeForm>;

impl ExitTradeForm {
    pub fn for_trade(trade: Trade) -> Self {
        Self {
            trade,
            exit_price: None,
            exit_time: None,
            exit_reason: None,
            plan_adherence: None,
            adherence_chosen: false,
            emotions: Vec::new(),
            lessons: String::new(),
        }
    }

    pub fn trade(&self) -> &Trade {
        &self.trade
    }

    pub fn exit_price(&self) -> Option<f64> {
        self.exit_price
    }

    pub fn plan_adherence(&self) -> Option<PlanAdherence> {
        self.plan_adherence
    }

    pub fn set_exit_price(&mut self, price: Option<f64>) {
        self.exit_price = price;
        if !self.adherence_chosen {
            self.plan_adherence = self.suggested_adherence();
        }
    }

    /// An explicit answer sticks; later price edits no longer overwrite it.
    pub fn set_plan_adherence(&mut self, adherence: Option<PlanAdherence>) {
        self.adherence_chosen = adherence.is_some();
        self.plan_adherence = adherence.or_else(|| self.suggested_adherence());
    }

    pub fn suggested_adherence(&self) -> Option<PlanAdherence> {
        let exit = self.exit_price.filter(|p| *p > 0.0)?;
        Some(suggest_plan_adherence(
            self.trade.direction,
            exit,
            self.trade.planned_stop_loss,
            self.trade.planned_target,
        ))
    }

    pub fn pnl_preview(&self) -> Option<PnlPreview> {
        let exit = self.exit_price.filter(|p| *p > 0.0)?;
        Some(PnlPreview::for_exit(&self.trade, exit))
    }
}

impl WizardForm for ExitTradeForm {
    type Step = ExitStep;
    type Output = CloseTradeInput;

    fn validate(&self, step: ExitStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            ExitStep::Exit => {
                if !self.trade.is_open() {
                    errors.insert("trade", "Only open trades can be closed".to_string());
                }
                require_positive(&mut errors, "exitPrice", "Exit price", self.exit_price);
                if self.exit_time.is_some_and(|t| t < self.trade.entry_time) {
                    errors.insert("exitTime", "Exit time cannot be before entry".to_string());
                }
            }
            ExitStep::Reflection => {
                if self.exit_reason.is_none() {
                    errors.insert("exitReason", "Exit reason is required".to_string());
                }
                if self.plan_adherence.is_none() {
                    errors.insert("planAdherence", "Plan adherence is required".to_string());
                }
            }
            ExitStep::Review => {}
        }
        errors
    }

    fn output(&self) -> Option<CloseTradeInput> {
        let lessons = self.lessons.trim();
        Some(CloseTradeInput {
            exit_price: self.exit_price?,
            exit_time: self.exit_time,
            exit_reason: self.exit_reason?,
            plan_adherence: self.plan_adherence?,
            emotions: self.emotions.clone(),
            lessons: (!lessons.is_empty()).then(|| lessons.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::TradeStatus;
    use proptest::prelude::*;

    fn open_trade() -> Trade {
        Trade::sample("t1", TradeStatus::Open)
    }

    const REQUIRED: [(ExitStep, &str); 3] = [
        (ExitStep::Exit, "exitPrice"),
        (ExitStep::Reflection, "exitReason"),
        (ExitStep::Reflection, "planAdherence"),
    ];

    fn filled() -> ExitTradeForm {
        let mut form = ExitTradeForm::for_trade(open_trade());
        form.set_exit_price(Some(108.0));
        form.set_plan_adherence(Some(PlanAdherence::Followed));
        form.exit_reason = Some(ExitReason::ManualExit);
        form
    }

    fn blank(form: &mut ExitTradeForm, key: &str) {
        match key {
            "exitPrice" => form.exit_price = None,
            "exitReason" => form.exit_reason = None,
            "planAdherence" => {
                form.plan_adherence = None;
                form.adherence_chosen = false;
            }
            other => panic!("unknown field {}", other),
        }
    }

    #[test]
    fn test_exit_price_required() {
        let mut wizard = ExitTradeWizard::new(ExitTradeForm::for_trade(open_trade()));
        assert!(!wizard.next());
        assert_eq!(wizard.errors()["exitPrice"], "Exit price is required");
    }

    #[test]
    fn test_closed_trade_cannot_be_exited() {
        let mut trade = open_trade();
        trade.status = TradeStatus::Closed;
        let mut form = ExitTradeForm::for_trade(trade);
        form.set_exit_price(Some(105.0));

        assert!(form.validate(ExitStep::Exit).contains_key("trade"));
    }

    #[test]
    fn test_adherence_follows_price_until_chosen() {
        let mut form = ExitTradeForm::for_trade(open_trade());
        form.set_exit_price(Some(109.0));
        assert_eq!(form.plan_adherence(), Some(PlanAdherence::Followed));

        form.set_exit_price(Some(88.0));
        assert_eq!(form.plan_adherence(), Some(PlanAdherence::BrokeStop));

        form.set_plan_adherence(Some(PlanAdherence::EarlyExit));
        form.set_exit_price(Some(109.0));
        assert_eq!(form.plan_adherence(), Some(PlanAdherence::EarlyExit));
    }

    #[test]
    fn test_pnl_preview() {
        let mut form = ExitTradeForm::for_trade(open_trade());
        assert!(form.pnl_preview().is_none());

        form.set_exit_price(Some(110.0));
        let preview = form.pnl_preview().unwrap();
        assert_eq!(preview.gross, 100.0);
        assert_eq!(preview.percent, Some(10.0));
        assert!(preview.is_win());
    }

    #[tokio::test]
    async fn test_reflection_requires_reason_then_submits() {
        let mut wizard = ExitTradeWizard::new(ExitTradeForm::for_trade(open_trade()));
        wizard.update(|f| f.set_exit_price(Some(110.0)));
        assert!(wizard.next());

        assert!(!wizard.next());
        assert!(wizard.errors().contains_key("exitReason"));
        assert!(!wizard.errors().contains_key("planAdherence"));

        wizard.update(|f| {
            f.exit_reason = Some(ExitReason::TargetHit);
            f.lessons = "  Let it run to target  ".to_string();
        });
        assert!(wizard.next());
        assert_eq!(wizard.step(), ExitStep::Review);

        let input = wizard
            .submit(|input| async move { Ok::<_, ApiError>(input) })
            .await
            .unwrap();
        assert_eq!(input.plan_adherence, PlanAdherence::Followed);
        assert_eq!(input.lessons.as_deref(), Some("Let it run to target"));
    }

    proptest! {
        #[test]
        fn blank_required_fields_block_their_step(
            blanked in prop::sample::subsequence(REQUIRED.to_vec(), 1..=REQUIRED.len())
        ) {
            let mut form = filled();
            for (_, key) in &blanked {
                blank(&mut form, key);
            }
            let blocking = blanked
                .iter()
                .map(|(step, _)| *step)
                .min_by_key(|step| step.number())
                .unwrap();

            let mut wizard = ExitTradeWizard::new(form);
            while wizard.next() {}

            prop_assert_eq!(wizard.step(), blocking);
            prop_assert!(!wizard.next());
            prop_assert_eq!(wizard.step(), blocking);
            for (_, key) in blanked.iter().filter(|(step, _)| *step == blocking) {
                prop_assert!(wizard.errors().contains_key(key), "missing {}", key);
            }
        }
    }
}
