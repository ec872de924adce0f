//! Multi-step form engine shared by the trade entry, exit and completion
//! wizards.
//!
//! Steps are enums with an explicit transition table; a step only advances
//! when its validator returns no errors. Submission revalidates every step
//! and hands the finished input to an async callback.

pub mod completion;
pub mod exit;
pub mod trade_entry;

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use crate::api::ApiError;

pub use completion::{CompletionStep, TradeCompletionForm, TradeCompletionWizard};
pub use exit::{ExitStep, ExitTradeForm, ExitTradeWizard};
pub use trade_entry::{TradeEntryForm, TradeStep, TradeWizard};

/// Field key (camelCase, as the form renders it) to message.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub trait WizardStep: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every step in display order.
    const ORDER: &'static [Self];
    const FIRST: Self;

    fn title(&self) -> &'static str;

    fn next(&self) -> Option<Self>;

    fn previous(&self) -> Option<Self>;

    fn can_transition(from: Self, to: Self) -> bool {
        from.next() == Some(to) || from.previous() == Some(to)
    }

    fn is_last(&self) -> bool {
        self.next().is_none()
    }

    /// 1-based position for step indicators.
    fn number(&self) -> usize {
        Self::ORDER.iter().position(|s| s == self).map_or(0, |i| i + 1)
    }
}

pub trait WizardForm: Clone + Send {
    type Step: WizardStep;
    type Output: Send;

    /// Pure per-step validation; an empty map means the step is complete.
    fn validate(&self, step: Self::Step) -> FieldErrors;

    /// Request body for a fully valid form.
    fn output(&self) -> Option<Self::Output>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStatus {
    Open,
    Submitting,
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Wizard is not open")]
    NotOpen,

    #[error("Submit is only available on the final step")]
    NotOnFinalStep,

    #[error("Please fix the highlighted fields in {step}")]
    Incomplete { step: &'static str, errors: FieldErrors },

    #[error(transparent)]
    Submit(#[from] ApiError),
}

pub struct Wizard<F: WizardForm> {
    step: F::Step,
    form: F,
    errors: FieldErrors,
    submit_error: Option<String>,
    status: WizardStatus,
}

impl<F: WizardForm> Wizard<F> {
    pub fn new(form: F) -> Self {
        Self {
            step: F::Step::FIRST,
            form,
            errors: FieldErrors::new(),
            submit_error: None,
            status: WizardStatus::Open,
        }
    }

    pub fn step(&self) -> F::Step {
        self.step
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == WizardStatus::Open
    }

    /// Validate the current step and advance when it is clean.
    pub fn next(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }

        self.errors = self.form.validate(self.step);
        if !self.errors.is_empty() {
            log::debug!(
                "{} blocked by {} field error(s)",
                self.step.title(),
                self.errors.len()
            );
            return false;
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Go back one step. Never validates.
    pub fn back(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                self.errors.clear();
                true
            }
            None => false,
        }
    }

    /// Jump to an adjacent step, e.g. from a step indicator.
    pub fn go_to(&mut self, to: F::Step) -> Result<(), WizardError> {
        if !F::Step::can_transition(self.step, to) {
            return Err(WizardError::InvalidTransition {
                from: self.step.title(),
                to: to.title(),
            });
        }
        if self.step.next() == Some(to) {
            if self.next() {
                Ok(())
            } else {
                Err(self.incomplete(self.step))
            }
        } else {
            self.back();
            Ok(())
        }
    }

    /// Edit the form. Stale errors from the last validation are dropped.
    pub fn update(&mut self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.form);
        self.errors.clear();
        self.submit_error = None;
    }

    /// Revalidate every step and pass the finished input to `callback`.
    ///
    /// On failure the wizard stays open with the message in `submit_error`;
    /// on success it closes. The callback runs at most once per call.
    pub async fn submit<T, C, Fut>(&mut self, callback: C) -> Result<T, WizardError>
    where
        C: FnOnce(F::Output) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if !self.is_open() {
            return Err(WizardError::NotOpen);
        }
        if !self.step.is_last() {
            return Err(WizardError::NotOnFinalStep);
        }

        for step in F::Step::ORDER {
            let errors = self.form.validate(*step);
            if !errors.is_empty() {
                self.step = *step;
                self.errors = errors;
                return Err(self.incomplete(*step));
            }
        }
        let Some(output) = self.form.output() else {
            return Err(self.incomplete(self.step));
        };

        self.status = WizardStatus::Submitting;
        self.submit_error = None;

        match callback(output).await {
            Ok(value) => {
                self.status = WizardStatus::Closed;
                Ok(value)
            }
            Err(e) => {
                log::warn!("Wizard submit failed: {}", e);
                self.status = WizardStatus::Open;
                self.submit_error = Some(e.to_string());
                Err(WizardError::Submit(e))
            }
        }
    }

    pub fn close(&mut self) {
        self.status = WizardStatus::Closed;
    }

    fn incomplete(&self, step: F::Step) -> WizardError {
        WizardError::Incomplete {
            step: step.title(),
            errors: self.errors.clone(),
        }
    }
}

pub(crate) fn require_positive(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: Option<f64>,
) {
    match value {
        None => {
            errors.insert(field, format!("{} is required", label));
        }
        Some(v) if !v.is_finite() || v <= 0.0 => {
            errors.insert(field, format!("{} must be greater than 0", label));
        }
        Some(_) => {}
    }
}

pub(crate) fn require_in_range(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: Option<u8>,
    min: u8,
    max: u8,
) {
    match value {
        None => {
            errors.insert(field, format!("{} is required", label));
        }
        Some(v) if v < min || v > max => {
            errors.insert(field, format!("{} must be between {} and {}", label, min, max));
        }
        Some(_) => {}
    }
}
