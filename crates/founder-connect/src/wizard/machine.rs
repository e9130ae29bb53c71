use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::flows::{FlowKind, WizardFlow};
use super::form::{FieldValue, FormData};
use super::step::Step;

pub const INCOMPLETE_STEP_MESSAGE: &str = "Please complete this step";
pub const SUBMISSION_FALLBACK_MESSAGE: &str = crate::session::GENERIC_FAILURE_MESSAGE;

/// Lifecycle of a wizard run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WizardState {
    Editing { step: usize },
    Transitioning { from: usize, to: usize },
    Submitting,
    Complete,
}

/// A pending move between adjacent steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

/// Result of a successful `go_next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Transition(Transition),
    /// The final step is valid; the flow's completion handler should run.
    ReadyToSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPress {
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next(Advance),
    Back(Transition),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("{}", INCOMPLETE_STEP_MESSAGE)]
    Incomplete { step: &'static str },
    #[error("a step transition is already in progress")]
    Transitioning,
    #[error("the form is being submitted")]
    Submitting,
    #[error("this flow is already complete")]
    Complete,
    #[error("no step transition is in progress")]
    NoTransition,
    #[error("only the final step can be submitted")]
    NotAtTerminal,
}

/// Linear step machine shared by every wizard page.
#[derive(Debug, Clone)]
pub struct StepWizard {
    flow: Arc<WizardFlow>,
    state: WizardState,
    form: FormData,
    error: Option<String>,
}

impl StepWizard {
    pub fn new(flow: WizardFlow) -> Self {
        Self::from_shared(Arc::new(flow))
    }

    pub fn from_shared(flow: Arc<WizardFlow>) -> Self {
        Self {
            flow,
            state: WizardState::Editing { step: 0 },
            form: FormData::new(),
            error: None,
        }
    }

    /// Starts with answers carried over from an earlier flow.
    pub fn with_form(mut self, form: FormData) -> Self {
        self.form = form;
        self
    }

    pub fn flow(&self) -> &WizardFlow {
        &self.flow
    }

    pub fn kind(&self) -> FlowKind {
        self.flow.kind
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Index of the step on screen; the origin step while a transition runs.
    pub fn current_index(&self) -> usize {
        match self.state {
            WizardState::Editing { step } => step,
            WizardState::Transitioning { from, .. } => from,
            WizardState::Submitting | WizardState::Complete => self.flow.terminal_index(),
        }
    }

    pub fn current_step(&self) -> &Step {
        &self.flow.steps()[self.current_index()]
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, WizardState::Transitioning { .. })
    }

    pub fn is_complete(&self) -> bool {
        self.state == WizardState::Complete
    }

    pub fn at_terminal_step(&self) -> bool {
        self.current_index() == self.flow.terminal_index()
    }

    /// Percentage of the flow behind the current step: 0 on the first step, 100 on the last.
    pub fn progress(&self) -> f64 {
        let terminal = self.flow.terminal_index();
        if terminal == 0 || self.is_complete() {
            return 100.0;
        }
        self.current_index() as f64 / terminal as f64 * 100.0
    }

    pub fn set_field(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        self.ensure_editing()?;
        self.form.set(field, value);
        self.error = None;
        Ok(())
    }

    /// Applies several answers at once, replacing earlier values of the same fields.
    pub fn merge_answers(&mut self, answers: FormData) -> Result<(), WizardError> {
        self.ensure_editing()?;
        self.form.merge(answers);
        self.error = None;
        Ok(())
    }

    /// Flips a choice of a multi-select options step, returning whether it is now selected.
    pub fn toggle_option(&mut self, field: &str, option: &str) -> Result<bool, WizardError> {
        self.ensure_editing()?;
        self.error = None;
        Ok(self.form.toggle_in_list(field, option))
    }

    pub fn go_next(&mut self) -> Result<Advance, WizardError> {
        let index = self.ensure_editing()?;
        self.check_current(index)?;

        if index == self.flow.terminal_index() {
            return Ok(Advance::ReadyToSubmit);
        }

        let transition = Transition {
            from: index,
            to: index + 1,
        };
        self.state = WizardState::Transitioning {
            from: transition.from,
            to: transition.to,
        };
        Ok(Advance::Transition(transition))
    }

    /// Starts a move to the previous step; `None` on the first step.
    pub fn go_back(&mut self) -> Result<Option<Transition>, WizardError> {
        let index = self.ensure_editing()?;
        if index == 0 {
            return Ok(None);
        }

        self.error = None;
        let transition = Transition {
            from: index,
            to: index - 1,
        };
        self.state = WizardState::Transitioning {
            from: transition.from,
            to: transition.to,
        };
        Ok(Some(transition))
    }

    /// Lands a pending transition, returning the new step index.
    pub fn finish_transition(&mut self) -> Result<usize, WizardError> {
        match self.state {
            WizardState::Transitioning { to, .. } => {
                self.state = WizardState::Editing { step: to };
                Ok(to)
            }
            _ => Err(WizardError::NoTransition),
        }
    }

    /// Locks the form for the completion handler. Only valid on the final step.
    pub fn begin_submit(&mut self) -> Result<&FormData, WizardError> {
        let index = self.ensure_editing()?;
        if index != self.flow.terminal_index() {
            return Err(WizardError::NotAtTerminal);
        }
        self.check_current(index)?;

        self.state = WizardState::Submitting;
        Ok(&self.form)
    }

    pub fn submission_succeeded(&mut self) {
        if self.state == WizardState::Submitting {
            self.state = WizardState::Complete;
        }
    }

    /// Returns to the final step with `message` (or a generic fallback) on display.
    pub fn submission_failed(&mut self, message: Option<String>) {
        if self.state != WizardState::Submitting {
            return;
        }
        self.state = WizardState::Editing {
            step: self.flow.terminal_index(),
        };
        self.error = Some(
            message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| SUBMISSION_FALLBACK_MESSAGE.to_string()),
        );
    }

    /// Enter advances non-options steps whose answers are valid; Escape goes back on flows
    /// that allow it.
    pub fn handle_key(&mut self, key: KeyPress) -> Result<KeyAction, WizardError> {
        match key {
            KeyPress::Enter => {
                self.ensure_editing()?;
                let step = self.current_step();
                if step.input.is_options() || !step.is_valid(&self.form) {
                    return Ok(KeyAction::Ignored);
                }
                self.go_next().map(KeyAction::Next)
            }
            KeyPress::Escape => {
                if !self.flow.escape_goes_back {
                    return Ok(KeyAction::Ignored);
                }
                Ok(self
                    .go_back()?
                    .map(KeyAction::Back)
                    .unwrap_or(KeyAction::Ignored))
            }
        }
    }

    fn ensure_editing(&self) -> Result<usize, WizardError> {
        match self.state {
            WizardState::Editing { step } => Ok(step),
            WizardState::Transitioning { .. } => Err(WizardError::Transitioning),
            WizardState::Submitting => Err(WizardError::Submitting),
            WizardState::Complete => Err(WizardError::Complete),
        }
    }

    fn check_current(&mut self, index: usize) -> Result<(), WizardError> {
        let step = &self.flow.steps()[index];
        if step.blocks(&self.form) {
            self.error = Some(INCOMPLETE_STEP_MESSAGE.to_string());
            return Err(WizardError::Incomplete { step: step.id });
        }
        self.error = None;
        Ok(())
    }
}
