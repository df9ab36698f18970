//! Step-index state machine of the application wizard.
//!
//! The wizard is either closed or showing one of [`TOTAL_STEPS`] steps. The
//! step only moves through [`Wizard::next`] (validated) and [`Wizard::prev`]
//! (never validated); opening always starts at step 1.

use super::form::{ApplicationForm, FormSection};
use super::models::ApplicationRequest;

pub const TOTAL_STEPS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Closed,
    Step(usize),
}

/// How a step is drawn in the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProgress {
    Completed,
    Active,
    Pending,
}

/// Result of a `next` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// Already on the last step; nothing to advance to.
    AtLastStep,
    /// Required fields of the current step are missing.
    Blocked(Vec<&'static str>),
}

#[derive(Debug, Clone)]
pub struct Wizard {
    visible: bool,
    current_step: usize,
    pub form: ApplicationForm,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            visible: false,
            current_step: 1,
            form: ApplicationForm::default(),
        }
    }
}

impl Wizard {
    pub fn state(&self) -> WizardState {
        if self.visible {
            WizardState::Step(self.current_step)
        } else {
            WizardState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == TOTAL_STEPS
    }

    /// Shows step 1. Refused, with no state change, when nobody is logged in.
    pub fn open(&mut self, logged_in: bool) -> bool {
        if !logged_in {
            return false;
        }
        self.visible = true;
        self.current_step = 1;
        true
    }

    /// Hides the wizard. Values and validation marks stay as they are.
    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn next(&mut self) -> Advance {
        if !self.validate(self.current_step) {
            let missing = self
                .form
                .section(self.current_step)
                .map(FormSection::missing_required)
                .unwrap_or_default();
            return Advance::Blocked(missing);
        }
        if self.current_step < TOTAL_STEPS {
            self.current_step += 1;
            Advance::Moved(self.current_step)
        } else {
            Advance::AtLastStep
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.current_step > 1 {
            self.current_step -= 1;
            true
        } else {
            false
        }
    }

    /// Checks the required fields of one step only and flags the missing ones.
    pub fn validate(&mut self, step: usize) -> bool {
        self.form
            .section_mut(step)
            .map(FormSection::flag_missing)
            .unwrap_or(true)
    }

    /// Validates the last step and assembles the request to send.
    ///
    /// Earlier steps are not re-checked here.
    pub fn prepare_submission(&mut self) -> Option<ApplicationRequest> {
        if !self.visible || !self.is_last_step() {
            return None;
        }
        if !self.validate(TOTAL_STEPS) {
            return None;
        }
        Some(self.form.to_request())
    }

    /// Clears every value and flag and rewinds to step 1 without changing
    /// visibility.
    pub fn reset(&mut self) {
        self.form.clear();
        self.current_step = 1;
    }

    /// Closes the wizard after an accepted submission so the next `open`
    /// starts clean.
    pub fn finish_submission(&mut self) {
        self.close();
        self.reset();
    }

    pub fn progress(&self) -> [StepProgress; TOTAL_STEPS] {
        let mut progress = [StepProgress::Pending; TOTAL_STEPS];
        for (index, entry) in progress.iter_mut().enumerate() {
            let step = index + 1;
            *entry = if step < self.current_step {
                StepProgress::Completed
            } else if step == self.current_step {
                StepProgress::Active
            } else {
                StepProgress::Pending
            };
        }
        progress
    }

    pub fn active_section(&self) -> Option<&FormSection> {
        self.form.section(self.current_step)
    }

    pub fn active_section_mut(&mut self) -> Option<&mut FormSection> {
        self.form.section_mut(self.current_step)
    }
}
