//! Field schema for the application wizard and the auth modal.
//!
//! Validation is split in two: [`FormSection::missing_required`] is a pure
//! predicate over the current values, and [`FormSection::flag_missing`]
//! applies its result to the per-field `flagged` marks that the UI draws.

use super::models::{ApplicationRequest, LoginRequest, RegisterRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Email,
    Phone,
    Number,
    Url,
    Password,
    Checkbox,
}

impl FieldKind {
    pub fn is_checkbox(self) -> bool {
        matches!(self, FieldKind::Checkbox)
    }

    pub fn is_secret(self) -> bool {
        matches!(self, FieldKind::Password)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, label, kind, required: true }
}

const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, label, kind, required: false }
}

#[derive(Debug)]
pub struct StepSpec {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

pub static APPLICATION_STEPS: [StepSpec; 5] = [
    StepSpec {
        title: "Founder",
        fields: &[
            required("fullName", "Full Name", FieldKind::Text),
            required("email", "Email", FieldKind::Email),
            required("phone", "Phone", FieldKind::Phone),
            required("age", "Age", FieldKind::Number),
            required("location", "Location", FieldKind::Text),
            required("linkedin", "LinkedIn Profile", FieldKind::Url),
        ],
    },
    StepSpec {
        title: "Team & Venture",
        fields: &[
            required("coFounders", "Co-Founders", FieldKind::Text),
            required("teamSize", "Team Size", FieldKind::Number),
            optional("startupName", "Startup Name", FieldKind::Text),
            optional("website", "Website", FieldKind::Url),
            required("sector", "Sector", FieldKind::Text),
        ],
    },
    StepSpec {
        title: "Idea",
        fields: &[
            required("oneLiner", "One-Liner", FieldKind::Text),
            required("problemStatement", "Problem Statement", FieldKind::LongText),
            required("solution", "Solution", FieldKind::LongText),
            required("targetUsers", "Target Users", FieldKind::Text),
            required("impact", "Impact", FieldKind::LongText),
        ],
    },
    StepSpec {
        title: "Traction",
        fields: &[
            required("stage", "Stage", FieldKind::Text),
            required("funding", "Funding", FieldKind::Text),
            required("pitchLink", "Pitch Deck Link", FieldKind::Url),
        ],
    },
    StepSpec {
        title: "Commitments",
        fields: &[
            required("commitment1", "I will attend the full programme", FieldKind::Checkbox),
            required("commitment2", "The information I provided is accurate", FieldKind::Checkbox),
            required("commitment3", "I agree to the registration fee", FieldKind::Checkbox),
            optional("additionalInfo", "Additional Information", FieldKind::LongText),
        ],
    },
];

pub static LOGIN_FIELDS: &[FieldSpec] = &[
    required("email", "Email", FieldKind::Email),
    required("password", "Password", FieldKind::Password),
];

pub static REGISTER_FIELDS: &[FieldSpec] = &[
    required("fullName", "Full Name", FieldKind::Text),
    required("email", "Email", FieldKind::Email),
    required("password", "Password", FieldKind::Password),
    required("phone", "Phone", FieldKind::Phone),
    required("location", "Location", FieldKind::Text),
];

/// Whether a single value satisfies a required field of the given kind.
pub fn is_filled(kind: FieldKind, text: &str, checked: bool) -> bool {
    if kind.is_checkbox() {
        checked
    } else {
        !text.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FieldState {
    pub spec: &'static FieldSpec,
    pub text: String,
    pub checked: bool,
    /// Drawn as an error outline until the next validation of this section.
    pub flagged: bool,
}

impl FieldState {
    fn new(spec: &'static FieldSpec) -> Self {
        Self {
            spec,
            text: String::new(),
            checked: false,
            flagged: false,
        }
    }

    pub fn is_filled(&self) -> bool {
        is_filled(self.spec.kind, &self.text, self.checked)
    }
}

/// One group of fields with a focus cursor: a wizard step or an auth form.
#[derive(Debug, Clone)]
pub struct FormSection {
    pub fields: Vec<FieldState>,
    pub focus: usize,
}

impl FormSection {
    pub fn new(specs: &'static [FieldSpec]) -> Self {
        Self {
            fields: specs.iter().map(FieldState::new).collect(),
            focus: 0,
        }
    }

    /// Names of required fields that are not filled in, in display order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| field.spec.required && !field.is_filled())
            .map(|field| field.spec.name)
            .collect()
    }

    /// Flags every missing required field, clears the flag on the rest and
    /// returns whether the section is complete.
    pub fn flag_missing(&mut self) -> bool {
        let missing = self.missing_required();
        for field in &mut self.fields {
            field.flagged = missing.contains(&field.spec.name);
        }
        missing.is_empty()
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.text.clear();
            field.checked = false;
            field.flagged = false;
        }
        self.focus = 0;
    }

    fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.spec.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|field| field.spec.name == name)
    }

    pub fn value(&self, name: &str) -> &str {
        self.field(name).map(|field| field.text.as_str()).unwrap_or("")
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.field(name).is_some_and(|field| field.checked)
    }

    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(field) = self.field_mut(name) {
            field.text = value.to_string();
        }
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) {
        if let Some(field) = self.field_mut(name) {
            field.checked = checked;
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.fields.is_empty() {
            self.focus = if self.focus == 0 { self.fields.len() - 1 } else { self.focus - 1 };
        }
    }

    pub fn focused(&self) -> Option<&FieldState> {
        self.fields.get(self.focus)
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if !field.spec.kind.is_checkbox() {
                field.text.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.text.pop();
        }
    }

    pub fn toggle_focused(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.spec.kind.is_checkbox() {
                field.checked = !field.checked;
            }
        }
    }

    pub fn to_login_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.value("email").to_string(),
            password: self.value("password").to_string(),
        }
    }

    pub fn to_register_request(&self) -> RegisterRequest {
        RegisterRequest {
            full_name: self.value("fullName").to_string(),
            email: self.value("email").to_string(),
            password: self.value("password").to_string(),
            phone: self.value("phone").to_string(),
            location: self.value("location").to_string(),
        }
    }
}

/// All five wizard sections, indexed by one-based step number.
#[derive(Debug, Clone)]
pub struct ApplicationForm {
    sections: Vec<FormSection>,
}

impl Default for ApplicationForm {
    fn default() -> Self {
        Self {
            sections: APPLICATION_STEPS
                .iter()
                .map(|step| FormSection::new(step.fields))
                .collect(),
        }
    }
}

impl ApplicationForm {
    pub fn section(&self, step: usize) -> Option<&FormSection> {
        step.checked_sub(1).and_then(|index| self.sections.get(index))
    }

    pub fn section_mut(&mut self, step: usize) -> Option<&mut FormSection> {
        step.checked_sub(1).and_then(|index| self.sections.get_mut(index))
    }

    pub fn clear(&mut self) {
        for section in &mut self.sections {
            section.clear();
        }
    }

    fn value(&self, name: &str) -> &str {
        self.sections
            .iter()
            .map(|section| section.value(name))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    fn is_checked(&self, name: &str) -> bool {
        self.sections.iter().any(|section| section.is_checked(name))
    }

    fn number(&self, name: &str) -> Option<u32> {
        self.value(name).trim().parse().ok()
    }

    pub fn set_value(&mut self, name: &str, value: &str) {
        for section in &mut self.sections {
            section.set_value(name, value);
        }
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) {
        for section in &mut self.sections {
            section.set_checked(name, checked);
        }
    }

    pub fn to_request(&self) -> ApplicationRequest {
        let text = |name: &str| self.value(name).to_string();
        ApplicationRequest {
            full_name: text("fullName"),
            email: text("email"),
            phone: text("phone"),
            age: self.number("age"),
            location: text("location"),
            linkedin: text("linkedin"),
            co_founders: text("coFounders"),
            team_size: self.number("teamSize"),
            startup_name: text("startupName"),
            website: text("website"),
            sector: text("sector"),
            one_liner: text("oneLiner"),
            problem_statement: text("problemStatement"),
            solution: text("solution"),
            target_users: text("targetUsers"),
            impact: text("impact"),
            stage: text("stage"),
            funding: text("funding"),
            pitch_link: text("pitchLink"),
            commitment1: self.is_checked("commitment1"),
            commitment2: self.is_checked("commitment2"),
            commitment3: self.is_checked("commitment3"),
            additional_info: text("additionalInfo"),
        }
    }
}
