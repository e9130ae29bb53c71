use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::form::FormData;

/// Predicate deciding whether a step's answers are complete.
pub type Validator = Arc<dyn Fn(&FormData) -> bool + Send + Sync>;

/// Input widget rendered for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepInput {
    Text { placeholder: &'static str },
    Email,
    Password,
    LongText { placeholder: &'static str },
    /// Clickable choices; Enter does not advance these steps.
    Options {
        choices: Vec<&'static str>,
        multiple: bool,
    },
    Skills,
}

impl StepInput {
    pub fn is_options(&self) -> bool {
        matches!(self, StepInput::Options { .. })
    }
}

/// One screen of a wizard flow.
#[derive(Clone)]
pub struct Step {
    pub id: &'static str,
    pub title: &'static str,
    pub description: Option<&'static str>,
    /// Form field written by this step's input.
    pub field: &'static str,
    pub input: StepInput,
    pub required: bool,
    validator: Validator,
}

impl Step {
    pub fn new(
        id: &'static str,
        title: &'static str,
        field: &'static str,
        input: StepInput,
    ) -> Self {
        Self {
            id,
            title,
            description: None,
            field,
            input,
            required: true,
            validator: Arc::new(|_: &FormData| true),
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn validate_with(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn is_valid(&self, form: &FormData) -> bool {
        (self.validator)(form)
    }

    /// Required steps gate forward navigation on their validator; optional ones never do.
    pub fn blocks(&self, form: &FormData) -> bool {
        self.required && !self.is_valid(form)
    }

    pub fn view(&self, form: &FormData) -> StepView {
        StepView {
            id: self.id,
            title: self.title,
            description: self.description,
            field: self.field,
            input: self.input.clone(),
            required: self.required,
            valid: self.is_valid(form),
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("input", &self.input)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Serializable snapshot of a step for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub field: &'static str,
    pub input: StepInput,
    pub required: bool,
    pub valid: bool,
}

/// Field holds non-blank text.
pub fn non_empty(field: &'static str) -> Validator {
    Arc::new(move |form: &FormData| !form.text(field).is_empty())
}

/// Field holds at least `min` characters after trimming.
pub fn min_length(field: &'static str, min: usize) -> Validator {
    Arc::new(move |form: &FormData| form.text(field).chars().count() >= min)
}

/// Secret field holds at least `min` characters as typed, and is not only whitespace.
pub fn password_length(field: &'static str, min: usize) -> Validator {
    Arc::new(move |form: &FormData| {
        let secret = form.raw_text(field);
        !secret.trim().is_empty() && secret.chars().count() >= min
    })
}

/// Field looks like `local@domain.tld`.
pub fn email(field: &'static str) -> Validator {
    Arc::new(move |form: &FormData| is_email(form.text(field)))
}

/// Field is a list with at least `min` entries.
pub fn min_items(field: &'static str, min: usize) -> Validator {
    Arc::new(move |form: &FormData| form.list(field).len() >= min)
}

/// Every validator passes.
pub fn all_of(validators: Vec<Validator>) -> Validator {
    Arc::new(move |form: &FormData| validators.iter().all(|validator| validator(form)))
}

pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.contains('@'))
}
