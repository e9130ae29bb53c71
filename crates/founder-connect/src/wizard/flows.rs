//! Step definitions for every wizard in the app.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::form::FormData;
use super::step::{
    all_of, email, is_email, min_items, min_length, non_empty, password_length, Step, StepInput,
    Validator,
};

/// The wizard-driven pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    SignUp,
    SignIn,
    Landing,
    CreateJob,
}

impl FlowKind {
    pub const ALL: [FlowKind; 4] = [
        FlowKind::SignUp,
        FlowKind::SignIn,
        FlowKind::Landing,
        FlowKind::CreateJob,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FlowKind::SignUp => "sign-up",
            FlowKind::SignIn => "sign-in",
            FlowKind::Landing => "landing",
            FlowKind::CreateJob => "create-job",
        }
    }
}

/// Ordered steps plus the keyboard behavior of one flow. Always holds at least one step.
#[derive(Debug, Clone)]
pub struct WizardFlow {
    pub kind: FlowKind,
    steps: Vec<Step>,
    /// Escape moves back a step (sign-up only).
    pub escape_goes_back: bool,
}

impl WizardFlow {
    /// Builds a custom flow; `None` when `steps` is empty.
    pub fn new(kind: FlowKind, steps: Vec<Step>, escape_goes_back: bool) -> Option<Self> {
        if steps.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            steps,
            escape_goes_back,
        })
    }

    pub fn for_kind(kind: FlowKind) -> Self {
        match kind {
            FlowKind::SignUp => Self::sign_up(),
            FlowKind::SignIn => Self::sign_in(),
            FlowKind::Landing => Self::landing(),
            FlowKind::CreateJob => Self::create_job(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn terminal_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn sign_up() -> Self {
        Self {
            kind: FlowKind::SignUp,
            escape_goes_back: true,
            steps: vec![
                Step::new(
                    "name",
                    "What's your name?",
                    "full_name",
                    StepInput::Text {
                        placeholder: "Jane Doe",
                    },
                )
                .validate_with(non_empty("full_name")),
                Step::new(
                    "email",
                    "What's your university email?",
                    "email",
                    StepInput::Email,
                )
                .describe("Use your .edu address so classmates know you're on campus.")
                .validate_with(university_email("email")),
                Step::new("password", "Create a password", "password", StepInput::Password)
                    .describe("At least 8 characters.")
                    .validate_with(password_length("password", 8)),
                Step::new(
                    "university",
                    "Where do you study?",
                    "university",
                    StepInput::Options {
                        choices: UNIVERSITIES.to_vec(),
                        multiple: false,
                    },
                )
                .validate_with(non_empty("university")),
                Step::new(
                    "intent",
                    "What brings you to FounderConnect?",
                    "looking_for",
                    StepInput::Options {
                        choices: vec![
                            "Find a co-founder",
                            "Join a startup",
                            "Hire for my startup",
                            "Explore events",
                        ],
                        multiple: true,
                    },
                )
                .describe("Pick as many as you like.")
                .validate_with(min_items("looking_for", 1)),
                Step::new("skills", "What are you great at?", "skills", StepInput::Skills)
                    .describe("Search the skill list or browse by category.")
                    .validate_with(min_items("skills", 1)),
                Step::new(
                    "bio",
                    "Tell other founders about yourself",
                    "bio",
                    StepInput::LongText {
                        placeholder: "I'm building...",
                    },
                )
                .optional()
                .validate_with(min_length("bio", 20)),
            ],
        }
    }

    pub fn sign_in() -> Self {
        Self {
            kind: FlowKind::SignIn,
            escape_goes_back: false,
            steps: vec![
                Step::new(
                    "email",
                    "Welcome back! What's your email?",
                    "email",
                    StepInput::Email,
                )
                .validate_with(email("email")),
                Step::new("password", "Enter your password", "password", StepInput::Password)
                    .validate_with(password_length("password", 1)),
            ],
        }
    }

    pub fn landing() -> Self {
        Self {
            kind: FlowKind::Landing,
            escape_goes_back: false,
            steps: vec![
                Step::new(
                    "intent",
                    "What are you looking for?",
                    "looking_for",
                    StepInput::Options {
                        choices: vec!["A co-founder", "A startup job", "Talent for my team"],
                        multiple: true,
                    },
                )
                .validate_with(min_items("looking_for", 1)),
                Step::new("email", "Where should we reach you?", "email", StepInput::Email)
                    .describe("We'll carry this over to your sign-up.")
                    .validate_with(university_email("email")),
            ],
        }
    }

    pub fn create_job() -> Self {
        Self {
            kind: FlowKind::CreateJob,
            escape_goes_back: false,
            steps: vec![
                Step::new(
                    "title",
                    "What role are you hiring for?",
                    "title",
                    StepInput::Text {
                        placeholder: "Founding Engineer",
                    },
                )
                .validate_with(non_empty("title")),
                Step::new(
                    "company",
                    "What's your startup called?",
                    "company",
                    StepInput::Text {
                        placeholder: "Acme Labs",
                    },
                )
                .validate_with(non_empty("company")),
                Step::new(
                    "job_type",
                    "What kind of position is it?",
                    "job_type",
                    StepInput::Options {
                        choices: vec!["Full-time", "Part-time", "Internship", "Contract"],
                        multiple: false,
                    },
                )
                .validate_with(non_empty("job_type")),
                Step::new(
                    "location",
                    "Where is the role based?",
                    "location",
                    StepInput::Text {
                        placeholder: "Boston, MA or Remote",
                    },
                )
                .validate_with(non_empty("location")),
                Step::new(
                    "stage",
                    "What stage is your startup at?",
                    "stage",
                    StepInput::Options {
                        choices: vec!["Idea", "MVP", "Pre-seed", "Seed", "Series A"],
                        multiple: false,
                    },
                )
                .validate_with(non_empty("stage")),
                Step::new(
                    "skills",
                    "Which skills should candidates have?",
                    "skills",
                    StepInput::Skills,
                )
                .validate_with(min_items("skills", 1)),
                Step::new(
                    "description",
                    "Describe the role",
                    "description",
                    StepInput::LongText {
                        placeholder: "What will this person own?",
                    },
                )
                .describe("At least 30 characters.")
                .validate_with(all_of(vec![
                    non_empty("description"),
                    min_length("description", 30),
                ])),
                Step::new(
                    "compensation",
                    "How will you compensate?",
                    "compensation",
                    StepInput::Options {
                        choices: vec!["Paid", "Equity", "Paid + Equity", "Unpaid"],
                        multiple: false,
                    },
                )
                .validate_with(non_empty("compensation")),
            ],
        }
    }
}

const UNIVERSITIES: [&str; 7] = [
    "Northeastern University",
    "Boston University",
    "Harvard University",
    "MIT",
    "Columbia University",
    "Stanford University",
    "Other",
];

/// Email on an `.edu` domain.
pub fn university_email(field: &'static str) -> Validator {
    Arc::new(move |form: &FormData| {
        let value = form.text(field);
        is_email(value) && value.to_ascii_lowercase().ends_with(".edu")
    })
}
